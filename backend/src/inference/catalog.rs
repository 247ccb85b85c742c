//! Condition catalogs: label lists plus the static metadata attached to
//! each classifiable condition. Deserialized once at startup and shared
//! read-only across requests.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{ConfigError, InferenceError};

/// Static metadata for one condition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConditionInfo {
    pub area: String,
    pub description: String,
}

/// One model's label list (in class-index order) and condition metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionCatalog {
    pub labels: Vec<String>,
    pub conditions: HashMap<String, ConditionInfo>,
}

/// Contents of `config/conditions.yaml`.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub tumor: ConditionCatalog,
    pub pneumonia: ConditionCatalog,
}

impl CatalogFile {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let file: CatalogFile = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })?;
        file.tumor.validate("tumor")?;
        file.pneumonia.validate("pneumonia")?;
        Ok(file)
    }
}

impl ConditionCatalog {
    /// Every label must have metadata; a gap means the catalog and the
    /// model artifact are out of sync, which is fatal at startup.
    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        for label in &self.labels {
            if !self.conditions.contains_key(label) {
                return Err(ConfigError::MissingCondition {
                    label: label.clone(),
                    catalog: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Label for a predicted class index.
    pub fn label(&self, index: usize) -> Result<&str, InferenceError> {
        self.labels
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| InferenceError::UnknownLabel(format!("class index {index}")))
    }

    /// Metadata for a resolved label. Fails loudly on a miss.
    pub fn resolve(&self, label: &str) -> Result<&ConditionInfo, InferenceError> {
        self.conditions
            .get(label)
            .ok_or_else(|| InferenceError::UnknownLabel(label.to_string()))
    }
}
