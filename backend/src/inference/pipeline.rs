//! The shared classification pipeline: decode, predict, decide, resolve,
//! assemble. Both prediction endpoints run through one `ClassifierPipeline`,
//! differing only in model handle, catalog, and decision rule.

use std::sync::Arc;

use shared::PredictionResponse;

use crate::error::InferenceError;
use crate::inference::catalog::ConditionCatalog;
use crate::inference::model::ImageClassifier;
use crate::inference::preprocess;

/// How a raw probability vector becomes a (class index, confidence) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecisionRule {
    /// Index of maximum probability, first occurrence on ties. Confidence
    /// is the raw probability at that index; no renormalization, no
    /// minimum threshold.
    ArgMax,
    /// Binary head producing one scalar: class 1 iff `scalar > cutoff`
    /// (strict). Confidence is always the winning class's probability,
    /// so `1 - scalar` on the class-0 branch.
    Threshold { cutoff: f32 },
}

impl DecisionRule {
    pub fn decide(&self, probabilities: &[f32]) -> Result<(usize, f32), InferenceError> {
        if probabilities.is_empty() {
            return Err(InferenceError::EmptyOutput);
        }
        match *self {
            DecisionRule::ArgMax => {
                let mut best = 0;
                for (index, &p) in probabilities.iter().enumerate() {
                    if p > probabilities[best] {
                        best = index;
                    }
                }
                Ok((best, probabilities[best]))
            }
            DecisionRule::Threshold { cutoff } => {
                let scalar = probabilities[0];
                if scalar > cutoff {
                    Ok((1, scalar))
                } else {
                    Ok((0, 1.0 - scalar))
                }
            }
        }
    }
}

/// Round a confidence to 4 decimal places, half away from zero.
pub fn round_confidence(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}

/// One model's request pipeline. Cheap to clone; the classifier handle is
/// shared and read-only after startup.
#[derive(Clone)]
pub struct ClassifierPipeline {
    classifier: Arc<dyn ImageClassifier>,
    catalog: ConditionCatalog,
    rule: DecisionRule,
}

impl ClassifierPipeline {
    pub fn new(
        classifier: Arc<dyn ImageClassifier>,
        catalog: ConditionCatalog,
        rule: DecisionRule,
    ) -> Self {
        Self {
            classifier,
            catalog,
            rule,
        }
    }

    /// Classify one uploaded image and assemble the response.
    pub fn classify(&self, image_bytes: &[u8]) -> Result<PredictionResponse, InferenceError> {
        let tensor = preprocess::preprocess(image_bytes)?;
        let probabilities = self.classifier.predict(&tensor)?;
        let (index, confidence) = self.rule.decide(&probabilities)?;
        let condition = self.catalog.label(index)?.to_string();
        let info = self.catalog.resolve(&condition)?;

        Ok(PredictionResponse {
            condition,
            area_of_interest: info.area.clone(),
            analysis_description: info.description.clone(),
            confidence: round_confidence(confidence),
        })
    }
}
