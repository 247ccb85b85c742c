use std::env;

use crate::error::ConfigError;

/// Settings for the external chat-completion service.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

/// Runtime configuration, resolved once at startup from the environment
/// (`.env` supported via dotenv). Credentials are never hardcoded.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub tumor_model_path: String,
    pub pneumonia_model_path: String,
    pub conditions_path: String,
    /// Allowed CORS origins. Empty means permissive (development posture).
    pub allowed_origins: Vec<String>,
    pub groq: GroqConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
                name: "PORT",
                value: raw,
            })?,
            Err(_) => 8000,
        };

        let tumor_model_path = env::var("TUMOR_MODEL_PATH")
            .unwrap_or_else(|_| "models/brain_tumor.onnx".to_string());
        let pneumonia_model_path = env::var("PNEUMONIA_MODEL_PATH")
            .unwrap_or_else(|_| "models/chest_xray.onnx".to_string());
        let conditions_path =
            env::var("CONDITIONS_PATH").unwrap_or_else(|_| default_conditions_path());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let groq = GroqConfig {
            api_key: env::var("GROQ_API_KEY")
                .map_err(|_| ConfigError::MissingVar("GROQ_API_KEY"))?,
            model: env::var("GROQ_MODEL").unwrap_or_else(|_| "gemma2-9b-it".to_string()),
            endpoint: env::var("GROQ_API_URL").unwrap_or_else(|_| {
                "https://api.groq.com/openai/v1/chat/completions".to_string()
            }),
        };

        Ok(Self {
            port,
            tumor_model_path,
            pneumonia_model_path,
            conditions_path,
            allowed_origins,
            groq,
        })
    }
}

fn default_conditions_path() -> String {
    match env::var("CARGO_MANIFEST_DIR") {
        Ok(manifest_dir) => format!("{}/../config/conditions.yaml", manifest_dir),
        Err(_) => "config/conditions.yaml".to_string(),
    }
}
