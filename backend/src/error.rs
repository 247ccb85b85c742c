use thiserror::Error;

/// Failures on the image classification path.
///
/// Everything here surfaces to the caller as a 500 with the message
/// interpolated into the `detail` field.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to shape image tensor: {0}")]
    Tensor(#[from] ndarray::ShapeError),

    #[error("model inference failed: {0}")]
    Model(String),

    #[error("model produced an empty output")]
    EmptyOutput,

    /// A predicted label has no entry in the condition catalog. Signals a
    /// version mismatch between model and catalog; never silently defaulted.
    #[error("label '{0}' is not present in the condition catalog")]
    UnknownLabel(String),
}

/// Failures on the report analysis path, surfaced as a 500 `{error}` envelope.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to read PDF: {0}")]
    Pdf(String),

    #[error("failed to store upload: {0}")]
    TempFile(#[from] std::io::Error),

    #[error("chat completion request failed: {0}")]
    Llm(String),

    #[error("chat completion returned no content")]
    EmptyReply,

    #[error("model reply was not valid JSON: {0}")]
    MalformedReply(String),
}

/// Startup configuration failures. These abort the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("label '{label}' has no entry in the {catalog} condition catalog")]
    MissingCondition { label: String, catalog: String },
}
