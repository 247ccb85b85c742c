use serde::{Deserialize, Serialize};

/// Result of one image classification request.
///
/// `condition` is always a key of the condition catalog the backend was
/// started with; `confidence` is the probability assigned to the winning
/// label, rounded to 4 decimal places.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictionResponse {
    pub condition: String,
    pub area_of_interest: String,
    pub analysis_description: String,
    pub confidence: f32,
}

/// Error envelope for the prediction endpoints.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PredictionErrorResponse {
    pub detail: String,
}

/// Error envelope for the report-analysis endpoint.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ReportErrorResponse {
    pub error: String,
}
