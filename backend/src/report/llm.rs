//! Chat-completion client for report summarization.
//!
//! Sends the fixed instruction preamble plus the extracted report text as a
//! single user message and expects a strict-JSON reply, returned verbatim.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GroqConfig;
use crate::error::ReportError;

/// Instruction preamble demanding a strict-JSON reply with the five
/// required keys.
const INSTRUCTIONS: &str = r#"You are a medical report analysis assistant.
Your job is to analyze the following medical report and respond with only a JSON object.
Do not include any explanation or extra text—only return the JSON.
Here is the exact format you must follow:
{
  "Report Summary": "Summary of the report",
  "Key Findings": ["Finding 1", "Finding 2", "Finding 3", "Finding 4"],
  "Severity Assessment": "Mild" | "Moderate" | "Severe",
  "Recommended Followup": "Recommended next steps",
  "Treatment Consideration": ["Treatment 1", "Treatment 2", "Treatment 3", "Treatment 4"]
}

Now analyze the following medical report:

"#;

/// Build the full prompt for one report.
pub fn build_prompt(report_text: &str) -> String {
    format!("{INSTRUCTIONS}{report_text}")
}

/// Parse the model's reply as JSON, verbatim.
pub fn parse_reply(content: &str) -> Result<Value, ReportError> {
    serde_json::from_str(content.trim()).map_err(|e| ReportError::MalformedReply(e.to_string()))
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for the external chat-completion API. Model name and endpoint
/// are fixed configuration; the credential comes from the environment.
#[derive(Clone)]
pub struct ReportAnalyzer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl ReportAnalyzer {
    pub fn new(config: &GroqConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
        }
    }

    /// Summarize one report. No retries, no timeout beyond the transport's.
    pub async fn summarize(&self, report_text: &str) -> Result<Value, ReportError> {
        let prompt = build_prompt(report_text);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ReportError::Llm(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ReportError::Llm(format!("HTTP {status}: {text}")));
        }

        let chat_resp: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ReportError::Llm(format!("failed to parse completion response: {e}")))?;

        let content = chat_resp
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or(ReportError::EmptyReply)?;

        parse_reply(&content)
    }
}
