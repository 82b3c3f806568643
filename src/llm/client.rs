use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::llm::types::ModelRequest;

/// A model that answers a prompt with a JSON value meant to match `request.target_schema`.
///
/// The value is not trusted: callers validate it against the category schema.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate_json(&self, request: &ModelRequest) -> Result<Value, TransportError>;
}

/// Parses model text as JSON, tolerating code fences and prose around the object.
pub fn parse_model_json(raw: &str) -> Result<Value, TransportError> {
    let cleaned = clean_json_output(raw);
    serde_json::from_str(cleaned).map_err(|e| TransportError::MalformedResponse {
        reason: e.to_string(),
        body: raw.to_string(),
    })
}

fn clean_json_output(raw: &str) -> &str {
    if let Some(start) = raw.find('{') {
        if let Some(end) = raw.rfind('}') {
            if end > start {
                return &raw[start..=end];
            }
        }
    }
    raw.trim()
}
