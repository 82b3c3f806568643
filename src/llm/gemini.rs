use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ExtractionError, Result, TransportError};
use crate::llm::client::{parse_model_json, LanguageModel};
use crate::llm::types::ModelRequest;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

const ENV_API_KEY: &str = "GEMINI_API_KEY";
const ENV_MODEL: &str = "GEMINI_MODEL";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Reads `GEMINI_API_KEY` (required) and `GEMINI_MODEL` (optional).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(ENV_API_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ExtractionError::InvalidConfig(format!("{} must be set", ENV_API_KEY)))?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var(ENV_MODEL) {
            config.model = model;
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl Content {
    fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate_content(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> std::result::Result<String, TransportError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        let payload = GenerateContentRequest {
            contents: vec![Content::text("user", user_prompt)],
            system_instruction: Content::text("user", system_prompt),
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let res = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = res
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| TransportError::MalformedResponse {
                reason: e.to_string(),
                body: body.clone(),
            })?;

        let malformed = |reason: &str| TransportError::MalformedResponse {
            reason: reason.to_string(),
            body: body.clone(),
        };

        parsed
            .candidates
            .ok_or_else(|| malformed("No candidates returned"))?
            .into_iter()
            .next()
            .ok_or_else(|| malformed("Empty candidates list"))?
            .content
            .parts
            .into_iter()
            .find_map(|part| part.text)
            .ok_or_else(|| malformed("Model returned non-text content"))
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate_json(
        &self,
        request: &ModelRequest,
    ) -> std::result::Result<Value, TransportError> {
        let schema = serde_json::to_string_pretty(&request.target_schema)
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let system_prompt = format!(
            "{}\n\n## TARGET JSON SCHEMA ({})\n```json\n{}\n```",
            request.system_prompt.trim(),
            request.schema_name,
            schema
        );

        debug!(
            "Gemini call for {} with {} ({} prompt chars)",
            request.category,
            self.config.model,
            request.prompt.len()
        );

        let text = self.generate_content(&system_prompt, &request.prompt).await?;
        parse_model_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_payload_shape() {
        let payload = GenerateContentRequest {
            contents: vec![Content::text("user", "hello")],
            system_instruction: Content::text("user", "system"),
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "system");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_config_builder() {
        let config = GeminiConfig::new("key")
            .with_model("gemini-1.5-pro")
            .with_base_url("http://localhost:8080");
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.base_url, "http://localhost:8080");
    }
}
