use std::time::Duration;

use crate::llm::prompts::SYSTEM_PROMPT_EXTRACTION;

/// Characters of the source document sent to the model.
pub const DEFAULT_EXCERPT_LIMIT: usize = 30_000;

/// Characters of the source document kept in the report preview.
pub const DEFAULT_PREVIEW_LIMIT: usize = 500;

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub excerpt_limit: usize,
    pub preview_limit: usize,
    /// Upper bound on a single model call. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    pub system_prompt: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            excerpt_limit: DEFAULT_EXCERPT_LIMIT,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            request_timeout: None,
            system_prompt: SYSTEM_PROMPT_EXTRACTION.to_string(),
        }
    }
}

impl ExtractorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_excerpt_limit(mut self, limit: usize) -> Self {
        self.excerpt_limit = limit;
        self
    }

    pub fn with_preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = limit;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Swap the system prompt (e.g. for an industry-specific variant).
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}
