use std::time::Duration;

use thiserror::Error;

use crate::schema::Category;
use crate::validation::FieldIssue;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("{category} extraction failed validation ({} issue(s)): {}", issues.len(), summarize_issues(issues))]
    Validation {
        category: Category,
        issues: Vec<FieldIssue>,
        raw_value: serde_json::Value,
    },

    #[error("{category} extraction failed: {source}")]
    Transport {
        category: Category,
        #[source]
        source: TransportError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    /// The category whose pass produced this error, if any.
    pub fn category(&self) -> Option<Category> {
        match self {
            Self::Validation { category, .. } | Self::Transport { category, .. } => {
                Some(*category)
            }
            _ => None,
        }
    }
}

/// Failure reaching the model or reading its answer.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("model API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed model response ({reason}): {body}")]
    MalformedResponse { reason: String, body: String },

    #[error("model call timed out after {0:?}")]
    Timeout(Duration),
}

fn summarize_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
