use serde::{Deserialize, Serialize};

use crate::repair::RepairRule;
use crate::schema::Category;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExtractionEvent {
    Starting,
    PassStarted { category: Category },
    RepairApplied { category: Category, rules: Vec<RepairRule> },
    PassCompleted { category: Category, confidence: f64 },
    Success,
    Failed { reason: String },
}

/// One structured-output call to the model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelRequest {
    pub category: Category,
    pub system_prompt: String,
    pub prompt: String,
    pub schema_name: String,
    /// JSON Schema of the record the model should return.
    pub target_schema: serde_json::Value,
}

impl ModelRequest {
    pub fn new(category: Category, system_prompt: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            category,
            system_prompt: system_prompt.into(),
            prompt: prompt.into(),
            schema_name: category.key().to_string(),
            target_schema: category.json_schema(),
        }
    }
}
