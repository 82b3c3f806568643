use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::{Category, Guidelines, Messaging, SocialMedia, VisualIdentity, VoiceAndTone};

/// An extraction request as received from the upload layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRequest {
    /// Plain text already extracted from the source document.
    pub document_text: String,
    pub brand_name: String,
}

impl ExtractionRequest {
    pub fn new(document_text: impl Into<String>, brand_name: impl Into<String>) -> Self {
        Self {
            document_text: document_text.into(),
            brand_name: brand_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Scores after normalization, as stored on each record.
    pub confidence_scores: BTreeMap<Category, f64>,
    /// Unweighted mean of `confidence_scores`.
    pub average_confidence: f64,
    /// Scores exactly as the model reported them (after repair defaults).
    pub original_confidence_scores: BTreeMap<Category, f64>,
}

/// The complete, schema-valid result of one extraction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub brand_name: String,
    pub source_text_preview: String,
    pub extraction_date: DateTime<Utc>,
    pub voice_and_tone: VoiceAndTone,
    pub visual_identity: VisualIdentity,
    pub social_media: SocialMedia,
    pub messaging: Messaging,
    pub guidelines: Guidelines,
    pub extraction_metadata: ExtractionMetadata,
}

impl ExtractionReport {
    pub fn confidence_score(&self, category: Category) -> f64 {
        match category {
            Category::VoiceAndTone => self.voice_and_tone.confidence_score,
            Category::VisualIdentity => self.visual_identity.confidence_score,
            Category::SocialMedia => self.social_media.confidence_score,
            Category::Messaging => self.messaging.confidence_score,
            Category::Guidelines => self.guidelines.confidence_score,
        }
    }
}
