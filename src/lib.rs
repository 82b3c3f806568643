//! # Brand Guideline Extractor
//!
//! A library for turning unstructured brand documents (text already pulled out of a PDF or
//! slide deck) into a validated, schema-conformant set of brand guideline records, using an
//! LLM as an unreliable extractor.
//!
//! ## Core Concepts
//!
//! - **Categories**: five independent topics (Voice & Tone, Visual Identity, Social Media,
//!   Messaging, Guidelines), each with its own typed record and schema descriptor
//! - **Pass**: one model call for one category, plus at most one deterministic repair cycle
//! - **Repair**: local JSON Patch fixes for recurring malformed output (missing scores, missing
//!   lists, lists returned as strings)
//! - **Confidence**: the model's self-reported completeness, normalized upward by how many fields
//!   were actually filled; originals are kept for auditing
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use brand_guideline_extractor::*;
//!
//! let model = Arc::new(GeminiClient::new(GeminiConfig::from_env()?));
//! let extractor = BrandExtractor::new(model, ExtractorConfig::default());
//!
//! let request = ExtractionRequest::new(document_text, "Acme");
//! let report = extractor.extract(&request, None).await?;
//!
//! println!("{}", report.voice_and_tone.primary_voice);
//! println!("{:.2}", report.extraction_metadata.average_confidence);
//! ```

pub mod confidence;
pub mod config;
pub mod error;
pub mod inference;
pub mod llm;
pub mod repair;
pub mod report;
pub mod schema;
pub mod store;
pub mod utils;
pub mod validation;

pub use confidence::{normalize, ConfidenceLedger};
pub use config::ExtractorConfig;
pub use error::{ExtractionError, Result, TransportError};
pub use inference::{apply_voice_fallback, infer_primary_voice, is_placeholder_voice};
pub use llm::*;
pub use repair::{repair, split_string_list, RepairOutcome, RepairRule};
pub use report::*;
pub use schema::*;
pub use store::{JsonDirectoryStore, ReportStore};
pub use validation::{validate_section, CategorySchema, FieldIssue, ValidationOutcome, ValueKind};

use std::sync::Arc;

/// Extracts a full report with the default configuration.
pub async fn extract_brand_guidelines(
    model: Arc<dyn LanguageModel>,
    request: &ExtractionRequest,
) -> Result<ExtractionReport> {
    BrandExtractor::new(model, ExtractorConfig::default())
        .extract(request, None)
        .await
}
