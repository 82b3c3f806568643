//! Upward normalization of self-reported confidence scores.
//!
//! Models tend to under-report confidence on records they filled well. The score is raised based
//! on how many fields actually carry content; it is never lowered.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::report::ExtractionMetadata;
use crate::schema::{BrandSection, Category};
use crate::validation::CONFIDENCE_FIELD;

const FULL_CONFIDENCE_FIELDS: usize = 3;
const BOOSTED_CONFIDENCE_FIELDS: usize = 2;
const BOOST_CEILING: f64 = 0.8;
const BOOST: f64 = 0.3;

/// Not null, not blank text, not an empty list, not an empty object.
pub fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Number of top-level populated fields, not counting `confidence_score`.
pub fn count_populated_fields(record: &Value) -> usize {
    record
        .as_object()
        .map(|fields| {
            fields
                .iter()
                .filter(|(name, value)| name.as_str() != CONFIDENCE_FIELD && is_populated(value))
                .count()
        })
        .unwrap_or(0)
}

pub fn normalize_score(score: f64, populated_fields: usize) -> f64 {
    if populated_fields >= FULL_CONFIDENCE_FIELDS && score < 1.0 {
        1.0
    } else if populated_fields >= BOOSTED_CONFIDENCE_FIELDS && score < BOOST_CEILING {
        (score + BOOST).min(1.0)
    } else {
        score
    }
}

/// Normalized confidence for `record`, given its self-reported `score`.
pub fn normalize<R: Serialize>(score: f64, record: &R) -> f64 {
    let populated = serde_json::to_value(record)
        .map(|value| count_populated_fields(&value))
        .unwrap_or(0);
    normalize_score(score, populated)
}

/// Normalizes each category's score in place and remembers the original for auditing.
#[derive(Debug, Default)]
pub struct ConfidenceLedger {
    original: BTreeMap<Category, f64>,
    normalized: BTreeMap<Category, f64>,
}

impl ConfidenceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize_section<S: BrandSection>(&mut self, section: &mut S) {
        let original = section.confidence_score();
        let normalized = normalize(original, section);
        if normalized != original {
            debug!(
                "{}: confidence normalized {:.2} -> {:.2}",
                S::CATEGORY,
                original,
                normalized
            );
        }
        section.set_confidence_score(normalized);
        self.original.insert(S::CATEGORY, original);
        self.normalized.insert(S::CATEGORY, normalized);
    }

    /// Unweighted mean of the normalized scores recorded so far.
    pub fn average(&self) -> f64 {
        if self.normalized.is_empty() {
            return 0.0;
        }
        self.normalized.values().sum::<f64>() / self.normalized.len() as f64
    }

    pub fn into_metadata(self) -> ExtractionMetadata {
        let average_confidence = self.average();
        ExtractionMetadata {
            confidence_scores: self.normalized,
            average_confidence,
            original_confidence_scores: self.original,
        }
    }
}
