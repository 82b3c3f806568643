//! Deterministic repair of schema-invalid model output.
//!
//! Repairs target the recurring ways models break array and score fields. Each rule turns the
//! matching issues into JSON Patch operations, applies them, and re-checks the schema before the
//! next rule runs.

use std::sync::OnceLock;

use json_patch::Patch;
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::schema::Category;
use crate::validation::{CategorySchema, FieldIssue, Shape, ValueKind, CONFIDENCE_FIELD};

/// Score assigned when the model omits `confidence_score` entirely.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairRule {
    /// Missing `confidence_score` becomes [`DEFAULT_CONFIDENCE`].
    DefaultConfidence,
    /// Missing required array becomes `[]`.
    EmptyArray,
    /// String returned where a list of strings was expected is split into items.
    SplitString,
}

impl RepairRule {
    /// Application order.
    pub const ORDER: [RepairRule; 3] = [
        RepairRule::DefaultConfidence,
        RepairRule::EmptyArray,
        RepairRule::SplitString,
    ];

    fn operations(self, schema: &CategorySchema, value: &Value, issues: &[FieldIssue]) -> Vec<Value> {
        let confidence_path = format!("/{}", CONFIDENCE_FIELD);
        issues
            .iter()
            .filter_map(|issue| match self {
                RepairRule::DefaultConfidence => (issue.path == confidence_path
                    && issue.received.is_absent())
                .then(|| json!({ "op": "add", "path": issue.path, "value": DEFAULT_CONFIDENCE })),
                RepairRule::EmptyArray => (issue.expected == ValueKind::Array
                    && issue.received.is_absent()
                    && matches!(
                        schema.shape_at(&issue.path),
                        Some(Shape::TextList | Shape::ObjectList(_))
                    ))
                .then(|| json!({ "op": "add", "path": issue.path, "value": [] })),
                RepairRule::SplitString => {
                    if issue.received != ValueKind::String
                        || !matches!(schema.shape_at(&issue.path), Some(Shape::TextList))
                    {
                        return None;
                    }
                    let current = value.pointer(&issue.path)?;
                    Some(json!({
                        "op": "replace",
                        "path": issue.path,
                        "value": coerce_string_list(current),
                    }))
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RepairOutcome {
    /// The repaired value passes the category schema.
    Repaired {
        value: Value,
        applied: Vec<RepairRule>,
    },
    /// Issues remain after every applicable rule ran.
    Unrepairable {
        value: Value,
        issues: Vec<FieldIssue>,
        applied: Vec<RepairRule>,
    },
}

/// Runs the repair rules in [`RepairRule::ORDER`] over `raw`, re-checking after each rule that
/// changed something, and stops as soon as the value conforms.
pub fn repair(category: Category, raw: &Value, issues: &[FieldIssue]) -> RepairOutcome {
    let schema = category.schema();
    let mut value = raw.clone();
    let mut remaining = issues.to_vec();
    let mut applied = Vec::new();

    if remaining.is_empty() {
        return RepairOutcome::Repaired { value, applied };
    }

    for rule in RepairRule::ORDER {
        let operations = rule.operations(schema, &value, &remaining);
        if operations.is_empty() {
            continue;
        }

        let paths: Vec<String> = operations
            .iter()
            .filter_map(|op| op["path"].as_str().map(str::to_string))
            .collect();

        if let Err(reason) = apply_operations(&mut value, operations) {
            warn!("{}: repair rule {:?} could not be applied: {}", category, rule, reason);
            break;
        }

        debug!("{}: applied {:?} to {}", category, rule, paths.join(", "));
        applied.push(rule);

        remaining = schema.check(&value);
        if remaining.is_empty() {
            return RepairOutcome::Repaired { value, applied };
        }
    }

    RepairOutcome::Unrepairable {
        value,
        issues: remaining,
        applied,
    }
}

fn apply_operations(value: &mut Value, operations: Vec<Value>) -> Result<(), String> {
    let patch: Patch = serde_json::from_value(Value::Array(operations)).map_err(|e| e.to_string())?;
    json_patch::patch(value, &patch).map_err(|e| e.to_string())
}

fn value_tag() -> &'static Regex {
    static VALUE_TAG: OnceLock<Regex> = OnceLock::new();
    VALUE_TAG.get_or_init(|| Regex::new(r"(?s)<value>(.*?)</value>").expect("valid value-tag pattern"))
}

/// Splits a string the model returned in place of a list.
///
/// Preference order: `<value>…</value>` fragments, then lines, then commas, then the whole
/// string as a single item. Blank lines and blank comma pieces are dropped.
pub fn split_string_list(text: &str) -> Vec<String> {
    let tagged: Vec<String> = value_tag()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect();
    if !tagged.is_empty() {
        return tagged;
    }

    let pieces: Vec<&str> = if text.contains('\n') {
        text.lines().collect()
    } else if text.contains(',') {
        text.split(',').collect()
    } else {
        vec![text]
    };

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerces a string into a list of strings; any other value is returned unchanged.
pub fn coerce_string_list(value: &Value) -> Value {
    match value {
        Value::String(text) => json!(split_string_list(text)),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationOutcome;

    fn guidelines_value() -> Value {
        json!({
            "dos": ["Lead with benefits"],
            "donts": ["Overpromise"],
            "brand_personality": ["Warm"],
            "confidence_score": 0.4
        })
    }

    #[test]
    fn test_split_tagged_values() {
        assert_eq!(
            split_string_list("<value>Bold</value>\n<value>Confident</value>"),
            vec!["Bold", "Confident"]
        );
        assert_eq!(
            split_string_list("<value>  Warm, human </value><value>Direct</value>"),
            vec!["Warm, human", "Direct"]
        );
    }

    #[test]
    fn test_split_newlines_before_commas() {
        assert_eq!(
            split_string_list("Bold, loud\n\n  Direct  \r\nPlayful"),
            vec!["Bold, loud", "Direct", "Playful"]
        );
    }

    #[test]
    fn test_split_commas() {
        assert_eq!(
            split_string_list("Bold, Confident, Direct"),
            vec!["Bold", "Confident", "Direct"]
        );
        assert_eq!(split_string_list("Bold,, ,Direct,"), vec!["Bold", "Direct"]);
    }

    #[test]
    fn test_split_single_value() {
        assert_eq!(split_string_list("  Bold  "), vec!["Bold"]);
        assert!(split_string_list("   ").is_empty());
    }

    #[test]
    fn test_coerce_leaves_arrays_untouched() {
        let list = json!(["Bold, Confident", "<value>Direct</value>"]);
        assert_eq!(coerce_string_list(&list), list);
        assert_eq!(
            coerce_string_list(&json!("Bold, Confident")),
            json!(["Bold", "Confident"])
        );
    }

    #[test]
    fn test_missing_confidence_defaults() {
        let mut raw = guidelines_value();
        raw.as_object_mut().unwrap().remove("confidence_score");
        let issues = Category::Guidelines.schema().check(&raw);

        match repair(Category::Guidelines, &raw, &issues) {
            RepairOutcome::Repaired { value, applied } => {
                assert_eq!(value["confidence_score"], json!(DEFAULT_CONFIDENCE));
                assert_eq!(applied, vec![RepairRule::DefaultConfidence]);
            }
            other => panic!("expected repair, got {:?}", other),
        }
    }

    #[test]
    fn test_null_confidence_defaults() {
        let mut raw = guidelines_value();
        raw["confidence_score"] = Value::Null;
        let issues = Category::Guidelines.schema().check(&raw);

        let outcome = repair(Category::Guidelines, &raw, &issues);
        assert!(matches!(outcome, RepairOutcome::Repaired { .. }));
    }

    #[test]
    fn test_rules_run_in_order_until_valid() {
        let raw = json!({
            "dos": "<value>Lead with benefits</value><value>Use numbers</value>",
            "brand_personality": "Warm\nCurious",
            "usage_rules": "Logo on white, never stretched"
        });
        let issues = Category::Guidelines.schema().check(&raw);

        match repair(Category::Guidelines, &raw, &issues) {
            RepairOutcome::Repaired { value, applied } => {
                assert_eq!(
                    applied,
                    vec![
                        RepairRule::DefaultConfidence,
                        RepairRule::EmptyArray,
                        RepairRule::SplitString
                    ]
                );
                assert_eq!(value["dos"], json!(["Lead with benefits", "Use numbers"]));
                assert_eq!(value["donts"], json!([]));
                assert_eq!(value["brand_personality"], json!(["Warm", "Curious"]));
                assert_eq!(
                    value["usage_rules"],
                    json!(["Logo on white", "never stretched"])
                );
                assert!(Category::Guidelines.validate(&value).is_valid());
            }
            other => panic!("expected repair, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_string_lists_are_split() {
        let raw = json!({
            "platform_guidelines": {
                "instagram": {
                    "tone_adjustments": "Playful",
                    "content_types": "Reels, Stories, Carousels",
                    "hashtag_strategy": "Two branded tags"
                }
            },
            "content_pillars": "Craft\nCommunity",
            "engagement_rules": "Reply within a day",
            "confidence_score": 0.7
        });
        let issues = Category::SocialMedia.schema().check(&raw);

        match repair(Category::SocialMedia, &raw, &issues) {
            RepairOutcome::Repaired { value, applied } => {
                assert_eq!(applied, vec![RepairRule::SplitString]);
                assert_eq!(
                    value["platform_guidelines"]["instagram"]["content_types"],
                    json!(["Reels", "Stories", "Carousels"])
                );
                assert_eq!(value["content_pillars"], json!(["Craft", "Community"]));
            }
            other => panic!("expected repair, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_object_lists_become_empty() {
        let raw = json!({
            "color_palette": { "primary": [{ "name": "Ink", "usage": "Body text" }] },
            "typography": {
                "primary_font": { "family": "Inter", "weights": ["Regular"], "usage_context": "All" }
            },
            "imagery_style": {
                "photography_guidelines": "Natural light",
                "illustration_style": "Flat",
                "image_treatments": []
            },
            "confidence_score": 0.9
        });
        let issues = Category::VisualIdentity.schema().check(&raw);

        match repair(Category::VisualIdentity, &raw, &issues) {
            RepairOutcome::Repaired { value, .. } => {
                assert_eq!(value["color_palette"]["secondary"], json!([]));
                assert_eq!(value["typography"]["secondary_fonts"], json!([]));
            }
            other => panic!("expected repair, got {:?}", other),
        }
    }

    #[test]
    fn test_unrepairable_issues_are_reported() {
        let mut raw = guidelines_value();
        raw["dos"] = json!(42);
        raw.as_object_mut().unwrap().remove("confidence_score");
        let issues = Category::Guidelines.schema().check(&raw);

        match repair(Category::Guidelines, &raw, &issues) {
            RepairOutcome::Unrepairable {
                value,
                issues,
                applied,
            } => {
                assert_eq!(applied, vec![RepairRule::DefaultConfidence]);
                assert_eq!(value["confidence_score"], json!(DEFAULT_CONFIDENCE));
                assert_eq!(
                    issues,
                    vec![FieldIssue::new("/dos", ValueKind::Array, ValueKind::Number)]
                );
            }
            other => panic!("expected unrepairable, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_string_is_not_invented() {
        let raw = json!({
            "brand_story": "Founded in a garage.",
            "confidence_score": 0.3
        });
        let issues = Category::Messaging.schema().check(&raw);

        let outcome = repair(Category::Messaging, &raw, &issues);
        assert!(matches!(outcome, RepairOutcome::Unrepairable { ref applied, .. } if applied.is_empty()));
    }

    #[test]
    fn test_repaired_value_validates_as_typed_record() {
        let raw = json!({
            "primary_voice": "Confident",
            "writing_style": "Plain",
            "tone_attributes": "Bold, Confident, Direct",
            "vocabulary_preferences": [],
            "forbidden_words": [],
            "example_phrases": []
        });
        let issues = Category::VoiceAndTone.schema().check(&raw);

        let RepairOutcome::Repaired { value, .. } = repair(Category::VoiceAndTone, &raw, &issues)
        else {
            panic!("expected repair");
        };
        match Category::VoiceAndTone.validate(&value) {
            ValidationOutcome::Valid(record) => assert_eq!(record.confidence_score(), 0.5),
            ValidationOutcome::Invalid(issues) => panic!("still invalid: {:?}", issues),
        }
    }
}
