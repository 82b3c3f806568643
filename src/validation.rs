//! Typed schema descriptors for each category and the validation walk over raw model output.
//!
//! Validation never fails with an error: a value either becomes a typed record or yields the
//! full list of [`FieldIssue`]s found in one walk, so the repair engine can see everything at once.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{
    BrandSection, Category, CategoryRecord, Guidelines, Messaging, SocialMedia, VisualIdentity,
    VoiceAndTone,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Missing,
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: Option<&Value>) -> Self {
        match value {
            None => ValueKind::Missing,
            Some(Value::Null) => ValueKind::Null,
            Some(Value::Bool(_)) => ValueKind::Boolean,
            Some(Value::Number(_)) => ValueKind::Number,
            Some(Value::String(_)) => ValueKind::String,
            Some(Value::Array(_)) => ValueKind::Array,
            Some(Value::Object(_)) => ValueKind::Object,
        }
    }

    /// Absent or explicitly null.
    pub fn is_absent(self) -> bool {
        matches!(self, ValueKind::Missing | ValueKind::Null)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Missing => "missing",
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// One schema violation, located by JSON pointer (e.g. `/typography/primary_font/weights`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub path: String,
    pub expected: ValueKind,
    pub received: ValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, expected: ValueKind, received: ValueKind) -> Self {
        Self {
            path: path.into(),
            expected,
            received,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(
            f,
            "{}: expected {}, received {}",
            path, self.expected, self.received
        )?;
        if let Some(message) = &self.message {
            write!(f, " ({})", message)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome<T = CategoryRecord> {
    Valid(T),
    Invalid(Vec<FieldIssue>),
}

impl<T> ValidationOutcome<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValidationOutcome<U> {
        match self {
            ValidationOutcome::Valid(value) => ValidationOutcome::Valid(f(value)),
            ValidationOutcome::Invalid(issues) => ValidationOutcome::Invalid(issues),
        }
    }
}

#[derive(Debug)]
pub enum Shape {
    Text,
    TextList,
    /// Number in `[0, 1]`.
    Score,
    Object(&'static [FieldSpec]),
    ObjectList(&'static [FieldSpec]),
    /// Object with arbitrary keys whose values all share one shape.
    ObjectMap(&'static [FieldSpec]),
}

impl Shape {
    pub fn kind(&self) -> ValueKind {
        match self {
            Shape::Text => ValueKind::String,
            Shape::TextList | Shape::ObjectList(_) => ValueKind::Array,
            Shape::Score => ValueKind::Number,
            Shape::Object(_) | Shape::ObjectMap(_) => ValueKind::Object,
        }
    }
}

#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
}

impl FieldSpec {
    const fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
        }
    }

    const fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
        }
    }
}

#[derive(Debug)]
pub struct CategorySchema {
    pub category: Category,
    pub fields: &'static [FieldSpec],
}

pub const CONFIDENCE_FIELD: &str = "confidence_score";

const CONFIDENCE: FieldSpec = FieldSpec::required(CONFIDENCE_FIELD, Shape::Score);

const VOICE_AND_TONE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("primary_voice", Shape::Text),
    FieldSpec::required("writing_style", Shape::Text),
    FieldSpec::required("tone_attributes", Shape::TextList),
    FieldSpec::required("vocabulary_preferences", Shape::TextList),
    FieldSpec::required("forbidden_words", Shape::TextList),
    FieldSpec::required("example_phrases", Shape::TextList),
    FieldSpec::optional("voice_description", Shape::Text),
    FieldSpec::optional("tone_examples", Shape::TextList),
    FieldSpec::optional("communication_approach", Shape::Text),
    CONFIDENCE,
];

const COLOR_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", Shape::Text),
    FieldSpec::optional("hex", Shape::Text),
    FieldSpec::optional("rgb", Shape::Text),
    FieldSpec::optional("cmyk", Shape::Text),
    FieldSpec::optional("pantone", Shape::Text),
    FieldSpec::required("usage", Shape::Text),
    FieldSpec::optional("usage_context", Shape::Text),
];

const PALETTE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("primary", Shape::ObjectList(COLOR_FIELDS)),
    FieldSpec::required("secondary", Shape::ObjectList(COLOR_FIELDS)),
    FieldSpec::optional("accent", Shape::ObjectList(COLOR_FIELDS)),
    FieldSpec::optional("neutral", Shape::ObjectList(COLOR_FIELDS)),
];

const PRIMARY_FONT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("family", Shape::Text),
    FieldSpec::required("weights", Shape::TextList),
    FieldSpec::required("usage_context", Shape::Text),
];

const SECONDARY_FONT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("family", Shape::Text),
    FieldSpec::optional("weights", Shape::TextList),
    FieldSpec::optional("usage_context", Shape::Text),
];

const TYPOGRAPHY_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("primary_font", Shape::Object(PRIMARY_FONT_FIELDS)),
    FieldSpec::required("secondary_fonts", Shape::ObjectList(SECONDARY_FONT_FIELDS)),
];

const IMAGERY_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("photography_guidelines", Shape::Text),
    FieldSpec::required("illustration_style", Shape::Text),
    FieldSpec::required("image_treatments", Shape::TextList),
];

const LOGO_FIELDS: &[FieldSpec] = &[
    FieldSpec::optional("clear_space", Shape::Text),
    FieldSpec::optional("minimum_size", Shape::Text),
    FieldSpec::optional("variations", Shape::TextList),
    FieldSpec::optional("usage_rules", Shape::TextList),
];

const VISUAL_IDENTITY_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("color_palette", Shape::Object(PALETTE_FIELDS)),
    FieldSpec::required("typography", Shape::Object(TYPOGRAPHY_FIELDS)),
    FieldSpec::required("imagery_style", Shape::Object(IMAGERY_FIELDS)),
    FieldSpec::optional("logo", Shape::Object(LOGO_FIELDS)),
    FieldSpec::optional("layout_guidelines", Shape::TextList),
    CONFIDENCE,
];

const PLATFORM_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("tone_adjustments", Shape::Text),
    FieldSpec::required("content_types", Shape::TextList),
    FieldSpec::required("hashtag_strategy", Shape::Text),
    FieldSpec::optional("visual_specs", Shape::Text),
];

const SOCIAL_MEDIA_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("platform_guidelines", Shape::ObjectMap(PLATFORM_FIELDS)),
    FieldSpec::required("content_pillars", Shape::TextList),
    FieldSpec::required("engagement_rules", Shape::Text),
    CONFIDENCE,
];

const MESSAGING_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("brand_story", Shape::Text),
    FieldSpec::required("elevator_pitch", Shape::Text),
    FieldSpec::optional("brand_mission", Shape::Text),
    FieldSpec::optional("core_values", Shape::TextList),
    FieldSpec::optional("value_propositions", Shape::TextList),
    FieldSpec::optional("key_messages", Shape::TextList),
    FieldSpec::optional("taglines", Shape::TextList),
    FieldSpec::optional("brand_positioning", Shape::Text),
    FieldSpec::optional("target_audience", Shape::Text),
    FieldSpec::optional("messaging_tone", Shape::Text),
    FieldSpec::optional("brand_vision", Shape::Text),
    CONFIDENCE,
];

const GUIDELINES_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("dos", Shape::TextList),
    FieldSpec::required("donts", Shape::TextList),
    FieldSpec::required("brand_personality", Shape::TextList),
    FieldSpec::optional("usage_rules", Shape::TextList),
    FieldSpec::optional("quality_standards", Shape::TextList),
    FieldSpec::optional("consistency_requirements", Shape::TextList),
    CONFIDENCE,
];

static VOICE_AND_TONE_SCHEMA: CategorySchema = CategorySchema {
    category: Category::VoiceAndTone,
    fields: VOICE_AND_TONE_FIELDS,
};

static VISUAL_IDENTITY_SCHEMA: CategorySchema = CategorySchema {
    category: Category::VisualIdentity,
    fields: VISUAL_IDENTITY_FIELDS,
};

static SOCIAL_MEDIA_SCHEMA: CategorySchema = CategorySchema {
    category: Category::SocialMedia,
    fields: SOCIAL_MEDIA_FIELDS,
};

static MESSAGING_SCHEMA: CategorySchema = CategorySchema {
    category: Category::Messaging,
    fields: MESSAGING_FIELDS,
};

static GUIDELINES_SCHEMA: CategorySchema = CategorySchema {
    category: Category::Guidelines,
    fields: GUIDELINES_FIELDS,
};

impl CategorySchema {
    pub fn for_category(category: Category) -> &'static CategorySchema {
        match category {
            Category::VoiceAndTone => &VOICE_AND_TONE_SCHEMA,
            Category::VisualIdentity => &VISUAL_IDENTITY_SCHEMA,
            Category::SocialMedia => &SOCIAL_MEDIA_SCHEMA,
            Category::Messaging => &MESSAGING_SCHEMA,
            Category::Guidelines => &GUIDELINES_SCHEMA,
        }
    }

    /// Collects every issue in `value`. An empty result means the value conforms.
    pub fn check(&self, value: &Value) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        match value.as_object() {
            Some(object) => check_fields(self.fields, object, "", &mut issues),
            None => issues.push(FieldIssue::new(
                "",
                ValueKind::Object,
                ValueKind::of(Some(value)),
            )),
        }
        issues
    }

    /// Declared shape of the field at `pointer`, walking through nested objects, list items and map
    /// entries. Returns `None` for paths the schema does not declare.
    pub fn shape_at(&self, pointer: &str) -> Option<&'static Shape> {
        let segments: Vec<&str> = pointer.strip_prefix('/')?.split('/').collect();
        resolve(self.fields, &segments)
    }
}

fn resolve(fields: &'static [FieldSpec], segments: &[&str]) -> Option<&'static Shape> {
    let (first, rest) = segments.split_first()?;
    let spec = fields.iter().find(|f| f.name == *first)?;
    descend(&spec.shape, rest)
}

fn descend(shape: &'static Shape, segments: &[&str]) -> Option<&'static Shape> {
    if segments.is_empty() {
        return Some(shape);
    }
    match shape {
        Shape::Object(fields) => resolve(fields, segments),
        // First segment is the list index or map key.
        Shape::ObjectList(fields) | Shape::ObjectMap(fields) => resolve(fields, &segments[1..]),
        _ => None,
    }
}

fn check_fields(
    fields: &[FieldSpec],
    object: &Map<String, Value>,
    base: &str,
    issues: &mut Vec<FieldIssue>,
) {
    for spec in fields {
        let path = format!("{}/{}", base, spec.name);
        match object.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    issues.push(FieldIssue::new(
                        path,
                        spec.shape.kind(),
                        ValueKind::of(object.get(spec.name)),
                    ));
                }
            }
            Some(value) => check_shape(&spec.shape, value, &path, issues),
        }
    }
}

fn check_shape(shape: &Shape, value: &Value, path: &str, issues: &mut Vec<FieldIssue>) {
    let mismatch = |issues: &mut Vec<FieldIssue>| {
        issues.push(FieldIssue::new(path, shape.kind(), ValueKind::of(Some(value))));
    };

    match shape {
        Shape::Text => {
            if !value.is_string() {
                mismatch(issues);
            }
        }
        Shape::Score => match value.as_f64() {
            Some(score) if (0.0..=1.0).contains(&score) => {}
            Some(score) => issues.push(
                FieldIssue::new(path, ValueKind::Number, ValueKind::Number)
                    .with_message(format!("{} is outside [0, 1]", score)),
            ),
            None => mismatch(issues),
        },
        Shape::TextList => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        issues.push(FieldIssue::new(
                            format!("{}/{}", path, i),
                            ValueKind::String,
                            ValueKind::of(Some(item)),
                        ));
                    }
                }
            }
            None => mismatch(issues),
        },
        Shape::Object(fields) => match value.as_object() {
            Some(object) => check_fields(fields, object, path, issues),
            None => mismatch(issues),
        },
        Shape::ObjectList(fields) => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{}/{}", path, i);
                    match item.as_object() {
                        Some(object) => check_fields(fields, object, &item_path, issues),
                        None => issues.push(FieldIssue::new(
                            item_path,
                            ValueKind::Object,
                            ValueKind::of(Some(item)),
                        )),
                    }
                }
            }
            None => mismatch(issues),
        },
        Shape::ObjectMap(fields) => match value.as_object() {
            Some(entries) => {
                for (key, entry) in entries {
                    let entry_path = format!("{}/{}", path, escape_pointer_segment(key));
                    match entry.as_object() {
                        Some(object) => check_fields(fields, object, &entry_path, issues),
                        None => issues.push(FieldIssue::new(
                            entry_path,
                            ValueKind::Object,
                            ValueKind::of(Some(entry)),
                        )),
                    }
                }
            }
            None => mismatch(issues),
        },
    }
}

/// RFC 6901 escaping for map keys used as pointer segments.
fn escape_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Validates `value` as the typed record `S`.
pub fn validate_section<S: BrandSection>(value: &Value) -> ValidationOutcome<S> {
    let issues = CategorySchema::for_category(S::CATEGORY).check(value);
    if !issues.is_empty() {
        return ValidationOutcome::Invalid(issues);
    }

    match S::deserialize(value) {
        Ok(record) => ValidationOutcome::Valid(record),
        Err(e) => ValidationOutcome::Invalid(vec![FieldIssue::new(
            "",
            ValueKind::Object,
            ValueKind::of(Some(value)),
        )
        .with_message(e.to_string())]),
    }
}

impl Category {
    pub fn schema(self) -> &'static CategorySchema {
        CategorySchema::for_category(self)
    }

    pub fn validate(self, value: &Value) -> ValidationOutcome {
        match self {
            Category::VoiceAndTone => {
                validate_section::<VoiceAndTone>(value).map(BrandSection::into_record)
            }
            Category::VisualIdentity => {
                validate_section::<VisualIdentity>(value).map(BrandSection::into_record)
            }
            Category::SocialMedia => {
                validate_section::<SocialMedia>(value).map(BrandSection::into_record)
            }
            Category::Messaging => {
                validate_section::<Messaging>(value).map(BrandSection::into_record)
            }
            Category::Guidelines => {
                validate_section::<Guidelines>(value).map(BrandSection::into_record)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn voice_value() -> Value {
        json!({
            "primary_voice": "Bold and Direct",
            "writing_style": "Short sentences, active voice.",
            "tone_attributes": ["Bold", "Direct"],
            "vocabulary_preferences": ["build", "ship"],
            "forbidden_words": ["synergy"],
            "example_phrases": ["Let's build it."],
            "confidence_score": 0.8
        })
    }

    #[test]
    fn test_valid_voice_and_tone() {
        let outcome = Category::VoiceAndTone.validate(&voice_value());
        match outcome {
            ValidationOutcome::Valid(CategoryRecord::VoiceAndTone(record)) => {
                assert_eq!(record.primary_voice, "Bold and Direct");
                assert_eq!(record.tone_attributes, vec!["Bold", "Direct"]);
                assert!(record.voice_description.is_none());
            }
            other => panic!("expected valid voice record, got {:?}", other),
        }
    }

    #[test]
    fn test_collects_all_issues_in_one_walk() {
        let mut value = voice_value();
        value["tone_attributes"] = json!("Bold, Direct");
        value.as_object_mut().unwrap().remove("forbidden_words");
        value.as_object_mut().unwrap().remove("confidence_score");

        let issues = VOICE_AND_TONE_SCHEMA.check(&value);
        assert_eq!(
            issues,
            vec![
                FieldIssue::new("/tone_attributes", ValueKind::Array, ValueKind::String),
                FieldIssue::new("/forbidden_words", ValueKind::Array, ValueKind::Missing),
                FieldIssue::new("/confidence_score", ValueKind::Number, ValueKind::Missing),
            ]
        );
    }

    #[test]
    fn test_confidence_out_of_range_is_an_issue() {
        let mut value = voice_value();
        value["confidence_score"] = json!(1.5);

        let issues = VOICE_AND_TONE_SCHEMA.check(&value);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "/confidence_score");
        assert!(issues[0].message.as_deref().unwrap().contains("outside"));
    }

    #[test]
    fn test_optional_null_is_accepted() {
        let mut value = voice_value();
        value["voice_description"] = Value::Null;
        assert!(Category::VoiceAndTone.validate(&value).is_valid());
    }

    #[test]
    fn test_nested_paths_for_visual_identity() {
        let value = json!({
            "color_palette": {
                "primary": [{ "name": "Ink", "hex": "#111111" }],
                "secondary": []
            },
            "typography": {
                "primary_font": { "family": "Inter", "weights": "Regular, Bold", "usage_context": "All copy" },
                "secondary_fonts": [{ "family": "Lora" }]
            },
            "imagery_style": {
                "photography_guidelines": "Natural light",
                "illustration_style": "Flat"
            },
            "confidence_score": 0.6
        });

        let issues = VISUAL_IDENTITY_SCHEMA.check(&value);
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/color_palette/primary/0/usage",
                "/typography/primary_font/weights",
                "/imagery_style/image_treatments",
            ]
        );
    }

    #[test]
    fn test_platform_map_entries_are_checked() {
        let value = json!({
            "platform_guidelines": {
                "instagram": {
                    "tone_adjustments": "Playful",
                    "content_types": "Reels\nStories",
                    "hashtag_strategy": "Two branded tags"
                },
                "x/twitter": "short posts"
            },
            "content_pillars": ["Craft"],
            "engagement_rules": "Reply within a day",
            "confidence_score": 0.5
        });

        let issues = SOCIAL_MEDIA_SCHEMA.check(&value);
        assert_eq!(
            issues,
            vec![
                FieldIssue::new(
                    "/platform_guidelines/instagram/content_types",
                    ValueKind::Array,
                    ValueKind::String
                ),
                FieldIssue::new(
                    "/platform_guidelines/x~1twitter",
                    ValueKind::Object,
                    ValueKind::String
                ),
            ]
        );
    }

    #[test]
    fn test_shape_at_resolves_nested_and_keyed_paths() {
        let social = CategorySchema::for_category(Category::SocialMedia);
        assert!(matches!(
            social.shape_at("/platform_guidelines/linkedin/content_types"),
            Some(Shape::TextList)
        ));
        assert!(matches!(social.shape_at("/engagement_rules"), Some(Shape::Text)));
        assert!(social.shape_at("/unknown_field").is_none());

        let visual = CategorySchema::for_category(Category::VisualIdentity);
        assert!(matches!(
            visual.shape_at("/typography/secondary_fonts/2/weights"),
            Some(Shape::TextList)
        ));
        assert!(matches!(
            visual.shape_at("/color_palette/primary"),
            Some(Shape::ObjectList(_))
        ));
    }

    #[test]
    fn test_non_object_root() {
        let outcome = Category::Guidelines.validate(&json!(["dos"]));
        assert_eq!(
            outcome,
            ValidationOutcome::Invalid(vec![FieldIssue::new(
                "",
                ValueKind::Object,
                ValueKind::Array
            )])
        );
    }
}
