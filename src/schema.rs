use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    VoiceAndTone,
    VisualIdentity,
    SocialMedia,
    Messaging,
    Guidelines,
}

impl Category {
    /// All categories in report order.
    pub const ALL: [Category; 5] = [
        Category::VoiceAndTone,
        Category::VisualIdentity,
        Category::SocialMedia,
        Category::Messaging,
        Category::Guidelines,
    ];

    /// Field name of this category in the assembled report.
    pub fn key(self) -> &'static str {
        match self {
            Category::VoiceAndTone => "voice_and_tone",
            Category::VisualIdentity => "visual_identity",
            Category::SocialMedia => "social_media",
            Category::Messaging => "messaging",
            Category::Guidelines => "guidelines",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::VoiceAndTone => "Voice & Tone",
            Category::VisualIdentity => "Visual Identity",
            Category::SocialMedia => "Social Media",
            Category::Messaging => "Messaging",
            Category::Guidelines => "Guidelines",
        }
    }

    /// JSON Schema of the typed record for this category, handed to the model as the target shape.
    pub fn json_schema(self) -> serde_json::Value {
        let schema = match self {
            Category::VoiceAndTone => schemars::schema_for!(VoiceAndTone),
            Category::VisualIdentity => schemars::schema_for!(VisualIdentity),
            Category::SocialMedia => schemars::schema_for!(SocialMedia),
            Category::Messaging => schemars::schema_for!(Messaging),
            Category::Guidelines => schemars::schema_for!(Guidelines),
        };
        serde_json::to_value(schema).unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A typed, schema-conformant record for one category.
pub trait BrandSection: Serialize + DeserializeOwned + JsonSchema + Send + 'static {
    const CATEGORY: Category;

    fn confidence_score(&self) -> f64;

    fn set_confidence_score(&mut self, score: f64);

    fn into_record(self) -> CategoryRecord;
}

macro_rules! brand_section {
    ($ty:ident, $variant:ident) => {
        impl BrandSection for $ty {
            const CATEGORY: Category = Category::$variant;

            fn confidence_score(&self) -> f64 {
                self.confidence_score
            }

            fn set_confidence_score(&mut self, score: f64) {
                self.confidence_score = score;
            }

            fn into_record(self) -> CategoryRecord {
                CategoryRecord::$variant(self)
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VoiceAndTone {
    #[schemars(
        description = "The headline brand voice in a few words (e.g. 'Bold and Direct'). Never 'unknown' or 'not specified'."
    )]
    pub primary_voice: String,

    #[schemars(description = "How the brand writes: sentence length, formality, point of view")]
    pub writing_style: String,

    #[schemars(description = "Adjectives describing the tone (e.g. 'Confident', 'Warm', 'Playful')")]
    pub tone_attributes: Vec<String>,

    #[schemars(description = "Words and phrases the brand prefers to use")]
    pub vocabulary_preferences: Vec<String>,

    #[schemars(description = "Words and phrases the brand must never use")]
    pub forbidden_words: Vec<String>,

    #[schemars(description = "Verbatim example sentences written in the brand voice")]
    pub example_phrases: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Longer free-text description of the voice")]
    pub voice_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Examples of how tone shifts by context")]
    pub tone_examples: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "How the brand approaches communication with its audience")]
    pub communication_approach: Option<String>,

    #[schemars(description = "Completeness of this extraction, 0.0 to 1.0")]
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColorEntry {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Hex code including '#', e.g. '#1A2B3C'")]
    pub hex: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rgb: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmyk: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pantone: Option<String>,

    #[schemars(description = "What the color is used for")]
    pub usage: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColorPalette {
    pub primary: Vec<ColorEntry>,

    pub secondary: Vec<ColorEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<Vec<ColorEntry>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral: Option<Vec<ColorEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PrimaryFont {
    pub family: String,

    #[schemars(description = "Available weights, e.g. ['Regular', 'Bold']")]
    pub weights: Vec<String>,

    pub usage_context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SecondaryFont {
    pub family: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Typography {
    pub primary_font: PrimaryFont,

    pub secondary_fonts: Vec<SecondaryFont>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImageryStyle {
    pub photography_guidelines: String,

    pub illustration_style: String,

    pub image_treatments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LogoGuidelines {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_space: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_rules: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VisualIdentity {
    pub color_palette: ColorPalette,

    pub typography: Typography,

    pub imagery_style: ImageryStyle,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoGuidelines>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_guidelines: Option<Vec<String>>,

    #[schemars(description = "Completeness of this extraction, 0.0 to 1.0")]
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlatformGuideline {
    pub tone_adjustments: String,

    pub content_types: Vec<String>,

    pub hashtag_strategy: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_specs: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SocialMedia {
    #[schemars(description = "Guidelines keyed by platform name (e.g. 'instagram', 'linkedin')")]
    pub platform_guidelines: BTreeMap<String, PlatformGuideline>,

    pub content_pillars: Vec<String>,

    pub engagement_rules: String,

    #[schemars(description = "Completeness of this extraction, 0.0 to 1.0")]
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Messaging {
    pub brand_story: String,

    #[schemars(description = "One or two sentence pitch for the brand")]
    pub elevator_pitch: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_mission: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_values: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_propositions: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_messages: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taglines: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_positioning: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_tone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_vision: Option<String>,

    #[schemars(description = "Completeness of this extraction, 0.0 to 1.0")]
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Guidelines {
    pub dos: Vec<String>,

    pub donts: Vec<String>,

    #[schemars(description = "Personality traits of the brand")]
    pub brand_personality: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_rules: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_standards: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistency_requirements: Option<Vec<String>>,

    #[schemars(description = "Completeness of this extraction, 0.0 to 1.0")]
    pub confidence_score: f64,
}

brand_section!(VoiceAndTone, VoiceAndTone);
brand_section!(VisualIdentity, VisualIdentity);
brand_section!(SocialMedia, SocialMedia);
brand_section!(Messaging, Messaging);
brand_section!(Guidelines, Guidelines);

/// A validated record of any category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryRecord {
    VoiceAndTone(VoiceAndTone),
    VisualIdentity(VisualIdentity),
    SocialMedia(SocialMedia),
    Messaging(Messaging),
    Guidelines(Guidelines),
}

impl CategoryRecord {
    pub fn category(&self) -> Category {
        match self {
            CategoryRecord::VoiceAndTone(_) => Category::VoiceAndTone,
            CategoryRecord::VisualIdentity(_) => Category::VisualIdentity,
            CategoryRecord::SocialMedia(_) => Category::SocialMedia,
            CategoryRecord::Messaging(_) => Category::Messaging,
            CategoryRecord::Guidelines(_) => Category::Guidelines,
        }
    }

    pub fn confidence_score(&self) -> f64 {
        match self {
            CategoryRecord::VoiceAndTone(r) => r.confidence_score,
            CategoryRecord::VisualIdentity(r) => r.confidence_score,
            CategoryRecord::SocialMedia(r) => r.confidence_score,
            CategoryRecord::Messaging(r) => r.confidence_score,
            CategoryRecord::Guidelines(r) => r.confidence_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_keys_follow_report_order() {
        let keys: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(
            keys,
            vec![
                "voice_and_tone",
                "visual_identity",
                "social_media",
                "messaging",
                "guidelines"
            ]
        );
    }

    #[test]
    fn test_schema_generation() {
        let schema = Category::VoiceAndTone.json_schema().to_string();
        assert!(schema.contains("primary_voice"));
        assert!(schema.contains("tone_attributes"));
        assert!(schema.contains("confidence_score"));

        let schema = Category::VisualIdentity.json_schema().to_string();
        assert!(schema.contains("color_palette"));
        assert!(schema.contains("secondary_fonts"));
    }

    #[test]
    fn test_optional_fields_are_omitted_when_absent() {
        let record = Guidelines {
            dos: vec!["Use plain language".to_string()],
            donts: vec![],
            brand_personality: vec!["Curious".to_string()],
            usage_rules: None,
            quality_standards: None,
            consistency_requirements: None,
            confidence_score: 0.7,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("usage_rules").is_none());
        assert_eq!(json["dos"][0], "Use plain language");

        let record = record.into_record();
        assert_eq!(record.category(), Category::Guidelines);
        assert_eq!(record.confidence_score(), 0.7);
    }
}
