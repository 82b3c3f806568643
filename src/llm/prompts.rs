// Prompts for the per-category brand guideline passes

use crate::schema::Category;

pub const SYSTEM_PROMPT_EXTRACTION: &str = r#"
You are a Brand Guidelines Extraction Specialist.

## YOUR MISSION
Read brand documents (style guides, brand books, pitch decks, marketing briefs) and turn what they
say about the brand into structured JSON for ONE category at a time.

## GROUND RULES
- Extract what the document states or clearly implies. Do NOT invent colors, fonts or slogans.
- Preserve the document's own wording for phrases, taglines and rules.
- Return ONLY valid JSON matching the target schema. No commentary, no markdown.
"#;

const EXTRACTION_RULES: &str = r#"
## EXTRACTION RULES (EXHAUSTIVE)
1. Capture EVERY relevant item in the document, not just the first few.
2. Look beyond dedicated sections: tone, values and rules are often scattered through examples,
   captions, headlines and footnotes.
3. If the document implies something without naming it (e.g. copy that is consistently short and
   punchy), describe it in your own words.
4. Never fill a field with "Unknown", "N/A", "Not specified" or similar. Leave arrays empty and
   describe what you can infer instead.
"#;

const ARRAY_RULES: &str = r#"
## ARRAY FORMATTING (STRICT)
Every list field MUST be a JSON array of strings.

✅ CORRECT:   "tone_attributes": ["Bold", "Confident", "Direct"]
❌ WRONG:     "tone_attributes": "Bold, Confident, Direct"
❌ WRONG:     "tone_attributes": "<value>Bold</value><value>Confident</value>"
❌ WRONG:     "tone_attributes": "Bold\nConfident"

If nothing is found for a list, return an empty array `[]`. Never omit a required list.
"#;

const CONFIDENCE_RULES: &str = r#"
## CONFIDENCE SCORING
Set `confidence_score` (a number between 0.0 and 1.0) to how completely the document covers this
category:
- 0.9 - 1.0: dedicated, detailed section for this category
- 0.6 - 0.8: clear information spread across the document
- 0.3 - 0.5: partial information, some fields inferred
- 0.0 - 0.2: almost nothing relevant found
`confidence_score` is REQUIRED. Always include it.
"#;

const VOICE_AND_TONE_INSTRUCTION: &str = r#"
## CATEGORY: VOICE & TONE
Extract how the brand sounds.
- `primary_voice`: the headline voice in 2-4 words (e.g. "Bold and Direct", "Warm and Expert").
- `writing_style`: sentence length, formality, person, punctuation habits.
- `tone_attributes`: adjectives describing the tone.
- `vocabulary_preferences`: words and phrases the brand favours.
- `forbidden_words`: words and phrases the brand avoids or bans.
- `example_phrases`: verbatim sentences that show the voice.
- Optional: `voice_description`, `tone_examples`, `communication_approach`.
"#;

const VISUAL_IDENTITY_INSTRUCTION: &str = r#"
## CATEGORY: VISUAL IDENTITY
Extract the brand's visual system.
- `color_palette`: `primary` and `secondary` colour lists (optional `accent`, `neutral`). Each colour
  has a `name` and `usage`, plus `hex`, `rgb`, `cmyk`, `pantone` and `usage_context` when given.
- `typography`: `primary_font` (`family`, `weights`, `usage_context`) and `secondary_fonts`.
- `imagery_style`: `photography_guidelines`, `illustration_style`, `image_treatments`.
- Optional: `logo` (`clear_space`, `minimum_size`, `variations`, `usage_rules`), `layout_guidelines`.
"#;

const SOCIAL_MEDIA_INSTRUCTION: &str = r#"
## CATEGORY: SOCIAL MEDIA
Extract how the brand behaves on social platforms.
- `platform_guidelines`: an object keyed by platform name (lowercase, e.g. "instagram"). Each entry
  has `tone_adjustments`, `content_types`, `hashtag_strategy` and optional `visual_specs`.
- `content_pillars`: the recurring themes the brand posts about.
- `engagement_rules`: how the brand replies, comments and handles criticism.
"#;

const MESSAGING_INSTRUCTION: &str = r#"
## CATEGORY: MESSAGING
Extract what the brand says about itself.
- `brand_story` and `elevator_pitch` are REQUIRED.
- Optional: `brand_mission`, `brand_vision`, `core_values`, `value_propositions`, `key_messages`,
  `taglines`, `brand_positioning`, `target_audience`, `messaging_tone`.
"#;

const GUIDELINES_INSTRUCTION: &str = r#"
## CATEGORY: GUIDELINES
Extract the brand's explicit rules.
- `dos`: things the brand should always do.
- `donts`: things the brand must never do.
- `brand_personality`: personality traits (e.g. "Curious", "Generous").
- Optional: `usage_rules`, `quality_standards`, `consistency_requirements`.
"#;

pub fn category_instruction(category: Category) -> &'static str {
    match category {
        Category::VoiceAndTone => VOICE_AND_TONE_INSTRUCTION,
        Category::VisualIdentity => VISUAL_IDENTITY_INSTRUCTION,
        Category::SocialMedia => SOCIAL_MEDIA_INSTRUCTION,
        Category::Messaging => MESSAGING_INSTRUCTION,
        Category::Guidelines => GUIDELINES_INSTRUCTION,
    }
}

/// Renders the user prompt for one pass. `document_excerpt` is used as given.
pub fn build_prompt(category_instruction: &str, document_excerpt: &str, brand_name: &str) -> String {
    format!(
        "Extract brand guidelines for \"{brand}\" from the document below.\n\
         {instruction}\n\
         {extraction}\n\
         {arrays}\n\
         {confidence}\n\
         ═══════════════════════════════════════════════════════════════════\n\
         📄 DOCUMENT: {brand}\n\
         ═══════════════════════════════════════════════════════════════════\n\
         {excerpt}\n\
         ═══════════════════════════════════════════════════════════════════\n\
         Return ONLY the JSON object for this category.",
        brand = brand_name,
        instruction = category_instruction.trim(),
        extraction = EXTRACTION_RULES,
        arrays = ARRAY_RULES,
        confidence = CONFIDENCE_RULES,
        excerpt = document_excerpt,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_inputs_and_rules() {
        let prompt = build_prompt(
            category_instruction(Category::Guidelines),
            "Always use sentence case.",
            "Acme",
        );
        assert!(prompt.contains("\"Acme\""));
        assert!(prompt.contains("Always use sentence case."));
        assert!(prompt.contains("## CATEGORY: GUIDELINES"));
        assert!(prompt.contains("ARRAY FORMATTING"));
        assert!(prompt.contains("CONFIDENCE SCORING"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_prompt("instr", "doc", "Brand");
        let b = build_prompt("instr", "doc", "Brand");
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_category_has_an_instruction() {
        for category in Category::ALL {
            assert!(category_instruction(category).contains("## CATEGORY"));
        }
    }
}
