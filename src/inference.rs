//! Fallback for the headline `primary_voice` attribute of [`VoiceAndTone`].

use log::info;

use crate::schema::VoiceAndTone;
use crate::utils::{first_sentence, title_case};

/// Used when nothing better can be derived from the record.
pub const DEFAULT_PRIMARY_VOICE: &str = "Brand Voice";

const PLACEHOLDERS: [&str; 7] = [
    "unknown",
    "<unknown>",
    "n/a",
    "not specified",
    "not mentioned",
    "not found",
    "none",
];

const MAX_SENTENCE_VOICE_CHARS: usize = 60;

/// Writing-style keywords in priority order, with the label each maps to.
const STYLE_LABELS: [(&[&str], &str); 4] = [
    (&["professional"], "Professional"),
    (&["friendly", "conversational"], "Friendly and Conversational"),
    (&["bold", "confident"], "Bold and Confident"),
    (&["authoritative"], "Authoritative"),
];

const PHRASE_LABELS: [(&[&str], &str); 3] = [
    (&["professional", "expert"], "Professional and Expert"),
    (&["friendly", "welcome"], "Friendly and Welcoming"),
    (&["bold", "innovative"], "Bold and Innovative"),
];

/// True when `voice` is blank or contains a placeholder such as "N/A" or "not specified".
pub fn is_placeholder_voice(voice: &str) -> bool {
    let lowered = voice.trim().to_lowercase();
    lowered.is_empty() || PLACEHOLDERS.iter().any(|p| lowered.contains(p))
}

/// Derives a primary voice from the other voice fields.
///
/// Tone attributes win over writing style, which wins over example phrases. The result is never
/// itself a placeholder.
pub fn infer_primary_voice(record: &VoiceAndTone) -> String {
    let attributes: Vec<&str> = record
        .tone_attributes
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    let writing_style = record.writing_style.trim();
    let phrases: Vec<&str> = record
        .example_phrases
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();

    let candidate = if !attributes.is_empty() {
        // "Bold", "Direct", "Playful" -> "Bold And Direct"
        title_case(&attributes[..attributes.len().min(2)].join(" and "))
    } else if !writing_style.is_empty() {
        voice_from_style(writing_style)
    } else if !phrases.is_empty() {
        match_label(&phrases.join(" "), &PHRASE_LABELS)
            .unwrap_or(DEFAULT_PRIMARY_VOICE)
            .to_string()
    } else {
        DEFAULT_PRIMARY_VOICE.to_string()
    };

    if is_placeholder_voice(&candidate) {
        DEFAULT_PRIMARY_VOICE.to_string()
    } else {
        candidate
    }
}

fn voice_from_style(writing_style: &str) -> String {
    if let Some(label) = match_label(writing_style, &STYLE_LABELS) {
        return label.to_string();
    }
    let sentence = first_sentence(writing_style);
    if !sentence.is_empty() && sentence.chars().count() < MAX_SENTENCE_VOICE_CHARS {
        sentence.to_string()
    } else {
        DEFAULT_PRIMARY_VOICE.to_string()
    }
}

fn match_label(text: &str, labels: &[(&[&str], &'static str)]) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    labels
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, label)| *label)
}

/// Replaces a blank or placeholder `primary_voice`. Returns whether the record changed.
pub fn apply_voice_fallback(record: &mut VoiceAndTone) -> bool {
    if !is_placeholder_voice(&record.primary_voice) {
        return false;
    }
    let inferred = infer_primary_voice(record);
    info!(
        "Primary voice '{}' replaced with inferred '{}'",
        record.primary_voice, inferred
    );
    record.primary_voice = inferred;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(primary_voice: &str) -> VoiceAndTone {
        VoiceAndTone {
            primary_voice: primary_voice.to_string(),
            writing_style: String::new(),
            tone_attributes: vec![],
            vocabulary_preferences: vec![],
            forbidden_words: vec![],
            example_phrases: vec![],
            voice_description: None,
            tone_examples: None,
            communication_approach: None,
            confidence_score: 0.5,
        }
    }

    #[test]
    fn test_placeholder_detection() {
        for voice in [
            "", "   ", "Unknown", "<UNKNOWN>", "N/A", "Not specified in document", "NONE",
            "not found", "Not mentioned",
        ] {
            assert!(is_placeholder_voice(voice), "{:?} should be a placeholder", voice);
        }
        assert!(!is_placeholder_voice("Bold and Direct"));
    }

    #[test]
    fn test_attributes_take_priority() {
        let mut voice = record("<UNKNOWN>");
        voice.tone_attributes = vec!["Bold".into(), "Direct".into(), "Playful".into()];
        voice.writing_style = "Professional and crisp".to_string();

        assert!(apply_voice_fallback(&mut voice));
        assert_eq!(voice.primary_voice, "Bold And Direct");
    }

    #[test]
    fn test_single_attribute() {
        let mut voice = record("");
        voice.tone_attributes = vec!["  warm ".into()];
        assert_eq!(infer_primary_voice(&voice), "Warm");
    }

    #[test]
    fn test_writing_style_keywords_in_priority_order() {
        let mut voice = record("n/a");
        voice.writing_style = "Bold yet professional copy".to_string();
        assert_eq!(infer_primary_voice(&voice), "Professional");

        voice.writing_style = "Conversational, confident".to_string();
        assert_eq!(infer_primary_voice(&voice), "Friendly and Conversational");

        voice.writing_style = "Confident statements".to_string();
        assert_eq!(infer_primary_voice(&voice), "Bold and Confident");

        voice.writing_style = "Authoritative research tone".to_string();
        assert_eq!(infer_primary_voice(&voice), "Authoritative");
    }

    #[test]
    fn test_writing_style_first_sentence() {
        let mut voice = record("none");
        voice.writing_style = "Warm and witty. Keep it short.".to_string();
        assert_eq!(infer_primary_voice(&voice), "Warm and witty");

        voice.writing_style =
            "Long flowing paragraphs that take their time to explain every single idea in depth"
                .to_string();
        assert_eq!(infer_primary_voice(&voice), DEFAULT_PRIMARY_VOICE);
    }

    #[test]
    fn test_example_phrases() {
        let mut voice = record("Not specified");
        voice.example_phrases = vec!["Welcome home.".into(), "Glad you're here".into()];
        assert_eq!(infer_primary_voice(&voice), "Friendly and Welcoming");

        voice.example_phrases = vec!["Our experts have you covered".into()];
        assert_eq!(infer_primary_voice(&voice), "Professional and Expert");

        voice.example_phrases = vec!["See you soon".into()];
        assert_eq!(infer_primary_voice(&voice), DEFAULT_PRIMARY_VOICE);
    }

    #[test]
    fn test_empty_record_falls_back_to_default() {
        assert_eq!(infer_primary_voice(&record("")), DEFAULT_PRIMARY_VOICE);
    }

    #[test]
    fn test_placeholder_candidates_are_rejected() {
        let mut voice = record("unknown");
        voice.tone_attributes = vec!["None".into()];
        assert_eq!(infer_primary_voice(&voice), DEFAULT_PRIMARY_VOICE);
    }

    #[test]
    fn test_real_voice_is_kept() {
        let mut voice = record("Calm and Precise");
        voice.tone_attributes = vec!["Bold".into()];
        assert!(!apply_voice_fallback(&mut voice));
        assert_eq!(voice.primary_voice, "Calm and Precise");
    }
}
