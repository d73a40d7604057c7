//! PlayAI voice catalog.
//!
//! This module provides the static catalog of selectable PlayAI voices,
//! including lookup helpers and the session default.

/// Metadata for a PlayAI voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Display name (e.g., "Angelo")
    pub name: &'static str,
    /// Accent description
    pub accent: &'static str,
    /// Human-readable language (e.g., "English (US)")
    pub language: &'static str,
    /// BCP-47-ish language code (e.g., "EN-US")
    pub language_code: &'static str,
    /// Voice identifier sent to the TTS service
    pub id: &'static str,
    /// URL of a short audio sample
    pub sample_url: &'static str,
    /// Voice gender
    pub gender: &'static str,
    /// Speaking style (e.g., "Conversational")
    pub style: &'static str,
}

/// Catalog of selectable voices.
///
/// The first entry is the session default. Voice selection is a
/// session-wide setting applied uniformly to all chunks of one run.
pub const VOICES: &[Voice] = &[
    Voice {
        name: "Angelo",
        accent: "american",
        language: "English (US)",
        language_code: "EN-US",
        id: "s3://voice-cloning-zero-shot/baf1ef41-36b6-428c-9bdf-50ba54682bd8/original/manifest.json",
        sample_url: "https://peregrine-samples.s3.us-east-1.amazonaws.com/parrot-samples/Angelo_Sample.wav",
        gender: "male",
        style: "Conversational",
    },
    Voice {
        name: "Deedee",
        accent: "american",
        language: "English (US)",
        language_code: "EN-US",
        id: "s3://voice-cloning-zero-shot/e040bd1b-f190-4bdb-83f0-75ef85b18f84/original/manifest.json",
        sample_url: "https://peregrine-samples.s3.us-east-1.amazonaws.com/parrot-samples/Deedee_Sample.wav",
        gender: "female",
        style: "Conversational",
    },
    Voice {
        name: "Jennifer",
        accent: "american",
        language: "English (US)",
        language_code: "EN-US",
        id: "s3://voice-cloning-zero-shot/801a663f-efd0-4254-98d0-5c175514c3e8/jennifer/manifest.json",
        sample_url: "https://peregrine-samples.s3.amazonaws.com/parrot-samples/jennifer.wav",
        gender: "female",
        style: "Conversational",
    },
    Voice {
        name: "Briggs",
        accent: "american",
        language: "English (US)",
        language_code: "EN-US",
        id: "s3://voice-cloning-zero-shot/71cdb799-1e03-41c6-8a05-f7cd55134b0b/original/manifest.json",
        sample_url: "https://peregrine-samples.s3.us-east-1.amazonaws.com/parrot-samples/Briggs_Sample.wav",
        gender: "male",
        style: "Narrative",
    },
    Voice {
        name: "Samara",
        accent: "american",
        language: "English (US)",
        language_code: "EN-US",
        id: "s3://voice-cloning-zero-shot/90217770-a480-4a91-b1ea-df00f4d4c29d/original/manifest.json",
        sample_url: "https://parrot-samples.s3.amazonaws.com/gargamel/Samara.wav",
        gender: "female",
        style: "Conversational",
    },
];

/// Returns the default voice (the first catalog entry).
pub fn default_voice() -> &'static Voice {
    &VOICES[0]
}

/// Looks up a voice by case-insensitive display name.
pub fn find_voice(name: &str) -> Option<&'static Voice> {
    VOICES
        .iter()
        .find(|voice| voice.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_not_empty() {
        assert_eq!(VOICES.len(), 5);
    }

    #[test]
    fn test_default_voice_is_first_entry() {
        assert_eq!(default_voice().name, "Angelo");
    }

    #[test]
    fn test_find_voice_case_insensitive() {
        assert_eq!(find_voice("briggs").unwrap().name, "Briggs");
        assert_eq!(find_voice("SAMARA").unwrap().name, "Samara");
    }

    #[test]
    fn test_find_voice_unknown_returns_none() {
        assert!(find_voice("nobody").is_none());
    }

    #[test]
    fn test_all_voices_have_identifiers() {
        for voice in VOICES {
            assert!(voice.id.starts_with("s3://"), "{} has no id", voice.name);
            assert!(!voice.name.is_empty());
        }
    }
}
