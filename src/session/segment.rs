use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two fixed language tags a segment can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
}

impl Language {
    /// Wire value sent as `language_code`.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Zh => "Mandarin",
        }
    }

    /// Transcript line prefix.
    pub fn tag(self) -> &'static str {
        match self {
            Language::En => "[EN]",
            Language::Zh => "[ZH]",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Zh,
            Language::Zh => Language::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One uploaded (or upload-attempted) span of recorded audio.
///
/// Append-only: once pushed onto the transcript list a segment is never
/// mutated. `id`, `text` and `audio_path` come from the upload response
/// and stay `None` when the upload failed.
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub id: Option<String>,
    pub language: Language,
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: Option<String>,
    pub audio_path: Option<String>,
    /// RFC 3339 timestamp of when the upload round-trip finished.
    pub received_at: String,
}

impl Segment {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_the_two_tags() {
        assert_eq!(Language::En.toggled(), Language::Zh);
        assert_eq!(Language::Zh.toggled(), Language::En);
        assert_eq!(Language::En.toggled().toggled(), Language::En);
    }

    #[test]
    fn codes_match_wire_contract() {
        assert_eq!(Language::En.code(), "en");
        assert_eq!(Language::Zh.code(), "zh");
        assert_eq!(Language::En.to_string(), "en");
    }

    #[test]
    fn language_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Language::Zh).expect("serialize"),
            "\"zh\""
        );
    }

    #[test]
    fn duration_is_end_minus_start() {
        let seg = Segment {
            id: None,
            language: Language::En,
            start_ms: 3000,
            end_ms: 5000,
            text: None,
            audio_path: None,
            received_at: String::new(),
        };
        assert_eq!(seg.duration_ms(), 2000);
    }
}
