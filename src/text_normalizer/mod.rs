// WHY: per-speaker text cleaning shared by the pipeline and external callers
// Normalization itself is pure; the TextNormalizer only carries the stopword list

pub mod normalization;
pub mod stopwords;

pub use normalization::{normalize_text, normalize_text_into};
pub use stopwords::{StopwordFilter, ENGLISH_STOPWORDS};

use crate::characters::SpeakerProfile;
use tracing::debug;

/// A speaker's cleaned dialogue, ready for term counting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerDocument {
    pub speaker: String,
    pub text: String,
}

/// Applies normalization with a fixed stopword list
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    stopwords: StopwordFilter,
}

impl TextNormalizer {
    pub fn new(stopwords: StopwordFilter) -> Self {
        Self { stopwords }
    }

    pub fn stopwords(&self) -> &StopwordFilter {
        &self.stopwords
    }

    pub fn normalize(&self, text: &str) -> String {
        normalize_text(text, &self.stopwords)
    }

    /// Clean every profile's concatenated text, preserving profile order
    pub fn normalize_profiles(&self, profiles: &[SpeakerProfile]) -> Vec<SpeakerDocument> {
        let mut buffer = String::new();
        profiles
            .iter()
            .map(|profile| {
                normalize_text_into(&profile.concatenated_text, &self.stopwords, &mut buffer);
                debug!(
                    speaker = %profile.canonical_name,
                    raw_len = profile.concatenated_text.len(),
                    clean_len = buffer.len(),
                    "Normalized speaker text"
                );
                SpeakerDocument {
                    speaker: profile.canonical_name.clone(),
                    text: buffer.clone(),
                }
            })
            .collect()
    }
}
