// WHY: declarative per-source layout table consumed by the single generic parser
// Each transcript differs only in indentation widths and annotation rules

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::reader::SourceEncoding;

/// Identifies which transcript a dialogue record came from.
/// Ordering follows release order and drives text concatenation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Movie1,
    Movie2,
    Movie3,
}

impl SourceId {
    pub const ALL: [SourceId; 3] = [SourceId::Movie1, SourceId::Movie2, SourceId::Movie3];

    /// 1-based position used as the column header in exported count tables
    pub fn number(&self) -> u8 {
        match self {
            SourceId::Movie1 => 1,
            SourceId::Movie2 => 2,
            SourceId::Movie3 => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SourceId::Movie1 => "The Fellowship of the Ring",
            SourceId::Movie2 => "The Two Towers",
            SourceId::Movie3 => "The Return of the King",
        }
    }

    /// Transcript file name expected in the input directory
    pub fn default_file_name(&self) -> &'static str {
        match self {
            SourceId::Movie1 => "the-fellowship-of-the-ring.txt",
            SourceId::Movie2 => "the-two-towers.txt",
            SourceId::Movie3 => "the-return-of-the-king.txt",
        }
    }

    /// Byte encoding of the shipped transcript; never inferred from content
    pub fn default_encoding(&self) -> SourceEncoding {
        match self {
            SourceId::Movie1 | SourceId::Movie2 => SourceEncoding::Utf8,
            SourceId::Movie3 => SourceEncoding::Windows1252,
        }
    }

    pub fn default_layout(&self) -> LayoutDescriptor {
        match self {
            SourceId::Movie1 => LayoutDescriptor {
                speaker_indent: 20,
                dialogue_indent: 10,
                annotation_pattern: PARENTHETICAL.to_string(),
                trailing_trim: None,
            },
            SourceId::Movie2 => LayoutDescriptor {
                speaker_indent: 28,
                dialogue_indent: 12,
                annotation_pattern: PARENTHETICAL.to_string(),
                trailing_trim: Some(2),
            },
            SourceId::Movie3 => LayoutDescriptor {
                speaker_indent: 24,
                dialogue_indent: 12,
                annotation_pattern: PARENTHETICAL_OR_VOICE_TAG.to_string(),
                trailing_trim: None,
            },
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "movie{}", self.number())
    }
}

/// Parenthetical annotation with any spaces in front of it, e.g. `GANDALF (V.O.)`
pub const PARENTHETICAL: &str = r" *\(.+\)";

/// Parenthetical, voice-over (`V/O`, also the `V/0` typo) or off-screen (`O.S.`) tag
pub const PARENTHETICAL_OR_VOICE_TAG: &str = r" *(\(.+\)|V/[0O]|O\.S\.*)";

/// Fixed-width layout rules for one transcript format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    /// Exact count of leading spaces before a speaker name
    pub speaker_indent: usize,
    /// Exact count of leading spaces before a dialogue line
    pub dialogue_indent: usize,
    /// Pattern whose matches are deleted from speaker names
    pub annotation_pattern: String,
    /// Characters dropped from the end of a speaker name after annotation removal
    #[serde(default)]
    pub trailing_trim: Option<usize>,
}

impl LayoutDescriptor {
    /// Reject layouts the parser cannot tell apart
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.speaker_indent == self.dialogue_indent {
            anyhow::bail!(
                "speaker_indent and dialogue_indent must differ (both are {})",
                self.speaker_indent
            );
        }
        Ok(())
    }
}
