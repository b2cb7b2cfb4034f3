// WHY: one generic fixed-width parser driven by LayoutDescriptor
// Speaker lines open a record, dialogue lines extend it, everything else is skipped

use anyhow::{Context, Result};
use regex_automata::meta::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::layout::{LayoutDescriptor, SourceId};

/// One uttered block of dialogue in appearance order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueRecord {
    pub speaker: String,
    pub text: String,
    pub source_id: SourceId,
}

/// Line classification counts reported back to the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub lines_total: u64,
    pub speaker_lines: u64,
    pub dialogue_lines: u64,
    /// Dialogue lines seen while no record was open
    pub orphan_dialogue_lines: u64,
    /// Speaker lines whose name was empty once annotations were removed
    pub empty_speaker_lines: u64,
    /// Non-blank lines matching neither pattern (stage directions, headings)
    pub ignored_lines: u64,
}

impl ParseStats {
    /// Lines that looked like script content but could not be attributed
    pub fn skipped_lines(&self) -> u64 {
        self.orphan_dialogue_lines + self.empty_speaker_lines
    }
}

/// Records and diagnostics for a single transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTranscript {
    pub source_id: SourceId,
    pub records: Vec<DialogueRecord>,
    pub stats: ParseStats,
}

/// Compiled form of a LayoutDescriptor
pub struct ScriptParser {
    layout: LayoutDescriptor,
    speaker_line: Regex,
    dialogue_line: Regex,
    annotation: Regex,
}

impl ScriptParser {
    /// Compile the layout's line and annotation patterns
    pub fn new(layout: LayoutDescriptor) -> Result<Self> {
        layout.validate()?;

        // WHY: `^ {n}\w` rejects both shorter and longer indents since position n must be a word char
        let speaker_line = Regex::new(&format!(r"^ {{{}}}\w", layout.speaker_indent))
            .context("Failed to compile speaker line pattern")?;
        let dialogue_line = Regex::new(&format!(r"^ {{{}}}[\w.]", layout.dialogue_indent))
            .context("Failed to compile dialogue line pattern")?;
        let annotation = Regex::new(&layout.annotation_pattern).with_context(|| {
            format!("Invalid annotation pattern: {}", layout.annotation_pattern)
        })?;

        Ok(Self {
            layout,
            speaker_line,
            dialogue_line,
            annotation,
        })
    }

    pub fn layout(&self) -> &LayoutDescriptor {
        &self.layout
    }

    /// Parse transcript lines into dialogue records
    pub fn parse<I>(&self, lines: I, source_id: SourceId) -> ParsedTranscript
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut records = Vec::new();
        let mut stats = ParseStats::default();
        let mut current: Option<DialogueRecord> = None;

        for line in lines {
            let line = line.as_ref();
            stats.lines_total += 1;

            if self.speaker_line.is_match(line) {
                stats.speaker_lines += 1;
                if let Some(record) = current.take() {
                    records.push(record);
                }

                let speaker = self.speaker_name(line);
                if speaker.trim().is_empty() {
                    stats.empty_speaker_lines += 1;
                    debug!("Speaker line {} has no name after annotation removal", stats.lines_total);
                    continue;
                }

                current = Some(DialogueRecord {
                    speaker,
                    text: String::new(),
                    source_id,
                });
            } else if self.dialogue_line.is_match(line) {
                stats.dialogue_lines += 1;
                match current.as_mut() {
                    Some(record) => {
                        let content = line[self.layout.dialogue_indent..].trim();
                        if !record.text.is_empty() {
                            record.text.push(' ');
                        }
                        record.text.push_str(content);
                    }
                    None => stats.orphan_dialogue_lines += 1,
                }
            } else if !line.trim().is_empty() {
                stats.ignored_lines += 1;
            }
        }

        if let Some(record) = current.take() {
            records.push(record);
        }

        info!(
            source = %source_id,
            records = records.len(),
            lines = stats.lines_total,
            ignored = stats.ignored_lines,
            skipped = stats.skipped_lines(),
            "Parsed transcript"
        );

        ParsedTranscript {
            source_id,
            records,
            stats,
        }
    }

    /// Extract the speaker name from a line already known to match the speaker pattern
    fn speaker_name(&self, line: &str) -> String {
        // WHY: the indent is ASCII spaces, so the byte offset lands on a char boundary
        let raw = &line[self.layout.speaker_indent..];

        let mut name = String::with_capacity(raw.len());
        let mut last_end = 0;
        for annotation in self.annotation.find_iter(raw) {
            name.push_str(&raw[last_end..annotation.start()]);
            last_end = annotation.end();
        }
        name.push_str(&raw[last_end..]);

        if let Some(count) = self.layout.trailing_trim {
            truncate_trailing_chars(&mut name, count);
        }
        name
    }
}

/// Drop the last `count` characters, leaving an empty string when shorter
fn truncate_trailing_chars(text: &mut String, count: usize) {
    if count == 0 {
        return;
    }
    match text.char_indices().rev().nth(count - 1) {
        Some((cut, _)) => text.truncate(cut),
        None => text.clear(),
    }
}

/// Parse a transcript with a one-off compiled layout
pub fn parse<I>(lines: I, layout: &LayoutDescriptor, source_id: SourceId) -> Result<ParsedTranscript>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let parser = ScriptParser::new(layout.clone())?;
    Ok(parser.parse(lines, source_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indent(count: usize, text: &str) -> String {
        format!("{}{}", " ".repeat(count), text)
    }

    fn movie1_parser() -> ScriptParser {
        ScriptParser::new(SourceId::Movie1.default_layout()).unwrap()
    }

    #[test]
    fn test_speaker_and_dialogue_lines_form_records() {
        let lines = vec![
            "EXT. THE SHIRE - DAY".to_string(),
            indent(20, "GANDALF"),
            indent(10, "A wizard is never late,"),
            indent(10, "nor is he early."),
            String::new(),
            indent(20, "FRODO"),
            indent(10, "Gandalf!"),
        ];

        let parsed = movie1_parser().parse(&lines, SourceId::Movie1);

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].speaker, "GANDALF");
        assert_eq!(parsed.records[0].text, "A wizard is never late, nor is he early.");
        assert_eq!(parsed.records[1].speaker, "FRODO");
        assert_eq!(parsed.records[1].text, "Gandalf!");
        assert_eq!(parsed.stats.speaker_lines, 2);
        assert_eq!(parsed.stats.dialogue_lines, 3);
        assert_eq!(parsed.stats.ignored_lines, 1);
    }

    #[test]
    fn test_parenthetical_removed_from_speaker() {
        let lines = vec![indent(20, "GANDALF (V.O.)"), indent(10, "Run!")];
        let parsed = movie1_parser().parse(&lines, SourceId::Movie1);
        assert_eq!(parsed.records[0].speaker, "GANDALF");
    }

    #[test]
    fn test_voice_over_and_off_screen_tags_removed() {
        let parser = ScriptParser::new(SourceId::Movie3.default_layout()).unwrap();
        let lines = vec![
            indent(24, "ARAGORN V/O"),
            indent(12, "Hold your ground!"),
            indent(24, "PIPPIN O.S."),
            indent(12, "Merry!"),
            indent(24, "SAM (CONT'D)"),
            indent(12, "Mr. Frodo."),
        ];
        let parsed = parser.parse(&lines, SourceId::Movie3);
        let speakers: Vec<_> = parsed.records.iter().map(|r| r.speaker.as_str()).collect();
        assert_eq!(speakers, vec!["ARAGORN", "PIPPIN", "SAM"]);
    }

    #[test]
    fn test_trailing_trim_applied_after_annotation_removal() {
        let parser = ScriptParser::new(SourceId::Movie2.default_layout()).unwrap();
        let lines = vec![indent(28, "GOLLUM (whispering) :"), indent(12, "Precious.")];
        let parsed = parser.parse(&lines, SourceId::Movie2);
        assert_eq!(parsed.records[0].speaker, "GOLLUM");
    }

    #[test]
    fn test_indent_must_match_exactly() {
        let lines = vec![
            indent(19, "NOT A SPEAKER"),
            indent(21, "NOR THIS"),
            indent(20, "SAM"),
            indent(11, "too deep for dialogue"),
            indent(10, "Potatoes."),
        ];
        let parsed = movie1_parser().parse(&lines, SourceId::Movie1);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].text, "Potatoes.");
        assert_eq!(parsed.stats.ignored_lines, 3);
    }

    #[test]
    fn test_dialogue_starting_with_ellipsis() {
        let lines = vec![indent(20, "BILBO"), indent(10, "...and what about very old friends?")];
        let parsed = movie1_parser().parse(&lines, SourceId::Movie1);
        assert_eq!(parsed.records[0].text, "...and what about very old friends?");
    }

    #[test]
    fn test_orphan_dialogue_discarded() {
        let lines = vec![indent(10, "Nobody says this."), indent(20, "SAM"), indent(10, "Hello.")];
        let parsed = movie1_parser().parse(&lines, SourceId::Movie1);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].text, "Hello.");
        assert_eq!(parsed.stats.orphan_dialogue_lines, 1);
    }

    #[test]
    fn test_empty_speaker_name_opens_no_record() {
        let layout = LayoutDescriptor {
            speaker_indent: 4,
            dialogue_indent: 2,
            annotation_pattern: r"[A-Z]+".to_string(),
            trailing_trim: None,
        };
        let lines = vec![indent(4, "SAM"), indent(2, "Lost line."), indent(4, "frodo"), indent(2, "Kept.")];
        let parsed = parse(&lines, &layout, SourceId::Movie1).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].speaker, "frodo");
        assert_eq!(parsed.stats.empty_speaker_lines, 1);
        assert_eq!(parsed.stats.orphan_dialogue_lines, 1);
        assert_eq!(parsed.stats.skipped_lines(), 2);
    }

    #[test]
    fn test_speaker_without_dialogue_kept_with_empty_text() {
        let lines = vec![indent(20, "MERRY"), indent(20, "PIPPIN"), indent(10, "Second breakfast?")];
        let parsed = movie1_parser().parse(&lines, SourceId::Movie1);
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].text, "");
    }

    #[test]
    fn test_no_speaker_lines_yields_empty_result() {
        let lines = vec!["FADE IN:", "", "THE END"];
        let parsed = movie1_parser().parse(lines, SourceId::Movie1);
        assert!(parsed.records.is_empty());

        let empty: Vec<String> = Vec::new();
        let parsed = movie1_parser().parse(&empty, SourceId::Movie1);
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.stats, ParseStats::default());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let lines = vec![indent(20, "ARWEN"), indent(10, "Come back to the light.")];
        let layout = SourceId::Movie1.default_layout();
        let first = parse(&lines, &layout, SourceId::Movie1).unwrap();
        let second = parse(&lines, &layout, SourceId::Movie1).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_annotation_pattern_is_error() {
        let layout = LayoutDescriptor {
            speaker_indent: 20,
            dialogue_indent: 10,
            annotation_pattern: "(".to_string(),
            trailing_trim: None,
        };
        assert!(ScriptParser::new(layout).is_err());
    }

    #[test]
    fn test_truncate_trailing_chars_handles_multibyte() {
        let mut name = "ÉOWYN :".to_string();
        truncate_trailing_chars(&mut name, 2);
        assert_eq!(name, "ÉOWYN");

        let mut short = "É".to_string();
        truncate_trailing_chars(&mut short, 2);
        assert_eq!(short, "");
    }

    #[test]
    fn test_parser_reports_its_layout() {
        let layout = SourceId::Movie2.default_layout();
        let parser = ScriptParser::new(layout.clone()).unwrap();
        assert_eq!(parser.layout(), &layout);
        assert_eq!(parser.layout().trailing_trim, Some(2));
    }
}
