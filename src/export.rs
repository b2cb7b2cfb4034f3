// WHY: delimited-text rendering of every pipeline output plus the JSON run report
// Rendering is pure; writing goes through one async buffered helper

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::characters::TopSpeakerSet;
use crate::layout::SourceId;
use crate::parser::{DialogueRecord, ParseStats};
use crate::reader::ReadStats;
use crate::similarity::AdjacencyMatrix;
use crate::vocabulary::TermCount;

/// Separator of the per-transcript dialogue tables
pub const DIALOGUE_DELIMITER: char = '|';

/// Per-source processing report
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SourceStats {
    pub source: SourceId,
    pub path: String,
    /// Processing status (success, failed)
    pub status: String,
    pub error: Option<String>,
    pub read: Option<ReadStats>,
    pub parse: ParseStats,
    pub records: u64,
}

/// Whole-run report written next to the exported tables
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunStats {
    pub sources: Vec<SourceStats>,
    pub records_total: u64,
    pub distinct_speakers: u64,
    pub top_speakers: u64,
    pub vocabulary_size: u64,
    pub percentile: f64,
    pub threshold: Option<f64>,
    pub frequent_terms: u64,
    pub elapsed_ms: u64,
}

/// Replace separators and line breaks inside a field with spaces
fn sanitize_field(field: &str, delimiter: char) -> Cow<'_, str> {
    if field.contains(|c: char| c == delimiter || c == '\n' || c == '\r') {
        Cow::Owned(
            field
                .chars()
                .map(|c| if c == delimiter || c == '\n' || c == '\r' { ' ' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(field)
    }
}

/// `Character|Dialogue` table of one transcript's records
pub fn render_dialogue_table(records: &[DialogueRecord]) -> String {
    let mut out = String::from("Character|Dialogue\n");
    for record in records {
        let _ = writeln!(
            out,
            "{}{}{}",
            sanitize_field(&record.speaker, DIALOGUE_DELIMITER),
            DIALOGUE_DELIMITER,
            sanitize_field(&record.text, DIALOGUE_DELIMITER)
        );
    }
    out
}

/// Ranked speakers with one count column per source and a total
pub fn render_speaker_table(speakers: &TopSpeakerSet, delimiter: char) -> String {
    let mut out = String::from("Character");
    for source in SourceId::ALL {
        let _ = write!(out, "{}{}", delimiter, source.number());
    }
    let _ = writeln!(out, "{}Total", delimiter);

    for profile in speakers.profiles() {
        out.push_str(&sanitize_field(&profile.canonical_name, delimiter));
        for source in SourceId::ALL {
            let _ = write!(out, "{}{}", delimiter, profile.count_for(source));
        }
        let _ = writeln!(out, "{}{}", delimiter, profile.dialogue_count);
    }
    out
}

/// Term ranking, most frequent first
pub fn render_term_counts(terms: &[TermCount], delimiter: char) -> String {
    let mut out = format!("Term{}Count\n", delimiter);
    for term in terms {
        let _ = writeln!(out, "{}{}{}", sanitize_field(&term.term, delimiter), delimiter, term.total);
    }
    out
}

/// Square table with an empty corner cell and speaker labels on both axes
pub fn render_adjacency(matrix: &AdjacencyMatrix, delimiter: char) -> String {
    let mut out = String::new();
    for label in matrix.labels() {
        let _ = write!(out, "{}{}", delimiter, sanitize_field(label, delimiter));
    }
    out.push('\n');

    for (row, label) in matrix.labels().iter().enumerate() {
        out.push_str(&sanitize_field(label, delimiter));
        for value in matrix.row(row) {
            let _ = write!(out, "{}{}", delimiter, value);
        }
        out.push('\n');
    }
    out
}

/// Write rendered table contents, creating the parent directory when needed
pub async fn write_table(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(contents.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Serialize run statistics as pretty JSON
pub async fn write_run_stats(path: &Path, stats: &RunStats) -> Result<()> {
    let json = serde_json::to_string_pretty(stats)?;
    write_table(path, &json).await
}
