// WHY: one place for exported file naming so the CLI and tests agree
// Every path is derived from an explicit output directory

use std::path::{Path, PathBuf};

pub const TOP_SPEAKERS_FILE: &str = "top_speakers.txt";
pub const TERM_COUNTS_FILE: &str = "term_counts.txt";
pub const COOCCURRENCE_FILE: &str = "adjacency_cooccurrence.txt";
pub const JACCARD_FILE: &str = "adjacency_jaccard.txt";
pub const JACCARD_GROUPED_FILE: &str = "adjacency_jaccard_grouped.txt";

/// Path of the parsed dialogue table for a transcript file name
/// `the-two-towers.txt` becomes `dialogues_the-two-towers.txt`
pub fn generate_dialogue_table_path(output_dir: &Path, source_file_name: &str) -> PathBuf {
    let stem = Path::new(source_file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    output_dir.join(format!("dialogues_{stem}.txt"))
}

/// Locations of every run-level table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub top_speakers: PathBuf,
    pub term_counts: PathBuf,
    pub adjacency_cooccurrence: PathBuf,
    pub adjacency_jaccard: PathBuf,
    pub adjacency_jaccard_grouped: PathBuf,
}

impl OutputPaths {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            top_speakers: output_dir.join(TOP_SPEAKERS_FILE),
            term_counts: output_dir.join(TERM_COUNTS_FILE),
            adjacency_cooccurrence: output_dir.join(COOCCURRENCE_FILE),
            adjacency_jaccard: output_dir.join(JACCARD_FILE),
            adjacency_jaccard_grouped: output_dir.join(JACCARD_GROUPED_FILE),
        }
    }
}
