// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use scriptnet::layout::SourceId;

/// Test fixture with separate input and output directories
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let input_dir = temp_dir.path().join("input");
        let output_dir = temp_dir.path().join("output");
        fs::create_dir_all(&input_dir).expect("Failed to create input directory");

        Self {
            temp_dir,
            input_dir,
            output_dir,
        }
    }

    /// Write raw transcript bytes under the input directory
    pub fn create_transcript<P: AsRef<Path>>(&self, relative_path: P, content: &[u8]) -> PathBuf {
        let file_path = self.input_dir.join(relative_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write transcript");
        file_path
    }

    /// Write a transcript under the shipped file name of a known source
    pub fn create_known_transcript(&self, source: SourceId, content: &[u8]) -> PathBuf {
        self.create_transcript(source.default_file_name(), content)
    }

    /// Write all three known transcripts, the third one in Windows-1252
    pub fn create_trilogy(&self) {
        use crate::fixtures::{king_text_windows_1252, FELLOWSHIP_TEXT, TOWERS_TEXT};
        self.create_known_transcript(SourceId::Movie1, FELLOWSHIP_TEXT.as_bytes());
        self.create_known_transcript(SourceId::Movie2, TOWERS_TEXT.as_bytes());
        self.create_known_transcript(SourceId::Movie3, &king_text_windows_1252());
    }

    /// Read an exported table from the output directory
    pub fn read_output(&self, file_name: &str) -> String {
        let path = self.output_dir.join(file_name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
    }

    /// Split a delimited table into rows of cells
    pub fn read_table(&self, file_name: &str, delimiter: char) -> Vec<Vec<String>> {
        self.read_output(file_name)
            .lines()
            .map(|line| line.split(delimiter).map(str::to_string).collect())
            .collect()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Indent `text` by `count` spaces
pub fn indent(count: usize, text: &str) -> String {
    format!("{}{}", " ".repeat(count), text)
}
