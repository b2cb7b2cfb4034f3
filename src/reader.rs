use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, BufReader};
use tracing::{debug, info, warn};

/// Byte encoding of a transcript file, configured per source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceEncoding {
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "windows-1252")]
    Windows1252,
}

impl SourceEncoding {
    /// Decode raw bytes into lines, skipping lines that are not valid in this encoding
    /// Windows-1252 maps every byte, so only UTF-8 input can produce skipped lines
    pub fn decode_lines(&self, bytes: &[u8]) -> DecodedLines {
        match self {
            SourceEncoding::Utf8 => {
                let mut decoded = DecodedLines::default();
                for (idx, raw) in split_raw_lines(bytes).enumerate() {
                    match std::str::from_utf8(raw) {
                        Ok(line) => decoded.lines.push(line.to_string()),
                        Err(e) => decoded.undecodable.push(UndecodableLine {
                            line_number: idx as u64 + 1,
                            error: e.to_string(),
                        }),
                    }
                }
                decoded
            }
            SourceEncoding::Windows1252 => {
                let (text, _had_errors) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
                DecodedLines {
                    lines: text.lines().map(str::to_string).collect(),
                    undecodable: Vec::new(),
                }
            }
        }
    }
}

// Same line boundaries as str::lines: split on LF, drop one trailing CR, no empty final line
fn split_raw_lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let mut lines = body.split(|&b| b == b'\n');
    if bytes.is_empty() {
        lines.next();
    }
    lines.map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// A line dropped because its bytes are not valid in the source encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndecodableLine {
    /// 1-based line number in the file
    pub line_number: u64,
    pub error: String,
}

/// Decoded lines of a transcript plus the lines that could not be decoded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedLines {
    pub lines: Vec<String>,
    pub undecodable: Vec<UndecodableLine>,
}

/// Configuration for file reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            buffer_size: 8192,
        }
    }
}

/// Statistics for file reading operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadStats {
    pub file_path: String,
    pub encoding: SourceEncoding,
    pub lines_read: u64,
    /// Lines skipped because they were not valid in the configured encoding
    #[serde(default)]
    pub undecodable_lines: u64,
    pub bytes_read: u64,
    pub duration_ms: u64,
    pub read_error: Option<String>,
}

/// Async transcript reader that loads a whole file and decodes it line by line
pub struct AsyncFileReader {
    config: ReaderConfig,
}

impl AsyncFileReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read and decode a transcript, returning its lines and read statistics
    pub async fn read_file_lines<P: AsRef<Path>>(
        &self,
        file_path: P,
        encoding: SourceEncoding,
    ) -> Result<(Vec<String>, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of file: {}", path.display());

        let failed = |error_msg: String, bytes_read: u64| -> Result<(Vec<String>, ReadStats)> {
            warn!("{}", error_msg);
            if self.config.fail_fast {
                return Err(anyhow::anyhow!(error_msg));
            }
            let stats = ReadStats {
                file_path: path.display().to_string(),
                encoding,
                lines_read: 0,
                undecodable_lines: 0,
                bytes_read,
                duration_ms: start_time.elapsed().as_millis() as u64,
                read_error: Some(error_msg),
            };
            Ok((Vec::new(), stats))
        };

        let file = match File::open(path).await {
            Ok(file) => file,
            Err(e) => return failed(format!("Failed to open file {}: {}", path.display(), e), 0),
        };

        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut bytes = Vec::new();
        if let Err(e) = reader.read_to_end(&mut bytes).await {
            return failed(format!("Failed to read file {}: {}", path.display(), e), bytes.len() as u64);
        }

        let DecodedLines { lines, undecodable } = encoding.decode_lines(&bytes);
        for bad in &undecodable {
            let error_msg = format!(
                "UTF-8 decoding error at line {} in {}: {}",
                bad.line_number,
                path.display(),
                bad.error
            );
            if self.config.fail_fast {
                return Err(anyhow::anyhow!(error_msg));
            }
            warn!("Skipping line: {}", error_msg);
        }

        let stats = ReadStats {
            file_path: path.display().to_string(),
            encoding,
            lines_read: lines.len() as u64,
            undecodable_lines: undecodable.len() as u64,
            bytes_read: bytes.len() as u64,
            duration_ms: start_time.elapsed().as_millis() as u64,
            read_error: None,
        };

        info!(
            "Successfully read {}: {} lines ({} undecodable skipped), {} bytes in {}ms",
            path.display(),
            stats.lines_read,
            stats.undecodable_lines,
            stats.bytes_read,
            stats.duration_ms
        );

        Ok((lines, stats))
    }
}
