// WHY: run configuration with built-in defaults for the three known transcripts
// Loaded from TOML; every path is resolved against an explicit input directory

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::characters::{AliasTable, DEFAULT_ALIASES, DEFAULT_TOP_N};
use crate::grouping::{default_groups, GroupingTable, SpeakerGroup};
use crate::layout::{LayoutDescriptor, SourceId};
use crate::reader::SourceEncoding;
use crate::text_normalizer::StopwordFilter;
use crate::vocabulary::DEFAULT_PERCENTILE;

/// Default field separator for exported tables
pub const DEFAULT_DELIMITER: char = ';';

/// One transcript to parse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub id: SourceId,
    /// File name relative to the input directory
    pub file_name: String,
    pub encoding: SourceEncoding,
    /// Overrides the built-in layout of `id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutDescriptor>,
}

impl SourceConfig {
    /// Shipped file name and encoding for a known source, built-in layout
    pub fn known(id: SourceId) -> Self {
        Self {
            id,
            file_name: id.default_file_name().to_string(),
            encoding: id.default_encoding(),
            layout: None,
        }
    }

    /// Layout used to parse this source
    pub fn layout(&self) -> LayoutDescriptor {
        self.layout.clone().unwrap_or_else(|| self.id.default_layout())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of most talkative speakers kept
    pub top_n: usize,
    /// Quantile used for the frequent-term threshold
    pub percentile: f64,
    /// Shortest token counted as a term
    pub min_term_length: usize,
    /// Field separator for exported tables
    pub delimiter: char,
    pub aliases: BTreeMap<String, String>,
    /// Replaces the English stopword list when set
    pub stopwords: Option<Vec<String>>,
    pub grouping: Vec<SpeakerGroup>,
    pub sources: Vec<SourceConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            percentile: DEFAULT_PERCENTILE,
            min_term_length: 1,
            delimiter: DEFAULT_DELIMITER,
            aliases: DEFAULT_ALIASES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            stopwords: None,
            grouping: default_groups(),
            sources: SourceId::ALL.iter().map(|id| SourceConfig::known(*id)).collect(),
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document; omitted keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content).context("Invalid pipeline configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("In config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.percentile) {
            anyhow::bail!("percentile must be within [0, 1], got {}", self.percentile);
        }
        if self.delimiter == '\n' || self.delimiter == '\r' {
            anyhow::bail!("delimiter cannot be a line break");
        }
        let mut seen = Vec::new();
        for source in &self.sources {
            if seen.contains(&source.id) {
                anyhow::bail!("source {} configured more than once", source.id);
            }
            seen.push(source.id);
            source
                .layout()
                .validate()
                .with_context(|| format!("Invalid layout for source {}", source.id))?;
        }
        Ok(())
    }

    pub fn alias_table(&self) -> AliasTable {
        AliasTable::new(self.aliases.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    pub fn stopword_filter(&self) -> StopwordFilter {
        match &self.stopwords {
            Some(words) => StopwordFilter::from_words(words),
            None => StopwordFilter::english(),
        }
    }

    pub fn grouping_table(&self) -> GroupingTable {
        GroupingTable::new(self.grouping.clone())
    }
}
