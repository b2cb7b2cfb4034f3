// WHY: speaker canonicalization and ranking across all transcripts
// Profiles are keyed by canonical name; ranking is stable on first occurrence

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::info;

use crate::layout::SourceId;
use crate::parser::DialogueRecord;

/// Default number of top speakers kept for the network
pub const DEFAULT_TOP_N: usize = 20;

/// Known spelling variants mapped to their canonical form
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("DEAGOL", "DÉAGOL"),
    ("EOMER", "ÉOMER"),
    ("EOWYN", "ÉOWYN"),
    ("EÓWYN", "ÉOWYN"),
    ("SMEAGOL", "SMÉAGOL"),
    ("THEODEN", "THÉODEN"),
    ("WITCH-KING", "WITCH KING"),
];

/// Observed spelling → canonical spelling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            aliases: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn empty() -> Self {
        Self { aliases: HashMap::new() }
    }

    /// Canonical form of an already-trimmed name; unknown names map to themselves
    pub fn canonicalize<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::new(DEFAULT_ALIASES.iter().copied())
    }
}

/// Aggregated dialogue of one canonical speaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerProfile {
    pub canonical_name: String,
    /// Trimmed spellings that resolved to this speaker
    pub raw_names: BTreeSet<String>,
    pub dialogue_count: u64,
    pub per_source_counts: BTreeMap<SourceId, u64>,
    /// All dialogue texts joined by single spaces, source 1 first
    pub concatenated_text: String,
}

impl SpeakerProfile {
    fn new(canonical_name: String) -> Self {
        Self {
            canonical_name,
            raw_names: BTreeSet::new(),
            dialogue_count: 0,
            per_source_counts: BTreeMap::new(),
            concatenated_text: String::new(),
        }
    }

    pub fn count_for(&self, source: SourceId) -> u64 {
        self.per_source_counts.get(&source).copied().unwrap_or(0)
    }
}

/// The N most talkative speakers in rank order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopSpeakerSet {
    profiles: Vec<SpeakerProfile>,
    distinct_speakers: usize,
}

impl TopSpeakerSet {
    pub fn profiles(&self) -> &[SpeakerProfile] {
        &self.profiles
    }

    pub fn names(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.canonical_name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&SpeakerProfile> {
        self.profiles.iter().find(|p| p.canonical_name == name)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Number of canonical speakers before truncation
    pub fn distinct_speakers(&self) -> usize {
        self.distinct_speakers
    }
}

/// Rank every canonical speaker by dialogue count
///
/// Records are ordered by source first (stable, so appearance order within a
/// source is kept); ties in count keep first-occurrence order.
pub fn rank_speakers(records: &[DialogueRecord], aliases: &AliasTable) -> Vec<SpeakerProfile> {
    let mut ordered: Vec<&DialogueRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.source_id);

    let mut profiles: Vec<SpeakerProfile> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in ordered {
        let trimmed = record.speaker.trim_end();
        let canonical = aliases.canonicalize(trimmed);

        let slot = match index.get(canonical) {
            Some(&slot) => slot,
            None => {
                profiles.push(SpeakerProfile::new(canonical.to_string()));
                index.insert(canonical.to_string(), profiles.len() - 1);
                profiles.len() - 1
            }
        };

        let profile = &mut profiles[slot];
        profile.raw_names.insert(trimmed.to_string());
        profile.dialogue_count += 1;
        *profile.per_source_counts.entry(record.source_id).or_insert(0) += 1;
        if !record.text.is_empty() {
            if !profile.concatenated_text.is_empty() {
                profile.concatenated_text.push(' ');
            }
            profile.concatenated_text.push_str(&record.text);
        }
    }

    // sort_by is stable, so equal counts stay in first-occurrence order
    profiles.sort_by(|a, b| b.dialogue_count.cmp(&a.dialogue_count));
    profiles
}

/// Canonicalize speakers and keep the `top_n` most talkative
pub fn normalize_speakers(records: &[DialogueRecord], aliases: &AliasTable, top_n: usize) -> TopSpeakerSet {
    let mut profiles = rank_speakers(records, aliases);
    let distinct_speakers = profiles.len();
    profiles.truncate(top_n);

    info!(
        records = records.len(),
        distinct_speakers,
        kept = profiles.len(),
        "Ranked speakers"
    );

    TopSpeakerSet {
        profiles,
        distinct_speakers,
    }
}
