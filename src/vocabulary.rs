// WHY: document-term counting and percentile-based term selection
// Columns are alphabetical so every run produces the same matrix layout

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::text_normalizer::SpeakerDocument;

/// Default quantile for the frequent-term threshold
pub const DEFAULT_PERCENTILE: f64 = 0.9;

/// Dense speaker × term count table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFrequencyMatrix {
    speakers: Vec<String>,
    terms: Vec<String>,
    /// Row-major, `speakers.len() * terms.len()` cells
    counts: Vec<u64>,
}

impl TermFrequencyMatrix {
    pub fn speakers(&self) -> &[String] {
        &self.speakers
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn n_speakers(&self) -> usize {
        self.speakers.len()
    }

    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn count(&self, speaker: usize, term: usize) -> u64 {
        self.counts[speaker * self.terms.len() + term]
    }

    /// Count by names; None when either is absent
    pub fn count_of(&self, speaker: &str, term: &str) -> Option<u64> {
        let row = self.speakers.iter().position(|s| s == speaker)?;
        let col = self.column_of(term)?;
        Some(self.count(row, col))
    }

    // Columns are alphabetical only in a freshly indexed matrix; select_terms may reorder them
    fn column_of(&self, term: &str) -> Option<usize> {
        self.terms.iter().position(|t| t == term)
    }

    pub fn row(&self, speaker: usize) -> &[u64] {
        let width = self.terms.len();
        &self.counts[speaker * width..(speaker + 1) * width]
    }

    /// Total count of every term across all speakers, in column order
    pub fn term_totals(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.terms.len()];
        for speaker in 0..self.speakers.len() {
            for (total, count) in totals.iter_mut().zip(self.row(speaker)) {
                *total += count;
            }
        }
        totals
    }

    /// Restrict to the given terms, in the given column order; unknown terms are skipped
    pub fn select_terms<S: AsRef<str>>(&self, terms: &[S]) -> TermFrequencyMatrix {
        let columns: Vec<(usize, String)> = terms
            .iter()
            .filter_map(|term| {
                let term = term.as_ref();
                self.column_of(term).map(|idx| (idx, term.to_string()))
            })
            .collect();

        let mut counts = Vec::with_capacity(self.speakers.len() * columns.len());
        for speaker in 0..self.speakers.len() {
            let row = self.row(speaker);
            counts.extend(columns.iter().map(|(idx, _)| row[*idx]));
        }

        TermFrequencyMatrix {
            speakers: self.speakers.clone(),
            terms: columns.into_iter().map(|(_, term)| term).collect(),
            counts,
        }
    }
}

/// A term with its total count across speakers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub total: u64,
}

/// Terms at or above the percentile threshold, most frequent first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequentVocabulary {
    pub percentile: f64,
    /// None when the vocabulary is empty
    pub threshold: Option<f64>,
    pub terms: Vec<TermCount>,
}

impl FrequentVocabulary {
    pub fn term_names(&self) -> Vec<String> {
        self.terms.iter().map(|t| t.term.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Builds term matrices from normalized speaker documents
#[derive(Debug, Clone)]
pub struct VocabularyIndexer {
    /// Tokens with fewer characters are not counted
    pub min_term_length: usize,
}

impl Default for VocabularyIndexer {
    fn default() -> Self {
        Self { min_term_length: 1 }
    }
}

impl VocabularyIndexer {
    pub fn new(min_term_length: usize) -> Self {
        Self { min_term_length }
    }

    /// Count whitespace-separated tokens per speaker; rows follow document order
    pub fn index(&self, documents: &[SpeakerDocument]) -> TermFrequencyMatrix {
        let per_speaker: Vec<BTreeMap<&str, u64>> = documents
            .iter()
            .map(|doc| {
                let mut counts = BTreeMap::new();
                for token in doc.text.split_whitespace() {
                    if token.chars().count() >= self.min_term_length {
                        *counts.entry(token).or_insert(0) += 1;
                    }
                }
                counts
            })
            .collect();

        let mut columns: BTreeMap<&str, usize> = BTreeMap::new();
        for counts in &per_speaker {
            for term in counts.keys() {
                columns.entry(*term).or_insert(0);
            }
        }
        for (idx, slot) in columns.values_mut().enumerate() {
            *slot = idx;
        }

        let width = columns.len();
        let mut cells = vec![0u64; documents.len() * width];
        for (row, counts) in per_speaker.iter().enumerate() {
            for (term, count) in counts {
                cells[row * width + columns[term]] = *count;
            }
        }

        let matrix = TermFrequencyMatrix {
            speakers: documents.iter().map(|d| d.speaker.clone()).collect(),
            terms: columns.keys().map(|t| t.to_string()).collect(),
            counts: cells,
        };

        info!(
            speakers = matrix.n_speakers(),
            vocabulary = matrix.n_terms(),
            "Built term frequency matrix"
        );
        matrix
    }
}

/// Build a term matrix with the default indexer
pub fn build_term_matrix(documents: &[SpeakerDocument]) -> TermFrequencyMatrix {
    VocabularyIndexer::default().index(documents)
}

/// Every term with its total, descending; ties keep alphabetical column order
pub fn term_ranking(matrix: &TermFrequencyMatrix) -> Vec<TermCount> {
    let mut ranking: Vec<TermCount> = matrix
        .terms()
        .iter()
        .zip(matrix.term_totals())
        .map(|(term, total)| TermCount {
            term: term.clone(),
            total,
        })
        .collect();
    ranking.sort_by(|a, b| b.total.cmp(&a.total));
    ranking
}

/// Linearly interpolated quantile `q` of `values` (`q` in [0, 1])
///
/// Position `q * (n - 1)` in the sorted values; None for empty input.
pub fn percentile(values: &[u64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let low = sorted[lower] as f64;
    let high = sorted[upper] as f64;
    Some(low + (high - low) * (position - lower as f64))
}

/// Select terms whose total reaches the `q` quantile of all term totals
pub fn frequent_vocabulary(matrix: &TermFrequencyMatrix, q: f64) -> Result<FrequentVocabulary> {
    if !(0.0..=1.0).contains(&q) {
        anyhow::bail!("Percentile must be within [0, 1], got {}", q);
    }

    let ranking = term_ranking(matrix);
    let totals: Vec<u64> = ranking.iter().map(|t| t.total).collect();
    let threshold = percentile(&totals, q);

    let terms = match threshold {
        Some(threshold) => ranking
            .into_iter()
            .filter(|t| t.total as f64 >= threshold)
            .collect(),
        None => Vec::new(),
    };

    let vocabulary = FrequentVocabulary {
        percentile: q,
        threshold,
        terms,
    };

    info!(
        percentile = q,
        threshold = ?vocabulary.threshold,
        kept = vocabulary.len(),
        vocabulary = matrix.n_terms(),
        "Selected frequent vocabulary"
    );
    Ok(vocabulary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(speaker: &str, text: &str) -> SpeakerDocument {
        SpeakerDocument {
            speaker: speaker.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_two_speaker_matrix() {
        let matrix = build_term_matrix(&[doc("A", "ring power dark"), doc("B", "ring power light")]);

        assert_eq!(matrix.terms(), &["dark", "light", "power", "ring"]);
        assert_eq!(matrix.row(0), &[1, 0, 1, 1]);
        assert_eq!(matrix.row(1), &[0, 1, 1, 1]);
        assert_eq!(matrix.count_of("A", "ring"), Some(1));
        assert_eq!(matrix.count_of("B", "dark"), Some(0));
        assert_eq!(matrix.count_of("C", "ring"), None);
    }

    #[test]
    fn test_repeated_tokens_counted() {
        let matrix = build_term_matrix(&[doc("GOLLUM", "precious precious precious mine")]);
        assert_eq!(matrix.count_of("GOLLUM", "precious"), Some(3));
        assert_eq!(matrix.term_totals(), vec![1, 3]);
    }

    #[test]
    fn test_min_term_length_filters_short_tokens() {
        let matrix = VocabularyIndexer::new(2).index(&[doc("A", "x ring b orc")]);
        assert_eq!(matrix.terms(), &["orc", "ring"]);
    }

    #[test]
    fn test_empty_documents() {
        let matrix = build_term_matrix(&[]);
        assert_eq!(matrix.n_speakers(), 0);
        assert_eq!(matrix.n_terms(), 0);

        let matrix = build_term_matrix(&[doc("A", "")]);
        assert_eq!(matrix.n_speakers(), 1);
        assert_eq!(matrix.n_terms(), 0);
        assert!(matrix.row(0).is_empty());
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        assert_eq!(percentile(&[1, 2, 3, 4, 5], 0.5), Some(3.0));
        // position 0.9 * 4 = 3.6 -> 4 + 0.6 * (5 - 4)
        let value = percentile(&[5, 1, 4, 2, 3], 0.9).unwrap();
        assert!((value - 4.6).abs() < 1e-12);
        assert_eq!(percentile(&[7], 0.9), Some(7.0));
        assert_eq!(percentile(&[], 0.9), None);
        assert_eq!(percentile(&[1, 2], 1.5), None);
    }

    #[test]
    fn test_frequent_vocabulary_threshold_and_order() {
        let matrix = build_term_matrix(&[
            doc("A", "ring ring ring ring orc orc shire"),
            doc("B", "ring ring orc elf"),
        ]);
        // totals: elf 1, orc 3, ring 6, shire 1 -> sorted [1, 1, 3, 6]
        let vocabulary = frequent_vocabulary(&matrix, 0.5).unwrap();
        assert_eq!(vocabulary.threshold, Some(2.0));
        assert_eq!(vocabulary.term_names(), vec!["ring", "orc"]);
        for term in &vocabulary.terms {
            assert!(term.total as f64 >= vocabulary.threshold.unwrap());
        }
    }

    #[test]
    fn test_ranking_ties_keep_alphabetical_order() {
        let matrix = build_term_matrix(&[doc("A", "pippin merry merry pippin sam")]);
        let ranking = term_ranking(&matrix);
        let names: Vec<_> = ranking.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(names, vec!["merry", "pippin", "sam"]);
    }

    #[test]
    fn test_frequent_vocabulary_of_empty_matrix() {
        let vocabulary = frequent_vocabulary(&TermFrequencyMatrix::default(), 0.9).unwrap();
        assert!(vocabulary.is_empty());
        assert_eq!(vocabulary.threshold, None);
    }

    #[test]
    fn test_invalid_percentile_rejected() {
        assert!(frequent_vocabulary(&TermFrequencyMatrix::default(), -0.1).is_err());
    }

    #[test]
    fn test_select_terms_reorders_columns() {
        let matrix = build_term_matrix(&[doc("A", "ring power dark"), doc("B", "ring power light")]);
        let selected = matrix.select_terms(&["ring", "light", "unknown"]);
        assert_eq!(selected.terms(), &["ring", "light"]);
        assert_eq!(selected.row(0), &[1, 0]);
        assert_eq!(selected.row(1), &[1, 1]);
        assert_eq!(selected.speakers(), matrix.speakers());
    }

    #[test]
    fn test_lookup_on_frequency_ordered_columns() {
        let matrix = build_term_matrix(&[doc("A", "zeta zeta zeta alpha beta beta")]);
        let frequent = frequent_vocabulary(&matrix, 0.0).unwrap();
        let selected = matrix.select_terms(&frequent.term_names());

        assert_eq!(selected.terms(), &["zeta", "beta", "alpha"]);
        assert_eq!(selected.count_of("A", "zeta"), Some(3));
        assert_eq!(selected.count_of("A", "beta"), Some(2));
        assert_eq!(selected.count_of("A", "alpha"), Some(1));
        assert_eq!(selected.count_of("A", "gamma"), None);

        // Restricting an already restricted matrix keeps every requested term
        let narrowed = selected.select_terms(&["alpha", "zeta"]);
        assert_eq!(narrowed.terms(), &["alpha", "zeta"]);
        assert_eq!(narrowed.row(0), &[1, 3]);
    }
}
