// WHY: in-memory composition of every stage, transcript lines in, matrices out
// No file access here; runner.rs owns the directory-level batch

use anyhow::Result;
use tracing::info;

use crate::characters::{normalize_speakers, AliasTable, TopSpeakerSet};
use crate::config::PipelineConfig;
use crate::layout::{LayoutDescriptor, SourceId};
use crate::parser::{DialogueRecord, ParsedTranscript, ScriptParser};
use crate::similarity::{compute_adjacency, AdjacencyMatrix, SimilarityMethod};
use crate::text_normalizer::{SpeakerDocument, TextNormalizer};
use crate::vocabulary::{
    frequent_vocabulary, term_ranking, FrequentVocabulary, TermCount, TermFrequencyMatrix,
    VocabularyIndexer,
};

/// Raw lines of one transcript with the layout used to read them
#[derive(Debug, Clone)]
pub struct SourceTranscript {
    pub source_id: SourceId,
    pub layout: LayoutDescriptor,
    pub lines: Vec<String>,
}

/// Every intermediate and final product of a run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub transcripts: Vec<ParsedTranscript>,
    pub speakers: TopSpeakerSet,
    pub documents: Vec<SpeakerDocument>,
    /// Full vocabulary, columns alphabetical
    pub term_matrix: TermFrequencyMatrix,
    pub term_ranking: Vec<TermCount>,
    pub frequent: FrequentVocabulary,
    /// Term matrix restricted to the frequent vocabulary, in frequency order
    pub frequent_matrix: TermFrequencyMatrix,
    pub cooccurrence: AdjacencyMatrix,
    pub jaccard: AdjacencyMatrix,
}

impl PipelineOutput {
    pub fn records(&self) -> impl Iterator<Item = &DialogueRecord> {
        self.transcripts.iter().flat_map(|t| t.records.iter())
    }
}

pub struct Pipeline {
    top_n: usize,
    percentile: f64,
    aliases: AliasTable,
    normalizer: TextNormalizer,
    indexer: VocabularyIndexer,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            top_n: config.top_n,
            percentile: config.percentile,
            aliases: config.alias_table(),
            normalizer: TextNormalizer::new(config.stopword_filter()),
            indexer: VocabularyIndexer::new(config.min_term_length),
        })
    }

    /// Run every stage over the given transcripts
    pub fn run(&self, sources: &[SourceTranscript]) -> Result<PipelineOutput> {
        let mut transcripts = Vec::with_capacity(sources.len());
        for source in sources {
            let parser = ScriptParser::new(source.layout.clone())?;
            transcripts.push(parser.parse(&source.lines, source.source_id));
        }
        self.run_parsed(transcripts)
    }

    /// Run the stages after parsing
    pub fn run_parsed(&self, transcripts: Vec<ParsedTranscript>) -> Result<PipelineOutput> {
        let records: Vec<DialogueRecord> = transcripts
            .iter()
            .flat_map(|t| t.records.iter().cloned())
            .collect();

        let speakers = normalize_speakers(&records, &self.aliases, self.top_n);
        let documents = self.normalizer.normalize_profiles(speakers.profiles());
        let term_matrix = self.indexer.index(&documents);
        let term_ranking = term_ranking(&term_matrix);
        let frequent = frequent_vocabulary(&term_matrix, self.percentile)?;
        let frequent_matrix = term_matrix.select_terms(&frequent.term_names());

        let cooccurrence = compute_adjacency(&frequent_matrix, SimilarityMethod::CoOccurrence);
        let jaccard = compute_adjacency(&frequent_matrix, SimilarityMethod::Jaccard);
        debug_assert!(cooccurrence.is_symmetric() && jaccard.is_symmetric());

        info!(
            records = records.len(),
            speakers = speakers.len(),
            vocabulary = term_matrix.n_terms(),
            frequent_terms = frequent.len(),
            "Pipeline completed"
        );

        Ok(PipelineOutput {
            transcripts,
            speakers,
            documents,
            term_matrix,
            term_ranking,
            frequent,
            frequent_matrix,
            cooccurrence,
            jaccard,
        })
    }
}
