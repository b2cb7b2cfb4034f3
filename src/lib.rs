pub mod characters;
pub mod config;
pub mod discovery;
pub mod export;
pub mod grouping;
pub mod layout;
pub mod output_paths;
pub mod parser;
pub mod pipeline;
pub mod reader;
pub mod runner;
pub mod similarity;
pub mod text_normalizer;
pub mod vocabulary;

// Re-export the stage entry points and their main types
pub use characters::{normalize_speakers, AliasTable, SpeakerProfile, TopSpeakerSet};
pub use config::{PipelineConfig, SourceConfig};
pub use layout::{LayoutDescriptor, SourceId};
pub use parser::{parse, DialogueRecord, ParseStats, ParsedTranscript, ScriptParser};
pub use pipeline::{Pipeline, PipelineOutput, SourceTranscript};
pub use reader::SourceEncoding;
pub use runner::{process_directory, RunOptions};
pub use similarity::{compute_adjacency, AdjacencyMatrix, SimilarityMethod};
pub use text_normalizer::{normalize_text, SpeakerDocument, StopwordFilter, TextNormalizer};
pub use vocabulary::{
    build_term_matrix, frequent_vocabulary, FrequentVocabulary, TermCount, TermFrequencyMatrix,
};
