// WHY: directory-level batch used by the CLI: resolve, read, parse, analyze, export
// Per-source failures are recorded in the run report unless fail_fast is set

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::discovery::{resolve_sources, DiscoveryConfig};
use crate::export::{
    render_adjacency, render_dialogue_table, render_speaker_table, render_term_counts,
    write_table, RunStats, SourceStats,
};
use crate::output_paths::{generate_dialogue_table_path, OutputPaths};
use crate::parser::{ParseStats, ScriptParser};
use crate::pipeline::{Pipeline, PipelineOutput};
use crate::reader::{AsyncFileReader, ReaderConfig};

/// Options for a batch run beyond the pipeline configuration
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Abort on the first missing or unreadable transcript
    pub fail_fast: bool,
}

/// Process every configured transcript under `input_dir` and write all tables to `output_dir`
pub async fn process_directory(
    input_dir: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    options: &RunOptions,
) -> Result<RunStats> {
    let start_time = Instant::now();
    let pipeline = Pipeline::new(config)?;

    let discovery_config = DiscoveryConfig { fail_fast: options.fail_fast };
    let resolved = resolve_sources(input_dir, &config.sources, &discovery_config).await?;

    let reader = AsyncFileReader::new(ReaderConfig {
        fail_fast: options.fail_fast,
        ..Default::default()
    });

    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let mut transcripts = Vec::with_capacity(resolved.len());
    let mut source_stats = Vec::with_capacity(resolved.len());

    for validation in resolved {
        let source = &validation.source;
        info!(source = %source.id, "Processing {}", source.id.title());
        let mut stats = SourceStats {
            source: source.id,
            path: validation.path.display().to_string(),
            status: "success".to_string(),
            error: None,
            read: None,
            parse: ParseStats::default(),
            records: 0,
        };

        if let Some(error) = validation.error {
            stats.status = "failed".to_string();
            stats.error = Some(error);
            source_stats.push(stats);
            continue;
        }

        let (lines, read_stats) = reader.read_file_lines(&validation.path, source.encoding).await?;
        if let Some(ref error) = read_stats.read_error {
            warn!(source = %source.id, "Skipping unreadable transcript: {}", error);
            stats.status = "failed".to_string();
            stats.error = Some(error.clone());
            stats.read = Some(read_stats);
            source_stats.push(stats);
            continue;
        }
        stats.read = Some(read_stats);

        let parser = ScriptParser::new(source.layout())
            .with_context(|| format!("Invalid layout for source {}", source.id))?;
        let transcript = parser.parse(&lines, source.id);

        let dialogue_path = generate_dialogue_table_path(output_dir, &source.file_name);
        write_table(&dialogue_path, &render_dialogue_table(&transcript.records)).await?;

        stats.parse = transcript.stats.clone();
        stats.records = transcript.records.len() as u64;
        source_stats.push(stats);
        transcripts.push(transcript);
    }

    // Pipeline concatenates records in source order regardless of config order
    transcripts.sort_by_key(|t| t.source_id);
    let output = pipeline.run_parsed(transcripts)?;

    write_outputs(&output, output_dir, config).await?;

    let run_stats = RunStats {
        sources: source_stats,
        records_total: output.records().count() as u64,
        distinct_speakers: output.speakers.distinct_speakers() as u64,
        top_speakers: output.speakers.len() as u64,
        vocabulary_size: output.term_matrix.n_terms() as u64,
        percentile: output.frequent.percentile,
        threshold: output.frequent.threshold,
        frequent_terms: output.frequent.len() as u64,
        elapsed_ms: start_time.elapsed().as_millis() as u64,
    };

    info!(
        records = run_stats.records_total,
        speakers = run_stats.top_speakers,
        frequent_terms = run_stats.frequent_terms,
        elapsed_ms = run_stats.elapsed_ms,
        "Run completed"
    );
    Ok(run_stats)
}

/// Write the run-level tables of a pipeline result
pub async fn write_outputs(output: &PipelineOutput, output_dir: &Path, config: &PipelineConfig) -> Result<()> {
    let paths = OutputPaths::new(output_dir);
    let delimiter = config.delimiter;

    write_table(&paths.top_speakers, &render_speaker_table(&output.speakers, delimiter)).await?;
    write_table(&paths.term_counts, &render_term_counts(&output.term_ranking, delimiter)).await?;
    write_table(
        &paths.adjacency_cooccurrence,
        &render_adjacency(&output.cooccurrence, delimiter),
    )
    .await?;
    write_table(&paths.adjacency_jaccard, &render_adjacency(&output.jaccard, delimiter)).await?;

    let order = config.grouping_table().group_order(output.jaccard.labels());
    let grouped = output.jaccard.reorder(&order)?;
    write_table(&paths.adjacency_jaccard_grouped, &render_adjacency(&grouped, delimiter)).await?;

    info!("Wrote run tables to {}", output_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SourceId;
    use crate::output_paths::{JACCARD_GROUPED_FILE, TOP_SPEAKERS_FILE};
    use tempfile::TempDir;

    fn indent(count: usize, text: &str) -> String {
        format!("{}{}\n", " ".repeat(count), text)
    }

    #[tokio::test]
    async fn test_missing_sources_are_reported() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let config = PipelineConfig::default();

        let fellowship = format!(
            "{}{}{}{}",
            indent(20, "FRODO"),
            indent(10, "I will take the Ring."),
            indent(20, "GANDALF"),
            indent(10, "The Ring must be destroyed."),
        );
        tokio::fs::write(input.path().join(SourceId::Movie1.default_file_name()), fellowship)
            .await
            .unwrap();

        let stats = process_directory(input.path(), output.path(), &config, &RunOptions::default())
            .await
            .unwrap();

        assert_eq!(stats.sources.len(), 3);
        assert_eq!(stats.sources[0].status, "success");
        assert_eq!(stats.sources[0].records, 2);
        assert_eq!(stats.sources[1].status, "failed");
        assert_eq!(stats.records_total, 2);
        assert_eq!(stats.top_speakers, 2);

        let speakers = tokio::fs::read_to_string(output.path().join(TOP_SPEAKERS_FILE))
            .await
            .unwrap();
        assert!(speakers.starts_with("Character;1;2;3;Total\n"));
        assert!(output.path().join("dialogues_the-fellowship-of-the-ring.txt").exists());
        assert!(output.path().join(JACCARD_GROUPED_FILE).exists());
    }

    #[tokio::test]
    async fn test_fail_fast_stops_on_missing_source() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let result = process_directory(
            input.path(),
            output.path(),
            &PipelineConfig::default(),
            &RunOptions { fail_fast: true },
        )
        .await;
        assert!(result.is_err());
    }
}
