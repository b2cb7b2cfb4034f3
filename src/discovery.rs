use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::SourceConfig;

/// Configuration for source resolution behavior
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
}

/// Result of resolving one configured transcript
#[derive(Debug, Clone)]
pub struct SourceValidation {
    pub source: SourceConfig,
    pub path: PathBuf,
    pub error: Option<String>,
}

impl SourceValidation {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Resolve every configured source against `input_dir` and check it is a readable file
///
/// Without `fail_fast`, missing or inaccessible files are reported in `error`
/// so the remaining sources can still be processed.
pub async fn resolve_sources(
    input_dir: impl AsRef<Path>,
    sources: &[SourceConfig],
    config: &DiscoveryConfig,
) -> Result<Vec<SourceValidation>> {
    let input_dir = input_dir.as_ref();
    info!("Resolving {} sources in: {}", sources.len(), input_dir.display());

    let mut resolved = Vec::with_capacity(sources.len());
    for source in sources {
        let path = input_dir.join(&source.file_name);
        let validation = validate_source(source, path, config).await?;
        resolved.push(validation);
    }

    let valid = resolved.iter().filter(|v| v.is_valid()).count();
    info!("Resolved {} of {} sources", valid, resolved.len());
    Ok(resolved)
}

async fn validate_source(
    source: &SourceConfig,
    path: PathBuf,
    config: &DiscoveryConfig,
) -> Result<SourceValidation> {
    let error = match fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => None,
        Ok(_) => Some(format!("Path is not a file: {}", path.display())),
        Err(e) => Some(format!("Cannot access file {}: {}", path.display(), e)),
    };

    if let Some(ref error) = error {
        warn!(source = %source.id, "{}", error);
        if config.fail_fast {
            return Err(anyhow::anyhow!(error.clone()));
        }
    } else {
        debug!(source = %source.id, "Found transcript: {}", path.display());
    }

    Ok(SourceValidation {
        source: source.clone(),
        path,
        error,
    })
}
