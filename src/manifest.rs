use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::commit::CommitHash;
use crate::config::PipelineConfig;

/// Machine-readable record of one publish run, written into the
/// distribution repository next to the artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishManifest {
    pub source_commit: String,
    pub artifacts: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub target: String,
    pub file: String,
}

impl PublishManifest {
    pub fn new(config: &PipelineConfig, commit: &CommitHash) -> Self {
        let artifacts = config
            .matrix
            .iter()
            .map(|target| ManifestEntry {
                target: target.label(),
                file: config.artifact_name(target),
            })
            .collect();

        Self {
            source_commit: commit.as_str().to_string(),
            artifacts,
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize the publish manifest")?;

        fs::write(path, json)
            .with_context(|| format!("Failed to write the publish manifest to {}", path.display()))?;

        println!("Generated manifest: {}", path.display());

        Ok(())
    }
}
