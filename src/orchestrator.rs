use anyhow::{Context, Result};
use std::fs;

use crate::commit::CommitHash;
use crate::config::PipelineConfig;
use crate::manifest::PublishManifest;
use crate::pipeline;
use crate::publish;
use crate::runner::CommandRunner;

/// Run the whole release pipeline, end to end.
///
/// Linear and non-retrying: capture the source commit, generate and rewrite
/// every artifact, clone and repopulate the distribution repository, stamp
/// it, publish, then clean up. The first failure propagates immediately;
/// cleanup runs only on the fully successful path, so a failed run leaves
/// its intermediate state on disk for inspection.
pub fn run(config: &PipelineConfig, runner: &dyn CommandRunner) -> Result<()> {
    let commit = CommitHash::capture(runner, &config.root)?;
    println!("Source commit: {}", commit.as_str());

    pipeline::generate(config, runner)?;

    publish::clone(config, runner)?;
    publish::populate(config)?;
    publish::stamp(config, &commit)?;

    let manifest = PublishManifest::new(config, &commit);
    manifest.write(&config.repo_dir().join(&config.manifest_file))?;

    publish::commit_and_push(config, runner, &commit)?;

    cleanup(config)?;

    println!(
        "Published {} targets for commit {}",
        config.matrix.len(),
        commit.short()
    );

    Ok(())
}

fn cleanup(config: &PipelineConfig) -> Result<()> {
    for dir in [config.staging_dir(), config.repo_dir()] {
        fs::remove_dir_all(&dir)
            .with_context(|| format!("Failed to remove {}", dir.display()))?;
    }
    Ok(())
}
