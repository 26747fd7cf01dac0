use anyhow::{Context, Result};
use std::fs;

use crate::config::PipelineConfig;
use crate::rewrite;
use crate::runner::{CommandRunner, Invocation};

/// Generate one path-normalized artifact per target, in matrix order.
///
/// The first failing step propagates immediately, so when this returns
/// `Ok` the staging directory holds exactly one correctly named, rewritten
/// artifact per target.
pub fn generate(config: &PipelineConfig, runner: &dyn CommandRunner) -> Result<()> {
    fs::create_dir_all(config.staging_dir()).with_context(|| {
        format!(
            "Failed to create the staging directory {}",
            config.staging_dir().display()
        )
    })?;

    for target in &config.matrix {
        let label = target.label();
        println!("Generating IR for target: {}", label);

        let invocation = Invocation::new(&config.compiler)
            .arg("-t")
            .arg("--target")
            .arg(&label)
            .arg(&config.package)
            .current_dir(&config.root);

        runner
            .run_checked(&invocation)
            .with_context(|| format!("IR generation failed for target {}", label))?;

        let produced = config.staging_dir().join(&config.compiler_output);
        let staged = config.staged_artifact(target);
        fs::rename(&produced, &staged).with_context(|| {
            format!(
                "Failed to stage {} as {}",
                produced.display(),
                staged.display()
            )
        })?;

        rewrite::rewrite_includes(&staged, &config.include_marker)?;
    }

    Ok(())
}
