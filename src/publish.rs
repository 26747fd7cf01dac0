use anyhow::{Context, Result};
use std::fs;

use crate::commit::CommitHash;
use crate::config::PipelineConfig;
use crate::rewrite;
use crate::runner::{CommandRunner, Invocation};

/// Shallow-clone the distribution repository under the working root.
pub fn clone(config: &PipelineConfig, runner: &dyn CommandRunner) -> Result<()> {
    println!("Cloning {}", config.repo_url);

    let invocation = Invocation::new("git")
        .args(["clone", "--depth", "1"])
        .arg(&config.repo_url)
        .arg(&config.repo_dir_name)
        .current_dir(&config.root);

    runner
        .run_checked(&invocation)
        .context("Failed to clone the distribution repository")
}

/// Replace the distribution repository's source subtree wholesale with the
/// staged artifacts, one per target, named identically.
pub fn populate(config: &PipelineConfig) -> Result<()> {
    let source_dir = config.repo_dir().join(&config.source_subdir);

    if source_dir.exists() {
        fs::remove_dir_all(&source_dir).with_context(|| {
            format!("Failed to clear the source subtree {}", source_dir.display())
        })?;
    }
    fs::create_dir_all(&source_dir).with_context(|| {
        format!("Failed to recreate the source subtree {}", source_dir.display())
    })?;

    for target in &config.matrix {
        let name = config.artifact_name(target);
        let staged = config.staged_artifact(target);
        let published = source_dir.join(&name);

        fs::rename(&staged, &published)
            .with_context(|| format!("Failed to move staged artifact {} into place", name))?;

        println!("Published artifact: {}", published.display());
    }

    Ok(())
}

/// Update the version stamp in the distribution repository's documentation
/// so it records the source commit the artifacts were built from.
pub fn stamp(config: &PipelineConfig, commit: &CommitHash) -> Result<()> {
    let docs = config.repo_dir().join(&config.docs_file);
    let line = format!(
        "{}`{}`]({}/{})",
        config.stamp_prefix,
        commit.short(),
        config.commit_url_base,
        commit.as_str()
    );

    rewrite::rewrite_stamp(&docs, &config.stamp_prefix, &line)
}

/// Stage, commit, and push the distribution repository.
///
/// add, commit, and push tolerate a non-zero exit so that publishing an
/// already-current tree does not fail the run.
pub fn commit_and_push(
    config: &PipelineConfig,
    runner: &dyn CommandRunner,
    commit: &CommitHash,
) -> Result<()> {
    let repo_dir = config.repo_dir();
    let message = format!("update IR for julelang/jule@{}", commit.as_str());

    runner.run_tolerant(&Invocation::new("git").args(["add", "."]).current_dir(&repo_dir))?;
    runner.run_tolerant(
        &Invocation::new("git")
            .args(["commit", "-am"])
            .arg(&message)
            .current_dir(&repo_dir),
    )?;
    runner.run_tolerant(&Invocation::new("git").arg("push").current_dir(&repo_dir))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::{Arch, Os, TargetSpec};
    use std::cell::RefCell;
    use std::path::Path;

    struct RecordingRunner {
        exit_code: i32,
        calls: RefCell<Vec<String>>,
    }

    impl RecordingRunner {
        fn succeeding() -> Self {
            Self { exit_code: 0, calls: RefCell::new(Vec::new()) }
        }
    }

    impl CommandRunner for RecordingRunner {
        fn status(&self, invocation: &Invocation) -> Result<i32> {
            self.calls.borrow_mut().push(invocation.to_string());
            Ok(self.exit_code)
        }

        fn capture(&self, _invocation: &Invocation) -> Result<String> {
            unreachable!("the publish workflow never captures output")
        }
    }

    fn test_config(root: &Path) -> PipelineConfig {
        PipelineConfig {
            root: root.to_path_buf(),
            matrix: vec![
                TargetSpec::new(Os::Windows, Arch::Amd64),
                TargetSpec::new(Os::Linux, Arch::Arm64),
            ],
            ..PipelineConfig::default()
        }
    }

    fn hash() -> CommitHash {
        struct Canned;
        impl CommandRunner for Canned {
            fn status(&self, _: &Invocation) -> Result<i32> {
                Ok(0)
            }
            fn capture(&self, _: &Invocation) -> Result<String> {
                Ok("0123456789abcdef0123456789abcdef01234567".to_string())
            }
        }
        CommitHash::capture(&Canned, Path::new(".")).unwrap()
    }

    #[test]
    fn test_clone_is_shallow_and_lands_in_the_configured_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let runner = RecordingRunner::succeeding();

        clone(&config, &runner).unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(
            calls.as_slice(),
            [format!("git clone --depth 1 {} julec-ir", config.repo_url)]
        );
    }

    #[test]
    fn test_populate_replaces_the_source_subtree() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        // Staged artifacts from a finished generation step.
        fs::create_dir_all(config.staging_dir()).unwrap();
        for target in &config.matrix {
            fs::write(config.staged_artifact(target), "generated\n").unwrap();
        }

        // A clone whose source subtree still holds a stale artifact.
        let source_dir = config.repo_dir().join(&config.source_subdir);
        fs::create_dir_all(&source_dir).unwrap();
        fs::write(source_dir.join("stale-target.cpp"), "old\n").unwrap();

        populate(&config).unwrap();

        assert!(!source_dir.join("stale-target.cpp").exists());
        for target in &config.matrix {
            assert!(source_dir.join(config.artifact_name(target)).exists());
            assert!(!config.staged_artifact(target).exists());
        }
    }

    #[test]
    fn test_populate_fails_when_an_artifact_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        fs::create_dir_all(config.staging_dir()).unwrap();
        fs::write(config.staged_artifact(&config.matrix[0]), "generated\n").unwrap();
        fs::create_dir_all(config.repo_dir()).unwrap();

        let err = populate(&config).unwrap_err();
        assert!(err.to_string().contains("linux-arm64.cpp"));
    }

    #[test]
    fn test_stamp_embeds_short_and_full_hash() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        fs::create_dir_all(config.repo_dir()).unwrap();
        let readme = config.repo_dir().join(&config.docs_file);
        fs::write(
            &readme,
            "IR version: [`0000000000`](https://github.com/julelang/jule/commit/0000000000000000000000000000000000000000)\n",
        )
        .unwrap();

        stamp(&config, &hash()).unwrap();

        let after = fs::read_to_string(&readme).unwrap();
        assert!(after.starts_with("IR version: [`0123456789`]"));
        assert!(after.contains("/commit/0123456789abcdef0123456789abcdef01234567"));
    }

    #[test]
    fn test_commit_and_push_runs_in_order_with_the_full_hash() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let runner = RecordingRunner::succeeding();

        commit_and_push(&config, &runner, &hash()).unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], "git add .");
        assert!(calls[1].starts_with("git commit -am "));
        assert!(calls[1].contains("0123456789abcdef0123456789abcdef01234567"));
        assert_eq!(calls[2], "git push");
    }

    #[test]
    fn test_commit_and_push_tolerates_a_noop_commit() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let runner = RecordingRunner { exit_code: 1, calls: RefCell::new(Vec::new()) };

        // Nothing to commit must not abort the run.
        commit_and_push(&config, &runner, &hash()).unwrap();
        assert_eq!(runner.calls.borrow().len(), 3);
    }
}
