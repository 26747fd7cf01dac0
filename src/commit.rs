use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::runner::{CommandRunner, Invocation};

/// HEAD commit hash of the source repository.
///
/// Captured exactly once per run, before any artifact generation, so every
/// artifact, the documentation stamp, and the publish commit message all
/// refer to the same source revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitHash(String);

impl CommitHash {
    /// Capture the HEAD hash by running `git rev-parse HEAD` in `repo_dir`.
    pub fn capture(runner: &dyn CommandRunner, repo_dir: &Path) -> Result<Self> {
        let invocation = Invocation::new("git")
            .args(["rev-parse", "HEAD"])
            .current_dir(repo_dir);

        let hash = runner
            .capture(&invocation)
            .context("Failed to capture the source commit hash")?;

        if hash.is_empty() {
            bail!("git rev-parse HEAD returned empty output");
        }

        Ok(Self(hash))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form used in the documentation stamp: the first 10 characters.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(10)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    struct CannedRunner {
        stdout: String,
        seen: RefCell<Vec<String>>,
    }

    impl CommandRunner for CannedRunner {
        fn status(&self, _invocation: &Invocation) -> Result<i32> {
            Ok(0)
        }

        fn capture(&self, invocation: &Invocation) -> Result<String> {
            self.seen.borrow_mut().push(invocation.to_string());
            Ok(self.stdout.clone())
        }
    }

    #[test]
    fn test_capture_runs_rev_parse_head() {
        let runner = CannedRunner {
            stdout: "0123456789abcdef0123456789abcdef01234567".to_string(),
            seen: RefCell::new(Vec::new()),
        };

        let hash = CommitHash::capture(&runner, &PathBuf::from(".")).unwrap();

        assert_eq!(hash.as_str(), "0123456789abcdef0123456789abcdef01234567");
        assert_eq!(runner.seen.borrow().as_slice(), ["git rev-parse HEAD"]);
    }

    #[test]
    fn test_short_form_is_ten_characters() {
        let runner = CannedRunner {
            stdout: "0123456789abcdef0123456789abcdef01234567".to_string(),
            seen: RefCell::new(Vec::new()),
        };

        let hash = CommitHash::capture(&runner, &PathBuf::from(".")).unwrap();
        assert_eq!(hash.short(), "0123456789");
    }

    #[test]
    fn test_short_form_tolerates_short_hashes() {
        let runner = CannedRunner {
            stdout: "abc".to_string(),
            seen: RefCell::new(Vec::new()),
        };

        let hash = CommitHash::capture(&runner, &PathBuf::from(".")).unwrap();
        assert_eq!(hash.short(), "abc");
    }

    #[test]
    fn test_empty_output_is_an_error() {
        let runner = CannedRunner {
            stdout: String::new(),
            seen: RefCell::new(Vec::new()),
        };

        assert!(CommitHash::capture(&runner, &PathBuf::from(".")).is_err());
    }
}
