use std::path::PathBuf;

use crate::targets::{self, TargetSpec};

/// Everything the pipeline needs to know about paths, tools, and targets.
///
/// `Default` reproduces the production julec-ir layout; tests substitute
/// their own values without touching pipeline logic.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Compiler binary to invoke.
    pub compiler: String,

    /// Package the compiler transpiles, relative to `root`.
    pub package: String,

    /// Directory the compiler writes generated sources into, relative to `root`.
    pub staging_dir_name: String,

    /// Name of the compiler's generically-named output file.
    pub compiler_output: String,

    /// Extension given to staged artifacts.
    pub artifact_ext: String,

    /// Substring of a quoted include path that marks the internal
    /// build-root segment; everything after it is kept.
    pub include_marker: String,

    /// URL of the distribution repository.
    pub repo_url: String,

    /// Directory name the distribution repository is cloned into,
    /// relative to `root`.
    pub repo_dir_name: String,

    /// Subtree of the distribution repository that holds the artifacts.
    pub source_subdir: String,

    /// Documentation file in the distribution repository carrying the
    /// version stamp.
    pub docs_file: String,

    /// Fixed prefix identifying the stamp line inside `docs_file`.
    pub stamp_prefix: String,

    /// Base URL that commit hashes are linked under in the stamp.
    pub commit_url_base: String,

    /// Manifest file written into the distribution repository root.
    pub manifest_file: String,

    /// Directory the whole pipeline runs in.
    pub root: PathBuf,

    /// Targets to generate IR for, in order.
    pub matrix: Vec<TargetSpec>,
}

impl PipelineConfig {
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(&self.staging_dir_name)
    }

    pub fn repo_dir(&self) -> PathBuf {
        self.root.join(&self.repo_dir_name)
    }

    /// Artifact file name for one target, e.g. `linux-amd64.cpp`.
    pub fn artifact_name(&self, target: &TargetSpec) -> String {
        format!("{}.{}", target.label(), self.artifact_ext)
    }

    /// Where the artifact for one target lives after staging.
    pub fn staged_artifact(&self, target: &TargetSpec) -> PathBuf {
        self.staging_dir().join(self.artifact_name(target))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            compiler: "julec".to_string(),
            package: "src/julec".to_string(),
            staging_dir_name: "dist".to_string(),
            compiler_output: "ir.cpp".to_string(),
            artifact_ext: "cpp".to_string(),
            include_marker: "jule/".to_string(),
            repo_url: "https://github.com/julelang/julec-ir.git".to_string(),
            repo_dir_name: "julec-ir".to_string(),
            source_subdir: "src".to_string(),
            docs_file: "README.md".to_string(),
            stamp_prefix: "IR version: [".to_string(),
            commit_url_base: "https://github.com/julelang/jule/commit".to_string(),
            manifest_file: "ir-manifest.json".to_string(),
            root: PathBuf::from("."),
            matrix: targets::default_matrix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::{Arch, Os};

    #[test]
    fn test_default_config_targets_julec_ir() {
        let config = PipelineConfig::default();

        assert_eq!(config.compiler, "julec");
        assert_eq!(config.staging_dir_name, "dist");
        assert_eq!(config.repo_dir_name, "julec-ir");
        assert!(config.repo_url.ends_with("julec-ir.git"));
        assert!(!config.matrix.is_empty());
    }

    #[test]
    fn test_staged_artifact_path() {
        let config = PipelineConfig {
            root: PathBuf::from("/work"),
            ..PipelineConfig::default()
        };

        let target = TargetSpec::new(Os::Linux, Arch::Amd64);
        assert_eq!(config.artifact_name(&target), "linux-amd64.cpp");
        assert_eq!(
            config.staged_artifact(&target),
            PathBuf::from("/work/dist/linux-amd64.cpp")
        );
    }
}
