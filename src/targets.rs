use std::fmt;

/// Operating systems julec can generate IR for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Windows,
    Linux,
    Darwin,
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::Linux => "linux",
            Os::Darwin => "darwin",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Architectures julec can generate IR for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    Amd64,
    I386,
    Arm64,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::I386 => "i386",
            Arch::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operating-system/architecture pair to generate IR for.
///
/// The pair itself is the identity; there is no separate id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetSpec {
    pub os: Os,
    pub arch: Arch,
}

impl TargetSpec {
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Label used for compiler invocations and artifact file names,
    /// e.g. `linux-amd64`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.os.as_str(), self.arch.as_str())
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// The fixed build matrix, in generation and publish order.
///
/// The order is not semantically significant but must stay deterministic so
/// runs produce reproducible logs and commits.
pub fn default_matrix() -> Vec<TargetSpec> {
    vec![
        TargetSpec::new(Os::Windows, Arch::Amd64),
        TargetSpec::new(Os::Windows, Arch::I386),
        TargetSpec::new(Os::Windows, Arch::Arm64),
        TargetSpec::new(Os::Linux, Arch::Amd64),
        TargetSpec::new(Os::Linux, Arch::I386),
        TargetSpec::new(Os::Linux, Arch::Arm64),
        TargetSpec::new(Os::Darwin, Arch::Amd64),
        TargetSpec::new(Os::Darwin, Arch::Arm64),
    ]
}
