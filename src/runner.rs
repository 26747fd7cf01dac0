use anyhow::{anyhow, Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One external command line, built up before execution.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// The sole point of contact with the operating system's process layer.
///
/// Implementations block until the subprocess terminates; there is no
/// timeout and no retry. Tests substitute a recording fake.
pub trait CommandRunner {
    /// Execute the invocation and return its exit code.
    ///
    /// Spawn failure is an error; a non-zero exit is not.
    fn status(&self, invocation: &Invocation) -> Result<i32>;

    /// Execute the invocation and return its trimmed stdout.
    ///
    /// Unlike [`status`](Self::status), a non-zero exit is an error here,
    /// since there is no meaningful output to return.
    fn capture(&self, invocation: &Invocation) -> Result<String>;

    /// Execute and treat any non-zero exit as an error.
    fn run_checked(&self, invocation: &Invocation) -> Result<()> {
        let code = self.status(invocation)?;
        if code != 0 {
            return Err(anyhow!("`{}` exited with status {}", invocation, code));
        }
        Ok(())
    }

    /// Execute and tolerate a non-zero exit.
    ///
    /// Used for steps where a no-op is acceptable, e.g. `git commit` with
    /// nothing to commit. Spawn failure still propagates.
    fn run_tolerant(&self, invocation: &Invocation) -> Result<()> {
        let code = self.status(invocation)?;
        if code != 0 {
            println!("Continuing past non-zero exit ({}) from `{}`", code, invocation);
        }
        Ok(())
    }
}

/// Runs invocations as real operating-system processes, inheriting the
/// current environment.
pub struct SystemRunner;

impl SystemRunner {
    fn command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(invocation.program());
        cmd.args(invocation.arguments());
        if let Some(dir) = invocation.cwd() {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl CommandRunner for SystemRunner {
    fn status(&self, invocation: &Invocation) -> Result<i32> {
        let status = Self::command(invocation)
            .status()
            .with_context(|| format!("Failed to execute `{}`", invocation))?;

        Ok(status.code().unwrap_or(-1))
    }

    fn capture(&self, invocation: &Invocation) -> Result<String> {
        let output = Self::command(invocation)
            .output()
            .with_context(|| format!("Failed to execute `{}`", invocation))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("`{}` failed: {}", invocation, stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
