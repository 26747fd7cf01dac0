use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::orchestrator;
use crate::runner::SystemRunner;
use crate::targets;

#[derive(Parser)]
#[command(name = "julec-dist")]
#[command(about = "A tiny, predictable release pipeline that publishes julec IR for every supported target")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate IR for every target and publish it to the distribution repository
    Publish {
        /// Compiler binary to invoke
        #[arg(long)]
        compiler: Option<String>,

        /// Package to transpile
        #[arg(long)]
        package: Option<String>,

        /// Distribution repository URL
        #[arg(long)]
        repo_url: Option<String>,

        /// Directory to run the pipeline in
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Check system requirements and configuration
    Doctor,
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Publish {
            compiler,
            package,
            repo_url,
            root,
        } => publish_command(compiler, package, repo_url, root),
        Commands::Doctor => doctor_command(),
    }
}

fn publish_command(
    compiler: Option<String>,
    package: Option<String>,
    repo_url: Option<String>,
    root: Option<PathBuf>,
) -> Result<()> {
    let mut config = PipelineConfig::default();

    if let Some(compiler) = compiler {
        config.compiler = compiler;
    }
    if let Some(package) = package {
        config.package = package;
    }
    if let Some(repo_url) = repo_url {
        config.repo_url = repo_url;
    }
    if let Some(root) = root {
        config.root = root;
    }

    println!("Publishing IR for {} targets", config.matrix.len());

    orchestrator::run(&config, &SystemRunner)
}

fn doctor_command() -> Result<()> {
    println!("julec-dist Doctor - Checking system requirements...\n");

    check_command_available("julec", "Jule compiler")?;
    check_command_available("git", "Git")?;

    println!("\nTarget matrix:");
    for target in targets::default_matrix() {
        println!("  {}", target);
    }

    println!("\n✓ julec-dist doctor check complete");

    Ok(())
}

fn check_command_available(command: &str, description: &str) -> Result<()> {
    match which::which(command) {
        Ok(path) => {
            println!("✓ {} found at: {}", description, path.display());
            Ok(())
        }
        Err(_) => {
            println!("✗ {} not found ({})", description, command);
            Err(anyhow::anyhow!("{} is required but not found in PATH", description))
        }
    }
}
