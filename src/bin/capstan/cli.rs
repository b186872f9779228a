//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Capstan - manifest merging and action pinning for codegen pipelines
#[derive(Parser)]
#[command(name = "capstan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge two go.mod files and print the canonical result
    Merge(MergeArgs),

    /// Pin an action reference to the commit its label points at
    Pin(PinArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    /// Path to the existing (base) go.mod
    pub base: PathBuf,

    /// Path to the templated (incoming) go.mod
    pub incoming: PathBuf,

    /// Write the merged manifest here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct PinArgs {
    /// Action reference, e.g. `jdx/mise-action@v3`
    pub reference: String,

    /// GitHub token for authenticated lookups
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}
