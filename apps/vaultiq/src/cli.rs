//! Command line interface definition

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vaultiq_types::{ColorChoice, ScorePolicy};

/// vaultiq - Document verification over OCR, forgery and market signals
#[derive(Parser)]
#[command(name = "vaultiq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Document verification over OCR, forgery and market signals")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Verify a document against its submission metadata
    ///
    /// Exits 0 when the document is approved and 2 when it is flagged.
    #[command(alias = "v")]
    Verify(VerifyArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Document path (or identifier with --identifier)
    pub document: String,

    /// Metadata as inline JSON
    #[arg(
        long,
        value_name = "JSON",
        conflicts_with = "metadata_file",
        required_unless_present = "metadata_file"
    )]
    pub metadata: Option<String>,

    /// Read metadata JSON from a file
    #[arg(long, value_name = "PATH")]
    pub metadata_file: Option<PathBuf>,

    /// Load the document into memory and hand its bytes to collaborators
    #[arg(long, conflicts_with = "identifier")]
    pub bytes: bool,

    /// Treat DOCUMENT as an opaque identifier or URL instead of a path
    #[arg(long)]
    pub identifier: bool,

    /// Override the approval threshold
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Override the score policy (passthrough, clamp, reject)
    #[arg(long, value_name = "POLICY")]
    pub score_policy: Option<ScorePolicy>,
}

/// Configuration commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Print the default configuration file path
    Path,
}
