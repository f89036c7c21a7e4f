//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "askroute")]
#[command(
    author,
    version,
    about = "Chat over weather lookups and ingested PDF documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat session
    Chat,

    /// Ask a single question
    Ask(AskArgs),

    /// Ingest a PDF into the document store
    Ingest(IngestArgs),

    /// Show store status
    Status,
}

#[derive(Args)]
pub struct AskArgs {
    /// The question to answer
    #[arg(required = true)]
    pub question: Vec<String>,
}

#[derive(Args)]
pub struct IngestArgs {
    /// Path to the PDF file
    pub path: PathBuf,

    /// Target collection (defaults to the configured collection)
    #[arg(long)]
    pub collection: Option<String>,
}
