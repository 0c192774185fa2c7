//! CLI module for the knowledge-base tool.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use output::OutputFormat;

/// Knowledge-base maintenance CLI for a RAG chatbot.
#[derive(Debug, Parser)]
#[command(name = "kbctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(
        long,
        short = 'f',
        global = true,
        value_enum,
        help = "Output format: text or json"
    )]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check vector store connectivity and point count
    Status,

    /// Extract, chunk, embed, and store documents
    Ingest(commands::IngestArgs),

    /// List stored documents with their chunk counts
    Docs,

    /// Remove stored documents by source file, title, or point id
    Remove(commands::RemoveArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::ConfigCommand),
}
