use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Extract standalone tikzpicture documents and captions from LaTeX
/// source trees.
#[derive(Debug, Parser)]
#[command(name = "tikzmill", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge a document and its includes into one flattened file
    Flatten {
        /// Path to the root .tex file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the flattened document here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Extract figures from one document
    Extract {
        /// Path to the root .tex file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Identifier embedded in JSONL records. Default: the file stem
        #[arg(long)]
        id: Option<String>,

        /// Write output here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Extract figures from a dataset directory of per-identifier
    /// source trees, writing JSONL records
    Batch {
        /// Directory containing one subdirectory per document identifier
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output JSONL file
        #[arg(long, default_value = "tikz.jsonl")]
        output: PathBuf,
    },
}

/// Output format for the extract subcommand.
#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable: caption then code per figure
    Text,
    /// One role-tagged message record per figure
    Jsonl,
}
