//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{cleanup, doc, query, token};

#[derive(Parser)]
#[command(name = "stash")]
#[command(author, version, about = "Token-addressed document storage")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Store root directory
    #[arg(long, global = true, env = "STASH_ROOT", default_value = "storage")]
    pub root: PathBuf,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a store root with a starter config
    Init {
        /// Path to initialize (defaults to the store root)
        path: Option<PathBuf>,
    },

    /// Mint a fresh token for a document type
    Mint {
        /// Document type (token prefix)
        doc_type: String,

        /// Format generation digit
        #[arg(long, default_value = "0")]
        generation: char,

        /// Issuance timestamp in Unix seconds (defaults to now)
        #[arg(long)]
        timestamp: Option<i64>,

        /// Entropy characters to append
        #[arg(long, default_value = "10")]
        entropy: usize,
    },

    /// Show the fields encoded in a token
    Inspect {
        /// Token to decode
        token: String,
    },

    /// Derive a companion token of a different type
    Derive {
        /// Existing token
        token: String,

        /// Document type for the companion (token prefix)
        new_type: String,
    },

    /// Store a JSON document under a token
    Put {
        /// Document identifier (from `mint` or `derive`)
        id: String,

        /// Read the document from a file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Print the document stored under a token
    Get {
        /// Document identifier
        id: String,
    },

    /// List documents of a type
    List {
        /// Document type (token prefix)
        doc_type: String,

        /// Only include documents matching this JSON object
        #[arg(long)]
        query: Option<String>,
    },

    /// Show the most recent document of a type
    Latest {
        /// Document type (token prefix)
        doc_type: String,

        /// Only consider documents matching this JSON object
        #[arg(long)]
        query: Option<String>,
    },

    /// Select (and optionally delete) documents past retention
    Cleanup {
        /// Document type; omit to apply every configured policy
        doc_type: Option<String>,

        /// Keep this many most-recent documents
        #[arg(long)]
        count: Option<usize>,

        /// Age limit in days
        #[arg(long)]
        window_days: Option<i64>,

        /// Report candidates without deleting (pass --dry-run=false to delete)
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        dry_run: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    match cli.command {
        Commands::Init { path } => doc::init(&output, path.unwrap_or(cli.root)),
        Commands::Mint {
            doc_type,
            generation,
            timestamp,
            entropy,
        } => token::mint(&output, &doc_type, generation, timestamp, entropy),
        Commands::Inspect { token } => token::inspect(&output, &token),
        Commands::Derive { token, new_type } => token::derive(&output, &token, &new_type),
        Commands::Put { id, file } => doc::put(&output, &cli.root, &id, file.as_deref()),
        Commands::Get { id } => doc::get(&output, &cli.root, &id),
        Commands::List { doc_type, query } => {
            query::list(&output, &cli.root, &doc_type, query.as_deref())
        }
        Commands::Latest { doc_type, query } => {
            query::latest(&output, &cli.root, &doc_type, query.as_deref())
        }
        Commands::Cleanup {
            doc_type,
            count,
            window_days,
            dry_run,
        } => cleanup::run(
            &output,
            &cli.root,
            doc_type.as_deref(),
            count,
            window_days,
            dry_run,
        ),
    }
}
