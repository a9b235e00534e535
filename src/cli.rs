// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Running the binary with no arguments at all performs the standard crawl,
// so every subcommand and every flag is optional. Flags only override the
// defaults in config.rs.
//
// Rust concepts:
// - Option<T> fields: "not given on the command line" is distinct from any value
// - Derive macros: Parser / Subcommand / Args generate the parsing code
// =============================================================================

use crate::chat::Language;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "campus-crawler",
    version,
    about = "Crawls a university website into a text corpus for an admissions assistant",
    long_about = "campus-crawler walks the pages of one website (same origin only), extracts \
                  their visible text and writes it as a single JSON corpus. The `ask` command \
                  sends a question to the admissions chat endpoint and keeps a local history."
)]
pub struct Cli {
    /// Defaults to `crawl` with built-in settings when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl the university website and write the corpus file
    ///
    /// Example: campus-crawler crawl --max-pages 20 --output corpus.json
    Crawl(CrawlArgs),

    /// Ask the admissions assistant a question
    ///
    /// Example: campus-crawler ask "What are the hostel fees?" --language tamil
    Ask(AskArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct CrawlArgs {
    /// Seed URL; only links on the same origin are followed
    #[arg(long)]
    pub origin: Option<String>,

    /// Maximum number of distinct pages to visit (default: 50)
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Where to write the corpus (default: university_context.json)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Per-request timeout in seconds (default: 10)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Retries for timeouts, connection errors and 5xx responses (default: 2)
    #[arg(long)]
    pub retries: Option<u32>,

    /// Pause between page fetches in milliseconds (default: 100)
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct AskArgs {
    /// The question to send
    pub message: String,

    /// Reply language; falls back to the one saved in the history file
    #[arg(long, value_enum)]
    pub language: Option<Language>,

    /// Chat endpoint (default: http://localhost:5003/api/chat)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Chat history file (default: chat_history.json)
    #[arg(long)]
    pub history: Option<PathBuf>,
}
