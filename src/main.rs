// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (RUST_LOG overrides the default `info` level)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the crawl (default) or ask handler
// 4. Exit with proper code (0 = success, 1 = chat request failed, 2 = error)
//
// Rust concepts used:
// - async/await: network requests and file writes
// - Result<T, E> with `?`: any fatal error bubbles up to main
// - match: Pattern matching to handle different subcommands
// =============================================================================

mod chat;          // src/chat/ - admissions chat client and history
mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - defaults and overrides
mod corpus;        // src/corpus.rs - building and writing the corpus file
mod crawl;         // src/crawl/ - website crawling logic
mod error;         // src/error.rs - error types
mod extract;       // src/extract/ - HTML text and link extraction

use anyhow::{Context, Result};
use chat::{ChatClient, ChatHistory, ChatMessage};
use clap::Parser;
use cli::{Cli, Commands, CrawlArgs};
use config::{ChatConfig, CrawlConfig};
use crawl::{Crawler, HttpFetcher, RetryPolicy, Retrying};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = success
//   Ok(1) = the chat request failed (message already shown to the user)
//   Err   = fatal error (bad configuration, corpus could not be written)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    // No subcommand means the standard crawl with built-in settings
    match cli.command.unwrap_or_else(|| Commands::Crawl(CrawlArgs::default())) {
        Commands::Crawl(args) => handle_crawl(CrawlConfig::from_args(&args)?).await,
        Commands::Ask(args) => handle_ask(&args.message, ChatConfig::from_args(&args)).await,
    }
}

// Crawls the site, builds the corpus and writes it to disk
async fn handle_crawl(config: CrawlConfig) -> Result<i32> {
    println!("🔍 Starting web scraping: {}", config.origin);
    println!("📊 Page limit: {}", config.max_pages);

    let fetcher = Retrying::new(HttpFetcher::new(&config)?, RetryPolicy::from_config(&config));

    let crawler = Crawler::new(fetcher, config.origin.clone())
        .with_max_pages(config.max_pages)
        .with_delay(config.request_delay);

    let records = crawler.crawl(config.origin.as_str()).await?;

    println!("📄 Scraped {} page(s)", records.len());

    let corpus = corpus::build_corpus(&records, &config.origin);
    corpus::persist_corpus(&corpus, &config.output)
        .await
        .with_context(|| format!("could not save corpus to {}", config.output.display()))?;

    println!(
        "✅ Content processed and saved to {} ({} characters)",
        config.output.display(),
        corpus.university_info.chars().count()
    );

    Ok(0)
}

// Sends one question to the chat endpoint and records the exchange
async fn handle_ask(message: &str, config: ChatConfig) -> Result<i32> {
    let mut history = ChatHistory::load(&config.history_path).await;

    if config.language.is_some() {
        history.language = config.language;
    }
    let language = history.language.unwrap_or_default();

    history.push(ChatMessage::user(message));

    let client = ChatClient::new(&config.endpoint, config.timeout)?;
    let code = match client.send(message, language).await {
        Ok(answer) => {
            println!("{}", answer);
            history.push(ChatMessage::assistant(&answer));
            0
        }
        Err(e) => {
            log::error!("Error calling AI API: {}", e);
            eprintln!("{}", language.failure_message(&e));
            1
        }
    };

    if let Err(e) = history.save(&config.history_path).await {
        log::warn!(
            "Error saving chat history to {}: {:#}",
            config.history_path.display(),
            e
        );
    }

    Ok(code)
}
