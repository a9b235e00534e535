// src/config.rs
// =============================================================================
// Runtime settings for the crawl and ask commands.
//
// Every value has a compiled-in default so that running the binary with no
// arguments performs the standard crawl. CLI flags override individual fields
// (see cli.rs).
// =============================================================================

use crate::chat::Language;
use crate::cli::{AskArgs, CrawlArgs};
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ORIGIN: &str = "https://kanchiuniv.ac.in";
pub const DEFAULT_MAX_PAGES: usize = 50;
pub const DEFAULT_OUTPUT: &str = "university_context.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_BASE_MS: u64 = 500;
pub const DEFAULT_DELAY_MS: u64 = 100;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; campus-crawler/0.1; +https://kanchiuniv.ac.in)";

pub const DEFAULT_CHAT_ENDPOINT: &str = "http://localhost:5003/api/chat";
pub const DEFAULT_HISTORY_FILE: &str = "chat_history.json";

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Seed URL; its scheme/host/port define which links are in scope.
    pub origin: Url,
    pub max_pages: usize,
    pub output: PathBuf,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
    /// Pause between successive fetches.
    pub request_delay: Duration,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            // A constant URL; parsing cannot fail.
            origin: Url::parse(DEFAULT_ORIGIN).unwrap(),
            max_pages: DEFAULT_MAX_PAGES,
            output: PathBuf::from(DEFAULT_OUTPUT),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_RETRIES,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_MS),
            request_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlConfig {
    /// Defaults with any flags given on the command line applied on top.
    pub fn from_args(args: &CrawlArgs) -> Result<Self> {
        let mut config = Self::default();

        if let Some(origin) = &args.origin {
            config.origin =
                Url::parse(origin).map_err(|e| anyhow!("Invalid URL '{}': {}", origin, e))?;
        }
        if let Some(max_pages) = args.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(output) = &args.output {
            config.output = output.clone();
        }
        if let Some(secs) = args.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = args.retries {
            config.max_retries = retries;
        }
        if let Some(ms) = args.delay_ms {
            config.request_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub endpoint: String,
    pub history_path: PathBuf,
    /// Overrides the language stored in the history file.
    pub language: Option<Language>,
    pub timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            history_path: PathBuf::from(DEFAULT_HISTORY_FILE),
            language: None,
            // The model behind the endpoint can be slow to answer.
            timeout: Duration::from_secs(60),
        }
    }
}

impl ChatConfig {
    pub fn from_args(args: &AskArgs) -> Self {
        let mut config = Self::default();
        if let Some(endpoint) = &args.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(history) = &args.history {
            config.history_path = history.clone();
        }
        config.language = args.language;
        config
    }
}
