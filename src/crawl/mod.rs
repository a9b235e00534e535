// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Depth-first traversal starting from a seed URL
// - Same-origin restriction (never leaves the target site)
// - Page cap on distinct URLs visited
// - Per-request timeout and bounded retries for transient failures
// - Polite crawling: one request at a time, with a delay between them
//
// Submodules:
// - fetch: the Fetcher trait and its HTTP / retrying implementations
// - queue: the traversal itself
// =============================================================================

mod fetch;
mod queue;

pub use fetch::{HttpFetcher, RetryPolicy, Retrying};
pub use queue::Crawler;
