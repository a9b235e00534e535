// src/crawl/queue.rs
// =============================================================================
// This module implements the site traversal.
//
// How it works:
// 1. Start with the seed URL on a stack
// 2. Pop a URL; skip it if it was already claimed or the page cap is reached
// 3. Claim it (mark visited) *before* fetching, so cycles can't re-enqueue it
// 4. Fetch the page; a failure is logged and the URL yields nothing
// 5. Record the page text and push its same-origin links (reversed, so the
//    first link in the document is popped first)
// 6. Repeat until the stack is empty or the page cap is reached
//
// The order matches a recursive "visit page, then visit each link in turn"
// walk, without growing the call stack on large sites.
//
// Politeness:
// - Only one request is in flight at a time
// - A short delay separates successive requests
//
// Rust concepts:
// - Generics: Crawler<F> works with any Fetcher (real HTTP or in-memory)
// - HashSet::insert returns whether the value was new: one atomic claim
// - Vec as a stack: push() / pop()
// =============================================================================

use super::fetch::Fetcher;
use crate::corpus::PageRecord;
use crate::error::CrawlError;
use crate::extract::{is_same_origin, parse_page};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// URLs already claimed during one run.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    /// Marks `url` visited. Returns false if it already was.
    pub fn claim(&mut self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }
}

/// Walks same-origin links from a seed URL and collects page text.
pub struct Crawler<F> {
    fetcher: F,
    origin: Url,
    max_pages: usize,
    delay: Duration,
}

// Per-run state. Created fresh by every crawl() call.
struct Traversal {
    visited: VisitedSet,
    stack: Vec<String>,
    records: Vec<PageRecord>,
    failed: usize,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F, origin: Url) -> Self {
        Self {
            fetcher,
            origin,
            max_pages: crate::config::DEFAULT_MAX_PAGES,
            delay: Duration::ZERO,
        }
    }

    /// Upper bound on distinct URLs visited per run (failed fetches count).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Pause between successive fetches.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    // Crawls from `seed_url` and returns the pages in visitation order
    //
    // Errors only when the seed itself is unusable; individual page failures
    // are logged and skipped.
    pub async fn crawl(&self, seed_url: &str) -> Result<Vec<PageRecord>, CrawlError> {
        let seed = self.validate_seed(seed_url)?;

        let mut run = Traversal {
            visited: VisitedSet::default(),
            stack: vec![seed.to_string()],
            records: Vec::new(),
            failed: 0,
        };

        while let Some(url) = run.stack.pop() {
            if run.visited.len() >= self.max_pages {
                break;
            }

            // Mark as visited before fetching
            if !run.visited.claim(&url) {
                continue;
            }

            if run.visited.len() > 1 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            log::info!("Scraping: {}", url);

            let fetched = match self.fetcher.fetch(&url).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    log::warn!("Error fetching {}: {}", url, e);
                    run.failed += 1;
                    continue;
                }
            };

            // A redirect may land on a page this run already has. Claim the
            // landing URL too while under the cap, so a later link to it is
            // not fetched again.
            let landed = fetched.url.as_str();
            if landed != url {
                if run.visited.urls.contains(landed) {
                    log::debug!("{} redirected to already visited {}", url, landed);
                    continue;
                }
                if run.visited.len() < self.max_pages {
                    run.visited.claim(landed);
                }
            }

            // Relative links are relative to where the body actually came from
            let page = parse_page(&fetched.body, &fetched.url, &self.origin);

            run.records.push(PageRecord {
                url: url.clone(),
                text: page.text,
            });

            // Reverse so the first link on the page is popped next
            for link in page.links.into_iter().rev() {
                if !run.visited.urls.contains(&link) {
                    run.stack.push(link);
                }
            }
        }

        log::info!(
            "Crawl finished: {} page(s) visited, {} recorded, {} failed",
            run.visited.len(),
            run.records.len(),
            run.failed
        );

        Ok(run.records)
    }

    fn validate_seed(&self, seed_url: &str) -> Result<Url, CrawlError> {
        let mut seed = Url::parse(seed_url).map_err(|source| CrawlError::InvalidSeed {
            url: seed_url.to_string(),
            source,
        })?;

        if seed.scheme() != "http" && seed.scheme() != "https" {
            return Err(CrawlError::UnsupportedScheme(seed_url.to_string()));
        }

        if !is_same_origin(&seed, &self.origin) {
            return Err(CrawlError::OffOrigin {
                url: seed_url.to_string(),
                origin: self.origin.origin().ascii_serialization(),
            });
        }

        // Same normalization as discovered links
        seed.set_fragment(None);
        Ok(seed)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a stack and not a queue?
//    - VecDeque + pop_front() would give breadth-first order
//    - Vec + pop() gives depth-first order: each link is followed all the
//      way down before its next sibling, like a recursive crawler
//
// 2. Why check `visited` on pop instead of on push?
//    - The same URL can be pushed by several pages before it is visited
//    - Only the first pop claims it; later pops are skipped by claim()
//    - The `contains` check on push just keeps the stack small
//
// 3. Why does a failed fetch still count toward max_pages?
//    - The URL was claimed before fetching, so it is in the visited set
//    - This guarantees the crawl terminates even on a site full of errors
//
// 4. Why claim the URL a redirect landed on?
//    - "/dir" redirecting to "/dir/" serves the same document as "/dir/"
//    - Claiming "/dir/" stops a later link to it from fetching it again
//
// 5. Why is Traversal a separate struct?
//    - All run state lives inside crawl(), so the same Crawler can run twice
//      without leftovers from the previous run
// -----------------------------------------------------------------------------
