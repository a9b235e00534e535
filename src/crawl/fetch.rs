// src/crawl/fetch.rs
// =============================================================================
// How the crawler gets page bodies.
//
// The traversal only needs one operation, "give me the HTML at this URL", so
// that is all the Fetcher trait exposes. HttpFetcher is the real network
// implementation; Retrying wraps any fetcher with bounded retries.
//
// A fetch also reports the URL the body finally came from. Redirects are only
// followed within the crawl origin, and links on the page are resolved
// against that final URL.
//
// Retries happen *inside* a single fetch() call. The traversal still makes
// exactly one visit decision per URL.
// =============================================================================

use crate::config::CrawlConfig;
use crate::error::FetchError;
use crate::extract::is_same_origin;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const MAX_REDIRECTS: usize = 5;

/// A successfully fetched HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Where the body came from after any redirects
    pub url: Url,
    pub body: String,
}

/// Source of page bodies for the crawler.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// Returns the body of a successful (2xx) HTML response on the origin.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Fetches pages over HTTP(S) with reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    origin: Url,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(same_origin_redirects(config.origin.clone()))
            .build()?;

        Ok(Self {
            client,
            origin: config.origin.clone(),
        })
    }
}

// Follows up to MAX_REDIRECTS hops, but stops at the first hop that would
// leave the origin. The 3xx response is then returned to fetch() as-is.
fn same_origin_redirects(origin: Url) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if !is_same_origin(attempt.url(), &origin) {
            attempt.stop()
        } else {
            attempt.follow()
        }
    })
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status.is_redirection() {
            let target = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();
            return Err(FetchError::OffOrigin(target));
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        if !is_same_origin(&final_url, &self.origin) {
            return Err(FetchError::OffOrigin(final_url.to_string()));
        }

        // A missing header is given the benefit of the doubt
        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_html(content_type) {
                return Err(FetchError::NotHtml(content_type.to_string()));
            }
        }

        let body = response.text().await?;
        Ok(FetchedPage {
            url: final_url,
            body,
        })
    }
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// How many times to retry a transient failure, and how long to wait.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each one after.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.retry_base_delay,
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(16))
    }
}

/// Retries transient failures of the wrapped fetcher with exponential backoff.
#[derive(Debug, Clone)]
pub struct Retrying<F> {
    inner: F,
    policy: RetryPolicy,
}

impl<F> Retrying<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<F: Fetcher> Fetcher for Retrying<F> {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut attempt = 0;
        loop {
            match self.inner.fetch(url).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_transient() && attempt < self.policy.max_retries => {
                    let delay = self.policy.delay_for(attempt);
                    attempt += 1;
                    log::warn!(
                        "Attempt {} failed for {}: {} (retrying in {:?})",
                        attempt,
                        url,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn page_at(url: &str, body: &str) -> FetchedPage {
        FetchedPage {
            url: Url::parse(url).unwrap(),
            body: body.to_string(),
        }
    }

    /// An in-memory website. Every call is recorded so tests can check that
    /// nothing was fetched twice.
    #[derive(Default)]
    pub struct MapFetcher {
        pages: HashMap<String, Result<FetchedPage, FetchError>>,
        calls: Mutex<Vec<String>>,
    }

    impl MapFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), Ok(page_at(url, html)));
            self
        }

        /// `from` answers with the body of `to`, as if redirected there.
        pub fn redirect(mut self, from: &str, to: &str, html: &str) -> Self {
            self.pages.insert(from.to_string(), Ok(page_at(to, html)));
            self
        }

        pub fn failing(mut self, url: &str, error: FetchError) -> Self {
            self.pages.insert(url.to_string(), Err(error));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Fetcher for MapFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .unwrap_or(Err(FetchError::Status(404)))
        }
    }

    /// Replays a fixed sequence of outcomes, one per call.
    pub struct ScriptedFetcher {
        outcomes: Mutex<VecDeque<Result<String, FetchError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedFetcher {
        pub fn new(outcomes: Vec<Result<String, FetchError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: Mutex::new(0),
            }
        }

        pub fn call_count(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl Fetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
            *self.calls.lock().unwrap() += 1;
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(FetchError::Request("script exhausted".into())))
                .map(|body| page_at(url, &body))
        }
    }

    /// Starts a throwaway HTTP/1.1 server on 127.0.0.1 and returns its base
    /// URL (no trailing slash). `handler` maps a request path to a raw
    /// response; `None` makes the server hang without answering.
    pub async fn serve<H>(handler: H) -> String
    where
        H: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handler = Arc::new(handler);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 8192];
                    let mut read = 0;
                    while read < buf.len() {
                        let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        read += n;
                        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }

                    let request = String::from_utf8_lossy(&buf[..read]).to_string();
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

                    match handler(&path) {
                        Some(response) => {
                            let _ = socket.write_all(response.as_bytes()).await;
                            let _ = socket.shutdown().await;
                        }
                        None => tokio::time::sleep(Duration::from_secs(30)).await,
                    }
                });
            }
        });

        format!("http://{}", addr)
    }

    pub fn respond(status: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        )
    }

    pub fn html(body: &str) -> String {
        respond("200 OK", "text/html; charset=utf-8", body)
    }

    pub fn redirect_to(location: &str) -> String {
        format!(
            "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            location
        )
    }

    pub fn not_found() -> String {
        respond("404 Not Found", "text/html", "missing")
    }

    /// Fetcher config pointed at a local test server.
    pub fn local_config(base: &str, timeout: Duration) -> CrawlConfig {
        CrawlConfig {
            origin: Url::parse(base).unwrap(),
            timeout,
            ..CrawlConfig::default()
        }
    }
}
