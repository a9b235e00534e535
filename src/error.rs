// src/error.rs
// =============================================================================
// Error types shared across the crawler and the chat client.
//
// Only PersistError and CrawlError end a crawl run. FetchError is always
// recovered by the traversal (the page just contributes nothing), and
// ChatError is turned into a user-facing message by the `ask` command.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Why a single page could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("redirected off the crawl origin to {0}")]
    OffOrigin(String),

    #[error("not an HTML page (content-type: {0})")]
    NotHtml(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl FetchError {
    /// Whether trying the same request again could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout | FetchError::Connect(_) => true,
            FetchError::Status(code) => *code == 429 || (500..600).contains(code),
            FetchError::OffOrigin(_) | FetchError::NotHtml(_) | FetchError::Request(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_connect() {
            FetchError::Connect(error.to_string())
        } else if let Some(status) = error.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Request(error.to_string())
        }
    }
}

/// The seed URL cannot start a crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("seed URL '{url}' is not on origin {origin}")]
    OffOrigin { url: String, origin: String },

    #[error("seed URL '{0}' is not http(s)")]
    UnsupportedScheme(String),
}

/// Writing a JSON file (the corpus or the chat history) failed.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A chat request did not produce an answer.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("could not reach the chat server: {0}")]
    Unreachable(String),

    #[error("API endpoint not found. Please check if the server is running.")]
    EndpointNotFound,

    #[error("Server error occurred. Please try again later.")]
    Server,

    #[error("API request failed with status {0}")]
    Status(u16),

    #[error("{0}")]
    Remote(String),

    #[error("No response received from server")]
    EmptyResponse,

    #[error("malformed reply: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_fetch_errors() {
        assert!(FetchError::Timeout.is_transient());
        assert!(FetchError::Connect("refused".into()).is_transient());
        assert!(FetchError::Status(503).is_transient());
        assert!(FetchError::Status(429).is_transient());
    }

    #[test]
    fn permanent_fetch_errors() {
        assert!(!FetchError::Status(404).is_transient());
        assert!(!FetchError::NotHtml("application/pdf".into()).is_transient());
        assert!(!FetchError::Request("builder".into()).is_transient());
        assert!(!FetchError::OffOrigin("https://other.example/".into()).is_transient());
    }

    #[test]
    fn persist_error_names_the_path() {
        let e = PersistError::Write {
            path: PathBuf::from("out/university_context.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("out/university_context.json"));
    }

    #[test]
    fn chat_error_display_matches_server_messages() {
        assert_eq!(
            ChatError::Status(418).to_string(),
            "API request failed with status 418"
        );
        assert_eq!(ChatError::Remote("quota".into()).to_string(), "quota");
    }
}
