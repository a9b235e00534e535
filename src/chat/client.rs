// src/chat/client.rs
// =============================================================================
// HTTP client for the admissions chat endpoint.
//
// Request:  POST {"message": "...", "language": "tamil"}
// Response: {"response": "...", "status": "success"}
//       or: {"status": "error", "error": "..."}
// =============================================================================

use super::Language;
use crate::error::ChatError;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    language: Language,
}

// Every field is optional so both reply shapes deserialize
#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct ChatClient {
    client: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Sends one message and returns the assistant's answer.
    pub async fn send(&self, message: &str, language: Language) -> Result<String, ChatError> {
        log::debug!("Sending chat request to {} ({:?})", self.endpoint, language);

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&ChatRequest { message, language })
            .send()
            .await
            .map_err(|e| ChatError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Malformed(e.to_string()))?;

        log::debug!("Chat response status: {}", status);
        interpret_reply(status, &body)
    }
}

// Maps an HTTP status and body onto the assistant's answer or a ChatError
fn interpret_reply(status: StatusCode, body: &str) -> Result<String, ChatError> {
    if !status.is_success() {
        return Err(match status {
            StatusCode::NOT_FOUND => ChatError::EndpointNotFound,
            StatusCode::INTERNAL_SERVER_ERROR => ChatError::Server,
            other => ChatError::Status(other.as_u16()),
        });
    }

    let reply: ChatReply =
        serde_json::from_str(body).map_err(|e| ChatError::Malformed(e.to_string()))?;

    if reply.status.as_deref() == Some("error") {
        return Err(ChatError::Remote(
            reply
                .error
                .unwrap_or_else(|| "Server error occurred".to_string()),
        ));
    }

    match reply.response {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ChatError::EmptyResponse),
    }
}
