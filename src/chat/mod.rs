// src/chat/mod.rs
// =============================================================================
// The admissions chat boundary.
//
// The crawler's corpus grounds a remote assistant; this module is the client
// side of that assistant:
// - client: sends {message, language} to the chat endpoint
// - history: the locally stored conversation
// =============================================================================

mod client;
mod history;

pub use client::ChatClient;
pub use history::{ChatHistory, ChatMessage};

use crate::error::ChatError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Reply languages the assistant supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Tamil,
    Hindi,
    Telugu,
}

impl Language {
    /// What to show the user when a chat request fails.
    pub fn failure_message(self, error: &ChatError) -> String {
        if matches!(error, ChatError::Unreachable(_)) {
            return match self {
                Language::English => {
                    "Could not connect to server. Please check if the server is running."
                }
                Language::Tamil => "சேவையகத்துடன் தொடர்பு கொள்ள முடியவில்லை. சேவையகம் இயங்குகிறதா என்பதை சரிபார்க்கவும்.",
                Language::Hindi => "सर्वर से संपर्क नहीं हो पा रहा है। कृपया जांचें कि सर्वर चल रहा है।",
                Language::Telugu => "సర్వర్‌తో కనెక్ట్ చేయడం సాధ్యం కాలేదు. సర్వర్ రన్నింగ్‌లో ఉందో లేదో తనిఖీ చేయండి.",
            }
            .to_string();
        }

        match self {
            Language::English => error.to_string(),
            Language::Tamil => "மன்னிக்கவும், ஒரு பிழை ஏற்பட்டது. மீண்டும் முயற்சிக்கவும்.".to_string(),
            Language::Hindi => "क्षमा करें, एक त्रुटि हुई। कृपया पुनः प्रयास करें।".to_string(),
            Language::Telugu => "క్షమించండి, ఒక లోపం సంభవించింది. దయచేసి మళ్లీ ప్రయత్నించండి.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Language::Telugu).unwrap(), "\"telugu\"");
        let lang: Language = serde_json::from_str("\"hindi\"").unwrap();
        assert_eq!(lang, Language::Hindi);
    }

    #[test]
    fn english_failure_shows_the_error() {
        let msg = Language::English.failure_message(&ChatError::EndpointNotFound);
        assert!(msg.starts_with("API endpoint not found"));
    }

    #[test]
    fn unreachable_gets_connection_message() {
        let err = ChatError::Unreachable("refused".into());
        assert!(Language::English
            .failure_message(&err)
            .starts_with("Could not connect to server"));
        assert!(Language::Tamil.failure_message(&err).contains("சேவையகம்"));
    }

    #[test]
    fn other_languages_get_apology() {
        let msg = Language::Hindi.failure_message(&ChatError::Server);
        assert!(msg.starts_with("क्षमा करें"));
    }
}
