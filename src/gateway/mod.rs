//! Language model gateway
//!
//! Stateless request/response access to a hosted language model. The interview
//! and report code only ever talk to the `LanguageModelGateway` trait:
//! - `OpenAiGateway` - OpenAI-compatible chat completions over HTTP
//! - `OfflineGateway` - used when no API key is configured; every call fails

mod chunk;
mod offline;
mod openai;
pub mod prompts;

pub use chunk::TextSplitter;
pub use offline::OfflineGateway;
pub use openai::OpenAiGateway;

use crate::interview::Turn;
use async_trait::async_trait;
use thiserror::Error;

/// Any failure from the language model, not distinguished further
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Language model gateway error: {message}")]
pub struct GatewayError {
    pub message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Capabilities the interview and report flows need from a language model
#[async_trait]
pub trait LanguageModelGateway: Send + Sync {
    /// Gateway name for logging
    fn name(&self) -> &str;

    /// Whether calls can succeed at all (false for the offline gateway)
    fn is_online(&self) -> bool {
        true
    }

    /// First question of an interview, seeded by the topic
    async fn ask_opening_question(&self, topic: &str) -> Result<String, GatewayError>;

    /// Follow-up question given the full ordered turn history
    async fn ask_next_question(&self, topic: &str, turns: &[Turn]) -> Result<String, GatewayError>;

    /// Summary of one interview (map phase)
    async fn summarize(&self, topic: &str, turns: &[Turn]) -> Result<String, GatewayError>;

    /// Organizational report from all per-interview summaries (reduce phase)
    async fn synthesize(&self, summaries: &[String]) -> Result<String, GatewayError>;

    /// Comparative analysis across `(topic, summary)` pairs
    async fn compare(&self, topic_summaries: &[(String, String)]) -> Result<String, GatewayError>;
}
