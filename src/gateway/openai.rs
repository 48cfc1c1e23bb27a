use super::chunk::TextSplitter;
use super::prompts;
use super::{GatewayError, LanguageModelGateway};
use crate::config::GatewayConfig;
use crate::interview::{render_conversation, Turn};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// Gateway backed by an OpenAI-compatible chat completions endpoint
pub struct OpenAiGateway {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    splitter: TextSplitter,
}

impl OpenAiGateway {
    pub fn new(config: &GatewayConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        info!(
            "Language model gateway: {} at {} (temperature {})",
            config.model, config.base_url, config.temperature
        );

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            splitter: TextSplitter::new(config.chunk_size, config.chunk_overlap),
        })
    }

    fn request_body(&self, system: &str, user: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        })
    }

    /// Send one system + user exchange and return the reply text
    async fn complete(&self, system: &str, user: &str) -> Result<String, GatewayError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(system, user))
            .send()
            .await
            .map_err(|e| GatewayError::new(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::new(format!("HTTP {}: {}", status, body)));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::new(format!("Failed to parse response: {}", e)))?;

        extract_content(&body)
    }
}

/// Pull `choices[0].message.content` out of a chat completions response
fn extract_content(body: &serde_json::Value) -> Result<String, GatewayError> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| GatewayError::new("Response has no message content"))
}

#[async_trait]
impl LanguageModelGateway for OpenAiGateway {
    fn name(&self) -> &str {
        "openai"
    }

    async fn ask_opening_question(&self, topic: &str) -> Result<String, GatewayError> {
        self.complete(prompts::INTERVIEWER_SYSTEM, &prompts::opening_question(topic))
            .await
    }

    async fn ask_next_question(&self, topic: &str, turns: &[Turn]) -> Result<String, GatewayError> {
        self.complete(
            prompts::INTERVIEWER_SYSTEM,
            &prompts::next_question(topic, turns),
        )
        .await
    }

    async fn summarize(&self, topic: &str, turns: &[Turn]) -> Result<String, GatewayError> {
        let chunks = self.splitter.split(&render_conversation(topic, turns));
        if chunks.len() == 1 {
            return self
                .complete(prompts::ANALYST_SYSTEM, &prompts::summarize_chunk(&chunks[0]))
                .await;
        }

        debug!("Summarizing transcript in {} chunks", chunks.len());
        let mut partials = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            partials.push(
                self.complete(prompts::ANALYST_SYSTEM, &prompts::summarize_chunk(chunk))
                    .await?,
            );
        }

        self.complete(
            prompts::ANALYST_SYSTEM,
            &prompts::combine_chunk_summaries(&partials),
        )
        .await
    }

    async fn synthesize(&self, summaries: &[String]) -> Result<String, GatewayError> {
        self.complete(prompts::ANALYST_SYSTEM, &prompts::synthesize(summaries))
            .await
    }

    async fn compare(&self, topic_summaries: &[(String, String)]) -> Result<String, GatewayError> {
        self.complete(prompts::ANALYST_SYSTEM, &prompts::compare(topic_summaries))
            .await
    }
}
