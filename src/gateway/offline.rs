use super::{GatewayError, LanguageModelGateway};
use crate::interview::Turn;
use async_trait::async_trait;

/// Stand-in gateway for running without an API key
///
/// Sessions, stored transcripts and statistics keep working; anything that
/// needs the model fails with a message naming the missing key.
pub struct OfflineGateway {
    api_key_env: String,
}

impl OfflineGateway {
    pub fn new(api_key_env: impl Into<String>) -> Self {
        Self {
            api_key_env: api_key_env.into(),
        }
    }

    fn unavailable(&self) -> GatewayError {
        GatewayError::new(format!(
            "No language model configured. Set the {} environment variable and restart.",
            self.api_key_env
        ))
    }
}

#[async_trait]
impl LanguageModelGateway for OfflineGateway {
    fn name(&self) -> &str {
        "offline"
    }

    fn is_online(&self) -> bool {
        false
    }

    async fn ask_opening_question(&self, _topic: &str) -> Result<String, GatewayError> {
        Err(self.unavailable())
    }

    async fn ask_next_question(&self, _topic: &str, _turns: &[Turn]) -> Result<String, GatewayError> {
        Err(self.unavailable())
    }

    async fn summarize(&self, _topic: &str, _turns: &[Turn]) -> Result<String, GatewayError> {
        Err(self.unavailable())
    }

    async fn synthesize(&self, _summaries: &[String]) -> Result<String, GatewayError> {
        Err(self.unavailable())
    }

    async fn compare(&self, _topic_summaries: &[(String, String)]) -> Result<String, GatewayError> {
        Err(self.unavailable())
    }
}
