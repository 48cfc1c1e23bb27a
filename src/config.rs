use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub interview: InterviewConfig,
    pub gateway: GatewayConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
    /// Directory served at `/` (the tabbed web form)
    pub static_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "alignment-facilitator".to_string(),
            http: HttpConfig::default(),
            static_dir: PathBuf::from("static"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 7860,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InterviewConfig {
    /// Answers collected before an interview completes
    pub max_turns: usize,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self { max_turns: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub model: String,
    pub temperature: f32,
    /// OpenAI-compatible API root, without the `/chat/completions` suffix
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// Map-phase input split size, in characters
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4-turbo-preview".to_string(),
            temperature: 0.7,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
            chunk_size: 4000,
            chunk_overlap: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub transcripts_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            transcripts_path: PathBuf::from("conversations"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from an optional file (any format the `config` crate knows) with
    /// `ALIGNMENT__SECTION__KEY` environment overrides on top.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("ALIGNMENT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path))?;

        let cfg: Self = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interview.max_turns == 0 {
            anyhow::bail!("interview.max_turns must be at least 1");
        }
        if self.gateway.chunk_size == 0 {
            anyhow::bail!("gateway.chunk_size must be at least 1");
        }
        if self.gateway.chunk_overlap >= self.gateway.chunk_size {
            anyhow::bail!("gateway.chunk_overlap must be smaller than gateway.chunk_size");
        }
        Ok(())
    }

    /// API key from the configured environment variable, if set and non-empty
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.gateway.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
