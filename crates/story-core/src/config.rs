//! Configuration module
//!
//! The moderation client is configured with an explicit struct injected by
//! the host application; nothing in the pipeline reads the environment on its
//! own. `from_env` is a convenience for hosts that do configure via env vars.

use std::env;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com/v1";

const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Moderation client configuration
#[derive(Clone, Debug)]
pub struct ModerationConfig {
    /// API credential, required before any request is issued
    pub api_key: String,
    /// Model identifier sent with each request
    pub model: String,
    /// Base endpoint URL (overridable for tests)
    pub api_base: String,
    /// Maximum output tokens for the classification response
    pub max_tokens: u32,
}

impl ModerationConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Build from the environment: `ANTHROPIC_API_KEY` is required,
    /// `STORY_MODERATION_MODEL` falls back to the default model.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let api_key = env::var("ANTHROPIC_API_KEY")
            .map_err(|_| anyhow::anyhow!("ANTHROPIC_API_KEY must be set for moderation"))?;
        let model =
            env::var("STORY_MODERATION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let config = Self::new(api_key, model);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.api_key.is_empty() {
            return Err(anyhow::anyhow!(
                "Moderation API key is required but not provided"
            ));
        }

        if self.api_key == "your-api-key" || self.api_key == "sk-ant-" || self.api_key.len() < 10 {
            return Err(anyhow::anyhow!(
                "Moderation API key appears to be invalid or a placeholder"
            ));
        }

        if self.model.is_empty() {
            return Err(anyhow::anyhow!("Moderation model identifier is empty"));
        }

        Ok(())
    }
}
