//! Agent configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use std::path::PathBuf;

use crate::error::AgentError;

/// Default chat model for every stage.
const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default provider name.
const DEFAULT_PROVIDER: &str = "openai";
/// Default maximum tokens per completion.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Configuration for the chat pipeline.
#[derive(Clone)]
pub struct AgentConfig {
    /// LLM provider name (e.g., "openai").
    pub provider: String,
    /// API key for the provider.
    pub api_key: String,
    /// Optional base URL override (for proxies or compatible APIs).
    pub base_url: Option<String>,
    /// Model for the specialist, harmonizer, persona, and critic agents.
    pub model: String,
    /// Model for the classifier. Defaults to [`AgentConfig::model`].
    pub classifier_model: String,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
    /// Directory containing prompt template overrides.
    ///
    /// When set, instruction templates are loaded from markdown files in
    /// this directory, falling back to compiled-in defaults for any
    /// missing files.
    pub prompt_dir: Option<PathBuf>,
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key is found.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::builder().from_env().build()
    }
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("classifier_model", &self.classifier_model)
            .field("max_tokens", &self.max_tokens)
            .field("prompt_dir", &self.prompt_dir)
            .finish()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    classifier_model: Option<String>,
    max_tokens: Option<u32>,
    prompt_dir: Option<PathBuf>,
}

/// Reads an environment variable, treating blank values as unset.
fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.provider.is_none() {
            self.provider = env_nonempty("SOMMELIER_PROVIDER");
        }
        if self.api_key.is_none() {
            self.api_key =
                env_nonempty("OPENAI_API_KEY").or_else(|| env_nonempty("SOMMELIER_API_KEY"));
        }
        if self.base_url.is_none() {
            self.base_url =
                env_nonempty("OPENAI_BASE_URL").or_else(|| env_nonempty("SOMMELIER_BASE_URL"));
        }
        if self.model.is_none() {
            self.model = env_nonempty("SOMMELIER_MODEL");
        }
        if self.classifier_model.is_none() {
            self.classifier_model = env_nonempty("SOMMELIER_CLASSIFIER_MODEL");
        }
        if self.max_tokens.is_none() {
            self.max_tokens = env_nonempty("SOMMELIER_MAX_TOKENS").and_then(|v| v.parse().ok());
        }
        if self.prompt_dir.is_none() {
            self.prompt_dir = env_nonempty("SOMMELIER_PROMPT_DIR").map(PathBuf::from);
        }
        self
    }

    /// Sets the LLM provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model used by every stage except classification.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the classifier model.
    #[must_use]
    pub fn classifier_model(mut self, model: impl Into<String>) -> Self {
        self.classifier_model = Some(model.into());
        self
    }

    /// Sets the maximum tokens per completion.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the prompt template directory.
    #[must_use]
    pub fn prompt_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompt_dir = Some(dir.into());
        self
    }

    /// Builds the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no non-blank API key was set,
    /// or [`AgentError::Configuration`] if `max_tokens` is zero.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(AgentError::ApiKeyMissing)?;

        let max_tokens = self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
        if max_tokens == 0 {
            return Err(AgentError::Configuration {
                message: "max_tokens must be greater than zero".to_string(),
            });
        }

        let model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let classifier_model = self.classifier_model.unwrap_or_else(|| model.clone());

        Ok(AgentConfig {
            provider: self
                .provider
                .unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
            api_key,
            base_url: self.base_url,
            model,
            classifier_model,
            max_tokens,
            prompt_dir: self.prompt_dir,
        })
    }
}
