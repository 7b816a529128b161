//! Critic agent: the single-call persona used in standard chat mode.

use async_trait::async_trait;

use super::config::AgentConfig;
use super::message::{ChatMessage, system_message};
use super::provider::LlmProvider;
use super::traits::{Agent, AgentResponse};
use crate::error::AgentError;

/// Sampling temperature for the critic.
const CRITIC_TEMPERATURE: f32 = 0.7;

/// Agent answering as a veteran wine critic, without routing or rewrites.
pub struct CriticAgent {
    model: String,
    max_tokens: u32,
    system_prompt: String,
}

impl CriticAgent {
    /// Creates a critic with the given persona prompt.
    #[must_use]
    pub fn new(config: &AgentConfig, system_prompt: String) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            system_prompt,
        }
    }

    /// Persona prompt followed by the history.
    #[must_use]
    pub fn build_messages(&self, history: &[ChatMessage]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(system_message(&self.system_prompt));
        messages.extend_from_slice(history);
        messages
    }

    /// Replies to the conversation so far.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on API failures.
    pub async fn reply(
        &self,
        provider: &dyn LlmProvider,
        history: &[ChatMessage],
    ) -> Result<AgentResponse, AgentError> {
        self.execute(provider, self.build_messages(history)).await
    }
}

#[async_trait]
impl Agent for CriticAgent {
    fn name(&self) -> &'static str {
        "critic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn temperature(&self) -> f32 {
        CRITIC_TEMPERATURE
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}
