//! Specialist agent: answers a query in the voice of one registry role.

use async_trait::async_trait;

use super::config::AgentConfig;
use super::message::{ChatMessage, system_message};
use super::provider::LlmProvider;
use super::traits::{Agent, AgentResponse};
use crate::core::{AgentId, Context};
use crate::error::AgentError;

/// Sampling temperature for specialist replies.
const SPECIALIST_TEMPERATURE: f32 = 0.7;

/// Agent speaking as one of the six specialists.
pub struct SpecialistAgent {
    id: AgentId,
    model: String,
    max_tokens: u32,
}

impl SpecialistAgent {
    /// Creates a specialist for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnknownAgent`] if `id` is a post-processing role.
    pub fn new(config: &AgentConfig, id: AgentId) -> Result<Self, AgentError> {
        if !id.is_specialist() {
            return Err(AgentError::UnknownAgent {
                identifier: id.to_string(),
            });
        }
        Ok(Self {
            id,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// The specialist this agent speaks for.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Lays out the messages for one specialist call.
    ///
    /// Role prompt first, then the history untouched, then the context as a
    /// trailing system message when there is any.
    #[must_use]
    pub fn build_messages(&self, history: &[ChatMessage], context: &Context) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(system_message(self.id.role().system_prompt));
        messages.extend_from_slice(history);
        if !context.is_empty() {
            messages.push(system_message(&format!(
                "Additional context:\n{}",
                context.to_pretty_json()
            )));
        }
        messages
    }

    /// Produces the specialist's reply for the conversation so far.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on API failures.
    pub async fn respond(
        &self,
        provider: &dyn LlmProvider,
        history: &[ChatMessage],
        context: &Context,
    ) -> Result<AgentResponse, AgentError> {
        let messages = self.build_messages(history, context);
        self.execute(provider, messages).await
    }
}

#[async_trait]
impl Agent for SpecialistAgent {
    fn name(&self) -> &'static str {
        self.id.as_str()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn temperature(&self) -> f32 {
        SPECIALIST_TEMPERATURE
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::message::{Role, assistant_message, user_message};
    use crate::agent::testing::ScriptedProvider;

    fn config() -> AgentConfig {
        AgentConfig::builder()
            .api_key("test")
            .model("specialist-model")
            .max_tokens(512)
            .build()
            .unwrap_or_else(|_| unreachable!())
    }

    fn agent(id: AgentId) -> SpecialistAgent {
        SpecialistAgent::new(&config(), id).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn test_rejects_post_processing_roles() {
        assert!(matches!(
            SpecialistAgent::new(&config(), AgentId::Orchestrator),
            Err(AgentError::UnknownAgent { .. })
        ));
        assert!(SpecialistAgent::new(&config(), AgentId::ConciseHuman).is_err());
    }

    #[test]
    fn test_messages_without_context() {
        let history = vec![user_message("Hi"), assistant_message("Hello"), user_message("Tell me about Barolo")];
        let messages = agent(AgentId::WineKnowledge).build_messages(&history, &Context::new());

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, AgentId::WineKnowledge.role().system_prompt);
        assert_eq!(&messages[1..], history.as_slice());
    }

    #[test]
    fn test_messages_with_context_trail_history() {
        let mut context = Context::new();
        context.add("k", "v");
        let history = vec![user_message("q")];
        let messages = agent(AgentId::Sales).build_messages(&history, &context);

        assert_eq!(messages.len(), 3);
        let last = &messages[2];
        assert_eq!(last.role, Role::System);
        assert_eq!(last.content, "Additional context:\n{\n  \"k\": \"v\"\n}");
    }

    #[tokio::test]
    async fn test_respond_uses_specialist_settings() {
        let provider = ScriptedProvider::new(["Try a Pinot Noir."]);
        let response = agent(AgentId::FoodPairing)
            .respond(&provider, &[user_message("salmon?")], &Context::new())
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(response.content, "Try a Pinot Noir.");

        let requests = provider.requests();
        assert_eq!(requests[0].model, "specialist-model");
        assert_eq!(requests[0].temperature, Some(SPECIALIST_TEMPERATURE));
        assert_eq!(requests[0].max_tokens, Some(512));
    }
}
