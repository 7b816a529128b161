//! Orchestrator for the sommelier pipeline.
//!
//! Coordinates one turn end to end:
//!
//! ```text
//! idle → classify → respond → harmonize → compress → idle
//! ```
//!
//! Each stage is a single model call made in order. A failing call aborts
//! the turn and its error is returned unchanged.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use super::aggregator::Aggregator;
use super::classifier::ClassifierAgent;
use super::config::AgentConfig;
use super::critic::CriticAgent;
use super::message::ChatMessage;
use super::prompt::PromptSet;
use super::provider::LlmProvider;
use super::specialist::SpecialistAgent;
use super::traits::AgentResponse;
use super::turn::{Stage, TurnState};
use crate::core::{AgentId, Context};
use crate::error::AgentError;

/// Orchestrates the classify, respond, harmonize, and compress stages.
pub struct Orchestrator {
    provider: Arc<dyn LlmProvider>,
    config: AgentConfig,
    prompts: PromptSet,
}

impl Orchestrator {
    /// Creates a new orchestrator with the given provider and configuration.
    ///
    /// Loads prompt templates from the directory specified in
    /// [`AgentConfig::prompt_dir`], falling back to compiled-in defaults.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, config: AgentConfig) -> Self {
        let prompts = PromptSet::load(config.prompt_dir.as_deref());
        Self::with_prompts(provider, config, prompts)
    }

    /// Creates an orchestrator with an explicit prompt set.
    #[must_use]
    pub fn with_prompts(
        provider: Arc<dyn LlmProvider>,
        config: AgentConfig,
        prompts: PromptSet,
    ) -> Self {
        Self {
            provider,
            config,
            prompts,
        }
    }

    /// The model provider.
    #[must_use]
    pub fn provider(&self) -> &dyn LlmProvider {
        &*self.provider
    }

    /// Active prompt templates.
    #[must_use]
    pub const fn prompts(&self) -> &PromptSet {
        &self.prompts
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Runs one sommelier turn.
    ///
    /// `conversation` is the history the specialist sees and must already
    /// end with the user's `query`. `context` is copied into the turn.
    ///
    /// # Steps
    ///
    /// 1. Classify the query to pick a specialist
    /// 2. Specialist answers with history and context
    /// 3. Harmonizer rewrites the answer's tone
    /// 4. Persona compresses it into the final reply
    ///
    /// # Errors
    ///
    /// Returns the first [`AgentError`] raised by any stage. Nothing is
    /// retried.
    pub async fn run_turn(
        &self,
        query: &str,
        conversation: Vec<ChatMessage>,
        context: &Context,
    ) -> Result<TurnState, AgentError> {
        let start = Instant::now();
        let mut state = TurnState::new(query, conversation, context.clone());

        state.advance(Stage::Classify);
        let stage_start = Instant::now();
        let (chosen, routing) = self.classify(query).await?;
        state.current_agent = Some(chosen);
        state.usage.accumulate(routing.usage);
        debug!(
            stage = %Stage::Classify,
            agent = %chosen,
            elapsed_ms = stage_start.elapsed().as_millis(),
            "stage complete"
        );

        state.advance(Stage::Respond);
        let stage_start = Instant::now();
        let specialist = SpecialistAgent::new(&self.config, chosen)?;
        let answer = specialist
            .respond(self.provider(), &state.conversation, &state.context)
            .await?;
        state.record(chosen, &answer.content, answer.usage);
        debug!(
            stage = %Stage::Respond,
            agent = %chosen,
            elapsed_ms = stage_start.elapsed().as_millis(),
            tokens = answer.usage.total_tokens,
            "stage complete"
        );

        Aggregator::new(&self.config, &self.prompts)
            .aggregate(self.provider(), &mut state)
            .await?;

        state.advance(Stage::Idle);
        state.elapsed = start.elapsed();
        info!(
            agent = %chosen,
            elapsed_ms = state.elapsed.as_millis(),
            tokens = state.usage.total_tokens,
            "turn complete"
        );
        Ok(state)
    }

    /// Picks the specialist for `query` without running the rest of the
    /// pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] only if the provider call fails.
    pub async fn classify(&self, query: &str) -> Result<(AgentId, AgentResponse), AgentError> {
        ClassifierAgent::new(&self.config, self.prompts.classifier.clone())
            .classify(self.provider(), query)
            .await
    }

    /// Standard-mode reply: one critic call over the history.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on API failures.
    pub async fn critic_reply(
        &self,
        history: &[ChatMessage],
    ) -> Result<AgentResponse, AgentError> {
        let start = Instant::now();
        let response = CriticAgent::new(&self.config, self.prompts.critic.clone())
            .reply(self.provider(), history)
            .await?;
        info!(
            agent = "critic",
            elapsed_ms = start.elapsed().as_millis(),
            tokens = response.usage.total_tokens,
            "turn complete"
        );
        Ok(response)
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .field("prompts", &self.prompts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::message::{Role, user_message};
    use crate::agent::testing::ScriptedProvider;

    fn orchestrator(provider: Arc<ScriptedProvider>) -> Orchestrator {
        let config = AgentConfig::builder()
            .api_key("test")
            .build()
            .unwrap_or_else(|_| unreachable!());
        Orchestrator::with_prompts(provider, config, PromptSet::defaults())
    }

    #[tokio::test]
    async fn test_run_turn_calls_stages_in_order() {
        let provider = Arc::new(ScriptedProvider::new([
            "food_pairing",
            "Pinot Noir suits salmon.",
            "A silky Pinot Noir would be lovely with salmon!",
            "Hmm, grab a chilled Pinot Noir.",
        ]));
        let query = "What pairs well with grilled salmon?";
        let state = orchestrator(Arc::clone(&provider))
            .run_turn(query, vec![user_message(query)], &Context::new())
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(state.stage, Stage::Idle);
        assert_eq!(state.current_agent, Some(AgentId::FoodPairing));
        assert_eq!(state.final_response, "Hmm, grab a chilled Pinot Noir.");
        assert_eq!(
            state.response_of(AgentId::FoodPairing),
            Some("Pinot Noir suits salmon.")
        );
        assert_eq!(state.usage.total_tokens, 60);

        let requests = provider.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].temperature, Some(0.0));
        assert_eq!(
            requests[1].messages[0].content,
            AgentId::FoodPairing.role().system_prompt
        );
        assert_eq!(requests[1].messages[1].role, Role::User);
        assert!(requests[2].messages[0].content.contains("food_pairing agent"));
        assert!(requests[3].messages[0].content.starts_with("You are Eleanor"));
    }

    #[tokio::test]
    async fn test_unknown_route_uses_default_specialist() {
        let provider = Arc::new(ScriptedProvider::new(["sommelier", "a", "b", "c"]));
        let state = orchestrator(Arc::clone(&provider))
            .run_turn("hi", vec![user_message("hi")], &Context::new())
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(state.current_agent, Some(crate::core::DEFAULT_SPECIALIST));
        assert_eq!(
            provider.requests()[1].messages[0].content,
            crate::core::DEFAULT_SPECIALIST.role().system_prompt
        );
    }

    #[tokio::test]
    async fn test_failure_stops_pipeline() {
        let provider = Arc::new(ScriptedProvider::new(["sales"]));
        provider.push_error("rate limited");
        let result = orchestrator(Arc::clone(&provider))
            .run_turn("deals?", vec![user_message("deals?")], &Context::new())
            .await;
        assert!(matches!(result, Err(AgentError::ApiRequest { .. })));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_critic_reply_is_single_call() {
        let provider = Arc::new(ScriptedProvider::new(["Riesling is underrated."]));
        let response = orchestrator(Arc::clone(&provider))
            .critic_reply(&[user_message("Riesling?")])
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(response.content, "Riesling is underrated.");
        assert_eq!(provider.call_count(), 1);
    }
}
