//! Aggregator: the two rewrite passes applied after the specialist answers.
//!
//! ```text
//! specialist reply → HarmonizerAgent (tone) → PersonaAgent (length, voice) → final text
//! ```
//!
//! Neither pass adds information; each only reshapes the text it is given.

use std::time::Instant;

use tracing::debug;

use super::config::AgentConfig;
use super::harmonizer::HarmonizerAgent;
use super::persona::PersonaAgent;
use super::prompt::PromptSet;
use super::provider::LlmProvider;
use super::turn::{Stage, TurnState};
use crate::core::AgentId;
use crate::error::AgentError;

/// Runs the harmonization and compression passes over a turn.
pub struct Aggregator {
    harmonizer: HarmonizerAgent,
    persona: PersonaAgent,
}

impl Aggregator {
    /// Creates an aggregator from configuration and prompt templates.
    #[must_use]
    pub fn new(config: &AgentConfig, prompts: &PromptSet) -> Self {
        Self {
            harmonizer: HarmonizerAgent::new(config, prompts.harmonizer.clone()),
            persona: PersonaAgent::new(config, prompts.compression.clone()),
        }
    }

    /// Rewrites the specialist reply recorded in `state`.
    ///
    /// Records the harmonized text under [`AgentId::Orchestrator`], the
    /// compressed text under [`AgentId::ConciseHuman`], and sets
    /// [`TurnState::final_response`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Orchestration`] if no specialist reply has been
    /// recorded, or any provider error from either pass.
    pub async fn aggregate(
        &self,
        provider: &dyn LlmProvider,
        state: &mut TurnState,
    ) -> Result<(), AgentError> {
        let (specialist, raw) = state
            .specialist_reply()
            .map(|(id, text)| (id, text.to_string()))
            .ok_or_else(|| AgentError::Orchestration {
                message: "aggregation requires a specialist reply".to_string(),
            })?;

        state.advance(Stage::Harmonize);
        let start = Instant::now();
        let harmonized = self
            .harmonizer
            .harmonize(provider, &state.query, specialist, &raw)
            .await?;
        state.record(AgentId::Orchestrator, &harmonized.content, harmonized.usage);
        debug!(
            stage = %Stage::Harmonize,
            elapsed_ms = start.elapsed().as_millis(),
            tokens = harmonized.usage.total_tokens,
            "stage complete"
        );

        state.advance(Stage::Compress);
        let start = Instant::now();
        let compressed = self
            .persona
            .compress(provider, &state.query, &harmonized.content)
            .await?;
        state.record(AgentId::ConciseHuman, &compressed.content, compressed.usage);
        debug!(
            stage = %Stage::Compress,
            elapsed_ms = start.elapsed().as_millis(),
            tokens = compressed.usage.total_tokens,
            "stage complete"
        );

        state.final_response = compressed.content;
        Ok(())
    }
}
