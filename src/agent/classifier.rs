//! Classifier agent: routes a query to one of the six specialists.
//!
//! One deterministic model call per turn. Whatever the model answers is
//! normalized and matched against the specialist set; anything else falls
//! back to [`DEFAULT_SPECIALIST`]. A bad answer is never an error.

use std::fmt::Write;

use async_trait::async_trait;
use tracing::warn;

use super::config::AgentConfig;
use super::message::user_message;
use super::prompt::render;
use super::provider::LlmProvider;
use super::traits::{Agent, AgentResponse};
use crate::core::{AgentId, DEFAULT_SPECIALIST};
use crate::error::AgentError;

/// An identifier is a handful of tokens.
const CLASSIFIER_MAX_TOKENS: u32 = 32;

/// One-line routing description shown to the classifier for each specialist.
const fn routing_hint(id: AgentId) -> &'static str {
    match id {
        AgentId::WineKnowledge => {
            "Wine Knowledge Specialist - For questions about grape varieties, appellations, production techniques, vintages, aging potential"
        }
        AgentId::FoodPairing => "Food Pairing Expert - For questions about pairing wine with food",
        AgentId::Storyteller => {
            "Storyteller - For requests seeking engaging stories or descriptions about wines"
        }
        AgentId::Sales => {
            "Sales Strategist - For inquiries about pricing, deals, or purchasing recommendations"
        }
        AgentId::Inventory => {
            "Inventory Coordinator - For questions about availability, shipping, or logistics"
        }
        AgentId::Preferences => {
            "Preference Tracker - For personalized recommendations based on past preferences"
        }
        AgentId::Orchestrator | AgentId::ConciseHuman => "",
    }
}

/// Agent that picks the specialist for a query.
pub struct ClassifierAgent {
    model: String,
    template: String,
}

impl ClassifierAgent {
    /// Creates a classifier using the configured classifier model and the
    /// given routing template.
    #[must_use]
    pub fn new(config: &AgentConfig, template: String) -> Self {
        Self {
            model: config.classifier_model.clone(),
            template,
        }
    }

    /// Renders the routing instruction for `query`.
    #[must_use]
    pub fn build_prompt(&self, query: &str) -> String {
        let mut agents = String::new();
        let mut identifiers = String::new();
        for (idx, &id) in AgentId::specialists().iter().enumerate() {
            let _ = writeln!(agents, "{}. {}", idx + 1, routing_hint(id));
            let _ = writeln!(identifiers, "- {id}");
        }

        render(
            &self.template,
            &[
                ("query", query),
                ("agents", agents.trim_end()),
                ("identifiers", identifiers.trim_end()),
            ],
        )
    }

    /// Classifies `query`, returning the chosen specialist and the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] only when the provider call itself fails.
    /// Unusable model output maps to [`DEFAULT_SPECIALIST`].
    pub async fn classify(
        &self,
        provider: &dyn LlmProvider,
        query: &str,
    ) -> Result<(AgentId, AgentResponse), AgentError> {
        let prompt = self.build_prompt(query);
        let response = self.execute(provider, vec![user_message(&prompt)]).await?;
        let chosen = Self::parse_choice(&response.content);
        Ok((chosen, response))
    }

    /// Maps raw model output to a specialist.
    ///
    /// The output is trimmed and lower-cased, then it must match a specialist
    /// identifier exactly. No other cleanup is attempted.
    #[must_use]
    pub fn parse_choice(content: &str) -> AgentId {
        let normalized = content.trim().to_lowercase();
        AgentId::specialist_from_str(&normalized).unwrap_or_else(|| {
            warn!(
                raw = %content,
                fallback = %DEFAULT_SPECIALIST,
                "classifier returned an unknown agent, using fallback"
            );
            DEFAULT_SPECIALIST
        })
    }
}

#[async_trait]
impl Agent for ClassifierAgent {
    fn name(&self) -> &'static str {
        "classifier"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn temperature(&self) -> f32 {
        0.0
    }

    fn max_tokens(&self) -> u32 {
        CLASSIFIER_MAX_TOKENS
    }
}
