//! Harmonizer agent: first rewrite pass over a specialist's answer.
//!
//! Keeps every fact and recommendation, changes only the tone. Speaks in
//! the registry's [`AgentId::Orchestrator`] role.

use async_trait::async_trait;

use super::config::AgentConfig;
use super::message::system_message;
use super::prompt::render;
use super::provider::LlmProvider;
use super::traits::{Agent, AgentResponse};
use crate::core::AgentId;
use crate::error::AgentError;

/// Sampling temperature for the harmonization pass.
const HARMONIZER_TEMPERATURE: f32 = 0.7;

/// Agent that turns a specialist reply into a warm, persuasive answer.
pub struct HarmonizerAgent {
    model: String,
    max_tokens: u32,
    template: String,
}

impl HarmonizerAgent {
    /// Creates a harmonizer with the given instruction template.
    #[must_use]
    pub fn new(config: &AgentConfig, template: String) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            template,
        }
    }

    /// Renders the harmonization instruction.
    #[must_use]
    pub fn build_prompt(&self, query: &str, specialist: AgentId, response: &str) -> String {
        render(
            &self.template,
            &[
                ("query", query),
                ("agent", specialist.as_str()),
                ("response", response),
            ],
        )
    }

    /// Rewrites `response` for the user who asked `query`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on API failures.
    pub async fn harmonize(
        &self,
        provider: &dyn LlmProvider,
        query: &str,
        specialist: AgentId,
        response: &str,
    ) -> Result<AgentResponse, AgentError> {
        let prompt = self.build_prompt(query, specialist, response);
        self.execute(provider, vec![system_message(&prompt)]).await
    }
}

#[async_trait]
impl Agent for HarmonizerAgent {
    fn name(&self) -> &'static str {
        AgentId::Orchestrator.as_str()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn temperature(&self) -> f32 {
        HARMONIZER_TEMPERATURE
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::message::Role;
    use crate::agent::prompt::HARMONIZER_TEMPLATE;
    use crate::agent::testing::ScriptedProvider;

    fn harmonizer() -> HarmonizerAgent {
        let config = AgentConfig::builder()
            .api_key("test")
            .build()
            .unwrap_or_else(|_| unreachable!());
        HarmonizerAgent::new(&config, HARMONIZER_TEMPLATE.to_string())
    }

    #[test]
    fn test_prompt_carries_query_agent_and_response() {
        let prompt = harmonizer().build_prompt(
            "What pairs well with grilled salmon?",
            AgentId::FoodPairing,
            "Pinot Noir, because its acidity cuts the fat.",
        );
        assert!(prompt.contains("The user asked: What pairs well with grilled salmon?"));
        assert!(prompt.contains("The food_pairing agent provided this response:"));
        assert!(prompt.contains("Pinot Noir, because its acidity cuts the fat."));
    }

    #[tokio::test]
    async fn test_harmonize_sends_one_system_message() {
        let provider = ScriptedProvider::new(["A lovely Pinot Noir awaits!"]);
        let response = harmonizer()
            .harmonize(&provider, "salmon?", AgentId::FoodPairing, "Pinot Noir.")
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(response.content, "A lovely Pinot Noir awaits!");

        let requests = provider.requests();
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[0].messages[0].role, Role::System);
        assert_eq!(requests[0].temperature, Some(HARMONIZER_TEMPERATURE));
    }
}
