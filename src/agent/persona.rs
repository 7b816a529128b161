//! Persona agent: second rewrite pass, compressing the harmonized answer
//! into the registry's [`AgentId::ConciseHuman`] voice.

use async_trait::async_trait;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use super::config::AgentConfig;
use super::message::system_message;
use super::prompt::render;
use super::provider::LlmProvider;
use super::traits::{Agent, AgentResponse};
use crate::core::AgentId;
use crate::error::AgentError;

/// Sampling temperature for the compression pass.
const PERSONA_TEMPERATURE: f32 = 0.8;

/// Word cap the persona prompt asks for.
pub const PERSONA_WORD_LIMIT: usize = 30;

/// Counts words using Unicode word boundaries.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.unicode_words().count()
}

/// Agent that compresses a reply into a brief first-person persona answer.
pub struct PersonaAgent {
    model: String,
    max_tokens: u32,
    template: String,
}

impl PersonaAgent {
    /// Creates a persona agent with the given compression instruction.
    #[must_use]
    pub fn new(config: &AgentConfig, template: String) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            template,
        }
    }

    /// Persona prompt followed by the rendered compression instruction.
    #[must_use]
    pub fn build_prompt(&self, query: &str, detailed: &str) -> String {
        let instruction = render(&self.template, &[("query", query), ("response", detailed)]);
        format!(
            "{}\n\n{instruction}",
            AgentId::ConciseHuman.role().system_prompt
        )
    }

    /// Compresses `detailed` into the persona's reply.
    ///
    /// The word cap is only requested, never enforced: an over-long reply is
    /// logged and returned as is.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on API failures.
    pub async fn compress(
        &self,
        provider: &dyn LlmProvider,
        query: &str,
        detailed: &str,
    ) -> Result<AgentResponse, AgentError> {
        let prompt = self.build_prompt(query, detailed);
        let response = self.execute(provider, vec![system_message(&prompt)]).await?;

        let words = word_count(&response.content);
        if words > PERSONA_WORD_LIMIT {
            debug!(
                words,
                limit = PERSONA_WORD_LIMIT,
                "persona reply exceeds word limit"
            );
        }
        Ok(response)
    }
}

#[async_trait]
impl Agent for PersonaAgent {
    fn name(&self) -> &'static str {
        AgentId::ConciseHuman.as_str()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn temperature(&self) -> f32 {
        PERSONA_TEMPERATURE
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::prompt::COMPRESSION_TEMPLATE;
    use crate::agent::testing::ScriptedProvider;

    fn persona() -> PersonaAgent {
        let config = AgentConfig::builder()
            .api_key("test")
            .build()
            .unwrap_or_else(|_| unreachable!());
        PersonaAgent::new(&config, COMPRESSION_TEMPLATE.to_string())
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("Hmm, I'd pour a chilled Pinot Noir."), 7);
    }

    #[test]
    fn test_prompt_starts_with_persona() {
        let prompt = persona().build_prompt("salmon?", "A warm, detailed answer.");
        assert!(prompt.starts_with("You are Eleanor"));
        assert!(prompt.contains("The user asked: salmon?"));
        assert!(prompt.contains("Detailed response: A warm, detailed answer."));
        assert!(prompt.ends_with("maintaining a persuasive tone."));
    }

    #[tokio::test]
    async fn test_compress_returns_reply_unchanged_even_when_long() {
        let long = "word ".repeat(40);
        let provider = ScriptedProvider::new([long.clone()]);
        let response = persona()
            .compress(&provider, "q", "detailed")
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(response.content, long);
        assert_eq!(provider.requests()[0].temperature, Some(PERSONA_TEMPERATURE));
    }
}
