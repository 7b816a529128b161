//! Per-turn pipeline state.
//!
//! A [`TurnState`] is created when a turn starts, threaded through the four
//! stages, and dropped once the session has taken the final text out of it.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::message::{ChatMessage, TokenUsage};
use crate::core::{AgentId, Context};

/// Pipeline stage. A turn moves strictly forward through these and never
/// revisits one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Not started, or finished.
    Idle,
    /// Picking the specialist.
    Classify,
    /// Specialist answering.
    Respond,
    /// Tone rewrite.
    Harmonize,
    /// Persona compression.
    Compress,
}

impl Stage {
    /// Lower-case stage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Classify => "classify",
            Self::Respond => "respond",
            Self::Harmonize => "harmonize",
            Self::Compress => "compress",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State carried through one sommelier turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnState {
    /// The user's query.
    pub query: String,
    /// History as the specialist sees it, ending with the query.
    pub conversation: Vec<ChatMessage>,
    /// Stage currently executing.
    pub stage: Stage,
    /// Specialist chosen by the classifier.
    pub current_agent: Option<AgentId>,
    /// Text produced at each stage, keyed by the agent that produced it.
    pub agent_responses: BTreeMap<AgentId, String>,
    /// Context snapshot handed to the specialist.
    pub context: Context,
    /// Output of the compression pass.
    pub final_response: String,
    /// Token usage summed over every call in the turn.
    pub usage: TokenUsage,
    /// Wall-clock time for the whole turn.
    pub elapsed: Duration,
}

impl TurnState {
    /// Starts a turn.
    #[must_use]
    pub fn new(query: &str, conversation: Vec<ChatMessage>, context: Context) -> Self {
        Self {
            query: query.to_string(),
            conversation,
            stage: Stage::Idle,
            current_agent: None,
            agent_responses: BTreeMap::new(),
            context,
            final_response: String::new(),
            usage: TokenUsage::default(),
            elapsed: Duration::ZERO,
        }
    }

    /// Moves to `next`. Stages only move forward; going back to
    /// [`Stage::Idle`] ends the turn.
    pub fn advance(&mut self, next: Stage) {
        debug_assert!(
            next == Stage::Idle || next > self.stage,
            "stage moved backwards: {} -> {next}",
            self.stage
        );
        self.stage = next;
    }

    /// Records the text an agent produced and the tokens it used.
    pub fn record(&mut self, agent: AgentId, text: &str, usage: TokenUsage) {
        self.agent_responses.insert(agent, text.to_string());
        self.usage.accumulate(usage);
    }

    /// Text recorded for `agent`, if any.
    #[must_use]
    pub fn response_of(&self, agent: AgentId) -> Option<&str> {
        self.agent_responses.get(&agent).map(String::as_str)
    }

    /// The chosen specialist and its raw answer.
    #[must_use]
    pub fn specialist_reply(&self) -> Option<(AgentId, &str)> {
        let agent = self.current_agent?;
        self.response_of(agent).map(|text| (agent, text))
    }
}

/// What a session reports about a finished turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    /// Final text shown to the user.
    pub text: String,
    /// Specialist that handled the turn (sommelier mode only).
    pub agent: Option<AgentId>,
    /// Token usage summed over the turn.
    pub usage: TokenUsage,
    /// Number of model calls made.
    pub model_calls: usize,
    /// Wall-clock time for the turn.
    pub elapsed: Duration,
}

impl TurnReport {
    /// Report for a turn answered without calling the model.
    #[must_use]
    pub fn canned(text: &str) -> Self {
        Self {
            text: text.to_string(),
            agent: None,
            usage: TokenUsage::default(),
            model_calls: 0,
            elapsed: Duration::ZERO,
        }
    }
}

impl From<TurnState> for TurnReport {
    fn from(state: TurnState) -> Self {
        Self {
            model_calls: state.agent_responses.len() + 1,
            text: state.final_response,
            agent: state.current_agent,
            usage: state.usage,
            elapsed: state.elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(total: u32) -> TokenUsage {
        TokenUsage {
            prompt_tokens: total,
            completion_tokens: 0,
            total_tokens: total,
        }
    }

    #[test]
    fn test_new_turn_is_idle_and_empty() {
        let state = TurnState::new("q", Vec::new(), Context::new());
        assert_eq!(state.stage, Stage::Idle);
        assert!(state.current_agent.is_none());
        assert!(state.agent_responses.is_empty());
        assert!(state.specialist_reply().is_none());
    }

    #[test]
    fn test_record_and_specialist_reply() {
        let mut state = TurnState::new("q", Vec::new(), Context::new());
        state.current_agent = Some(AgentId::Sales);
        state.record(AgentId::Sales, "Buy the reserve.", usage(10));
        state.record(AgentId::Orchestrator, "Treat yourself!", usage(5));

        assert_eq!(
            state.specialist_reply(),
            Some((AgentId::Sales, "Buy the reserve."))
        );
        assert_eq!(state.usage.total_tokens, 15);
    }

    #[test]
    fn test_stage_order() {
        assert!(Stage::Classify < Stage::Respond);
        assert!(Stage::Respond < Stage::Harmonize);
        assert!(Stage::Harmonize < Stage::Compress);
        assert_eq!(Stage::Compress.to_string(), "compress");
    }

    #[test]
    fn test_report_counts_classifier_call() {
        let mut state = TurnState::new("q", Vec::new(), Context::new());
        state.current_agent = Some(AgentId::FoodPairing);
        state.record(AgentId::FoodPairing, "a", usage(1));
        state.record(AgentId::Orchestrator, "b", usage(1));
        state.record(AgentId::ConciseHuman, "c", usage(1));
        state.final_response = "c".to_string();

        let report = TurnReport::from(state);
        assert_eq!(report.text, "c");
        assert_eq!(report.agent, Some(AgentId::FoodPairing));
        assert_eq!(report.model_calls, 4);
    }

    #[test]
    fn test_serializes_responses_by_identifier() {
        let mut state = TurnState::new("q", Vec::new(), Context::new());
        state.record(AgentId::FoodPairing, "a", usage(1));
        let json = serde_json::to_value(&state).unwrap_or_default();
        assert_eq!(json["agent_responses"]["food_pairing"], "a");
        assert_eq!(json["stage"], "idle");
    }
}
