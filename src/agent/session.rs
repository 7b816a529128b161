//! Chat session facade.
//!
//! A [`ChatSession`] owns the conversation and context for one user and
//! runs a turn per call. The conversation only changes when a turn
//! succeeds: the user turn and the reply are committed together.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use super::client::create_provider;
use super::config::AgentConfig;
use super::message::{ChatMessage, user_message};
use super::orchestrator::Orchestrator;
use super::provider::LlmProvider;
use super::stream::ResponseStream;
use super::turn::TurnReport;
use crate::core::{Context, Conversation};
use crate::error::AgentError;

/// Reply to a blank query. No model call is made.
pub const CLARIFYING_MESSAGE: &str =
    "I'm sorry, I couldn't find your question. How can I help you with wine today?";

/// How a session answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Classifier, specialist, harmonizer, and persona.
    #[default]
    Sommelier,
    /// One call to the wine-critic persona.
    Standard,
}

impl ChatMode {
    /// Lower-case mode name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sommelier => "sommelier",
            Self::Standard => "standard",
        }
    }

    /// Opening line shown when a conversation in this mode starts.
    #[must_use]
    pub const fn greeting(self) -> &'static str {
        match self {
            Self::Sommelier => {
                "Hello! I'm your Wine Sommelier AI assistant. How can I help you with wine today?"
            }
            Self::Standard => "Hello! Pull up a chair. What's in your glass today?",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatMode {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sommelier" => Ok(Self::Sommelier),
            "standard" => Ok(Self::Standard),
            other => Err(AgentError::Configuration {
                message: format!("unknown chat mode '{other}' (expected sommelier or standard)"),
            }),
        }
    }
}

/// One user's chat: conversation, context, and the pipeline that answers.
pub struct ChatSession {
    orchestrator: Orchestrator,
    mode: ChatMode,
    conversation: Conversation,
    context: Context,
}

impl ChatSession {
    /// Creates a session over an existing provider.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, config: AgentConfig) -> Self {
        Self::with_orchestrator(Orchestrator::new(provider, config))
    }

    /// Creates a session around a prepared orchestrator.
    #[must_use]
    pub const fn with_orchestrator(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            mode: ChatMode::Sommelier,
            conversation: Conversation::new(),
            context: Context::new(),
        }
    }

    /// Creates a session and its provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnsupportedProvider`] for an unknown provider.
    pub fn from_config(config: AgentConfig) -> Result<Self, AgentError> {
        let provider = create_provider(&config)?;
        Ok(Self::new(provider, config))
    }

    /// Creates a session configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no credential is set.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::from_config(AgentConfig::from_env()?)
    }

    /// Answers `query` and reports how the turn went.
    ///
    /// A blank query gets [`CLARIFYING_MESSAGE`] without touching the model
    /// or the conversation.
    ///
    /// # Errors
    ///
    /// Returns the [`AgentError`] of the first failing model call. The
    /// conversation is left as it was.
    pub async fn run_turn(&mut self, query: &str) -> Result<TurnReport, AgentError> {
        if query.trim().is_empty() {
            return Ok(TurnReport::canned(CLARIFYING_MESSAGE));
        }

        let mut history: Vec<ChatMessage> = self.conversation.turns().to_vec();
        history.push(user_message(query));

        let report = match self.mode {
            ChatMode::Sommelier => TurnReport::from(
                self.orchestrator
                    .run_turn(query, history, &self.context)
                    .await?,
            ),
            ChatMode::Standard => {
                let start = std::time::Instant::now();
                let response = self.orchestrator.critic_reply(&history).await?;
                TurnReport {
                    text: response.content,
                    agent: None,
                    usage: response.usage,
                    model_calls: 1,
                    elapsed: start.elapsed(),
                }
            }
        };

        self.conversation.push_user(query);
        self.conversation.push_assistant(&report.text);
        Ok(report)
    }

    /// Answers `query`, returning only the final text.
    ///
    /// # Errors
    ///
    /// See [`ChatSession::run_turn`].
    pub async fn respond(&mut self, query: &str) -> Result<String, AgentError> {
        self.run_turn(query).await.map(|report| report.text)
    }

    /// Answers `query` and hands the reply back one character at a time.
    ///
    /// The reply is complete before the stream is returned.
    ///
    /// # Errors
    ///
    /// See [`ChatSession::run_turn`].
    pub async fn stream_response(&mut self, query: &str) -> Result<ResponseStream, AgentError> {
        self.respond(query).await.map(ResponseStream::new)
    }

    /// Sets a context entry, replacing any previous value under `key`.
    pub fn add_context(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.context.add(key, value);
    }

    /// Removes every context entry.
    pub fn clear_context(&mut self) {
        self.context.clear();
    }

    /// Forgets the conversation. Context is kept.
    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
    }

    /// Switches mode. The conversation is cleared when the mode changes.
    pub fn set_mode(&mut self, mode: ChatMode) {
        if mode != self.mode {
            self.mode = mode;
            self.conversation.clear();
        }
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> ChatMode {
        self.mode
    }

    /// Conversation so far.
    #[must_use]
    pub const fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Current context.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// The pipeline answering for this session.
    #[must_use]
    pub const fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }
}

impl fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSession")
            .field("mode", &self.mode)
            .field("turns", &self.conversation.len())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
