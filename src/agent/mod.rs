//! Chat pipeline for sommelier-rs.
//!
//! Routes each user query to one wine specialist, then rewrites the answer
//! twice before it reaches the user. Uses a pluggable provider abstraction
//! backed by OpenAI-compatible APIs.
//!
//! # Architecture
//!
//! ```text
//! ChatSession::respond(query)
//!   └── Orchestrator
//!       ├── ClassifierAgent (picks one of six specialists)
//!       ├── SpecialistAgent (answers with history + context)
//!       └── Aggregator
//!           ├── HarmonizerAgent (warm, persuasive tone)
//!           └── PersonaAgent (brief first-person reply)
//! ```
//!
//! In standard mode the session skips the pipeline and makes one call to
//! the [`critic::CriticAgent`].

pub mod aggregator;
pub mod classifier;
pub mod client;
pub mod config;
pub mod critic;
pub mod harmonizer;
pub mod message;
pub mod orchestrator;
pub mod persona;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod session;
pub mod specialist;
pub mod stream;
pub mod traits;
pub mod turn;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types
pub use aggregator::Aggregator;
pub use classifier::ClassifierAgent;
pub use client::create_provider;
pub use config::AgentConfig;
pub use critic::CriticAgent;
pub use harmonizer::HarmonizerAgent;
pub use message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use orchestrator::Orchestrator;
pub use persona::PersonaAgent;
pub use prompt::PromptSet;
pub use provider::LlmProvider;
pub use session::{CLARIFYING_MESSAGE, ChatMode, ChatSession};
pub use specialist::SpecialistAgent;
pub use stream::ResponseStream;
pub use traits::{Agent, AgentResponse};
pub use turn::{Stage, TurnReport, TurnState};
