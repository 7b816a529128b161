//! Core data model: role registry, conversation history, and context.

pub mod context;
pub mod conversation;
pub mod role;

pub use context::Context;
pub use conversation::Conversation;
pub use role::{AgentId, AgentRole, DEFAULT_SPECIALIST, lookup};
