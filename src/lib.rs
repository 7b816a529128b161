//! # sommelier-rs
//!
//! A multi-agent wine sommelier. Each user query is routed to one of six
//! specialists (wine knowledge, food pairing, storytelling, sales,
//! inventory, preferences), whose answer is then rewritten twice: once for
//! a warm, persuasive tone and once into a brief first-person reply.
//!
//! ## Quick start
//!
//! ```no_run
//! use sommelier_rs::ChatSession;
//!
//! # async fn run() -> Result<(), sommelier_rs::AgentError> {
//! let mut session = ChatSession::from_env()?;
//! session.add_context("budget", 30);
//! let reply = session.respond("What pairs well with grilled salmon?").await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: role registry, conversation history, context
//! - [`agent`]: agents, provider abstraction, orchestrator, chat session
//! - [`cli`]: command-line interface
//! - [`error`]: error types

pub mod agent;
pub mod cli;
pub mod core;
pub mod error;

pub use crate::agent::{AgentConfig, ChatMode, ChatSession, Orchestrator, ResponseStream};
pub use crate::core::{AgentId, AgentRole, Context, Conversation};
pub use crate::error::{AgentError, CommandError, Error, Result};
