//! Error types for sommelier-rs.
//!
//! Errors are split by layer: [`AgentError`] covers the model boundary and
//! the chat pipeline, [`CommandError`] covers the CLI. Both convert into the
//! crate-level [`Error`].

use thiserror::Error;

/// Crate-level result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Pipeline or provider failure.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// CLI command failure.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// I/O failure (terminal, prompt files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by agents, providers, and the chat session.
#[derive(Debug, Error)]
pub enum AgentError {
    /// No credential was configured for the model provider.
    ///
    /// Raised once, when the configuration is built. Treated as a fatal
    /// startup condition by the binary.
    #[error("configuration error: no API key found (set OPENAI_API_KEY or SOMMELIER_API_KEY)")]
    ApiKeyMissing,

    /// Invalid configuration value.
    #[error("configuration error: {message}")]
    Configuration {
        /// What was wrong.
        message: String,
    },

    /// The configured provider name has no implementation.
    #[error("unsupported provider: {name}")]
    UnsupportedProvider {
        /// Provider name as configured.
        name: String,
    },

    /// An agent identifier outside the role registry was requested.
    #[error("unknown agent: {identifier}")]
    UnknownAgent {
        /// The rejected identifier.
        identifier: String,
    },

    /// A pipeline stage ran out of order or without its input.
    #[error("orchestration error: {message}")]
    Orchestration {
        /// What went wrong.
        message: String,
    },

    /// The model API call failed.
    #[error("API request failed: {message}")]
    ApiRequest {
        /// Error message from the provider SDK.
        message: String,
        /// HTTP status, when known.
        status: Option<u16>,
    },
}

/// Errors raised by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command could not complete.
    #[error("command failed: {0}")]
    ExecutionFailed(String),

    /// A command-line argument was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Output serialization failed.
    #[error("output format error: {0}")]
    OutputFormat(String),
}
