//! CLI layer for sommelier-rs.
//!
//! Provides the command-line interface using clap, with commands for
//! chatting, one-shot questions, routing checks, and prompt scaffolding.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
