//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sommelier-rs: a multi-agent wine sommelier in the terminal.
///
/// Routes each question to a wine specialist, then rewrites the answer
/// into a short, friendly reply. Requires an OpenAI-compatible API key.
#[derive(Parser, Debug)]
#[command(name = "sommelier-rs")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (debug logs on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json, ndjson).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// Model for every stage except routing.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Directory containing prompt template overrides.
    #[arg(long, global = true)]
    pub prompt_dir: Option<PathBuf>,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat.
    ///
    /// Reads one question per line from stdin. Lines starting with `/` are
    /// session commands: `/mode <sommelier|standard>`, `/context key=value`,
    /// `/clear`, `/clear-context`, `/history`, `/quit`.
    #[command(after_help = r#"Examples:
  sommelier-rs chat                                   # Sommelier pipeline
  sommelier-rs chat --mode standard                   # Single wine-critic persona
  sommelier-rs chat --context budget=30 --context 'likes=["Barolo"]'
  sommelier-rs chat --no-stream                       # Print replies at once
  sommelier-rs chat --typing-delay-ms 5               # Faster typing effect
"#)]
    Chat {
        /// Chat mode (sommelier, standard).
        #[arg(short, long, default_value = "sommelier")]
        mode: String,

        /// Context entry handed to the specialists (KEY=VALUE, repeatable).
        ///
        /// VALUE is parsed as JSON when possible, otherwise kept as text.
        #[arg(short, long = "context", value_name = "KEY=VALUE")]
        context: Vec<String>,

        /// Print each reply in one piece instead of typing it out.
        #[arg(long)]
        no_stream: bool,

        /// Delay between characters when typing out a reply.
        #[arg(long, default_value = "15")]
        typing_delay_ms: u64,
    },

    /// Ask a single question and print the reply.
    #[command(after_help = r#"Examples:
  sommelier-rs ask "What pairs well with grilled salmon?"
  sommelier-rs ask "Is Riesling always sweet?" --mode standard
  sommelier-rs ask "Something for tonight?" --context budget=25
  sommelier-rs --format json ask "Tell me about Barolo" | jq '.agent'
"#)]
    Ask {
        /// The question.
        query: String,

        /// Chat mode (sommelier, standard).
        #[arg(short, long, default_value = "sommelier")]
        mode: String,

        /// Context entry handed to the specialists (KEY=VALUE, repeatable).
        #[arg(short, long = "context", value_name = "KEY=VALUE")]
        context: Vec<String>,
    },

    /// Show which specialist would answer a question.
    #[command(after_help = r#"Examples:
  sommelier-rs classify "Do you ship to Canada?"     # inventory
  sommelier-rs classify "Tell me a story about Champagne"
"#)]
    Classify {
        /// The question to route.
        query: String,
    },

    /// List the agent roles.
    Roles,

    /// Write the default prompt templates to disk for editing.
    ///
    /// Existing files are left untouched.
    #[command(after_help = r#"Examples:
  sommelier-rs init-prompts                          # ~/.config/sommelier-rs/prompts/
  sommelier-rs init-prompts --dir ./prompts
"#)]
    InitPrompts {
        /// Target directory for prompt templates.
        ///
        /// Defaults to `~/.config/sommelier-rs/prompts/`.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}
