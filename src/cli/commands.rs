//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::runtime::Runtime;
use tokio_stream::StreamExt;

use crate::agent::{AgentConfig, ChatMode, ChatSession, PromptSet, ResponseStream};
use crate::cli::output::{
    OutputFormat, format_classification, format_roles, format_turn, format_turn_footer,
};
use crate::cli::parser::{Cli, Commands};
use crate::core::AgentId;
use crate::core::context::parse_assignment;
use crate::error::{CommandError, Result};

/// Options for the interactive chat loop.
#[derive(Debug, Clone, Copy)]
pub struct ReplOptions {
    /// Output format for replies.
    pub format: OutputFormat,
    /// Type replies out character by character.
    pub stream: bool,
    /// Delay between characters when streaming.
    pub typing_delay: Duration,
    /// Print a routing footer after each reply.
    pub verbose: bool,
}

/// A line typed at the chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput<'a> {
    /// A question for the session.
    Query(&'a str),
    /// `/mode <name>`.
    Mode(&'a str),
    /// `/context key=value`.
    Context(&'a str),
    /// `/clear`.
    Clear,
    /// `/clear-context`.
    ClearContext,
    /// `/history`.
    History,
    /// `/help`.
    Help,
    /// `/quit` or `/exit`.
    Quit,
    /// Any other slash command.
    Unknown(&'a str),
}

impl<'a> ReplInput<'a> {
    /// Classifies a line read from the prompt.
    #[must_use]
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return Self::Query(line);
        };
        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(n, a)| (n, a.trim()));
        match name {
            "mode" => Self::Mode(arg),
            "context" => Self::Context(arg),
            "clear" => Self::Clear,
            "clear-context" => Self::ClearContext,
            "history" => Self::History,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(name),
        }
    }
}

const REPL_HELP: &str = "Commands:
  /mode <sommelier|standard>  switch mode (clears the conversation)
  /context key=value          add context for the specialists
  /clear                      forget the conversation
  /clear-context              remove all context
  /history                    show the conversation
  /quit                       leave
";

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Roles => Ok(cmd_roles(format)),
        Commands::InitPrompts { dir } => {
            cmd_init_prompts(dir.as_deref().or(cli.prompt_dir.as_deref()), format)
        }
        Commands::Classify { query } => cmd_classify(cli, query, format),
        Commands::Ask {
            query,
            mode,
            context,
        } => cmd_ask(cli, query, mode, context, format),
        Commands::Chat {
            mode,
            context,
            no_stream,
            typing_delay_ms,
        } => {
            let options = ReplOptions {
                format,
                stream: !no_stream && format == OutputFormat::Text,
                typing_delay: Duration::from_millis(*typing_delay_ms),
                verbose: cli.verbose,
            };
            cmd_chat(cli, mode, context, options)
        }
    }
}

/// Builds agent configuration from env + CLI overrides.
fn build_config(cli: &Cli) -> Result<AgentConfig> {
    let mut builder = AgentConfig::builder();
    if let Some(model) = &cli.model {
        builder = builder.model(model.as_str());
    }
    if let Some(dir) = &cli.prompt_dir {
        builder = builder.prompt_dir(dir.as_path());
    }
    Ok(builder.from_env().build()?)
}

/// Creates a session with mode and context applied.
fn build_session(cli: &Cli, mode: &str, context: &[String]) -> Result<ChatSession> {
    let mode: ChatMode = mode.parse()?;
    let entries = parse_context_args(context)?;
    let mut session = ChatSession::from_config(build_config(cli)?)?;
    session.set_mode(mode);
    for (key, value) in entries {
        session.add_context(key, value);
    }
    Ok(session)
}

/// Parses repeated `KEY=VALUE` arguments.
///
/// # Errors
///
/// Returns [`CommandError::InvalidArgument`] for an entry without `=` or
/// with an empty key.
pub fn parse_context_args(args: &[String]) -> Result<Vec<(String, serde_json::Value)>> {
    args.iter()
        .map(|arg| {
            parse_assignment(arg).ok_or_else(|| {
                crate::error::Error::from(CommandError::InvalidArgument(format!(
                    "expected KEY=VALUE for context, got '{arg}'"
                )))
            })
        })
        .collect()
}

/// Creates the tokio runtime used as sync/async bridge.
fn runtime() -> Result<Runtime> {
    Runtime::new().map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to create async runtime: {e}")).into()
    })
}

fn cmd_roles(format: OutputFormat) -> String {
    let roles: Vec<_> = AgentId::all().iter().map(|id| id.role()).collect();
    format_roles(&roles, format)
}

fn cmd_classify(cli: &Cli, query: &str, format: OutputFormat) -> Result<String> {
    if query.trim().is_empty() {
        return Err(CommandError::InvalidArgument("query cannot be empty".to_string()).into());
    }
    let session = ChatSession::from_config(build_config(cli)?)?;
    let rt = runtime()?;
    let (agent, response) = rt.block_on(session.orchestrator().classify(query))?;
    Ok(format_classification(query, agent, &response.content, format))
}

fn cmd_ask(
    cli: &Cli,
    query: &str,
    mode: &str,
    context: &[String],
    format: OutputFormat,
) -> Result<String> {
    let mut session = build_session(cli, mode, context)?;
    let rt = runtime()?;
    let report = rt.block_on(session.run_turn(query))?;

    let mut output = format_turn(&report, format);
    if cli.verbose && format == OutputFormat::Text {
        output.push_str(&format_turn_footer(&report));
    }
    Ok(output)
}

fn cmd_chat(cli: &Cli, mode: &str, context: &[String], options: ReplOptions) -> Result<String> {
    let mut session = build_session(cli, mode, context)?;
    let rt = runtime()?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_repl(&rt, &mut session, stdin.lock(), stdout.lock(), options)?;
    Ok(String::new())
}

/// Runs the chat loop until `/quit` or end of input.
///
/// Turn errors are reported inline and the loop continues.
///
/// # Errors
///
/// Returns an I/O error if reading input or writing output fails.
pub fn run_repl<R: BufRead, W: Write>(
    rt: &Runtime,
    session: &mut ChatSession,
    input: R,
    mut out: W,
    options: ReplOptions,
) -> Result<()> {
    let text = options.format == OutputFormat::Text;
    if text {
        writeln!(out, "{}", session.mode().greeting())?;
        writeln!(out, "(type /help for commands)")?;
        write!(out, "> ")?;
        out.flush()?;
    }

    for line in input.lines() {
        let line = line?;
        match ReplInput::parse(&line) {
            ReplInput::Quit => break,
            ReplInput::Query("") => {}
            ReplInput::Query(query) => match rt.block_on(session.run_turn(query)) {
                Ok(report) => {
                    if options.stream {
                        let stream = ResponseStream::new(report.text.as_str());
                        write_paced(rt, &mut out, stream, options.typing_delay)?;
                        writeln!(out)?;
                    } else {
                        write!(out, "{}", format_turn(&report, options.format))?;
                        if !text {
                            writeln!(out)?;
                        }
                    }
                    if options.verbose && text {
                        write!(out, "{}", format_turn_footer(&report))?;
                    }
                }
                Err(e) => writeln!(out, "Error: {e}")?,
            },
            ReplInput::Mode(name) => match name.parse::<ChatMode>() {
                Ok(mode) => {
                    session.set_mode(mode);
                    writeln!(out, "Mode: {mode}")?;
                    if text {
                        writeln!(out, "{}", mode.greeting())?;
                    }
                }
                Err(e) => writeln!(out, "Error: {e}")?,
            },
            ReplInput::Context(assignment) => match parse_assignment(assignment) {
                Some((key, value)) => {
                    writeln!(out, "Context: {key} = {value}")?;
                    session.add_context(key, value);
                }
                None => writeln!(out, "Usage: /context key=value")?,
            },
            ReplInput::Clear => {
                session.clear_conversation();
                writeln!(out, "Conversation cleared.")?;
            }
            ReplInput::ClearContext => {
                session.clear_context();
                writeln!(out, "Context cleared.")?;
            }
            ReplInput::History => {
                if text {
                    for turn in session.conversation().turns() {
                        writeln!(out, "[{:?}] {}", turn.role, turn.content)?;
                    }
                } else {
                    writeln!(out, "{}", options.format.to_json(session.conversation()))?;
                }
            }
            ReplInput::Help => write!(out, "{REPL_HELP}")?,
            ReplInput::Unknown(name) => writeln!(out, "Unknown command: /{name} (try /help)")?,
        }
        if text {
            write!(out, "> ")?;
            out.flush()?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Types `stream` out with `delay` between characters.
fn write_paced<W: Write>(
    rt: &Runtime,
    out: &mut W,
    stream: ResponseStream,
    delay: Duration,
) -> io::Result<()> {
    rt.block_on(async {
        let paced = stream.paced(delay);
        tokio::pin!(paced);
        let mut buf = [0u8; 4];
        while let Some(ch) = paced.next().await {
            out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
            out.flush()?;
        }
        Ok::<(), io::Error>(())
    })
}

fn cmd_init_prompts(dir: Option<&Path>, format: OutputFormat) -> Result<String> {
    let target_dir = dir.map(PathBuf::from).or_else(PromptSet::default_dir).ok_or_else(|| {
        CommandError::ExecutionFailed(
            "Could not determine home directory for default prompt path".to_string(),
        )
    })?;

    let written = PromptSet::write_defaults(&target_dir).map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to write prompt templates: {e}"))
    })?;

    if format.is_json() {
        let json = serde_json::json!({
            "directory": target_dir.to_string_lossy(),
            "written": written.iter().map(|p| p.to_string_lossy().into_owned()).collect::<Vec<_>>(),
            "count": written.len()
        });
        return Ok(format.to_json(&json));
    }

    if written.is_empty() {
        return Ok(format!(
            "All prompt templates already exist in: {}\n",
            target_dir.display()
        ));
    }
    let mut output = format!(
        "Wrote {} prompt template(s) to: {}\n",
        written.len(),
        target_dir.display()
    );
    for path in &written {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("unknown");
        output.push_str("  ");
        output.push_str(name);
        output.push('\n');
    }
    output.push_str("\nEdit these files to customize the pipeline instructions.\n");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::ScriptedProvider;
    use crate::agent::{LlmProvider, Orchestrator};
    use std::io::Cursor;
    use std::sync::Arc;
    use tempfile::TempDir;
    use test_case::test_case;

    fn session(provider: &Arc<ScriptedProvider>) -> ChatSession {
        let config = AgentConfig::builder()
            .api_key("test")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let provider = Arc::clone(provider) as Arc<dyn LlmProvider>;
        ChatSession::with_orchestrator(Orchestrator::with_prompts(
            provider,
            config,
            PromptSet::defaults(),
        ))
    }

    fn options(stream: bool) -> ReplOptions {
        ReplOptions {
            format: OutputFormat::Text,
            stream,
            typing_delay: Duration::from_millis(1),
            verbose: false,
        }
    }

    fn run(provider: &Arc<ScriptedProvider>, script: &str, opts: ReplOptions) -> (ChatSession, String) {
        let rt = runtime().unwrap_or_else(|_| unreachable!());
        let mut chat = session(provider);
        let mut out = Vec::new();
        run_repl(&rt, &mut chat, Cursor::new(script), &mut out, opts)
            .unwrap_or_else(|_| unreachable!());
        (chat, String::from_utf8(out).unwrap_or_default())
    }

    #[test_case("What about Barolo?", ReplInput::Query("What about Barolo?"))]
    #[test_case("/mode standard", ReplInput::Mode("standard"))]
    #[test_case("/context budget = 40", ReplInput::Context("budget = 40"))]
    #[test_case("/clear", ReplInput::Clear)]
    #[test_case("/clear-context", ReplInput::ClearContext)]
    #[test_case("  /history ", ReplInput::History)]
    #[test_case("/exit", ReplInput::Quit)]
    #[test_case("/dance", ReplInput::Unknown("dance"))]
    fn test_repl_input_parse(line: &str, expected: ReplInput<'_>) {
        assert_eq!(ReplInput::parse(line), expected);
    }

    #[test]
    fn test_parse_context_args() {
        let parsed = parse_context_args(&["budget=30".to_string(), "region=Rioja".to_string()])
            .unwrap_or_default();
        assert_eq!(parsed[0], ("budget".to_string(), serde_json::json!(30)));
        assert_eq!(parsed[1], ("region".to_string(), serde_json::json!("Rioja")));

        let err = parse_context_args(&["oops".to_string()]);
        assert!(matches!(
            err,
            Err(crate::error::Error::Command(CommandError::InvalidArgument(_)))
        ));
    }

    #[test]
    fn test_cmd_roles_text() {
        let out = cmd_roles(OutputFormat::Text);
        for id in AgentId::all() {
            assert!(out.contains(id.as_str()));
        }
    }

    #[test]
    fn test_cmd_init_prompts_writes_then_skips() {
        let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
        let first = cmd_init_prompts(Some(dir.path()), OutputFormat::Text).unwrap_or_default();
        assert!(first.starts_with("Wrote 4 prompt template(s)"));
        assert!(dir.path().join("critic.md").exists());

        let second = cmd_init_prompts(Some(dir.path()), OutputFormat::Json).unwrap_or_default();
        let json: serde_json::Value = serde_json::from_str(&second).unwrap_or_default();
        assert_eq!(json["count"], 0);
    }

    #[test]
    fn test_repl_answers_and_quits() {
        let provider = Arc::new(ScriptedProvider::new([
            "food_pairing",
            "raw",
            "harmonized",
            "Grab a chilled Pinot Noir.",
        ]));
        let (chat, out) = run(
            &provider,
            "What pairs well with grilled salmon?\n/quit\nnever asked\n",
            options(false),
        );
        assert!(out.starts_with(ChatMode::Sommelier.greeting()));
        assert!(out.contains("Grab a chilled Pinot Noir.\n"));
        assert_eq!(chat.conversation().len(), 2);
        assert_eq!(provider.call_count(), 4);
    }

    #[test]
    fn test_repl_streamed_reply_matches_text() {
        let provider = Arc::new(ScriptedProvider::new(["sales", "raw", "h", "Santé!"]));
        let (_, out) = run(&provider, "deal?\n", options(true));
        assert!(out.contains("> Santé!\n"));
    }

    #[test]
    fn test_repl_session_commands() {
        let provider = Arc::new(ScriptedProvider::default());
        let (chat, out) = run(
            &provider,
            "/context budget=40\n/mode standard\n/clear-context\n/mode robot\n/dance\n",
            options(false),
        );
        assert!(out.contains("Context: budget = 40"));
        assert!(out.contains("Mode: standard"));
        assert!(out.contains("Context cleared."));
        assert!(out.contains("Error: configuration error: unknown chat mode 'robot'"));
        assert!(out.contains("Unknown command: /dance"));
        assert_eq!(chat.mode(), ChatMode::Standard);
        assert!(chat.context().is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_repl_reports_turn_errors_and_continues() {
        let provider = Arc::new(ScriptedProvider::default());
        provider.push_error("boom");
        let (chat, out) = run(&provider, "hello\n/history\n", options(false));
        assert!(out.contains("Error: API request failed: boom"));
        assert!(chat.conversation().is_empty());
    }
}
