//! Instruction templates and prompt builders for the pipeline stages.
//!
//! Role personas live in the registry ([`crate::core::role`]) and are fixed.
//! The templates here are the glue instructions around them (routing,
//! harmonization, compression, and the standard-mode critic). They can be
//! overridden from markdown files on disk.

use std::path::{Path, PathBuf};

/// Routing instruction for the classifier.
///
/// Placeholders: `{query}`, `{agents}`, `{identifiers}`.
pub const CLASSIFIER_TEMPLATE: &str = "Analyze the following user query and determine which wine specialist agent should handle it:

User Query: {query}

Available agents:
{agents}

Respond with ONLY ONE of these exact agent names:
{identifiers}

Your response should be just the agent name, nothing else.";

/// Instruction for the harmonization pass.
///
/// Placeholders: `{query}`, `{agent}`, `{response}`.
pub const HARMONIZER_TEMPLATE: &str = "You are the Dialogue Orchestrator for a wine sommelier service.

The user asked: {query}

The {agent} agent provided this response:
{response}

Your job is to take this response and create a coherent, well-structured response that contains all the important information.
Maintain the factual information and recommendations, but make the tone warm and engaging.
Focus on being persuasive and helpful.";

/// Instruction appended to the persona prompt for the compression pass.
///
/// Placeholders: `{query}`, `{response}`.
pub const COMPRESSION_TEMPLATE: &str = "The user asked: {query}

Detailed response: {response}

Transform this into a brief, human-like response while preserving the key information and maintaining a persuasive tone.";

/// System prompt for standard (non-pipeline) chat mode.
pub const CRITIC_PROMPT: &str = "You are a veteran wine critic who has spent decades tasting, reporting, and teaching. Speak with warmth, wit, and an inquiring mind, always eager to explore the meeting of grape and glass, culture and cuisine, terroir and technique.
Balance vivid tasting notes with context, history, and the stories of the people behind the bottles.
When asked for recommendations, tailor them to the questioner's palate, occasion, and budget, and suggest food pairings where appropriate.
Use accessible, evocative language: avoid jargon unless you define it, and describe aromas and flavors in relatable terms.
Keep a friendly, down-to-earth tone, yet never shy away from correcting misconceptions or over-hyped trends.
Above all, convey that wine is about curiosity, pleasure, and connection.";

/// Default prompt directory under user config.
const DEFAULT_PROMPT_DIR: &str = ".config/sommelier-rs/prompts";

/// Filename for the classifier template.
const CLASSIFIER_FILENAME: &str = "classifier.md";
/// Filename for the harmonizer template.
const HARMONIZER_FILENAME: &str = "harmonizer.md";
/// Filename for the compression template.
const COMPRESSION_FILENAME: &str = "compression.md";
/// Filename for the critic prompt.
const CRITIC_FILENAME: &str = "critic.md";

/// The set of instruction templates used by a session.
///
/// Loaded from external template files when available, falling back to
/// compiled-in defaults. Use [`PromptSet::load`] to resolve the prompt
/// directory from CLI flags, environment variables, or the default path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    /// Routing instruction for the classifier.
    pub classifier: String,
    /// Harmonization instruction.
    pub harmonizer: String,
    /// Compression instruction appended to the persona prompt.
    pub compression: String,
    /// Standard-mode critic persona.
    pub critic: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl PromptSet {
    /// Loads prompts from the given directory, falling back to compiled-in defaults.
    ///
    /// Resolution order for `prompt_dir`:
    /// 1. Explicit `prompt_dir` argument (from `--prompt-dir` CLI flag)
    /// 2. `SOMMELIER_PROMPT_DIR` environment variable
    /// 3. `~/.config/sommelier-rs/prompts/`
    ///
    /// Each file is loaded independently: a missing file uses its default.
    #[must_use]
    pub fn load(prompt_dir: Option<&Path>) -> Self {
        let resolved_dir = prompt_dir
            .map(PathBuf::from)
            .or_else(|| std::env::var("SOMMELIER_PROMPT_DIR").ok().map(PathBuf::from))
            .or_else(Self::default_dir);

        let load_file = |filename: &str, default: &str| -> String {
            resolved_dir
                .as_ref()
                .map(|dir| dir.join(filename))
                .and_then(|path| std::fs::read_to_string(&path).ok())
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            classifier: load_file(CLASSIFIER_FILENAME, CLASSIFIER_TEMPLATE),
            harmonizer: load_file(HARMONIZER_FILENAME, HARMONIZER_TEMPLATE),
            compression: load_file(COMPRESSION_FILENAME, COMPRESSION_TEMPLATE),
            critic: load_file(CRITIC_FILENAME, CRITIC_PROMPT),
        }
    }

    /// Returns compiled-in defaults without checking the filesystem.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            classifier: CLASSIFIER_TEMPLATE.to_string(),
            harmonizer: HARMONIZER_TEMPLATE.to_string(),
            compression: COMPRESSION_TEMPLATE.to_string(),
            critic: CRITIC_PROMPT.to_string(),
        }
    }

    /// Writes the compiled-in default prompts to the given directory.
    ///
    /// Creates the directory if it does not exist. Existing files are
    /// **not** overwritten.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if directory creation or file writing fails.
    pub fn write_defaults(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let templates = [
            (CLASSIFIER_FILENAME, CLASSIFIER_TEMPLATE),
            (HARMONIZER_FILENAME, HARMONIZER_TEMPLATE),
            (COMPRESSION_FILENAME, COMPRESSION_TEMPLATE),
            (CRITIC_FILENAME, CRITIC_PROMPT),
        ];

        let mut written = Vec::new();
        for (filename, content) in &templates {
            let path = dir.join(filename);
            if !path.exists() {
                std::fs::write(&path, content)?;
                written.push(path);
            }
        }

        Ok(written)
    }

    /// Returns the default prompt directory under the user's home.
    ///
    /// Returns `None` if the home directory cannot be determined.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR))
    }
}

/// Substitutes `{name}` placeholders in a single pass.
///
/// Substituted values are never rescanned, so a user query containing
/// `{response}` stays literal. Unknown placeholders are left as written.
#[must_use]
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
