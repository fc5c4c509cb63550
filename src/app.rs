//! Application context — cross-cutting state passed to every command
//! handler: terminal output plus interactivity flags.

use anyhow::Result;

use crate::output::OutputContext;

/// Context shared by all command handlers.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set by `--yes` / `-y`, or by the `CI` or `SPLUNKCTL_YES`
    /// environment variables.
    pub non_interactive: bool,
}

impl AppContext {
    #[must_use]
    pub fn new(output: OutputContext, yes: bool) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("SPLUNKCTL_YES").is_ok();
        Self {
            output,
            non_interactive: yes || ci_env,
        }
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true`, returns `default` immediately
    /// without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
