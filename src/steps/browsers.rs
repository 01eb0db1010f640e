use colored::Colorize;
use std::path::PathBuf;

use super::{ran, StepOutcome};
use crate::logging::log_step_warning;
use crate::runner::{CommandRunner, Invocation};

/// Installs Playwright's browser binaries into the environment.
///
/// Never fails the build: the browsers are often already installed, and the
/// download depends on the machine's network, so a failure only warns.
pub struct BrowserInstaller<'a> {
    runner: &'a dyn CommandRunner,
    python: PathBuf,
    browsers: &'a [String],
}

impl<'a> BrowserInstaller<'a> {
    pub fn new(runner: &'a dyn CommandRunner, python: impl Into<PathBuf>, browsers: &'a [String]) -> Self {
        Self {
            runner,
            python: python.into(),
            browsers,
        }
    }

    pub fn invocation(&self) -> Invocation {
        Invocation::new(&self.python)
            .args(["-m", "playwright", "install"])
            .args(self.browsers)
    }

    /// Returns the outcome and, for a warning, the reason.
    pub fn install(&self) -> (StepOutcome, Option<String>) {
        let invocation = self.invocation();
        let reason = match self.runner.run(&invocation) {
            Ok(outcome) if outcome.success() => return (ran(self.runner), None),
            Ok(outcome) => match outcome.code() {
                Some(code) => format!("playwright install exited with status {code}"),
                None => "playwright install was terminated".to_string(),
            },
            Err(e) => format!("{e:#}"),
        };

        log_step_warning("browsers", &reason);
        println!(
            "  {} Could not install Playwright browsers: {}",
            "⚠".yellow(),
            reason
        );
        println!(
            "  {} Continuing; run '{}' manually if the app needs them",
            "→".blue(),
            invocation.to_string().cyan()
        );
        (StepOutcome::Warned, Some(reason))
    }
}
