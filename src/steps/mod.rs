//! The individual stages of the build pipeline.

pub mod browsers;
pub mod dependencies;
pub mod environment;
pub mod icon;
pub mod package;
pub mod verify;

use serde::Serialize;
use std::fmt;

use crate::error::{BuildError, Result};
use crate::runner::{CommandRunner, Invocation};

pub use browsers::BrowserInstaller;
pub use dependencies::{parse_manifest, DependencyInstaller, Requirement};
pub use environment::{venv_python, EnvironmentProvisioner};
pub use icon::IconPreparer;
pub use package::Packager;
pub use verify::{Artifact, Verifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Interpreter,
    Preflight,
    Environment,
    Dependencies,
    Browsers,
    Icon,
    Package,
    Verify,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Interpreter => "interpreter",
            Step::Preflight => "preflight",
            Step::Environment => "environment",
            Step::Dependencies => "dependencies",
            Step::Browsers => "browsers",
            Step::Icon => "icon",
            Step::Package => "package",
            Step::Verify => "verify",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Step::Interpreter => "Locating Python interpreter",
            Step::Preflight => "Checking build inputs",
            Step::Environment => "Preparing virtual environment",
            Step::Dependencies => "Installing dependencies",
            Step::Browsers => "Installing Playwright browsers",
            Step::Icon => "Preparing application icon",
            Step::Package => "Packaging executable",
            Step::Verify => "Verifying build output",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Completed,
    Skipped,
    /// Failed, but the failure was downgraded to a warning.
    Warned,
    /// Dry run: the step's commands were printed, not executed.
    Planned,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepOutcome::Completed => "completed",
            StepOutcome::Skipped => "skipped",
            StepOutcome::Warned => "warned",
            StepOutcome::Planned => "planned",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub step: Step,
    pub outcome: StepOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub duration_ms: u64,
}

/// Outcome for a step whose commands all ran (or would have run).
pub(crate) fn ran(runner: &dyn CommandRunner) -> StepOutcome {
    if runner.is_dry_run() {
        StepOutcome::Planned
    } else {
        StepOutcome::Completed
    }
}

/// Run an invocation whose failure aborts the pipeline.
pub(crate) fn run_fatal(runner: &dyn CommandRunner, step: Step, invocation: &Invocation) -> Result<()> {
    let outcome = runner.run(invocation)?;
    if outcome.success() {
        Ok(())
    } else {
        Err(BuildError::step_failed(
            step.description(),
            invocation.to_string(),
            outcome.code(),
        ))
    }
}
