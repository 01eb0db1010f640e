//! A [`CommandRunner`] that records invocations instead of spawning them.

use anyhow::Result;
use std::cell::RefCell;

use crate::runner::{CapturedOutput, CommandRunner, ExitOutcome, Invocation};

type SideEffect = Box<dyn Fn()>;

/// Records every invocation and answers from a small rule table.
///
/// Rules match when the space-joined arguments contain the rule's key; the
/// first matching rule wins. Unmatched invocations succeed.
#[derive(Default)]
pub struct RecordingRunner {
    invocations: RefCell<Vec<Invocation>>,
    outcomes: Vec<(String, ExitOutcome)>,
    spawn_failures: Vec<String>,
    captures: Vec<(String, String)>,
    effects: Vec<(String, SideEffect)>,
    dry_run: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(mut self, key: impl Into<String>, outcome: ExitOutcome) -> Self {
        self.outcomes.push((key.into(), outcome));
        self
    }

    /// Make matching invocations fail to spawn at all.
    pub fn with_spawn_failure(mut self, key: impl Into<String>) -> Self {
        self.spawn_failures.push(key.into());
        self
    }

    pub fn with_capture_stdout(mut self, key: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.captures.push((key.into(), stdout.into()));
        self
    }

    /// Run `effect` whenever a matching invocation executes.
    pub fn with_effect<F>(mut self, key: impl Into<String>, effect: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.effects.push((key.into(), Box::new(effect)));
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Joined argument strings of every recorded invocation, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(|inv| inv.args_lossy().join(" "))
            .collect()
    }

    /// Position of the first invocation whose arguments contain `key`.
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.command_lines().iter().position(|line| line.contains(key))
    }

    fn record(&self, invocation: &Invocation) -> Result<String> {
        self.invocations.borrow_mut().push(invocation.clone());
        let line = invocation.args_lossy().join(" ");
        if self.spawn_failures.iter().any(|key| line.contains(key)) {
            anyhow::bail!("Failed to execute command: {invocation}");
        }
        Ok(line)
    }

    fn outcome_for(&self, line: &str) -> ExitOutcome {
        self.outcomes
            .iter()
            .find(|(key, _)| line.contains(key.as_str()))
            .map(|(_, outcome)| *outcome)
            .unwrap_or(ExitOutcome::Success)
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<ExitOutcome> {
        let line = self.record(invocation)?;
        let outcome = self.outcome_for(&line);
        if outcome.success() {
            for (key, effect) in &self.effects {
                if line.contains(key.as_str()) {
                    effect();
                }
            }
        }
        Ok(outcome)
    }

    fn capture(&self, invocation: &Invocation) -> Result<CapturedOutput> {
        let line = self.record(invocation)?;
        let stdout = self
            .captures
            .iter()
            .find(|(key, _)| line.contains(key.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default();
        Ok(CapturedOutput {
            outcome: self.outcome_for(&line),
            stdout,
            stderr: String::new(),
        })
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}
