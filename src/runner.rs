//! Execution of external tools.
//!
//! Every pipeline step that shells out goes through [`CommandRunner`], so the
//! pipeline can be driven by the real process runner, a dry-run printer, or a
//! recording fake in tests.

use anyhow::{Context, Result};
use colored::Colorize;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Arguments as lossy strings, handy for matching in tests and logs.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    Failed(Option<i32>),
}

impl ExitOutcome {
    pub fn success(&self) -> bool {
        matches!(self, ExitOutcome::Success)
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitOutcome::Success => Some(0),
            ExitOutcome::Failed(code) => *code,
        }
    }
}

impl From<std::process::ExitStatus> for ExitOutcome {
    fn from(status: std::process::ExitStatus) -> Self {
        if status.success() {
            ExitOutcome::Success
        } else {
            ExitOutcome::Failed(status.code())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub outcome: ExitOutcome,
    pub stdout: String,
    pub stderr: String,
}

pub trait CommandRunner {
    /// Run to completion with inherited stdio.
    fn run(&self, invocation: &Invocation) -> Result<ExitOutcome>;

    /// Run to completion and capture stdout/stderr.
    fn capture(&self, invocation: &Invocation) -> Result<CapturedOutput>;

    /// True when invocations are only printed, never executed.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Runs invocations as child processes inside the project directory.
pub struct SystemRunner {
    working_dir: PathBuf,
    verbose: bool,
}

impl SystemRunner {
    pub fn new(working_dir: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            working_dir: working_dir.into(),
            verbose,
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    fn command(&self, invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).current_dir(&self.working_dir);
        cmd
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ExitOutcome> {
        if self.verbose {
            eprintln!("{} {}", "$".cyan(), invocation);
        }
        tracing::debug!(
            program = %invocation.program.display(),
            args = ?invocation.args_lossy(),
            "Spawning process"
        );

        let status = self
            .command(invocation)
            .stdin(Stdio::null())
            .status()
            .with_context(|| format!("Failed to execute command: {invocation}"))?;

        Ok(status.into())
    }

    fn capture(&self, invocation: &Invocation) -> Result<CapturedOutput> {
        tracing::debug!(
            program = %invocation.program.display(),
            args = ?invocation.args_lossy(),
            "Capturing process output"
        );

        let output = self
            .command(invocation)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute command: {invocation}"))?;

        Ok(CapturedOutput {
            outcome: output.status.into(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Prints what would run and reports success without spawning anything.
///
/// Captures still execute for real: they only query tool versions and have
/// no side effects.
pub struct DryRunRunner {
    inner: SystemRunner,
}

impl DryRunRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: SystemRunner::new(working_dir, false),
        }
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&self, invocation: &Invocation) -> Result<ExitOutcome> {
        println!(
            "  {} [DRY RUN] Would run: {}",
            "🔍".blue(),
            invocation.to_string().cyan()
        );
        Ok(ExitOutcome::Success)
    }

    fn capture(&self, invocation: &Invocation) -> Result<CapturedOutput> {
        self.inner.capture(invocation)
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
