//! The build pipeline: locate, provision, install, package, verify.
//!
//! Steps run strictly in order and the first fatal failure ends the run.
//! Only the browser and icon steps may fail without stopping the build.

use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::BuildConfig;
use crate::error::{BuildError, Result};
use crate::interpreter::{self, InterpreterLocator};
use crate::logging::{log_performance, log_step_finished, log_step_started};
use crate::report::BuildReport;
use crate::runner::CommandRunner;
use crate::steps::{
    venv_python, BrowserInstaller, DependencyInstaller, EnvironmentProvisioner, IconPreparer,
    Packager, Step, StepOutcome, StepRecord, Verifier,
};

const TOTAL_STEPS: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub skip_browsers: bool,
    pub report_path: Option<PathBuf>,
}

pub struct Pipeline<'a> {
    project_dir: PathBuf,
    config: BuildConfig,
    runner: &'a dyn CommandRunner,
    locator: InterpreterLocator,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(project_dir: impl Into<PathBuf>, config: BuildConfig, runner: &'a dyn CommandRunner) -> Self {
        let project_dir = project_dir.into();
        let locator = InterpreterLocator::new(&project_dir)
            .with_interpreter(config.interpreter.as_deref());
        Self {
            project_dir,
            config,
            runner,
            locator,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_locator(mut self, locator: InterpreterLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    fn path(&self, configured: &Path) -> PathBuf {
        BuildConfig::resolve(&self.project_dir, configured)
    }

    pub fn run(&self) -> Result<BuildReport> {
        let dry_run = self.runner.is_dry_run();
        let mut report = BuildReport::new(&self.project_dir, dry_run);
        crate::logging::log_system_info();

        self.timed(&mut report, Step::Interpreter, |report| {
            let interpreter = self.locator.locate()?;
            println!("  {} Using {}", "✓".green(), interpreter.display());
            if let Some(min_version) = &self.config.min_python_version {
                let version = interpreter::check_version(self.runner, &interpreter, min_version)?;
                report.python_version = Some(version.to_string());
            }
            report.interpreter = Some(interpreter);
            Ok((StepOutcome::Completed, None))
        })?;
        let interpreter = report
            .interpreter
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Interpreter step recorded no path"))?;

        self.timed(&mut report, Step::Preflight, |_| {
            self.preflight()?;
            Ok((StepOutcome::Completed, None))
        })?;

        let venv_dir = self.path(&self.config.venv_dir);
        let python = venv_python(&venv_dir);

        self.timed(&mut report, Step::Environment, |_| {
            let outcome = EnvironmentProvisioner::new(self.runner, &interpreter, &venv_dir).provision()?;
            if outcome == StepOutcome::Skipped {
                println!(
                    "  {} Virtual environment already exists: {}",
                    "✓".green(),
                    venv_dir.display()
                );
            }
            Ok((outcome, None))
        })?;

        self.timed(&mut report, Step::Dependencies, |_| {
            let manifest = self.path(&self.config.manifest);
            let outcome = DependencyInstaller::new(self.runner, &python, manifest).install()?;
            Ok((outcome, None))
        })?;

        self.timed(&mut report, Step::Browsers, |_| {
            if self.options.skip_browsers || !self.config.install_browsers {
                println!("  {} Browser installation disabled", "→".blue());
                return Ok((StepOutcome::Skipped, None));
            }
            Ok(BrowserInstaller::new(self.runner, &python, &self.config.browsers).install())
        })?;

        self.timed(&mut report, Step::Icon, |_| {
            let Some(icon) = &self.config.icon else {
                return Ok((StepOutcome::Skipped, None));
            };
            Ok(
                IconPreparer::new(self.path(&icon.source), self.path(&icon.target))
                    .with_dry_run(dry_run)
                    .prepare(),
            )
        })?;

        self.timed(&mut report, Step::Package, |_| {
            let descriptor = self.path(&self.config.descriptor);
            let default_dist = BuildConfig::default().output_dir;
            let dist_path = (self.config.output_dir != default_dist)
                .then(|| self.path(&self.config.output_dir));
            let outcome = Packager::new(self.runner, &python, descriptor)
                .with_dist_path(dist_path.as_deref())
                .package()?;
            Ok((outcome, None))
        })?;

        self.timed(&mut report, Step::Verify, |report| {
            let verifier = Verifier::new(self.path(&self.config.output_dir));
            if dry_run {
                println!(
                    "  {} [DRY RUN] Would verify {}",
                    "🔍".blue(),
                    verifier.output_dir().display()
                );
                return Ok((StepOutcome::Planned, None));
            }
            let mut artifacts = verifier.verify()?;
            if self.options.report_path.is_some() {
                verifier.digest(&mut artifacts)?;
            }
            verifier.print(&artifacts);
            report.artifacts = artifacts;
            Ok((StepOutcome::Completed, None))
        })?;

        report.finish();

        if let Some(path) = &self.options.report_path {
            let path = self.path(path);
            if dry_run {
                println!(
                    "  {} [DRY RUN] Would write report to {}",
                    "🔍".blue(),
                    path.display()
                );
            } else {
                report.write(&path)?;
            }
        }

        Ok(report)
    }

    /// Every input must exist before the first write to disk.
    fn preflight(&self) -> Result<()> {
        let manifest = self.path(&self.config.manifest);
        if !manifest.is_file() {
            return Err(BuildError::missing_input("dependency manifest", manifest));
        }
        let descriptor = self.path(&self.config.descriptor);
        if !descriptor.is_file() {
            return Err(BuildError::missing_input("packaging descriptor", descriptor));
        }
        Ok(())
    }

    /// Run one step, print its header, time it and record the outcome.
    fn timed<F>(&self, report: &mut BuildReport, step: Step, body: F) -> Result<()>
    where
        F: FnOnce(&mut BuildReport) -> Result<(StepOutcome, Option<String>)>,
    {
        let index = report.steps.len() + 1;
        println!(
            "{} {}",
            format!("[{index}/{TOTAL_STEPS}]").dimmed(),
            step.description().blue().bold()
        );
        log_step_started(step.name());
        let started = Instant::now();

        let result = body(report);
        let duration_ms = started.elapsed().as_millis() as u64;
        log_performance(step.name(), duration_ms);

        match result {
            Ok((outcome, detail)) => {
                log_step_finished(step.name(), &outcome.to_string());
                report.steps.push(StepRecord {
                    step,
                    outcome,
                    detail,
                    duration_ms,
                });
                Ok(())
            }
            Err(e) => {
                log_step_finished(step.name(), "failed");
                Err(e)
            }
        }
    }
}
