use std::path::{Path, PathBuf};

use super::{ran, run_fatal, Step, StepOutcome};
use crate::error::Result;
use crate::runner::{CommandRunner, Invocation};

/// Interpreter inside a virtual environment.
pub fn venv_python(venv_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_dir.join("Scripts").join("python.exe")
    } else {
        venv_dir.join("bin").join("python")
    }
}

/// Creates the isolated environment unless one is already there.
pub struct EnvironmentProvisioner<'a> {
    runner: &'a dyn CommandRunner,
    interpreter: &'a Path,
    venv_dir: PathBuf,
}

impl<'a> EnvironmentProvisioner<'a> {
    pub fn new(runner: &'a dyn CommandRunner, interpreter: &'a Path, venv_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            interpreter,
            venv_dir: venv_dir.into(),
        }
    }

    pub fn exists(&self) -> bool {
        self.venv_dir.exists()
    }

    pub fn provision(&self) -> Result<StepOutcome> {
        if self.exists() {
            let python = venv_python(&self.venv_dir);
            if !python.exists() {
                tracing::warn!(
                    path = %python.display(),
                    "Virtual environment exists but has no interpreter"
                );
            }
            tracing::info!(path = %self.venv_dir.display(), "Virtual environment already present");
            return Ok(StepOutcome::Skipped);
        }

        let invocation = Invocation::new(self.interpreter)
            .args(["-m", "venv"])
            .arg(&self.venv_dir);
        run_fatal(self.runner, Step::Environment, &invocation)?;

        tracing::info!(path = %self.venv_dir.display(), "Virtual environment created");
        Ok(ran(self.runner))
    }
}
