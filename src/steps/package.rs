use std::path::{Path, PathBuf};

use super::{ran, run_fatal, Step, StepOutcome};
use crate::error::Result;
use crate::runner::{CommandRunner, Invocation};

/// Runs PyInstaller against the packaging descriptor.
pub struct Packager<'a> {
    runner: &'a dyn CommandRunner,
    python: PathBuf,
    descriptor: PathBuf,
    dist_path: Option<PathBuf>,
}

impl<'a> Packager<'a> {
    pub fn new(runner: &'a dyn CommandRunner, python: impl Into<PathBuf>, descriptor: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            python: python.into(),
            descriptor: descriptor.into(),
            dist_path: None,
        }
    }

    /// Send output somewhere other than PyInstaller's default `dist`.
    pub fn with_dist_path(mut self, dist_path: Option<&Path>) -> Self {
        self.dist_path = dist_path.map(Path::to_path_buf);
        self
    }

    pub fn bundler_invocation(&self) -> Invocation {
        Invocation::new(&self.python).args(["-m", "pip", "install", "--upgrade", "pyinstaller"])
    }

    pub fn package_invocation(&self) -> Invocation {
        let mut invocation = Invocation::new(&self.python).args(["-m", "PyInstaller", "--noconfirm"]);
        if let Some(dist_path) = &self.dist_path {
            invocation = invocation.arg("--distpath").arg(dist_path);
        }
        invocation.arg(&self.descriptor)
    }

    pub fn package(&self) -> Result<StepOutcome> {
        run_fatal(self.runner, Step::Package, &self.bundler_invocation())?;
        run_fatal(self.runner, Step::Package, &self.package_invocation())?;
        tracing::info!(descriptor = %self.descriptor.display(), "Bundler finished");
        Ok(ran(self.runner))
    }
}
