use std::fs;
use std::path::{Path, PathBuf};

use super::{ran, run_fatal, Step, StepOutcome};
use crate::error::Result;
use crate::runner::{CommandRunner, Invocation};

/// One entry of a requirements manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    /// Everything after the name: extras, version specifiers, markers.
    pub constraint: Option<String>,
}

/// Parse a pip requirements file for reporting.
///
/// Blank lines, comments and option lines (`-r`, `--index-url`, ...) are
/// ignored. The installer reads the file itself, so nothing here rejects
/// input.
pub fn parse_manifest(content: &str) -> Vec<Requirement> {
    content
        .lines()
        .filter_map(|line| {
            let line = strip_comment(line).trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
                return None;
            }

            let split = line
                .find(|c: char| c.is_whitespace() || "<>=!~;[@".contains(c))
                .unwrap_or(line.len());
            let name = line[..split].trim();
            if name.is_empty() {
                return None;
            }
            let constraint = line[split..].trim();

            Some(Requirement {
                name: name.to_string(),
                constraint: (!constraint.is_empty()).then(|| constraint.to_string()),
            })
        })
        .collect()
}

/// A `#` starts a comment at the beginning of a line or after whitespace.
fn strip_comment(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|&(i, c)| c == '#' && (i == 0 || line[..i].ends_with(char::is_whitespace)))
        .map_or(line.len(), |(i, _)| i);
    &line[..end]
}

/// Upgrades pip, then installs the manifest into the environment.
pub struct DependencyInstaller<'a> {
    runner: &'a dyn CommandRunner,
    python: PathBuf,
    manifest: PathBuf,
}

impl<'a> DependencyInstaller<'a> {
    pub fn new(runner: &'a dyn CommandRunner, python: impl Into<PathBuf>, manifest: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            python: python.into(),
            manifest: manifest.into(),
        }
    }

    pub fn upgrade_pip_invocation(&self) -> Invocation {
        Invocation::new(&self.python).args(["-m", "pip", "install", "--upgrade", "pip"])
    }

    pub fn install_invocation(&self) -> Invocation {
        Invocation::new(&self.python)
            .args(["-m", "pip", "install", "-r"])
            .arg(&self.manifest)
    }

    pub fn install(&self) -> Result<StepOutcome> {
        self.log_manifest(&self.manifest);

        run_fatal(self.runner, Step::Dependencies, &self.upgrade_pip_invocation())?;
        run_fatal(self.runner, Step::Dependencies, &self.install_invocation())?;

        Ok(ran(self.runner))
    }

    fn log_manifest(&self, manifest: &Path) {
        match fs::read_to_string(manifest) {
            Ok(content) => {
                let requirements = parse_manifest(&content);
                tracing::info!(
                    manifest = %manifest.display(),
                    count = requirements.len(),
                    "Installing requirements"
                );
                for requirement in &requirements {
                    tracing::debug!(
                        name = requirement.name.as_str(),
                        constraint = requirement.constraint.as_deref().unwrap_or("*"),
                        "Requirement"
                    );
                }
            }
            Err(e) => {
                tracing::debug!(manifest = %manifest.display(), error = %e, "Could not read manifest");
            }
        }
    }
}
