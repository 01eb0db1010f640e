use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BuildError, Result};
use crate::steps::{Artifact, StepRecord};

/// Summary of one pipeline run, written as JSON on request.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub project_dir: PathBuf,
    pub interpreter: Option<PathBuf>,
    pub python_version: Option<String>,
    pub dry_run: bool,
    pub steps: Vec<StepRecord>,
    pub artifacts: Vec<Artifact>,
}

impl BuildReport {
    pub fn new(project_dir: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            project_dir: project_dir.into(),
            interpreter: None,
            python_version: None,
            dry_run,
            steps: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn warnings(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps
            .iter()
            .filter(|s| s.outcome == crate::steps::StepOutcome::Warned)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BuildError::Other(anyhow::anyhow!("Failed to serialize report: {e}")))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| BuildError::io_error("creating report directory", Some(parent), e))?;
        }
        fs::write(path, json).map_err(|e| BuildError::io_error("writing build report", Some(path), e))?;
        tracing::info!(path = %path.display(), "Build report written");
        Ok(())
    }
}
