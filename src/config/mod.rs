//! Build configuration.
//!
//! Every knob has a default matching the scraper project's layout, so a
//! checkout without `scraper-build.json` builds as-is.

pub mod validator;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BuildError, Result};

pub use validator::{ConfigValidator, ValidationError};

/// File looked up in the project directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "scraper-build.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Interpreter name or path; `None` tries the platform candidates.
    pub interpreter: Option<String>,
    pub min_python_version: Option<String>,
    pub venv_dir: PathBuf,
    pub manifest: PathBuf,
    pub descriptor: PathBuf,
    pub output_dir: PathBuf,
    pub install_browsers: bool,
    pub browsers: Vec<String>,
    pub icon: Option<IconConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IconConfig {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            interpreter: None,
            min_python_version: None,
            venv_dir: PathBuf::from(".venv"),
            manifest: PathBuf::from("requirements.txt"),
            descriptor: PathBuf::from("Scraper_WEB.spec"),
            output_dir: PathBuf::from("dist"),
            install_browsers: true,
            browsers: vec!["chromium".to_string()],
            icon: Some(IconConfig::default()),
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("scraper.ico.webp"),
            target: PathBuf::from("scraper.ico"),
        }
    }
}

impl BuildConfig {
    /// Resolve the configuration for a project directory.
    ///
    /// An explicit path must exist. Without one, `scraper-build.json` in the
    /// project directory is used when present and defaults otherwise.
    pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    project_dir.join(path)
                };
                if !path.is_file() {
                    return Err(BuildError::missing_input("configuration file", path));
                }
                Self::from_file(&path)?
            }
            None => {
                let default_path = project_dir.join(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        if let Err(errors) = ConfigValidator::validate(&config) {
            let message = errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(BuildError::config_error(
                explicit
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string()),
                message,
            ));
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| BuildError::io_error("reading configuration", Some(path), e))?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Self::from_json(&content)
            .map_err(|e| BuildError::config_error(path.display().to_string(), e.to_string()))
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Resolve a configured path against the project directory.
    pub fn resolve(project_dir: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_dir.join(path)
        }
    }
}
