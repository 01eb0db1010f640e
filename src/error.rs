use colored::Colorize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::interpreter::InstallHint;

#[derive(Debug)]
pub enum BuildError {
    InterpreterNotFound {
        candidates: Vec<String>,
        install_hints: Vec<InstallHint>,
    },
    InterpreterTooOld {
        interpreter: PathBuf,
        found_version: String,
        required_version: String,
    },
    MissingInput {
        kind: String,
        path: PathBuf,
    },
    ConfigError {
        path: String,
        message: String,
    },
    StepFailed {
        step: String,
        command: String,
        exit_code: Option<i32>,
    },
    OutputMissing {
        path: PathBuf,
    },
    IoError {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
    },
    Other(anyhow::Error),
}

impl BuildError {
    pub fn interpreter_not_found(candidates: Vec<String>, install_hints: Vec<InstallHint>) -> Self {
        Self::InterpreterNotFound {
            candidates,
            install_hints,
        }
    }

    pub fn interpreter_too_old(
        interpreter: impl Into<PathBuf>,
        found_version: impl Into<String>,
        required_version: impl Into<String>,
    ) -> Self {
        Self::InterpreterTooOld {
            interpreter: interpreter.into(),
            found_version: found_version.into(),
            required_version: required_version.into(),
        }
    }

    pub fn missing_input(kind: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingInput {
            kind: kind.into(),
            path: path.into(),
        }
    }

    pub fn config_error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn step_failed(
        step: impl Into<String>,
        command: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::StepFailed {
            step: step.into(),
            command: command.into(),
            exit_code,
        }
    }

    pub fn output_missing(path: impl Into<PathBuf>) -> Self {
        Self::OutputMissing { path: path.into() }
    }

    pub fn io_error(operation: impl Into<String>, path: Option<&Path>, source: std::io::Error) -> Self {
        Self::IoError {
            operation: operation.into(),
            path: path.map(|p| p.display().to_string()),
            source,
        }
    }

    /// Process exit status for this failure.
    ///
    /// A failed external step hands back the tool's own exit code; every
    /// failure detected by the pipeline itself exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::StepFailed {
                exit_code: Some(code),
                ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InterpreterNotFound {
                candidates,
                install_hints,
            } => {
                writeln!(
                    f,
                    "{} Python interpreter not found on PATH",
                    "✗".red().bold()
                )?;
                writeln!(f, "  {} Tried: {}", "→".blue(), candidates.join(", "))?;
                if !install_hints.is_empty() {
                    writeln!(f)?;
                    writeln!(f, "{}", "How to install:".green().bold())?;
                    for hint in install_hints {
                        writeln!(f, "  {} {}", "•".blue(), hint.name.bold())?;
                        writeln!(f, "    {} {}", "$".cyan(), hint.command)?;
                    }
                }
                Ok(())
            }
            Self::InterpreterTooOld {
                interpreter,
                found_version,
                required_version,
            } => {
                writeln!(
                    f,
                    "{} Python interpreter is too old: {}",
                    "✗".red().bold(),
                    interpreter.display().to_string().yellow()
                )?;
                writeln!(
                    f,
                    "  {} Found version: {}",
                    "→".blue(),
                    found_version.red()
                )?;
                writeln!(
                    f,
                    "  {} Required version: {}",
                    "→".blue(),
                    required_version.green()
                )?;
                Ok(())
            }
            Self::MissingInput { kind, path } => {
                writeln!(f, "{} Missing {}", "✗".red().bold(), kind.yellow())?;
                writeln!(f, "  {} Expected at: {}", "→".blue(), path.display())?;
                Ok(())
            }
            Self::ConfigError { path, message } => {
                writeln!(f, "{} Configuration error", "✗".red().bold())?;
                writeln!(f, "  {} Path: {}", "→".blue(), path.yellow())?;
                writeln!(f, "  {} Error: {}", "→".blue(), message)?;
                Ok(())
            }
            Self::StepFailed {
                step,
                command,
                exit_code,
            } => {
                writeln!(f, "{} Step failed: {}", "✗".red().bold(), step.yellow())?;
                writeln!(f, "  {} Command: {}", "→".blue(), command)?;
                match exit_code {
                    Some(code) => writeln!(f, "  {} Exit code: {}", "→".blue(), code)?,
                    None => writeln!(f, "  {} Terminated without an exit code", "→".blue())?,
                }
                Ok(())
            }
            Self::OutputMissing { path } => {
                writeln!(
                    f,
                    "{} Build produced no output directory",
                    "✗".red().bold()
                )?;
                writeln!(f, "  {} Expected: {}", "→".blue(), path.display())?;
                writeln!(
                    f,
                    "  {} The bundler exited cleanly but left nothing to ship",
                    "→".blue()
                )?;
                Ok(())
            }
            Self::IoError {
                operation,
                path,
                source,
            } => {
                writeln!(
                    f,
                    "{} I/O error during: {}",
                    "✗".red().bold(),
                    operation.yellow()
                )?;
                if let Some(path) = path {
                    writeln!(f, "  {} Path: {}", "→".blue(), path)?;
                }
                writeln!(f, "  {} Error: {}", "→".blue(), source)?;
                Ok(())
            }
            Self::Other(err) => write!(f, "{} {:#}", "✗".red().bold(), err),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError { source, .. } => Some(source),
            Self::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BuildError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            operation: "unknown".to_string(),
            path: None,
            source: err,
        }
    }
}

impl From<anyhow::Error> for BuildError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err)
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_propagates_tool_status() {
        let err = BuildError::step_failed("dependencies", "python -m pip install", Some(23));
        assert_eq!(err.exit_code(), 23);
    }

    #[test]
    fn test_exit_code_defaults_to_one() {
        assert_eq!(BuildError::step_failed("package", "x", None).exit_code(), 1);
        assert_eq!(BuildError::output_missing("dist").exit_code(), 1);
        assert_eq!(
            BuildError::interpreter_not_found(vec!["python3".into()], vec![]).exit_code(),
            1
        );
        assert_eq!(BuildError::missing_input("manifest", "x").exit_code(), 1);
    }

    #[test]
    fn test_display_mentions_details() {
        let err = BuildError::interpreter_not_found(
            vec!["python3".to_string(), "python".to_string()],
            vec![InstallHint {
                name: "Homebrew".to_string(),
                command: "brew install python3".to_string(),
            }],
        );
        let rendered = err.to_string();
        assert!(rendered.contains("Python interpreter not found"));
        assert!(rendered.contains("python3, python"));
        assert!(rendered.contains("brew install python3"));

        let err = BuildError::output_missing("dist");
        assert!(err.to_string().contains("no output directory"));
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error;
        let err = BuildError::io_error(
            "reading output directory",
            Some(Path::new("dist")),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.source().is_some());
        assert!(err.to_string().contains("dist"));
    }

    #[test]
    fn test_from_anyhow() {
        let err: BuildError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, BuildError::Other(_)));
        assert!(err.to_string().contains("boom"));
    }
}
