//! Locating the Python runtime that seeds the isolated environment.

use semver::Version;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{BuildError, Result};
use crate::runner::{CommandRunner, Invocation};

/// One way of installing Python, shown when none can be found.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallHint {
    pub name: String,
    pub command: String,
}

impl InstallHint {
    fn new(name: &str, command: &str) -> Self {
        Self {
            name: name.to_string(),
            command: command.to_string(),
        }
    }
}

/// Interpreter names to try, in order of preference for this platform.
pub fn default_candidates() -> Vec<&'static str> {
    if cfg!(windows) {
        vec!["python", "py", "python3"]
    } else {
        vec!["python3", "python"]
    }
}

pub fn install_hints() -> Vec<InstallHint> {
    #[cfg(target_os = "windows")]
    return vec![
        InstallHint::new("winget", "winget install Python.Python.3.12"),
        InstallHint::new("Python.org", "Download and install from https://python.org/downloads/"),
    ];

    #[cfg(target_os = "macos")]
    return vec![
        InstallHint::new("Homebrew", "brew install python3"),
        InstallHint::new("Python.org", "Download and install from https://python.org/downloads/"),
    ];

    #[cfg(target_os = "linux")]
    return vec![
        InstallHint::new(
            "apt (Ubuntu/Debian)",
            "sudo apt update && sudo apt install python3 python3-venv python3-pip",
        ),
        InstallHint::new("dnf (Fedora)", "sudo dnf install python3 python3-pip"),
        InstallHint::new("pacman (Arch)", "sudo pacman -S python python-pip"),
    ];

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    return vec![InstallHint::new(
        "Python.org",
        "Download and install from https://python.org/downloads/",
    )];
}

pub struct InterpreterLocator {
    candidates: Vec<String>,
    search_path: Option<OsString>,
    cwd: PathBuf,
}

impl InterpreterLocator {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            candidates: default_candidates().into_iter().map(String::from).collect(),
            search_path: std::env::var_os("PATH"),
            cwd: cwd.into(),
        }
    }

    /// Replace the candidate list with a single configured interpreter.
    pub fn with_interpreter(mut self, interpreter: Option<&str>) -> Self {
        if let Some(interpreter) = interpreter {
            self.candidates = vec![interpreter.to_string()];
        }
        self
    }

    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Find the first candidate on the search path.
    ///
    /// Touches nothing on disk; a miss is reported before any step runs.
    pub fn locate(&self) -> Result<PathBuf> {
        for candidate in &self.candidates {
            match which::which_in(candidate, self.search_path.as_ref(), &self.cwd) {
                Ok(path) => {
                    tracing::info!(
                        candidate = candidate.as_str(),
                        path = %path.display(),
                        "Interpreter located"
                    );
                    return Ok(path);
                }
                Err(e) => {
                    tracing::debug!(candidate = candidate.as_str(), error = %e, "Candidate not found");
                }
            }
        }

        Err(BuildError::interpreter_not_found(
            self.candidates.clone(),
            install_hints(),
        ))
    }
}

/// Parse a Python version such as `3.11`, `3.11.4` or `3.12.0rc1`.
///
/// Missing components default to zero; a pre-release suffix ends the
/// version.
pub fn parse_version(text: &str) -> Option<Version> {
    let mut numbers = [0u64; 3];
    let mut parts = text.trim().split('.');

    for (index, slot) in numbers.iter_mut().enumerate() {
        let Some(part) = parts.next() else {
            if index == 0 {
                return None;
            }
            break;
        };
        let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }
        *slot = digits.parse().ok()?;
        if digits.len() != part.len() {
            break;
        }
    }

    Some(Version::new(numbers[0], numbers[1], numbers[2]))
}

/// Extract the version from `python --version` output.
pub fn parse_version_output(output: &str) -> Option<Version> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("Python "))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(parse_version)
}

/// Ask the interpreter for its version and compare it with the minimum.
pub fn check_version(
    runner: &dyn CommandRunner,
    interpreter: &Path,
    min_version: &str,
) -> Result<Version> {
    let required = parse_version(min_version).ok_or_else(|| {
        BuildError::config_error("min_python_version", format!("Invalid version: {min_version}"))
    })?;

    let output = runner.capture(&Invocation::new(interpreter).arg("--version"))?;
    if !output.outcome.success() {
        return Err(BuildError::step_failed(
            "interpreter version check",
            format!("{} --version", interpreter.display()),
            output.outcome.code(),
        ));
    }

    // Python 2 printed its version on stderr.
    let found = parse_version_output(&output.stdout)
        .or_else(|| parse_version_output(&output.stderr))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Could not read a version from '{} --version': {}",
                interpreter.display(),
                output.stdout
            )
        })?;

    crate::logging::log_dependency_check("python", &found.to_string());

    if found < required {
        return Err(BuildError::interpreter_too_old(
            interpreter,
            found.to_string(),
            required.to_string(),
        ));
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ExitOutcome;
    use crate::test_utils::RecordingRunner;
    use tempfile::TempDir;

    #[test]
    fn test_default_candidates_not_empty() {
        let candidates = default_candidates();
        assert!(!candidates.is_empty());
        assert!(candidates.contains(&"python"));
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("3.11.4"), Some(Version::new(3, 11, 4)));
        assert_eq!(parse_version("3.11"), Some(Version::new(3, 11, 0)));
        assert_eq!(parse_version("3"), Some(Version::new(3, 0, 0)));
        assert_eq!(parse_version("3.12.0rc1"), Some(Version::new(3, 12, 0)));
        assert_eq!(parse_version("3.13a1"), Some(Version::new(3, 13, 0)));
        assert_eq!(parse_version(""), None);
        assert_eq!(parse_version("three"), None);
        assert_eq!(parse_version("3.x"), None);
    }

    #[test]
    fn test_parse_version_output() {
        assert_eq!(
            parse_version_output("Python 3.11.4"),
            Some(Version::new(3, 11, 4))
        );
        assert_eq!(
            parse_version_output("Python 3.12.0rc1 (main)"),
            Some(Version::new(3, 12, 0))
        );
        assert_eq!(parse_version_output("pip 24.0"), None);
    }

    #[test]
    fn test_locate_with_empty_search_path_fails() {
        let temp = TempDir::new().unwrap();
        let locator = InterpreterLocator::new(temp.path()).with_search_path(temp.path());
        let err = locator.locate().unwrap_err();
        match err {
            BuildError::InterpreterNotFound { candidates, .. } => {
                assert_eq!(candidates, locator.candidates());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_finds_executable_on_search_path() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let python = temp.path().join("python3");
        std::fs::write(&python, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755)).unwrap();

        let located = InterpreterLocator::new(temp.path())
            .with_search_path(temp.path())
            .locate()
            .unwrap();
        assert_eq!(located, python);
    }

    #[cfg(unix)]
    #[test]
    fn test_configured_interpreter_replaces_candidates() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let python = temp.path().join("python3.12");
        std::fs::write(&python, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755)).unwrap();

        let locator = InterpreterLocator::new(temp.path())
            .with_search_path(temp.path())
            .with_interpreter(Some("python3.12"));
        assert_eq!(locator.candidates(), ["python3.12".to_string()]);
        assert_eq!(locator.locate().unwrap(), python);
    }

    #[cfg(unix)]
    #[test]
    fn test_configured_relative_path_resolves_against_project() {
        use std::os::unix::fs::PermissionsExt;

        let project = TempDir::new().unwrap();
        let empty_path = TempDir::new().unwrap();
        std::fs::create_dir_all(project.path().join("tools")).unwrap();
        let python = project.path().join("tools/python3");
        std::fs::write(&python, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755)).unwrap();

        let located = InterpreterLocator::new(project.path())
            .with_search_path(empty_path.path())
            .with_interpreter(Some("tools/python3"))
            .locate()
            .unwrap();
        assert_eq!(located, python);
    }

    #[test]
    fn test_check_version_accepts_newer() {
        let runner = RecordingRunner::new().with_capture_stdout("--version", "Python 3.11.4");
        let version = check_version(&runner, Path::new("python3"), "3.8").unwrap();
        assert_eq!(version, Version::new(3, 11, 4));
        assert_eq!(runner.invocations()[0].args_lossy(), vec!["--version"]);
    }

    #[test]
    fn test_check_version_rejects_older() {
        let runner = RecordingRunner::new().with_capture_stdout("--version", "Python 3.7.9");
        let err = check_version(&runner, Path::new("python3"), "3.8").unwrap_err();
        assert!(matches!(err, BuildError::InterpreterTooOld { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_check_version_failing_interpreter() {
        let runner =
            RecordingRunner::new().with_outcome("--version", ExitOutcome::Failed(Some(9)));
        let err = check_version(&runner, Path::new("python3"), "3.8").unwrap_err();
        assert!(matches!(err, BuildError::StepFailed { .. }));
    }
}
