#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const MANIFEST: &str = "requests==2.31.0\nplaywright==1.44.0\n";
pub const DESCRIPTOR: &str = "a = Analysis(['main.py'])\n";

/// Stand-in for `python3`: creates a venv by copying itself, records every
/// call in `calls.log` and fakes PyInstaller's `dist/` output.
#[cfg(unix)]
const FAKE_PYTHON: &str = r#"#!/bin/sh
echo "$*" >> calls.log
if [ "$1" = "--version" ]; then
  echo "Python ${FAKE_PYTHON_VERSION:-3.11.4}"
  exit 0
fi
if [ "$1" = "-m" ]; then
  case "$2" in
    venv)
      mkdir -p "$3/bin" && cp "$0" "$3/bin/python"
      exit $?
      ;;
    pip)
      exit ${FAKE_PIP_STATUS:-0}
      ;;
    playwright)
      exit ${FAKE_PLAYWRIGHT_STATUS:-0}
      ;;
    PyInstaller)
      if [ -z "$FAKE_NO_OUTPUT" ]; then
        mkdir -p dist/_internal
        printf 'MZ-binary' > dist/Scraper_WEB.exe
        printf 'zip' > dist/_internal/base_library.zip
      fi
      exit 0
      ;;
  esac
fi
exit 0
"#;

/// A project directory plus a directory to put on PATH.
pub struct TestProject {
    pub dir: TempDir,
    pub bin: TempDir,
}

impl TestProject {
    /// Project with manifest and descriptor, and an empty PATH directory.
    pub fn new() -> Self {
        let project = Self {
            dir: TempDir::new().unwrap(),
            bin: TempDir::new().unwrap(),
        };
        project.write("requirements.txt", MANIFEST);
        project.write("Scraper_WEB.spec", DESCRIPTOR);
        project
    }

    /// Same, with the fake interpreter installed as `python3`.
    #[cfg(unix)]
    pub fn with_fake_python() -> Self {
        use std::os::unix::fs::PermissionsExt;

        let project = Self::new();
        let python = project.bin.path().join("python3");
        fs::write(&python, FAKE_PYTHON).unwrap();
        fs::set_permissions(&python, fs::Permissions::from_mode(0o755)).unwrap();
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        fs::write(self.join(relative), content).unwrap();
    }

    /// Lines of `calls.log` written by the fake interpreter.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// The binary, run in the project with only the fake bin and system
    /// directories on PATH.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("scraper-build").unwrap();
        let path = format!("{}:/usr/bin:/bin", self.bin.path().display());
        cmd.current_dir(self.path())
            .env("PATH", path)
            .env("NO_COLOR", "1")
            .env("CLICOLOR", "0")
            .env_remove("RUST_LOG");
        cmd
    }

    /// The binary with PATH pointing at an empty directory.
    pub fn command_without_python(&self) -> Command {
        let mut cmd = Command::cargo_bin("scraper-build").unwrap();
        cmd.current_dir(self.path())
            .env("PATH", self.bin.path())
            .env("NO_COLOR", "1");
        cmd
    }

    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
