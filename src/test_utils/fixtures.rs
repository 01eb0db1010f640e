//! Scratch project directories for pipeline tests

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::BuildConfig;

pub const SAMPLE_MANIFEST: &str = "\
# runtime
requests==2.31.0
beautifulsoup4>=4.12
playwright==1.44.0
";

pub const SAMPLE_DESCRIPTOR: &str = "\
# -*- mode: python -*-
a = Analysis(['main.py'])
exe = EXE(a.scripts, name='Scraper_WEB', console=False)
";

/// A temporary project holding a manifest and a packaging descriptor.
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    pub fn new() -> Self {
        let fixture = Self::empty();
        fixture.write("requirements.txt", SAMPLE_MANIFEST);
        fixture.write("Scraper_WEB.spec", SAMPLE_DESCRIPTOR);
        fixture
    }

    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("create temp project"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: impl AsRef<Path>, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(&path, content).expect("write fixture file");
        path
    }

    /// Default configuration with icon preparation switched off.
    pub fn config(&self) -> BuildConfig {
        BuildConfig {
            icon: None,
            ..BuildConfig::default()
        }
    }

    /// Names of the entries directly inside the project directory, sorted.
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path())
            .expect("read project directory")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
