use colored::Colorize;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{BuildError, Result};

/// A file produced by the bundler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    /// Relative to the output directory.
    pub path: PathBuf,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

pub struct Verifier {
    output_dir: PathBuf,
}

impl Verifier {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// List every file under the output directory, sorted by path.
    pub fn verify(&self) -> Result<Vec<Artifact>> {
        if !self.output_dir.is_dir() {
            tracing::error!(path = %self.output_dir.display(), "Output directory missing");
            return Err(BuildError::output_missing(&self.output_dir));
        }

        let mut artifacts = Vec::new();
        collect_files(&self.output_dir, &self.output_dir, &mut artifacts)?;
        artifacts.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::info!(
            path = %self.output_dir.display(),
            files = artifacts.len(),
            "Build output verified"
        );
        Ok(artifacts)
    }

    /// Fill in SHA-256 digests for the report.
    pub fn digest(&self, artifacts: &mut [Artifact]) -> Result<()> {
        for artifact in artifacts.iter_mut() {
            let path = self.output_dir.join(&artifact.path);
            artifact.sha256 = Some(sha256_file(&path)?);
        }
        Ok(())
    }

    pub fn print(&self, artifacts: &[Artifact]) {
        println!(
            "{} Build output in {}:",
            "✓".green().bold(),
            self.output_dir.display().to_string().cyan()
        );
        if artifacts.is_empty() {
            println!("  {} (no files)", "•".blue());
        }
        for artifact in artifacts {
            println!(
                "  {} {} ({})",
                "•".blue(),
                artifact.path.display(),
                format_size(artifact.size).dimmed()
            );
        }
    }
}

fn collect_files(root: &Path, dir: &Path, artifacts: &mut Vec<Artifact>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .map_err(|e| BuildError::io_error("reading output directory", Some(dir), e))?;

    for entry in entries {
        let entry =
            entry.map_err(|e| BuildError::io_error("reading output directory", Some(dir), e))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| BuildError::io_error("inspecting build output", Some(path.as_path()), e))?;

        // Symlinked directories (macOS app bundles) are listed, not followed.
        if file_type.is_dir() {
            collect_files(root, &path, artifacts)?;
            continue;
        }

        let size = fs::metadata(&path)
            .or_else(|_| fs::symlink_metadata(&path))
            .map(|m| m.len())
            .map_err(|e| BuildError::io_error("inspecting build output", Some(path.as_path()), e))?;
        let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();

        artifacts.push(Artifact {
            path: relative,
            size,
            sha256: None,
        });
    }

    Ok(())
}

pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).map_err(|e| BuildError::io_error("hashing artifact", Some(path), e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .map_err(|e| BuildError::io_error("hashing artifact", Some(path), e))?;
    Ok(hex::encode(hasher.finalize()))
}

/// Human readable size, `B` through `GB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
