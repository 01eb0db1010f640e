//! Multi-resolution `.ico` generation for the bundled executable.

use anyhow::{Context, Result};
use colored::Colorize;
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageReader};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::StepOutcome;
use crate::logging::log_step_warning;

/// Square frame sizes written to the icon, smallest first.
pub const ICON_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];

pub struct IconPreparer {
    source: PathBuf,
    target: PathBuf,
    dry_run: bool,
}

impl IconPreparer {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Convert the source image when the icon is missing.
    ///
    /// Conversion problems are reported as a warning; the bundler can still
    /// run with whatever icon the descriptor falls back to.
    pub fn prepare(&self) -> (StepOutcome, Option<String>) {
        if self.target.exists() {
            tracing::debug!(path = %self.target.display(), "Icon already present");
            return (StepOutcome::Skipped, None);
        }
        if !self.source.exists() {
            tracing::debug!(path = %self.source.display(), "No icon source, skipping");
            return (StepOutcome::Skipped, None);
        }
        if self.dry_run {
            println!(
                "  {} [DRY RUN] Would convert {} to {}",
                "🔍".blue(),
                self.source.display(),
                self.target.display()
            );
            return (StepOutcome::Planned, None);
        }

        match convert_to_ico(&self.source, &self.target) {
            Ok(()) => {
                tracing::info!(path = %self.target.display(), "Icon written");
                (StepOutcome::Completed, None)
            }
            Err(e) => {
                let reason = format!("{e:#}");
                log_step_warning("icon", &reason);
                println!("  {} Could not prepare icon: {}", "⚠".yellow(), reason);
                (StepOutcome::Warned, Some(reason))
            }
        }
    }
}

/// Decode `source` (format sniffed from its bytes) and write every size in
/// [`ICON_SIZES`] into a single `.ico` at `target`.
pub fn convert_to_ico(source: &Path, target: &Path) -> Result<()> {
    let image = ImageReader::open(source)
        .with_context(|| format!("Failed to open icon source: {}", source.display()))?
        .with_guessed_format()
        .context("Failed to detect icon source format")?
        .decode()
        .with_context(|| format!("Failed to decode icon source: {}", source.display()))?;

    let frames = ICON_SIZES
        .iter()
        .map(|&size| {
            let resized = image
                .resize_exact(size, size, FilterType::Lanczos3)
                .to_rgba8();
            IcoFrame::as_png(resized.as_raw(), size, size, ExtendedColorType::Rgba8)
                .with_context(|| format!("Failed to encode {size}x{size} icon frame"))
        })
        .collect::<Result<Vec<_>>>()?;

    write_atomically(target, |writer| {
        IcoEncoder::new(writer)
            .encode_images(&frames)
            .context("Failed to encode icon")
    })
}

/// Write through a sibling temporary file and rename it over `target`, so a
/// failed write never leaves a truncated file where `target` should be.
fn write_atomically<F>(target: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    let partial = target.with_file_name(name);

    let result = (|| {
        let file = File::create(&partial)
            .with_context(|| format!("Failed to create icon file: {}", partial.display()))?;
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        writer
            .flush()
            .with_context(|| format!("Failed to write icon file: {}", partial.display()))?;
        drop(writer);
        fs::rename(&partial, target)
            .with_context(|| format!("Failed to move icon into place: {}", target.display()))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&partial);
    }
    result
}
