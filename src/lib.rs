//! Build orchestration for the web scraper application: provisions a Python
//! virtual environment, installs its dependencies and Playwright browsers,
//! and packages it into a standalone executable with PyInstaller.

pub mod config;
pub mod error;
pub mod interpreter;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod steps;

#[cfg(test)]
pub mod test_utils;

pub use config::BuildConfig;
pub use error::{BuildError, Result};
pub use pipeline::{Pipeline, PipelineOptions};
pub use runner::{CommandRunner, DryRunRunner, Invocation, SystemRunner};
