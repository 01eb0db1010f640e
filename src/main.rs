use clap::Parser;
use colored::*;
use std::path::{Path, PathBuf};

use scraper_build::logging::init_logging;
use scraper_build::{
    BuildConfig, BuildError, CommandRunner, DryRunRunner, Pipeline, PipelineOptions, SystemRunner,
};

#[derive(Parser)]
#[command(name = "scraper-build")]
#[command(version)]
#[command(
    about = "Build the Scraper WEB executable: venv, dependencies, browsers, PyInstaller",
    long_about = None
)]
struct Cli {
    #[arg(short, long, help = "Enable verbose output", global = true)]
    verbose: bool,

    #[arg(long, help = "Print the commands without running them")]
    dry_run: bool,

    #[arg(
        short = 'C',
        long,
        value_name = "DIR",
        help = "Project directory (defaults to the current directory)"
    )]
    project_dir: Option<PathBuf>,

    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Configuration file, relative to the current directory (defaults to scraper-build.json in the project)"
    )]
    config: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Write a JSON build report, relative to the current directory")]
    report: Option<PathBuf>,

    #[arg(long, help = "Do not install Playwright browsers")]
    skip_browsers: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        eprintln!("{}", "Verbose mode enabled".dimmed());
    }
    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("{} {}", "⚠".yellow(), e);
    }

    if let Err(err) = run(&cli) {
        eprintln!();
        eprintln!("{err}");
        std::process::exit(err.exit_code());
    }
}

fn run(cli: &Cli) -> Result<(), BuildError> {
    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    let config_path = cli.config.as_deref().map(absolute_arg).transpose()?;
    let config = BuildConfig::load(&project_dir, config_path.as_deref())?;

    println!(
        "{} Building in {}",
        "🔧".blue(),
        project_dir.display().to_string().cyan().bold()
    );

    let runner: Box<dyn CommandRunner> = if cli.dry_run {
        Box::new(DryRunRunner::new(&project_dir))
    } else {
        Box::new(SystemRunner::new(&project_dir, cli.verbose))
    };

    let options = PipelineOptions {
        skip_browsers: cli.skip_browsers,
        report_path: cli.report.as_deref().map(absolute_arg).transpose()?,
    };
    let report = Pipeline::new(&project_dir, config, runner.as_ref())
        .with_options(options)
        .run()?;

    println!();
    let warnings = report.warnings().count();
    if report.dry_run {
        println!("{}", "✅ Dry run finished, nothing was changed".green().bold());
    } else if warnings > 0 {
        println!(
            "{}",
            format!("⚠️  Build finished with {warnings} warning(s)")
                .yellow()
                .bold()
        );
    } else {
        println!("{}", "✅ Build finished successfully".green().bold());
    }

    Ok(())
}

/// Absolute project directory; child processes run inside it.
fn resolve_project_dir(explicit: Option<&Path>) -> Result<PathBuf, BuildError> {
    let dir = match explicit {
        Some(dir) => std::path::absolute(dir)
            .map_err(|e| BuildError::io_error("resolving project directory", Some(dir), e))?,
        None => std::env::current_dir()
            .map_err(|e| BuildError::io_error("reading current directory", None, e))?,
    };
    if !dir.is_dir() {
        return Err(BuildError::missing_input("project directory", dir));
    }
    Ok(dir)
}

/// Paths given on the command line are relative to where the user is, not to
/// the project directory.
fn absolute_arg(path: &Path) -> Result<PathBuf, BuildError> {
    std::path::absolute(path)
        .map_err(|e| BuildError::io_error("resolving command line path", Some(path), e))
}
