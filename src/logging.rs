use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging based on verbosity level
pub fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("scraper_build=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("scraper_build=info,warn,error"))
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if verbose {
        tracing::info!("Verbose logging enabled");
    }

    Ok(())
}

/// Log the start of a pipeline step
pub fn log_step_started(step: &str) {
    tracing::info!(step = step, "Step started");
}

/// Log how a pipeline step ended
pub fn log_step_finished(step: &str, outcome: &str) {
    tracing::info!(step = step, outcome = outcome, "Step finished");
}

/// Log a non-fatal step failure
pub fn log_step_warning(step: &str, reason: &str) {
    tracing::warn!(step = step, reason = reason, "Step failed, continuing");
}

/// Log dependency check operations
pub fn log_dependency_check(dependency: &str, status: &str) {
    tracing::info!(
        dependency = dependency,
        status = status,
        "Dependency check completed"
    );
}

/// Log system information for debugging
pub fn log_system_info() {
    tracing::debug!(
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        "System information"
    );
}

/// Log performance metrics
pub fn log_performance(operation: &str, duration_ms: u64) {
    tracing::debug!(
        operation = operation,
        duration_ms = duration_ms,
        "Operation performance"
    );
}
