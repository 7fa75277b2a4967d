//! Process logging: console output plus a fixed log file.

use std::{fs::File, io, path::Path, sync::Arc};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber for the process: an env-filtered
/// console layer (default `info`) and an ANSI-free layer appending to
/// `path`.
///
/// Called exactly once from `main`; library code only emits events and
/// never configures logging itself.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init(path: &Path) -> io::Result<()> {
    let file = File::options().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
        .init();
    Ok(())
}
