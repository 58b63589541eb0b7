use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the file writer alive; drop it only at exit.
#[derive(Default)]
pub struct LogGuard {
    path: Option<PathBuf>,
    #[cfg(feature = "debug-log")]
    _worker: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Installs the global subscriber.
///
/// With the `debug-log` feature every event goes as JSON to
/// `studymate-debug.log`; `verbose` adds a human-readable stderr layer.
/// Returns `None` when nothing was installed.
pub fn init(verbose: bool) -> Option<LogGuard> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    #[allow(unused_mut)]
    let mut guard = LogGuard::default();

    #[cfg(feature = "debug-log")]
    if let Some((layer, worker, path)) = file_layer() {
        layers.push(layer);
        guard._worker = Some(worker);
        guard.path = Some(path);
    }

    if verbose {
        layers.push(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .boxed(),
        );
    }

    if layers.is_empty() {
        return None;
    }

    let default_directive = if guard.path.is_some() {
        "debug"
    } else {
        "studymate=debug"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    if tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .is_err()
    {
        eprintln!("Failed to set tracing subscriber");
        return None;
    }

    tracing::info!(file = ?guard.path, "Logging initialized");
    Some(guard)
}

#[cfg(feature = "debug-log")]
fn file_layer() -> Option<(
    BoxedLayer,
    tracing_appender::non_blocking::WorkerGuard,
    PathBuf,
)> {
    let path = PathBuf::from("studymate-debug.log");

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open log file: {e}");
            return None;
        }
    };

    let (writer, worker) = tracing_appender::non_blocking(file);
    let layer = fmt::layer()
        .json()
        .with_writer(writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .boxed();

    Some((layer, worker, path))
}
