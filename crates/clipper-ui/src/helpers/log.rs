// crates/clipper-ui/src/helpers/log.rs
//
// Logging setup for the whole process.
//
// In release builds with `windows_subsystem = "windows"` (double-click launch),
// there is no console attached, so stderr output is silently discarded.
// Every event is therefore written twice: to stderr for terminal launches and
// to an append-only file in the OS temp directory for everything else.
//
// File: %TEMP%\clipper.log (or $TMPDIR/clipper.log)
//
// Filter comes from RUST_LOG, defaulting to `info`:
//   RUST_LOG=debug clipper          per-line ffmpeg output, dropped frames
//   RUST_LOG=clipper_media=debug    media crate only

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_FILE: &str = "clipper.log";

/// Install the global subscriber. Keep the returned guard alive for the life
/// of `main`; dropping it flushes and stops the file writer.
pub fn init_logging() -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file = tracing_appender::rolling::never(std::env::temp_dir(), LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init();

    if let Err(e) = result {
        // Already installed (e.g. by a test harness); keep going with that one.
        eprintln!("[log] subscriber not installed: {e}");
    }
    guard
}
