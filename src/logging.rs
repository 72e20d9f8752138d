//! Tracing setup for host applications.
//!
//! The engine itself only emits `tracing` events; hosts call [`init`]
//! once at startup to get an env-filtered subscriber with an optional
//! rolling file sink (stderr would corrupt a TUI host, so file logging
//! is the default sink when a directory is given).

use color_eyre::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Returns the appender guard when file
/// logging is enabled; the host must keep it alive for the process
/// lifetime or buffered lines are lost.
pub fn init(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

  match log_dir {
    Some(dir) => {
      let appender = tracing_appender::rolling::daily(dir, "larder.log");
      let (writer, guard) = tracing_appender::non_blocking(appender);
      fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
      Ok(Some(guard))
    }
    None => {
      fmt().with_env_filter(filter).init();
      Ok(None)
    }
  }
}
