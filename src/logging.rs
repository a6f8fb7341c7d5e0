//! Logging configuration.
//!
//! Logs go to stderr so they never mix with a program's own output. The
//! filter comes from `RUST_LOG` when set, otherwise it starts at `warn` and
//! can be raised to `debug` later, typically from a `--debug` switch.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "warn";
const DEBUG_FILTER: &str = "debug";

/// Handle for adjusting the filter after initialization.
#[derive(Clone, Default)]
pub struct LogHandle {
    filter: Option<reload::Handle<EnvFilter, Registry>>,
    from_env: bool,
}

impl LogHandle {
    /// Raises the filter to `debug` unless `RUST_LOG` chose one.
    pub fn enable_debug(&self) {
        if self.from_env {
            return;
        }
        let Some(filter) = &self.filter else {
            return;
        };
        if let Err(e) = filter.modify(|filter| *filter = EnvFilter::new(DEBUG_FILTER)) {
            eprintln!("Warning: Could not raise log level: {e}");
        }
    }
}

/// Initializes logging to stderr.
///
/// Safe to call more than once: later calls leave the first subscriber in
/// place and return a handle that does nothing.
pub fn init_stderr_logging() -> LogHandle {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(DEFAULT_FILTER), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();

    match installed {
        Ok(()) => LogHandle {
            filter: Some(handle),
            from_env,
        },
        Err(_) => LogHandle::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let _first = init_stderr_logging();
        let second = init_stderr_logging();
        assert!(second.filter.is_none());
        second.enable_debug();
    }

    #[test]
    fn test_default_handle_is_inert() {
        LogHandle::default().enable_debug();
    }
}
