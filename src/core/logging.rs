//! Process-wide logging setup
//!
//! Called once at the top of each entry point. Events go to stderr so they
//! never mix with command output on stdout.

use std::io::Write;

use tracing_subscriber::EnvFilter;

/// Flushes stderr when the entry point finishes
#[must_use = "logging output is flushed when the guard is dropped"]
pub struct LogGuard {
    _private: (),
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the global subscriber
///
/// `GEOIPS_LOG` takes precedence over `default_level`. A second call (tests,
/// embedding) leaves the first subscriber in place.
pub fn init(default_level: &str) -> LogGuard {
    let filter = EnvFilter::try_from_env("GEOIPS_LOG")
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(crate::core::config::DEFAULT_LOG_LEVEL));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(%default_level, "logging initialised");
    }

    LogGuard { _private: () }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        let first = init("warn");
        let second = init("not a valid directive ===");
        drop(second);
        drop(first);
    }
}
