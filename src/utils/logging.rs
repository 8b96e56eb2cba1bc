// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

// HTTP stack internals stay at warn unless RUST_LOG asks for more
const QUIET_DEPENDENCIES: &str = "hyper=warn,hyper_util=warn,reqwest=warn,html5ever=warn";

/// Filter used when `RUST_LOG` is unset: `info`, or `debug`/`trace` with `-v`/`-vv`.
fn default_directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    format!("{},{}", level, QUIET_DEPENDENCIES)
}

/// Sets up the logging framework using tracing_subscriber.
/// `RUST_LOG` wins over the verbosity flag when it is set.
///
/// Logs go to stderr so `--print-json` output on stdout stays clean.
pub fn setup_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Logging setup complete.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert!(default_directives(0).starts_with("info,"));
        assert!(default_directives(1).starts_with("debug,"));
        assert!(default_directives(5).starts_with("trace,"));
        assert!(EnvFilter::try_new(default_directives(2)).is_ok());
    }
}
