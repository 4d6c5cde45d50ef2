//! Tracing initialisation for the command-line tool.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "CLASS_TRANSITIONS_LOG";

static INIT: Once = Once::new();

/// Filter directive used when [`LOG_ENV`] is unset, by `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "class_transitions=warn",
        1 => "class_transitions=info",
        2 => "class_transitions=debug",
        _ => "class_transitions=trace",
    }
}

/// Install a stderr subscriber. Later calls are no-ops.
///
/// [`LOG_ENV`] takes precedence over `verbosity`.
pub fn init_tracing(verbosity: u8) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_raises_level() {
        assert_eq!(default_directive(0), "class_transitions=warn");
        assert_eq!(default_directive(2), "class_transitions=debug");
        assert_eq!(default_directive(9), "class_transitions=trace");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_tracing(0);
        init_tracing(3);
    }
}
