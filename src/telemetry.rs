//! Diagnostic logging
//!
//! Controlled by the `GOT_LOG` environment variable, which takes an `EnvFilter`
//! directive such as `debug` or `got::areas=trace`:
//! - unset or empty: no subscriber is installed (events are dropped)
//! - anything else: human-readable events on stderr, so stdout stays scriptable

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "GOT_LOG";

pub fn init() {
    let directive = std::env::var(LOG_ENV).ok();

    match directive.as_deref() {
        None | Some("") => {}
        Some(directive) => init_stderr(directive),
    }
}

fn init_stderr(directive: &str) {
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));

    // a second init in the same process is harmless, ignore it
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init();
}
