use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter, used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

/// Set up the global tracing subscriber.
///
/// Events of the `log` crate are forwarded to `tracing`. The filter is taken from the `RUST_LOG`
/// environment variable, falling back to [`DEFAULT_FILTER`]. Calling this more than once is not
/// an error, the first subscriber stays active.
pub fn init_tracing(name: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();

    match result {
        Ok(()) => tracing::debug!(name, "Tracing initialized"),
        Err(err) => log::debug!("Tracing subscriber already set: {err}"),
    }
}
