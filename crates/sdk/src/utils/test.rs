use std::env;

use tracing::subscriber::set_default;
use tracing_subscriber::EnvFilter;

/// Install a scoped fmt subscriber writing to the test output.
///
/// `RUST_LOG` takes precedence over `default_directives`.
pub(crate) fn setup_fmt_tracing(default_directives: &str) -> impl Drop {
    let filter = match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) => EnvFilter::new(default_directives),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .finish();
    set_default(subscriber)
}
