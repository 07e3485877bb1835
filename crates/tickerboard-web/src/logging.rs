//! Subscriber installation for the server binary.

use tracing_subscriber::EnvFilter;

use crate::error::ServerError;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str =
    "tickerboard=info,tickerboard_web=info,tickerboard_core=info,tower_http=info";

/// Install the global subscriber, human-readable or JSON lines.
pub fn init(json: bool) -> Result<(), ServerError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| ServerError::Logging(e.to_string()))
}
