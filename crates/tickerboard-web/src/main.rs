use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tickerboard_core::ReqwestHttpClient;
use tickerboard_web::{logging, router, Config, ServerError};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let config = Config::parse();

    if let Err(error) = logging::init(config.log_json) {
        eprintln!("error: {error}");
        return ExitCode::from(error.exit_code());
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(error = %error, "tickerboard stopped");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(config: Config) -> Result<(), ServerError> {
    let state = Arc::new(config.app_state(Arc::new(ReqwestHttpClient::new())));

    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind,
            source,
        })?;

    info!(
        addr = %config.bind,
        identifiers = %config.identifiers.display(),
        suffix = %config.market_suffix,
        "tickerboard listening"
    );

    axum::serve(listener, router(state))
        .await
        .map_err(ServerError::Serve)
}
