//! # Tickerboard Web
//!
//! axum router serving the dashboard API.
//!
//! | Route | Handler | Success |
//! |-------|---------|---------|
//! | `GET /api/stock` | [`routes::stock`] | `200 { data }`, one slot per identifier |
//! | `GET /api/news/{symbol}` | [`routes::news`] | `200 { kode, nama, news }` with `Cache-Control` |

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tickerboard_core::{IdentifierSource, NewsAggregator, StockAggregator};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::{ApiError, ServerError};

/// State shared by every request.
pub struct AppState {
    pub identifiers: IdentifierSource,
    pub stocks: StockAggregator,
    pub news: NewsAggregator,
}

impl AppState {
    pub fn new(
        identifiers: IdentifierSource,
        stocks: StockAggregator,
        news: NewsAggregator,
    ) -> Self {
        Self {
            identifiers,
            stocks,
            news,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/stock", get(routes::stock))
        .route("/api/news/:symbol", get(routes::news))
        .with_state(state)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
