use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tickerboard_core::{NewsLookup, StockBatch};

use crate::error::ApiError;
use crate::AppState;

/// Cache policy advertised on successful news responses.
pub const NEWS_CACHE_CONTROL: &str = "public, s-maxage=300, stale-while-revalidate=600";

/// `GET /api/stock`
pub async fn stock(State(state): State<Arc<AppState>>) -> Result<Json<StockBatch>, ApiError> {
    let identifiers = state.identifiers.load().await?;
    Ok(Json(state.stocks.collect(&identifiers).await))
}

/// `GET /api/news/{symbol}`
pub async fn news(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Response, ApiError> {
    let identifiers = state.identifiers.load().await?;

    match state.news.report(&identifiers, &symbol).await {
        NewsLookup::Found(report) => {
            Ok(([(header::CACHE_CONTROL, NEWS_CACHE_CONTROL)], Json(report)).into_response())
        }
        NewsLookup::NotFound(symbol) => Err(ApiError::NotFound(symbol)),
    }
}
