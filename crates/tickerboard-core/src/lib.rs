//! # Tickerboard Core
//!
//! Quote and headline aggregation for an Indonesian stock dashboard.
//!
//! ## Overview
//!
//! - **Identifier source** with a timed in-memory cache
//! - **Yahoo Finance adapters** for quotes, quote summaries and RSS headlines
//! - **Normalizer** that turns any provider payload into a fully defaulted record
//! - **Aggregators** that fan out per identifier and fail soft per slot
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Yahoo quote/summary and RSS feed adapters |
//! | [`aggregate`] | Quote batch and news report assembly |
//! | [`domain`] | Wire types (QuoteRecord, NewsItem, Identifier) |
//! | [`error`] | Core error types |
//! | [`fetch`] | Per-identifier upstream fetches |
//! | [`http_client`] | HTTP client abstraction |
//! | [`identifiers`] | Identifier loaders and cache |
//! | [`normalize`] | Raw payload to record mapping |
//! | [`provider`] | Provider traits and raw payload types |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Web routes     │────▶│ IdentifierSource │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Aggregators    │────▶│ Normalizer       │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Fetchers        │────▶│ Provider adapters│
//! └─────────────────┘     └────────┬─────────┘
//!                                  ▼
//!                         ┌──────────────────┐
//!                         │ HTTP client      │
//!                         └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickerboard_core::{
//!     Identifier, QuoteFetcher, ReqwestHttpClient, StockAggregator, YahooFinanceAdapter,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let http = Arc::new(ReqwestHttpClient::new());
//!     let fetcher = QuoteFetcher::new(Arc::new(YahooFinanceAdapter::new(http)));
//!     let batch = StockAggregator::new(fetcher)
//!         .collect(&[Identifier::new("BBCA", "Bank Central Asia")])
//!         .await;
//!     println!("{}", serde_json::to_string_pretty(&batch).unwrap());
//! }
//! ```

pub mod adapters;
pub mod aggregate;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod http_client;
pub mod identifiers;
pub mod normalize;
pub mod provider;

// Adapter implementations
pub use adapters::{YahooFeedAdapter, YahooFinanceAdapter, YahooSession};

// Aggregation
pub use aggregate::{NewsAggregator, NewsLookup, StockAggregator};

// Domain models
pub use domain::{
    resolve, Headcount, Identifier, MarketSymbol, NewsItem, NewsReport, QuoteRecord, StockBatch,
    StockEntry, UnavailableQuote,
};

// Error types
pub use error::{ConfigError, ValidationError};

// Fetchers
pub use fetch::{NewsFetcher, QuoteFetcher, DEFAULT_MARKET_SUFFIX, DEFAULT_NEWS_LIMIT};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, ScriptedHttpClient,
};

// Identifier source
pub use identifiers::{
    is_fresh, Clock, IdentifierLoader, IdentifierSource, JsonFileLoader, ManualClock,
    StaticLoader, SystemClock, DEFAULT_IDENTIFIER_TTL,
};

// Normalization
pub use normalize::{normalize, normalize_news, SUMMARY_MODULES};

// Provider contracts
pub use provider::{
    FeedProvider, ProviderError, ProviderErrorKind, QuoteProvider, RawNewsItem, RawQuote,
};
