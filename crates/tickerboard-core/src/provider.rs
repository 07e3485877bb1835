//! Upstream provider contracts.
//!
//! The fetchers talk to the outside world only through these traits, so an
//! adapter can be swapped for a scripted one in tests.
//!
//! | Trait | Operation | Returns |
//! |-------|-----------|---------|
//! | [`QuoteProvider`] | `quote` | raw quote object for one symbol |
//! | [`QuoteProvider`] | `quote_summary` | raw summary object with the requested modules |
//! | [`FeedProvider`] | `headlines` | raw feed items in feed order |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde_json::{Map, Value};

use crate::{MarketSymbol, ValidationError};

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Unavailable,
    NotFound,
    InvalidRequest,
    Internal,
}

/// Structured error returned by provider adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    kind: ProviderErrorKind,
    message: String,
}

impl ProviderError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ProviderErrorKind::Unavailable => "provider.unavailable",
            ProviderErrorKind::NotFound => "provider.not_found",
            ProviderErrorKind::InvalidRequest => "provider.invalid_request",
            ProviderErrorKind::Internal => "provider.internal",
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ProviderError {}

impl From<ValidationError> for ProviderError {
    fn from(error: ValidationError) -> Self {
        Self::invalid_request(error.to_string())
    }
}

/// Raw provider payload for one symbol: the quote object and the summary
/// object (keyed by module name). Either half may be an empty object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawQuote {
    pub quote: Value,
    pub summary: Value,
}

impl RawQuote {
    pub fn new(quote: Value, summary: Value) -> Self {
        Self { quote, summary }
    }

    pub fn empty() -> Self {
        Self::new(empty_object(), empty_object())
    }
}

/// Feed item as the provider delivered it; any field may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawNewsItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub pub_date: Option<String>,
    pub content_snippet: Option<String>,
}

pub(crate) fn empty_object() -> Value {
    Value::Object(Map::new())
}

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

/// Market-data provider exposing quote and quote-summary lookups.
pub trait QuoteProvider: Send + Sync {
    /// Instantaneous quote for `symbol`.
    fn quote<'a>(&'a self, symbol: &'a MarketSymbol) -> ProviderFuture<'a, Value>;

    /// Extended profile/financial summary restricted to `modules`.
    fn quote_summary<'a>(
        &'a self,
        symbol: &'a MarketSymbol,
        modules: &'a [&'a str],
    ) -> ProviderFuture<'a, Value>;
}

/// Syndication-feed provider returning recent headlines for a symbol.
pub trait FeedProvider: Send + Sync {
    fn headlines<'a>(&'a self, symbol: &'a MarketSymbol) -> ProviderFuture<'a, Vec<RawNewsItem>>;
}
