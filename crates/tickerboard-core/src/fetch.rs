//! Per-identifier upstream fetches.

use std::sync::Arc;

use tracing::debug;

use crate::normalize::SUMMARY_MODULES;
use crate::provider::{
    empty_object, FeedProvider, ProviderError, QuoteProvider, RawNewsItem, RawQuote,
};
use crate::MarketSymbol;

/// Market suffix appended to bare codes.
pub const DEFAULT_MARKET_SUFFIX: &str = ".JK";

/// Maximum number of headlines kept per report.
pub const DEFAULT_NEWS_LIMIT: usize = 10;

/// Fetches the quote and summary halves for one code.
#[derive(Clone)]
pub struct QuoteFetcher {
    provider: Arc<dyn QuoteProvider>,
    suffix: String,
}

impl QuoteFetcher {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            provider,
            suffix: String::from(DEFAULT_MARKET_SUFFIX),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Both upstream calls run concurrently. A failed half is replaced by an
    /// empty object; only a code that cannot form a symbol is an error.
    pub async fn fetch_one(&self, code: &str) -> Result<RawQuote, ProviderError> {
        let symbol = MarketSymbol::for_code(code, &self.suffix)?;

        let (quote, summary) = tokio::join!(
            self.provider.quote(&symbol),
            self.provider.quote_summary(&symbol, &SUMMARY_MODULES),
        );

        let quote = quote.unwrap_or_else(|error| {
            debug!(symbol = %symbol, error = %error, "quote lookup failed");
            empty_object()
        });
        let summary = summary.unwrap_or_else(|error| {
            debug!(symbol = %symbol, error = %error, "quote summary lookup failed");
            empty_object()
        });

        Ok(RawQuote::new(quote, summary))
    }
}

/// Fetches recent headlines for one code.
#[derive(Clone)]
pub struct NewsFetcher {
    provider: Arc<dyn FeedProvider>,
    suffix: String,
    limit: usize,
}

impl NewsFetcher {
    pub fn new(provider: Arc<dyn FeedProvider>) -> Self {
        Self {
            provider,
            suffix: String::from(DEFAULT_MARKET_SUFFIX),
            limit: DEFAULT_NEWS_LIMIT,
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// At most `limit` items in feed order. Any failure yields an empty list.
    pub async fn fetch_news(&self, code: &str) -> Vec<RawNewsItem> {
        let symbol = match MarketSymbol::for_code(code, &self.suffix) {
            Ok(symbol) => symbol,
            Err(error) => {
                debug!(code, error = %error, "cannot build feed symbol");
                return Vec::new();
            }
        };

        match self.provider.headlines(&symbol).await {
            Ok(items) => items.into_iter().take(self.limit).collect(),
            Err(error) => {
                debug!(symbol = %symbol, error = %error, "feed lookup failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderFuture;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingQuotes {
        symbols: Mutex<Vec<String>>,
        fail_summary: bool,
    }

    impl QuoteProvider for RecordingQuotes {
        fn quote<'a>(&'a self, symbol: &'a MarketSymbol) -> ProviderFuture<'a, Value> {
            self.symbols
                .lock()
                .expect("lock")
                .push(symbol.as_str().to_owned());
            Box::pin(async { Ok(json!({ "regularMarketPrice": 100 })) })
        }

        fn quote_summary<'a>(
            &'a self,
            _symbol: &'a MarketSymbol,
            modules: &'a [&'a str],
        ) -> ProviderFuture<'a, Value> {
            let fail = self.fail_summary;
            let module_count = modules.len();
            Box::pin(async move {
                if fail {
                    Err(ProviderError::unavailable("summary down"))
                } else {
                    Ok(json!({ "modules": module_count }))
                }
            })
        }
    }

    struct FixedFeed(Result<Vec<RawNewsItem>, ProviderError>);

    impl FeedProvider for FixedFeed {
        fn headlines<'a>(
            &'a self,
            _symbol: &'a MarketSymbol,
        ) -> ProviderFuture<'a, Vec<RawNewsItem>> {
            let outcome = self.0.clone();
            Box::pin(async move { outcome })
        }
    }

    fn titled(n: usize) -> RawNewsItem {
        RawNewsItem {
            title: Some(format!("headline {n}")),
            ..RawNewsItem::default()
        }
    }

    #[tokio::test]
    async fn appends_market_suffix_to_bare_codes() {
        let provider = Arc::new(RecordingQuotes::default());
        let fetcher = QuoteFetcher::new(provider.clone());

        fetcher.fetch_one("bbca").await.expect("fetch");
        fetcher.fetch_one("BRK.B").await.expect("fetch");

        assert_eq!(
            *provider.symbols.lock().expect("lock"),
            vec![String::from("BBCA.JK"), String::from("BRK.B")]
        );
    }

    #[tokio::test]
    async fn requests_all_summary_modules() {
        let fetcher = QuoteFetcher::new(Arc::new(RecordingQuotes::default()));
        let raw = fetcher.fetch_one("TLKM").await.expect("fetch");
        assert_eq!(raw.summary, json!({ "modules": 3 }));
    }

    #[tokio::test]
    async fn failed_summary_becomes_empty_object() {
        let provider = RecordingQuotes {
            fail_summary: true,
            ..RecordingQuotes::default()
        };
        let fetcher = QuoteFetcher::new(Arc::new(provider));

        let raw = fetcher.fetch_one("TLKM").await.expect("fetch");
        assert_eq!(raw.quote, json!({ "regularMarketPrice": 100 }));
        assert_eq!(raw.summary, json!({}));
    }

    #[tokio::test]
    async fn invalid_code_is_an_error() {
        let fetcher = QuoteFetcher::new(Arc::new(RecordingQuotes::default()));
        assert!(fetcher.fetch_one("   ").await.is_err());
        assert!(fetcher.fetch_one("BB CA").await.is_err());
    }

    #[tokio::test]
    async fn news_is_capped_in_feed_order() {
        let items = (0..15).map(titled).collect();
        let fetcher = NewsFetcher::new(Arc::new(FixedFeed(Ok(items))));

        let news = fetcher.fetch_news("BBCA").await;
        assert_eq!(news.len(), 10);
        assert_eq!(news[0].title.as_deref(), Some("headline 0"));
        assert_eq!(news[9].title.as_deref(), Some("headline 9"));
    }

    #[tokio::test]
    async fn feed_failure_yields_no_news() {
        let fetcher = NewsFetcher::new(Arc::new(FixedFeed(Err(ProviderError::unavailable(
            "feed down",
        )))));
        assert!(fetcher.fetch_news("BBCA").await.is_empty());
    }
}
