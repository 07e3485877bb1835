//! Request-level aggregation over the identifier list.
//!
//! Quote slots are fetched concurrently and joined in input order. A slot
//! that errors or panics becomes an [`UnavailableQuote`]; its siblings are
//! unaffected and the batch always has one entry per identifier.

use std::panic::AssertUnwindSafe;

use futures::future::join_all;
use futures::FutureExt;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, error, warn};

use crate::domain::{resolve, Identifier, NewsReport, StockBatch, StockEntry, UnavailableQuote};
use crate::fetch::{NewsFetcher, QuoteFetcher};
use crate::normalize::{normalize, normalize_news};

#[derive(Clone)]
pub struct StockAggregator {
    fetcher: QuoteFetcher,
}

impl StockAggregator {
    pub fn new(fetcher: QuoteFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn collect(&self, identifiers: &[Identifier]) -> StockBatch {
        let slots = identifiers.iter().map(|identifier| async move {
            let outcome: std::thread::Result<StockEntry> = AssertUnwindSafe(self.entry(identifier))
                .catch_unwind()
                .await;
            outcome.unwrap_or_else(|_| {
                error!(code = %identifier.code, "quote slot panicked");
                StockEntry::Unavailable(UnavailableQuote::for_identifier(identifier))
            })
        });

        let data = join_all(slots).await;
        debug!(
            total = data.len(),
            unavailable = data.iter().filter(|entry| entry.is_unavailable()).count(),
            "quote batch collected"
        );
        StockBatch { data }
    }

    async fn entry(&self, identifier: &Identifier) -> StockEntry {
        match self.fetcher.fetch_one(&identifier.code).await {
            Ok(raw) => StockEntry::Quote(Box::new(normalize(identifier, &raw))),
            Err(error) => {
                warn!(code = %identifier.code, error = %error, "quote slot unavailable");
                StockEntry::Unavailable(UnavailableQuote::for_identifier(identifier))
            }
        }
    }
}

/// Outcome of a news lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsLookup {
    Found(NewsReport),
    /// Carries the requested symbol, uppercased.
    NotFound(String),
}

#[derive(Clone)]
pub struct NewsAggregator {
    fetcher: NewsFetcher,
}

impl NewsAggregator {
    pub fn new(fetcher: NewsFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn report(&self, identifiers: &[Identifier], symbol: &str) -> NewsLookup {
        let Some(identifier) = resolve(identifiers, symbol) else {
            return NewsLookup::NotFound(symbol.trim().to_uppercase());
        };

        let fetched_at = now_rfc3339();
        let news = self
            .fetcher
            .fetch_news(&identifier.code)
            .await
            .into_iter()
            .map(|item| normalize_news(item, &fetched_at))
            .collect();

        NewsLookup::Found(NewsReport {
            code: identifier.code.clone(),
            name: identifier.name.clone(),
            news,
        })
    }
}

fn now_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339).unwrap_or_else(|_| now.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{
        FeedProvider, ProviderError, ProviderFuture, QuoteProvider, RawNewsItem,
    };
    use crate::MarketSymbol;
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct PanickyQuotes;

    impl QuoteProvider for PanickyQuotes {
        fn quote<'a>(&'a self, symbol: &'a MarketSymbol) -> ProviderFuture<'a, Value> {
            if symbol.as_str() == "BOOM.JK" {
                panic!("provider exploded");
            }
            Box::pin(async { Ok(json!({ "regularMarketPrice": 1 })) })
        }

        fn quote_summary<'a>(
            &'a self,
            _symbol: &'a MarketSymbol,
            _modules: &'a [&'a str],
        ) -> ProviderFuture<'a, Value> {
            Box::pin(async { Err(ProviderError::unavailable("no summary")) })
        }
    }

    struct OneHeadline;

    impl FeedProvider for OneHeadline {
        fn headlines<'a>(
            &'a self,
            _symbol: &'a MarketSymbol,
        ) -> ProviderFuture<'a, Vec<RawNewsItem>> {
            Box::pin(async {
                Ok(vec![RawNewsItem {
                    title: Some(String::from("Laba naik")),
                    ..RawNewsItem::default()
                }])
            })
        }
    }

    #[tokio::test]
    async fn panicking_slot_becomes_placeholder() {
        let aggregator = StockAggregator::new(QuoteFetcher::new(Arc::new(PanickyQuotes)));
        let identifiers = vec![
            Identifier::new("BBCA", "Bank Central Asia"),
            Identifier::new("BOOM", "Exploding Tbk"),
            Identifier::new("TLKM", "Telkom Indonesia"),
        ];

        let batch = aggregator.collect(&identifiers).await;

        assert_eq!(batch.data.len(), 3);
        assert_eq!(batch.data[0].as_quote().map(|q| q.price), Some(1.0));
        assert_eq!(
            batch.data[1],
            StockEntry::Unavailable(UnavailableQuote::for_identifier(&identifiers[1]))
        );
        assert_eq!(batch.data[2].code(), "TLKM");
        assert!(!batch.data[2].is_unavailable());
    }

    #[tokio::test]
    async fn empty_list_yields_empty_batch() {
        let aggregator = StockAggregator::new(QuoteFetcher::new(Arc::new(PanickyQuotes)));
        assert!(aggregator.collect(&[]).await.data.is_empty());
    }

    #[tokio::test]
    async fn unknown_symbol_reports_uppercased() {
        let aggregator = NewsAggregator::new(NewsFetcher::new(Arc::new(OneHeadline)));
        let identifiers = vec![Identifier::new("BBCA", "Bank Central Asia")];

        assert_eq!(
            aggregator.report(&identifiers, "xyz").await,
            NewsLookup::NotFound(String::from("XYZ"))
        );
    }

    #[tokio::test]
    async fn found_symbol_uses_canonical_identifier() {
        let aggregator = NewsAggregator::new(NewsFetcher::new(Arc::new(OneHeadline)));
        let identifiers = vec![Identifier::new("BBCA", "Bank Central Asia")];

        let NewsLookup::Found(report) = aggregator.report(&identifiers, "bbca").await else {
            panic!("expected a report");
        };
        assert_eq!(report.code, "BBCA");
        assert_eq!(report.name, "Bank Central Asia");
        assert_eq!(report.news.len(), 1);
        assert_eq!(report.news[0].title, "Laba naik");
        assert!(OffsetDateTime::parse(&report.news[0].date, &Rfc3339).is_ok());
    }
}
