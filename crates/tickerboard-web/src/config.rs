//! Server configuration.
//!
//! Every option is a flag and an environment variable; flags win.
//!
//! | Option | Env | Default |
//! |--------|-----|---------|
//! | `--bind` | `TICKERBOARD_BIND` | `0.0.0.0:3000` |
//! | `--identifiers` | `TICKERBOARD_IDENTIFIERS` | `data/saham.json` |
//! | `--identifier-ttl-secs` | `TICKERBOARD_IDENTIFIER_TTL_SECS` | `300` |
//! | `--market-suffix` | `TICKERBOARD_MARKET_SUFFIX` | `.JK` |
//! | `--feed-region` | `TICKERBOARD_FEED_REGION` | `ID` |
//! | `--feed-lang` | `TICKERBOARD_FEED_LANG` | `id-ID` |
//! | `--upstream-timeout-ms` | `TICKERBOARD_UPSTREAM_TIMEOUT_MS` | `10000` |
//! | `--news-limit` | `TICKERBOARD_NEWS_LIMIT` | `10` |
//! | `--log-json` | `TICKERBOARD_LOG_JSON` | off |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tickerboard_core::{
    HttpClient, IdentifierSource, JsonFileLoader, NewsAggregator, NewsFetcher, QuoteFetcher,
    StockAggregator, YahooFeedAdapter, YahooFinanceAdapter,
};

use crate::AppState;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "tickerboard",
    version,
    about = "Quote and headline API for the stock dashboard"
)]
pub struct Config {
    /// Socket address to listen on.
    #[arg(long, env = "TICKERBOARD_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// JSON file holding `{ "data": [{ "kode", "nama" }] }`.
    #[arg(long, env = "TICKERBOARD_IDENTIFIERS", default_value = "data/saham.json")]
    pub identifiers: PathBuf,

    /// How long a loaded identifier list is served before reloading.
    #[arg(long, env = "TICKERBOARD_IDENTIFIER_TTL_SECS", default_value_t = 300)]
    pub identifier_ttl_secs: u64,

    /// Suffix appended to bare codes to form provider symbols.
    #[arg(long, env = "TICKERBOARD_MARKET_SUFFIX", default_value = ".JK")]
    pub market_suffix: String,

    #[arg(long, env = "TICKERBOARD_FEED_REGION", default_value = "ID")]
    pub feed_region: String,

    #[arg(long, env = "TICKERBOARD_FEED_LANG", default_value = "id-ID")]
    pub feed_lang: String,

    /// Per-request timeout for upstream calls.
    #[arg(long, env = "TICKERBOARD_UPSTREAM_TIMEOUT_MS", default_value_t = 10_000)]
    pub upstream_timeout_ms: u64,

    /// Maximum headlines per news report.
    #[arg(long, env = "TICKERBOARD_NEWS_LIMIT", default_value_t = 10)]
    pub news_limit: usize,

    /// Emit logs as JSON lines.
    #[arg(long, env = "TICKERBOARD_LOG_JSON")]
    pub log_json: bool,
}

impl Config {
    /// Wire adapters, fetchers and the identifier source over `http_client`.
    pub fn app_state(&self, http_client: Arc<dyn HttpClient>) -> AppState {
        let quotes = YahooFinanceAdapter::new(Arc::clone(&http_client))
            .with_timeout_ms(self.upstream_timeout_ms);
        let feed = YahooFeedAdapter::new(http_client)
            .with_locale(&self.feed_region, &self.feed_lang)
            .with_timeout_ms(self.upstream_timeout_ms);

        let identifiers = IdentifierSource::new(Arc::new(JsonFileLoader::new(&self.identifiers)))
            .with_ttl(Duration::from_secs(self.identifier_ttl_secs));
        let stocks = StockAggregator::new(
            QuoteFetcher::new(Arc::new(quotes)).with_suffix(&self.market_suffix),
        );
        let news = NewsAggregator::new(
            NewsFetcher::new(Arc::new(feed))
                .with_suffix(&self.market_suffix)
                .with_limit(self.news_limit),
        );

        AppState::new(identifiers, stocks, news)
    }
}
