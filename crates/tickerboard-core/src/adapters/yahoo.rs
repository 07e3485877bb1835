use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::http_client::{HttpClient, HttpRequest, HttpResponse, DEFAULT_TIMEOUT_MS};
use crate::provider::{ProviderError, ProviderFuture, QuoteProvider};
use crate::MarketSymbol;

const QUOTE_ENDPOINT: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const SUMMARY_ENDPOINT: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const COOKIE_ENDPOINT: &str = "https://fc.yahoo.com";
const CRUMB_ENDPOINTS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const REFERER: &str = "https://finance.yahoo.com/";

// ============================================================================
// Yahoo session - cookie/crumb handling
// ============================================================================

#[derive(Debug, Clone)]
struct Crumb {
    value: String,
    fetched_at: Instant,
}

/// Yahoo cookie/crumb session.
///
/// Yahoo's quote endpoints need the session cookie from `fc.yahoo.com` (kept
/// by the transport's cookie store) plus a crumb token passed as a query
/// parameter. The crumb is cached for `ttl` and refreshed under the lock, so
/// concurrent callers share one refresh.
#[derive(Debug)]
pub struct YahooSession {
    crumb: Mutex<Option<Crumb>>,
    ttl: Duration,
}

impl Default for YahooSession {
    fn default() -> Self {
        Self::new(Duration::from_secs(3600))
    }
}

impl YahooSession {
    pub fn new(ttl: Duration) -> Self {
        Self {
            crumb: Mutex::new(None),
            ttl,
        }
    }

    /// Current crumb, fetching a fresh one when none is cached or it expired.
    pub async fn crumb(
        &self,
        http_client: &dyn HttpClient,
        timeout_ms: u64,
    ) -> Result<String, ProviderError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            if crumb.fetched_at.elapsed() < self.ttl {
                return Ok(crumb.value.clone());
            }
        }

        let value = fetch_crumb(http_client, timeout_ms).await?;
        *cached = Some(Crumb {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }

    /// Drop the cached crumb; the next call fetches a new one.
    pub async fn invalidate(&self) {
        *self.crumb.lock().await = None;
    }
}

async fn fetch_crumb(http_client: &dyn HttpClient, timeout_ms: u64) -> Result<String, ProviderError> {
    let cookie_request = HttpRequest::get(COOKIE_ENDPOINT)
        .with_header("referer", REFERER)
        .with_timeout_ms(timeout_ms);
    http_client.execute(cookie_request).await.map_err(|e| {
        ProviderError::unavailable(format!("failed to fetch Yahoo cookie: {}", e.message()))
    })?;

    for endpoint in CRUMB_ENDPOINTS {
        let request = HttpRequest::get(endpoint)
            .with_header("referer", REFERER)
            .with_timeout_ms(timeout_ms);

        match http_client.execute(request).await {
            Ok(response) if response.is_success() => {
                let body = response.body.trim();
                if body.contains("<html") || body.contains("<!DOCTYPE") {
                    continue;
                }
                if body.to_ascii_lowercase().contains("too many requests") {
                    return Err(ProviderError::unavailable(
                        "Yahoo rate limited while fetching crumb",
                    ));
                }
                if !body.is_empty() && body.len() < 100 && !body.contains(' ') {
                    return Ok(body.to_string());
                }
            }
            Ok(response) => {
                debug!(endpoint, status = response.status, "crumb endpoint rejected request");
            }
            Err(error) => {
                debug!(endpoint, error = %error, "crumb endpoint unreachable");
            }
        }
    }

    Err(ProviderError::unavailable(
        "failed to fetch Yahoo crumb from all endpoints",
    ))
}

// ============================================================================
// Yahoo Finance adapter
// ============================================================================

/// Quote and quote-summary lookups against Yahoo Finance's JSON API.
#[derive(Clone)]
pub struct YahooFinanceAdapter {
    http_client: Arc<dyn HttpClient>,
    session: Arc<YahooSession>,
    timeout_ms: u64,
}

impl YahooFinanceAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            session: Arc::new(YahooSession::default()),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_session(mut self, session: Arc<YahooSession>) -> Self {
        self.session = session;
        self
    }

    async fn send(&self, url: &str) -> Result<HttpResponse, ProviderError> {
        let request = HttpRequest::get(url)
            .with_header("referer", REFERER)
            .with_timeout_ms(self.timeout_ms);

        self.http_client.execute(request).await.map_err(|e| {
            ProviderError::unavailable(format!("yahoo transport error: {}", e.message()))
        })
    }

    /// GET a crumb-authenticated endpoint, refreshing the crumb once when
    /// Yahoo rejects it.
    async fn fetch_authenticated(
        &self,
        build_url: impl Fn(&str) -> String,
    ) -> Result<String, ProviderError> {
        let crumb = self
            .session
            .crumb(self.http_client.as_ref(), self.timeout_ms)
            .await?;
        let mut response = self.send(&build_url(&crumb)).await?;

        if response.status == 401 || response.status == 403 {
            self.session.invalidate().await;
            let crumb = self
                .session
                .crumb(self.http_client.as_ref(), self.timeout_ms)
                .await?;
            response = self.send(&build_url(&crumb)).await?;
        }

        match response.status {
            200..=299 => Ok(response.body),
            404 => Err(ProviderError::not_found("yahoo returned status 404")),
            status => Err(ProviderError::unavailable(format!(
                "yahoo returned status {status}"
            ))),
        }
    }
}

impl QuoteProvider for YahooFinanceAdapter {
    fn quote<'a>(&'a self, symbol: &'a MarketSymbol) -> ProviderFuture<'a, Value> {
        Box::pin(async move {
            let body = self
                .fetch_authenticated(|crumb| {
                    format!(
                        "{QUOTE_ENDPOINT}?symbols={}&crumb={}",
                        urlencoding::encode(symbol.as_str()),
                        urlencoding::encode(crumb)
                    )
                })
                .await?;

            parse_quote_response(&body, symbol)
        })
    }

    fn quote_summary<'a>(
        &'a self,
        symbol: &'a MarketSymbol,
        modules: &'a [&'a str],
    ) -> ProviderFuture<'a, Value> {
        Box::pin(async move {
            let modules = modules.join(",");
            let body = self
                .fetch_authenticated(|crumb| {
                    format!(
                        "{SUMMARY_ENDPOINT}/{}?modules={}&crumb={}",
                        urlencoding::encode(symbol.as_str()),
                        urlencoding::encode(&modules),
                        urlencoding::encode(crumb)
                    )
                })
                .await?;

            parse_summary_response(&body, symbol)
        })
    }
}

fn parse_quote_response(body: &str, symbol: &MarketSymbol) -> Result<Value, ProviderError> {
    let response: YahooQuoteResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::internal(format!("failed to parse yahoo quote: {e}")))?;

    if let Some(error) = response.quote_response.error.filter(|e| !e.is_null()) {
        return Err(ProviderError::unavailable(format!("yahoo quote API error: {error}")));
    }

    response
        .quote_response
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::not_found(format!("yahoo has no quote for {symbol}")))
}

fn parse_summary_response(body: &str, symbol: &MarketSymbol) -> Result<Value, ProviderError> {
    let response: YahooQuoteSummaryResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::internal(format!("failed to parse yahoo summary: {e}")))?;

    if let Some(error) = response.quote_summary.error.filter(|e| !e.is_null()) {
        return Err(ProviderError::unavailable(format!("yahoo summary API error: {error}")));
    }

    response
        .quote_summary
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::not_found(format!("yahoo has no summary for {symbol}")))
}

#[derive(Debug, Deserialize)]
struct YahooQuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: YahooResultEnvelope,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: YahooResultEnvelope,
}

#[derive(Debug, Deserialize)]
struct YahooResultEnvelope {
    #[serde(default)]
    result: Option<Vec<Value>>,
    #[serde(default)]
    error: Option<Value>,
}
