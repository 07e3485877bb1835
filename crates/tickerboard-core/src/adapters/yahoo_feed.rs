use std::sync::Arc;

use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::provider::{FeedProvider, ProviderError, ProviderFuture, RawNewsItem};
use crate::MarketSymbol;

const FEED_ENDPOINT: &str = "https://feeds.finance.yahoo.com/rss/2.0/headline";

pub const DEFAULT_FEED_REGION: &str = "ID";
pub const DEFAULT_FEED_LANG: &str = "id-ID";

/// Yahoo Finance RSS headline feed.
#[derive(Clone)]
pub struct YahooFeedAdapter {
    http_client: Arc<dyn HttpClient>,
    region: String,
    lang: String,
    timeout_ms: u64,
}

impl YahooFeedAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            region: String::from(DEFAULT_FEED_REGION),
            lang: String::from(DEFAULT_FEED_LANG),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_locale(mut self, region: impl Into<String>, lang: impl Into<String>) -> Self {
        self.region = region.into();
        self.lang = lang.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn feed_url(&self, symbol: &MarketSymbol) -> String {
        format!(
            "{FEED_ENDPOINT}?s={}&region={}&lang={}",
            urlencoding::encode(symbol.as_str()),
            urlencoding::encode(&self.region),
            urlencoding::encode(&self.lang)
        )
    }
}

impl FeedProvider for YahooFeedAdapter {
    fn headlines<'a>(&'a self, symbol: &'a MarketSymbol) -> ProviderFuture<'a, Vec<RawNewsItem>> {
        Box::pin(async move {
            let request = HttpRequest::get(self.feed_url(symbol)).with_timeout_ms(self.timeout_ms);
            let response = self.http_client.execute(request).await.map_err(|e| {
                ProviderError::unavailable(format!("feed transport error: {}", e.message()))
            })?;

            if !response.is_success() {
                return Err(ProviderError::unavailable(format!(
                    "feed returned status {}",
                    response.status
                )));
            }

            parse_feed(&response.body)
        })
    }
}

/// Parse an RSS 2.0 document into raw items, preserving feed order.
pub fn parse_feed(body: &str) -> Result<Vec<RawNewsItem>, ProviderError> {
    let channel = rss::Channel::read_from(body.as_bytes())
        .map_err(|e| ProviderError::internal(format!("failed to parse feed: {e}")))?;

    Ok(channel
        .items()
        .iter()
        .map(|item| RawNewsItem {
            title: item.title().map(str::to_owned),
            link: item.link().map(str::to_owned),
            pub_date: item.pub_date().map(str::to_owned),
            content_snippet: item.content().or(item.description()).map(content_snippet),
        })
        .collect())
}

/// Plain-text rendering of an item body: markup removed, entities decoded,
/// whitespace collapsed.
fn content_snippet(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    html_escape::decode_html_entities(&collapsed).into_owned()
}
