use serde::{Serialize, Serializer};

use super::Identifier;

/// Placeholder text for string fields the provider did not supply.
pub const MISSING_TEXT: &str = "-";

/// Error text carried by a quote slot that could not be produced.
pub const UNAVAILABLE_MESSAGE: &str = "Data tidak tersedia";

pub const DEFAULT_NEWS_TITLE: &str = "Tidak ada judul";
pub const DEFAULT_NEWS_LINK: &str = "#";

/// Full-time employee count; serialized as a number, or `"-"` when unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Headcount {
    Count(u64),
    #[default]
    Unknown,
}

impl Serialize for Headcount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Count(count) => serializer.serialize_u64(*count),
            Self::Unknown => serializer.serialize_str(MISSING_TEXT),
        }
    }
}

/// One fully populated row of the stock table.
///
/// Every field is always present; [`QuoteRecord::empty`] carries the
/// documented defaults and the normalizer overwrites whatever the provider
/// actually returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    #[serde(rename = "kode")]
    pub code: String,
    #[serde(rename = "nama")]
    pub name: String,

    pub description: String,
    pub sector: String,
    pub industry: String,
    pub full_time_employees: Headcount,
    pub website: String,

    pub price: f64,
    pub change: f64,
    pub percent: f64,
    pub volume: f64,
    pub currency: String,
    pub market_state: String,
    pub previous_close: f64,
    pub open: f64,
    pub day_high: f64,
    pub day_low: f64,

    pub fifty_two_week_high: f64,
    pub fifty_two_week_low: f64,

    pub market_cap: f64,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: f64,
    #[serde(rename = "forwardPE")]
    pub forward_pe: f64,
    pub eps_trailing_twelve_months: f64,
    pub eps_forward: f64,
    pub beta: f64,
    pub dividend_rate: f64,
    pub dividend_yield: f64,

    pub target_high_price: f64,
    pub target_low_price: f64,
    pub recommendation_mean: f64,
    pub revenue_per_share: f64,
    pub gross_profits: f64,
    pub profit_margins: f64,

    pub shares_outstanding: f64,
    pub book_value: f64,
}

impl QuoteRecord {
    /// A record for `identifier` with every market field at its default.
    pub fn empty(identifier: &Identifier) -> Self {
        let text = || String::from(MISSING_TEXT);
        Self {
            code: identifier.code.clone(),
            name: identifier.name.clone(),
            description: text(),
            sector: text(),
            industry: text(),
            full_time_employees: Headcount::Unknown,
            website: text(),
            price: 0.0,
            change: 0.0,
            percent: 0.0,
            volume: 0.0,
            currency: text(),
            market_state: text(),
            previous_close: 0.0,
            open: 0.0,
            day_high: 0.0,
            day_low: 0.0,
            fifty_two_week_high: 0.0,
            fifty_two_week_low: 0.0,
            market_cap: 0.0,
            trailing_pe: 0.0,
            forward_pe: 0.0,
            eps_trailing_twelve_months: 0.0,
            eps_forward: 0.0,
            beta: 0.0,
            dividend_rate: 0.0,
            dividend_yield: 0.0,
            target_high_price: 0.0,
            target_low_price: 0.0,
            recommendation_mean: 0.0,
            revenue_per_share: 0.0,
            gross_profits: 0.0,
            profit_margins: 0.0,
            shares_outstanding: 0.0,
            book_value: 0.0,
        }
    }
}

/// Slot emitted in place of a record when an identifier could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnavailableQuote {
    #[serde(rename = "kode")]
    pub code: String,
    #[serde(rename = "nama")]
    pub name: String,
    pub error: String,
}

impl UnavailableQuote {
    pub fn for_identifier(identifier: &Identifier) -> Self {
        Self {
            code: identifier.code.clone(),
            name: identifier.name.clone(),
            error: String::from(UNAVAILABLE_MESSAGE),
        }
    }
}

/// One output slot of the quote aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StockEntry {
    Quote(Box<QuoteRecord>),
    Unavailable(UnavailableQuote),
}

impl StockEntry {
    pub fn code(&self) -> &str {
        match self {
            Self::Quote(record) => &record.code,
            Self::Unavailable(placeholder) => &placeholder.code,
        }
    }

    pub fn as_quote(&self) -> Option<&QuoteRecord> {
        match self {
            Self::Quote(record) => Some(record),
            Self::Unavailable(_) => None,
        }
    }

    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Body of `GET /api/stock`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockBatch {
    pub data: Vec<StockEntry>,
}

/// A normalized headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub date: String,
    pub summary: String,
}

/// Body of `GET /api/news/{symbol}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsReport {
    #[serde(rename = "kode")]
    pub code: String,
    #[serde(rename = "nama")]
    pub name: String,
    pub news: Vec<NewsItem>,
}
