//! Raw provider payload → fully defaulted records.
//!
//! Every market field is described once in [`TEXT_FIELDS`] or
//! [`NUMBER_FIELDS`]: where it lives in the raw payload and which record field
//! it fills. Anything absent, `null` or of the wrong JSON type leaves the
//! record default in place, so normalization cannot fail.

use serde_json::Value;

use crate::domain::{
    Headcount, Identifier, NewsItem, QuoteRecord, DEFAULT_NEWS_LINK, DEFAULT_NEWS_TITLE,
    MISSING_TEXT,
};
use crate::provider::{RawNewsItem, RawQuote};

/// Summary modules requested alongside the quote.
pub const SUMMARY_MODULES: [&str; 3] = ["assetProfile", "financialData", "defaultKeyStatistics"];

/// Where a field lives in a [`RawQuote`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Quote,
    AssetProfile,
    FinancialData,
    KeyStatistics,
}

impl Section {
    fn object(self, raw: &RawQuote) -> Option<&Value> {
        match self {
            Self::Quote => Some(&raw.quote),
            Self::AssetProfile => raw.summary.get("assetProfile"),
            Self::FinancialData => raw.summary.get("financialData"),
            Self::KeyStatistics => raw.summary.get("defaultKeyStatistics"),
        }
    }
}

pub struct TextField {
    pub section: Section,
    pub key: &'static str,
    apply: fn(&mut QuoteRecord, String),
}

pub struct NumberField {
    pub section: Section,
    pub key: &'static str,
    apply: fn(&mut QuoteRecord, f64),
}

/// String fields; default `"-"`.
#[rustfmt::skip]
pub const TEXT_FIELDS: &[TextField] = &[
    TextField { section: Section::AssetProfile, key: "longBusinessSummary", apply: |r, v| r.description = v },
    TextField { section: Section::AssetProfile, key: "sector", apply: |r, v| r.sector = v },
    TextField { section: Section::AssetProfile, key: "industry", apply: |r, v| r.industry = v },
    TextField { section: Section::AssetProfile, key: "website", apply: |r, v| r.website = v },
    TextField { section: Section::Quote, key: "currency", apply: |r, v| r.currency = v },
    TextField { section: Section::Quote, key: "marketState", apply: |r, v| r.market_state = v },
];

/// Numeric fields; default `0`.
#[rustfmt::skip]
pub const NUMBER_FIELDS: &[NumberField] = &[
    NumberField { section: Section::Quote, key: "regularMarketPrice", apply: |r, v| r.price = v },
    NumberField { section: Section::Quote, key: "regularMarketChange", apply: |r, v| r.change = v },
    NumberField { section: Section::Quote, key: "regularMarketChangePercent", apply: |r, v| r.percent = v },
    NumberField { section: Section::Quote, key: "regularMarketVolume", apply: |r, v| r.volume = v },
    NumberField { section: Section::Quote, key: "regularMarketPreviousClose", apply: |r, v| r.previous_close = v },
    NumberField { section: Section::Quote, key: "regularMarketOpen", apply: |r, v| r.open = v },
    NumberField { section: Section::Quote, key: "regularMarketDayHigh", apply: |r, v| r.day_high = v },
    NumberField { section: Section::Quote, key: "regularMarketDayLow", apply: |r, v| r.day_low = v },
    NumberField { section: Section::Quote, key: "fiftyTwoWeekHigh", apply: |r, v| r.fifty_two_week_high = v },
    NumberField { section: Section::Quote, key: "fiftyTwoWeekLow", apply: |r, v| r.fifty_two_week_low = v },
    NumberField { section: Section::Quote, key: "marketCap", apply: |r, v| r.market_cap = v },
    NumberField { section: Section::Quote, key: "trailingPE", apply: |r, v| r.trailing_pe = v },
    NumberField { section: Section::Quote, key: "forwardPE", apply: |r, v| r.forward_pe = v },
    NumberField { section: Section::Quote, key: "epsTrailingTwelveMonths", apply: |r, v| r.eps_trailing_twelve_months = v },
    NumberField { section: Section::Quote, key: "epsForward", apply: |r, v| r.eps_forward = v },
    NumberField { section: Section::Quote, key: "beta", apply: |r, v| r.beta = v },
    NumberField { section: Section::Quote, key: "dividendRate", apply: |r, v| r.dividend_rate = v },
    NumberField { section: Section::Quote, key: "dividendYield", apply: |r, v| r.dividend_yield = v },
    NumberField { section: Section::FinancialData, key: "targetHighPrice", apply: |r, v| r.target_high_price = v },
    NumberField { section: Section::FinancialData, key: "targetLowPrice", apply: |r, v| r.target_low_price = v },
    NumberField { section: Section::FinancialData, key: "recommendationMean", apply: |r, v| r.recommendation_mean = v },
    NumberField { section: Section::FinancialData, key: "revenuePerShare", apply: |r, v| r.revenue_per_share = v },
    NumberField { section: Section::FinancialData, key: "grossProfits", apply: |r, v| r.gross_profits = v },
    NumberField { section: Section::FinancialData, key: "profitMargins", apply: |r, v| r.profit_margins = v },
    NumberField { section: Section::KeyStatistics, key: "sharesOutstanding", apply: |r, v| r.shares_outstanding = v },
    NumberField { section: Section::KeyStatistics, key: "bookValue", apply: |r, v| r.book_value = v },
];

/// Build the record for `identifier` from whatever the provider returned.
pub fn normalize(identifier: &Identifier, raw: &RawQuote) -> QuoteRecord {
    let mut record = QuoteRecord::empty(identifier);

    for field in TEXT_FIELDS {
        if let Some(text) = field_value(raw, field.section, field.key).and_then(as_text) {
            (field.apply)(&mut record, text);
        }
    }

    for field in NUMBER_FIELDS {
        if let Some(number) = field_value(raw, field.section, field.key).and_then(as_number) {
            (field.apply)(&mut record, number);
        }
    }

    record.full_time_employees = field_value(raw, Section::AssetProfile, "fullTimeEmployees")
        .and_then(as_number)
        .filter(|count| *count >= 0.0)
        .map(|count| Headcount::Count(count as u64))
        .unwrap_or_default();

    record
}

/// Build a headline from a raw feed item. `fetched_at` stands in for a missing
/// publication date.
pub fn normalize_news(item: RawNewsItem, fetched_at: &str) -> NewsItem {
    NewsItem {
        title: text_or(item.title, DEFAULT_NEWS_TITLE),
        link: text_or(item.link, DEFAULT_NEWS_LINK),
        date: text_or(item.pub_date, fetched_at),
        summary: text_or(item.content_snippet, MISSING_TEXT),
    }
}

fn field_value<'a>(raw: &'a RawQuote, section: Section, key: &str) -> Option<&'a Value> {
    section.object(raw)?.get(key)
}

fn as_text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

/// Yahoo sends numbers either bare or wrapped as `{ "raw": n, "fmt": "..." }`.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::Object(wrapper) => wrapper.get("raw").and_then(Value::as_f64),
        _ => None,
    }
    .filter(|number| number.is_finite())
}

fn text_or(value: Option<String>, default: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(default)
        .to_owned()
}
