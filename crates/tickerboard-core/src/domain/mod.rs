//! # Domain Models
//!
//! Wire-level types served by the dashboard API.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Identifier`] | Ticker code and display name from the static list |
//! | [`MarketSymbol`] | Provider symbol (code + market suffix) |
//! | [`QuoteRecord`] | Fully defaulted quote/profile row |
//! | [`StockEntry`] | Record or placeholder slot in the quote aggregate |
//! | [`NewsItem`] | Normalized feed headline |
//! | [`NewsReport`] | Headlines for one identifier |
//!
//! Records are built fresh on every request. Serialization uses the
//! dashboard's wire names (`kode`, `nama`, camelCase market fields).

mod identifier;
mod records;
mod symbol;

pub use identifier::{resolve, Identifier};
pub use records::{
    Headcount, NewsItem, NewsReport, QuoteRecord, StockBatch, StockEntry, UnavailableQuote,
    DEFAULT_NEWS_LINK, DEFAULT_NEWS_TITLE, MISSING_TEXT, UNAVAILABLE_MESSAGE,
};
pub use symbol::MarketSymbol;
