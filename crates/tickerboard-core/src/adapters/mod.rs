//! Upstream adapters for Yahoo Finance.

pub mod yahoo;
pub mod yahoo_feed;

pub use yahoo::{YahooFinanceAdapter, YahooSession};
pub use yahoo_feed::{YahooFeedAdapter, DEFAULT_FEED_LANG, DEFAULT_FEED_REGION};
