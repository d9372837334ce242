//! Market data clients

pub mod quote_summary;
pub mod yahoo;

pub use quote_summary::QuoteSummaryClient;
pub use yahoo::YahooMarketData;

use crate::error::Result;
use crate::series::{FundamentalSnapshot, PriceSeries};
use async_trait::async_trait;

/// Market data source: symbol in, price history and fundamentals out
///
/// The pipeline depends on this trait rather than a concrete client so the
/// seam can be mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch daily price history and a fundamentals snapshot for a symbol
    async fn fetch(&self, symbol: &str) -> Result<(PriceSeries, FundamentalSnapshot)>;
}
