//! Yahoo Finance market data adapter

use crate::api::{MarketData, QuoteSummaryClient};
use crate::config::AnalystConfig;
use crate::error::{AnalystError, Result};
use crate::series::{Candle, FundamentalSnapshot, PriceSeries};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use time::OffsetDateTime;
use tracing::{info, instrument};
use yahoo_finance_api as yahoo;

/// Market data source backed by Yahoo Finance
///
/// Price history comes from the `yahoo_finance_api` chart endpoint;
/// fundamentals come from the quoteSummary endpoint.
pub struct YahooMarketData {
    quote_summary: QuoteSummaryClient,
    history_days: i64,
}

impl YahooMarketData {
    /// Create a new adapter from the analyst configuration
    pub fn new(config: &AnalystConfig) -> Result<Self> {
        Ok(Self {
            quote_summary: QuoteSummaryClient::new(config.request_timeout)?,
            history_days: config.history_days,
        })
    }

    /// Fetch daily quote history covering the configured window
    async fn get_history(&self, symbol: &str) -> Result<PriceSeries> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| AnalystError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;

        let end = Utc::now();
        let start = end - chrono::Duration::days(self.history_days);

        let start_odt = to_offset(start, symbol)?;
        let end_odt = to_offset(end, symbol)?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| AnalystError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;

        let quotes = response.quotes().map_err(|e| AnalystError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

        let candles: Vec<Candle> = quotes
            .iter()
            .map(|q| Candle {
                timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
            })
            .collect();

        if candles.is_empty() {
            return Err(AnalystError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "no historical quotes returned".to_string(),
            });
        }

        PriceSeries::new(symbol, candles)
    }
}

fn to_offset(ts: DateTime<Utc>, symbol: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(ts.timestamp()).map_err(|e| {
        AnalystError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: format!("invalid timestamp: {e}"),
        }
    })
}

#[async_trait]
impl MarketData for YahooMarketData {
    #[instrument(skip(self))]
    async fn fetch(&self, symbol: &str) -> Result<(PriceSeries, FundamentalSnapshot)> {
        if symbol.trim().is_empty() {
            return Err(AnalystError::InvalidSymbol(symbol.to_string()));
        }

        let series = self.get_history(symbol).await?;
        let fundamentals = self.quote_summary.get_fundamentals(symbol).await?;

        info!(
            symbol,
            rows = series.len(),
            company = fundamentals.company_name.as_deref().unwrap_or("unknown"),
            "fetched market data"
        );

        Ok((series, fundamentals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_adapter() -> YahooMarketData {
        let config = AnalystConfig::default();
        YahooMarketData::new(&config).expect("adapter")
    }

    #[tokio::test]
    async fn test_blank_symbol_rejected() {
        let adapter = test_adapter();
        let result = adapter.fetch("   ").await;
        assert!(matches!(result, Err(AnalystError::InvalidSymbol(_))));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_history() {
        let adapter = test_adapter();
        let (series, fundamentals) = adapter.fetch("AAPL").await.expect("fetch");
        assert_eq!(series.symbol(), "AAPL");
        assert!(series.len() > 200);
        assert_eq!(fundamentals.symbol, "AAPL");
    }
}
