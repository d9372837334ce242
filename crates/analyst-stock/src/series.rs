//! Price series and fundamentals data model
//!
//! Everything here is created and consumed within a single request; nothing
//! is shared across requests or persisted.

use crate::error::{AnalystError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Ordered sequence of daily candles
///
/// Invariants, enforced at construction: chronological order, at least one
/// row, no duplicate timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    candles: Vec<Candle>,
}

impl PriceSeries {
    /// Build a validated series from candles
    pub fn new(symbol: impl Into<String>, candles: Vec<Candle>) -> Result<Self> {
        if candles.is_empty() {
            return Err(AnalystError::InvalidSeries(
                "price series must contain at least one row".to_string(),
            ));
        }

        for pair in candles.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(AnalystError::InvalidSeries(format!(
                    "rows out of order or duplicated at {}",
                    pair[1].timestamp
                )));
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            candles,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// The most recent candle
    pub fn last(&self) -> &Candle {
        // Non-empty by construction
        &self.candles[self.candles.len() - 1]
    }

    /// Closing prices, oldest first
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }
}

/// Non-price financial metrics for a company
///
/// Metrics Yahoo does not report for a symbol stay `None`; downstream
/// consumers render them as "n/a" rather than inventing zeros.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    pub symbol: String,
    pub company_name: Option<String>,
    pub sector: Option<String>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub eps: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub profit_margin: Option<f64>,
    pub revenue_growth: Option<f64>,
}

impl FundamentalSnapshot {
    /// Display name for report headers: company name if known, else the symbol
    pub fn display_name(&self) -> &str {
        self.company_name.as_deref().unwrap_or(&self.symbol)
    }

    /// Render the snapshot as prompt-ready text, one metric per line
    pub fn to_prompt_text(&self) -> String {
        fn line(label: &str, value: Option<f64>) -> String {
            match value {
                Some(v) => format!("- {label}: {v:.4}\n"),
                None => format!("- {label}: n/a\n"),
            }
        }

        let mut out = format!(
            "- company_name: {}\n",
            self.company_name.as_deref().unwrap_or("n/a")
        );
        out.push_str(&format!(
            "- sector: {}\n",
            self.sector.as_deref().unwrap_or("n/a")
        ));
        out.push_str(&line("market_cap", self.market_cap));
        out.push_str(&line("trailing_pe", self.trailing_pe));
        out.push_str(&line("forward_pe", self.forward_pe));
        out.push_str(&line("eps", self.eps));
        out.push_str(&line("return_on_equity", self.return_on_equity));
        out.push_str(&line("dividend_yield", self.dividend_yield));
        out.push_str(&line("debt_to_equity", self.debt_to_equity));
        out.push_str(&line("profit_margin", self.profit_margin));
        out.push_str(&line("revenue_growth", self.revenue_growth));
        out
    }
}
