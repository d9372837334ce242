//! Chart data preparation
//!
//! Flattens an indicator set into the three overlay series the presentation
//! layer draws: close, 50-day SMA, and 200-day SMA.

use crate::indicators::IndicatorSet;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One plotted row
#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
}

/// Prepared chart data with display metadata
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub symbol: String,
    pub points: Vec<ChartPoint>,
    pub min_price: f64,
    pub max_price: f64,
}

impl ChartData {
    /// Build chart data from an indicator set
    pub fn from_indicators(indicators: &IndicatorSet) -> Self {
        let series = indicators.series();

        let points: Vec<ChartPoint> = series
            .candles()
            .iter()
            .enumerate()
            .map(|(i, candle)| ChartPoint {
                timestamp: candle.timestamp,
                close: candle.close,
                sma_50: indicators.sma_50()[i],
                sma_200: indicators.sma_200()[i],
            })
            .collect();

        let mut min_price = f64::INFINITY;
        let mut max_price = f64::NEG_INFINITY;
        for p in &points {
            for v in [Some(p.close), p.sma_50, p.sma_200].into_iter().flatten() {
                min_price = min_price.min(v);
                max_price = max_price.max(v);
            }
        }

        Self {
            symbol: series.symbol().to_string(),
            points,
            min_price,
            max_price,
        }
    }
}
