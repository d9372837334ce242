//! Technical indicator calculator
//!
//! Computes the fixed indicator set over a price series: two simple moving
//! averages (50/200), Wilder-smoothed RSI(14), and MACD(12, 26, 9). Derived
//! columns are aligned row-for-row with the candles and hold `None` until
//! the lookback window fills; consumers read only the last row for
//! point-in-time decisions.

use crate::error::{AnalystError, Result};
use crate::series::PriceSeries;
use serde::Serialize;
use tracing::debug;

/// Fast SMA window
pub const SMA_FAST_WINDOW: usize = 50;
/// Slow SMA window
pub const SMA_SLOW_WINDOW: usize = 200;
/// RSI lookback
pub const RSI_PERIOD: usize = 14;
/// MACD fast EMA
pub const MACD_FAST: usize = 12;
/// MACD slow EMA
pub const MACD_SLOW: usize = 26;
/// MACD signal EMA
pub const MACD_SIGNAL: usize = 9;

/// Stable output column names
pub const COLUMN_NAMES: [&str; 6] = [
    "50_day_sma",
    "200_day_sma",
    "rsi",
    "macd",
    "macd_signal",
    "macd_histogram",
];

/// A price series augmented with the six derived indicator columns
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    series: PriceSeries,
    sma_50: Vec<Option<f64>>,
    sma_200: Vec<Option<f64>>,
    rsi: Vec<Option<f64>>,
    macd: Vec<Option<f64>>,
    macd_signal: Vec<Option<f64>>,
    macd_histogram: Vec<Option<f64>>,
}

/// Point-in-time view of the most recent row
///
/// Indicators still inside their warm-up window are `None`, never a
/// zero placeholder.
#[derive(Debug, Clone, Serialize)]
pub struct LatestIndicators {
    pub close: f64,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
}

impl LatestIndicators {
    /// Names of indicators that are still undefined at the latest row
    pub fn undefined_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.sma_50.is_none() {
            names.push(COLUMN_NAMES[0]);
        }
        if self.sma_200.is_none() {
            names.push(COLUMN_NAMES[1]);
        }
        if self.rsi.is_none() {
            names.push(COLUMN_NAMES[2]);
        }
        if self.macd.is_none() {
            names.push(COLUMN_NAMES[3]);
        }
        if self.macd_signal.is_none() {
            names.push(COLUMN_NAMES[4]);
        }
        if self.macd_histogram.is_none() {
            names.push(COLUMN_NAMES[5]);
        }
        names
    }
}

impl IndicatorSet {
    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn sma_50(&self) -> &[Option<f64>] {
        &self.sma_50
    }

    pub fn sma_200(&self) -> &[Option<f64>] {
        &self.sma_200
    }

    pub fn rsi(&self) -> &[Option<f64>] {
        &self.rsi
    }

    pub fn macd(&self) -> &[Option<f64>] {
        &self.macd
    }

    pub fn macd_signal(&self) -> &[Option<f64>] {
        &self.macd_signal
    }

    pub fn macd_histogram(&self) -> &[Option<f64>] {
        &self.macd_histogram
    }

    /// The most recent row's indicator values
    pub fn latest(&self) -> LatestIndicators {
        let i = self.series.len() - 1;
        LatestIndicators {
            close: self.series.last().close,
            sma_50: self.sma_50[i],
            sma_200: self.sma_200[i],
            rsi: self.rsi[i],
            macd: self.macd[i],
            macd_signal: self.macd_signal[i],
            macd_histogram: self.macd_histogram[i],
        }
    }
}

/// Compute the fixed indicator set for a price series
///
/// Fails with an explicit error instead of silently returning the input,
/// so the caller can always distinguish "no indicators computed" from a
/// degraded result.
pub fn compute_indicators(series: &PriceSeries) -> Result<IndicatorSet> {
    let closes = series.closes();

    if let Some(bad) = closes.iter().find(|c| !c.is_finite()) {
        return Err(AnalystError::Indicator(format!(
            "non-finite close price in series: {bad}"
        )));
    }

    debug!(
        symbol = series.symbol(),
        rows = closes.len(),
        "computing technical indicators"
    );

    let sma_50 = sma(&closes, SMA_FAST_WINDOW);
    let sma_200 = sma(&closes, SMA_SLOW_WINDOW);
    let rsi = wilder_rsi(&closes, RSI_PERIOD);

    let ema_fast = ema(&closes, MACD_FAST);
    let ema_slow = ema(&closes, MACD_SLOW);
    let macd: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let macd_signal = ema_over_defined(&macd, MACD_SIGNAL);
    let macd_histogram: Vec<Option<f64>> = macd
        .iter()
        .zip(&macd_signal)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    Ok(IndicatorSet {
        series: series.clone(),
        sma_50,
        sma_200,
        rsi,
        macd,
        macd_signal,
        macd_histogram,
    })
}

/// Simple moving average; `None` until the trailing window fills
fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = Some(sum / window as f64);

    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out[i] = Some(sum / window as f64);
    }

    out
}

/// Exponential moving average seeded with the SMA of the first `period`
/// values, multiplier `2 / (period + 1)`; first defined at index `period - 1`
fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut current: f64 = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(current);

    for i in period..values.len() {
        current = (values[i] - current) * k + current;
        out[i] = Some(current);
    }

    out
}

/// EMA over the defined tail of a sparse column, keeping row alignment
/// (used for the MACD signal line)
fn ema_over_defined(column: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; column.len()];

    let Some(first_defined) = column.iter().position(Option::is_some) else {
        return out;
    };

    let defined: Vec<f64> = column[first_defined..].iter().flatten().copied().collect();
    let smoothed = ema(&defined, period);

    for (offset, value) in smoothed.into_iter().enumerate() {
        out[first_defined + offset] = value;
    }

    out
}

/// Relative Strength Index with Wilder smoothing
///
/// Seed averages are the simple means of gains and losses over the first
/// `period` deltas; later rows use `avg = (avg * (period - 1) + x) / period`.
/// A window with zero gain and zero loss is defined as 50 (no net momentum
/// either way).
fn wilder_rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let delta = values[i] - values[i - 1];
        if delta > 0.0 {
            avg_gain += delta;
        } else {
            avg_loss += -delta;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    for i in (period + 1)..values.len() {
        let delta = values[i] - values[i - 1];
        let (gain, loss) = if delta > 0.0 {
            (delta, 0.0)
        } else {
            (0.0, -delta)
        };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        out[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain == 0.0 && avg_loss == 0.0 {
        return 50.0;
    }
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
