//! Terminal rendering for analysis reports
//!
//! Formats an [`AnalysisReport`](crate::pipeline::AnalysisReport) for the
//! CLI: fundamentals and indicator tables, a price chart with both moving
//! averages, the recommendation, and a confidence bar.

use crate::agent::{Recommendation, Signal};
use crate::chart::ChartData;
use crate::indicators::LatestIndicators;
use crate::pipeline::AnalysisReport;
use crate::series::FundamentalSnapshot;
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use std::fmt::Write as _;

const CHART_WIDTH: usize = 72;
const CHART_HEIGHT: usize = 16;
const BAR_WIDTH: usize = 30;

pub const DISCLAIMER: &str =
    "This analysis is generated by an AI model and is not financial advice. \
     Always do your own research before making investment decisions.";

/// Render a full report as a single printable string
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    let name = report.fundamentals.display_name();
    let _ = writeln!(out, "\n=== {name} ({}) ===\n", report.symbol);

    out.push_str(&render_chart(&report.chart));
    out.push('\n');

    out.push_str("Fundamentals\n");
    let _ = writeln!(out, "{}", fundamentals_table(&report.fundamentals));
    out.push('\n');

    out.push_str("Technical Indicators (latest session)\n");
    let _ = writeln!(out, "{}", indicators_table(&report.latest_indicators));
    out.push('\n');

    for warning in &report.warnings {
        let _ = writeln!(out, "  note: {warning}");
    }
    if !report.warnings.is_empty() {
        out.push('\n');
    }

    out.push_str(&render_recommendation(&report.recommendation));
    let _ = writeln!(out, "\n{DISCLAIMER}");

    out
}

/// Render the recommendation block with a confidence bar
///
/// The label is colored green/yellow/red when stdout is a terminal.
pub fn render_recommendation(rec: &Recommendation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Recommendation: {}", colored_signal(rec.recommendation));
    let _ = writeln!(out, "Confidence:     {}", confidence_bar(rec.confidence_score));
    let _ = writeln!(out, "\n{}", rec.explanation);
    out
}

/// Key/value table of fundamentals, `n/a` for anything Yahoo did not return
pub fn fundamentals_table(f: &FundamentalSnapshot) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);

    table.add_row(vec![
        Cell::new("Company"),
        Cell::new(f.company_name.as_deref().unwrap_or("n/a")),
    ]);
    table.add_row(vec![
        Cell::new("Sector"),
        Cell::new(f.sector.as_deref().unwrap_or("n/a")),
    ]);
    table.add_row(vec![Cell::new("Market Cap"), Cell::new(fmt_large(f.market_cap))]);
    table.add_row(vec![Cell::new("Trailing P/E"), Cell::new(fmt_ratio(f.trailing_pe))]);
    table.add_row(vec![Cell::new("Forward P/E"), Cell::new(fmt_ratio(f.forward_pe))]);
    table.add_row(vec![Cell::new("EPS"), Cell::new(fmt_ratio(f.eps))]);
    table.add_row(vec![
        Cell::new("Return on Equity"),
        Cell::new(fmt_ratio(f.return_on_equity)),
    ]);
    table.add_row(vec![
        Cell::new("Dividend Yield"),
        Cell::new(fmt_ratio(f.dividend_yield)),
    ]);
    table.add_row(vec![
        Cell::new("Debt to Equity"),
        Cell::new(fmt_ratio(f.debt_to_equity)),
    ]);
    table.add_row(vec![
        Cell::new("Profit Margin"),
        Cell::new(fmt_ratio(f.profit_margin)),
    ]);
    table.add_row(vec![
        Cell::new("Revenue Growth"),
        Cell::new(fmt_ratio(f.revenue_growth)),
    ]);
    table
}

/// One-row table of the latest indicator values
pub fn indicators_table(latest: &LatestIndicators) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Close",
            "SMA 50",
            "SMA 200",
            "RSI 14",
            "MACD",
            "Signal",
            "Histogram",
        ]);
    table.add_row(vec![
        Cell::new(format!("{:.2}", latest.close)),
        Cell::new(fmt_ratio(latest.sma_50)),
        Cell::new(fmt_ratio(latest.sma_200)),
        Cell::new(fmt_ratio(latest.rsi)),
        Cell::new(fmt_ratio(latest.macd)),
        Cell::new(fmt_ratio(latest.macd_signal)),
        Cell::new(fmt_ratio(latest.macd_histogram)),
    ]);
    table
}

/// ASCII chart of closing price with both moving averages overlaid
///
/// Close plots as `*`, the 50-day SMA as `+`, the 200-day SMA as `.`.
/// Close is drawn last so it wins where the series overlap.
pub fn render_chart(chart: &ChartData) -> String {
    if chart.points.is_empty() {
        return String::from("(no price history)\n");
    }

    let mut grid = vec![vec![' '; CHART_WIDTH]; CHART_HEIGHT];
    let span = chart.max_price - chart.min_price;

    let row_for = |value: f64| -> usize {
        if span <= f64::EPSILON {
            return CHART_HEIGHT / 2;
        }
        let norm = (value - chart.min_price) / span;
        let row = ((1.0 - norm) * (CHART_HEIGHT - 1) as f64).round() as usize;
        row.min(CHART_HEIGHT - 1)
    };

    for col in 0..CHART_WIDTH {
        let idx = if chart.points.len() == 1 {
            0
        } else {
            (col as f64 / (CHART_WIDTH - 1) as f64 * (chart.points.len() - 1) as f64).round()
                as usize
        };
        let point = &chart.points[idx];

        if let Some(sma) = point.sma_200 {
            grid[row_for(sma)][col] = '.';
        }
        if let Some(sma) = point.sma_50 {
            grid[row_for(sma)][col] = '+';
        }
        grid[row_for(point.close)][col] = '*';
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} close (*), 50-day SMA (+), 200-day SMA (.)",
        chart.symbol
    );
    for (i, row) in grid.iter().enumerate() {
        let label = if i == 0 {
            format!("{:>10.2} ", chart.max_price)
        } else if i == CHART_HEIGHT - 1 {
            format!("{:>10.2} ", chart.min_price)
        } else {
            " ".repeat(11)
        };
        let line: String = row.iter().collect();
        let _ = writeln!(out, "{label}|{}", line.trim_end());
    }
    let _ = writeln!(out, "{:>11}+{}", "", "-".repeat(CHART_WIDTH));
    out
}

/// Progress-bar style rendering of a confidence score in [0, 1]
pub fn confidence_bar(score: f64) -> String {
    let clamped = score.clamp(0.0, 1.0);
    let filled = (clamped * BAR_WIDTH as f64).round() as usize;
    let mut bar = String::with_capacity(BAR_WIDTH + 10);
    bar.push('[');
    for i in 0..BAR_WIDTH {
        bar.push(if i < filled { '#' } else { '-' });
    }
    bar.push(']');
    let _ = write!(bar, " {:.0}%", clamped * 100.0);
    bar
}

fn colored_signal(signal: Signal) -> String {
    use std::io::IsTerminal;

    let code = match signal {
        Signal::Buy => "\x1b[32m",
        Signal::Hold => "\x1b[33m",
        Signal::Sell => "\x1b[31m",
    };
    if std::io::stdout().is_terminal() {
        format!("{code}{signal}\x1b[0m")
    } else {
        signal.to_string()
    }
}

fn fmt_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

/// Human-scale formatting for market cap style figures
fn fmt_large(value: Option<f64>) -> String {
    let Some(v) = value else {
        return "n/a".to_string();
    };
    if v >= 1e12 {
        format!("{:.2}T", v / 1e12)
    } else if v >= 1e9 {
        format!("{:.2}B", v / 1e9)
    } else if v >= 1e6 {
        format!("{:.2}M", v / 1e6)
    } else {
        format!("{v:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartPoint;
    use chrono::{TimeZone, Utc};

    fn sample_chart(rows: usize) -> ChartData {
        let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).single().expect("date");
        let points: Vec<ChartPoint> = (0..rows)
            .map(|i| ChartPoint {
                timestamp: start + chrono::Duration::days(i as i64),
                close: 100.0 + i as f64,
                sma_50: (i >= 49).then(|| 100.0 + i as f64 - 10.0),
                sma_200: None,
            })
            .collect();
        let min_price = points.first().map(|p| p.close).unwrap_or(0.0) - 10.0;
        let max_price = points.last().map(|p| p.close).unwrap_or(0.0);
        ChartData {
            symbol: "TEST".to_string(),
            points,
            min_price,
            max_price,
        }
    }

    #[test]
    fn test_confidence_bar_bounds() {
        assert_eq!(confidence_bar(0.0), format!("[{}] 0%", "-".repeat(BAR_WIDTH)));
        assert_eq!(confidence_bar(1.0), format!("[{}] 100%", "#".repeat(BAR_WIDTH)));
    }

    #[test]
    fn test_confidence_bar_clamps_out_of_range() {
        assert_eq!(confidence_bar(1.7), confidence_bar(1.0));
        assert_eq!(confidence_bar(-0.3), confidence_bar(0.0));
    }

    #[test]
    fn test_confidence_bar_partial_fill() {
        let bar = confidence_bar(0.5);
        assert!(bar.contains("50%"));
        assert_eq!(bar.matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_chart_has_expected_rows() {
        let rendered = render_chart(&sample_chart(300));
        // header + grid rows + axis
        assert_eq!(rendered.lines().count(), CHART_HEIGHT + 2);
        assert!(rendered.contains('*'));
        assert!(rendered.contains('+'));
    }

    #[test]
    fn test_chart_empty_series() {
        let chart = ChartData {
            symbol: "X".to_string(),
            points: vec![],
            min_price: 0.0,
            max_price: 0.0,
        };
        assert_eq!(render_chart(&chart), "(no price history)\n");
    }

    #[test]
    fn test_chart_flat_series_does_not_divide_by_zero() {
        let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).single().expect("date");
        let points: Vec<ChartPoint> = (0..10)
            .map(|i| ChartPoint {
                timestamp: start + chrono::Duration::days(i),
                close: 42.0,
                sma_50: None,
                sma_200: None,
            })
            .collect();
        let chart = ChartData {
            symbol: "FLAT".to_string(),
            points,
            min_price: 42.0,
            max_price: 42.0,
        };
        let rendered = render_chart(&chart);
        assert!(rendered.contains('*'));
    }

    #[test]
    fn test_recommendation_block_carries_label_and_explanation() {
        let rec = Recommendation {
            recommendation: Signal::Hold,
            confidence_score: 0.6,
            explanation: "Mixed signals across indicators.".to_string(),
        };
        let rendered = render_recommendation(&rec);
        assert!(rendered.contains("Hold"));
        assert!(rendered.contains("Mixed signals"));
        assert!(rendered.contains("60%"));
    }

    #[test]
    fn test_fundamentals_table_uses_na_for_missing() {
        let table = fundamentals_table(&FundamentalSnapshot::default());
        let rendered = table.to_string();
        assert!(rendered.contains("n/a"));
        assert!(rendered.contains("Market Cap"));
    }

    #[test]
    fn test_fundamentals_table_formats_market_cap() {
        let snapshot = FundamentalSnapshot {
            symbol: "AAPL".to_string(),
            market_cap: Some(2_750_000_000_000.0),
            ..Default::default()
        };
        let rendered = fundamentals_table(&snapshot).to_string();
        assert!(rendered.contains("2.75T"));
    }

    #[test]
    fn test_indicators_table_mixes_values_and_na() {
        let latest = LatestIndicators {
            close: 151.23,
            sma_50: Some(148.5),
            sma_200: None,
            rsi: Some(55.0),
            macd: Some(1.25),
            macd_signal: Some(1.10),
            macd_histogram: Some(0.15),
        };
        let rendered = indicators_table(&latest).to_string();
        assert!(rendered.contains("151.23"));
        assert!(rendered.contains("148.50"));
        assert!(rendered.contains("n/a"));
    }
}
