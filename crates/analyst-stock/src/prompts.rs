//! Prompt construction for the recommendation agent

use crate::indicators::LatestIndicators;
use crate::series::FundamentalSnapshot;

/// System instruction pinning the model to the supplied data
pub fn system_prompt() -> &'static str {
    "You are a senior investment analyst. Your task is to provide a clear, \
     data-driven investment recommendation (Buy, Hold, or Sell) with a \
     confidence score. You must base your entire analysis and explanation \
     *only* on the data provided. Do not use any external knowledge. \
     Submit your answer by calling the submit_recommendation tool."
}

/// Build the user message embedding the ticker, fundamentals, and the
/// latest technical values
pub fn user_prompt(
    symbol: &str,
    fundamentals: &FundamentalSnapshot,
    latest: &LatestIndicators,
) -> String {
    format!(
        "Analyze the stock: {symbol}\n\
         \n\
         **Fundamental Data:**\n\
         {fundamentals}\n\
         **Technical Analysis Data (Latest):**\n\
         - Current Price: {close:.2}\n\
         - 50-Day SMA: {sma_50}\n\
         - 200-Day SMA: {sma_200}\n\
         - RSI: {rsi}\n\
         - MACD Line: {macd}\n\
         - MACD Signal Line: {macd_signal}\n\
         \n\
         **Your Task:**\n\
         Based on a holistic analysis of the provided fundamental and technical data, \
         generate a structured recommendation.\n\
         - **For Fundamentals:** Consider if the P/E ratio suggests the stock is over \
         or undervalued. Look at debt, profitability (Return on Equity), and dividend \
         yield for stability.\n\
         - **For Technicals:** Is the current price above or below key moving averages? \
         Is the RSI indicating overbought (>70) or oversold (<30)? Is the MACD line \
         above its signal line (bullish) or below (bearish)?\n\
         - **Synthesize:** Combine these insights into a final recommendation, a \
         confidence score, and a detailed explanation. Treat values marked \
         'n/a (insufficient history)' as unknown, not as zero.",
        fundamentals = fundamentals.to_prompt_text(),
        close = latest.close,
        sma_50 = fmt_indicator(latest.sma_50),
        sma_200 = fmt_indicator(latest.sma_200),
        rsi = fmt_indicator(latest.rsi),
        macd = fmt_indicator(latest.macd),
        macd_signal = fmt_indicator(latest.macd_signal),
    )
}

/// Two decimal places where defined; an explicit marker where the lookback
/// window has not filled (never a zero placeholder)
fn fmt_indicator(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a (insufficient history)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latest() -> LatestIndicators {
        LatestIndicators {
            close: 150.0,
            sma_50: Some(148.337),
            sma_200: Some(141.5),
            rsi: Some(55.25),
            macd: Some(1.234),
            macd_signal: Some(0.9),
            macd_histogram: Some(0.334),
        }
    }

    #[test]
    fn test_user_prompt_formats_two_decimals() {
        let fundamentals = FundamentalSnapshot {
            symbol: "AAPL".to_string(),
            company_name: Some("Apple Inc.".to_string()),
            ..Default::default()
        };

        let prompt = user_prompt("AAPL", &fundamentals, &latest());
        assert!(prompt.contains("Analyze the stock: AAPL"));
        assert!(prompt.contains("Current Price: 150.00"));
        assert!(prompt.contains("50-Day SMA: 148.34"));
        assert!(prompt.contains("MACD Line: 1.23"));
        assert!(prompt.contains("company_name: Apple Inc."));
    }

    #[test]
    fn test_undefined_indicator_marked_not_zeroed() {
        let fundamentals = FundamentalSnapshot::default();
        let mut values = latest();
        values.sma_200 = None;

        let prompt = user_prompt("IPO", &fundamentals, &values);
        assert!(prompt.contains("200-Day SMA: n/a (insufficient history)"));
        assert!(!prompt.contains("200-Day SMA: 0.00"));
    }
}
