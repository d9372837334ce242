//! Error types for the financial analyst

use thiserror::Error;

/// Errors raised along the analysis pipeline
#[derive(Debug, Error)]
pub enum AnalystError {
    /// No ticker was supplied
    #[error("Please enter a stock ticker")]
    EmptyTicker,

    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data not available for the requested symbol
    #[error("Could not retrieve data for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// Price series violates its invariants (empty, unordered, duplicated rows)
    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    /// Technical indicator calculation error
    #[error("Technical indicator error: {0}")]
    Indicator(String),

    /// Recommendation could not be generated
    #[error("Recommendation failed: {0}")]
    Recommendation(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(#[from] analyst_llm::LlmError),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for analyst operations
pub type Result<T> = std::result::Result<T, AnalystError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalystError::EmptyTicker;
        assert_eq!(err.to_string(), "Please enter a stock ticker");

        let err = AnalystError::DataUnavailable {
            symbol: "AAPL".to_string(),
            reason: "no quotes returned".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Could not retrieve data for AAPL: no quotes returned"
        );
    }

    #[test]
    fn test_llm_error_conversion() {
        let llm_err = analyst_llm::LlmError::AuthenticationFailed;
        let err: AnalystError = llm_err.into();
        assert!(matches!(err, AnalystError::Llm(_)));
    }
}
