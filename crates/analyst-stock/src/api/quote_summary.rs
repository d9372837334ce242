//! Yahoo quoteSummary client for fundamental data
//!
//! The `yahoo_finance_api` crate exposes no fundamentals endpoint, so this
//! client talks to the quoteSummary API directly.

use crate::error::{AnalystError, Result};
use crate::series::FundamentalSnapshot;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const BASE_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const MODULES: &str = "price,summaryDetail,financialData,defaultKeyStatistics,assetProfile";

/// Client for the Yahoo quoteSummary endpoint
#[derive(Debug, Clone)]
pub struct QuoteSummaryClient {
    client: Client,
}

impl QuoteSummaryClient {
    /// Create a new client with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) analyst-stock")
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the fundamentals snapshot for a symbol
    pub async fn get_fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot> {
        let url = format!("{BASE_URL}/{symbol}");
        let response = self
            .client
            .get(&url)
            .query(&[("modules", MODULES), ("formatted", "false")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnalystError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("quoteSummary HTTP {}", response.status()),
            });
        }

        let envelope: Envelope = response.json().await?;

        if let Some(error) = envelope.quote_summary.error {
            return Err(AnalystError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: error.description.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        let result = envelope
            .quote_summary
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| AnalystError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "empty quoteSummary result".to_string(),
            })?;

        debug!(symbol, "fetched fundamentals from quoteSummary");
        Ok(snapshot_from_modules(symbol, result))
    }
}

fn snapshot_from_modules(symbol: &str, modules: Modules) -> FundamentalSnapshot {
    let price = modules.price.unwrap_or_default();
    let summary = modules.summary_detail.unwrap_or_default();
    let financial = modules.financial_data.unwrap_or_default();
    let key_stats = modules.default_key_statistics.unwrap_or_default();
    let profile = modules.asset_profile.unwrap_or_default();

    FundamentalSnapshot {
        symbol: symbol.to_string(),
        company_name: price.long_name.or(price.short_name),
        sector: profile.sector,
        market_cap: price.market_cap.value(),
        trailing_pe: summary.trailing_pe.value(),
        forward_pe: key_stats.forward_pe.value(),
        eps: key_stats.trailing_eps.value(),
        return_on_equity: financial.return_on_equity.value(),
        dividend_yield: summary.dividend_yield.value(),
        debt_to_equity: financial.debt_to_equity.value(),
        profit_margin: financial.profit_margins.value(),
        revenue_growth: financial.revenue_growth.value(),
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// quoteSummary numbers arrive either bare or wrapped as `{"raw": ..}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
enum Metric {
    Bare(f64),
    Wrapped {
        raw: Option<f64>,
    },
    #[default]
    #[serde(skip)]
    Missing,
}

impl Metric {
    fn value(&self) -> Option<f64> {
        match self {
            Metric::Bare(v) => Some(*v),
            Metric::Wrapped { raw } => *raw,
            Metric::Missing => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<Modules>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Modules {
    price: Option<PriceModule>,
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetail>,
    #[serde(rename = "financialData")]
    financial_data: Option<FinancialData>,
    #[serde(rename = "defaultKeyStatistics")]
    default_key_statistics: Option<KeyStatistics>,
    #[serde(rename = "assetProfile")]
    asset_profile: Option<AssetProfile>,
}

#[derive(Debug, Default, Deserialize)]
struct PriceModule {
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
    #[serde(rename = "marketCap", default)]
    market_cap: Metric,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryDetail {
    #[serde(rename = "trailingPE", default)]
    trailing_pe: Metric,
    #[serde(rename = "dividendYield", default)]
    dividend_yield: Metric,
}

#[derive(Debug, Default, Deserialize)]
struct FinancialData {
    #[serde(rename = "returnOnEquity", default)]
    return_on_equity: Metric,
    #[serde(rename = "debtToEquity", default)]
    debt_to_equity: Metric,
    #[serde(rename = "profitMargins", default)]
    profit_margins: Metric,
    #[serde(rename = "revenueGrowth", default)]
    revenue_growth: Metric,
}

#[derive(Debug, Default, Deserialize)]
struct KeyStatistics {
    #[serde(rename = "forwardPE", default)]
    forward_pe: Metric,
    #[serde(rename = "trailingEps", default)]
    trailing_eps: Metric,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfile {
    sector: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_quote_summary_payload() {
        let payload = json!({
            "quoteSummary": {
                "result": [{
                    "price": {
                        "longName": "Apple Inc.",
                        "marketCap": 2_900_000_000_000.0_f64,
                    },
                    "summaryDetail": {
                        "trailingPE": {"raw": 28.5},
                        "dividendYield": {"raw": 0.0055},
                    },
                    "financialData": {
                        "returnOnEquity": {"raw": 1.47},
                        "debtToEquity": {"raw": 176.3},
                    },
                    "defaultKeyStatistics": {
                        "trailingEps": {"raw": 6.42},
                    },
                    "assetProfile": {
                        "sector": "Technology",
                    }
                }],
                "error": null
            }
        });

        let envelope: Envelope = serde_json::from_value(payload).expect("parse");
        let modules = envelope
            .quote_summary
            .result
            .expect("result")
            .remove(0);
        let snapshot = snapshot_from_modules("AAPL", modules);

        assert_eq!(snapshot.company_name.as_deref(), Some("Apple Inc."));
        assert_eq!(snapshot.sector.as_deref(), Some("Technology"));
        assert_eq!(snapshot.trailing_pe, Some(28.5));
        assert_eq!(snapshot.return_on_equity, Some(1.47));
        assert_eq!(snapshot.eps, Some(6.42));
        assert_eq!(snapshot.forward_pe, None);
    }

    #[test]
    fn test_error_payload() {
        let payload = json!({
            "quoteSummary": {
                "result": null,
                "error": {"code": "Not Found", "description": "Quote not found for symbol"}
            }
        });

        let envelope: Envelope = serde_json::from_value(payload).expect("parse");
        assert!(envelope.quote_summary.error.is_some());
        assert!(envelope.quote_summary.result.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_get_fundamentals() {
        let client = QuoteSummaryClient::new(Duration::from_secs(30)).expect("client");
        let snapshot = client.get_fundamentals("AAPL").await.expect("fundamentals");
        assert_eq!(snapshot.symbol, "AAPL");
        assert!(snapshot.company_name.is_some());
    }
}
