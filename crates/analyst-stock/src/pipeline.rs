//! Analysis pipeline orchestrator
//!
//! Sequences the steps for one user-submitted ticker: validate, fetch,
//! compute indicators, request a recommendation. Control flow is strictly
//! linear and synchronous; nothing survives past the request.

use crate::agent::{Recommendation, RecommendationAgent};
use crate::api::MarketData;
use crate::chart::ChartData;
use crate::error::{AnalystError, Result};
use crate::indicators::{LatestIndicators, compute_indicators};
use crate::series::FundamentalSnapshot;
use std::sync::Arc;
use tracing::{info, instrument};

/// Everything the presentation layer needs to render one analysis
#[derive(Debug)]
pub struct AnalysisReport {
    pub symbol: String,
    pub fundamentals: FundamentalSnapshot,
    pub latest_indicators: LatestIndicators,
    pub chart: ChartData,
    pub recommendation: Recommendation,
    /// Indicators undefined at the latest row due to insufficient history
    pub warnings: Vec<String>,
}

/// Orchestrates market data, indicators, and the recommendation agent
pub struct AnalysisPipeline {
    market_data: Arc<dyn MarketData>,
    /// `None` when no API key is configured; the pipeline then degrades to
    /// a configuration error at the recommendation step
    agent: Option<RecommendationAgent>,
}

impl AnalysisPipeline {
    /// Create a new pipeline
    pub fn new(market_data: Arc<dyn MarketData>, agent: Option<RecommendationAgent>) -> Self {
        Self { market_data, agent }
    }

    /// Run the full analysis for a ticker
    ///
    /// The ticker is trimmed and upper-cased first; an empty submission
    /// fails before any fetch is attempted.
    #[instrument(skip(self))]
    pub async fn run(&self, ticker: &str) -> Result<AnalysisReport> {
        let symbol = ticker.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(AnalystError::EmptyTicker);
        }

        info!(symbol, "starting analysis");

        let (series, fundamentals) = self.market_data.fetch(&symbol).await?;

        let indicators = compute_indicators(&series)?;
        let latest = indicators.latest();

        let warnings: Vec<String> = latest
            .undefined_names()
            .iter()
            .map(|name| format!("{name} is undefined: insufficient price history"))
            .collect();

        let agent = self.agent.as_ref().ok_or_else(|| {
            AnalystError::Config(
                "GROQ_API_KEY is not configured; cannot generate a recommendation".to_string(),
            )
        })?;

        let recommendation = agent.recommend(&symbol, &fundamentals, &indicators).await?;

        let chart = ChartData::from_indicators(&indicators);

        info!(symbol, "analysis complete");

        Ok(AnalysisReport {
            symbol,
            fundamentals,
            latest_indicators: latest,
            chart,
            recommendation,
            warnings,
        })
    }
}
