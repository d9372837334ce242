//! LLM-assisted stock analysis
//!
//! This crate turns a stock ticker into an investment recommendation:
//!
//! - Price history and fundamentals from Yahoo Finance
//! - Technical indicators (50/200-day SMA, RSI-14, MACD 12/26/9)
//! - A structured Buy/Hold/Sell recommendation from an LLM, with a
//!   confidence score and plain-language explanation
//! - Terminal rendering: price chart, tables, confidence bar
//!
//! # Example
//!
//! ```rust,ignore
//! use analyst_stock::{AnalysisPipeline, AnalystConfig, RecommendationAgent, YahooMarketData};
//! use analyst_llm::providers::GroqProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AnalystConfig::from_env()?;
//!     let market_data = Arc::new(YahooMarketData::new(&config)?);
//!     let provider = Arc::new(GroqProvider::from_env()?);
//!     let agent = RecommendationAgent::new(provider, Arc::new(config));
//!
//!     let pipeline = AnalysisPipeline::new(market_data, Some(agent));
//!     let report = pipeline.run("AAPL").await?;
//!     println!("{}", analyst_stock::render::render_report(&report));
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod indicators;
pub mod pipeline;
pub mod prompts;
pub mod render;
pub mod series;

// Re-export main types for convenience
pub use agent::{Recommendation, RecommendationAgent, Signal};
pub use api::{MarketData, YahooMarketData};
pub use chart::{ChartData, ChartPoint};
pub use config::AnalystConfig;
pub use error::{AnalystError, Result};
pub use indicators::{IndicatorSet, LatestIndicators, compute_indicators};
pub use pipeline::{AnalysisPipeline, AnalysisReport};
pub use series::{Candle, FundamentalSnapshot, PriceSeries};
