//! Recommendation agent
//!
//! Builds the two-part analysis prompt, invokes the LLM with a forced tool
//! call whose input schema is the recommendation shape, and deserializes the
//! result into a typed [`Recommendation`].

use crate::config::AnalystConfig;
use crate::error::{AnalystError, Result};
use crate::indicators::IndicatorSet;
use crate::prompts;
use crate::series::FundamentalSnapshot;
use analyst_llm::{
    CompletionRequest, ContentBlock, LlmProvider, Message, ToolDefinition, tools::schema,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Name of the tool the model must call to submit its answer
pub const RECOMMENDATION_TOOL: &str = "submit_recommendation";

const MAX_TOKENS: usize = 2048;

/// The final call on a stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Hold,
    Sell,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Buy => write!(f, "Buy"),
            Signal::Hold => write!(f, "Hold"),
            Signal::Sell => write!(f, "Sell"),
        }
    }
}

/// A structured recommendation for a stock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// The final recommendation
    pub recommendation: Signal,
    /// Confidence in the recommendation, 0.0 to 1.0
    pub confidence_score: f64,
    /// Detailed explanation supporting the recommendation
    pub explanation: String,
}

/// Agent that turns market data into a recommendation via the LLM
///
/// The provider is a constructed dependency, not ambient state; any
/// [`LlmProvider`] implementation (or a mock) can be injected.
pub struct RecommendationAgent {
    provider: Arc<dyn LlmProvider>,
    config: Arc<AnalystConfig>,
}

impl RecommendationAgent {
    /// Create a new agent with an injected provider
    pub fn new(provider: Arc<dyn LlmProvider>, config: Arc<AnalystConfig>) -> Self {
        Self { provider, config }
    }

    /// Generate a structured recommendation for a symbol
    pub async fn recommend(
        &self,
        symbol: &str,
        fundamentals: &FundamentalSnapshot,
        indicators: &IndicatorSet,
    ) -> Result<Recommendation> {
        let latest = indicators.latest();

        let undefined = latest.undefined_names();
        if !undefined.is_empty() {
            warn!(
                symbol,
                indicators = ?undefined,
                "latest row has insufficient history for some indicators; \
                 they are passed to the model as n/a"
            );
        }

        let request = CompletionRequest::builder(&self.config.model)
            .system(prompts::system_prompt())
            .add_message(Message::user(prompts::user_prompt(
                symbol,
                fundamentals,
                &latest,
            )))
            .max_tokens(MAX_TOKENS)
            .temperature(self.config.temperature)
            .tools(vec![recommendation_tool()])
            .require_tool(RECOMMENDATION_TOOL)
            .build();

        info!(symbol, model = %self.config.model, "requesting recommendation");

        let response = self.provider.complete(request).await?;
        let recommendation = parse_recommendation(&response.message)?;

        info!(
            symbol,
            recommendation = %recommendation.recommendation,
            confidence = recommendation.confidence_score,
            tokens = response.usage.total(),
            "recommendation generated"
        );

        Ok(recommendation)
    }
}

/// The tool definition whose input schema is the recommendation shape
fn recommendation_tool() -> ToolDefinition {
    ToolDefinition::new(
        RECOMMENDATION_TOOL,
        "Submit the final structured stock recommendation.",
        schema::object(
            serde_json::json!({
                "recommendation": schema::string_enum(
                    "The final recommendation.",
                    &["Buy", "Hold", "Sell"],
                ),
                "confidence_score": schema::number_range(
                    "A confidence score from 0.0 to 1.0 for the recommendation.",
                    0.0,
                    1.0,
                ),
                "explanation": schema::string(
                    "A detailed, multi-paragraph explanation supporting the recommendation.",
                ),
            }),
            vec!["recommendation", "confidence_score", "explanation"],
        ),
    )
}

/// Extract the recommendation from the assistant message
///
/// Primary path is the forced tool call; a plain-text JSON body is accepted
/// as a fallback for models that answer inline despite the tool choice.
fn parse_recommendation(message: &Message) -> Result<Recommendation> {
    for block in message.tool_uses() {
        if let ContentBlock::ToolUse { name, input, .. } = block {
            if name == RECOMMENDATION_TOOL {
                let rec: Recommendation = serde_json::from_value(input.clone()).map_err(|e| {
                    AnalystError::Recommendation(format!("schema violation in tool call: {e}"))
                })?;
                return validate(rec);
            }
        }
    }

    if let Some(text) = message.text() {
        if let Ok(rec) = serde_json::from_str::<Recommendation>(text.trim()) {
            return validate(rec);
        }
    }

    Err(AnalystError::Recommendation(
        "model did not return a structured recommendation".to_string(),
    ))
}

fn validate(rec: Recommendation) -> Result<Recommendation> {
    if !(0.0..=1.0).contains(&rec.confidence_score) {
        return Err(AnalystError::Recommendation(format!(
            "confidence score {} outside [0.0, 1.0]",
            rec.confidence_score
        )));
    }
    Ok(rec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::compute_indicators;
    use crate::series::{Candle, PriceSeries};
    use analyst_llm::{
        CompletionResponse, LlmError, MessageContent, Role, StopReason, TokenUsage,
    };
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use mockall::mock;

    mock! {
        Provider {}

        #[async_trait]
        impl LlmProvider for Provider {
            async fn complete(
                &self,
                request: CompletionRequest,
            ) -> analyst_llm::Result<CompletionResponse>;
            fn name(&self) -> &'static str;
        }
    }

    fn indicator_set() -> IndicatorSet {
        let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).single().expect("date");
        let candles = (0..300)
            .map(|i| Candle {
                timestamp: start + chrono::Duration::days(i),
                open: 150.0,
                high: 150.0,
                low: 150.0,
                close: 150.0,
                volume: 1_000,
            })
            .collect();
        let series = PriceSeries::new("AAPL", candles).expect("series");
        compute_indicators(&series).expect("indicators")
    }

    fn tool_use_response(input: serde_json::Value) -> CompletionResponse {
        CompletionResponse {
            message: Message {
                role: Role::Assistant,
                content: Some(MessageContent::Blocks(vec![ContentBlock::ToolUse {
                    id: "call_1".to_string(),
                    name: RECOMMENDATION_TOOL.to_string(),
                    input,
                }])),
            },
            stop_reason: StopReason::ToolUse,
            usage: TokenUsage {
                input_tokens: 500,
                output_tokens: 200,
            },
        }
    }

    fn agent(provider: MockProvider) -> RecommendationAgent {
        let config = Arc::new(
            AnalystConfig::builder()
                .groq_api_key("gsk-test")
                .build()
                .expect("config"),
        );
        RecommendationAgent::new(Arc::new(provider), config)
    }

    #[tokio::test]
    async fn test_recommendation_from_tool_call() {
        let mut provider = MockProvider::new();
        provider.expect_complete().times(1).returning(|request| {
            // The request carries the forced tool and deterministic sampling
            assert_eq!(request.temperature, Some(0.0));
            assert!(request.tools.is_some());
            Ok(tool_use_response(serde_json::json!({
                "recommendation": "Buy",
                "confidence_score": 0.82,
                "explanation": "Price sits above both moving averages."
            })))
        });

        let rec = agent(provider)
            .recommend("AAPL", &FundamentalSnapshot::default(), &indicator_set())
            .await
            .expect("recommendation");

        assert_eq!(rec.recommendation, Signal::Buy);
        assert_eq!(rec.confidence_score, 0.82);
    }

    #[tokio::test]
    async fn test_fallback_text_json() {
        let mut provider = MockProvider::new();
        provider.expect_complete().returning(|_| {
            Ok(CompletionResponse {
                message: Message::assistant(
                    r#"{"recommendation":"Hold","confidence_score":0.5,"explanation":"Mixed signals."}"#,
                ),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage {
                    input_tokens: 500,
                    output_tokens: 100,
                },
            })
        });

        let rec = agent(provider)
            .recommend("AAPL", &FundamentalSnapshot::default(), &indicator_set())
            .await
            .expect("recommendation");

        assert_eq!(rec.recommendation, Signal::Hold);
    }

    #[tokio::test]
    async fn test_invalid_signal_rejected() {
        let mut provider = MockProvider::new();
        provider.expect_complete().returning(|_| {
            Ok(tool_use_response(serde_json::json!({
                "recommendation": "StrongBuy",
                "confidence_score": 0.9,
                "explanation": "x"
            })))
        });

        let result = agent(provider)
            .recommend("AAPL", &FundamentalSnapshot::default(), &indicator_set())
            .await;

        assert!(matches!(result, Err(AnalystError::Recommendation(_))));
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_rejected() {
        let mut provider = MockProvider::new();
        provider.expect_complete().returning(|_| {
            Ok(tool_use_response(serde_json::json!({
                "recommendation": "Sell",
                "confidence_score": 1.4,
                "explanation": "x"
            })))
        });

        let result = agent(provider)
            .recommend("AAPL", &FundamentalSnapshot::default(), &indicator_set())
            .await;

        assert!(matches!(result, Err(AnalystError::Recommendation(_))));
    }

    #[tokio::test]
    async fn test_unstructured_answer_rejected() {
        let mut provider = MockProvider::new();
        provider.expect_complete().returning(|_| {
            Ok(CompletionResponse {
                message: Message::assistant("I think you should buy."),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage {
                    input_tokens: 500,
                    output_tokens: 10,
                },
            })
        });

        let result = agent(provider)
            .recommend("AAPL", &FundamentalSnapshot::default(), &indicator_set())
            .await;

        assert!(matches!(result, Err(AnalystError::Recommendation(_))));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .returning(|_| Err(LlmError::AuthenticationFailed));

        let result = agent(provider)
            .recommend("AAPL", &FundamentalSnapshot::default(), &indicator_set())
            .await;

        assert!(matches!(result, Err(AnalystError::Llm(_))));
    }

    #[test]
    fn test_signal_serialization_literals() {
        assert_eq!(serde_json::to_string(&Signal::Buy).expect("json"), "\"Buy\"");
        assert_eq!(serde_json::to_string(&Signal::Hold).expect("json"), "\"Hold\"");
        assert_eq!(serde_json::to_string(&Signal::Sell).expect("json"), "\"Sell\"");
    }
}
