//! Configuration for the financial analyst

use crate::error::{AnalystError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Default Groq model used for recommendations
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Sampling temperature; 0.0 favors the most-probable completion path so
/// repeated calls with identical input stay as stable as hosted inference allows
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Placeholder value sometimes left in place of a real key
const PLACEHOLDER_KEY: &str = "YOUR_GROQ_API_KEY_HERE";

/// Configuration for the analysis pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystConfig {
    /// Groq API key; `None` means the recommendation step is unavailable
    pub groq_api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Override for the LLM API base URL (any OpenAI-compatible endpoint)
    pub api_base: Option<String>,

    /// Days of price history to fetch; must cover the 200-day SMA window
    pub history_days: i64,

    /// Request timeout for outbound HTTP calls
    pub request_timeout: Duration,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            api_base: None,
            history_days: 730,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl AnalystConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalystConfigBuilder {
        AnalystConfigBuilder::default()
    }

    /// Load configuration from the environment
    ///
    /// Reads `GROQ_API_KEY`, `GROQ_MODEL`, and `GROQ_API_BASE`. A missing or
    /// placeholder key degrades startup with a warning rather than failing:
    /// data fetching and indicators still work, only the recommendation step
    /// will report a configuration error.
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Whether a usable API key is configured
    pub fn has_api_key(&self) -> bool {
        self.groq_api_key.is_some()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(AnalystError::Config("model must not be empty".to_string()));
        }

        if self.history_days < 200 {
            return Err(AnalystError::Config(
                "history_days must cover the 200-day SMA window".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(AnalystError::Config(
                "temperature must lie in [0.0, 1.0]".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AnalystConfig
#[derive(Debug, Default)]
pub struct AnalystConfigBuilder {
    groq_api_key: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    api_base: Option<String>,
    history_days: Option<i64>,
    request_timeout: Option<Duration>,
}

impl AnalystConfigBuilder {
    /// Set the Groq API key
    pub fn groq_api_key(mut self, key: impl Into<String>) -> Self {
        self.groq_api_key = Some(key.into());
        self
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the LLM API base URL
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the days of price history to fetch
    pub fn history_days(mut self, days: i64) -> Self {
        self.history_days = Some(days);
        self
    }

    /// Set the outbound request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Load values from the environment
    pub fn with_env(mut self) -> Self {
        match std::env::var("GROQ_API_KEY") {
            Ok(key) if !key.trim().is_empty() && key != PLACEHOLDER_KEY => {
                self.groq_api_key = Some(key);
            }
            _ => {
                warn!(
                    "GROQ_API_KEY is not configured; recommendations will be unavailable. \
                     Set it in the environment to enable the recommendation step."
                );
            }
        }

        if let Ok(model) = std::env::var("GROQ_MODEL") {
            self.model = Some(model);
        }

        if let Ok(base) = std::env::var("GROQ_API_BASE") {
            self.api_base = Some(base);
        }

        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalystConfig> {
        let defaults = AnalystConfig::default();

        let config = AnalystConfig {
            groq_api_key: self.groq_api_key,
            model: self.model.unwrap_or(defaults.model),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            api_base: self.api_base,
            history_days: self.history_days.unwrap_or(defaults.history_days),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalystConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.0);
        assert!(!config.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AnalystConfig::builder()
            .groq_api_key("gsk-test")
            .model("llama-3.1-8b-instant")
            .history_days(365)
            .build()
            .expect("config");

        assert!(config.has_api_key());
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.history_days, 365);
    }

    #[test]
    fn test_validation_short_history() {
        let result = AnalystConfig::builder().history_days(100).build();
        assert!(matches!(result, Err(AnalystError::Config(_))));
    }

    #[test]
    fn test_validation_empty_model() {
        let result = AnalystConfig::builder().model("  ").build();
        assert!(matches!(result, Err(AnalystError::Config(_))));
    }

    #[test]
    fn test_validation_temperature_range() {
        let result = AnalystConfig::builder().temperature(1.5).build();
        assert!(matches!(result, Err(AnalystError::Config(_))));
    }
}
