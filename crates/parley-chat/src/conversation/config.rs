//! Generation parameters attached to a conversation.

use std::sync::Arc;

use derive_builder::Builder;
use serde::Serialize;

use crate::error::check_range;
use crate::model::Model;
use crate::{Error, Result};

/// Sampling and length parameters for responses in a conversation.
///
/// Built through [`GenerationConfigBuilder`], which validates every bound
/// before handing out a value. Fields are read-only; changing a config means
/// going back through [`into_builder`](Self::into_builder), which validates
/// again on `build`.
#[derive(Debug, Clone, Builder, Serialize)]
#[builder(
    name = "GenerationConfigBuilder",
    pattern = "owned",
    setter(strip_option, prefix = "with"),
    build_fn(private, name = "build_inner", error = "derive_builder::UninitializedFieldError")
)]
pub struct GenerationConfig {
    /// Model providing the context ceiling and tokenizer.
    model: Arc<Model>,

    /// Sampling temperature, 0 to 2. Lower is more deterministic.
    #[builder(default = "1.0")]
    temperature: f32,

    /// Nucleus sampling mass, 0 to 1.
    #[builder(default = "1.0")]
    top_p: f32,

    /// Number of candidate responses to generate.
    #[builder(default = "1")]
    candidate_count: u32,

    /// Sequences that stop generation, in priority order.
    #[builder(default)]
    stop_sequences: Vec<String>,

    /// Per-response token cap.
    #[builder(default)]
    max_tokens: Option<u32>,

    /// Penalty for tokens that already appeared, -2 to 2.
    #[builder(default = "0.0")]
    presence_penalty: f32,

    /// Penalty proportional to token frequency so far, -2 to 2.
    #[builder(default = "0.0")]
    frequency_penalty: f32,
}

impl GenerationConfigBuilder {
    /// Sets or clears the per-response token cap.
    pub fn max_tokens_opt(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Builds and validates the config.
    pub fn build(self) -> Result<GenerationConfig> {
        let config = self.build_inner()?;
        config.validate()?;
        Ok(config)
    }
}

impl GenerationConfig {
    /// Creates a new config builder.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder::default()
    }

    /// Creates a config with default parameters for `model`.
    pub fn new(model: impl Into<Arc<Model>>) -> Self {
        Self {
            model: model.into(),
            temperature: 1.0,
            top_p: 1.0,
            candidate_count: 1,
            stop_sequences: Vec::new(),
            max_tokens: None,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
        }
    }

    /// Returns a builder seeded with this config's values.
    pub fn into_builder(self) -> GenerationConfigBuilder {
        GenerationConfigBuilder::default()
            .with_model(self.model)
            .with_temperature(self.temperature)
            .with_top_p(self.top_p)
            .with_candidate_count(self.candidate_count)
            .with_stop_sequences(self.stop_sequences)
            .with_presence_penalty(self.presence_penalty)
            .with_frequency_penalty(self.frequency_penalty)
            .max_tokens_opt(self.max_tokens)
    }

    /// Returns the model.
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Returns the sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Returns the nucleus sampling mass.
    pub fn top_p(&self) -> f32 {
        self.top_p
    }

    /// Returns the number of candidate responses.
    pub fn candidate_count(&self) -> u32 {
        self.candidate_count
    }

    /// Returns the stop sequences.
    pub fn stop_sequences(&self) -> &[String] {
        &self.stop_sequences
    }

    /// Returns the per-response token cap.
    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    /// Returns the presence penalty.
    pub fn presence_penalty(&self) -> f32 {
        self.presence_penalty
    }

    /// Returns the frequency penalty.
    pub fn frequency_penalty(&self) -> f32 {
        self.frequency_penalty
    }

    /// Checks every parameter against its allowed range.
    pub fn validate(&self) -> Result<()> {
        check_range("temperature", self.temperature, 0.0, 2.0)?;
        check_range("top_p", self.top_p, 0.0, 1.0)?;
        check_range("presence_penalty", self.presence_penalty, -2.0, 2.0)?;
        check_range("frequency_penalty", self.frequency_penalty, -2.0, 2.0)?;

        if self.candidate_count == 0 {
            return Err(Error::validation("candidate_count", "must be at least 1"));
        }

        if let Some(max_tokens) = self.max_tokens {
            if max_tokens == 0 {
                return Err(Error::validation("max_tokens", "must be greater than 0"));
            }
            if max_tokens as usize > self.model.max_tokens() {
                return Err(Error::validation(
                    "max_tokens",
                    format!(
                        "{max_tokens} exceeds the {} token window of '{}'",
                        self.model.max_tokens(),
                        self.model.name()
                    ),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::HeuristicTokenizer;

    fn model() -> Arc<Model> {
        Arc::new(Model::new("test-model", 1_000, HeuristicTokenizer::default()).unwrap())
    }

    #[test]
    fn builder_defaults() {
        let config = GenerationConfig::builder().with_model(model()).build().unwrap();

        assert_eq!(config.temperature(), 1.0);
        assert_eq!(config.top_p(), 1.0);
        assert_eq!(config.candidate_count(), 1);
        assert!(config.stop_sequences().is_empty());
        assert_eq!(config.max_tokens(), None);
        assert_eq!(config.presence_penalty(), 0.0);
        assert_eq!(config.frequency_penalty(), 0.0);
        assert_eq!(config.model().name(), "test-model");
    }

    #[test]
    fn builder_setters() {
        let config = GenerationConfig::builder()
            .with_model(model())
            .with_temperature(0.2)
            .with_top_p(0.9)
            .with_candidate_count(2)
            .with_stop_sequences(vec!["\n\n".to_string()])
            .with_max_tokens(256)
            .with_presence_penalty(-1.5)
            .with_frequency_penalty(1.5)
            .build()
            .unwrap();

        assert_eq!(config.temperature(), 0.2);
        assert_eq!(config.candidate_count(), 2);
        assert_eq!(config.stop_sequences(), ["\n\n".to_string()]);
        assert_eq!(config.max_tokens(), Some(256));
    }

    #[test]
    fn missing_model_is_a_validation_error() {
        let err = GenerationConfig::builder().build().unwrap_err();
        assert_eq!(err.field(), Some("model"));
    }

    #[test]
    fn temperature_bounds() {
        for temperature in [-0.1, 2.01, f32::NAN] {
            let err = GenerationConfig::builder()
                .with_model(model())
                .with_temperature(temperature)
                .build()
                .unwrap_err();
            assert_eq!(err.field(), Some("temperature"));
        }

        assert!(
            GenerationConfig::builder()
                .with_model(model())
                .with_temperature(2.0)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn top_p_bounds() {
        let err = GenerationConfig::builder()
            .with_model(model())
            .with_top_p(1.5)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("top_p"));
    }

    #[test]
    fn penalty_bounds() {
        let err = GenerationConfig::builder()
            .with_model(model())
            .with_presence_penalty(-2.5)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("presence_penalty"));

        let err = GenerationConfig::builder()
            .with_model(model())
            .with_frequency_penalty(3.0)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("frequency_penalty"));
    }

    #[test]
    fn candidate_count_must_be_positive() {
        let err = GenerationConfig::builder()
            .with_model(model())
            .with_candidate_count(0)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("candidate_count"));
    }

    #[test]
    fn max_tokens_must_fit_the_window() {
        let err = GenerationConfig::builder()
            .with_model(model())
            .with_max_tokens(0)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("max_tokens"));

        let err = GenerationConfig::builder()
            .with_model(model())
            .with_max_tokens(1_001)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("max_tokens"));
    }

    #[test]
    fn new_uses_defaults() {
        let config = GenerationConfig::new(model());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn into_builder_keeps_values() {
        let config = GenerationConfig::builder()
            .with_model(model())
            .with_temperature(0.4)
            .with_max_tokens(128)
            .with_stop_sequences(vec!["END".to_string()])
            .build()
            .unwrap();

        let rebuilt = config.into_builder().with_top_p(0.5).build().unwrap();

        assert_eq!(rebuilt.temperature(), 0.4);
        assert_eq!(rebuilt.top_p(), 0.5);
        assert_eq!(rebuilt.max_tokens(), Some(128));
        assert_eq!(rebuilt.stop_sequences(), ["END".to_string()]);
    }

    #[test]
    fn changes_through_into_builder_are_validated() {
        let config = GenerationConfig::new(model());

        let err = config
            .clone()
            .into_builder()
            .with_temperature(2.5)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("temperature"));

        let cleared = config
            .into_builder()
            .max_tokens_opt(None)
            .build()
            .unwrap();
        assert_eq!(cleared.max_tokens(), None);
    }
}
