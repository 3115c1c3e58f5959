//! Model selection configuration.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use super::{KnownModel, Model};
use crate::tokenizer::Tokenizer;
use crate::{Error, Result};

/// Which model a conversation targets and how large its window is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ModelConfig {
    /// Model identifier.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "PARLEY_MODEL_NAME", default_value = "gpt-4o-mini")
    )]
    pub model_name: String,

    /// Context-window override in tokens.
    ///
    /// Required for models outside the built-in catalog.
    #[cfg_attr(feature = "config", arg(long, env = "PARLEY_MODEL_MAX_TOKENS"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_name: KnownModel::Gpt4oMini.to_string(),
            max_tokens: None,
        }
    }
}

impl ModelConfig {
    /// Creates a configuration for the given model name.
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            max_tokens: None,
        }
    }

    /// Overrides the context window.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Builds the model, resolving the ceiling from the override or the catalog.
    pub fn build_model(&self, tokenizer: impl Tokenizer + 'static) -> Result<Model> {
        match self.max_tokens {
            Some(max_tokens) => Model::new(&self.model_name, max_tokens, tokenizer),
            None => Model::from_name(&self.model_name, tokenizer).map_err(|_| {
                Error::validation(
                    "max_tokens",
                    format!(
                        "model '{}' is not in the catalog, set max_tokens explicitly",
                        self.model_name
                    ),
                )
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::HeuristicTokenizer;

    #[test]
    fn default_config_builds_catalog_model() {
        let model = ModelConfig::default()
            .build_model(HeuristicTokenizer::default())
            .unwrap();

        assert_eq!(model.name(), "gpt-4o-mini");
        assert_eq!(model.max_tokens(), 128_000);
    }

    #[test]
    fn override_wins_over_catalog() {
        let model = ModelConfig::new("gpt-4o")
            .with_max_tokens(1_000)
            .build_model(HeuristicTokenizer::default())
            .unwrap();

        assert_eq!(model.max_tokens(), 1_000);
    }

    #[test]
    fn unknown_model_needs_override() {
        let err = ModelConfig::new("local-llama")
            .build_model(HeuristicTokenizer::default())
            .unwrap_err();
        assert_eq!(err.field(), Some("max_tokens"));

        let model = ModelConfig::new("local-llama")
            .with_max_tokens(4096)
            .build_model(HeuristicTokenizer::default())
            .unwrap();
        assert_eq!(model.name(), "local-llama");
    }

    #[test]
    fn deserializes_without_override() {
        let config: ModelConfig =
            serde_json::from_str(r#"{ "model_name": "gpt-4" }"#).unwrap();

        assert_eq!(config, ModelConfig::new("gpt-4"));
    }
}
