//! Model references: name, context ceiling and tokenizer.
//!
//! A [`Model`] is the read-only capability shared by every message and
//! conversation that targets it. It answers two questions consistently:
//! how many tokens a piece of text costs, and how many tokens fit in one call.
//!
//! - [`Model`] - name, context ceiling and tokenizer
//! - [`KnownModel`] - catalog of well-known models and their context windows
//! - [`ModelConfig`] - serializable (and optionally CLI-driven) model selection

mod catalog;
mod config;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use catalog::KnownModel;
pub use config::ModelConfig;
use serde::Serialize;

use crate::tokenizer::{SharedTokenizer, Tokenizer};
use crate::{Error, Result};

/// A language model as seen by the conversation core.
///
/// Immutable after construction and safe to share between threads; wrap it
/// in an [`Arc`] and hand clones to every message and config that targets it.
#[derive(Clone, Serialize)]
pub struct Model {
    /// Model identifier passed to the tokenizer.
    name: String,

    /// Maximum number of context tokens accepted across all live messages.
    max_tokens: usize,

    /// Tokenizer used to price message content.
    #[serde(skip)]
    tokenizer: SharedTokenizer,
}

impl Model {
    /// Creates a model with an explicit context ceiling.
    pub fn new(
        name: impl Into<String>,
        max_tokens: usize,
        tokenizer: impl Tokenizer + 'static,
    ) -> Result<Self> {
        Self::with_shared_tokenizer(name, max_tokens, Arc::new(tokenizer))
    }

    /// Creates a model that shares an existing tokenizer.
    pub fn with_shared_tokenizer(
        name: impl Into<String>,
        max_tokens: usize,
        tokenizer: SharedTokenizer,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::validation("model_name", "must not be empty"));
        }
        if max_tokens == 0 {
            return Err(Error::validation("max_tokens", "must be greater than 0"));
        }

        Ok(Self {
            name,
            max_tokens,
            tokenizer,
        })
    }

    /// Creates a model from the catalog, using its published context window.
    pub fn known(model: KnownModel, tokenizer: impl Tokenizer + 'static) -> Self {
        Self {
            name: model.to_string(),
            max_tokens: model.context_window(),
            tokenizer: Arc::new(tokenizer),
        }
    }

    /// Resolves a catalog model by name.
    pub fn from_name(name: &str, tokenizer: impl Tokenizer + 'static) -> Result<Self> {
        let known = KnownModel::from_str(name)
            .map_err(|_| Error::validation("model_name", format!("unknown model '{name}'")))?;
        Ok(Self::known(known, tokenizer))
    }

    /// Returns the model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the context-window ceiling in tokens.
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Returns the shared tokenizer.
    pub fn tokenizer(&self) -> &SharedTokenizer {
        &self.tokenizer
    }

    /// Counts the tokens `text` costs for this model.
    pub fn count_tokens(&self, text: &str) -> usize {
        self.tokenizer.count_tokens(&self.name, text)
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}
