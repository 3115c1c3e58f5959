//! Exact BPE token counting backed by `tiktoken-rs`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tiktoken_rs::CoreBPE;
use tiktoken_rs::tokenizer::{Tokenizer as Encoding, get_tokenizer};

use super::Tokenizer;
use crate::{Error, Result, TRACING_TARGET};

/// Counts tokens with the BPE encoding of whichever model is asked about.
///
/// The encoding is resolved from the model name on every call and loaded at
/// most once per encoding, so one instance can be shared between models.
/// Names `tiktoken-rs` does not recognise are counted with `cl100k_base`.
pub struct TiktokenTokenizer {
    fallback: Arc<CoreBPE>,
    encodings: RwLock<HashMap<Encoding, Arc<CoreBPE>>>,
}

impl TiktokenTokenizer {
    /// Creates a tokenizer with `cl100k_base` loaded.
    pub fn new() -> Result<Self> {
        let fallback = tiktoken_rs::cl100k_base().map_err(|e| {
            Error::validation("tokenizer", format!("failed to load cl100k_base: {e}"))
        })?;
        let fallback = Arc::new(fallback);
        let encodings = HashMap::from([(Encoding::Cl100kBase, fallback.clone())]);

        Ok(Self {
            fallback,
            encodings: RwLock::new(encodings),
        })
    }

    /// Creates a tokenizer with the encoding of `model_name` already loaded.
    pub fn for_model(model_name: &str) -> Result<Self> {
        let tokenizer = Self::new()?;
        tokenizer.encoding(model_name);
        Ok(tokenizer)
    }

    /// Returns the encoding for `model_name`, loading it on first use.
    fn encoding(&self, model_name: &str) -> Arc<CoreBPE> {
        let Some(kind) = get_tokenizer(model_name) else {
            tracing::trace!(
                target: TRACING_TARGET,
                model = model_name,
                "no tiktoken encoding for model, using cl100k_base"
            );
            return self.fallback.clone();
        };

        let cached = self
            .encodings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned();
        if let Some(encoding) = cached {
            return encoding;
        }

        let encoding = match tiktoken_rs::get_bpe_from_tokenizer(kind) {
            Ok(encoding) => Arc::new(encoding),
            Err(e) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    model = model_name,
                    error = %e,
                    "failed to load tiktoken encoding, using cl100k_base"
                );
                return self.fallback.clone();
            }
        };

        self.encodings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_insert(encoding)
            .clone()
    }
}

impl fmt::Debug for TiktokenTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaded = self
            .encodings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("TiktokenTokenizer")
            .field("loaded_encodings", &loaded)
            .finish_non_exhaustive()
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, model_name: &str, text: &str) -> usize {
        self.encoding(model_name)
            .encode_with_special_tokens(text)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use crate::tokenizer::SharedTokenizer;

    const MIXED: &str = "Привет, мир! こんにちは世界. Hello, world! 你好，世界";

    fn exact(model_name: &str, text: &str) -> usize {
        tiktoken_rs::get_bpe_from_model(model_name)
            .unwrap()
            .encode_with_special_tokens(text)
            .len()
    }

    #[test]
    fn counts_known_model() {
        let tokenizer = TiktokenTokenizer::for_model("gpt-4o").unwrap();

        assert_eq!(tokenizer.count_tokens("gpt-4o", ""), 0);
        assert_eq!(
            tokenizer.count_tokens("gpt-4o", "Hello, world!"),
            exact("gpt-4o", "Hello, world!")
        );
    }

    #[test]
    fn unknown_model_uses_cl100k() {
        let tokenizer = TiktokenTokenizer::new().unwrap();

        assert_eq!(
            tokenizer.count_tokens("not-a-real-model", MIXED),
            exact("gpt-4", MIXED)
        );
    }

    #[test]
    fn shared_instance_prices_each_model_with_its_own_encoding() {
        let shared: SharedTokenizer =
            Arc::new(TiktokenTokenizer::for_model("gpt-3.5-turbo").unwrap());
        let gpt35 =
            Model::with_shared_tokenizer("gpt-3.5-turbo", 16_385, shared.clone()).unwrap();
        let gpt4o = Model::with_shared_tokenizer("gpt-4o", 128_000, shared).unwrap();

        assert_eq!(gpt35.count_tokens(MIXED), exact("gpt-3.5-turbo", MIXED));
        assert_eq!(gpt4o.count_tokens(MIXED), exact("gpt-4o", MIXED));
    }

    #[test]
    fn repeated_calls_reuse_the_cached_encoding() {
        let tokenizer = TiktokenTokenizer::new().unwrap();

        let first = tokenizer.count_tokens("gpt-4o", MIXED);
        let second = tokenizer.count_tokens("gpt-4o", MIXED);

        assert_eq!(first, second);
        assert_eq!(tokenizer.encodings.read().unwrap().len(), 2);
    }
}
