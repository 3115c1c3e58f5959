//! Character-ratio token estimation.

use super::Tokenizer;

/// Default characters per token (typical for English text).
pub const DEFAULT_CHARS_PER_TOKEN: f64 = 4.0;

/// Estimates tokens as `ceil(chars / chars_per_token)`.
///
/// The model name is ignored. Empty text costs zero tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicTokenizer {
    chars_per_token: f64,
}

impl HeuristicTokenizer {
    /// Creates a tokenizer with a custom characters-per-token ratio.
    ///
    /// Ratios that are not strictly positive fall back to
    /// [`DEFAULT_CHARS_PER_TOKEN`].
    pub fn new(chars_per_token: f64) -> Self {
        let chars_per_token = if chars_per_token > 0.0 {
            chars_per_token
        } else {
            DEFAULT_CHARS_PER_TOKEN
        };
        Self { chars_per_token }
    }

    /// Returns the characters-per-token ratio in use.
    pub fn chars_per_token(&self) -> f64 {
        self.chars_per_token
    }
}

impl Default for HeuristicTokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_CHARS_PER_TOKEN)
    }
}

impl Tokenizer for HeuristicTokenizer {
    fn count_tokens(&self, _model_name: &str, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        let chars = text.chars().count() as f64;
        (chars / self.chars_per_token).ceil() as usize
    }
}
