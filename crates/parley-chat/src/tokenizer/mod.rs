//! Token counting seam.
//!
//! Every message is priced once, at construction, by the tokenizer attached to
//! its [`Model`](crate::model::Model). Implementations must be deterministic
//! and pure: the same model name and text always yield the same count.
//!
//! - [`HeuristicTokenizer`] - character-ratio estimate, no dependencies
//! - `TiktokenTokenizer` - exact BPE counts (requires the `tiktoken` feature)

mod heuristic;
#[cfg(feature = "tiktoken")]
mod tiktoken;

use std::fmt;
use std::sync::Arc;

pub use heuristic::{DEFAULT_CHARS_PER_TOKEN, HeuristicTokenizer};
#[cfg(feature = "tiktoken")]
#[cfg_attr(docsrs, doc(cfg(feature = "tiktoken")))]
pub use tiktoken::TiktokenTokenizer;

/// Converts text into a token count for a given model.
pub trait Tokenizer: fmt::Debug + Send + Sync {
    /// Counts the tokens `text` costs when sent to `model_name`.
    fn count_tokens(&self, model_name: &str, text: &str) -> usize;
}

/// Arc-wrapped tokenizer for sharing between models.
pub type SharedTokenizer = Arc<dyn Tokenizer>;
