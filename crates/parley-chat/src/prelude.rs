//! Convenient re-exports for common use.

pub use crate::conversation::{
    Conversation, ConversationStatus, GenerationConfig, GenerationConfigBuilder,
};
pub use crate::error::{Error, Result};
pub use crate::message::{Message, MessageRole};
pub use crate::model::{KnownModel, Model, ModelConfig};
#[cfg(feature = "tiktoken")]
pub use crate::tokenizer::TiktokenTokenizer;
pub use crate::tokenizer::{HeuristicTokenizer, SharedTokenizer, Tokenizer};
