#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod conversation;
mod error;
pub mod message;
pub mod model;
pub mod prelude;
pub mod tokenizer;

pub use conversation::{
    Conversation, ConversationStatus, GenerationConfig, GenerationConfigBuilder,
};
pub use error::{Error, Result};
pub use message::{Message, MessageRole};
pub use model::{KnownModel, Model, ModelConfig};

/// Tracing target for the main library.
pub const TRACING_TARGET: &str = "parley_chat";
