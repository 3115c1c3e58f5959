//! Token-budgeted conversation state.
//!
//! A [`Conversation`] keeps a sliding window of live messages whose combined
//! token cost stays within the model's context ceiling. When a new message
//! does not fit, the oldest live messages are evicted, strictly first-in
//! first-out, into a discard log that is kept for audit.
//!
//! ## Submodules
//!
//! - [`config`] - generation parameters and their validating builder

pub mod config;

use std::collections::VecDeque;

pub use config::{GenerationConfig, GenerationConfigBuilder};
use jiff::Timestamp;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::message::Message;
use crate::{Error, Result, TRACING_TARGET};

/// Lifecycle state of a conversation.
///
/// `Active` is the only initial state; `Ended` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConversationStatus {
    /// Accepting new messages.
    #[default]
    Active,
    /// Closed; no further messages are admitted.
    Ended,
}

/// A single conversation's message history under a token budget.
///
/// Live messages are kept in insertion order. `token_usage` is always the sum
/// of their token counts once a mutating call returns.
///
/// The type has no internal synchronization; hosts that share a conversation
/// between tasks must guard it themselves.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    /// Unique conversation ID.
    id: Uuid,

    /// Owning user.
    user_id: String,

    /// Lifecycle state.
    status: ConversationStatus,

    /// Generation parameters, including the model and its ceiling.
    config: GenerationConfig,

    /// First message admitted, retained even after eviction.
    initial_message: Message,

    /// Messages inside the context window, oldest first.
    messages: VecDeque<Message>,

    /// Messages evicted from the window, in eviction order.
    discarded: Vec<Message>,

    /// Cached sum of live token counts.
    token_usage: usize,

    /// When the conversation was created.
    created_at: Timestamp,
}

impl Conversation {
    /// Starts a conversation with its initial (usually system) message.
    ///
    /// The message goes through the regular admission path, then the whole
    /// conversation is validated. No value is returned on failure.
    pub fn new(
        user_id: impl Into<String>,
        initial_message: Message,
        config: GenerationConfig,
    ) -> Result<Self> {
        let mut conversation = Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            status: ConversationStatus::Active,
            config,
            initial_message: initial_message.clone(),
            messages: VecDeque::new(),
            discarded: Vec::new(),
            token_usage: 0,
            created_at: Timestamp::now(),
        };

        conversation.add_message(initial_message)?;
        conversation.validate()?;

        tracing::debug!(
            target: TRACING_TARGET,
            conversation_id = %conversation.id,
            model = conversation.config.model().name(),
            token_usage = conversation.token_usage,
            "conversation started"
        );

        Ok(conversation)
    }

    /// Checks the conversation-level constraints.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.is_empty() {
            return Err(Error::validation("user_id", "must not be empty"));
        }
        self.config.validate()
    }

    /// Admits a message, evicting the oldest live messages until it fits.
    ///
    /// The message must have been priced for this conversation's model;
    /// counts from another tokenizer are not comparable with its ceiling.
    /// A message that exceeds the ceiling on its own still ends up alone in
    /// the window, leaving `token_usage` above the ceiling.
    pub fn add_message(&mut self, message: Message) -> Result<()> {
        if self.is_ended() {
            return Err(Error::conversation_ended(self.id));
        }

        let model = self.config.model();
        if message.model().name() != model.name() {
            return Err(Error::validation(
                "model",
                format!(
                    "message was priced for '{}', conversation uses '{}'",
                    message.model().name(),
                    model.name()
                ),
            ));
        }

        let ceiling = model.max_tokens();
        while ceiling < message.token_count() + self.token_usage {
            let Some(evicted) = self.messages.pop_front() else {
                break;
            };

            tracing::debug!(
                target: TRACING_TARGET,
                conversation_id = %self.id,
                message_id = %evicted.id(),
                tokens = evicted.token_count(),
                "evicted message from context window"
            );

            self.discarded.push(evicted);
            self.refresh_token_usage();
        }

        if message.token_count() > ceiling {
            tracing::warn!(
                target: TRACING_TARGET,
                conversation_id = %self.id,
                message_id = %message.id(),
                tokens = message.token_count(),
                ceiling,
                "message exceeds the context window on its own"
            );
        }

        tracing::trace!(
            target: TRACING_TARGET,
            conversation_id = %self.id,
            message_id = %message.id(),
            role = %message.role(),
            tokens = message.token_count(),
            "admitted message"
        );

        self.messages.push_back(message);
        self.refresh_token_usage();
        Ok(())
    }

    /// Recomputes `token_usage` from the live messages.
    pub fn refresh_token_usage(&mut self) {
        self.token_usage = self.messages.iter().map(Message::token_count).sum();
    }

    /// Ends the conversation. Calling it again has no effect.
    pub fn end(&mut self) {
        if self.is_ended() {
            return;
        }

        self.status = ConversationStatus::Ended;
        tracing::debug!(
            target: TRACING_TARGET,
            conversation_id = %self.id,
            live = self.messages.len(),
            discarded = self.discarded.len(),
            "conversation ended"
        );
    }

    /// Returns the conversation ID.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the owning user ID.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns the lifecycle state.
    pub fn status(&self) -> ConversationStatus {
        self.status
    }

    /// Returns true once [`end`](Self::end) has been called.
    pub fn is_ended(&self) -> bool {
        self.status == ConversationStatus::Ended
    }

    /// Returns the generation parameters.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Returns the message the conversation was started with.
    pub fn initial_message(&self) -> &Message {
        &self.initial_message
    }

    /// Returns the live messages, oldest first.
    pub fn messages(&self) -> &VecDeque<Message> {
        &self.messages
    }

    /// Returns the number of live messages.
    pub fn count_messages(&self) -> usize {
        self.messages.len()
    }

    /// Returns evicted messages in the order they left the window.
    pub fn discarded_messages(&self) -> &[Message] {
        &self.discarded
    }

    /// Returns the token cost of the live messages.
    pub fn token_usage(&self) -> usize {
        self.token_usage
    }

    /// Returns how many tokens are left before the ceiling.
    pub fn remaining_tokens(&self) -> usize {
        self.config
            .model()
            .max_tokens()
            .saturating_sub(self.token_usage)
    }

    /// Returns when the conversation was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
