//! Conversation message types.

use std::str::FromStr;
use std::sync::Arc;

use jiff::Timestamp;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::model::Model;
use crate::{Error, Result};

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
    /// Message from a human user.
    User,
    /// System prompt.
    System,
    /// Assistant response.
    Assistant,
}

impl MessageRole {
    /// Parses a role name, rejecting anything outside the closed set.
    pub fn parse(role: &str) -> Result<Self> {
        Self::from_str(role)
            .map_err(|_| Error::validation("role", format!("unknown role '{role}'")))
    }
}

/// One immutable turn in a conversation.
///
/// The token count is computed exactly once, when the message is built, using
/// the tokenizer of the model it targets.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Unique message ID.
    id: Uuid,

    /// Message role.
    role: MessageRole,

    /// Message content.
    content: String,

    /// Token cost of `content` under `model`.
    token_count: usize,

    /// Model the message was priced for.
    #[serde(serialize_with = "serialize_model_name")]
    model: Arc<Model>,

    /// When the message was created.
    created_at: Timestamp,
}

impl Message {
    /// Creates a message, pricing `content` with the model's tokenizer.
    pub fn new(role: MessageRole, content: impl Into<String>, model: Arc<Model>) -> Result<Self> {
        Self::from_parts(Uuid::now_v7(), role, content, model, Timestamp::now())
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>, model: Arc<Model>) -> Result<Self> {
        Self::new(MessageRole::System, content, model)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>, model: Arc<Model>) -> Result<Self> {
        Self::new(MessageRole::User, content, model)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>, model: Arc<Model>) -> Result<Self> {
        Self::new(MessageRole::Assistant, content, model)
    }

    /// Rebuilds a message from previously recorded parts.
    ///
    /// The token count is recomputed rather than trusted, and the result goes
    /// through the same validation as a freshly created message.
    pub fn from_parts(
        id: Uuid,
        role: MessageRole,
        content: impl Into<String>,
        model: Arc<Model>,
        created_at: Timestamp,
    ) -> Result<Self> {
        let content = content.into();
        let token_count = model.count_tokens(&content);
        let message = Self {
            id,
            role,
            content,
            token_count,
            model,
            created_at,
        };

        message.validate()?;
        Ok(message)
    }

    /// Checks the field constraints of this message.
    pub fn validate(&self) -> Result<()> {
        if self.content.is_empty() {
            return Err(Error::validation("content", "must not be empty"));
        }
        if self.created_at == Timestamp::UNIX_EPOCH {
            return Err(Error::validation("created_at", "must be set"));
        }
        Ok(())
    }

    /// Returns the message ID.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the message role.
    pub fn role(&self) -> MessageRole {
        self.role
    }

    /// Returns the message content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the token cost of this message.
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Returns the model this message was priced for.
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Returns when the message was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

fn serialize_model_name<S>(
    model: &Arc<Model>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(model.name())
}
