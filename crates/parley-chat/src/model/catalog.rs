//! Catalog of well-known chat models and their context windows.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// A chat model with a published context window.
///
/// Names match the provider's model identifiers; [`context_window`] is the
/// total token budget the model accepts per call.
///
/// [`context_window`]: KnownModel::context_window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum KnownModel {
    /// OpenAI GPT-4o, 128k window.
    #[strum(serialize = "gpt-4o")]
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    /// OpenAI GPT-4o mini, 128k window.
    #[strum(serialize = "gpt-4o-mini")]
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    /// OpenAI GPT-4 Turbo, 128k window.
    #[strum(serialize = "gpt-4-turbo")]
    #[serde(rename = "gpt-4-turbo")]
    Gpt4Turbo,
    /// OpenAI GPT-4, 8k window.
    #[strum(serialize = "gpt-4")]
    #[serde(rename = "gpt-4")]
    Gpt4,
    /// OpenAI GPT-3.5 Turbo, 16k window.
    #[strum(serialize = "gpt-3.5-turbo")]
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    /// OpenAI o1, 200k window.
    #[strum(serialize = "o1")]
    #[serde(rename = "o1")]
    O1,
    /// OpenAI o3-mini, 200k window.
    #[strum(serialize = "o3-mini")]
    #[serde(rename = "o3-mini")]
    O3Mini,
    /// Anthropic Claude Opus 4, 200k window.
    #[strum(serialize = "claude-opus-4-20250514")]
    #[serde(rename = "claude-opus-4-20250514")]
    ClaudeOpus4,
    /// Anthropic Claude Sonnet 4, 200k window.
    #[strum(serialize = "claude-sonnet-4-20250514")]
    #[serde(rename = "claude-sonnet-4-20250514")]
    ClaudeSonnet4,
    /// Anthropic Claude 3.5 Haiku, 200k window.
    #[strum(serialize = "claude-3-5-haiku-20241022")]
    #[serde(rename = "claude-3-5-haiku-20241022")]
    ClaudeHaiku35,
    /// Google Gemini 2.0 Flash, 1M window.
    #[strum(serialize = "gemini-2.0-flash")]
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,
    /// Google Gemini 1.5 Pro, 2M window.
    #[strum(serialize = "gemini-1.5-pro")]
    #[serde(rename = "gemini-1.5-pro")]
    Gemini15Pro,
}

impl KnownModel {
    /// Returns the model identifier string.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Returns the maximum number of context tokens the model accepts.
    pub fn context_window(&self) -> usize {
        match self {
            Self::Gpt4o | Self::Gpt4oMini | Self::Gpt4Turbo => 128_000,
            Self::Gpt4 => 8_192,
            Self::Gpt35Turbo => 16_385,
            Self::O1 | Self::O3Mini => 200_000,
            Self::ClaudeOpus4 | Self::ClaudeSonnet4 | Self::ClaudeHaiku35 => 200_000,
            Self::Gemini20Flash => 1_048_576,
            Self::Gemini15Pro => 2_097_152,
        }
    }
}
