//! Parsed chat completion responses
//!
//! Parsing is lenient about absent fields (`usage` and `created` become
//! `None`, a missing `choices` array becomes empty) but rebuilds every
//! message through [`PromptMessage::new`], so unknown roles and null content
//! are rejected.

use crate::error::{ModgenError, Result};
use crate::providers::{PromptMessage, Role};
use serde::Serialize;
use serde_json::Value;

/// Token usage metrics returned by the API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Usage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u64,
    /// Number of tokens in the completion
    pub completion_tokens: u64,
    /// Total tokens used
    pub total_tokens: u64,
}

impl Usage {
    /// Parse a usage object; absent or non-numeric counters read as zero
    pub fn from_value(value: &Value) -> Self {
        let counter = |key: &str| value.get(key).and_then(Value::as_u64).unwrap_or(0);
        Self {
            prompt_tokens: counter("prompt_tokens"),
            completion_tokens: counter("completion_tokens"),
            total_tokens: counter("total_tokens"),
        }
    }
}

/// A single choice returned by a chat completion response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    /// Position of the choice in the response
    pub index: u32,
    /// Reconstructed message
    pub message: PromptMessage,
    /// Why generation stopped, when reported
    pub finish_reason: Option<String>,
}

impl Choice {
    /// Parse a choice object
    ///
    /// A missing role defaults to `assistant` and missing content becomes the
    /// empty string. Explicit null content is rejected like any other
    /// message.
    ///
    /// # Errors
    ///
    /// Returns `ModgenError::PromptValidation` for an unknown role or null
    /// content.
    pub fn from_value(value: &Value) -> Result<Self> {
        let message = value.get("message").unwrap_or(&Value::Null);
        let role = match message.get("role").and_then(Value::as_str) {
            Some(role) => role.parse()?,
            None => Role::Assistant,
        };
        let content = message
            .get("content")
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()));
        let mut reconstructed = PromptMessage::new(role, content)?;
        if let Some(name) = message.get("name").and_then(Value::as_str) {
            reconstructed = reconstructed.with_name(name);
        }

        let index = value
            .get("index")
            .and_then(Value::as_u64)
            .and_then(|i| u32::try_from(i).ok())
            .unwrap_or(0);

        Ok(Self {
            index,
            message: reconstructed,
            finish_reason: value
                .get("finish_reason")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// Structured representation of a chat completion response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResponse {
    /// Response identifier
    pub id: String,
    /// Model that produced the response
    pub model: String,
    /// Ordered choices
    pub choices: Vec<Choice>,
    /// Token usage, when reported
    pub usage: Option<Usage>,
    /// Creation time in epoch seconds, when reported
    pub created: Option<i64>,
}

impl ChatResponse {
    /// Parse a decoded response body
    ///
    /// # Errors
    ///
    /// - `ModgenError::Serialization` if the body is not a JSON object or
    ///   `choices` is present but not an array
    /// - `ModgenError::PromptValidation` if a choice carries an unknown role
    ///
    /// # Examples
    ///
    /// ```
    /// use modgen::providers::ChatResponse;
    /// use serde_json::json;
    ///
    /// let response = ChatResponse::from_value(&json!({
    ///     "id": "chatcmpl-1",
    ///     "model": "gpt-test",
    ///     "choices": []
    /// }))
    /// .unwrap();
    /// assert!(response.usage.is_none());
    /// assert!(response.first_message().is_none());
    /// ```
    pub fn from_value(payload: &Value) -> Result<Self> {
        if !payload.is_object() {
            return Err(ModgenError::Serialization(
                "Chat completion response must be a JSON object".to_string(),
            ));
        }

        let choices = match payload.get("choices") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(Choice::from_value)
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(ModgenError::Serialization(
                    "Chat completion 'choices' must be an array".to_string(),
                ))
            }
        };

        let usage = payload
            .get("usage")
            .filter(|u| u.is_object())
            .map(Usage::from_value);

        Ok(Self {
            id: text_field(payload, "id"),
            model: text_field(payload, "model"),
            choices,
            usage,
            created: payload.get("created").and_then(Value::as_i64),
        })
    }

    /// First available message from the choices
    pub fn first_message(&self) -> Option<&PromptMessage> {
        self.choices.first().map(|choice| &choice.message)
    }
}

fn text_field(payload: &Value, key: &str) -> String {
    match payload.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
