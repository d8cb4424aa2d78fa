//! Base provider trait and structured prompt types for Modgen
//!
//! This module defines the Provider trait that chat-completion backends
//! implement, along with the validated prompt types sent to them. Prompt
//! values are immutable once built: every constructor validates its input
//! and fails with `ModgenError::PromptValidation` rather than producing a
//! partially valid value.

use crate::error::{ModgenError, Result};
use crate::providers::ChatResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Top-level request keys that `extra_parameters` may not override
pub const RESERVED_PARAMETERS: [&str; 5] = [
    "model",
    "messages",
    "temperature",
    "max_tokens",
    "response_format",
];

/// Chat-completion backend
///
/// Implementations send one request per call; there are no retries.
#[cfg_attr(test, mockall::automock)]
pub trait Provider {
    /// Send a structured prompt and parse the completion response
    fn complete(&self, prompt: &StructuredPrompt) -> Result<ChatResponse>;
}

/// Author of a prompt message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model
    System,
    /// End-user input
    User,
    /// Model output
    Assistant,
    /// Tool results
    Tool,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModgenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "tool" => Ok(Self::Tool),
            other => Err(ModgenError::PromptValidation(format!(
                "Invalid role '{}'. Expected one of system, user, assistant, tool",
                other
            ))),
        }
    }
}

/// A single message that forms part of a chat prompt
///
/// Content may be plain text or structured JSON, but never null.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptMessage {
    role: Role,
    content: Value,
    name: Option<String>,
}

impl PromptMessage {
    /// Create a message
    ///
    /// # Errors
    ///
    /// Returns `ModgenError::PromptValidation` if `content` is JSON null.
    ///
    /// # Examples
    ///
    /// ```
    /// use modgen::providers::{PromptMessage, Role};
    ///
    /// let msg = PromptMessage::new(Role::User, "Say hi").unwrap();
    /// assert_eq!(msg.text(), Some("Say hi"));
    /// assert!(PromptMessage::new(Role::User, serde_json::Value::Null).is_err());
    /// ```
    pub fn new(role: Role, content: impl Into<Value>) -> Result<Self> {
        let content = content.into();
        if content.is_null() {
            return Err(ModgenError::PromptValidation(
                "Prompt message content cannot be null".to_string(),
            ));
        }
        Ok(Self {
            role,
            content,
            name: None,
        })
    }

    /// Create a message from a role name
    ///
    /// # Errors
    ///
    /// Returns `ModgenError::PromptValidation` for an unknown role or null
    /// content.
    pub fn from_parts(role: &str, content: impl Into<Value>) -> Result<Self> {
        Self::new(role.parse()?, content)
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::from_text(Role::System, content)
    }

    /// Creates a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::from_text(Role::User, content)
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::from_text(Role::Assistant, content)
    }

    fn from_text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Value::String(content.into()),
            name: None,
        }
    }

    /// Attach a participant name and return the message
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Role of the author
    pub fn role(&self) -> Role {
        self.role
    }

    /// Raw content
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Content as text, when it is a plain string
    pub fn text(&self) -> Option<&str> {
        self.content.as_str()
    }

    /// Optional participant name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Request representation of the message
    pub fn to_value(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("role".into(), Value::String(self.role.as_str().into()));
        payload.insert("content".into(), self.content.clone());
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            payload.insert("name".into(), Value::String(name.into()));
        }
        Value::Object(payload)
    }
}

impl Serialize for PromptMessage {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// A full structured prompt for the chat completions API
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredPrompt {
    model: String,
    messages: Vec<PromptMessage>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    response_format: Option<Map<String, Value>>,
    extra_parameters: Map<String, Value>,
}

impl StructuredPrompt {
    /// Start building a prompt for `model`
    ///
    /// # Examples
    ///
    /// ```
    /// use modgen::providers::{PromptMessage, StructuredPrompt};
    ///
    /// let prompt = StructuredPrompt::builder("gpt-test")
    ///     .message(PromptMessage::system("You are a test."))
    ///     .message(PromptMessage::user("Say hello"))
    ///     .temperature(0.2)
    ///     .max_tokens(10)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(prompt.to_payload()["max_tokens"], 10);
    /// ```
    pub fn builder(model: impl Into<String>) -> StructuredPromptBuilder {
        StructuredPromptBuilder {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
            response_format: None,
            extra_parameters: Map::new(),
        }
    }

    /// Build a prompt from `(role, content)` pairs
    ///
    /// # Errors
    ///
    /// Returns `ModgenError::PromptValidation` if any message or the prompt
    /// itself is invalid.
    pub fn from_messages<I, R, C>(model: impl Into<String>, messages: I) -> Result<Self>
    where
        I: IntoIterator<Item = (R, C)>,
        R: AsRef<str>,
        C: Into<Value>,
    {
        let mut builder = Self::builder(model);
        for (role, content) in messages {
            builder = builder.message(PromptMessage::from_parts(role.as_ref(), content)?);
        }
        builder.build()
    }

    /// Model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ordered messages
    pub fn messages(&self) -> &[PromptMessage] {
        &self.messages
    }

    /// Sampling temperature
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// Completion token limit
    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    /// Requested response format
    pub fn response_format(&self) -> Option<&Map<String, Value>> {
        self.response_format.as_ref()
    }

    /// Additional top-level request parameters
    pub fn extra_parameters(&self) -> &Map<String, Value> {
        &self.extra_parameters
    }

    /// Request body for the chat completions endpoint
    ///
    /// Optional fields appear only when set; extra parameters are merged
    /// into the top level.
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("model".into(), Value::String(self.model.clone()));
        payload.insert(
            "messages".into(),
            Value::Array(self.messages.iter().map(PromptMessage::to_value).collect()),
        );
        if let Some(temperature) = self.temperature {
            payload.insert("temperature".into(), Value::from(temperature));
        }
        if let Some(max_tokens) = self.max_tokens {
            payload.insert("max_tokens".into(), Value::from(max_tokens));
        }
        if let Some(format) = &self.response_format {
            payload.insert("response_format".into(), Value::Object(format.clone()));
        }
        for (key, value) in &self.extra_parameters {
            payload.insert(key.clone(), value.clone());
        }
        Value::Object(payload)
    }
}

/// Builder for [`StructuredPrompt`]; validation happens in [`build`](Self::build)
#[derive(Debug, Clone)]
pub struct StructuredPromptBuilder {
    model: String,
    messages: Vec<PromptMessage>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    response_format: Option<Map<String, Value>>,
    extra_parameters: Map<String, Value>,
}

impl StructuredPromptBuilder {
    /// Append a message
    pub fn message(mut self, message: PromptMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Append several messages
    pub fn messages(mut self, messages: impl IntoIterator<Item = PromptMessage>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the completion token limit
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the response format mapping
    pub fn response_format(mut self, format: Map<String, Value>) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Add one extra top-level request parameter
    pub fn extra_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_parameters.insert(key.into(), value.into());
        self
    }

    /// Replace the extra parameters
    pub fn extra_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.extra_parameters = parameters;
        self
    }

    /// Validate and produce the prompt
    ///
    /// # Errors
    ///
    /// Returns `ModgenError::PromptValidation` if the model is empty, there
    /// are no messages, the temperature is not finite, or an extra
    /// parameter uses a reserved key.
    pub fn build(self) -> Result<StructuredPrompt> {
        if self.model.is_empty() {
            return Err(ModgenError::PromptValidation(
                "A model must be provided for the prompt".to_string(),
            ));
        }
        if self.messages.is_empty() {
            return Err(ModgenError::PromptValidation(
                "At least one message is required to build a prompt".to_string(),
            ));
        }
        if let Some(temperature) = self.temperature {
            if !temperature.is_finite() {
                return Err(ModgenError::PromptValidation(format!(
                    "temperature must be a finite number, got {}",
                    temperature
                )));
            }
        }

        let mut conflicts: Vec<&str> = RESERVED_PARAMETERS
            .iter()
            .copied()
            .filter(|key| self.extra_parameters.contains_key(*key))
            .collect();
        if !conflicts.is_empty() {
            conflicts.sort_unstable();
            return Err(ModgenError::PromptValidation(format!(
                "extra_parameters cannot contain reserved keys: {}",
                conflicts.join(", ")
            )));
        }

        Ok(StructuredPrompt {
            model: self.model,
            messages: self.messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: self.response_format,
            extra_parameters: self.extra_parameters,
        })
    }
}
