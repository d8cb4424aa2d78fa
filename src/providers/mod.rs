//! Provider module for Modgen
//!
//! This module contains the structured prompt model, the parsed response
//! model, and the OpenAI-compatible client that connects them.

pub mod base;
pub mod openai;
pub mod response;

pub use base::{
    PromptMessage, Provider, Role, StructuredPrompt, StructuredPromptBuilder,
    RESERVED_PARAMETERS,
};
pub use openai::OpenAiClient;
pub use response::{ChatResponse, Choice, Usage};

#[cfg(test)]
pub use base::MockProvider;

use crate::config::OpenAiConfig;
use crate::error::Result;

/// Create the configured provider
///
/// # Errors
///
/// Returns error if the configuration lacks an API key or has an invalid
/// base URL.
pub fn create_provider(config: &OpenAiConfig) -> Result<Box<dyn Provider>> {
    Ok(Box::new(OpenAiClient::new(config.clone())?))
}
