//! Single-shot chat prompt handler
//!
//! Builds a [`StructuredPrompt`] from command-line options, sends it through
//! a [`Provider`] and prints the first message of the response.

use crate::config::Config;
use crate::error::{ModgenError, Result};
use crate::providers::{
    create_provider, ChatResponse, PromptMessage, Provider, StructuredPrompt,
};
use colored::Colorize;
use serde_json::{Map, Value};

/// Options collected from the `chat` command
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// User message
    pub prompt: String,
    /// Model override
    pub model: Option<String>,
    /// Optional system message
    pub system: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f64>,
    /// Maximum completion tokens
    pub max_tokens: Option<u32>,
    /// Ask for a JSON object response
    pub json_object: bool,
}

/// Build the structured prompt for `options`
///
/// # Arguments
///
/// * `options` - Prompt options from the command line
/// * `default_model` - Model used when `options.model` is unset
///
/// # Errors
///
/// Returns `ModgenError::PromptValidation` if the resulting prompt is invalid.
pub fn build_prompt(options: &ChatOptions, default_model: &str) -> Result<StructuredPrompt> {
    let model = options.model.as_deref().unwrap_or(default_model);
    let mut builder = StructuredPrompt::builder(model);

    if let Some(system) = &options.system {
        builder = builder.message(PromptMessage::system(system.as_str()));
    }
    builder = builder.message(PromptMessage::user(options.prompt.as_str()));

    if let Some(temperature) = options.temperature {
        builder = builder.temperature(temperature);
    }
    if let Some(max_tokens) = options.max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    if options.json_object {
        let mut format = Map::new();
        format.insert("type".to_string(), Value::String("json_object".to_string()));
        builder = builder.response_format(format);
    }

    builder.build()
}

/// Send `prompt` through `provider`
pub fn run_prompt(provider: &dyn Provider, prompt: &StructuredPrompt) -> Result<ChatResponse> {
    tracing::debug!(
        "Sending prompt with {} message(s) to model {}",
        prompt.messages().len(),
        prompt.model()
    );
    let response = provider.complete(prompt)?;
    if let Some(usage) = &response.usage {
        tracing::info!(
            "Token usage: prompt={} completion={} total={}",
            usage.prompt_tokens,
            usage.completion_tokens,
            usage.total_tokens
        );
    }
    Ok(response)
}

/// Text to print for a response: the first message content
///
/// Non-string content is rendered as compact JSON. `None` when the response
/// has no choices.
pub fn response_text(response: &ChatResponse) -> Option<String> {
    response.first_message().map(|message| match message.text() {
        Some(text) => text.to_string(),
        None => message.content().to_string(),
    })
}

/// Run the `chat` command against the configured API
///
/// # Arguments
///
/// * `config` - Loaded configuration; must carry an API key
/// * `options` - Prompt options from the command line
/// * `raw` - Print the whole response as JSON instead of the first message
///
/// # Errors
///
/// Returns `ModgenError::Config` without an API key, or any error from the
/// client
pub fn run_chat(config: &Config, options: ChatOptions, raw: bool) -> Result<()> {
    let prompt = build_prompt(&options, &config.openai.model)?;
    let provider = create_provider(&config.openai)?;
    let response = run_prompt(provider.as_ref(), &prompt)?;

    if raw {
        let body = serde_json::to_string_pretty(&response)
            .map_err(|e| ModgenError::Serialization(e.to_string()))?;
        println!("{}", body);
        return Ok(());
    }

    match response_text(&response) {
        Some(text) => println!("{}", text),
        None => eprintln!("{}", "Response contained no choices.".yellow()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockProvider, Role};
    use serde_json::json;

    fn options(prompt: &str) -> ChatOptions {
        ChatOptions {
            prompt: prompt.to_string(),
            ..ChatOptions::default()
        }
    }

    #[test]
    fn test_build_prompt_defaults() {
        let prompt = build_prompt(&options("hello"), "gpt-4o-mini").unwrap();
        assert_eq!(prompt.model(), "gpt-4o-mini");
        assert_eq!(prompt.messages().len(), 1);
        assert_eq!(prompt.messages()[0].role(), Role::User);
        assert!(prompt.temperature().is_none());
        assert!(prompt.response_format().is_none());
    }

    #[test]
    fn test_build_prompt_with_all_options() {
        let opts = ChatOptions {
            prompt: "list colors".to_string(),
            model: Some("gpt-test".to_string()),
            system: Some("answer in JSON".to_string()),
            temperature: Some(0.1),
            max_tokens: Some(32),
            json_object: true,
        };
        let payload = build_prompt(&opts, "ignored").unwrap().to_payload();
        assert_eq!(payload["model"], "gpt-test");
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["content"], "list colors");
        assert_eq!(payload["temperature"], 0.1);
        assert_eq!(payload["max_tokens"], 32);
        assert_eq!(payload["response_format"], json!({"type": "json_object"}));
    }

    #[test]
    fn test_build_prompt_rejects_empty_model() {
        let opts = ChatOptions {
            model: Some(String::new()),
            ..options("hi")
        };
        assert!(matches!(
            build_prompt(&opts, "gpt").unwrap_err(),
            ModgenError::PromptValidation(_)
        ));
    }

    #[test]
    fn test_run_prompt_returns_provider_response() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .withf(|prompt| prompt.model() == "gpt-test")
            .times(1)
            .returning(|_| {
                ChatResponse::from_value(&json!({
                    "id": "chatcmpl-1",
                    "model": "gpt-test",
                    "choices": [{"index": 0, "message": {"role": "assistant", "content": "hi!"}}]
                }))
            });

        let prompt = build_prompt(&options("hello"), "gpt-test").unwrap();
        let response = run_prompt(&provider, &prompt).unwrap();
        assert_eq!(response_text(&response).as_deref(), Some("hi!"));
    }

    #[test]
    fn test_run_prompt_propagates_api_error() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .returning(|_| Err(ModgenError::api("boom", Some(502), None)));

        let prompt = build_prompt(&options("hello"), "gpt-test").unwrap();
        let err = run_prompt(&provider, &prompt).unwrap_err();
        assert_eq!(err.status_code(), Some(502));
    }

    #[test]
    fn test_response_text_structured_content_and_empty() {
        let structured = ChatResponse::from_value(&json!({
            "choices": [{"message": {"content": {"colors": ["red"]}}}]
        }))
        .unwrap();
        assert_eq!(
            response_text(&structured).as_deref(),
            Some(r#"{"colors":["red"]}"#)
        );

        let empty = ChatResponse::from_value(&json!({"choices": []})).unwrap();
        assert!(response_text(&empty).is_none());
    }

    #[test]
    fn test_run_chat_without_api_key_fails() {
        let err = run_chat(&Config::default(), options("hi"), false).unwrap_err();
        assert!(matches!(err, ModgenError::Config(_)));
    }
}
