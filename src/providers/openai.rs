//! OpenAI-compatible chat completions client
//!
//! This module implements the Provider trait over a blocking HTTP client.
//! Each call makes exactly one POST to `<base_url>/chat/completions` and
//! maps every failure onto `ModgenError::Api`.

use crate::config::OpenAiConfig;
use crate::error::{ModgenError, Result};
use crate::providers::{ChatResponse, Provider, StructuredPrompt};

use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

const CHAT_COMPLETIONS_ENDPOINT: &str = "chat/completions";

/// Client for sending structured prompts to an OpenAI-compatible API
///
/// # Examples
///
/// ```no_run
/// use modgen::config::OpenAiConfig;
/// use modgen::providers::{OpenAiClient, PromptMessage, StructuredPrompt};
///
/// # fn example() -> modgen::Result<()> {
/// let client = OpenAiClient::new(OpenAiConfig::with_api_key("sk-test"))?;
/// let prompt = StructuredPrompt::builder("gpt-4o-mini")
///     .message(PromptMessage::user("Say hi"))
///     .build()?;
/// let response = client.create_chat_completion(&prompt)?;
/// println!("{:?}", response.first_message());
/// # Ok(())
/// # }
/// ```
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
    api_key: String,
    endpoint: Url,
}

impl OpenAiClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns `ModgenError::Config` if no API key is configured, the base
    /// URL is invalid, or the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let endpoint = resolve_endpoint(&config.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("modgen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ModgenError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized OpenAI client: endpoint={}", endpoint);

        Ok(Self {
            client,
            config,
            api_key,
            endpoint,
        })
    }

    /// Configured base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Fully resolved chat completions URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Content-Type", "application/json".to_string()),
            ("Authorization", format!("Bearer {}", self.api_key)),
        ];
        if let Some(org) = self.config.organization.as_deref().filter(|o| !o.is_empty()) {
            headers.push(("OpenAI-Organization", org.to_string()));
        }
        if let Some(project) = self.config.project.as_deref().filter(|p| !p.is_empty()) {
            headers.push(("OpenAI-Project", project.to_string()));
        }
        headers
    }

    /// Send the structured prompt to the chat completions endpoint
    ///
    /// # Errors
    ///
    /// - `ModgenError::Api` without a status code if the host cannot be
    ///   reached or the request times out
    /// - `ModgenError::Api` with the status code and raw body for statuses
    ///   of 400 and above, or for bodies that are not JSON
    /// - `ModgenError::Serialization` / `ModgenError::PromptValidation` if
    ///   the JSON body does not describe a chat completion
    pub fn create_chat_completion(&self, prompt: &StructuredPrompt) -> Result<ChatResponse> {
        let payload = prompt.to_payload();
        let response_payload = self.execute(&payload)?;
        ChatResponse::from_value(&response_payload)
    }

    fn execute(&self, payload: &Value) -> Result<Value> {
        let headers = self.headers();
        tracing::debug!(
            "Dispatching request to {} with headers {:?}",
            self.endpoint,
            headers.iter().map(|(name, _)| *name).collect::<Vec<_>>()
        );

        let mut request = self.client.post(self.endpoint.clone());
        for (name, value) in &headers {
            request = request.header(*name, value.as_str());
        }

        let response = request.body(payload.to_string()).send().map_err(|e| {
            tracing::warn!("Failed to reach OpenAI API: {}", e);
            ModgenError::api("Failed to reach OpenAI API", None, Some(e.to_string()))
        })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| {
            ModgenError::api(
                "Failed to read OpenAI API response",
                Some(status),
                Some(e.to_string()),
            )
        })?;

        if status >= 400 {
            tracing::error!("OpenAI API returned error {}: {}", status, body);
            return Err(ModgenError::api(
                format!("OpenAI API returned error status {}", status),
                Some(status),
                Some(body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse OpenAI API response: {}", e);
            ModgenError::api("OpenAI API returned invalid JSON", Some(status), Some(body))
        })
    }
}

impl Provider for OpenAiClient {
    fn complete(&self, prompt: &StructuredPrompt) -> Result<ChatResponse> {
        self.create_chat_completion(prompt)
    }
}

/// Join `chat/completions` onto the base URL
///
/// A base without a trailing slash is treated as a directory so its last
/// path segment is kept.
fn resolve_endpoint(base_url: &str) -> Result<Url> {
    let mut base = base_url.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base)
        .and_then(|url| url.join(CHAT_COMPLETIONS_ENDPOINT))
        .map_err(|e| ModgenError::Config(format!("Invalid base URL '{}': {}", base_url, e)))
}
