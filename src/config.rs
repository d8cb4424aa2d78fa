//! Configuration management for Modgen
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ModgenError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Main configuration structure for Modgen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Project store settings
    #[serde(default)]
    pub projects: ProjectsConfig,
    /// Chat completion API settings
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// Project store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectsConfig {
    /// Root directory for projects; `~/.modgen/projects` when unset
    #[serde(default)]
    pub root: Option<PathBuf>,
}

/// OpenAI-compatible API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Bearer credential
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL; `chat/completions` is resolved against it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value for the `OpenAI-Organization` header
    #[serde(default)]
    pub organization: Option<String>,

    /// Value for the `OpenAI-Project` header
    #[serde(default)]
    pub project: Option<String>,

    /// Socket timeout for each request (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Default model for the `chat` command
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1/".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            organization: None,
            project: None,
            timeout_seconds: default_timeout_seconds(),
            model: default_model(),
        }
    }
}

impl OpenAiConfig {
    /// Configuration for `api_key` with every other field defaulted
    ///
    /// # Examples
    ///
    /// ```
    /// use modgen::config::OpenAiConfig;
    ///
    /// let config = OpenAiConfig::with_api_key("sk-test");
    /// assert_eq!(config.require_api_key().unwrap(), "sk-test");
    /// assert_eq!(config.timeout_seconds, 30);
    /// ```
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// The configured API key
    ///
    /// # Returns
    ///
    /// Returns the key borrowed from the configuration
    ///
    /// # Errors
    ///
    /// Returns `ModgenError::Config` when no non-empty key is configured.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ModgenError::Config(
                    "No API key configured; set openai.api_key or OPENAI_API_KEY".to_string(),
                )
            })
    }
}

impl Config {
    /// Load configuration from a file, then apply environment overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    ///
    /// # Returns
    ///
    /// Returns the loaded configuration with `MODGEN_*` and `OPENAI_*`
    /// environment variables applied on top
    ///
    /// # Errors
    ///
    /// Returns `ModgenError::Config` if the file exists but cannot be read
    /// or parsed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use modgen::Config;
    ///
    /// let config = Config::load("config/config.yaml")?;
    /// config.validate()?;
    /// # Ok::<(), modgen::ModgenError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env_vars();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ModgenError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ModgenError::Config(format!("Failed to parse config: {}", e)))
    }

    fn apply_env_vars(&mut self) {
        if let Ok(root) = std::env::var("MODGEN_PROJECTS_ROOT") {
            self.projects.root = Some(PathBuf::from(root));
        }

        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            self.openai.api_key = Some(api_key);
        }

        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            self.openai.base_url = base_url;
        }

        if let Ok(organization) = std::env::var("OPENAI_ORGANIZATION") {
            self.openai.organization = Some(organization);
        }

        if let Ok(project) = std::env::var("OPENAI_PROJECT") {
            self.openai.project = Some(project);
        }

        if let Ok(timeout) = std::env::var("MODGEN_OPENAI_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.openai.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid MODGEN_OPENAI_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(model) = std::env::var("MODGEN_MODEL") {
            self.openai.model = model;
        }
    }

    /// Override the project root (highest precedence)
    ///
    /// # Arguments
    ///
    /// * `root` - Root from `--root`; `None` leaves the configuration as is
    pub fn apply_root_override(&mut self, root: Option<PathBuf>) {
        if let Some(root) = root {
            tracing::debug!("Using project root override: {}", root.display());
            self.projects.root = Some(root);
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ModgenError::Config` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if self.openai.timeout_seconds == 0 {
            return Err(ModgenError::Config(
                "openai.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        let url = Url::parse(&self.openai.base_url).map_err(|e| {
            ModgenError::Config(format!(
                "Invalid openai.base_url '{}': {}",
                self.openai.base_url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ModgenError::Config(format!(
                "openai.base_url must use http or https, got {}",
                url.scheme()
            )));
        }

        if self.openai.model.is_empty() {
            return Err(ModgenError::Config(
                "openai.model cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
