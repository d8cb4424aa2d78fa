//! Modgen - project metadata, structured prompts and asset validation
//!
//! This library provides the building blocks behind the `modgen` CLI: a
//! filesystem-backed store for project records, a structured prompt model
//! with a blocking OpenAI-compatible client, and validators for JSON, Java
//! source and directory layouts.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `storage`: Slug generation, project records and the project store
//! - `providers`: Structured prompts, parsed responses and the API client
//! - `validation`: JSON, Java and directory-structure validators
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use modgen::storage::CreateProjectOptions;
//! use modgen::ProjectStore;
//!
//! fn main() -> modgen::Result<()> {
//!     let store = ProjectStore::new("/tmp/modgen-projects")?;
//!     let project = store.create_project(
//!         "My Project",
//!         CreateProjectOptions::default().description("demo"),
//!     )?;
//!     assert_eq!(project.slug(), Some("My-Project"));
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod providers;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{ModgenError, Result};
pub use providers::{ChatResponse, PromptMessage, Provider, StructuredPrompt};
pub use storage::{Project, ProjectStore};
pub use validation::{ValidationEngine, ValidationResult};

#[cfg(test)]
pub mod test_utils;
