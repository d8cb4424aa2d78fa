//! Command handlers for the CLI
//!
//! - `project`: create, show, list and check project records
//! - `validate`: JSON, Java and directory-structure checks
//! - `chat`: single structured prompt against the configured API

pub mod chat;
pub mod project;
pub mod validate;

use crate::config::Config;
use crate::error::Result;
use crate::storage::ProjectStore;

/// Open the project store configured in `config`
///
/// Falls back to `~/.modgen/projects` when no root is configured.
pub fn open_store(config: &Config) -> Result<ProjectStore> {
    match &config.projects.root {
        Some(root) => ProjectStore::new(root),
        None => ProjectStore::open_default(),
    }
}
