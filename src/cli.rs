//! Command-line interface definition for Modgen
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for project records, validation and chat prompts.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Modgen - project metadata, prompts and validation
#[derive(Parser, Debug, Clone)]
#[command(name = "modgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "modgen.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the projects root directory
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Modgen
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Manage project records
    Project {
        /// Project subcommand
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Validate files and directory layouts
    Validate {
        /// Validation subcommand
        #[command(subcommand)]
        command: ValidateCommand,
    },

    /// Send a single prompt to the configured chat completions API
    Chat {
        /// User message
        prompt: String,

        /// Model identifier (defaults to `openai.model`)
        #[arg(short, long)]
        model: Option<String>,

        /// System message sent before the prompt
        #[arg(short, long)]
        system: Option<String>,

        /// Sampling temperature
        #[arg(short, long)]
        temperature: Option<f64>,

        /// Maximum completion tokens
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Request a JSON object response
        #[arg(long)]
        json_object: bool,

        /// Print the full parsed response as JSON
        #[arg(long)]
        raw: bool,
    },
}

/// Project subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ProjectCommand {
    /// Create a project record
    Create {
        /// Display name
        name: String,

        /// Free-text description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Metadata as a JSON object
        #[arg(short, long)]
        metadata: Option<String>,

        /// Replace an existing project
        #[arg(long)]
        overwrite: bool,
    },

    /// Show a project record
    Show {
        /// Display name
        name: String,

        /// Output the stored document as JSON
        #[arg(long)]
        json: bool,
    },

    /// List project names
    List {
        /// Output as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Print whether a project exists
    Exists {
        /// Display name
        name: String,
    },
}

/// Validation subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ValidateCommand {
    /// Check JSON syntax
    Json {
        /// File to check
        file: PathBuf,

        /// Output issues as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check Java syntax
    Java {
        /// File to check
        file: PathBuf,

        /// Output issues as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that a directory contains the expected entries
    Structure {
        /// Directory to check
        root: PathBuf,

        /// Expected relative paths; a trailing `/` marks a directory
        #[arg(required = true)]
        entries: Vec<String>,

        /// Output issues as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_project_create() {
        let cli = Cli::try_parse_from([
            "modgen",
            "project",
            "create",
            "My Project",
            "--description",
            "demo",
            "--overwrite",
        ])
        .unwrap();

        assert_eq!(cli.config, Some("modgen.yaml".to_string()));
        match cli.command {
            Commands::Project {
                command:
                    ProjectCommand::Create {
                        name,
                        description,
                        metadata,
                        overwrite,
                    },
            } => {
                assert_eq!(name, "My Project");
                assert_eq!(description, "demo");
                assert!(metadata.is_none());
                assert!(overwrite);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "modgen",
            "project",
            "list",
            "--root",
            "/tmp/projects",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/projects")));
    }

    #[test]
    fn test_cli_parse_validate_structure() {
        let cli = Cli::try_parse_from(["modgen", "validate", "structure", "out", "src/", "pom.xml"])
            .unwrap();
        match cli.command {
            Commands::Validate {
                command: ValidateCommand::Structure { root, entries, json },
            } => {
                assert_eq!(root, PathBuf::from("out"));
                assert_eq!(entries, vec!["src/", "pom.xml"]);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_structure_requires_entries() {
        assert!(Cli::try_parse_from(["modgen", "validate", "structure", "out"]).is_err());
    }

    #[test]
    fn test_cli_parse_chat() {
        let cli = Cli::try_parse_from([
            "modgen",
            "chat",
            "hello",
            "--model",
            "gpt-test",
            "--temperature",
            "0.2",
            "--max-tokens",
            "64",
            "--json-object",
        ])
        .unwrap();
        match cli.command {
            Commands::Chat {
                prompt,
                model,
                system,
                temperature,
                max_tokens,
                json_object,
                raw,
            } => {
                assert_eq!(prompt, "hello");
                assert_eq!(model.as_deref(), Some("gpt-test"));
                assert!(system.is_none());
                assert_eq!(temperature, Some(0.2));
                assert_eq!(max_tokens, Some(64));
                assert!(json_object);
                assert!(!raw);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
