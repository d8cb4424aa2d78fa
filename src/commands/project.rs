use crate::cli::ProjectCommand;
use crate::error::{ModgenError, Result};
use crate::storage::{
    metadata_from, CreateProjectOptions, Project, ProjectEntry, ProjectMetadata, ProjectStore,
};
use colored::Colorize;
use prettytable::{format, Table};

/// Handle project commands
pub fn handle_project(store: &ProjectStore, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::Create {
            name,
            description,
            metadata,
            overwrite,
        } => {
            let metadata = match metadata {
                Some(raw) => parse_metadata(&raw)?,
                None => ProjectMetadata::new(),
            };
            let options = CreateProjectOptions::default()
                .description(description)
                .metadata(metadata)
                .overwrite(overwrite);
            let project = store.create_project(&name, options)?;
            println!(
                "{}",
                format!(
                    "Created project '{}' at {}",
                    project.name(),
                    project.path().display()
                )
                .green()
            );
        }
        ProjectCommand::Show { name, json } => {
            let project = store.load_project(&name)?;
            if json {
                println!("{}", render_document(&project)?);
            } else {
                print_project(&project);
            }
        }
        ProjectCommand::List { json } => {
            let entries = store.list_entries()?;
            if json {
                let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
                let body = serde_json::to_string_pretty(&names)
                    .map_err(|e| ModgenError::Serialization(e.to_string()))?;
                println!("{}", body);
                return Ok(());
            }

            if entries.is_empty() {
                println!("{}", "No projects found.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
            table.add_row(prettytable::row!["Name".bold(), "Directory".bold()]);
            for entry in &entries {
                table.add_row(prettytable::row![
                    entry.name.as_str().cyan(),
                    directory_label(entry)
                ]);
            }

            println!("\nProjects in {}:", store.root().display());
            table.printstd();
            println!();
        }
        ProjectCommand::Exists { name } => {
            println!("{}", store.project_exists(&name)?);
        }
    }

    Ok(())
}

/// Parse `--metadata` into a metadata map
///
/// # Errors
///
/// Returns `ModgenError::Serialization` if the text is not a JSON object.
pub fn parse_metadata(raw: &str) -> Result<ProjectMetadata> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| ModgenError::Serialization(format!("Invalid metadata JSON: {}", e)))?;
    metadata_from(&value)
}

/// Directory name shown in the listing table
fn directory_label(entry: &ProjectEntry) -> String {
    entry
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "-".to_string())
}

fn render_document(project: &Project) -> Result<String> {
    serde_json::to_string_pretty(&project.to_document())
        .map_err(|e| ModgenError::Serialization(e.to_string()))
}

fn print_project(project: &Project) {
    println!("{} {}", "Name:".bold(), project.name().cyan());
    println!("{} {}", "Path:".bold(), project.path().display());
    if !project.description.is_empty() {
        println!("{} {}", "Description:".bold(), project.description);
    }
    println!(
        "{} {}",
        "Created:".bold(),
        project.created_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "{} {}",
        "Updated:".bold(),
        project.updated_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
    if !project.metadata.is_empty() {
        println!("{}", "Metadata:".bold());
        for (key, value) in &project.metadata {
            println!("  {}: {}", key, value);
        }
    }
}
