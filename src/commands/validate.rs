use crate::cli::ValidateCommand;
use crate::error::{ModgenError, Result};
use crate::validation::{ValidationEngine, ValidationIssue, ValidationResult};
use colored::Colorize;
use std::fs;

/// Run a validation command and print its issues
///
/// Returns the result so the caller can decide the exit status.
pub fn handle_validate(
    engine: &ValidationEngine,
    command: ValidateCommand,
) -> Result<ValidationResult> {
    let (result, json) = match command {
        ValidateCommand::Json { file, json } => {
            let text = fs::read_to_string(&file)?;
            (engine.validate_json(&text, Some(&file)), json)
        }
        ValidateCommand::Java { file, json } => {
            let text = fs::read_to_string(&file)?;
            (engine.validate_java(&text, Some(&file)), json)
        }
        ValidateCommand::Structure {
            root,
            entries,
            json,
        } => (engine.validate_file_structure(&root, &entries), json),
    };

    if json {
        let body = serde_json::to_string_pretty(&result)
            .map_err(|e| ModgenError::Serialization(e.to_string()))?;
        println!("{}", body);
    } else if result.is_valid() {
        println!("{}", "No issues found.".green());
    } else {
        for issue in &result.issues {
            println!("{}", render_issue(issue).red());
        }
    }

    Ok(result)
}

/// Format an issue as `path:line:column: message`, omitting unknown parts
pub fn render_issue(issue: &ValidationIssue) -> String {
    let mut location = Vec::new();
    if let Some(path) = &issue.path {
        location.push(path.display().to_string());
    }
    if let Some(line) = issue.line {
        location.push(line.to_string());
        if let Some(column) = issue.column {
            location.push(column.to_string());
        }
    }

    if location.is_empty() {
        issue.message.clone()
    } else {
        format!("{}: {}", location.join(":"), issue.message)
    }
}
