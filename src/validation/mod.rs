//! Syntax and layout validation for project assets
//!
//! Validators never fail: every problem they find becomes a
//! [`ValidationIssue`] on the returned [`ValidationResult`].

pub mod java;
pub mod structure;

pub use java::{ParseFailure, SourceParser, TreeSitterJavaParser};

#[cfg(test)]
pub use java::MockSourceParser;

use serde::de::{Deserialize, IgnoredAny};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A single problem discovered during a check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Human-readable description
    pub message: String,
    /// File or directory the issue refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// 1-based line, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// 1-based column, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

/// Ordered issues found by a validator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Issues in discovery order
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Whether no issues were recorded
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Record an issue
    pub fn add_issue(
        &mut self,
        message: impl Into<String>,
        path: Option<PathBuf>,
        line: Option<usize>,
        column: Option<usize>,
    ) {
        self.issues.push(ValidationIssue {
            message: message.into(),
            path,
            line,
            column,
        });
    }

    /// Append the issues of another result
    pub fn extend(&mut self, other: ValidationResult) {
        self.issues.extend(other.issues);
    }
}

/// Runs the JSON, Java and directory-layout checks
///
/// # Examples
///
/// ```
/// use modgen::validation::ValidationEngine;
///
/// let engine = ValidationEngine::new();
/// assert!(engine.validate_json(r#"{"a": 1}"#, None).is_valid());
/// assert_eq!(engine.validate_json(r#"{"a": 1,}"#, None).issues.len(), 1);
/// ```
pub struct ValidationEngine {
    parser: Box<dyn SourceParser>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine {
    /// Engine using the tree-sitter Java grammar
    pub fn new() -> Self {
        Self::with_parser(Box::new(TreeSitterJavaParser::new()))
    }

    /// Engine using a custom source parser
    pub fn with_parser(parser: Box<dyn SourceParser>) -> Self {
        Self { parser }
    }

    /// Check that `text` is well-formed JSON
    ///
    /// Nesting depth is unbounded.
    ///
    /// # Arguments
    ///
    /// * `text` - Document to check
    /// * `source_path` - Path reported on the issue, if any
    ///
    /// # Returns
    ///
    /// Returns a result with at most one issue carrying the 1-based line and
    /// column of the first syntax error
    pub fn validate_json(&self, text: &str, source_path: Option<&Path>) -> ValidationResult {
        let mut result = ValidationResult::default();
        if let Err(e) = parse_json(text) {
            let (line, column) = (e.line().max(1), e.column().max(1));
            let full = e.to_string();
            let description = full
                .rfind(" at line ")
                .map_or(full.as_str(), |idx| &full[..idx]);
            result.add_issue(
                format!(
                    "JSON syntax error: {} (line {} column {})",
                    description, line, column
                ),
                source_path.map(Path::to_path_buf),
                Some(line),
                Some(column),
            );
        }
        result
    }

    /// Check that `source` parses as Java
    ///
    /// Whitespace-only input is reported without consulting the parser.
    ///
    /// # Arguments
    ///
    /// * `source` - Java compilation unit
    /// * `source_path` - Path reported on the issue, if any
    ///
    /// # Returns
    ///
    /// Returns a result with at most one issue
    pub fn validate_java(&self, source: &str, source_path: Option<&Path>) -> ValidationResult {
        let mut result = ValidationResult::default();
        let path = source_path.map(Path::to_path_buf);

        if source.trim().is_empty() {
            result.add_issue("Java source is empty", path, None, None);
            return result;
        }

        match self.parser.parse(source) {
            Ok(()) => {}
            Err(ParseFailure::Syntax {
                line,
                column,
                description,
            }) => result.add_issue(
                format!("Java syntax error: {}", description),
                path,
                line,
                column,
            ),
            Err(ParseFailure::Lexical {
                line,
                column,
                description,
            }) => result.add_issue(
                format!("Java lexical error: {}", description),
                path,
                line,
                column,
            ),
            Err(ParseFailure::Internal(reason)) => result.add_issue(
                format!("Java parsing failed: {}", reason),
                path,
                None,
                None,
            ),
        }
        result
    }

    /// Check that `root` contains `expected_entries`
    ///
    /// Entries ending in `/` are expected directories; all others are
    /// expected files.
    ///
    /// # Examples
    ///
    /// ```
    /// use modgen::validation::ValidationEngine;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// std::fs::create_dir(dir.path().join("src")).unwrap();
    ///
    /// let engine = ValidationEngine::new();
    /// assert!(engine.validate_file_structure(dir.path(), &["src/"]).is_valid());
    /// assert!(!engine.validate_file_structure(dir.path(), &["pom.xml"]).is_valid());
    /// ```
    pub fn validate_file_structure<S: AsRef<str>>(
        &self,
        root: &Path,
        expected_entries: &[S],
    ) -> ValidationResult {
        structure::check_structure(root, expected_entries)
    }
}

/// Parse `text` as a single JSON document without a depth limit
fn parse_json(text: &str) -> serde_json::Result<()> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    IgnoredAny::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()
}
