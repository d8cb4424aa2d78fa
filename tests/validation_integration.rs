//! Validation engine integration tests

use modgen::validation::{ParseFailure, SourceParser, ValidationEngine};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HELLO_WORLD: &str = r#"package demo;

import java.util.List;

public class HelloWorld {
    private final List<String> names;

    public HelloWorld(List<String> names) {
        this.names = names;
    }

    public static void main(String[] args) {
        System.out.println("Hello, World!");
    }
}
"#;

#[test]
fn test_json_examples() {
    let engine = ValidationEngine::new();
    assert!(engine.validate_json(r#"{"a":1}"#, None).is_valid());

    let result = engine.validate_json(r#"{"a":1,}"#, None);
    assert_eq!(result.issues.len(), 1);
    assert!(result.issues[0].line.is_some());
    assert!(result.issues[0].column.is_some());
}

#[test]
fn test_valid_java_source() {
    let result =
        ValidationEngine::new().validate_java(HELLO_WORLD, Some(Path::new("HelloWorld.java")));
    assert!(result.is_valid(), "{:?}", result.issues);
}

#[test]
fn test_java_missing_semicolon() {
    let source = "public class Broken {\n    void run() {\n        System.out.println(\"Hello\")\n    }\n}\n";
    let result = ValidationEngine::new().validate_java(source, None);

    assert_eq!(result.issues.len(), 1);
    let issue = &result.issues[0];
    assert!(issue.message.starts_with("Java syntax error:"), "{}", issue.message);
    assert!(issue.line.is_some());
    assert!(issue.column.is_some());
}

#[test]
fn test_java_whitespace_only() {
    let result = ValidationEngine::new().validate_java("   \n", None);
    assert_eq!(result.issues[0].message, "Java source is empty");
}

struct RejectEverything;

impl SourceParser for RejectEverything {
    fn parse(&self, _source: &str) -> Result<(), ParseFailure> {
        Err(ParseFailure::Lexical {
            line: Some(2),
            column: Some(7),
            description: "illegal character".to_string(),
        })
    }
}

#[test]
fn test_custom_parser_is_used() {
    let engine = ValidationEngine::with_parser(Box::new(RejectEverything));
    let result = engine.validate_java(HELLO_WORLD, None);

    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].message, "Java lexical error: illegal character");
    assert_eq!(result.issues[0].line, Some(2));
    assert_eq!(result.issues[0].column, Some(7));
}

#[test]
fn test_generated_project_layout() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src/main/java")).unwrap();
    fs::write(root.join("pom.xml"), "<project/>").unwrap();
    fs::write(root.join("src/main/java/App.java"), HELLO_WORLD).unwrap();

    let engine = ValidationEngine::new();
    let ok = engine.validate_file_structure(
        root,
        &["pom.xml", "src/main/java/", "src/main/java/App.java"],
    );
    assert!(ok.is_valid(), "{:?}", ok.issues);

    let missing = engine.validate_file_structure(root, &["pom.xml", "README.md", "src/test/"]);
    assert_eq!(missing.issues.len(), 2);
    assert!(missing.issues[0].message.starts_with("Missing file"));
    assert!(missing.issues[1].message.starts_with("Missing directory"));
}
