//! Java source parsing behind a narrow collaborator interface
//!
//! [`SourceParser`] only answers "does this parse, and if not, where did it
//! fail". The default implementation uses the tree-sitter Java grammar; any
//! other grammar can be plugged into the validation engine instead.

use tree_sitter::{Node, Parser};

/// Why a source text failed to parse
///
/// Positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// The token stream did not match the grammar
    Syntax {
        /// Line of the offending token
        line: Option<usize>,
        /// Column of the offending token
        column: Option<usize>,
        /// What went wrong
        description: String,
    },
    /// The text could not be split into tokens
    Lexical {
        /// Line of the offending character
        line: Option<usize>,
        /// Column of the offending character
        column: Option<usize>,
        /// What went wrong
        description: String,
    },
    /// The parser itself could not run
    Internal(String),
}

/// Grammar parser used for source validation
#[cfg_attr(test, mockall::automock)]
pub trait SourceParser {
    /// Parse `source`, reporting the first failure
    fn parse(&self, source: &str) -> std::result::Result<(), ParseFailure>;
}

/// [`SourceParser`] backed by `tree-sitter-java`
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeSitterJavaParser;

impl TreeSitterJavaParser {
    /// Create the parser
    pub fn new() -> Self {
        Self
    }
}

impl SourceParser for TreeSitterJavaParser {
    fn parse(&self, source: &str) -> std::result::Result<(), ParseFailure> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| ParseFailure::Internal(format!("failed to load Java grammar: {}", e)))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseFailure::Internal("parser produced no tree".to_string()))?;

        let root = tree.root_node();
        if !root.has_error() {
            return Ok(());
        }

        match first_error(root) {
            Some(node) => Err(describe(node, source)),
            None => Err(ParseFailure::Syntax {
                line: Some(1),
                column: Some(1),
                description: "source could not be parsed".to_string(),
            }),
        }
    }
}

/// Depth-first search for the earliest ERROR or MISSING node
fn first_error<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'tree>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn describe(node: Node<'_>, source: &str) -> ParseFailure {
    let start = node.start_position();
    let line = Some(start.row + 1);
    let column = Some(char_column(source, node.start_byte(), start.column));

    if node.is_missing() {
        return ParseFailure::Syntax {
            line,
            column,
            description: format!("missing `{}`", node.kind()),
        };
    }

    let text = source.get(node.byte_range()).unwrap_or_default();
    let snippet = text.lines().next().unwrap_or_default().trim();
    let snippet: String = snippet.chars().take(40).collect();

    match snippet.chars().next() {
        Some(c) if !can_start_token(c) => ParseFailure::Lexical {
            line,
            column,
            description: format!("unexpected character '{}'", c),
        },
        Some(_) => ParseFailure::Syntax {
            line,
            column,
            description: format!("unexpected `{}`", snippet),
        },
        None => ParseFailure::Syntax {
            line,
            column,
            description: "unexpected end of input".to_string(),
        },
    }
}

/// 1-based character column of `byte`
///
/// tree-sitter reports columns in bytes; `byte_column` is that offset within
/// the line.
fn char_column(source: &str, byte: usize, byte_column: usize) -> usize {
    byte.checked_sub(byte_column)
        .and_then(|line_start| source.get(line_start..byte))
        .map_or(byte_column, |prefix| prefix.chars().count())
        + 1
}

/// Whether a Java token can begin with `c`
fn can_start_token(c: char) -> bool {
    c.is_alphanumeric()
        || matches!(
            c,
            '_' | '$'
                | '"'
                | '\''
                | '@'
                | '('
                | ')'
                | '{'
                | '}'
                | '['
                | ']'
                | ';'
                | ','
                | '.'
                | '='
                | '<'
                | '>'
                | '!'
                | '~'
                | '?'
                | ':'
                | '+'
                | '-'
                | '*'
                | '/'
                | '&'
                | '|'
                | '^'
                | '%'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
public class Example {
    public void run() {
        System.out.println("hello");
    }
}
"#;

    const MISSING_SEMICOLON: &str = r#"
public class Example {
    public void run() {
        System.out.println("hello")
    }
}
"#;

    #[test]
    fn test_valid_source_parses() {
        assert_eq!(TreeSitterJavaParser::new().parse(VALID), Ok(()));
    }

    #[test]
    fn test_missing_semicolon_reports_position() {
        let failure = TreeSitterJavaParser::new()
            .parse(MISSING_SEMICOLON)
            .unwrap_err();
        match failure {
            ParseFailure::Syntax { line, column, .. } => {
                assert!(line.is_some());
                assert!(column.is_some());
            }
            other => panic!("expected syntax failure, got {:?}", other),
        }
    }

    #[test]
    fn test_unbalanced_braces_fail() {
        let result = TreeSitterJavaParser::new().parse("class A { void f() { }");
        assert!(result.is_err());
    }

    #[test]
    fn test_char_column_counts_characters() {
        let source = "class Ä { int é = ; }";
        let byte = source.find('=').unwrap();
        assert_eq!(char_column(source, byte, byte), 17);

        let multiline = "x\nÄé = 1";
        let byte = multiline.find('=').unwrap();
        assert_eq!(char_column(multiline, byte, byte - 2), 4);
    }

    #[test]
    fn test_error_column_after_non_ascii_identifiers() {
        let source = "class Ä { int é = ; }";
        let failure = TreeSitterJavaParser::new().parse(source).unwrap_err();
        let column = match failure {
            ParseFailure::Syntax { column, .. } | ParseFailure::Lexical { column, .. } => column,
            ParseFailure::Internal(reason) => panic!("parser did not run: {}", reason),
        };
        assert_eq!(column, Some(17));
    }

    #[test]
    fn test_can_start_token() {
        assert!(can_start_token('a'));
        assert!(can_start_token('{'));
        assert!(can_start_token('"'));
        assert!(!can_start_token('#'));
        assert!(!can_start_token('`'));
    }
}
