//! Test utilities for Modgen
//!
//! This module provides common test utilities including temporary directory
//! management, test file creation, and assertion helpers.

use crate::error::ModgenError;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that is removed when dropped
///
/// # Examples
///
/// ```
/// use modgen::test_utils::temp_dir;
///
/// let dir = temp_dir();
/// let store = modgen::ProjectStore::new(dir.path()).unwrap();
/// ```
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// Missing parent directories under `dir` are created first.
///
/// # Arguments
///
/// * `dir` - Directory to create the file in
/// * `name` - Relative path of the file, may contain `/`
/// * `content` - Content to write to the file
///
/// # Returns
///
/// Returns the path to the created file
///
/// # Panics
///
/// Panics if file creation or writing fails
///
/// # Examples
///
/// ```
/// use modgen::test_utils::{create_test_file, temp_dir};
///
/// let dir = temp_dir();
/// let path = create_test_file(&dir, "src/main/java/App.java", "class App {}");
/// ```
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error contains the expected message
///
/// # Arguments
///
/// * `result` - Result to check
/// * `expected` - Expected error message substring
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
///
/// # Examples
///
/// ```
/// use modgen::error::ModgenError;
/// use modgen::test_utils::assert_error_contains;
///
/// let result: Result<(), ModgenError> = Err(ModgenError::Config("invalid".to_string()));
/// assert_error_contains(result, "invalid");
/// ```
pub fn assert_error_contains<T>(result: Result<T, ModgenError>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}', got Ok", expected),
        Err(e) => {
            let message = e.to_string();
            assert!(
                message.contains(expected),
                "Expected error containing '{}', got '{}'",
                expected,
                message
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_file_nested() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "src/Main.java", "class Main {}");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "class Main {}");
    }

    #[test]
    fn test_assert_error_contains() {
        let result: Result<(), ModgenError> = Err(ModgenError::Config("invalid".to_string()));
        assert_error_contains(result, "invalid");
    }

    #[test]
    #[should_panic(expected = "got Ok")]
    fn test_assert_error_contains_panics_on_ok() {
        assert_error_contains(Ok::<(), ModgenError>(()), "anything");
    }
}
