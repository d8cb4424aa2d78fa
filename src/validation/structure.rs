//! Directory layout checks

use super::ValidationResult;
use std::path::Path;

/// What an expected entry should be on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    fn of(entry: &str) -> Self {
        if entry.ends_with('/') || entry.ends_with(std::path::MAIN_SEPARATOR) {
            Self::Directory
        } else {
            Self::File
        }
    }
}

/// Check `root` against `expected_entries`
///
/// A missing root yields exactly one issue. Otherwise every entry is checked
/// independently for presence and kind.
pub fn check_structure<S: AsRef<str>>(root: &Path, expected_entries: &[S]) -> ValidationResult {
    let mut result = ValidationResult::default();

    if !root.exists() {
        result.add_issue(
            format!("Root path does not exist: {}", root.display()),
            Some(root.to_path_buf()),
            None,
            None,
        );
        return result;
    }

    for entry in expected_entries {
        let entry = entry.as_ref();
        let kind = EntryKind::of(entry);
        let relative = entry.trim_end_matches(['/', std::path::MAIN_SEPARATOR]);
        let expected = root.join(relative);

        let message = match (kind, expected.exists(), expected.is_dir()) {
            (EntryKind::Directory, false, _) => "Missing directory",
            (EntryKind::Directory, true, false) => "Expected directory but found file",
            (EntryKind::File, false, _) => "Missing file",
            (EntryKind::File, true, true) => "Expected file but found directory",
            _ => continue,
        };

        tracing::debug!("{}: {}", message, expected.display());
        result.add_issue(
            format!("{}: {}", message, expected.display()),
            Some(expected),
            None,
            None,
        );
    }

    result
}
