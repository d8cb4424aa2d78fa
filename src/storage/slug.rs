//! Project name to directory slug translation

use crate::error::{ModgenError, Result};
use regex::Regex;
use std::sync::OnceLock;

fn disallowed_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("static slug pattern"))
}

fn separator_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-_.]{2,}").expect("static separator pattern"))
}

/// Create a filesystem-friendly slug for a project name
///
/// Runs of characters outside `[A-Za-z0-9._-]` become a single `-`, runs of
/// two or more separators (`-`, `_`, `.`) collapse to `-`, and separators
/// are stripped from both ends. Distinct names may map to the same slug.
///
/// # Errors
///
/// Returns `ModgenError::InvalidName` when nothing survives.
///
/// # Examples
///
/// ```
/// use modgen::storage::slugify;
///
/// assert_eq!(slugify("My Project").unwrap(), "My-Project");
/// assert!(slugify("***").is_err());
/// ```
pub fn slugify(name: &str) -> Result<String> {
    let replaced = disallowed_run().replace_all(name.trim(), "-");
    let collapsed = separator_run().replace_all(&replaced, "-");
    let slug = collapsed.trim_matches(|c| matches!(c, '-' | '_' | '.'));

    if slug.is_empty() {
        return Err(ModgenError::InvalidName(format!(
            "'{}' results in an empty slug",
            name
        )));
    }

    Ok(slug.to_string())
}
