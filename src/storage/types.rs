use crate::error::{ModgenError, Result};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Open key/value metadata attached to a project
pub type ProjectMetadata = Map<String, Value>;

/// Current UTC time truncated to whole seconds
pub(crate) fn now_seconds() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            ModgenError::Serialization(format!("Invalid timestamp in {} '{}': {}", field, raw, e))
        })
}

/// Convert any serializable value into project metadata
///
/// # Errors
///
/// Returns `ModgenError::Serialization` when the value cannot be encoded as
/// JSON or does not encode to a JSON object.
///
/// # Examples
///
/// ```
/// use modgen::storage::metadata_from;
/// use std::collections::BTreeMap;
///
/// let mut raw = BTreeMap::new();
/// raw.insert("language", "java");
/// let metadata = metadata_from(&raw).unwrap();
/// assert_eq!(metadata["language"], "java");
/// ```
pub fn metadata_from<T: Serialize + ?Sized>(value: &T) -> Result<ProjectMetadata> {
    let encoded = serde_json::to_value(value).map_err(|e| {
        ModgenError::Serialization(format!("Metadata must be JSON serialisable: {}", e))
    })?;
    match encoded {
        Value::Object(map) => Ok(map),
        other => Err(ModgenError::Serialization(format!(
            "Metadata must encode to a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Rebuild every object in `value` with its keys in lexicographic order
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key, sort_keys(value)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Metadata for a single project stored on disk
///
/// `created_at` and `updated_at` are only changed by the store: the
/// constructor stamps both with the current time and every save refreshes
/// `updated_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    name: String,
    path: PathBuf,
    /// Free text description
    pub description: String,
    /// Arbitrary JSON metadata
    pub metadata: ProjectMetadata,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// On-disk shape of `project.json`
///
/// Required fields are optional here so a missing field can be reported as
/// an uninitialized project rather than a decode failure.
#[derive(Debug, Deserialize)]
struct ProjectDocument {
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    metadata: Option<ProjectMetadata>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl Project {
    /// Create an in-memory project stamped with the current time
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let now = now_seconds();
        Self {
            name: name.into(),
            path: path.into(),
            description: String::new(),
            metadata: ProjectMetadata::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description and return self
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the metadata and return self
    pub fn with_metadata(mut self, metadata: ProjectMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Display name supplied by the caller
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory holding the project's metadata document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name under the store root
    pub fn slug(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Creation time (UTC, second precision)
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last save (UTC, second precision)
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn touch(&mut self) {
        let now = now_seconds();
        self.updated_at = if now < self.created_at {
            self.created_at
        } else {
            now
        };
    }

    /// Serialize the project into its JSON document
    ///
    /// Keys are sorted at every level, including inside `metadata`,
    /// whichever map ordering serde_json was built with.
    ///
    /// # Returns
    ///
    /// Returns a JSON object with `created_at`, `description`, `metadata`,
    /// `name`, `path` and `updated_at`
    pub fn to_document(&self) -> Value {
        let mut doc: BTreeMap<&str, Value> = BTreeMap::new();
        doc.insert("name", Value::String(self.name.clone()));
        doc.insert(
            "path",
            Value::String(self.path.to_string_lossy().into_owned()),
        );
        doc.insert("description", Value::String(self.description.clone()));
        doc.insert(
            "metadata",
            sort_keys(Value::Object(self.metadata.clone())),
        );
        doc.insert(
            "created_at",
            Value::String(format_timestamp(&self.created_at)),
        );
        doc.insert(
            "updated_at",
            Value::String(format_timestamp(&self.updated_at)),
        );
        Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }

    /// Rebuild a project from its JSON document text
    ///
    /// The stored `path` string is ignored in favor of `path`, the directory
    /// the document was actually read from.
    ///
    /// # Errors
    ///
    /// - `ModgenError::Serialization` if the text is not a JSON object of
    ///   the expected shape, or a timestamp cannot be parsed
    /// - `ModgenError::NotInitialized` if a required field is missing
    pub fn from_document(text: &str, path: PathBuf) -> Result<Self> {
        let doc: ProjectDocument = serde_json::from_str(text).map_err(|e| {
            ModgenError::Serialization(format!("Invalid project document: {}", e))
        })?;

        let missing = |field: &str| {
            ModgenError::NotInitialized(format!(
                "Project metadata at {} is missing '{}'",
                path.display(),
                field
            ))
        };

        let name = doc.name.ok_or_else(|| missing("name"))?;
        let created_raw = doc.created_at.ok_or_else(|| missing("created_at"))?;
        let updated_raw = doc.updated_at.ok_or_else(|| missing("updated_at"))?;

        let created_at = parse_timestamp("created_at", &created_raw)?;
        let updated_at = parse_timestamp("updated_at", &updated_raw)?;

        Ok(Self {
            name,
            path,
            description: doc.description.unwrap_or_default(),
            metadata: doc.metadata.unwrap_or_default(),
            created_at,
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_project_timestamps_equal() {
        let project = Project::new("Demo", "/tmp/Demo");
        assert_eq!(project.created_at(), project.updated_at());
        assert_eq!(project.created_at().timestamp_subsec_nanos(), 0);
        assert_eq!(project.slug(), Some("Demo"));
    }

    #[test]
    fn test_document_keys_and_timestamp_format() {
        let project = Project::new("Demo", "/tmp/Demo")
            .with_description("A sample")
            .with_metadata(metadata_from(&json!({"language": "java"})).unwrap());
        let doc = project.to_document();

        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            vec![
                "created_at",
                "description",
                "metadata",
                "name",
                "path",
                "updated_at"
            ]
        );
        let created = doc["created_at"].as_str().unwrap();
        assert!(created.ends_with("+00:00"), "got {}", created);
        assert_eq!(doc["metadata"]["language"], "java");
    }

    #[test]
    fn test_document_sorts_nested_metadata_keys() {
        let mut nested = Map::new();
        nested.insert("zulu".into(), json!(1));
        nested.insert("alpha".into(), json!(2));
        let mut metadata = Map::new();
        metadata.insert("zeta".into(), Value::Object(nested));
        metadata.insert("beta".into(), json!([{"y": 1, "x": 2}]));
        let project = Project::new("Demo", "/tmp/Demo").with_metadata(metadata);

        let text = serde_json::to_string(&project.to_document()).unwrap();
        let position = |needle: &str| text.find(needle).unwrap();
        assert!(position("\"beta\"") < position("\"zeta\""));
        assert!(position("\"alpha\"") < position("\"zulu\""));
        assert!(position("\"x\"") < position("\"y\""));
        assert!(position("\"created_at\"") < position("\"name\""));
    }

    #[test]
    fn test_from_document_restores_fields() {
        let text = r#"{
            "name": "Demo",
            "path": "/elsewhere/Demo",
            "description": "desc",
            "metadata": {"nested": {"list": [1, 2, 3]}},
            "created_at": "2024-01-02T03:04:05+00:00",
            "updated_at": "2024-01-03T03:04:05+00:00"
        }"#;
        let project = Project::from_document(text, PathBuf::from("/store/Demo")).unwrap();
        assert_eq!(project.name(), "Demo");
        assert_eq!(project.path(), Path::new("/store/Demo"));
        assert_eq!(project.description, "desc");
        assert_eq!(project.metadata["nested"]["list"], json!([1, 2, 3]));
        assert!(project.created_at() < project.updated_at());
    }

    #[test]
    fn test_from_document_defaults_optional_fields() {
        let text = r#"{"name": "Demo", "created_at": "2024-01-02T03:04:05+00:00", "updated_at": "2024-01-02T03:04:05+00:00"}"#;
        let project = Project::from_document(text, PathBuf::from("/store/Demo")).unwrap();
        assert!(project.description.is_empty());
        assert!(project.metadata.is_empty());
    }

    #[test]
    fn test_from_document_missing_timestamp_is_not_initialized() {
        let text = r#"{"name": "Demo", "created_at": "2024-01-02T03:04:05+00:00"}"#;
        let err = Project::from_document(text, PathBuf::from("/store/Demo")).unwrap_err();
        assert!(matches!(err, ModgenError::NotInitialized(_)));
    }

    #[test]
    fn test_from_document_bad_timestamp_is_serialization_error() {
        let text = r#"{"name": "Demo", "created_at": "yesterday", "updated_at": "2024-01-02T03:04:05+00:00"}"#;
        let err = Project::from_document(text, PathBuf::from("/store/Demo")).unwrap_err();
        assert!(matches!(err, ModgenError::Serialization(_)));
    }

    #[test]
    fn test_from_document_truncated_body_is_serialization_error() {
        let err = Project::from_document(r#"{"name": "De"#, PathBuf::from("/store/Demo"))
            .unwrap_err();
        assert!(matches!(err, ModgenError::Serialization(_)));
    }

    #[test]
    fn test_metadata_from_rejects_non_object() {
        let err = metadata_from(&vec![1, 2]).unwrap_err();
        assert!(matches!(err, ModgenError::Serialization(_)));
    }

    #[test]
    fn test_metadata_from_rejects_non_string_keys() {
        let mut raw = std::collections::HashMap::new();
        raw.insert(vec![1u8], "value");
        let err = metadata_from(&raw).unwrap_err();
        assert!(matches!(err, ModgenError::Serialization(_)));
    }

    #[test]
    fn test_touch_never_precedes_creation() {
        let mut project = Project::new("Demo", "/tmp/Demo");
        project.touch();
        assert!(project.created_at() <= project.updated_at());
    }
}
