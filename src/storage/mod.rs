//! Filesystem-backed project store
//!
//! Each project lives in `<root>/<slug>/project.json`. Nothing is cached
//! between calls; every read goes back to disk. Writes overwrite the single
//! metadata document in place, so two callers sharing a root race with
//! last-writer-wins semantics.

use crate::error::{ModgenError, Result};
use directories::BaseDirs;
use std::fs;
use std::path::{Path, PathBuf};

pub mod slug;
pub mod types;

pub use slug::slugify;
pub use types::{metadata_from, Project, ProjectMetadata};

/// Name of the metadata document inside each project directory
pub const PROJECT_FILE_NAME: &str = "project.json";

/// A project found while listing the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    /// Name recorded in the metadata document
    pub name: String,
    /// Directory holding the document
    pub path: PathBuf,
}

/// Options accepted by [`ProjectStore::create_project`]
#[derive(Debug, Clone, Default)]
pub struct CreateProjectOptions {
    /// Free text description
    pub description: String,
    /// Initial metadata
    pub metadata: ProjectMetadata,
    /// Reuse an existing project directory instead of failing
    pub overwrite: bool,
}

impl CreateProjectOptions {
    /// Set the description and return self
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the metadata and return self
    pub fn metadata(mut self, metadata: ProjectMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the overwrite flag and return self
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Default project root: `<home>/.modgen/projects`
pub fn default_root() -> Result<PathBuf> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| ModgenError::Config("Could not determine home directory".into()))?;
    Ok(dirs.home_dir().join(".modgen").join("projects"))
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}

/// Repository of projects stored under a root directory
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    /// Open a store rooted at `root`, creating the directory if needed
    ///
    /// A leading `~` is expanded and the root is resolved to an absolute
    /// path.
    ///
    /// # Examples
    ///
    /// ```
    /// use modgen::storage::ProjectStore;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = ProjectStore::new(dir.path()).unwrap();
    /// assert!(store.root().is_absolute());
    /// ```
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = expand_home(root.as_ref());
        fs::create_dir_all(&root)?;
        let root = fs::canonicalize(&root)?;
        tracing::debug!("Opened project store at {}", root.display());
        Ok(Self { root })
    }

    /// Open the store at [`default_root`]
    pub fn open_default() -> Result<Self> {
        Self::new(default_root()?)
    }

    /// Root directory under which projects are stored
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory a project with `name` lives in
    ///
    /// # Errors
    ///
    /// Returns `ModgenError::InvalidName` if the name produces an empty slug
    pub fn project_path(&self, name: &str) -> Result<PathBuf> {
        Ok(self.root.join(slugify(name)?))
    }

    /// Create a new project on disk
    ///
    /// # Arguments
    ///
    /// * `name` - Display name; the directory is its slug
    /// * `options` - Description, metadata and overwrite flag
    ///
    /// # Returns
    ///
    /// Returns the saved project with `created_at == updated_at`
    ///
    /// # Errors
    ///
    /// - `ModgenError::InvalidName` if the name produces an empty slug
    /// - `ModgenError::AlreadyExists` if the directory exists and
    ///   `options.overwrite` is false
    /// - `ModgenError::Serialization` if the document cannot be encoded;
    ///   nothing is written in that case
    pub fn create_project(&self, name: &str, options: CreateProjectOptions) -> Result<Project> {
        let project_path = self.project_path(name)?;
        if project_path.exists() && !options.overwrite {
            return Err(ModgenError::AlreadyExists(name.to_string()));
        }

        let mut project = Project::new(name, project_path.clone())
            .with_description(options.description)
            .with_metadata(options.metadata);
        encode_document(&project)?;

        fs::create_dir_all(&project_path)?;
        self.save_project(&mut project)?;
        tracing::info!(
            "Created project '{}' at {}",
            project.name(),
            project_path.display()
        );
        Ok(project)
    }

    /// Persist a project, refreshing its `updated_at`
    ///
    /// The document is written indented with sorted keys to
    /// `<project.path>/project.json`; missing parent directories are created.
    pub fn save_project(&self, project: &mut Project) -> Result<()> {
        project.touch();
        let body = encode_document(project)?;
        let metadata_path = project.path().join(PROJECT_FILE_NAME);
        if let Some(parent) = metadata_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&metadata_path, body)?;
        tracing::debug!("Wrote {}", metadata_path.display());
        Ok(())
    }

    /// Load a project by name
    ///
    /// The returned project's path is the store directory, whatever path the
    /// document recorded.
    ///
    /// # Errors
    ///
    /// - `ModgenError::InvalidName` if the name produces an empty slug
    /// - `ModgenError::NotFound` if the project directory is absent
    /// - `ModgenError::NotInitialized` if the metadata document is absent or
    ///   lacks required fields
    /// - `ModgenError::Serialization` if the document cannot be decoded
    pub fn load_project(&self, name: &str) -> Result<Project> {
        let project_path = self.project_path(name)?;
        if !project_path.exists() {
            return Err(ModgenError::NotFound(name.to_string()));
        }
        let metadata_path = project_path.join(PROJECT_FILE_NAME);
        if !metadata_path.exists() {
            return Err(ModgenError::NotInitialized(format!(
                "Project '{}' is missing metadata at {}",
                name,
                metadata_path.display()
            )));
        }
        let text = fs::read_to_string(&metadata_path)?;
        Project::from_document(&text, project_path)
    }

    /// Names of all projects under the root, ordered by slug
    ///
    /// Directories without a metadata document, or whose document is not
    /// valid JSON, are skipped.
    pub fn list_projects(&self) -> Result<Vec<String>> {
        Ok(self
            .list_entries()?
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    /// Every listable project with the directory it was read from
    ///
    /// Same filtering and order as [`ProjectStore::list_projects`]. The
    /// name comes from the document and falls back to the directory name.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the root cannot be read
    pub fn list_entries(&self) -> Result<Vec<ProjectEntry>> {
        let mut dirs: Vec<PathBuf> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();

        let mut entries = Vec::new();
        for dir in dirs {
            let metadata_path = dir.join(PROJECT_FILE_NAME);
            if !metadata_path.is_file() {
                continue;
            }
            let payload = match fs::read_to_string(&metadata_path)
                .map_err(|e| e.to_string())
                .and_then(|text| {
                    serde_json::from_str::<serde_json::Value>(&text).map_err(|e| e.to_string())
                }) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", metadata_path.display(), e);
                    continue;
                }
            };
            let name = payload
                .get("name")
                .and_then(|n| n.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    dir.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                });
            entries.push(ProjectEntry { name, path: dir });
        }
        Ok(entries)
    }

    /// Whether a project directory and its metadata document both exist
    pub fn project_exists(&self, name: &str) -> Result<bool> {
        let project_path = self.project_path(name)?;
        Ok(project_path.is_dir() && project_path.join(PROJECT_FILE_NAME).is_file())
    }
}

fn encode_document(project: &Project) -> Result<String> {
    serde_json::to_string_pretty(&project.to_document()).map_err(|e| {
        ModgenError::Serialization(format!("Metadata must be JSON serialisable: {}", e))
    })
}
