use modgen::storage::ProjectStore;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn create_temp_store() -> (ProjectStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let store = ProjectStore::new(tmp.path().join("projects")).expect("failed to open store");
    (store, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("modgen.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
