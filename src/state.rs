//! Durable pending-product state.
//!
//! The set of product ids awaiting backend processing is persisted as a JSON
//! array in a single state file so it survives process restarts. The file
//! holds a de-duplicated array and is deleted outright when the set drains;
//! every mutation is a whole-file read-modify-write.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

/// File-backed set of pending product ids.
pub struct PendingStore {
    path: PathBuf,
}

impl PendingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the pending set. A missing file is an empty set; a corrupt file
    /// is treated as empty rather than wedging the workflow.
    pub fn load(&self) -> Vec<String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!("Failed to read pending state {}: {}", self.path.display(), err);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&content) {
            Ok(ids) => dedup(ids),
            Err(err) => {
                warn!("Corrupt pending state {}: {}", self.path.display(), err);
                Vec::new()
            }
        }
    }

    /// Adds a product id; no-op if already present. Returns whether the set
    /// changed.
    pub fn register(&self, product_id: &str) -> Result<bool> {
        let mut ids = self.load();
        if ids.iter().any(|id| id == product_id) {
            return Ok(false);
        }

        ids.push(product_id.to_string());
        self.save(&ids)?;
        Ok(true)
    }

    /// Removes every listed id and returns the remaining set.
    pub fn remove_many(&self, resolved: &[String]) -> Result<Vec<String>> {
        let ids: Vec<String> =
            self.load().into_iter().filter(|id| !resolved.contains(id)).collect();
        self.save(&ids)?;
        Ok(ids)
    }

    /// Clears the set entirely.
    pub fn clear(&self) -> Result<()> {
        self.save(&[])
    }

    fn save(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            // Empty set means no state file at all
            match std::fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(err).with_context(|| {
                        format!("Failed to remove pending state: {}", self.path.display())
                    });
                }
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string(ids)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write pending state: {}", self.path.display()))
    }
}

fn dedup(ids: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_store(dir: &TempDir) -> PendingStore {
        PendingStore::new(dir.path().join("pending_products.json"))
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_register_and_reload() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);

        assert!(store.register("p1").unwrap());
        assert!(store.register("p2").unwrap());
        assert_eq!(store.load(), vec!["p1".to_string(), "p2".to_string()]);

        // A fresh store over the same path sees the persisted set
        let reopened = make_store(&dir);
        assert_eq!(reopened.load(), vec!["p1".to_string(), "p2".to_string()]);
    }

    #[test]
    fn test_register_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);

        assert!(store.register("p1").unwrap());
        assert!(!store.register("p1").unwrap());
        assert_eq!(store.load(), vec!["p1".to_string()]);
    }

    #[test]
    fn test_remove_many() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);
        store.register("p1").unwrap();
        store.register("p2").unwrap();
        store.register("p3").unwrap();

        let remaining = store.remove_many(&["p1".to_string(), "p3".to_string()]).unwrap();
        assert_eq!(remaining, vec!["p2".to_string()]);
        assert_eq!(store.load(), vec!["p2".to_string()]);
    }

    #[test]
    fn test_empty_set_removes_file() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);

        store.register("p1").unwrap();
        assert!(store.path().exists());

        store.remove_many(&["p1".to_string()]).unwrap();
        assert!(!store.path().exists());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);
        store.register("p1").unwrap();

        store.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);
        std::fs::write(store.path(), "not json at all").unwrap();

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_dedups_persisted_duplicates() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);
        std::fs::write(store.path(), r#"["p1", "p2", "p1"]"#).unwrap();

        assert_eq!(store.load(), vec!["p1".to_string(), "p2".to_string()]);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = PendingStore::new(dir.path().join("nested").join("state").join("pending.json"));

        store.register("p1").unwrap();
        assert_eq!(store.load(), vec!["p1".to_string()]);
    }
}
