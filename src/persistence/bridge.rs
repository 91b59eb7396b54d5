use super::codec::{decode_tasks, encode_tasks, encode_tasks_pretty};
use super::error::{ImportError, PersistenceError};
use super::files::atomic_write;
use super::storage::KeyValueStore;
use crate::domain::Task;
use anyhow::{Context, Result};
use std::path::Path;

/// Storage key holding the JSON task array
pub const TASKS_KEY: &str = "tasks";

/// Storage key holding the JSON dark-mode boolean
pub const DARK_MODE_KEY: &str = "darkMode";

/// State restored at startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedState {
    pub tasks: Vec<Task>,
    pub dark_mode: bool,
}

/// Mirrors the task collection and display preference into a key-value store
pub struct PersistenceBridge {
    store: Box<dyn KeyValueStore>,
}

impl PersistenceBridge {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load stored state. Unreadable or malformed values are logged and
    /// treated as absent; this never fails.
    pub fn load(&self) -> LoadedState {
        let tasks = match self.store.get(TASKS_KEY) {
            Ok(Some(raw)) => match decode_tasks(&raw) {
                Ok(tasks) => tasks,
                Err(e) => {
                    tracing::warn!(error = %e, "stored tasks are malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored tasks, starting empty");
                Vec::new()
            }
        };

        let dark_mode = match self.store.get(DARK_MODE_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "stored display preference is malformed");
                false
            }),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "could not read display preference");
                false
            }
        };

        tracing::info!(tasks = tasks.len(), dark_mode, "state loaded");
        LoadedState { tasks, dark_mode }
    }

    /// Write the full state back, both keys, no diffing
    pub fn save(&mut self, tasks: &[Task], dark_mode: bool) -> Result<(), PersistenceError> {
        let tasks_json = encode_tasks(tasks)?;
        self.store.set(TASKS_KEY, &tasks_json)?;
        let dark_json = serde_json::to_string(&dark_mode)?;
        self.store.set(DARK_MODE_KEY, &dark_json)?;
        Ok(())
    }

    /// Write a pretty-printed export document
    pub fn export<P: AsRef<Path>>(&self, tasks: &[Task], path: P) -> Result<()> {
        let path = path.as_ref();
        let content = encode_tasks_pretty(tasks).context("Failed to serialize tasks")?;
        atomic_write(path, &content)?;
        tracing::info!(path = %path.display(), tasks = tasks.len(), "tasks exported");
        Ok(())
    }

    /// Read and validate an import document. The caller replaces its
    /// collection only on success.
    pub fn import<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Task>, ImportError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        match decode_tasks(&content) {
            Ok(tasks) => {
                tracing::info!(path = %path.display(), tasks = tasks.len(), "tasks imported");
                Ok(tasks)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "import rejected");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, TaskStore};
    use crate::persistence::storage::{FileStore, MemoryStore};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample_tasks() -> Vec<Task> {
        let mut store = TaskStore::new();
        let now = Utc.timestamp_millis_opt(1_704_067_200_000).unwrap();
        let id = store
            .add("Buy milk", chrono::NaiveDate::from_ymd_opt(2024, 1, 1), Priority::Low, "shopping", now)
            .unwrap();
        store.add_subtask(id, "Oat", now);
        store.toggle_complete(id, now);
        store.add_time(id, 2.0 / 60.0);
        store.add("Call mum", None, Priority::High, "personal", now);
        store.tasks().to_vec()
    }

    #[test]
    fn test_load_empty_store() {
        let bridge = PersistenceBridge::new(Box::new(MemoryStore::new()));
        assert_eq!(bridge.load(), LoadedState::default());
    }

    #[test]
    fn test_load_malformed_tasks_starts_empty() {
        let store = MemoryStore::new()
            .with_value(TASKS_KEY, "{not json")
            .with_value(DARK_MODE_KEY, "true");
        let bridge = PersistenceBridge::new(Box::new(store));

        let loaded = bridge.load();
        assert!(loaded.tasks.is_empty());
        assert!(loaded.dark_mode);
    }

    #[test]
    fn test_load_malformed_preference_defaults() {
        let store = MemoryStore::new().with_value(DARK_MODE_KEY, "\"yes\"");
        let bridge = PersistenceBridge::new(Box::new(store));
        assert!(!bridge.load().dark_mode);
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = tempdir().unwrap();
        let tasks = sample_tasks();

        let mut bridge = PersistenceBridge::new(Box::new(FileStore::new(temp_dir.path())));
        bridge.save(&tasks, true).unwrap();

        let reopened = PersistenceBridge::new(Box::new(FileStore::new(temp_dir.path())));
        let loaded = reopened.load();
        assert_eq!(loaded.tasks, tasks);
        assert!(loaded.dark_mode);
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tasks-2024-01-01.json");
        let tasks = sample_tasks();

        let bridge = PersistenceBridge::new(Box::new(MemoryStore::new()));
        bridge.export(&tasks, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  {"), "export should be pretty-printed");

        let imported = bridge.import(&path).unwrap();
        assert_eq!(imported, tasks);
    }

    #[test]
    fn test_import_errors() {
        let temp_dir = tempdir().unwrap();
        let bridge = PersistenceBridge::new(Box::new(MemoryStore::new()));

        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(bridge.import(&missing), Err(ImportError::Read { .. })));

        let bad = temp_dir.path().join("bad.json");
        std::fs::write(&bad, "[{\"oops\": true}]").unwrap();
        assert!(matches!(bridge.import(&bad), Err(ImportError::Parse(_))));
    }
}
