//! UI state kept between sessions: the active screen and each screen's
//! page size. Stored as pretty JSON next to the config.

use formdesk_core::{Resource, RowsPerPage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub active_screen: Resource,
    /// Keyed by the resource path segment.
    #[serde(default)]
    pub rows_per_page: BTreeMap<String, RowsPerPage>,
}

impl PersistedState {
    pub fn rows_for(&self, resource: Resource) -> Option<RowsPerPage> {
        self.rows_per_page.get(resource.path()).copied()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Cannot access UI state file: {0}")]
    Io(#[from] std::io::Error),
    #[error("UI state file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// `Ok(None)` when nothing has been saved yet, including an empty file.
pub fn load(path: &Path) -> Result<Option<PersistedState>, PersistenceError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    if contents.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Writes through a sibling temp file so an interrupted save never leaves a
/// truncated state file behind.
pub fn save(path: &Path, state: &PersistedState) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let staging = staging_path(path);
    std::fs::write(&staging, serde_json::to_vec_pretty(state)?)?;
    std::fs::rename(&staging, path)?;
    tracing::debug!(path = %path.display(), "Saved UI state");
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PersistedState {
        let mut rows_per_page = BTreeMap::new();
        rows_per_page.insert("users".to_string(), RowsPerPage::Twenty);
        PersistedState {
            active_screen: Resource::Users,
            rows_per_page,
        }
    }

    #[test]
    fn test_missing_and_empty_files_load_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        assert!(load(&path).unwrap().is_none());
        std::fs::write(&path, "  \n").unwrap();
        assert!(load(&path).unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        save(&path, &sample()).unwrap();
        assert_eq!(load(&path).unwrap(), Some(sample()));
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_garbage_is_a_serde_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load(&path), Err(PersistenceError::Serde(_))));
    }

    #[test]
    fn test_rows_for_reads_by_path_segment() {
        let state = sample();
        assert_eq!(state.rows_for(Resource::Users), Some(RowsPerPage::Twenty));
        assert_eq!(state.rows_for(Resource::LeaveTypes), None);
    }
}
