use std::fs;
use std::path::PathBuf;

use super::models::Preferences;
use crate::error::StorageError;

/// File-backed preference store. Whole-file overwrite on save, so writes are
/// last-writer-wins.
#[derive(Clone)]
pub struct PrefsStore {
    base_path: PathBuf,
}

impl PrefsStore {
    /// Create a store with the default base directory ("./data")
    pub fn new() -> Self {
        Self {
            base_path: PathBuf::from("./data"),
        }
    }

    /// Create a store with a custom base directory (for testing)
    pub fn new_with_base_dir(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_path
    }

    fn prefs_path(&self) -> PathBuf {
        self.base_path.join("prefs.json")
    }

    /// Load preferences from disk, or defaults if the file does not exist yet
    pub fn load(&self) -> Result<Preferences, StorageError> {
        let path = self.prefs_path();
        if !path.exists() {
            return Ok(Preferences::default());
        }
        let contents = fs::read_to_string(path)?;
        let prefs = serde_json::from_str(&contents)?;
        Ok(prefs)
    }

    /// Save preferences to disk, creating the base directory if needed
    pub fn save(&self, prefs: &Preferences) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)?;
        let json = serde_json::to_string_pretty(prefs)?;
        fs::write(self.prefs_path(), json)?;
        Ok(())
    }
}

impl Default for PrefsStore {
    fn default() -> Self {
        Self::new()
    }
}
