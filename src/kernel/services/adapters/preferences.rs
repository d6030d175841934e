//! JSON file backing for [`PreferenceStore`].

use crate::kernel::services::ports::preferences::{PreferenceMap, PreferenceStore};
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::paths::get_preferences_path;

pub struct JsonPreferenceStore {
    path: PathBuf,
    // Serializes read-merge-write cycles issued from different runtime tasks.
    write_lock: Mutex<()>,
}

impl JsonPreferenceStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn at_default_location() -> Option<Self> {
        get_preferences_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> io::Result<PreferenceMap> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(PreferenceMap::new()),
            Err(err) => return Err(err),
        };
        match serde_json::from_str::<Value>(&data) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                tracing::warn!(path = %self.path.display(), "preferences file is not a JSON object; starting fresh");
                Ok(PreferenceMap::new())
            }
        }
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn load(&self) -> PreferenceMap {
        self.read_map().unwrap_or_else(|err| {
            tracing::warn!(path = %self.path.display(), error = %err, "cannot read preferences");
            PreferenceMap::new()
        })
    }

    fn merge(&self, patch: &PreferenceMap) -> io::Result<PreferenceMap> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut map = self.read_map()?;
        for (key, value) in patch {
            map.insert(key.clone(), value.clone());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&Value::Object(map.clone()))
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        std::fs::write(&self.path, content)?;
        Ok(map)
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/preferences.rs"]
mod tests;
