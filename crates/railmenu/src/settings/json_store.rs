//! JSON file settings store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use railmenu_core::logging::targets;

use super::error::{SettingsError, SettingsResult};
use super::store::{SettingValue, SettingsStore};

/// A settings store backed by a flat JSON object.
///
/// Values are stored untagged: booleans, integers, strings and arrays map
/// to their JSON counterparts.
///
/// ```json
/// {
///   "Alerter": true,
///   "ControlHorn": "57,0,0,0,0"
/// }
/// ```
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, SettingValue>>,
}

impl JsonStore {
    /// Opens `path`. A missing file starts an empty store.
    pub fn open(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| SettingsError::io(&path, e))?;
            serde_json::from_str(&content).map_err(|e| SettingsError::json(&path, e))?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonStore {
    fn get(&self, name: &str) -> Option<SettingValue> {
        self.values.read().get(name).cloned()
    }

    fn set(&self, name: &str, value: SettingValue) {
        self.values.write().insert(name.to_string(), value);
    }

    fn remove(&self, name: &str) {
        self.values.write().remove(name);
    }

    fn names(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }

    fn flush(&self) -> SettingsResult<()> {
        let json = serde_json::to_string_pretty(&*self.values.read())
            .map_err(|e| SettingsError::json(&self.path, e))?;
        std::fs::write(&self.path, json).map_err(|e| SettingsError::io(&self.path, e))?;
        tracing::debug!(target: targets::SETTINGS, path = %self.path.display(), "settings written");
        Ok(())
    }
}

static_assertions::assert_impl_all!(JsonStore: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = JsonStore::open(&path).unwrap();
        store.set("ControlHorn", "57,0,0,0,0".into());
        store.set("Volume", 80.into());
        store.set("Recent", vec!["Explorer".to_string()].into());
        store.flush().unwrap();

        let reopened = JsonStore::open(&path).unwrap();
        assert_eq!(reopened.get("ControlHorn"), Some("57,0,0,0,0".into()));
        assert_eq!(reopened.get("Volume"), Some(SettingValue::Int(80)));
        assert_eq!(
            reopened.get("Recent"),
            Some(SettingValue::StringList(vec!["Explorer".to_string()]))
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonStore::open(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Json { .. }));
    }
}
