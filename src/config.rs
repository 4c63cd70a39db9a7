//! Persisted user preferences.
//!
//! Two favorite output devices are stored as a small JSON file next to the
//! executable. Loading never fails: a missing or corrupt file yields both
//! favorites unset. Saving is best-effort; the in-memory state stays
//! authoritative for the running process if the write fails.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the preference record, located beside the binary.
pub const CONFIG_FILE_NAME: &str = "audio_switcher_config.json";

/// One of the two quick-switch favorite slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FavoriteSlot {
    One,
    Two,
}

impl FavoriteSlot {
    /// 1-based slot number, as shown in menu labels.
    pub fn number(&self) -> u8 {
        match self {
            FavoriteSlot::One => 1,
            FavoriteSlot::Two => 2,
        }
    }
}

/// User preferences: the two favorite device ids.
///
/// Serialized as `{"favorite1": ..., "favorite2": ...}` with `null` for an
/// unset slot, matching the on-disk record across restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub favorite1: Option<String>,
    pub favorite2: Option<String>,
}

impl Preferences {
    /// Get the device id assigned to a slot, if any.
    pub fn favorite(&self, slot: FavoriteSlot) -> Option<&str> {
        match slot {
            FavoriteSlot::One => self.favorite1.as_deref(),
            FavoriteSlot::Two => self.favorite2.as_deref(),
        }
    }

    /// Assign a device id to a slot. Slots can only be overwritten, never
    /// cleared.
    pub fn set_favorite(&mut self, slot: FavoriteSlot, device_id: String) {
        match slot {
            FavoriteSlot::One => self.favorite1 = Some(device_id),
            FavoriteSlot::Two => self.favorite2 = Some(device_id),
        }
    }

    /// Decide which favorite the left-click toggle should activate.
    ///
    /// Returns `None` unless both favorites are set. If the current default
    /// is favorite 1 the target is favorite 2; in every other case
    /// (favorite 2, an unrelated device, or no readable default) the target
    /// is favorite 1. The asymmetry is deliberate: after switching to some
    /// third device manually, the first click always lands on favorite 1.
    pub fn toggle_target(&self, current_default: Option<&str>) -> Option<&str> {
        let fav1 = self.favorite1.as_deref()?;
        let fav2 = self.favorite2.as_deref()?;

        if current_default == Some(fav1) {
            Some(fav2)
        } else {
            Some(fav1)
        }
    }
}

/// Preference store bound to a config file path.
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Create a store for an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store for the default location beside the executable.
    ///
    /// Falls back to the working directory if the executable path cannot be
    /// resolved.
    pub fn beside_executable() -> Self {
        let path = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        Self { path }
    }

    /// The path this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences from disk. Never fails: missing, unreadable, and
    /// malformed files all yield both favorites unset.
    pub fn load(&self) -> Preferences {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "no preference file");
                return Preferences::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt preference file");
                Preferences::default()
            }
        }
    }

    /// Write preferences to disk as pretty-printed JSON, best-effort.
    ///
    /// Returns whether the write succeeded; failures are logged and
    /// otherwise swallowed.
    pub fn save(&self, prefs: &Preferences) -> bool {
        let json = match serde_json::to_string_pretty(prefs) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize preferences");
                return false;
            }
        };

        match std::fs::write(&self.path, json) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to write preferences");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> PreferenceStore {
        PreferenceStore::new(dir.path().join(CONFIG_FILE_NAME))
    }

    #[test]
    fn load_on_missing_file_is_unset() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = store_in(&dir).load();
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn load_on_empty_file_is_unset() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "").unwrap();
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn load_on_invalid_json_is_unset() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{favorite1: not json").unwrap();
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut prefs = Preferences::default();
        prefs.set_favorite(FavoriteSlot::One, "{dev-a}".to_string());
        assert!(store.save(&prefs));
        assert_eq!(store.load(), prefs);

        // Both-unset is also a valid persisted state.
        assert!(store.save(&Preferences::default()));
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn set_favorite_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut prefs = store.load();
        prefs.set_favorite(FavoriteSlot::Two, "{dev-b}".to_string());
        store.save(&prefs);

        // A fresh store on the same path simulates a process restart.
        let reloaded = PreferenceStore::new(store.path()).load();
        assert_eq!(reloaded.favorite(FavoriteSlot::Two), Some("{dev-b}"));
        assert_eq!(reloaded.favorite(FavoriteSlot::One), None);
    }

    #[test]
    fn null_fields_deserialize_as_unset() {
        let prefs: Preferences =
            serde_json::from_str(r#"{"favorite1": null, "favorite2": "{dev-b}"}"#).unwrap();
        assert_eq!(prefs.favorite1, None);
        assert_eq!(prefs.favorite2.as_deref(), Some("{dev-b}"));
    }

    #[test]
    fn overwrite_is_the_only_transition() {
        // Once assigned, a slot can be reassigned but never cleared.
        let mut prefs = Preferences::default();
        prefs.set_favorite(FavoriteSlot::One, "{dev-a}".to_string());
        prefs.set_favorite(FavoriteSlot::One, "{dev-b}".to_string());
        assert_eq!(prefs.favorite(FavoriteSlot::One), Some("{dev-b}"));
    }

    #[test]
    fn toggle_requires_both_favorites() {
        let mut prefs = Preferences::default();
        assert_eq!(prefs.toggle_target(Some("{dev-a}")), None);

        prefs.set_favorite(FavoriteSlot::One, "{dev-a}".to_string());
        assert_eq!(prefs.toggle_target(Some("{dev-a}")), None);
        assert_eq!(prefs.toggle_target(None), None);
    }

    #[test]
    fn toggle_is_asymmetric() {
        let prefs = Preferences {
            favorite1: Some("{dev-a}".to_string()),
            favorite2: Some("{dev-b}".to_string()),
        };

        // On favorite 1 -> favorite 2; everywhere else -> favorite 1.
        assert_eq!(prefs.toggle_target(Some("{dev-a}")), Some("{dev-b}"));
        assert_eq!(prefs.toggle_target(Some("{dev-b}")), Some("{dev-a}"));
        assert_eq!(prefs.toggle_target(Some("{dev-c}")), Some("{dev-a}"));
        assert_eq!(prefs.toggle_target(None), Some("{dev-a}"));
    }
}
