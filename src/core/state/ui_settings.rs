//! Process-wide editing toggles

use crate::core::errors::{AppResult, DrillContext};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiToggle {
    LockX,
    LockY,
    PreviousPaths,
    NextPaths,
    Playing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiSettings {
    /// Selected markers cannot move along x
    pub lock_x: bool,
    /// Selected markers cannot move along y
    pub lock_y: bool,
    pub show_previous_paths: bool,
    pub show_next_paths: bool,
    /// Playback state is never persisted
    #[serde(skip)]
    pub is_playing: bool,
}

impl UiSettings {
    pub fn get(&self, toggle: UiToggle) -> bool {
        match toggle {
            UiToggle::LockX => self.lock_x,
            UiToggle::LockY => self.lock_y,
            UiToggle::PreviousPaths => self.show_previous_paths,
            UiToggle::NextPaths => self.show_next_paths,
            UiToggle::Playing => self.is_playing,
        }
    }

    pub fn set(&mut self, toggle: UiToggle, value: bool) {
        let flag = match toggle {
            UiToggle::LockX => &mut self.lock_x,
            UiToggle::LockY => &mut self.lock_y,
            UiToggle::PreviousPaths => &mut self.show_previous_paths,
            UiToggle::NextPaths => &mut self.show_next_paths,
            UiToggle::Playing => &mut self.is_playing,
        };
        *flag = value;
    }

    /// Flips a toggle and returns its new value
    pub fn toggle(&mut self, toggle: UiToggle) -> bool {
        let value = !self.get(toggle);
        self.set(toggle, value);
        value
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_file_context("read", path)?;
        serde_json::from_str(&text).with_file_context("parse", path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).with_file_context("serialize", path)?;
        fs::write(path, text).with_file_context("write", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_restores_state() {
        let mut settings = UiSettings::default();
        assert!(settings.toggle(UiToggle::LockX));
        assert!(settings.lock_x);
        assert!(!settings.toggle(UiToggle::LockX));
        assert_eq!(settings, UiSettings::default());
    }

    #[test]
    fn settings_round_trip_through_disk_without_playback() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("drillcraft-settings.json");
        let settings = UiSettings {
            lock_y: true,
            show_next_paths: true,
            is_playing: true,
            ..Default::default()
        };

        settings.save_to_path(&path).unwrap();
        let loaded = UiSettings::load_from_path(&path).unwrap();

        assert!(loaded.lock_y && loaded.show_next_paths);
        assert!(!loaded.is_playing);
    }

    #[test]
    fn missing_fields_default_to_off() {
        let settings: UiSettings = serde_json::from_str(r#"{"lockX": true}"#).unwrap();
        assert!(settings.lock_x);
        assert!(!settings.show_previous_paths);
    }
}
