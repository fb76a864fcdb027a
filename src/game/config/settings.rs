//! Application Settings
//!
//! Window and antialiasing settings persisted in `app_settings.json`:
//!
//! ```json
//! {
//!   "window": { "width": 1280, "height": 720, "title": "Labyrinth Walk",
//!               "fullscreen": false, "vsync": true, "pos_x": 100, "pos_y": 100 },
//!   "antialiasing": { "enabled": false, "level": 0 }
//! }
//! ```
//!
//! Loading is tolerant: a missing or malformed file, or missing fields, fall
//! back to defaults. Saving merges into the existing document so unrelated
//! keys written by hand survive.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Default settings file, relative to the working directory.
pub const SETTINGS_FILE: &str = "app_settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub fullscreen: bool,
    pub vsync: bool,
    pub pos_x: i32,
    pub pos_y: i32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Labyrinth Walk".to_string(),
            fullscreen: false,
            vsync: true,
            pos_x: 100,
            pos_y: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntialiasingSettings {
    pub enabled: bool,
    pub level: u32,
}

impl AntialiasingSettings {
    /// Next step of the F11 cycle: off → 2x → 4x → 8x → off.
    ///
    /// Any level outside the cycle while enabled turns antialiasing off.
    pub fn cycled(self) -> Self {
        match (self.enabled, self.level) {
            (false, _) => Self { enabled: true, level: 2 },
            (true, 2) => Self { enabled: true, level: 4 },
            (true, 4) => Self { enabled: true, level: 8 },
            _ => Self { enabled: false, level: 0 },
        }
    }

    /// MSAA sample count to request from the GPU (1 = off).
    pub fn sample_count(&self) -> u32 {
        if self.enabled { self.level.max(1) } else { 1 }
    }
}

impl std::fmt::Display for AntialiasingSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.enabled {
            write!(f, "{}x", self.level)
        } else {
            write!(f, "off")
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub window: WindowSettings,
    pub antialiasing: AntialiasingSettings,
}

impl AppSettings {
    /// Parse a settings document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Reads and writes the settings file at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(SETTINGS_FILE)
    }
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Strict load: any I/O or parse problem is an error.
    pub fn try_load(&self) -> Result<AppSettings, SettingsError> {
        let json = std::fs::read_to_string(&self.path).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        AppSettings::from_json(&json).map_err(|source| SettingsError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Tolerant load: problems are logged and defaults returned.
    pub fn load(&self) -> AppSettings {
        match self.try_load() {
            Ok(settings) => {
                log::info!("Loaded settings from {}", self.path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                AppSettings::default()
            }
        }
    }

    /// Current document as a JSON object; missing or unreadable files start empty.
    fn read_document(&self) -> Map<String, Value> {
        let Ok(json) = std::fs::read_to_string(&self.path) else {
            return Map::new();
        };
        match serde_json::from_str::<Value>(&json) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                log::warn!(
                    "{} is not a JSON object, rewriting it",
                    self.path.display()
                );
                Map::new()
            }
        }
    }

    fn write_document(&self, document: Map<String, Value>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(&Value::Object(document)).map_err(|source| {
            SettingsError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, json).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Merge `fields` into the object stored under `section`.
    fn merge_section(&self, section: &str, fields: Value) -> Result<(), SettingsError> {
        let mut document = self.read_document();
        let entry = document
            .entry(section.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let (Value::Object(target), Value::Object(source)) = (entry, fields) {
            target.extend(source);
        }
        self.write_document(document)
    }

    /// Persist window geometry, fullscreen and vsync. Other keys are kept.
    pub fn save_window(&self, window: &WindowSettings) -> Result<(), SettingsError> {
        let fields = serde_json::json!({
            "width": window.width,
            "height": window.height,
            "fullscreen": window.fullscreen,
            "vsync": window.vsync,
            "pos_x": window.pos_x,
            "pos_y": window.pos_y,
        });
        self.merge_section("window", fields)
    }

    /// Advance the antialiasing setting stored in the file and write it back.
    ///
    /// Takes effect on the next start. Returns the new value.
    pub fn cycle_antialiasing(&self) -> Result<AntialiasingSettings, SettingsError> {
        let current = self
            .read_document()
            .get("antialiasing")
            .and_then(|v| serde_json::from_value::<AntialiasingSettings>(v.clone()).ok())
            .unwrap_or_default();
        let next = current.cycled();
        let fields = serde_json::json!({ "enabled": next.enabled, "level": next.level });
        self.merge_section("antialiasing", fields)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> SettingsStore {
        let path = std::env::temp_dir().join(format!(
            "labyrinth_settings_{}_{}.json",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        SettingsStore::new(path)
    }

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.window.width, 1280);
        assert_eq!(settings.window.height, 720);
        assert!(settings.window.vsync);
        assert!(!settings.window.fullscreen);
        assert_eq!((settings.window.pos_x, settings.window.pos_y), (100, 100));
        assert!(!settings.antialiasing.enabled);
        assert_eq!(settings.antialiasing.sample_count(), 1);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            AppSettings::from_json(r#"{ "window": { "width": 800 }, "extra": 1 }"#).unwrap();
        assert_eq!(settings.window.width, 800);
        assert_eq!(settings.window.height, 720);
        assert_eq!(settings.window.title, "Labyrinth Walk");
    }

    #[test]
    fn test_antialiasing_cycle() {
        let mut aa = AntialiasingSettings::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            aa = aa.cycled();
            seen.push(aa.to_string());
        }
        assert_eq!(seen, vec!["2x", "4x", "8x", "off"]);
        assert_eq!(aa.level, 0);

        let odd = AntialiasingSettings { enabled: true, level: 16 };
        assert!(!odd.cycled().enabled);
    }

    #[test]
    fn test_sample_count() {
        let aa = AntialiasingSettings { enabled: true, level: 4 };
        assert_eq!(aa.sample_count(), 4);
        let off = AntialiasingSettings { enabled: false, level: 8 };
        assert_eq!(off.sample_count(), 1);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let store = temp_store("missing");
        assert!(store.try_load().is_err());
        assert_eq!(store.load(), AppSettings::default());
    }

    #[test]
    fn test_malformed_file_loads_defaults() {
        let store = temp_store("malformed");
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.try_load(), Err(SettingsError::Json { .. })));
        assert_eq!(store.load(), AppSettings::default());
        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn test_window_round_trip() {
        let store = temp_store("round_trip");
        let settings = AppSettings {
            window: WindowSettings {
                width: 1600,
                height: 900,
                fullscreen: true,
                vsync: false,
                pos_x: -20,
                pos_y: 48,
                ..Default::default()
            },
            antialiasing: AntialiasingSettings { enabled: true, level: 2 },
        };
        store.save_window(&settings.window).unwrap();
        assert_eq!(store.cycle_antialiasing().unwrap(), settings.antialiasing);

        let loaded = store.try_load().unwrap();
        assert_eq!(loaded, settings);
        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn test_save_merges_existing_keys() {
        let store = temp_store("merge");
        std::fs::write(
            store.path(),
            r#"{ "window": { "title": "Custom", "width": 640 }, "antialiasing": { "enabled": true, "level": 4 }, "note": "keep" }"#,
        )
        .unwrap();

        let window = WindowSettings {
            width: 1024,
            ..Default::default()
        };
        store.save_window(&window).unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["note"], "keep");
        assert_eq!(raw["window"]["title"], "Custom");
        assert_eq!(raw["window"]["width"], 1024);
        assert_eq!(raw["antialiasing"]["level"], 4);
        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn test_cycle_antialiasing_writes_file() {
        let store = temp_store("cycle");
        assert_eq!(store.cycle_antialiasing().unwrap().to_string(), "2x");
        assert_eq!(store.cycle_antialiasing().unwrap().to_string(), "4x");

        let loaded = store.try_load().unwrap();
        assert_eq!(loaded.antialiasing, AntialiasingSettings { enabled: true, level: 4 });
        let _ = std::fs::remove_file(store.path());
    }
}
