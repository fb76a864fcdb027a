//! Config Module
//!
//! Persistent application settings.

pub mod settings;

pub use settings::{
    AntialiasingSettings, AppSettings, SettingsError, SettingsStore, WindowSettings,
    SETTINGS_FILE,
};
