//! Persisted settings: a flat TOML file in the user's home directory.
//!
//! The file is an interface shared with other front-ends, so keys we do not
//! recognize are kept and written back untouched. Anything that goes wrong
//! while reading (missing file, bad TOML) silently falls back to defaults:
//! a broken settings file must never take the editor down with it.

use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Floor for the calltip auto-hide duration, applied at point of use.
const MIN_CALLTIP_TIMEOUT_MS: u64 = 500;

/// Recognized settings keys with their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub show_calltips: bool,
    pub calltip_timeout_ms: u64,
    /// Used by GUI front-ends; round-tripped but ignored by the TUI.
    pub font_size: u32,
    pub word_wrap: bool,
    /// Unrecognized keys, preserved across load/save.
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            show_calltips: true,
            calltip_timeout_ms: 2500,
            font_size: 13,
            word_wrap: true,
            extra: toml::Table::new(),
        }
    }
}

impl Settings {
    /// Location of the settings file (`~/.sypad.toml`).
    fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".sypad.toml"))
    }

    /// Load settings from the default location.
    pub fn load() -> Self {
        Self::path().map_or_else(Self::default, |p| Self::load_from(&p))
    }

    /// Load settings from `path`, falling back to defaults on any failure.
    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Persist to the default location. Write errors are swallowed: losing
    /// a preference is not worth interrupting an editing session.
    pub fn save(&self) {
        if let Some(p) = Self::path() {
            self.save_to(&p);
        }
    }

    fn save_to(&self, path: &Path) {
        if let Ok(s) = toml::to_string_pretty(self) {
            let _ = fs::write(path, s);
        }
    }

    /// Calltip auto-hide duration, clamped to the minimum.
    pub fn calltip_timeout(&self) -> Duration {
        Duration::from_millis(self.calltip_timeout_ms.max(MIN_CALLTIP_TIMEOUT_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.theme, Theme::Dark);
        assert!(s.show_calltips);
        assert_eq!(s.calltip_timeout_ms, 2500);
        assert_eq!(s.font_size, 13);
        assert!(s.word_wrap);
    }

    #[test]
    fn parses_recognized_keys() {
        let s: Settings = toml::from_str(
            "theme = \"light\"\nshow_calltips = false\ncalltip_timeout_ms = 4000\n",
        )
        .unwrap();
        assert_eq!(s.theme, Theme::Light);
        assert!(!s.show_calltips);
        assert_eq!(s.calltip_timeout_ms, 4000);
        // unspecified keys fall back to defaults
        assert_eq!(s.font_size, 13);
    }

    #[test]
    fn unknown_keys_round_trip() {
        let s: Settings = toml::from_str("theme = \"dark\"\nfuture_flag = 7\n").unwrap();
        assert_eq!(s.extra.get("future_flag"), Some(&toml::Value::Integer(7)));

        let written = toml::to_string_pretty(&s).unwrap();
        let back: Settings = toml::from_str(&written).unwrap();
        assert_eq!(back.extra.get("future_flag"), Some(&toml::Value::Integer(7)));
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("sypad_corrupt_settings_test.toml");
        fs::write(&path, "theme = [not toml").unwrap();
        let s = Settings::load_from(&path);
        assert_eq!(s.theme, Theme::Dark);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let s = Settings::load_from(Path::new("/nonexistent/sypad.toml"));
        assert!(s.show_calltips);
    }

    #[test]
    fn save_and_reload() {
        let path = std::env::temp_dir().join("sypad_save_settings_test.toml");
        let mut s = Settings::default();
        s.theme = Theme::Light;
        s.word_wrap = false;
        s.save_to(&path);
        let back = Settings::load_from(&path);
        assert_eq!(back.theme, Theme::Light);
        assert!(!back.word_wrap);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn calltip_timeout_clamps_to_minimum() {
        let mut s = Settings::default();
        s.calltip_timeout_ms = 100;
        assert_eq!(s.calltip_timeout(), Duration::from_millis(500));
        s.calltip_timeout_ms = 3000;
        assert_eq!(s.calltip_timeout(), Duration::from_millis(3000));
    }
}
