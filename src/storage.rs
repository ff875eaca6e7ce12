//! Preference storage - small string key/value store plus an OS dark-mode signal

use anyhow::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::constants::PREFERENCES_FILE;

/// Source of persisted UI preferences
pub trait PreferenceProvider: Send {
    /// Read a stored value
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// OS-level dark color scheme preference, if one can be detected
    fn prefers_dark(&self) -> Option<bool>;
}

/// Preferences persisted as a YAML map in the config directory
pub struct FilePreferences {
    values: BTreeMap<String, String>,
    config_dir: PathBuf,
    color_hint: Option<String>,
}

impl FilePreferences {
    pub fn new(config_dir: PathBuf) -> Self {
        let mut prefs = FilePreferences {
            values: BTreeMap::new(),
            config_dir,
            color_hint: std::env::var("COLORFGBG").ok(),
        };

        if let Err(e) = prefs.load() {
            tracing::warn!(error = %e, "Could not read preferences file");
        }
        prefs
    }

    /// Override the terminal color hint (normally taken from `COLORFGBG`)
    pub fn with_color_hint(mut self, hint: Option<String>) -> Self {
        self.color_hint = hint;
        self
    }

    fn path(&self) -> PathBuf {
        self.config_dir.join(PREFERENCES_FILE)
    }

    fn load(&mut self) -> Result<()> {
        let path = self.path();
        if !path.exists() {
            return Ok(());
        }
        let content = fs::read_to_string(&path)?;
        self.values = serde_yaml::from_str(&content)?;
        Ok(())
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }
}

impl PreferenceProvider for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.ensure_dir()?;
        let content = serde_yaml::to_string(&self.values)?;
        fs::write(self.path(), content)?;
        Ok(())
    }

    fn prefers_dark(&self) -> Option<bool> {
        self.color_hint.as_deref().and_then(background_is_dark)
    }
}

/// Interpret a `COLORFGBG` value ("fg;bg" or "fg;default;bg").
///
/// The last field is the background palette index. Indices 0-6 and 8 are
/// dark colors; 7 and 9-15 are light.
pub fn background_is_dark(colorfgbg: &str) -> Option<bool> {
    let bg = colorfgbg.rsplit(';').next()?.trim().parse::<u8>().ok()?;
    match bg {
        0..=6 | 8 => Some(true),
        7 | 9..=15 => Some(false),
        _ => None,
    }
}

/// In-memory preferences, used when no file store is wanted
#[derive(Default, Clone, Debug)]
pub struct MemoryPreferences {
    pub values: BTreeMap<String, String>,
    pub dark_signal: Option<bool>,
    /// Every write in order
    pub writes: Vec<(String, String)>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_dark_signal(mut self, signal: Option<bool>) -> Self {
        self.dark_signal = signal;
        self
    }
}

impl PreferenceProvider for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.writes.push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn prefers_dark(&self) -> Option<bool> {
        self.dark_signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_preferences_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("nested");

        let mut prefs = FilePreferences::new(config_dir.clone()).with_color_hint(None);
        assert_eq!(prefs.get("theme"), None);
        prefs.set("theme", "light").unwrap();

        let reopened = FilePreferences::new(config_dir);
        assert_eq!(reopened.get("theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PREFERENCES_FILE), "not: [valid").unwrap();
        let prefs = FilePreferences::new(dir.path().to_path_buf());
        assert_eq!(prefs.get("theme"), None);
    }

    #[test]
    fn test_colorfgbg_parsing() {
        assert_eq!(background_is_dark("15;0"), Some(true));
        assert_eq!(background_is_dark("0;15"), Some(false));
        assert_eq!(background_is_dark("12;default;8"), Some(true));
        assert_eq!(background_is_dark("default"), None);
        assert_eq!(background_is_dark("0;200"), None);
    }
}
