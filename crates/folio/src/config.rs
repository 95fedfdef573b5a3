use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::deck::DeckTiming;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "folio";

const VALID_KEYS: &str = "defaults.theme, defaults.windowed, deck.cooldown_ms, deck.grace_ms, deck.construct_delay_ms";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<DeckConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windowed: Option<bool>,
}

/// Timing overrides, in milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construct_delay_ms: Option<u64>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `folio config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# folio configuration - https://github.com/mklab-se/folio\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn theme(&self) -> &str {
        self.defaults
            .as_ref()
            .and_then(|d| d.theme.as_deref())
            .unwrap_or("dark")
    }

    pub fn windowed(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.windowed)
            .unwrap_or(false)
    }

    /// Deck timing with any configured overrides applied.
    pub fn timing(&self) -> DeckTiming {
        let mut timing = DeckTiming::default();
        if let Some(deck) = &self.deck {
            if let Some(ms) = deck.cooldown_ms {
                timing.cooldown = Duration::from_millis(ms);
            }
            if let Some(ms) = deck.grace_ms {
                timing.grace = Duration::from_millis(ms);
            }
            if let Some(ms) = deck.construct_delay_ms {
                timing.construct_delay = Duration::from_millis(ms);
            }
        }
        timing
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.windowed" => {
                let windowed = match value {
                    "true" => true,
                    "false" => false,
                    _ => anyhow::bail!("Invalid windowed: {value}. Must be 'true' or 'false'."),
                };
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .windowed = Some(windowed);
            }
            "deck.cooldown_ms" | "deck.grace_ms" | "deck.construct_delay_ms" => {
                let Ok(ms) = value.parse::<u64>() else {
                    anyhow::bail!("Invalid {key}: {value}. Must be a whole number of milliseconds.");
                };
                let deck = self.deck.get_or_insert_with(DeckConfig::default);
                match key {
                    "deck.cooldown_ms" => deck.cooldown_ms = Some(ms),
                    "deck.grace_ms" => deck.grace_ms = Some(ms),
                    _ => deck.construct_delay_ms = Some(ms),
                }
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {VALID_KEYS}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_theme() {
        let mut config = Config::default();
        config.set("defaults.theme", "light").unwrap();
        assert_eq!(config.theme(), "light");
        assert!(config.set("defaults.theme", "sepia").is_err());
        assert_eq!(config.theme(), "light");
    }

    #[test]
    fn test_set_windowed() {
        let mut config = Config::default();
        assert!(!config.windowed());
        config.set("defaults.windowed", "true").unwrap();
        assert!(config.windowed());
        assert!(config.set("defaults.windowed", "yes").is_err());
    }

    #[test]
    fn test_timing_overrides() {
        let mut config = Config::default();
        assert_eq!(config.timing(), DeckTiming::default());
        config.set("deck.cooldown_ms", "400").unwrap();
        config.set("deck.grace_ms", "50").unwrap();
        config.set("deck.construct_delay_ms", "500").unwrap();
        let timing = config.timing();
        assert_eq!(timing.cooldown, Duration::from_millis(400));
        assert_eq!(timing.grace, Duration::from_millis(50));
        assert_eq!(timing.construct_delay, Duration::from_millis(500));
        assert_eq!(timing.exit, DeckTiming::default().exit);
    }

    #[test]
    fn test_rejects_bad_values_and_keys() {
        let mut config = Config::default();
        assert!(config.set("deck.cooldown_ms", "-1").is_err());
        assert!(config.set("deck.grace_ms", "fast").is_err());
        let err = config.set("defaults.transition", "fade").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
        assert!(config.deck.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("folio-config-{}", std::process::id()));
        let path = dir.join(FILENAME);
        let mut config = Config::default();
        config.set("defaults.theme", "light").unwrap();
        config.set("deck.cooldown_ms", "750").unwrap();
        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# folio configuration"));
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme(), "light");
        assert_eq!(loaded.timing().cooldown, Duration::from_millis(750));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_hint() {
        let err = Config::load_from(Path::new("/nonexistent/folio/config.yaml")).unwrap_err();
        assert!(err.to_string().contains("folio config show"));
    }
}
