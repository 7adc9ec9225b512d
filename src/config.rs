use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::game;

/// The sole durable state: the game content directory everything else is
/// derived from. Stored as `config.json` in the app data dir.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub game_base_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game_base_path: game::default_base_path(),
        }
    }
}

impl AppConfig {
    /// Loads the saved config. A missing file is created with defaults; an
    /// unreadable or malformed file is treated as absent and defaults are
    /// used without surfacing an error to the user.
    pub fn load_or_create() -> Result<Self> {
        let base_dir = base_data_dir()?;
        fs::create_dir_all(&base_dir).context("create app data dir")?;
        let path = base_dir.join("config.json");
        if path.exists() {
            return Ok(Self::load_from(&path));
        }

        let config = AppConfig::default();
        config.save_to(&path)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let base_dir = base_data_dir()?;
        fs::create_dir_all(&base_dir).context("create app data dir")?;
        self.save_to(&base_dir.join("config.json"))
    }

    fn load_from(path: &std::path::Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn save_to(&self, path: &std::path::Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self).context("serialize app config")?;
        fs::write(path, raw).context("write app config")?;
        Ok(())
    }
}

pub fn base_data_dir() -> Result<PathBuf> {
    let base = BaseDirs::new().context("resolve home dir")?;
    Ok(base.data_local_dir().join("pakswap"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn round_trips_through_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        let config = AppConfig {
            game_base_path: PathBuf::from("/games/sb/SB/Content"),
        };

        config.save_to(&path).unwrap();
        let loaded = AppConfig::load_from(&path);

        assert_eq!(loaded.game_base_path, config.game_base_path);
    }

    #[test]
    fn on_disk_field_name_is_stable() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        let config = AppConfig {
            game_base_path: PathBuf::from("/games/sb/SB/Content"),
        };

        config.save_to(&path).unwrap();
        let raw = fs::read_to_string(&path).unwrap();

        assert!(raw.contains("\"game_base_path\""));
    }

    #[test]
    fn malformed_file_falls_back_to_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();

        let loaded = AppConfig::load_from(&path);

        assert_eq!(loaded.game_base_path, AppConfig::default().game_base_path);
    }

    #[test]
    fn unrecognized_fields_are_ignored() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            br#"{ "game_base_path": "/sb/Content", "theme": "dark" }"#,
        )
        .unwrap();

        let loaded = AppConfig::load_from(&path);

        assert_eq!(loaded.game_base_path, PathBuf::from("/sb/Content"));
    }
}
