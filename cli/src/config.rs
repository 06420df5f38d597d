use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub struct Config {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("", "", "stride").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = data_dir.join("stride.db");

        Ok(Config { db_path, data_dir })
    }

    /// Resolve the CalorieNinjas API key: the `CALORIE_API_KEY` environment
    /// variable wins (populated from `.env` at startup), then an `api_key`
    /// file in the data directory. `None` means searches run against the
    /// built-in sample table.
    pub fn nutrition_api_key(&self) -> Option<String> {
        if let Ok(key) = std::env::var("CALORIE_API_KEY") {
            let key = key.trim().to_string();
            if !key.is_empty() {
                return Some(key);
            }
        }
        let path = self.data_dir.join("api_key");
        let key = std::fs::read_to_string(path).ok()?;
        let key = key.trim().to_string();
        if key.is_empty() { None } else { Some(key) }
    }
}
