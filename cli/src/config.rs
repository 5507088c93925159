use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

use lemon_core::remote::MENU_URL;

pub struct Config {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
    pub menu_url: String,
}

impl Config {
    pub fn load(db_override: Option<PathBuf>, menu_url: Option<String>) -> Result<Self> {
        let (data_dir, db_path) = if let Some(db_path) = db_override {
            let data_dir = db_path
                .parent()
                .map(std::path::Path::to_path_buf)
                .unwrap_or_default();
            (data_dir, db_path)
        } else {
            let proj_dirs = ProjectDirs::from("", "", "little-lemon")
                .context("Could not determine home directory")?;
            let data_dir = proj_dirs.data_dir().to_path_buf();
            let db_path = data_dir.join("little_lemon.db");
            (data_dir, db_path)
        };

        if !data_dir.as_os_str().is_empty() {
            std::fs::create_dir_all(&data_dir).with_context(|| {
                format!("Failed to create data directory: {}", data_dir.display())
            })?;
        }

        Ok(Config {
            db_path,
            data_dir,
            menu_url: menu_url.unwrap_or_else(|| MENU_URL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_with_db_override_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("menu.db");

        let config = Config::load(Some(db_path.clone()), None).unwrap();
        assert_eq!(config.db_path, db_path);
        assert_eq!(config.data_dir, dir.path().join("nested"));
        assert!(config.data_dir.is_dir());
        assert_eq!(config.menu_url, MENU_URL);
    }

    #[test]
    fn test_load_with_menu_url_override() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(
            Some(dir.path().join("menu.db")),
            Some("http://127.0.0.1:9/menu.json".to_string()),
        )
        .unwrap();
        assert_eq!(config.menu_url, "http://127.0.0.1:9/menu.json");
    }
}
