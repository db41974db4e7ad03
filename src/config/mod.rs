use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::mask::clamp_brush_size;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "pixelforge";
const APP_CONFIG_FILE: &str = "config.json";

pub(crate) const DEFAULT_BRUSH_SIZE: u32 = 40;

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AppConfig {
    #[serde(default)]
    pub(crate) default_brush_size: Option<u32>,
    #[serde(default)]
    pub(crate) theme: Option<String>,
}

impl AppConfig {
    /// Configured brush diameter clamped into the valid range, or the
    /// built-in default.
    pub(crate) fn brush_size(&self) -> u32 {
        self.default_brush_size
            .map_or(DEFAULT_BRUSH_SIZE, clamp_brush_size)
    }
}

pub(crate) fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AppConfig::default(),
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
