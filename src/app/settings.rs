use crate::error::SettingsError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppSettings {
    pub assets_dir: String,
    pub window_width: f32,
    pub window_height: f32,
    pub panel_width: f32,
    pub grid_spacing: f32,
    pub show_grid: bool,
    pub refresh_hz: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            assets_dir: "assets".to_string(),
            window_width: 1500.0,
            window_height: 960.0,
            panel_width: 400.0,
            grid_spacing: 20.0,
            show_grid: true,
            refresh_hz: 75.0,
        }
    }
}

pub(crate) fn config_path() -> Option<String> {
    if let Some(home) = std::env::var_os("HOME") {
        let path = std::path::PathBuf::from(home)
            .join(".config")
            .join("roomplanner.toml");
        if path.exists() {
            return Some(path.display().to_string());
        }
    }
    ["settings.toml", "settings.json"]
        .into_iter()
        .find(|p| std::path::Path::new(p).exists())
        .map(str::to_string)
}

pub(crate) fn parse_settings(path: &str, s: &str) -> Result<AppSettings, SettingsError> {
    let toml_first = path.ends_with(".toml");
    let as_toml = || toml::from_str::<AppSettings>(s).map_err(|e| e.to_string());
    let as_json = || serde_json::from_str::<AppSettings>(s).map_err(|e| e.to_string());
    let parsed = if toml_first {
        as_toml().or_else(|_| as_json())
    } else {
        as_json().or_else(|_| as_toml())
    };
    parsed.map_err(|message| SettingsError::Parse {
        path: path.to_string(),
        message,
    })
}

pub(crate) fn load_settings(path: &str) -> Result<AppSettings, SettingsError> {
    let s = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_string(),
        source,
    })?;
    parse_settings(path, &s)
}

/// Settings from the first config file found, or defaults.
pub(crate) fn resolve_settings() -> AppSettings {
    let Some(path) = config_path() else {
        tracing::info!("no settings file found, using defaults");
        return AppSettings::default();
    };
    match load_settings(&path) {
        Ok(settings) => {
            tracing::info!(%path, "loaded settings");
            settings
        }
        Err(err) => {
            tracing::warn!(%err, "falling back to default settings");
            AppSettings::default()
        }
    }
}
