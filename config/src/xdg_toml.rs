//! Read `$XDG_CONFIG_HOME/<app>/config.toml`: the `[env]` table and the `[assistant]` table.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{AssistantSettings, LoadError};

/// Base config directory: `$XDG_CONFIG_HOME` when set, else the platform default.
pub fn config_home() -> Result<PathBuf, LoadError> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir().ok_or_else(|| LoadError::XdgPath("no config directory".to_string()))
}

#[derive(serde::Deserialize, Default)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub assistant: AssistantSettings,
}

/// Parses `<base>/<app_name>/config.toml`. Missing file yields the empty config.
pub(crate) fn load_config_file(base: &Path, app_name: &str) -> Result<ConfigFile, LoadError> {
    let path = base.join(app_name).join("config.toml");
    if !path.is_file() {
        return Ok(ConfigFile::default());
    }
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    Ok(toml::from_str(&content)?)
}
