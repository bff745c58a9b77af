//! Load configuration from XDG `config.toml` and project `.env`, then apply to the process
//! environment with priority: **existing env > .env > XDG**.
//!
//! The same `config.toml` may carry an `[assistant]` table with runtime settings
//! (model, temperature, iteration ceiling); see [`load_settings`].

mod dotenv;
mod xdg_toml;

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

pub use xdg_toml::config_home;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// `[assistant]` table of `config.toml`. Every field is optional; unset fields keep
/// the application's defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AssistantSettings {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_iterations: Option<u32>,
    pub max_ingredients: Option<usize>,
    pub recipe_count: Option<usize>,
    pub api_base: Option<String>,
}

/// Loads config from XDG `config.toml` and optional project `.env`, then sets environment
/// variables only for keys that are **not** already set (so existing env has highest priority).
///
/// Order of precedence when a key is missing in the process environment:
/// 1. Value from project `.env` (current directory or `override_dir` if given)
/// 2. Value from `$XDG_CONFIG_HOME/<app_name>/config.toml` `[env]` table
///
/// * `app_name`: e.g. `"pantry"`, used for XDG path `~/.config/<app_name>/config.toml`.
/// * `override_dir`: if `Some`, look for `.env` in this directory instead of `std::env::current_dir()`.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<(), LoadError> {
    apply_from(&config_home()?, app_name, override_dir)
}

/// Reads the `[assistant]` table. Missing file or table yields defaults.
pub fn load_settings(app_name: &str) -> Result<AssistantSettings, LoadError> {
    Ok(xdg_toml::load_config_file(&config_home()?, app_name)?.assistant)
}

fn apply_from(
    xdg_base: &Path,
    app_name: &str,
    override_dir: Option<&Path>,
) -> Result<(), LoadError> {
    let xdg_map = xdg_toml::load_config_file(xdg_base, app_name)?.env;
    let dotenv_map = dotenv::load_env_map(override_dir).map_err(LoadError::DotenvRead)?;
    for (key, value) in merge_sources(dotenv_map, xdg_map) {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(&key, value);
        }
    }
    Ok(())
}

/// `.env` values shadow XDG values for the same key.
fn merge_sources(
    dotenv_map: HashMap<String, String>,
    xdg_map: HashMap<String, String>,
) -> HashMap<String, String> {
    let mut merged = xdg_map;
    merged.extend(dotenv_map);
    merged
}
