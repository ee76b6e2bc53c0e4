//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>, env_var_name: &str) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return Ok(PathBuf::from(path));
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = load_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(root_folder));
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(get_default_root_folder())
}

/// Database file path under the root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join("lastchart.db")
}

/// Get default configuration file path for the platform
fn load_config_file() -> Result<PathBuf> {
    let config_path = if cfg!(target_os = "linux") {
        // Try ~/.config/lastchart/config.toml first, then /etc/lastchart/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("lastchart").join("config.toml"));
        let system_config = PathBuf::from("/etc/lastchart/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    } else {
        dirs::config_dir()
            .map(|d| d.join("lastchart").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?
    };

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// Get OS-dependent default root folder path
fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("lastchart"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\lastchart"))
    } else {
        // ~/.local/share/lastchart on Linux, ~/Library/Application Support on macOS
        dirs::data_local_dir()
            .map(|d| d.join("lastchart"))
            .unwrap_or_else(|| PathBuf::from("./lastchart_data"))
    }
}

/// Read a string setting from the environment with a compiled default
pub fn env_or(env_var_name: &str, default: &str) -> String {
    std::env::var(env_var_name).unwrap_or_else(|_| default.to_string())
}
