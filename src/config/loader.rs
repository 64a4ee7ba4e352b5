use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Dotfile checked in the working directory, then the home directory, when
/// no explicit path is given.
pub const DOTFILE: &str = ".scour.toml";

/// Loads the connection dotfile from the provided path or default locations.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed. A missing
/// default-location file is not an error.
pub fn load_config(path: Option<&str>) -> AppResult<Option<ConfigFile>> {
    if let Some(path) = path {
        let path = PathBuf::from(path);
        return Ok(Some(load_config_file(&path)?));
    }

    let local = PathBuf::from(DOTFILE);
    if local.exists() {
        return Ok(Some(load_config_file(&local)?));
    }

    if let Some(home) = std::env::var_os("HOME") {
        let in_home = Path::new(&home).join(DOTFILE);
        if in_home.exists() {
            return Ok(Some(load_config_file(&in_home)?));
        }
    }

    Ok(None)
}

pub(crate) fn load_config_file(path: &Path) -> AppResult<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    toml::from_str(&content).map_err(|err| {
        AppError::config(ConfigError::ParseToml {
            path: path.to_path_buf(),
            source: err,
        })
    })
}
