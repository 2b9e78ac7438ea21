//! Platform-specific configuration paths.

use crate::constants::APP_NAME;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/stemsep/`
/// - macOS: `~/Library/Application Support/stemsep/`
/// - Windows: `%APPDATA%\stemsep\`
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Default directory for model weights when none is configured.
pub fn default_weights_dir() -> Result<PathBuf> {
    Ok(config_dir()?.join("uvr5_weights"))
}

/// Expand a leading `~` or `~/` to the user's home directory.
///
/// Unexpandable paths are returned as-is; validation will reject them later.
pub fn expand_user(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(dirs) = directories::UserDirs::new() {
            return dirs.home_dir().to_path_buf();
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(dirs) = directories::UserDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_returns_path() {
        let path = config_dir().unwrap();
        assert!(path.to_string_lossy().contains("stemsep"));
    }

    #[test]
    fn test_config_file_path_ends_with_toml() {
        let path = config_file_path().unwrap();
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_expand_user_plain_path_unchanged() {
        assert_eq!(expand_user("/data/in.wav"), PathBuf::from("/data/in.wav"));
        assert_eq!(expand_user("relative.wav"), PathBuf::from("relative.wav"));
    }

    #[test]
    fn test_expand_user_tilde() {
        let expanded = expand_user("~/music/in.wav");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().ends_with("music/in.wav"));
    }
}
