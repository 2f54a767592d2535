//! Settings loader for `<config dir>/tunwatch/config.toml`

use std::path::{Path, PathBuf};

use tunwatch_core::prelude::*;

use super::types::Settings;

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "tunwatch";

/// Default location of the config file, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Load settings.
///
/// With an explicit `path` the file must exist. Without one, the default
/// location is tried and a missing file yields defaults. A file that cannot
/// be read or parsed is logged and replaced by defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let config_path = match path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            Some(path) => {
                debug!("No config file at {:?}, using defaults", path);
                return Ok(Settings::default());
            }
            None => {
                debug!("No config directory on this platform, using defaults");
                return Ok(Settings::default());
            }
        },
    };

    Ok(read_settings(&config_path))
}

fn read_settings(config_path: &Path) -> Settings {
    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_explicit_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[feed]
uri = "ws://10.0.0.1:9000/stats"
retry_delays_secs = [1, 2]
tick_interval_ms = 100
"#,
        )
        .unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.feed.uri, "ws://10.0.0.1:9000/stats");
        assert_eq!(settings.feed.retry_delays_secs, vec![1, 2]);
        assert_eq!(settings.feed.tick_interval_ms, 100);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nope.toml");
        let err = load_settings(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_invalid_toml_falls_back_to_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[feed\nuri = ").unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_default_path_ends_with_app_dir() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("tunwatch/config.toml"));
        }
    }
}
