//! Config file loading with a fallback default.
//!
//! A missing file yields the default config, which is then written back
//! best-effort so the user has something to edit. A file that exists but
//! cannot be read, parsed or validated also yields the default, but is never
//! overwritten.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::types::{ConfigError, GameConfig};

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] ConfigError),
}

/// Where the config in use came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    File,
    Default,
}

/// Read, parse and validate a config file.
pub fn load(path: &Path) -> Result<GameConfig, ConfigLoadError> {
    let content = std::fs::read_to_string(path)?;
    let config: GameConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

pub fn save(config: &GameConfig, path: &Path) -> Result<(), ConfigLoadError> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load `path`, falling back to [`GameConfig::default`].
pub fn load_or_default(path: &Path) -> (GameConfig, ConfigOrigin) {
    match load(path) {
        Ok(config) => {
            info!(path = %path.display(), "loaded config");
            (config, ConfigOrigin::File)
        }
        Err(ConfigLoadError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no config file; using defaults");
            let config = GameConfig::default();
            match save(&config, path) {
                Ok(()) => info!(path = %path.display(), "wrote default config"),
                Err(e) => warn!(
                    path = %path.display(),
                    error = %e,
                    "could not write default config"
                ),
            }
            (config, ConfigOrigin::Default)
        }
        Err(e) => {
            // Anything else, including a file that is not UTF-8, is left as is.
            warn!(
                path = %path.display(),
                error = %e,
                "config rejected; using defaults"
            );
            (GameConfig::default(), ConfigOrigin::Default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "tui-cluster-config-{}-{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("config.toml")
    }

    #[test]
    fn save_then_load() {
        let path = scratch("roundtrip");
        let config = GameConfig {
            width: 7,
            seed: 11,
            ..GameConfig::default()
        };
        save(&config, &path).unwrap();
        assert_eq!(load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_takes_defaults() {
        let path = scratch("partial");
        std::fs::write(&path, "width = 9\n").unwrap();
        let config = load(&path).unwrap();
        assert_eq!(config.width, 9);
        assert_eq!(config.height, GameConfig::default().height);
        assert_eq!(config.kind_count(), 3);
    }

    #[test]
    fn invalid_file_is_rejected() {
        let path = scratch("invalid");
        std::fs::write(&path, "tile_types = []\n").unwrap();
        assert!(matches!(load(&path), Err(ConfigLoadError::Invalid(_))));
    }
}
