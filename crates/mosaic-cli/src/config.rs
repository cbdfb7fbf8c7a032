//! Locating and reading the gallery configuration file.
//!
//! A `--config` path always wins and must exist. Without one, `mosaic.toml`
//! in the working directory is tried, then `config.toml` in the platform
//! configuration directory. When neither exists the built-in layout,
//! ordering and coordinator defaults apply.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info, trace};
use thiserror::Error;

use mosaic::{MosaicError, config::AppConfig};

/// Configuration file name looked up in the working directory.
pub const LOCAL_CONFIG: &str = "mosaic.toml";

/// Errors raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file {0} does not exist")]
    NotFound(PathBuf),

    #[error("cannot read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

impl From<ConfigError> for MosaicError {
    fn from(err: ConfigError) -> Self {
        MosaicError::Config(err.to_string())
    }
}

/// Loads the configuration used to lay out a gallery.
///
/// # Errors
///
/// Fails if `explicit_path` names a file that does not exist, or if the
/// selected file cannot be read or does not describe a valid configuration.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, MosaicError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        info!(path:?; "Using configuration given on the command line");
        return read_config(path);
    }

    match discover() {
        Some(path) => {
            info!(path:?; "Using discovered configuration");
            read_config(&path)
        }
        None => {
            debug!("No configuration file found, gallery defaults apply");
            Ok(AppConfig::default())
        }
    }
}

/// Candidate files in lookup order.
fn candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    match ProjectDirs::from("org", "mosaic", "mosaic") {
        Some(dirs) => paths.push(dirs.config_dir().join("config.toml")),
        None => debug!("No platform configuration directory on this system"),
    }
    paths
}

fn discover() -> Option<PathBuf> {
    candidates().into_iter().find(|path| {
        let found = path.is_file();
        if !found {
            trace!(path:?; "Configuration candidate absent");
        }
        found
    })
}

fn read_config(path: &Path) -> Result<AppConfig, MosaicError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|err| {
        ConfigError::Invalid {
            path: path.to_path_buf(),
            message: err.message().to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_explicit_config_is_loaded() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[ordering]\nmax_passes = 3\n\n[cache]\ncapacity = 4\n\n\
             [style]\nbackground_color = \"#101010\""
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.ordering().max_passes(), 3);
        assert_eq!(config.cache().capacity(), 4);
        assert!(config.style().background_color().unwrap().is_some());
    }

    #[test]
    fn test_omitted_sections_keep_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[ordering]\nmax_evaluations = 500").unwrap();

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.ordering().max_evaluations(), 500);
        assert_eq!(config.ordering().max_passes(), 8);
        assert_eq!(config.coordinator().progressive_threshold(10), 3);
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        let err = load_config(Some(&missing)).unwrap_err();
        assert!(matches!(err, MosaicError::Config(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_malformed_config_names_the_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[ordering\nmax_passes = ").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, MosaicError::Config(_)));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }
}
