//! Configuration file discovery for the CLI
//!
//! Configuration is read from the first location that exists: an explicit
//! `--config` path, `drakon/config.toml` in the working directory, the
//! platform configuration directory, and finally the built-in defaults.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use drakon::{DrakonError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for DrakonError {
    fn from(err: ConfigError) -> Self {
        DrakonError::Config(err.to_string())
    }
}

/// Find and load configuration from the known locations.
///
/// # Errors
///
/// Returns [`DrakonError::Config`] if an explicit path is given but does not
/// exist, or if the selected file is not a valid configuration, and
/// [`DrakonError::Io`] if it cannot be read.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, DrakonError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("drakon/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "drakon", "drakon") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, DrakonError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    debug!(config:?; "Configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use drakon::config::MeasureKind;

    use super::*;

    #[test]
    fn test_explicit_path_is_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[layout]\ncolumn_gap = 50.0\n\n[text]\nmeasure = \"fixed\"\nfixed_char_width = 6.0\n",
        )
        .expect("write config");

        let config = load_config(Some(&path)).expect("Failed to load config");
        assert_eq!(config.layout().column_gap(), 50.0);
        assert_eq!(config.layout().row_gap(), 90.0);
        assert_eq!(config.text().measure(), MeasureKind::Fixed);
        assert_eq!(config.text().fixed_char_width(), 6.0);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.toml");

        let err = load_config(Some(&path)).expect_err("missing file must fail");
        match err {
            DrakonError::Config(message) => assert!(message.contains("absent.toml")),
            other => panic!("Expected a config error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[layout\ncolumn_gap = ").expect("write config");

        assert!(matches!(
            load_config(Some(&path)),
            Err(DrakonError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_measure_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[text]\nmeasure = \"ruler\"\n").expect("write config");

        assert!(matches!(
            load_config(Some(&path)),
            Err(DrakonError::Config(_))
        ));
    }
}
