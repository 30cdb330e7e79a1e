//! # Config Loader
//!
//! Reads the optional `config.toml` that supplies defaults for the command
//! line. The file is looked up in this order:
//!
//! 1. the path given with `--config`,
//! 2. the path in the `CIBAKE_CONFIG` environment variable,
//! 3. `<config dir>/cibake/config.toml`.
//!
//! An explicitly named file must exist; the default location is optional.
//! Path values may use `~` and environment variables.

use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::{
    constants::CONFIG_ENV_VAR,
    core::paths,
    models::{Feature, UnknownFeature},
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file '{path}' could not be read: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config file '{path}' is invalid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Config file '{path}': {source}")]
    Feature {
        path: PathBuf,
        #[source]
        source: UnknownFeature,
    },
}

/// Raw contents of `config.toml`. Every key is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub project_dir: Option<String>,
    pub project_name: Option<String>,
    pub install_dir: Option<String>,
    pub output_dir: Option<String>,
    pub php: Option<String>,
    pub phpunit: Option<String>,
    pub build_file: Option<String>,
    pub disable: Vec<String>,
}

/// The loaded file with its paths expanded and features parsed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    /// Where the values came from; `None` when no file was found.
    pub source: Option<PathBuf>,
    pub project_dir: Option<PathBuf>,
    pub project_name: Option<String>,
    pub install_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub php: Option<PathBuf>,
    pub phpunit: Option<PathBuf>,
    /// Kept raw so `-` can still mean standard output.
    pub build_file: Option<String>,
    pub disabled_features: Vec<Feature>,
}

/// Finds and loads the config file; see the module docs for the lookup order.
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_file(path);
    }
    if let Some(from_env) = env::var_os(CONFIG_ENV_VAR) {
        return load_file(Path::new(&from_env));
    }
    match paths::default_config_file() {
        Some(path) if path.is_file() => load_file(&path),
        _ => {
            log::debug!("No config file found; using defaults.");
            Ok(LoadedConfig::default())
        }
    }
}

/// Loads one specific file.
pub fn load_file(path: &Path) -> Result<LoadedConfig, ConfigError> {
    log::debug!("Loading config from '{}'", path.display());
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: FileConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    resolve(raw, path)
}

fn resolve(raw: FileConfig, path: &Path) -> Result<LoadedConfig, ConfigError> {
    let disabled_features = raw
        .disable
        .iter()
        .map(|name| name.parse::<Feature>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ConfigError::Feature {
            path: path.to_path_buf(),
            source,
        })?;

    let expand = |value: Option<String>| value.map(|v| paths::expand_user_path(&v));
    Ok(LoadedConfig {
        source: Some(path.to_path_buf()),
        project_dir: expand(raw.project_dir),
        project_name: raw.project_name,
        install_dir: expand(raw.install_dir),
        output_dir: expand(raw.output_dir),
        php: expand(raw.php),
        phpunit: expand(raw.phpunit),
        build_file: raw.build_file,
        disabled_features,
    })
}
