// src/core/paths.rs

use std::env;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILENAME};

/// Returns the default configuration file path (`~/.config/cibake/config.toml`
/// on Linux), or `None` when the platform has no config directory.
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME))
}

/// Expands `~` and environment variables in a user-supplied path.
///
/// Unknown variables leave the input untouched instead of failing.
pub fn expand_user_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            log::debug!("Could not expand '{}': {}", raw, e);
            PathBuf::from(raw)
        }
    }
}

/// Decides which file to run for `tool`.
///
/// An install directory wins; otherwise the first match on `PATH` is used, and
/// if there is none the bare tool name is returned for the OS to resolve.
pub fn resolve_executable(tool: &str, install_dir: Option<&Path>) -> PathBuf {
    let file_name = executable_file_name(tool);
    if let Some(dir) = install_dir {
        return dunce::simplified(&dir.join(&file_name)).to_path_buf();
    }
    find_in_path(&file_name).unwrap_or_else(|| PathBuf::from(tool))
}

fn executable_file_name(tool: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{}.bat", tool)
    } else {
        tool.to_string()
    }
}

fn find_in_path(executable_name: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(executable_name))
        .find(|candidate| candidate.is_file())
}
