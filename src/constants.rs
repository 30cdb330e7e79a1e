// src/constants.rs

//! Names and defaults shared across the crate.

/// The name of the directory holding cibake configuration (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "cibake";

/// The name of the configuration file inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable that points at an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "CIBAKE_CONFIG";

/// The build file written by `build` when no target is configured.
pub const DEFAULT_BUILD_FILENAME: &str = "build.xml";

/// Build target value that means "write to standard output".
pub const STDOUT_TARGET: &str = "-";

/// Default runtime executable used for capability probing.
pub const DEFAULT_PHP_EXECUTABLE: &str = "php";

/// Project name used when none can be derived from the project directory.
pub const FALLBACK_PROJECT_NAME: &str = "project";

/// Directory (relative to the project root) where generated targets write their logs.
pub const BUILD_LOGS_DIR: &str = "build/logs";
