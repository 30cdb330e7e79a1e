// src/models.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::constants::STDOUT_TARGET;

// --- STRUCTURED CONSOLE ARGUMENTS ---
// Produced once at the CLI boundary (flags merged with the config file) and
// then only read by commands and their tasks.

/// Fully resolved options for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleArgs {
    /// The requested command identifier, exactly as typed.
    pub command: String,
    pub project_dir: PathBuf,
    pub project_name: String,
    /// Directory the external tools are installed in. `None` means "search PATH".
    pub install_dir: Option<PathBuf>,
    /// Optional report output directory forwarded to the generated targets.
    pub output_dir: Option<PathBuf>,
    /// Runtime executable queried for loaded extensions.
    pub php: PathBuf,
    /// Explicit test-runner executable; overrides install-dir/PATH lookup.
    pub phpunit: Option<PathBuf>,
    pub build_target: BuildTarget,
    /// Features the user opted out of before any probing happens.
    pub disabled_features: Vec<Feature>,
}

impl ConsoleArgs {
    /// Minimal arguments for `command`, rooted at `project_dir`.
    pub fn new(command: impl Into<String>, project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        Self {
            command: command.into(),
            project_name: derive_project_name(&project_dir),
            build_target: BuildTarget::File(
                project_dir.join(crate::constants::DEFAULT_BUILD_FILENAME),
            ),
            project_dir,
            install_dir: None,
            output_dir: None,
            php: PathBuf::from(crate::constants::DEFAULT_PHP_EXECUTABLE),
            phpunit: None,
            disabled_features: Vec::new(),
        }
    }
}

/// Uses the last path component of the project directory, if there is one.
pub fn derive_project_name(project_dir: &Path) -> String {
    let absolute = if project_dir.is_absolute() {
        project_dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(project_dir))
            .unwrap_or_else(|_| project_dir.to_path_buf())
    };
    dunce::simplified(&absolute)
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .last()
        .unwrap_or_else(|| crate::constants::FALLBACK_PROJECT_NAME.to_string())
}

/// Where the generated build document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildTarget {
    Stdout,
    File(PathBuf),
}

impl BuildTarget {
    /// Interprets a user-supplied target; [`STDOUT_TARGET`] selects standard output.
    pub fn from_user_value(value: &str) -> Self {
        if value == STDOUT_TARGET {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

// --- FEATURE FLAGS ---

/// An optional capability a generated fragment may switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    Metrics,
    Coverage,
}

impl Feature {
    pub const ALL: [Self; 2] = [Self::Metrics, Self::Coverage];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metrics => "metrics",
            Self::Coverage => "coverage",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown feature '{0}'. Known features: metrics, coverage.")]
pub struct UnknownFeature(pub String);

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|feature| feature.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFeature(s.to_string()))
    }
}
