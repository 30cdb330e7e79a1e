// src/core/probe.rs

//! Facts about the local toolchain: the version a tool reports and the
//! extensions its runtime has loaded.
//!
//! Both questions go through small traits so tasks can be validated against
//! canned answers instead of real processes.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::system::{
    capabilities::PhpModuleProbe,
    executor::{self, ExecutionError},
};

lazy_static! {
    static ref PROBE_VERSION_RE: Regex =
        Regex::new(r"(?:^|\s)(\d+(?:\.\d+)*(?:RC\d+)?)").expect("probe pattern is valid");
}

/// Runs an executable and hands back what it printed on standard output.
pub trait ProcessRunner: fmt::Debug {
    fn capture(&self, program: &Path, args: &[&str]) -> Result<String, ExecutionError>;
}

/// The real runner, backed by [`executor::capture_output`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn capture(&self, program: &Path, args: &[&str]) -> Result<String, ExecutionError> {
        executor::capture_output(program, args)
    }
}

/// Answers whether a named runtime extension is available.
pub trait CapabilityProbe: fmt::Debug {
    fn is_available(&self, capability: &str) -> bool;
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Could not run '{executable}': {source}")]
    Execution {
        executable: String,
        #[source]
        source: ExecutionError,
    },
    #[error("No version number found in the output of '{executable}'.")]
    NoVersion { executable: String },
}

/// Returns the first whitespace-delimited version number in `output`.
pub fn extract_version(output: &str) -> Option<&str> {
    PROBE_VERSION_RE
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Runs `<executable> --version` and extracts the reported version.
pub fn probe_version(runner: &dyn ProcessRunner, executable: &Path) -> Result<String, ProbeError> {
    let output = runner
        .capture(executable, &["--version"])
        .map_err(|source| ProbeError::Execution {
            executable: executable.display().to_string(),
            source,
        })?;
    log::trace!("Version output of '{}': {:?}", executable.display(), output);

    extract_version(&output)
        .map(str::to_string)
        .ok_or_else(|| ProbeError::NoVersion {
            executable: executable.display().to_string(),
        })
}

/// The collaborators a task needs while validating.
#[derive(Debug)]
pub struct Environment {
    runner: Box<dyn ProcessRunner>,
    capabilities: Box<dyn CapabilityProbe>,
}

impl Environment {
    pub fn new(runner: Box<dyn ProcessRunner>, capabilities: Box<dyn CapabilityProbe>) -> Self {
        Self {
            runner,
            capabilities,
        }
    }

    /// Real processes, with capabilities answered by `php -m`.
    pub fn system(php: impl Into<PathBuf>) -> Self {
        Self::new(
            Box::new(SystemRunner),
            Box::new(PhpModuleProbe::new(php.into(), SystemRunner)),
        )
    }

    pub fn runner(&self) -> &dyn ProcessRunner {
        self.runner.as_ref()
    }

    pub fn capabilities(&self) -> &dyn CapabilityProbe {
        self.capabilities.as_ref()
    }
}
