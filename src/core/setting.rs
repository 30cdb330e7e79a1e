// src/core/setting.rs

//! # Settings
//!
//! A setting describes how one external tool is wired into the generated
//! build file. It starts with every feature at its default, validation may
//! only switch features off, and [`Setting::generate`] renders a fragment
//! from whatever is left enabled.

use colored::Colorize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{
    core::{
        paths,
        probe::{self, Environment},
        version::Version,
    },
    models::Feature,
};

/// Static description of a tool and what its optional features depend on.
#[derive(Debug)]
pub struct ToolSpec {
    /// Executable and build-target name, e.g. `phpunit`.
    pub tool: &'static str,
    /// Human-readable name used in notices, e.g. `PHPUnit`.
    pub display_name: &'static str,
    /// Oldest version that supports every feature in `version_gated`.
    pub minimum_version: &'static str,
    pub version_gated: &'static [Feature],
    pub capability: Option<CapabilityRequirement>,
    pub defaults: &'static [(Feature, bool)],
}

/// A feature that only works when a runtime extension is loaded.
#[derive(Debug)]
pub struct CapabilityRequirement {
    pub name: &'static str,
    pub feature: Feature,
    /// Shell command that installs the extension, shown to the user.
    pub install_hint: &'static str,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingError {
    #[error("Setting '{tool}' has no property named '{name}'.")]
    UnknownProperty { tool: &'static str, name: String },
}

// --- Feature Bag ---

/// Feature flags of one setting. The key set is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSet {
    flags: BTreeMap<Feature, bool>,
}

impl FeatureSet {
    pub fn with_defaults(defaults: &[(Feature, bool)]) -> Self {
        Self {
            flags: defaults.iter().copied().collect(),
        }
    }

    /// `None` when the setting does not know `feature`.
    pub fn get(&self, feature: Feature) -> Option<bool> {
        self.flags.get(&feature).copied()
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.get(feature).unwrap_or(false)
    }

    /// Switches `feature` off. Returns `true` if it was on before.
    ///
    /// Unknown features are ignored; there is no way to switch a flag on.
    pub fn disable(&mut self, feature: Feature) -> bool {
        match self.flags.get_mut(&feature) {
            Some(flag) if *flag => {
                *flag = false;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, bool)> + '_ {
        self.flags.iter().map(|(f, on)| (*f, *on))
    }
}

// --- Notices ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Notice,
}

/// Advisory message produced while validating a setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The version could not be read; the minimum version was assumed.
    UnknownVersion { tool: &'static str },
    VersionTooOld {
        tool: &'static str,
        found: String,
        minimum: &'static str,
        disabled: Vec<Feature>,
    },
    MissingCapability {
        capability: &'static str,
        feature: Feature,
        install_hint: &'static str,
    },
}

impl Notice {
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnknownVersion { .. } => Severity::Warning,
            Self::VersionTooOld { .. } | Self::MissingCapability { .. } => Severity::Notice,
        }
    }

    /// Prints the notice to stderr with its coloured severity prefix.
    pub fn print(&self) {
        let prefix = match self.severity() {
            Severity::Warning => t!("notice.prefix.warning").yellow().bold(),
            Severity::Notice => t!("notice.prefix.notice").cyan().bold(),
        };
        eprintln!("{}: {}", prefix, self);
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVersion { tool } => {
                write!(f, t!("setting.warning.unknown_version"), tool = tool)
            }
            Self::VersionTooOld {
                tool,
                found,
                minimum,
                disabled,
            } => {
                let features = disabled
                    .iter()
                    .map(|feature| feature.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    t!("setting.notice.version_too_old"),
                    found = found,
                    features = features,
                    tool = tool,
                    minimum = minimum
                )
            }
            Self::MissingCapability {
                capability,
                feature,
                install_hint,
            } => write!(
                f,
                t!("setting.notice.missing_capability"),
                capability = capability,
                feature = feature,
                install = install_hint
            ),
        }
    }
}

// --- Shared State & Validation ---

/// State every setting carries: its tool, where it lives and its features.
#[derive(Debug, Clone)]
pub struct SettingCore {
    spec: &'static ToolSpec,
    executable: PathBuf,
    output_dir: Option<PathBuf>,
    features: FeatureSet,
}

impl SettingCore {
    pub fn new(
        spec: &'static ToolSpec,
        install_dir: Option<&Path>,
        output_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            spec,
            executable: paths::resolve_executable(spec.tool, install_dir),
            output_dir,
            features: FeatureSet::with_defaults(spec.defaults),
        }
    }

    pub fn spec(&self) -> &'static ToolSpec {
        self.spec
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Replaces the looked-up executable with an explicit one.
    pub fn set_executable(&mut self, executable: PathBuf) {
        self.executable = executable;
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// User opt-out; same downward-only rule as validation.
    pub fn disable(&mut self, feature: Feature) -> bool {
        self.features.disable(feature)
    }

    /// Reads a feature by its textual name.
    pub fn property(&self, name: &str) -> Result<bool, SettingError> {
        name.parse::<Feature>()
            .ok()
            .and_then(|feature| self.features.get(feature))
            .ok_or_else(|| SettingError::UnknownProperty {
                tool: self.spec.tool,
                name: name.to_string(),
            })
    }

    /// Probes the tool and its runtime, switching off what they cannot support.
    ///
    /// Never fails: every problem becomes a [`Notice`] plus a disabled feature.
    pub fn validate(&mut self, env: &Environment) -> Vec<Notice> {
        let spec = self.spec;
        let mut notices = Vec::new();

        // 1. Probe. A version that cannot be read or parsed counts as the
        // minimum, so the gate below lets it through.
        let probed = match probe::probe_version(env.runner(), &self.executable) {
            Ok(text) => match text.parse::<Version>() {
                Ok(version) => Some((text, version)),
                Err(e) => {
                    log::warn!("Unusable {} version '{}': {}", spec.display_name, text, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        };

        // 2. Version gate.
        match probed {
            None => {
                log::debug!("Assuming {} {}", spec.display_name, spec.minimum_version);
                notices.push(Notice::UnknownVersion {
                    tool: spec.display_name,
                });
            }
            Some((found, found_version)) => {
                log::debug!("{} version: {}", spec.display_name, found);
                match spec.minimum_version.parse::<Version>() {
                    Ok(minimum) if found_version < minimum => {
                        let disabled: Vec<Feature> = spec
                            .version_gated
                            .iter()
                            .copied()
                            .filter(|feature| self.features.disable(*feature))
                            .collect();
                        notices.push(Notice::VersionTooOld {
                            tool: spec.display_name,
                            found,
                            minimum: spec.minimum_version,
                            disabled,
                        });
                    }
                    Ok(_) => {}
                    Err(e) => {
                        log::error!("Skipping version check for {}: {}", spec.display_name, e);
                    }
                }
            }
        }

        // 3. Runtime capability, independent of the version outcome.
        if let Some(requirement) = &spec.capability {
            if !env.capabilities().is_available(requirement.name) {
                self.features.disable(requirement.feature);
                notices.push(Notice::MissingCapability {
                    capability: requirement.name,
                    feature: requirement.feature,
                    install_hint: requirement.install_hint,
                });
            }
        }

        for notice in &notices {
            log::debug!("{:?}", notice);
        }
        notices
    }
}

/// One external tool's configuration.
pub trait Setting: fmt::Debug {
    fn core(&self) -> &SettingCore;

    fn core_mut(&mut self) -> &mut SettingCore;

    /// Renders the build-file fragment for the current feature state.
    fn generate(&self) -> String;

    fn validate(&mut self, env: &Environment) -> Vec<Notice> {
        self.core_mut().validate(env)
    }

    /// Name of the build target the fragment defines.
    fn target_name(&self) -> &'static str {
        self.core().spec().tool
    }
}
