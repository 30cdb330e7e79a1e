// src/core/version.rs

//! Tool version numbers of the form `3.2.0` or `3.2.0RC2`.

use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

lazy_static! {
    static ref VERSION_RE: Regex =
        Regex::new(r"^(\d+(?:\.\d+)*)(?:[Rr][Cc](\d+))?$").expect("version pattern is valid");
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("'{0}' is not a version number.")]
    Malformed(String),
    #[error("Version component '{0}' is out of range.")]
    ComponentOverflow(String),
}

/// A dotted numeric version with an optional release-candidate number.
///
/// Ordering is component-wise and numeric. Missing trailing components count
/// as zero, and a release candidate sorts strictly before the release it
/// precedes (`3.2.0RC2 < 3.2.0`).
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<u64>,
    release_candidate: Option<u64>,
}

impl Version {
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    pub fn release_candidate(&self) -> Option<u64> {
        self.release_candidate
    }

    fn component(&self, i: usize) -> u64 {
        self.components.get(i).copied().unwrap_or(0)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let caps = VERSION_RE
            .captures(trimmed)
            .ok_or_else(|| VersionError::Malformed(s.to_string()))?;

        let numeric = caps
            .get(1)
            .map(|m| m.as_str())
            .ok_or_else(|| VersionError::Malformed(s.to_string()))?;
        let components = numeric
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| VersionError::ComponentOverflow(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let release_candidate = caps
            .get(2)
            .map(|m| {
                m.as_str()
                    .parse::<u64>()
                    .map_err(|_| VersionError::ComponentOverflow(m.as_str().to_string()))
            })
            .transpose()?;

        Ok(Self {
            components,
            release_candidate,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .components
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&joined)?;
        if let Some(rc) = self.release_candidate {
            write!(f, "RC{}", rc)?;
        }
        Ok(())
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.components.len().max(other.components.len());
        for i in 0..width {
            match self.component(i).cmp(&other.component(i)) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        match (self.release_candidate, other.release_candidate) {
            (None, None) => Ordering::Equal,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(&b),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}
