// src/system/capabilities.rs

use std::cell::OnceCell;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::core::probe::{CapabilityProbe, ProcessRunner};

/// Asks a PHP runtime which modules it has loaded (`php -m`).
///
/// The module list is fetched on first use and reused afterwards. A runtime
/// that cannot be executed reports no modules at all.
#[derive(Debug)]
pub struct PhpModuleProbe<R: ProcessRunner> {
    php: PathBuf,
    runner: R,
    modules: OnceCell<HashSet<String>>,
}

impl<R: ProcessRunner> PhpModuleProbe<R> {
    pub fn new(php: PathBuf, runner: R) -> Self {
        Self {
            php,
            runner,
            modules: OnceCell::new(),
        }
    }

    fn modules(&self) -> &HashSet<String> {
        self.modules.get_or_init(|| match self.runner.capture(&self.php, &["-m"]) {
            Ok(output) => parse_module_list(&output),
            Err(e) => {
                log::debug!("Could not list modules of '{}': {}", self.php.display(), e);
                HashSet::new()
            }
        })
    }
}

impl<R: ProcessRunner> CapabilityProbe for PhpModuleProbe<R> {
    fn is_available(&self, capability: &str) -> bool {
        self.modules().contains(&capability.to_ascii_lowercase())
    }
}

/// Section headers like `[Zend Modules]` are skipped; names are lower-cased.
fn parse_module_list(output: &str) -> HashSet<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('['))
        .map(str::to_ascii_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::probe::testing::FakeRunner;

    const PHP_M_OUTPUT: &str = "[PHP Modules]\nCore\ndate\nXdebug\n\n[Zend Modules]\nXdebug\n";

    #[test]
    fn test_parse_module_list_skips_headers() {
        let modules = parse_module_list(PHP_M_OUTPUT);
        assert!(modules.contains("core"));
        assert!(modules.contains("xdebug"));
        assert!(!modules.iter().any(|m| m.starts_with('[')));
    }

    #[test]
    fn test_probe_is_case_insensitive() {
        let probe = PhpModuleProbe::new(PathBuf::from("php"), FakeRunner::replying(PHP_M_OUTPUT));
        assert!(probe.is_available("xdebug"));
        assert!(probe.is_available("XDebug"));
        assert!(!probe.is_available("apc"));
    }

    #[test]
    fn test_probe_runs_runtime_once() {
        let probe = PhpModuleProbe::new(PathBuf::from("php"), FakeRunner::replying(PHP_M_OUTPUT));
        probe.is_available("xdebug");
        probe.is_available("date");
        assert_eq!(probe.runner.calls.borrow().len(), 1);
        assert_eq!(probe.runner.calls.borrow()[0], "php -m");
    }

    #[test]
    fn test_unrunnable_runtime_has_no_capabilities() {
        let probe = PhpModuleProbe::new(PathBuf::from("php"), FakeRunner::failing());
        assert!(!probe.is_available("xdebug"));
    }
}
