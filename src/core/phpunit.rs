// src/core/phpunit.rs

use std::path::{Path, PathBuf};

use crate::{
    core::setting::{CapabilityRequirement, Setting, SettingCore, ToolSpec},
    models::Feature,
};

/// Oldest PHPUnit release that can write metrics logs.
pub const PHPUNIT_MIN_VERSION: &str = "3.2.0RC2";

pub static PHPUNIT_SPEC: ToolSpec = ToolSpec {
    tool: "phpunit",
    display_name: "PHPUnit",
    minimum_version: PHPUNIT_MIN_VERSION,
    version_gated: &[Feature::Metrics],
    capability: Some(CapabilityRequirement {
        name: "xdebug",
        feature: Feature::Coverage,
        install_hint: "pecl install xdebug",
    }),
    defaults: &[(Feature::Metrics, true), (Feature::Coverage, true)],
};

const METRICS_ARG: &str = "--log-metrics ${basedir}/build/logs/phpunit.metrics.xml";
const COVERAGE_ARG: &str = "--coverage-xml ${basedir}/build/logs/phpunit.coverage.xml";

/// Unit-test runner setting with optional metrics and coverage logs.
#[derive(Debug, Clone)]
pub struct PhpUnitSetting {
    core: SettingCore,
}

impl PhpUnitSetting {
    pub fn new(install_dir: Option<&Path>, output_dir: Option<PathBuf>) -> Self {
        Self {
            core: SettingCore::new(&PHPUNIT_SPEC, install_dir, output_dir),
        }
    }

    pub fn metrics(&self) -> bool {
        self.core.features().is_enabled(Feature::Metrics)
    }

    pub fn coverage(&self) -> bool {
        self.core.features().is_enabled(Feature::Coverage)
    }
}

impl Setting for PhpUnitSetting {
    fn core(&self) -> &SettingCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SettingCore {
        &mut self.core
    }

    fn generate(&self) -> String {
        let metrics = if self.metrics() { METRICS_ARG } else { "" };
        let coverage = if self.coverage() { COVERAGE_ARG } else { "" };
        let output = self
            .core
            .output_dir()
            .map(|dir| format!("--report {}/coverage", dir.display()))
            .unwrap_or_default();

        // Disabled arguments leave their line blank so the layout never shifts.
        format!(
            r#"
  <target name="{target}">
    <exec executable="{executable}" dir="${{basedir}}/source/tests" failonerror="true">
      <arg line="--log-xml ${{basedir}}/build/logs/phpunit.xml
                 --log-pmd ${{basedir}}/build/logs/phpunit.pmd.xml
                 {metrics}
                 {coverage}
                 {output}
                 PhpUnderControl_Example_MathTest MathTest.php" />
    </exec>
  </target>
"#,
            target = self.target_name(),
            executable = self.core.executable().display(),
            metrics = metrics,
            coverage = coverage,
            output = output,
        )
    }
}
