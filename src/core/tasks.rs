// src/core/tasks.rs

//! Concrete tasks shared by the built-in commands.

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    constants::BUILD_LOGS_DIR,
    core::{
        pipeline::Task,
        probe::Environment,
        setting::{Notice, Setting},
    },
    models::BuildTarget,
};

/// Runs a setting's validation and reports what it had to say on stderr.
fn validate_setting(setting: &mut dyn Setting, env: &Environment) -> Vec<Notice> {
    let notices = setting.validate(env);
    for notice in &notices {
        log::warn!("{}: {}", setting.target_name(), notice);
        notice.print();
    }
    notices
}

// --- Project Layout ---

/// Makes sure the directories the generated targets log into exist.
#[derive(Debug)]
pub struct ProjectLayoutTask {
    project_dir: PathBuf,
}

impl ProjectLayoutTask {
    pub fn new(project_dir: PathBuf) -> Self {
        Self { project_dir }
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.project_dir.join(BUILD_LOGS_DIR)
    }
}

impl Task for ProjectLayoutTask {
    fn name(&self) -> &str {
        "project-layout"
    }

    fn validate(&mut self, _env: &Environment) -> Result<()> {
        if !self.project_dir.is_dir() {
            return Err(anyhow!(
                "Project directory '{}' does not exist or is not a directory.",
                self.project_dir.display()
            ));
        }
        Ok(())
    }

    fn execute(&mut self) -> Result<()> {
        let logs_dir = self.logs_dir();
        if logs_dir.is_dir() {
            log::debug!("'{}' already exists.", logs_dir.display());
            return Ok(());
        }
        fs::create_dir_all(&logs_dir)
            .with_context(|| format!("Failed to create '{}'", logs_dir.display()))?;
        eprintln!(
            "{} {}",
            "→".blue(),
            format!(t!("layout.created"), path = logs_dir.display())
        );
        Ok(())
    }
}

// --- Build File ---

/// Writes an Ant project document with one target per setting.
#[derive(Debug)]
pub struct BuildFileTask {
    project_name: String,
    target: BuildTarget,
    settings: Vec<Box<dyn Setting>>,
}

impl BuildFileTask {
    pub fn new(
        project_name: String,
        target: BuildTarget,
        settings: Vec<Box<dyn Setting>>,
    ) -> Self {
        Self {
            project_name,
            target,
            settings,
        }
    }

    pub fn settings(&self) -> &[Box<dyn Setting>] {
        &self.settings
    }

    /// Assembles the complete document from the current setting state.
    pub fn render(&self) -> String {
        let depends = self
            .settings
            .iter()
            .map(|s| s.target_name())
            .collect::<Vec<_>>()
            .join(",");

        let mut document = String::with_capacity(1024);
        document.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        // Writing into a String cannot fail.
        let _ = writeln!(
            document,
            "<project name=\"{}\" default=\"build\" basedir=\".\">",
            escape_attribute(&self.project_name)
        );
        let _ = writeln!(document, "  <target name=\"build\" depends=\"{}\" />", depends);
        for setting in &self.settings {
            document.push_str(&setting.generate());
        }
        document.push_str("</project>\n");
        document
    }
}

impl Task for BuildFileTask {
    fn name(&self) -> &str {
        "build-file"
    }

    fn validate(&mut self, env: &Environment) -> Result<()> {
        for setting in self.settings.iter_mut() {
            validate_setting(setting.as_mut(), env);
        }

        if let BuildTarget::File(path) = &self.target {
            let parent = parent_dir(path);
            if !parent.is_dir() {
                return Err(anyhow!(
                    "Cannot write build file '{}': directory '{}' does not exist.",
                    path.display(),
                    parent.display()
                ));
            }
        }
        Ok(())
    }

    fn execute(&mut self) -> Result<()> {
        let document = self.render();
        match &self.target {
            BuildTarget::Stdout => print!("{}", document),
            BuildTarget::File(path) => {
                fs::write(path, document)
                    .with_context(|| format!("Failed to write '{}'", path.display()))?;
                eprintln!(
                    "{} {}",
                    "✓".green(),
                    format!(t!("build.written"), path = path.display())
                );
            }
        }
        Ok(())
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// --- Feature Report ---

/// Validates one setting and prints which features survived.
#[derive(Debug)]
pub struct FeatureReportTask {
    setting: Box<dyn Setting>,
}

impl FeatureReportTask {
    pub fn new(setting: Box<dyn Setting>) -> Self {
        Self { setting }
    }

    pub fn render_report(&self) -> String {
        let core = self.setting.core();
        let mut report = format!(
            t!("report.header"),
            tool = core.spec().tool,
            name = core.spec().display_name,
            executable = core.executable().display()
        );
        report.push('\n');
        for (feature, enabled) in core.features().iter() {
            let state = if enabled {
                t!("report.enabled").green()
            } else {
                t!("report.disabled").red()
            };
            let _ = writeln!(report, "  {:<10} {}", feature.as_str(), state);
        }
        report
    }
}

impl Task for FeatureReportTask {
    fn name(&self) -> &str {
        "feature-report"
    }

    fn validate(&mut self, env: &Environment) -> Result<()> {
        validate_setting(self.setting.as_mut(), env);
        Ok(())
    }

    fn execute(&mut self) -> Result<()> {
        print!("{}", self.render_report());
        Ok(())
    }
}
