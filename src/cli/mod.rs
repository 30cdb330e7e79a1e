use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::{
    constants::{DEFAULT_BUILD_FILENAME, DEFAULT_PHP_EXECUTABLE},
    core::{config_loader, config_loader::LoadedConfig, probe::Environment},
    models::{BuildTarget, ConsoleArgs, Feature, derive_project_name},
};

pub mod dispatcher;
pub mod handlers;

/// Builds the colour-aware help string at runtime.
fn build_help_string() -> &'static str {
    // Replaces semantic tags like `<title>` in the translated template with
    // ANSI styles, or with nothing when colours are off.
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let template = t!("cli.help.template");

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// cibake: bootstraps CI build files for the tools installed on this machine.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The command to run (`build`, `check`).
    pub command: String,

    /// Root of the project the build file is generated for.
    #[arg(long, short = 'd')]
    pub project_dir: Option<PathBuf>,

    /// Project name written into the build file. Defaults to the directory name.
    #[arg(long, short = 'n')]
    pub project_name: Option<String>,

    /// Directory the tools are installed in (e.g. the PEAR bin dir).
    #[arg(long, short = 'i')]
    pub install_dir: Option<PathBuf>,

    /// Output directory for generated reports.
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// PHP executable used to check for loaded extensions.
    #[arg(long)]
    pub php: Option<PathBuf>,

    /// Explicit PHPUnit executable.
    #[arg(long)]
    pub phpunit: Option<PathBuf>,

    /// Where to write the build file; `-` prints it instead.
    #[arg(long, short = 'b')]
    pub build_file: Option<String>,

    /// Turn off an optional feature before probing (repeatable).
    #[arg(long = "disable", value_name = "FEATURE")]
    pub disable: Vec<Feature>,

    /// Configuration file to read instead of the default one.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Merges the flags over `config`. Flags win, then the file, then defaults.
    pub fn into_console_args(self, config: LoadedConfig) -> ConsoleArgs {
        let project_dir = self
            .project_dir
            .or(config.project_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        let project_name = self
            .project_name
            .or(config.project_name)
            .unwrap_or_else(|| derive_project_name(&project_dir));
        let build_target = match self.build_file.or(config.build_file) {
            Some(value) => BuildTarget::from_user_value(&value),
            None => BuildTarget::File(project_dir.join(DEFAULT_BUILD_FILENAME)),
        };

        let mut disabled_features = config.disabled_features;
        for feature in self.disable {
            if !disabled_features.contains(&feature) {
                disabled_features.push(feature);
            }
        }

        ConsoleArgs {
            command: self.command,
            project_name,
            install_dir: self.install_dir.or(config.install_dir),
            output_dir: self.output_dir.or(config.output_dir),
            php: self
                .php
                .or(config.php)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PHP_EXECUTABLE)),
            phpunit: self.phpunit.or(config.phpunit),
            build_target,
            disabled_features,
            project_dir,
        }
    }
}

/// Prints each failure of a failed command under `header`.
pub fn report_failures(header: &str, error: &crate::core::pipeline::CommandError) {
    use colored::Colorize;

    eprintln!("{}", header.red().bold());
    for failure in error.failures() {
        eprintln!("  {} {}", "✗".red(), failure);
    }
}

/// Runs one invocation: load config, resolve the command, validate, execute.
///
/// Unknown commands come back as [`dispatcher::DispatchError`]; a command whose
/// validation fails is never executed.
pub fn run(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let config =
        config_loader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(source) = &config.source {
        log::debug!("Using config file '{}'", source.display());
    }

    let args = cli.into_console_args(config);
    let env = Environment::system(args.php.clone());

    let mut command = dispatcher::create_command(args)?;

    if let Err(e) = command.validate(&env) {
        report_failures(t!("pipeline.validation_failed"), &e);
        return Err(e.into());
    }
    if let Err(e) = command.execute() {
        report_failures(t!("pipeline.execution_failed"), &e);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(argv: &[&str]) -> Cli {
        let mut full = vec!["cibake"];
        full.extend_from_slice(argv);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_flags_parse() {
        let cli = cli(&[
            "build",
            "-d",
            "/srv/shop",
            "--disable",
            "metrics",
            "--disable",
            "coverage",
            "-b",
            "-",
        ]);
        assert_eq!(cli.command, "build");
        assert_eq!(cli.project_dir, Some(PathBuf::from("/srv/shop")));
        assert_eq!(cli.disable, vec![Feature::Metrics, Feature::Coverage]);
        assert_eq!(cli.build_file.as_deref(), Some("-"));
    }

    #[test]
    fn test_unknown_feature_flag_is_rejected() {
        let result = Cli::try_parse_from(["cibake", "build", "--disable", "profiling"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_without_config() {
        let args =
            cli(&["check", "-d", "/srv/shop"]).into_console_args(LoadedConfig::default());
        assert_eq!(args.command, "check");
        assert_eq!(args.project_name, "shop");
        assert_eq!(args.php, PathBuf::from("php"));
        assert_eq!(
            args.build_target,
            BuildTarget::File(PathBuf::from("/srv/shop/build.xml"))
        );
        assert!(args.install_dir.is_none());
    }

    #[test]
    fn test_flags_override_config() {
        let config = LoadedConfig {
            project_name: Some("from-file".to_string()),
            install_dir: Some(PathBuf::from("/opt/file")),
            php: Some(PathBuf::from("/usr/bin/php-file")),
            build_file: Some("-".to_string()),
            disabled_features: vec![Feature::Coverage],
            ..Default::default()
        };
        let args = cli(&[
            "build",
            "-n",
            "from-flag",
            "--disable",
            "coverage",
            "--disable",
            "metrics",
        ])
        .into_console_args(config);

        assert_eq!(args.project_name, "from-flag");
        assert_eq!(args.install_dir, Some(PathBuf::from("/opt/file")));
        assert_eq!(args.php, PathBuf::from("/usr/bin/php-file"));
        assert_eq!(args.build_target, BuildTarget::Stdout);
        assert_eq!(
            args.disabled_features,
            vec![Feature::Coverage, Feature::Metrics]
        );
    }

    #[test]
    fn test_run_rejects_unknown_command() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("empty.toml");
        std::fs::write(&config, "").unwrap();

        let err = run(cli(&["frobnicate", "-c", config.to_str().unwrap()])).unwrap_err();
        assert_eq!(
            err.downcast_ref::<dispatcher::DispatchError>(),
            Some(&dispatcher::DispatchError::UnknownCommand(
                "frobnicate".to_string()
            ))
        );
    }
}
