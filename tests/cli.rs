// tests/cli.rs

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

// --- Helpers ---

/// Runs the binary with an empty config file and colours off, so the host's
/// own configuration never leaks into the assertions.
fn cibake(config_dir: &TempDir, args: &[&str]) -> Output {
    let config = config_dir.path().join("config.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    Command::new(env!("CARGO_BIN_EXE_cibake"))
        .args(args)
        .env("CIBAKE_CONFIG", &config)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Writes an executable shell script named `name` into `dir`.
#[cfg(unix)]
fn fake_tool(dir: &Path, name: &str, script: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}", script)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

const MISSING_PHPUNIT: &str = "/nonexistent/cibake-test/phpunit";
const MISSING_PHP: &str = "/nonexistent/cibake-test/php";

// --- Dispatch ---

#[test]
fn test_unknown_command_exits_with_one() {
    let config = TempDir::new().unwrap();
    let output = cibake(&config, &["frobnicate"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "Unknown command \"frobnicate\" used.\n");
}

// --- check ---

#[test]
fn test_check_degrades_without_toolchain() {
    let config = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    let output = cibake(
        &config,
        &[
            "check",
            "-d",
            path_str(project.path()),
            "--phpunit",
            MISSING_PHPUNIT,
            "--php",
            MISSING_PHP,
        ],
    );
    assert!(output.status.success());
    let err = stderr(&output);
    assert!(err.contains("WARNING: Cannot identify PHPUnit version."));
    assert!(err.contains("NOTICE: The xdebug extension is not installed."));
    let out = stdout(&output);
    assert!(out.contains("metrics    enabled"));
    assert!(out.contains("coverage   disabled"));
}

// --- build ---

#[test]
fn test_build_writes_file_and_layout() {
    let config = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    let output = cibake(
        &config,
        &[
            "build",
            "-d",
            path_str(project.path()),
            "-n",
            "shop",
            "--phpunit",
            MISSING_PHPUNIT,
            "--php",
            MISSING_PHP,
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));

    assert!(project.path().join("build/logs").is_dir());
    let document = fs::read_to_string(project.path().join("build.xml")).unwrap();
    assert!(document.contains("<project name=\"shop\" default=\"build\""));
    assert!(document.contains(&format!("<exec executable=\"{}\"", MISSING_PHPUNIT)));
    assert!(document.contains("--log-metrics"));
    assert!(!document.contains("--coverage-xml"));
}

#[test]
fn test_build_to_stdout_honours_disable_flag() {
    let config = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    let output = cibake(
        &config,
        &[
            "build",
            "-d",
            path_str(project.path()),
            "-b",
            "-",
            "--disable",
            "metrics",
            "--phpunit",
            MISSING_PHPUNIT,
            "--php",
            MISSING_PHP,
        ],
    );
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("<target name=\"phpunit\">"));
    assert!(!out.contains("--log-metrics"));
    assert!(!project.path().join("build.xml").exists());
}

#[test]
fn test_build_to_stdout_prints_only_the_document() {
    let config = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    let output = cibake(
        &config,
        &[
            "build",
            "-d",
            path_str(project.path()),
            "-b",
            "-",
            "--phpunit",
            MISSING_PHPUNIT,
            "--php",
            MISSING_PHP,
        ],
    );
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.starts_with("<?xml"), "{}", out);
    assert!(out.ends_with("</project>\n"));
    assert!(!out.contains("WARNING"));
    assert!(!out.contains("NOTICE"));

    let err = stderr(&output);
    assert!(err.contains("WARNING: Cannot identify PHPUnit version."));
    assert!(err.contains("build/logs"));
}

#[test]
fn test_build_validation_failure_writes_nothing() {
    let config = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    let missing = project.path().join("missing");
    let output = cibake(
        &config,
        &[
            "build",
            "-d",
            path_str(&missing),
            "--phpunit",
            MISSING_PHPUNIT,
            "--php",
            MISSING_PHP,
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("Validation failed:"));
    assert!(err.contains("[project-layout]"));
    assert!(err.contains("[build-file]"));
    assert!(!missing.exists());
}

#[cfg(unix)]
#[test]
fn test_build_with_old_phpunit_drops_metrics() {
    let config = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    let tools = TempDir::new().unwrap();
    let phpunit = fake_tool(
        tools.path(),
        "phpunit",
        "echo 'PHPUnit 3.0.5 by Sebastian Bergmann.'\n",
    );

    let output = cibake(
        &config,
        &[
            "build",
            "-d",
            path_str(project.path()),
            "-i",
            path_str(tools.path()),
            "--php",
            MISSING_PHP,
        ],
    );
    assert!(output.status.success());
    let err = stderr(&output);
    assert!(err.contains("The identified version 3.0.5 doesn't support metrics."));
    assert!(err.contains("PHPUnit 3.2.0RC2"));

    let document = fs::read_to_string(project.path().join("build.xml")).unwrap();
    assert!(!document.contains("--log-metrics"));
    assert!(document.contains(path_str(&phpunit)));
}

#[cfg(unix)]
#[test]
fn test_check_reads_version_despite_failing_exit_status() {
    let config = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    let tools = TempDir::new().unwrap();
    let phpunit = fake_tool(
        tools.path(),
        "phpunit",
        "echo 'PHPUnit 3.1.9 by Sebastian Bergmann.'\nexit 2\n",
    );

    let output = cibake(
        &config,
        &[
            "check",
            "-d",
            path_str(project.path()),
            "--phpunit",
            path_str(&phpunit),
            "--php",
            MISSING_PHP,
        ],
    );
    assert!(output.status.success());
    assert!(stdout(&output).contains("metrics    disabled"));
    assert!(!stderr(&output).contains("Cannot identify PHPUnit version."));
}

#[cfg(unix)]
#[test]
fn test_check_reads_version_from_non_utf8_output() {
    let config = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    let tools = TempDir::new().unwrap();
    let phpunit = fake_tool(
        tools.path(),
        "phpunit",
        "printf 'PHPUnit 3.1.9 by Sebastian Bergmann \\351.\\n'\n",
    );

    let output = cibake(
        &config,
        &[
            "check",
            "-d",
            path_str(project.path()),
            "--phpunit",
            path_str(&phpunit),
            "--php",
            MISSING_PHP,
        ],
    );
    assert!(output.status.success());
    assert!(stdout(&output).contains("metrics    disabled"));
}
