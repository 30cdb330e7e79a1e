// src/system/executor.rs

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Executable '{0}' was not found.")]
    NotFound(String),
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
}

/// Runs `program` with `args` and returns whatever it printed on stdout.
///
/// Blocks until the process exits. Only a process that cannot be spawned is
/// an error: the exit status is logged and ignored, and bytes that are not
/// UTF-8 are replaced. Stdin is closed and stderr only reaches the debug log,
/// so probing a tool stays silent.
pub fn capture_output(program: &Path, args: &[&str]) -> Result<String, ExecutionError> {
    let display = command_display(program, args);
    log::debug!("Capturing output of: {}", display);

    let output = StdCommand::new(dunce::simplified(program))
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ExecutionError::NotFound(program.display().to_string())
            } else {
                ExecutionError::CommandFailed(display.clone(), e)
            }
        })?;

    if !output.stderr.is_empty() {
        log::debug!(
            "stderr of '{}': {}",
            display,
            String::from_utf8_lossy(&output.stderr).trim_end()
        );
    }

    if !output.status.success() {
        log::debug!(
            "'{}' exited with {}; keeping its output",
            display,
            output
                .status
                .code()
                .map_or_else(|| "a signal".to_string(), |c| format!("code {}", c))
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn command_display(program: &Path, args: &[&str]) -> String {
    let mut display = program.display().to_string();
    for arg in args {
        display.push(' ');
        display.push_str(arg);
    }
    display
}
