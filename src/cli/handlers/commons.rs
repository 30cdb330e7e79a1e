// src/cli/handlers/commons.rs

// Shared helpers for the command handlers.

use crate::{core::phpunit::PhpUnitSetting, core::setting::Setting, models::ConsoleArgs};

/// Builds the test-runner setting the way every command wants it: explicit
/// executable if one was given, and the user's opt-outs already applied.
pub fn phpunit_setting(args: &ConsoleArgs) -> PhpUnitSetting {
    let mut setting = PhpUnitSetting::new(args.install_dir.as_deref(), args.output_dir.clone());
    if let Some(executable) = &args.phpunit {
        setting.core_mut().set_executable(executable.clone());
    }
    for feature in &args.disabled_features {
        if setting.core_mut().disable(*feature) {
            log::debug!("Feature '{}' disabled by the user.", feature);
        }
    }
    setting
}
