// src/cli/handlers/check.rs

use crate::{
    cli::handlers::commons,
    core::{
        pipeline::{CommandHandler, Task},
        tasks::FeatureReportTask,
    },
    models::ConsoleArgs,
};

/// `check`: reports which optional features the installed tools support.
/// Writes nothing to disk.
#[derive(Debug, Default)]
pub struct CheckCommand;

/// Registry constructor.
pub fn handler() -> Box<dyn CommandHandler> {
    Box::new(CheckCommand)
}

impl CommandHandler for CheckCommand {
    fn handler_name(&self) -> &'static str {
        "CheckCommand"
    }

    fn create_tasks(&self, args: &ConsoleArgs) -> Vec<Box<dyn Task>> {
        vec![Box::new(FeatureReportTask::new(Box::new(
            commons::phpunit_setting(args),
        )))]
    }
}
