// src/cli/handlers/build.rs

use crate::{
    cli::handlers::commons,
    core::{
        pipeline::{CommandHandler, Task},
        tasks::{BuildFileTask, ProjectLayoutTask},
    },
    models::ConsoleArgs,
};

/// `build`: prepares the project layout and writes the CI build file.
#[derive(Debug, Default)]
pub struct BuildCommand;

/// Registry constructor.
pub fn handler() -> Box<dyn CommandHandler> {
    Box::new(BuildCommand)
}

impl CommandHandler for BuildCommand {
    fn handler_name(&self) -> &'static str {
        "BuildCommand"
    }

    fn create_tasks(&self, args: &ConsoleArgs) -> Vec<Box<dyn Task>> {
        vec![
            Box::new(ProjectLayoutTask::new(args.project_dir.clone())),
            Box::new(BuildFileTask::new(
                args.project_name.clone(),
                args.build_target.clone(),
                vec![Box::new(commons::phpunit_setting(args))],
            )),
        ]
    }
}
