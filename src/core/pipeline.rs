// src/core/pipeline.rs

//! # Command Pipeline
//!
//! A [`Command`] is bound to the console arguments it was created for and
//! owns an ordered list of [`Task`]s. The list is built on first use by the
//! command's [`CommandHandler`] and reused afterwards.
//!
//! Validation visits every task and reports all failures together, so a user
//! sees every problem in one run. Execution stops at the first failing task,
//! since later tasks may rely on what earlier ones wrote.

use std::fmt;
use thiserror::Error;

use crate::{core::probe::Environment, models::ConsoleArgs};

/// A unit of work with a validation phase and an execution phase.
pub trait Task: fmt::Debug {
    fn name(&self) -> &str;

    fn validate(&mut self, env: &Environment) -> anyhow::Result<()>;

    fn execute(&mut self) -> anyhow::Result<()>;
}

/// Builds the task list of one kind of command.
pub trait CommandHandler: fmt::Debug {
    /// Canonical handler name, e.g. `BuildCommand`.
    fn handler_name(&self) -> &'static str;

    fn create_tasks(&self, args: &ConsoleArgs) -> Vec<Box<dyn Task>>;
}

/// A task that failed validation or execution.
#[derive(Debug)]
pub struct TaskFailure {
    pub task: String,
    pub error: anyhow::Error,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {:#}", self.task, self.error)
    }
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{} task(s) failed validation.", .0.len())]
    Validation(Vec<TaskFailure>),
    #[error("Task '{}' failed: {:#}", .0.task, .0.error)]
    Execution(TaskFailure),
}

impl CommandError {
    pub fn failures(&self) -> &[TaskFailure] {
        match self {
            Self::Validation(failures) => failures,
            Self::Execution(failure) => std::slice::from_ref(failure),
        }
    }
}

#[derive(Debug)]
pub struct Command {
    args: ConsoleArgs,
    handler: Box<dyn CommandHandler>,
    tasks: Option<Vec<Box<dyn Task>>>,
}

impl Command {
    /// Binds `handler` to `args`. No task is built yet.
    pub fn new(args: ConsoleArgs, handler: Box<dyn CommandHandler>) -> Self {
        Self {
            args,
            handler,
            tasks: None,
        }
    }

    pub fn args(&self) -> &ConsoleArgs {
        &self.args
    }

    pub fn handler_name(&self) -> &'static str {
        self.handler.handler_name()
    }

    pub fn is_realized(&self) -> bool {
        self.tasks.is_some()
    }

    /// Returns the task list, building it on the first call only.
    pub fn create_tasks(&mut self) -> &mut [Box<dyn Task>] {
        let Self {
            args,
            handler,
            tasks,
        } = self;
        tasks.get_or_insert_with(|| {
            log::debug!("Creating tasks for {}", handler.handler_name());
            let created = handler.create_tasks(args);
            log::trace!(
                "Tasks: {:?}",
                created.iter().map(|t| t.name()).collect::<Vec<_>>()
            );
            created
        })
    }

    /// Validates every task in order and collects all failures.
    pub fn validate(&mut self, env: &Environment) -> Result<(), CommandError> {
        let mut failures = Vec::new();
        for task in self.create_tasks().iter_mut() {
            log::debug!("Validating task '{}'", task.name());
            if let Err(error) = task.validate(env) {
                log::debug!("Task '{}' failed validation: {:#}", task.name(), error);
                failures.push(TaskFailure {
                    task: task.name().to_string(),
                    error,
                });
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(CommandError::Validation(failures))
        }
    }

    /// Executes the tasks in order, stopping at the first failure.
    pub fn execute(&mut self) -> Result<(), CommandError> {
        for task in self.create_tasks().iter_mut() {
            log::debug!("Executing task '{}'", task.name());
            task.execute().map_err(|error| {
                CommandError::Execution(TaskFailure {
                    task: task.name().to_string(),
                    error,
                })
            })?;
        }
        Ok(())
    }
}
