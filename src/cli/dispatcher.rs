// src/cli/dispatcher.rs

use thiserror::Error;

use crate::{
    cli::handlers,
    core::pipeline::{Command, CommandHandler},
    models::ConsoleArgs,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Unknown command \"{0}\" used.")]
    UnknownCommand(String),
}

// --- Command Definition and Registry ---

/// A registered command: its identifier, aliases, canonical handler name and
/// how to build its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler_name: &'static str,
    constructor: fn() -> Box<dyn CommandHandler>,
}

/// The single source of truth for all commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "build",
        aliases: &["b"],
        handler_name: "BuildCommand",
        constructor: handlers::build::handler,
    },
    CommandDefinition {
        name: "check",
        aliases: &["doctor"],
        handler_name: "CheckCommand",
        constructor: handlers::check::handler,
    },
];

/// Upper-cases the first letter of `identifier` and appends `Command`.
pub fn canonical_handler_name(identifier: &str) -> String {
    let mut chars = identifier.chars();
    let mut name = String::with_capacity(identifier.len() + "Command".len());
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
        name.push_str(chars.as_str());
    }
    name.push_str("Command");
    name
}

/// Finds a command definition by canonical handler name or literal alias.
///
/// Handler names compare case-insensitively, so `bUILD` still finds
/// `BuildCommand`.
fn find_command(identifier: &str) -> Option<&'static CommandDefinition> {
    let canonical = canonical_handler_name(identifier);
    COMMAND_REGISTRY.iter().find(|cmd| {
        cmd.handler_name.eq_ignore_ascii_case(&canonical) || cmd.aliases.contains(&identifier)
    })
}

/// Identifiers of every registered command, in registry order.
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMAND_REGISTRY.iter().map(|cmd| cmd.name)
}

/// Resolves `args.command` and binds a new command to `args`.
///
/// The returned command has not built any task yet.
pub fn create_command(args: ConsoleArgs) -> Result<Command, DispatchError> {
    log::debug!("Dispatching command '{}'", args.command);
    let definition = find_command(&args.command)
        .ok_or_else(|| DispatchError::UnknownCommand(args.command.clone()))?;
    log::trace!("'{}' resolved to {}", args.command, definition.handler_name);
    Ok(Command::new(args, (definition.constructor)()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(command: &str) -> ConsoleArgs {
        ConsoleArgs::new(command, "/srv/shop")
    }

    #[test]
    fn test_canonical_handler_name() {
        assert_eq!(canonical_handler_name("build"), "BuildCommand");
        assert_eq!(canonical_handler_name("Build"), "BuildCommand");
        assert_eq!(canonical_handler_name("bUILD"), "BUILDCommand");
        assert_eq!(canonical_handler_name(""), "Command");
    }

    #[test]
    fn test_every_registered_command_resolves_to_its_handler() {
        for definition in COMMAND_REGISTRY {
            let command = create_command(args(definition.name)).unwrap();
            assert_eq!(command.handler_name(), definition.handler_name);
            assert_eq!(
                (definition.constructor)().handler_name(),
                definition.handler_name
            );
        }
    }

    #[test]
    fn test_build_command_starts_unrealized() {
        let command = create_command(args("build")).unwrap();
        assert_eq!(command.handler_name(), "BuildCommand");
        assert!(!command.is_realized());
        assert_eq!(command.args().command, "build");
    }

    #[test]
    fn test_build_command_caches_its_tasks() {
        let mut command = create_command(args("build")).unwrap();
        let first = command.create_tasks().as_ptr();
        let len = command.create_tasks().len();
        let second = command.create_tasks().as_ptr();
        assert_eq!(first, second);
        assert_eq!(len, 2);
    }

    #[test]
    fn test_capitalized_identifier_and_alias_resolve() {
        assert_eq!(
            create_command(args("Check")).unwrap().handler_name(),
            "CheckCommand"
        );
        assert_eq!(
            create_command(args("doctor")).unwrap().handler_name(),
            "CheckCommand"
        );
    }

    #[test]
    fn test_unknown_command_is_reported_verbatim() {
        let err = create_command(args("frobnicate")).unwrap_err();
        assert_eq!(err, DispatchError::UnknownCommand("frobnicate".to_string()));
        assert_eq!(err.to_string(), "Unknown command \"frobnicate\" used.");
        assert!(create_command(args("")).is_err());
        assert!(create_command(args("Command")).is_err());
    }

    #[test]
    fn test_handler_name_match_ignores_case() {
        assert_eq!(
            create_command(args("bUILD")).unwrap().handler_name(),
            "BuildCommand"
        );
        assert_eq!(
            create_command(args("CHECK")).unwrap().handler_name(),
            "CheckCommand"
        );
        // Aliases stay literal.
        assert!(create_command(args("DOCTOR")).is_err());
    }

    #[test]
    fn test_command_names_lists_registry() {
        assert_eq!(command_names().collect::<Vec<_>>(), vec!["build", "check"]);
    }
}
