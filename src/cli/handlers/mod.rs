// src/cli/handlers/mod.rs

// One module per registered command. Each exposes a `CommandHandler`.

pub mod build;
pub mod check;
pub mod commons;
