// src/bin/cibake.rs

use cibake::cli::{self, Cli, dispatcher::DispatchError};
use clap::Parser;
use colored::*;

/// Sets up logging, runs the requested command and turns the outcome into an
/// exit code.
fn main() {
    env_logger::init();

    if let Err(e) = cli::run(Cli::parse()) {
        // The unknown-command message is part of the tool's output contract.
        if let Some(unknown) = e.downcast_ref::<DispatchError>() {
            println!("{}", unknown);
            std::process::exit(1);
        }

        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}
