//! apply-patch CLI - apply a patch file to its enclosing git working tree.

use clap::Parser;

mod commands;
mod logging;
mod output;
mod services;

use commands::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Completions { shell }) => commands::completions::run(shell).map(|()| 0),
        None => commands::apply::run(&cli.apply),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output::error(&format!("{e:#}"));
            std::process::exit(1);
        }
    }
}
