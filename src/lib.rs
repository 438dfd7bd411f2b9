//! Command-line front end for the taxi network tools.
//!
//! `vtaxi` bundles processing, position assignment and pathfinding as
//! subcommands; `vtaxi-path` exposes the pathfinder on its own.

pub mod assign;
pub mod cli;
pub mod logging;
pub mod pathfind;
pub mod process;

pub use cli::{AssignArgs, Cli, Command, MovementArg, PathArgs, ProcessArgs};

/// Dispatches a parsed command line
///
/// # Errors
///
/// Returns the failure of the selected subcommand.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Process(args) => process::run(&args),
        Command::Assign(args) => assign::run(&args),
        Command::Path(args) => pathfind::run(&args),
    }
}
