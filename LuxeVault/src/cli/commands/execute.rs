//! Command execution implementations

use super::Commands;
use super::{inspect, inventory, session, upload};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::List { count } => inventory::list(*count),
            Commands::Upload {
                name,
                model,
                thumbnail,
                quiet,
            } => upload::execute(name, model, thumbnail, *quiet),
            Commands::Purge { key } => inventory::purge(key),
            Commands::Login {
                identifier,
                passcode,
            } => session::login(identifier, passcode),
            Commands::Logout => session::logout(),
            Commands::Status { save_config } => session::status(*save_config),
            Commands::Inspect { file, target_size } => inspect::execute(file, *target_size),
        }
    }
}
