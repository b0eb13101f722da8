mod check;
mod dump;

pub use check::*;
use clap::Subcommand;
pub use dump::*;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate configuration and exit
    Check,

    /// Print resolved configuration as JSON
    Dump,
}
