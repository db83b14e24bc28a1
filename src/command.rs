use clap::Parser;

use crate::command::tx::TxCommand;

pub(crate) mod tx;

/// The CLI command.
#[derive(Debug, Clone, Parser)]
#[command(version)]
pub(crate) enum Command {
    /// Dump shell completions.
    Completions,

    /// Stage, sign and broadcast a transaction. Without a subcommand,
    /// prints a summary of the current draft.
    Tx {
        #[command(subcommand)]
        command: Option<TxCommand>,
    },
}
