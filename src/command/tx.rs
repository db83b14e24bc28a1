use std::path::PathBuf;

use clap::Subcommand;

/// Staged-transaction commands.
///
/// The staged draft lives at `<data-dir>/tx/scratch` and flows across
/// invocations; every editing command revalidates it through the wallet
/// engine before persisting.
#[derive(Debug, Clone, Subcommand)]
pub(crate) enum TxCommand {
    /// Start a new draft, replacing any existing one.
    New {
        #[clap(long, default_value_t = 0)]
        subaccount: u32,
    },

    /// Load a draft from a json file, see also `dump`.
    Load { file: PathBuf },

    /// Dump the full draft json representation.
    Dump,

    /// Print the raw transaction hex.
    Raw,

    /// Set the fee rate in sat/kB.
    #[command(name = "setfeerate")]
    SetFeeRate { sat_per_kb: u64 },

    /// Manage requested outputs. Without a subcommand, lists them.
    Outputs {
        #[command(subcommand)]
        command: Option<OutputsCommand>,
    },

    /// Manage coin selection. Without a subcommand, prints input status.
    Inputs {
        #[command(subcommand)]
        command: Option<InputsCommand>,
    },

    /// Sign the current draft.
    Sign,

    /// Broadcast the current draft.
    Send,
}

#[derive(Debug, Clone, Subcommand)]
pub(crate) enum OutputsCommand {
    /// Add an output.
    Add {
        address: String,

        /// Amount in satoshi.
        #[clap(required_unless_present = "send_all")]
        satoshi: Option<u64>,

        /// Send all available value to this address.
        #[clap(long, conflicts_with = "satoshi")]
        send_all: bool,
    },

    /// Remove every output paying an address.
    Rm { address: String },

    /// Remove all outputs.
    Clear,
}

#[derive(Debug, Clone, Subcommand)]
pub(crate) enum InputsCommand {
    /// Let the engine pick inputs automatically.
    Auto,

    /// Select inputs; matches every spendable utxo when txid and vout are
    /// omitted.
    Add {
        txid: Option<String>,
        vout: Option<u32>,

        #[clap(long, default_value = "btc")]
        asset: String,
    },

    /// Deselect inputs.
    Rm { txid: String, vout: Option<u32> },

    /// Deselect all inputs.
    Clear,
}
