//! The staged ("draft") transaction data model.
//!
//! A draft is the locally persisted, not-yet-final transaction under
//! construction. The wallet engine is authoritative for every computed field
//! (fees, balances, the raw transaction); this model only carries them
//! between command invocations. Engine fields this crate does not know about
//! survive load/save round-trips through the `extra` passthrough maps, so an
//! engine schema upgrade cannot silently drop data.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

pub mod builder;
pub mod error;
pub mod outputs;
pub mod selector;
pub mod session;
pub mod store;

pub use error::DraftError;

/// Coin selection strategy: inputs chosen by the engine (`default`) or
/// explicitly by the user (`manual`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UtxoStrategy {
    #[default]
    Default,
    Manual,
}

/// A spendable input candidate, identified by `(txhash, pt_idx)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utxo {
    pub txhash: String,
    pub pt_idx: u32,
    #[serde(default)]
    pub satoshi: u64,
    #[serde(default)]
    pub address_type: String,
    /// Height of the containing block; 0 while unconfirmed.
    #[serde(default)]
    pub block_height: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Utxo {
    /// Identity key within an input set.
    pub fn outpoint(&self) -> (&str, u32) {
        (&self.txhash, self.pt_idx)
    }

    pub fn confs_str(&self) -> String {
        if self.block_height == 0 {
            "unconfirmed".to_string()
        } else {
            format!("block {}", self.block_height)
        }
    }
}

/// A requested output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addressee {
    pub address: String,
    #[serde(default)]
    pub satoshi: u64,
    /// Requests the entirety of the available value; exclusive with any
    /// other output.
    #[serde(default, skip_serializing_if = "is_false")]
    pub send_all: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Addressee {
    pub fn new(address: impl Into<String>, satoshi: u64) -> Self {
        Addressee {
            address: address.into(),
            satoshi,
            send_all: false,
            extra: Map::new(),
        }
    }

    pub fn send_all(address: impl Into<String>) -> Self {
        Addressee {
            address: address.into(),
            satoshi: 0,
            send_all: true,
            extra: Map::new(),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// The persisted unit of work.
///
/// Created by the engine (`tx new` / `tx load`), mutated in place by every
/// staging command, never deleted by this crate; re-creation is the only
/// reset path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftTransaction {
    /// Empty when the last engine validation succeeded. Non-empty marks the
    /// computed fields as stale and blocks `raw`, `sign` and `send`.
    #[serde(default)]
    pub error: String,
    /// Raw serialized transaction, present only when `error` is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
    /// Identifier of the built/broadcast transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txhash: Option<String>,
    #[serde(default)]
    pub user_signed: bool,
    #[serde(default)]
    pub server_signed: bool,
    #[serde(default)]
    pub addressees: Vec<Addressee>,
    #[serde(default)]
    pub send_all: bool,
    /// Total output amount per asset.
    #[serde(default)]
    pub satoshi: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_fee_rate: Option<u64>,
    /// User override in sat/kB; the engine reports its own figure in
    /// `calculated_fee_rate`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_rate: Option<u64>,
    #[serde(default)]
    pub utxo_strategy: UtxoStrategy,
    /// All spendable UTXOs the engine knows of, keyed by asset.
    #[serde(default)]
    pub utxos: BTreeMap<String, Vec<Utxo>>,
    /// Inputs selected explicitly; meaningful under the manual strategy but
    /// always persisted.
    #[serde(default)]
    pub used_utxos: Vec<Utxo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DraftTransaction {
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    pub fn spendable_utxos(&self, asset: &str) -> &[Utxo] {
        self.utxos.get(asset).map(Vec::as_slice).unwrap_or_default()
    }
}
