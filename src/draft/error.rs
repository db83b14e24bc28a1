//! Errors raised while loading, mutating and persisting a staged
//! transaction.
//!
//! Engine-side validation failures (insufficient funds, dust outputs, bad
//! addresses) are deliberately absent here: they travel inside the draft's
//! `error` field and are persisted, not raised. See [`crate::engine`].

use crate::engine::EngineError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DraftError {
    #[error("no staged transaction `{0}`; run `tx new` first")]
    NotFound(String),

    /// The stored draft carries an unresolved engine error and the caller
    /// required a clean one. The message is the stored error text; the draft
    /// stays on disk for correction.
    #[error("{0}")]
    Invalid(String),

    #[error("send-all cannot be combined with other outputs")]
    SendAllConflict,

    #[error("transaction has not been built yet")]
    NotBuilt,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("could not access staged transaction: {0}")]
    Io(#[from] std::io::Error),

    #[error("staged transaction is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}
