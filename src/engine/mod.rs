//! The wallet engine boundary.
//!
//! The engine owns key management, script construction, fee estimation, coin
//! selection and broadcast. This crate exchanges schemaless json drafts with
//! it and treats every call as an opaque round-trip: domain problems come
//! back inside the result's `error` field, never as an `Err`. Only transport
//! failures surface as [`EngineError`].

use async_trait::async_trait;
use serde_json::Value;

pub mod rpc;

pub use rpc::RemoteEngine;

/// Transport-level engine failures.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error("could not connect to wallet engine: {0}")]
    Connect(#[from] std::io::Error),

    #[error("wallet engine call failed: {0}")]
    Transport(#[from] tarpc::client::RpcError),

    #[error("wallet engine returned malformed json: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// An authenticated wallet connection.
///
/// All three calls take the current draft json and return the engine's full
/// recomputation of it. `create_transaction` is idempotent, network
/// nondeterminism (block height, fee estimates) aside.
#[async_trait]
pub trait WalletEngine: Send + Sync {
    async fn create_transaction(&self, details: Value) -> Result<Value, EngineError>;

    async fn sign_transaction(&self, details: Value) -> Result<Value, EngineError>;

    async fn send_transaction(&self, details: Value) -> Result<Value, EngineError>;
}

#[cfg(test)]
pub(crate) mod mock {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::EngineError;
    use super::WalletEngine;
    use crate::draft::DraftTransaction;

    /// Scripted engine double: echoes drafts back with the fields a real
    /// engine would recompute.
    #[derive(Default)]
    pub(crate) struct MockEngine {
        /// When set, `create_transaction` stamps this into the result's
        /// `error` field, like an engine-side validation failure.
        pub(crate) create_error: Mutex<Option<String>>,
        /// When set, every call fails at the transport level.
        pub(crate) offline: Mutex<bool>,
        pub(crate) create_calls: AtomicUsize,
        pub(crate) sign_calls: AtomicUsize,
        pub(crate) send_calls: AtomicUsize,
    }

    impl MockEngine {
        pub(crate) fn failing_with(error: &str) -> Self {
            let engine = MockEngine::default();
            *engine.create_error.lock().unwrap() = Some(error.to_string());
            engine
        }

        pub(crate) fn set_offline(&self, offline: bool) {
            *self.offline.lock().unwrap() = offline;
        }

        fn check_online(&self) -> Result<(), EngineError> {
            if *self.offline.lock().unwrap() {
                return Err(EngineError::Connect(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "engine offline",
                )));
            }
            Ok(())
        }

        fn parse(details: Value) -> Result<DraftTransaction, EngineError> {
            Ok(serde_json::from_value(details)?)
        }
    }

    #[async_trait]
    impl WalletEngine for MockEngine {
        async fn create_transaction(&self, details: Value) -> Result<Value, EngineError> {
            self.check_online()?;
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            let mut draft = Self::parse(details)?;
            draft.error = self.create_error.lock().unwrap().clone().unwrap_or_default();
            if draft.has_error() {
                draft.transaction = None;
            } else {
                draft.transaction = Some("020000000001...".to_string());
                draft.fee = Some(210);
                draft.calculated_fee_rate = Some(1000);
            }
            Ok(serde_json::to_value(draft)?)
        }

        async fn sign_transaction(&self, details: Value) -> Result<Value, EngineError> {
            self.check_online()?;
            self.sign_calls.fetch_add(1, Ordering::SeqCst);
            let mut draft = Self::parse(details)?;
            draft.user_signed = true;
            draft.server_signed = true;
            Ok(serde_json::to_value(draft)?)
        }

        async fn send_transaction(&self, details: Value) -> Result<Value, EngineError> {
            self.check_online()?;
            self.send_calls.fetch_add(1, Ordering::SeqCst);
            let mut draft = Self::parse(details)?;
            draft.txhash = Some("cafebabe".repeat(8));
            Ok(serde_json::to_value(draft)?)
        }
    }
}
