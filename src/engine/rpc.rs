use std::fmt;
use std::net::SocketAddr;

use async_trait::async_trait;
use serde_json::Value;
use tarpc::client;
use tarpc::context;
use tarpc::tokio_serde::formats::Json;
use tracing::debug;

use super::EngineError;
use super::WalletEngine;

/// The wallet engine's transaction rpc surface.
#[tarpc::service]
pub trait EngineRpc {
    /// Recompute and validate a draft transaction.
    async fn create_transaction(details: Value) -> Value;

    /// Sign a clean draft.
    async fn sign_transaction(details: Value) -> Value;

    /// Broadcast a signed draft.
    async fn send_transaction(details: Value) -> Value;
}

/// Engine reached over a tcp/json rpc connection. The connection is the
/// authenticated wallet session; login happens at connect time, engine-side.
#[derive(Clone)]
pub struct RemoteEngine {
    client: EngineRpcClient,
}

impl RemoteEngine {
    pub async fn connect(addr: SocketAddr) -> Result<Self, EngineError> {
        debug!("connecting to wallet engine at {addr}");
        let transport = tarpc::serde_transport::tcp::connect(addr, Json::default);
        let client = EngineRpcClient::new(client::Config::default(), transport.await?).spawn();
        Ok(RemoteEngine { client })
    }
}

impl fmt::Debug for RemoteEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteEngine").finish_non_exhaustive()
    }
}

#[async_trait]
impl WalletEngine for RemoteEngine {
    async fn create_transaction(&self, details: Value) -> Result<Value, EngineError> {
        Ok(self
            .client
            .create_transaction(context::current(), details)
            .await?)
    }

    async fn sign_transaction(&self, details: Value) -> Result<Value, EngineError> {
        Ok(self
            .client
            .sign_transaction(context::current(), details)
            .await?)
    }

    async fn send_transaction(&self, details: Value) -> Result<Value, EngineError> {
        Ok(self
            .client
            .send_transaction(context::current(), details)
            .await?)
    }
}
