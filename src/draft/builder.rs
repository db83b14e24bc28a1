use serde_json::Value;
use tracing::debug;

use super::DraftTransaction;
use crate::engine::EngineError;
use crate::engine::WalletEngine;

/// Typed adapter over the engine's json calls.
///
/// The engine is authoritative for fee calculation, balance computation and
/// domain validation. Validation failures come back as a populated `error`
/// field on the returned draft and are deliberately not an `Err` here; only
/// transport failures are.
#[derive(Clone, Copy)]
pub struct TransactionBuilder<'a> {
    engine: &'a dyn WalletEngine,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(engine: &'a dyn WalletEngine) -> Self {
        TransactionBuilder { engine }
    }

    /// Ask the engine to compute a full draft from a (possibly partial)
    /// fragment.
    pub async fn build_details(&self, details: Value) -> Result<DraftTransaction, EngineError> {
        let result = self.engine.create_transaction(details).await?;
        let draft: DraftTransaction = serde_json::from_value(result)?;
        if draft.has_error() {
            debug!("engine rejected draft: {}", draft.error);
        }
        Ok(draft)
    }

    /// Recompute and validate the current draft.
    pub async fn build(&self, draft: &DraftTransaction) -> Result<DraftTransaction, EngineError> {
        self.build_details(serde_json::to_value(draft)?).await
    }

    pub async fn sign(&self, draft: &DraftTransaction) -> Result<DraftTransaction, EngineError> {
        let result = self
            .engine
            .sign_transaction(serde_json::to_value(draft)?)
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn send(&self, draft: &DraftTransaction) -> Result<DraftTransaction, EngineError> {
        let result = self
            .engine
            .send_transaction(serde_json::to_value(draft)?)
            .await?;
        Ok(serde_json::from_value(result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;

    #[tokio::test]
    async fn engine_validation_failure_is_data_not_error() {
        let engine = MockEngine::failing_with("insufficient funds");
        let builder = TransactionBuilder::new(&engine);
        let draft = builder.build(&DraftTransaction::default()).await.unwrap();
        assert_eq!("insufficient funds", draft.error);
        assert!(draft.transaction.is_none());
    }

    #[tokio::test]
    async fn build_is_idempotent() {
        let engine = MockEngine::default();
        let builder = TransactionBuilder::new(&engine);
        let once = builder.build(&DraftTransaction::default()).await.unwrap();
        let twice = builder.build(&once).await.unwrap();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let engine = MockEngine::default();
        engine.set_offline(true);
        let builder = TransactionBuilder::new(&engine);
        let result = builder.build(&DraftTransaction::default()).await;
        assert!(matches!(result, Err(EngineError::Connect(_))));
    }
}
