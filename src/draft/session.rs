//! The staging session: load, mutate, unconditionally revalidate and
//! persist.

use std::future::Future;

use tracing::warn;

use super::builder::TransactionBuilder;
use super::store::TransactionStore;
use super::store::SCRATCH_TX_ID;
use super::DraftError;
use super::DraftTransaction;
use crate::engine::EngineError;
use crate::engine::WalletEngine;

/// Scoped mutation protocol over the persisted draft.
///
/// Every command follows the same three phases: acquire (load the draft),
/// mutate (a caller-supplied edit, or a full engine replacement for
/// `sign`/`send`), release. The release phase runs even when the mutation
/// failed: rebuild through the engine if this is an editing session, then
/// persist, then let the mutation error propagate — state is never silently
/// lost. The one exception is an engine transport failure during release,
/// which aborts before the save so a half-computed draft never lands on
/// disk.
pub struct StagingSession<'a> {
    store: &'a TransactionStore,
    engine: &'a dyn WalletEngine,
    id: String,
    allow_errors: bool,
    recreate: bool,
}

impl<'a> StagingSession<'a> {
    /// Session for draft-editing commands: a draft with an unresolved engine
    /// error may keep being edited, and the engine revalidates on release.
    pub fn editing(store: &'a TransactionStore, engine: &'a dyn WalletEngine) -> Self {
        StagingSession {
            store,
            engine,
            id: SCRATCH_TX_ID.to_string(),
            allow_errors: true,
            recreate: true,
        }
    }

    /// Session for `sign`/`send`: the draft must be clean going in, and the
    /// engine result is final, so no rebuild on release.
    pub fn finalizing(store: &'a TransactionStore, engine: &'a dyn WalletEngine) -> Self {
        StagingSession {
            store,
            engine,
            id: SCRATCH_TX_ID.to_string(),
            allow_errors: false,
            recreate: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Run `mutate` against the loaded draft, then release. Returns the
    /// final persisted draft.
    pub async fn run<F>(&self, mutate: F) -> Result<DraftTransaction, DraftError>
    where
        F: FnOnce(&mut DraftTransaction) -> Result<(), DraftError>,
    {
        let mut draft = self.store.load(&self.id, self.allow_errors)?;
        let mutation = mutate(&mut draft);
        let draft = self.release(draft).await?;
        mutation?;
        Ok(draft)
    }

    /// Replace the whole draft with an engine result. A transport failure
    /// leaves the stored draft untouched.
    pub async fn replace<F, Fut>(&self, op: F) -> Result<DraftTransaction, DraftError>
    where
        F: FnOnce(TransactionBuilder<'a>, DraftTransaction) -> Fut,
        Fut: Future<Output = Result<DraftTransaction, EngineError>>,
    {
        let draft = self.store.load(&self.id, self.allow_errors)?;
        let draft = op(TransactionBuilder::new(self.engine), draft).await?;
        self.release(draft).await
    }

    pub async fn sign(&self) -> Result<DraftTransaction, DraftError> {
        self.replace(|builder, draft| async move { builder.sign(&draft).await })
            .await
    }

    pub async fn send(&self) -> Result<DraftTransaction, DraftError> {
        self.replace(|builder, draft| async move { builder.send(&draft).await })
            .await
    }

    async fn release(&self, mut draft: DraftTransaction) -> Result<DraftTransaction, DraftError> {
        if self.recreate {
            draft = TransactionBuilder::new(self.engine).build(&draft).await?;
        }
        if draft.has_error() {
            warn!("persisting draft `{}` with engine error: {}", self.id, draft.error);
        }
        self.store.save(&draft, &self.id)?;
        Ok(draft)
    }
}
