use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use super::DraftError;
use super::DraftTransaction;
use crate::data_directory::DataDirectory;

/// Draft id used by every staging command.
pub const SCRATCH_TX_ID: &str = "scratch";

/// File-backed persistence for draft transactions, one json file per id
/// under `<data-dir>/tx/`.
#[derive(Debug, Clone)]
pub struct TransactionStore {
    data_dir: DataDirectory,
}

impl TransactionStore {
    pub fn new(data_dir: DataDirectory) -> Self {
        TransactionStore { data_dir }
    }

    pub fn tx_file_path(&self, id: &str) -> PathBuf {
        self.data_dir.tx_directory_path().join(id)
    }

    /// Read the persisted draft for `id`.
    ///
    /// A stored draft with a non-empty `error` only loads when
    /// `allow_errors` is set. `raw`, `sign` and `send` must never operate on
    /// one, while editing commands keep working against it.
    pub fn load(&self, id: &str, allow_errors: bool) -> Result<DraftTransaction, DraftError> {
        let path = self.tx_file_path(id);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DraftError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let draft: DraftTransaction = serde_json::from_str(&raw)?;
        debug!("loaded draft `{id}` from {}", path.display());
        if draft.has_error() && !allow_errors {
            return Err(DraftError::Invalid(draft.error));
        }
        Ok(draft)
    }

    /// Persist `draft` unconditionally, error state included; a later
    /// command must be able to see and react to a failed build.
    pub fn save(&self, draft: &DraftTransaction, id: &str) -> Result<(), DraftError> {
        std::fs::create_dir_all(self.data_dir.tx_directory_path())?;
        let path = self.tx_file_path(id);
        std::fs::write(&path, serde_json::to_string(draft)?)?;
        debug!("saved draft `{id}` to {}", path.display());
        Ok(())
    }
}
