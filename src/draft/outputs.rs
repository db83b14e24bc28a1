//! Invariant-preserving mutation of the output (addressee) list.

use super::Addressee;
use super::DraftError;
use super::DraftTransaction;

impl DraftTransaction {
    /// Append a requested output.
    ///
    /// Send-all is exclusive: a send-all addressee cannot join existing
    /// outputs, and nothing can be added once the draft is send-all. Checks
    /// run before any field is touched, so a rejected draft is unchanged.
    pub fn add_output(&mut self, addressee: Addressee) -> Result<(), DraftError> {
        if self.send_all || (addressee.send_all && !self.addressees.is_empty()) {
            return Err(DraftError::SendAllConflict);
        }
        if addressee.send_all {
            self.send_all = true;
        }
        self.addressees.push(addressee);
        Ok(())
    }

    /// Remove every addressee paying `address`; silently a no-op when none
    /// match.
    pub fn remove_outputs(&mut self, address: &str) {
        self.addressees.retain(|a| a.address != address);
    }

    pub fn clear_outputs(&mut self) {
        self.addressees.clear();
        self.send_all = false;
    }
}
