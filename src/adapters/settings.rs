//! In-memory settings store.
//!
//! Implements [`SettingsPort`] over a `HashMap` of postcard-encoded blobs,
//! one per zone, mirroring the layout a flash key/value store would use.
//! Bytes that fail to decode are reported as [`SettingsError::Corrupted`]
//! and the zone falls back to defaults.

use std::collections::HashMap;

use log::debug;

use crate::app::ports::{SettingsError, SettingsPort};
use crate::zone::PersistedState;

#[derive(Debug, Default)]
pub struct MemorySettings {
    store: HashMap<usize, Vec<u8>>,
    /// Number of upcoming saves to fail with `IoError`.
    fail_saves: usize,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw encoded blob for `zone`, if any.
    pub fn raw(&self, zone: usize) -> Option<&[u8]> {
        self.store.get(&zone).map(Vec::as_slice)
    }

    /// Overwrite the stored blob for `zone` without encoding it.
    pub fn put_raw(&mut self, zone: usize, bytes: &[u8]) {
        self.store.insert(zone, bytes.to_vec());
    }

    /// Make the next `count` saves fail.
    pub fn fail_next_saves(&mut self, count: usize) {
        self.fail_saves = count;
    }
}

impl SettingsPort for MemorySettings {
    fn load(&self, zone: usize) -> Result<PersistedState, SettingsError> {
        let bytes = self.store.get(&zone).ok_or(SettingsError::NotFound)?;
        postcard::from_bytes(bytes).map_err(|_| SettingsError::Corrupted)
    }

    fn save(&mut self, zone: usize, state: &PersistedState) -> Result<(), SettingsError> {
        if self.fail_saves > 0 {
            self.fail_saves -= 1;
            return Err(SettingsError::IoError);
        }
        let bytes = postcard::to_allocvec(state).map_err(|_| SettingsError::IoError)?;
        debug!("settings: zone {} <- {} bytes", zone, bytes.len());
        self.store.insert(zone, bytes);
        Ok(())
    }
}
