//! Nullable store — thread-safe in-memory storage for testing.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use turnstile_store::{
    BanEntry, BanStore, ConnectionEvent, ConnectionLogStore, StoreError, VerificationRecord,
    VerificationStore, WhitelistEntry, WhitelistStore,
};
use turnstile_types::PlayerId;

/// An in-memory implementation of all four store traits.
/// Thread-safe for use with tokio's multi-threaded runtime.
///
/// `set_unavailable(true)` makes every operation return
/// [`StoreError::Unavailable`], for exercising the engine's degraded paths.
#[derive(Default)]
pub struct MemoryStore {
    bans: Mutex<Vec<BanEntry>>,
    whitelist: Mutex<HashMap<PlayerId, WhitelistEntry>>,
    verifications: Mutex<HashMap<PlayerId, VerificationRecord>>,
    connections: Mutex<Vec<ConnectionEvent>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_ban(&self, ban: BanEntry) {
        self.bans.lock().unwrap().push(ban);
    }

    pub fn put_whitelist(&self, entry: WhitelistEntry) {
        self.whitelist
            .lock()
            .unwrap()
            .insert(entry.identity.clone(), entry);
    }

    pub fn put_verification(&self, record: VerificationRecord) {
        self.verifications
            .lock()
            .unwrap()
            .insert(record.identity.clone(), record);
    }

    /// The stored verification record, if any.
    pub fn verification(&self, identity: &PlayerId) -> Option<VerificationRecord> {
        self.verifications.lock().unwrap().get(identity).cloned()
    }

    /// All logged connection events, oldest first.
    pub fn connections(&self) -> Vec<ConnectionEvent> {
        self.connections.lock().unwrap().clone()
    }

    /// Flip every operation into `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store offline".into()))
        } else {
            Ok(())
        }
    }
}

impl BanStore for MemoryStore {
    fn bans_for_identity(&self, identity: &PlayerId) -> Result<Vec<BanEntry>, StoreError> {
        self.check_available()?;
        Ok(self
            .bans
            .lock()
            .unwrap()
            .iter()
            .filter(|b| &b.identity == identity)
            .cloned()
            .collect())
    }

    fn bans_for_address(&self, address: &IpAddr) -> Result<Vec<BanEntry>, StoreError> {
        self.check_available()?;
        Ok(self
            .bans
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.address.as_ref() == Some(address))
            .cloned()
            .collect())
    }
}

impl WhitelistStore for MemoryStore {
    fn entry(&self, identity: &PlayerId) -> Result<Option<WhitelistEntry>, StoreError> {
        self.check_available()?;
        Ok(self.whitelist.lock().unwrap().get(identity).cloned())
    }
}

impl VerificationStore for MemoryStore {
    fn get(&self, identity: &PlayerId) -> Result<Option<VerificationRecord>, StoreError> {
        self.check_available()?;
        Ok(self.verifications.lock().unwrap().get(identity).cloned())
    }

    fn put(&self, record: &VerificationRecord) -> Result<(), StoreError> {
        self.check_available()?;
        self.verifications
            .lock()
            .unwrap()
            .insert(record.identity.clone(), record.clone());
        Ok(())
    }

    fn delete(&self, identity: &PlayerId) -> Result<(), StoreError> {
        self.check_available()?;
        self.verifications.lock().unwrap().remove(identity);
        Ok(())
    }
}

impl ConnectionLogStore for MemoryStore {
    fn append(&self, event: &ConnectionEvent) -> Result<(), StoreError> {
        self.check_available()?;
        self.connections.lock().unwrap().push(event.clone());
        Ok(())
    }
}
