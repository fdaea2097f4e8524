// LedgerStore - Persistent key-value storage using sled
//
// One key per entity, grouped by prefix:
// - cheque:<id>       -> cheque record
// - chain:<id>        -> notified sign-over tail
// - balance:<address> -> account balance
// - pending:<address> -> pending withdrawal

use crate::cheque::{Cheque, ChequeId};
use crate::codec::WireCodec;
use crate::config::LedgerConfig;
use crate::identity::Address;
use crate::ledger::{ChequeLedger, Clock, LedgerSnapshot};
use crate::signover::ChainTail;
use crate::vault::ValueRail;
use crate::Amount;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Key prefixes for organizing data
mod keys {
    pub const CHEQUE: &[u8] = b"cheque:";
    pub const CHAIN: &[u8] = b"chain:";
    pub const BALANCE: &[u8] = b"balance:";
    pub const PENDING: &[u8] = b"pending:";

    pub const ALL: [&[u8]; 4] = [CHEQUE, CHAIN, BALANCE, PENDING];
}

/// Errors from storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Malformed key: {0}")]
    MalformedKey(String),

    #[error("Flush failed: {0}")]
    FlushFailed(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

/// Statistics about the storage
#[derive(Clone, Debug)]
pub struct StorageStats {
    /// Number of keys in the database
    pub key_count: usize,
    pub cheque_count: usize,
    /// Approximate disk size in bytes
    pub disk_size_bytes: u64,
}

/// Persistent store for one ledger instance's state
///
/// Uses sled for crash-safe, embedded storage. A snapshot is written as a
/// single batch, so a crash leaves either the old image or the new one.
pub struct LedgerStore {
    db: sled::Db,
}

impl LedgerStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        Ok(Self { db })
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.db.is_empty())
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        Ok(())
    }

    pub fn stats(&self) -> Result<StorageStats, StoreError> {
        Ok(StorageStats {
            key_count: self.db.len(),
            cheque_count: self.db.scan_prefix(keys::CHEQUE).count(),
            disk_size_bytes: self.db.size_on_disk().unwrap_or(0),
        })
    }

    // ========================================================================
    // LEDGER STATE
    // ========================================================================

    /// Replace the stored image with the ledger's current state
    pub fn save_snapshot(&self, ledger: &ChequeLedger) -> Result<(), StoreError> {
        self.write_snapshot(&ledger.snapshot())
    }

    pub fn write_snapshot(&self, snapshot: &LedgerSnapshot) -> Result<(), StoreError> {
        let mut batch = sled::Batch::default();

        for prefix in keys::ALL {
            for result in self.db.scan_prefix(prefix) {
                let (key, _) = result?;
                batch.remove(key);
            }
        }

        for cheque in &snapshot.cheques {
            batch.insert(
                key(keys::CHEQUE, cheque.id().as_bytes()),
                encode(cheque)?,
            );
        }
        for (id, tail) in &snapshot.chains {
            batch.insert(key(keys::CHAIN, id.as_bytes()), encode(tail)?);
        }
        for (who, amount) in &snapshot.balances {
            batch.insert(key(keys::BALANCE, who.as_bytes()), encode(amount)?);
        }
        for (who, amount) in &snapshot.pending {
            batch.insert(key(keys::PENDING, who.as_bytes()), encode(amount)?);
        }

        self.db.apply_batch(batch)?;
        self.flush()?;

        info!(
            cheques = snapshot.cheques.len(),
            chains = snapshot.chains.len(),
            accounts = snapshot.balances.len(),
            "ledger snapshot saved"
        );
        Ok(())
    }

    /// Read the stored image back
    pub fn read_snapshot(&self) -> Result<LedgerSnapshot, StoreError> {
        let mut snapshot = LedgerSnapshot::default();

        for result in self.db.scan_prefix(keys::CHEQUE) {
            let (_, value) = result?;
            snapshot.cheques.push(decode::<Cheque>(&value)?);
        }
        for result in self.db.scan_prefix(keys::CHAIN) {
            let (k, value) = result?;
            let id = ChequeId::from_bytes(suffix(&k, keys::CHAIN)?);
            snapshot.chains.push((id, decode::<ChainTail>(&value)?));
        }
        for result in self.db.scan_prefix(keys::BALANCE) {
            let (k, value) = result?;
            let who = Address::from_bytes(suffix(&k, keys::BALANCE)?);
            snapshot.balances.push((who, decode::<Amount>(&value)?));
        }
        for result in self.db.scan_prefix(keys::PENDING) {
            let (k, value) = result?;
            let who = Address::from_bytes(suffix(&k, keys::PENDING)?);
            snapshot.pending.push((who, decode::<Amount>(&value)?));
        }

        Ok(snapshot)
    }

    /// Rebuild a ledger from the stored image
    pub fn load_into(
        &self,
        config: LedgerConfig,
        clock: Arc<dyn Clock>,
        rail: Arc<dyn ValueRail>,
    ) -> Result<ChequeLedger, StoreError> {
        let snapshot = self.read_snapshot()?;
        info!(cheques = snapshot.cheques.len(), "ledger snapshot loaded");
        Ok(ChequeLedger::restore(config, clock, rail, snapshot))
    }
}

fn key(prefix: &[u8], id: &[u8]) -> Vec<u8> {
    [prefix, id].concat()
}

/// Fixed-size identifier following `prefix` in a stored key
fn suffix<const N: usize>(key: &[u8], prefix: &[u8]) -> Result<[u8; N], StoreError> {
    key.get(prefix.len()..)
        .and_then(|rest| <[u8; N]>::try_from(rest).ok())
        .ok_or_else(|| StoreError::MalformedKey(hex::encode(key)))
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    WireCodec::encode(value).map_err(|e| StoreError::SerializationFailed(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    WireCodec::decode(bytes).map_err(|e| StoreError::DeserializationFailed(e.to_string()))
}
