// Storage module - PERSISTENCE
// Keeps the ledger's keyed maps in sled between runs

mod store;

pub use store::{LedgerStore, StorageStats, StoreError};
