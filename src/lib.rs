// echeque - signed, delegatable payment orders settled against a pooled balance ledger
//
// Layering, bottom-up:
//   identity  -> keys, addresses, recoverable signatures
//   verifier  -> canonical hashing and recover-and-compare
//   cheque    -> cheque terms, signed authorizations, the registry state machine
//   signover  -> custody transfer assertions and the notified-chain tracker
//   vault     -> account balances, pending withdrawals, the value rail seam
//   ledger    -> the service instance tying the above together
//   storage   -> sled persistence of the ledger's keyed maps

pub mod cheque;
pub mod codec;
pub mod config;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod logging;
pub mod signover;
pub mod storage;
pub mod vault;
pub mod verifier;

pub use config::LedgerConfig;
pub use error::{ErrorKind, LedgerError};
pub use ledger::ChequeLedger;

/// Value in base units. Amounts are unsigned, so "not positive" means zero.
pub type Amount = u128;
