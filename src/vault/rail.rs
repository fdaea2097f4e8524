// Value rail - the external system that actually moves funds out of the ledger

use crate::identity::Address;
use crate::Amount;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Outbound value transfer. The ledger has already debited the amount and
/// holds no locks while a transfer runs.
pub trait ValueRail: Send + Sync {
    /// Pay `amount` to `recipient`. An error means nothing was paid.
    fn transfer(&self, recipient: &Address, amount: Amount) -> Result<(), String>;
}

/// One completed outbound transfer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub recipient: Address,
    pub amount: Amount,
}

/// In-memory rail that records every transfer; can be told to refuse
#[derive(Debug, Default)]
pub struct RecordingRail {
    transfers: Mutex<Vec<Transfer>>,
    refuse: AtomicBool,
    call_count: AtomicUsize,
}

impl RecordingRail {
    pub fn new() -> Self {
        Self::default()
    }

    /// A rail that refuses every transfer
    pub fn refusing() -> Self {
        let rail = Self::new();
        rail.set_refusing(true);
        rail
    }

    pub fn set_refusing(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    /// All completed transfers, oldest first
    pub fn transfers(&self) -> Vec<Transfer> {
        self.transfers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Total paid out to one recipient
    pub fn paid_to(&self, recipient: &Address) -> Amount {
        self.transfers()
            .iter()
            .filter(|t| &t.recipient == recipient)
            .map(|t| t.amount)
            .sum()
    }

    /// Number of transfer attempts, refused ones included
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl ValueRail for RecordingRail {
    fn transfer(&self, recipient: &Address, amount: Amount) -> Result<(), String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.refuse.load(Ordering::SeqCst) {
            return Err(format!("transfer of {} to {} refused", amount, recipient));
        }

        let mut transfers = self
            .transfers
            .lock()
            .map_err(|_| "transfer log poisoned".to_string())?;
        transfers.push(Transfer {
            recipient: *recipient,
            amount,
        });
        Ok(())
    }
}
