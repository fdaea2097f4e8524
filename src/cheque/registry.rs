// Cheque Registry - per-id records and the status state machine

use crate::cheque::{Cheque, ChequeId, ChequeStatus};
use crate::error::LedgerError;
use crate::identity::Address;
use crate::Amount;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

/// Every cheque id ever issued. Records are never removed; a terminal
/// record is what keeps its id from being issued again.
#[derive(Debug, Default)]
pub struct ChequeRegistry {
    cheques: DashMap<ChequeId, Cheque>,
}

impl ChequeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new cheque in the Issued state.
    ///
    /// Funds are neither checked nor reserved here; the payer's balance
    /// is only consulted at redemption.
    #[allow(clippy::too_many_arguments)]
    pub fn issue(
        &self,
        id: ChequeId,
        payer: Address,
        payee: Address,
        amount: Amount,
        valid_from: u32,
        valid_thru: u32,
        now: u64,
    ) -> Result<Cheque, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        match self.cheques.entry(id) {
            Entry::Occupied(_) => {
                debug!(cheque = %id, "issue rejected: id in use");
                Err(LedgerError::AlreadyExists(id))
            }
            Entry::Vacant(slot) => {
                let cheque = Cheque::issued(id, payer, payee, amount, valid_from, valid_thru, now);
                slot.insert(cheque.clone());
                info!(cheque = %id, %payer, %payee, amount, "cheque issued");
                Ok(cheque)
            }
        }
    }

    /// Revoke an Issued cheque. `custodian` names who currently holds the
    /// right to revoke; it is evaluated while the record is locked.
    pub fn revoke<F>(&self, id: ChequeId, caller: Address, custodian: F) -> Result<(), LedgerError>
    where
        F: FnOnce(&Cheque) -> Address,
    {
        self.with_issued(id, |cheque| {
            let owner = custodian(cheque);
            if owner != caller {
                debug!(cheque = %id, %caller, %owner, "revoke rejected: not the owner");
                return Err(LedgerError::NotOwner { caller });
            }
            cheque.transition(ChequeStatus::Revoked)?;
            info!(cheque = %id, %caller, "cheque revoked");
            Ok(())
        })
    }

    /// Status of an id; ids never issued are Unissued
    pub fn status(&self, id: &ChequeId) -> ChequeStatus {
        self.cheques
            .get(id)
            .map(|c| c.status())
            .unwrap_or(ChequeStatus::Unissued)
    }

    pub fn get(&self, id: &ChequeId) -> Option<Cheque> {
        self.cheques.get(id).map(|c| c.clone())
    }

    pub fn len(&self) -> usize {
        self.cheques.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cheques.is_empty()
    }

    /// Run `f` against an Issued record while holding its exclusive lock.
    ///
    /// Anything `f` decides (sign-over checks, fund movement, the status
    /// transition) is atomic with respect to every other operation on the
    /// same id. `f` must not touch this registry again.
    pub(crate) fn with_issued<T, F>(&self, id: ChequeId, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Cheque) -> Result<T, LedgerError>,
    {
        let mut cheque = self
            .cheques
            .get_mut(&id)
            .ok_or(LedgerError::NotFound(id))?;
        cheque.require_issued()?;
        f(&mut cheque)
    }

    pub(crate) fn restore(&self, cheque: Cheque) {
        self.cheques.insert(cheque.id(), cheque);
    }

    pub(crate) fn snapshot(&self) -> Vec<Cheque> {
        self.cheques.iter().map(|entry| entry.value().clone()).collect()
    }
}
