// Pending Withdrawals - redeemed value waiting to be paid out

use crate::error::LedgerError;
use crate::identity::Address;
use crate::vault::ValueRail;
use crate::Amount;
use dashmap::DashMap;
use tracing::{debug, info, warn};

/// Per-payee bucket of redeemed but not yet withdrawn value
#[derive(Debug, Default)]
pub struct PendingWithdrawals {
    owed: DashMap<Address, Amount>,
}

impl PendingWithdrawals {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn credit(&self, payee: Address, amount: Amount) -> Result<Amount, LedgerError> {
        let mut owed = self.owed.entry(payee).or_insert(0);
        let updated = owed.checked_add(amount).ok_or(LedgerError::Overflow)?;
        *owed = updated;
        Ok(updated)
    }

    pub fn owed_to(&self, payee: &Address) -> Amount {
        self.owed.get(payee).map(|o| *o).unwrap_or(0)
    }

    /// Pay `amount` from `caller`'s bucket to `recipient` over the rail.
    /// The bucket is debited and unlocked before the rail runs, and credited
    /// back if the rail refuses.
    pub fn pay_out(
        &self,
        caller: Address,
        amount: Amount,
        recipient: Address,
        rail: &dyn ValueRail,
    ) -> Result<Amount, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let remaining = self.debit(caller, amount)?;
        if let Err(reason) = rail.transfer(&recipient, amount) {
            self.credit(caller, amount)?;
            warn!(payee = %caller, %recipient, amount, %reason, "pay-out rolled back");
            return Err(LedgerError::RailFailure(reason));
        }

        info!(payee = %caller, %recipient, amount, remaining, "pending withdrawal paid");
        Ok(remaining)
    }

    /// Number of payees with a bucket
    pub fn len(&self) -> usize {
        self.owed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owed.is_empty()
    }

    fn debit(&self, caller: Address, amount: Amount) -> Result<Amount, LedgerError> {
        let mut owed = self.owed.get_mut(&caller);
        let available = owed.as_deref().copied().unwrap_or(0);
        if available < amount {
            debug!(payee = %caller, available, amount, "pay-out rejected");
            return Err(LedgerError::InsufficientPending {
                available,
                required: amount,
            });
        }

        let remaining = available - amount;
        if let Some(owed) = owed.as_deref_mut() {
            *owed = remaining;
        }
        Ok(remaining)
    }

    pub(crate) fn restore(&self, payee: Address, amount: Amount) {
        self.owed.insert(payee, amount);
    }

    pub(crate) fn snapshot(&self) -> Vec<(Address, Amount)> {
        self.owed
            .iter()
            .filter(|e| *e.value() > 0)
            .map(|e| (*e.key(), *e.value()))
            .collect()
    }
}
