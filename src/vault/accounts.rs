// Account Ledger - spendable balances that back cheques
//
// A payer's balance is only debited when one of its cheques is redeemed;
// issuing a cheque reserves nothing.

use crate::error::LedgerError;
use crate::identity::Address;
use crate::vault::{PendingWithdrawals, ValueRail};
use crate::Amount;
use dashmap::DashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct AccountLedger {
    balances: DashMap<Address, Amount>,
}

impl AccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `who` with `amount`, returning the new balance
    pub fn deposit(&self, who: Address, amount: Amount) -> Result<Amount, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let mut balance = self.balances.entry(who).or_insert(0);
        let updated = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        *balance = updated;

        debug!(account = %who, amount, balance = updated, "deposit");
        Ok(updated)
    }

    /// Pay `amount` out of `who`'s balance to `who` over the value rail.
    ///
    /// The balance is debited under the entry lock, which is released
    /// before the rail runs. A refused transfer credits the amount back.
    pub fn withdraw(
        &self,
        who: Address,
        amount: Amount,
        rail: &dyn ValueRail,
    ) -> Result<Amount, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let remaining = self.debit(who, amount)?;
        if let Err(reason) = rail.transfer(&who, amount) {
            self.refund(who, amount)?;
            warn!(account = %who, amount, %reason, "withdraw rolled back");
            return Err(LedgerError::RailFailure(reason));
        }

        info!(account = %who, amount, balance = remaining, "withdraw");
        Ok(remaining)
    }

    /// Current balance; unknown addresses hold zero
    pub fn balance_of(&self, who: &Address) -> Amount {
        self.balances.get(who).map(|b| *b).unwrap_or(0)
    }

    /// Move `amount` from `payer`'s balance into `payee`'s pending bucket.
    ///
    /// Called by redemption while the cheque record is locked. The pending
    /// credit is applied first so an overflow there leaves the payer intact.
    pub(crate) fn transfer_to_pending(
        &self,
        payer: Address,
        payee: Address,
        amount: Amount,
        pending: &PendingWithdrawals,
    ) -> Result<(), LedgerError> {
        let Some(mut balance) = self.balances.get_mut(&payer) else {
            debug!(%payer, amount, "redemption against unfunded payer");
            return Err(LedgerError::InsufficientFunds {
                available: 0,
                required: amount,
            });
        };
        let available = *balance;
        if available < amount {
            debug!(%payer, available, amount, "redemption underfunded");
            return Err(LedgerError::InsufficientFunds {
                available,
                required: amount,
            });
        }

        pending.credit(payee, amount)?;
        *balance = available - amount;
        Ok(())
    }

    /// Number of accounts with an entry
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    fn debit(&self, who: Address, amount: Amount) -> Result<Amount, LedgerError> {
        let mut balance = self.balances.get_mut(&who);
        let available = balance.as_deref().copied().unwrap_or(0);
        if available < amount {
            debug!(account = %who, available, amount, "withdraw rejected");
            return Err(LedgerError::InsufficientBalance {
                available,
                required: amount,
            });
        }

        let remaining = available - amount;
        if let Some(balance) = balance.as_deref_mut() {
            *balance = remaining;
        }
        Ok(remaining)
    }

    fn refund(&self, who: Address, amount: Amount) -> Result<(), LedgerError> {
        let mut balance = self.balances.entry(who).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    pub(crate) fn restore(&self, who: Address, amount: Amount) {
        self.balances.insert(who, amount);
    }

    pub(crate) fn snapshot(&self) -> Vec<(Address, Amount)> {
        self.balances
            .iter()
            .filter(|e| *e.value() > 0)
            .map(|e| (*e.key(), *e.value()))
            .collect()
    }
}
