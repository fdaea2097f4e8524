// Cheque Ledger - one ledger instance and its full operation surface
//
// Every compound operation on a cheque runs inside the registry's entry lock
// for that id. Locks are always taken cheque -> chain -> payer balance ->
// payee bucket.

use crate::cheque::{Cheque, ChequeId, ChequeRegistry, ChequeStatus, SignedCheque, Validity};
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::identity::Address;
use crate::ledger::Clock;
use crate::signover::{ChainTail, SignOverTracker, SignedSignOver};
use crate::vault::{AccountLedger, PendingWithdrawals, ValueRail};
use crate::verifier::Verifier;
use crate::Amount;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a successful redemption
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redemption {
    pub cheque_id: ChequeId,
    pub payer: Address,
    /// Whoever was credited: the original payee, or the end of the chain
    pub payee: Address,
    pub amount: Amount,
}

/// Point-in-time copy of every keyed map, for persistence
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub cheques: Vec<Cheque>,
    pub chains: Vec<(ChequeId, ChainTail)>,
    pub balances: Vec<(Address, Amount)>,
    pub pending: Vec<(Address, Amount)>,
}

pub struct ChequeLedger {
    config: LedgerConfig,
    registry: ChequeRegistry,
    tracker: SignOverTracker,
    accounts: AccountLedger,
    withdrawals: PendingWithdrawals,
    clock: Arc<dyn Clock>,
    rail: Arc<dyn ValueRail>,
}

impl ChequeLedger {
    pub fn new(config: LedgerConfig, clock: Arc<dyn Clock>, rail: Arc<dyn ValueRail>) -> Self {
        info!(instance = %config.instance, "ledger started");
        Self {
            tracker: SignOverTracker::from_config(&config),
            config,
            registry: ChequeRegistry::new(),
            accounts: AccountLedger::new(),
            withdrawals: PendingWithdrawals::new(),
            clock,
            rail,
        }
    }

    /// Rebuild a ledger from a snapshot
    pub fn restore(
        config: LedgerConfig,
        clock: Arc<dyn Clock>,
        rail: Arc<dyn ValueRail>,
        snapshot: LedgerSnapshot,
    ) -> Self {
        let ledger = Self::new(config, clock, rail);
        for cheque in snapshot.cheques {
            ledger.registry.restore(cheque);
        }
        for (id, tail) in snapshot.chains {
            ledger.tracker.restore(id, tail);
        }
        for (who, amount) in snapshot.balances {
            ledger.accounts.restore(who, amount);
        }
        for (who, amount) in snapshot.pending {
            ledger.withdrawals.restore(who, amount);
        }
        ledger
    }

    /// Copy out every keyed map. Concurrent writers may land on either side
    /// of the copy; take it while the ledger is quiet for a consistent image.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            cheques: self.registry.snapshot(),
            chains: self.tracker.snapshot(),
            balances: self.accounts.snapshot(),
            pending: self.withdrawals.snapshot(),
        }
    }

    /// The address authorizations must name to be redeemed here
    pub fn instance(&self) -> Address {
        self.config.instance
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Cheques
    // ------------------------------------------------------------------

    /// Register cheque `id` with `caller` as payer
    pub fn issue_cheque(
        &self,
        caller: &Address,
        id: ChequeId,
        payee: Address,
        amount: Amount,
        valid_from: u32,
        valid_thru: u32,
    ) -> Result<Cheque, LedgerError> {
        self.registry.issue(
            id,
            *caller,
            payee,
            amount,
            valid_from,
            valid_thru,
            self.clock.now(),
        )
    }

    /// Revoke an Issued cheque. Before any sign-over only the payer may;
    /// afterwards only the notified holder.
    pub fn revoke(&self, caller: &Address, id: ChequeId) -> Result<(), LedgerError> {
        self.registry.revoke(id, *caller, |cheque| {
            self.tracker
                .tail(&cheque.id())
                .map(|tail| tail.holder)
                .unwrap_or_else(|| cheque.payer())
        })
    }

    /// Record a sign-over of an Issued cheque; anyone may relay one
    pub fn notify_sign_over(&self, signed: &SignedSignOver) -> Result<ChainTail, LedgerError> {
        let id = signed.assertion().cheque_id();
        self.registry
            .with_issued(id, |cheque| self.tracker.notify(signed, cheque.payee()))
    }

    /// Redeem a cheque that was never signed over, crediting its payee
    pub fn redeem(&self, signed: &SignedCheque) -> Result<Redemption, LedgerError> {
        let id = signed.terms().id();
        let result = self.registry.with_issued(id, |cheque| {
            if self.tracker.is_signed_over(&id) {
                return Err(LedgerError::ChequeSignedOver);
            }
            self.authorize(cheque, signed)?;
            let payee = cheque.payee();
            self.settle(cheque, payee)
        });
        Self::log_redemption(id, &result);
        result
    }

    /// Redeem a signed-over cheque by presenting its whole chain, crediting
    /// the final holder
    pub fn redeem_sign_over(
        &self,
        signed: &SignedCheque,
        chain: &[SignedSignOver],
    ) -> Result<Redemption, LedgerError> {
        let id = signed.terms().id();
        let result = self.registry.with_issued(id, |cheque| {
            self.authorize(cheque, signed)?;
            let holder = self.tracker.validate_chain(id, cheque.payee(), chain)?;
            self.settle(cheque, holder)
        });
        Self::log_redemption(id, &result);
        result
    }

    /// Would this authorization (and chain) pass redemption's signature
    /// and chain checks? Funds, timing and issuance are not consulted.
    pub fn is_cheque_valid(&self, signed: &SignedCheque, chain: &[SignedSignOver]) -> bool {
        let terms = signed.terms();
        let id = terms.id();

        if terms.ledger() != self.config.instance || signed.verify().is_err() {
            return false;
        }
        if let Some(cheque) = self.registry.get(&id) {
            if !cheque.matches(terms) {
                return false;
            }
        }

        if chain.is_empty() {
            !self.tracker.is_signed_over(&id)
        } else {
            self.tracker
                .validate_chain(id, terms.payee(), chain)
                .is_ok()
        }
    }

    pub fn cheque_status(&self, id: &ChequeId) -> ChequeStatus {
        self.registry.status(id)
    }

    pub fn cheque(&self, id: &ChequeId) -> Option<Cheque> {
        self.registry.get(id)
    }

    pub fn sign_over_tail(&self, id: &ChequeId) -> Option<ChainTail> {
        self.tracker.tail(id)
    }

    // ------------------------------------------------------------------
    // Funds
    // ------------------------------------------------------------------

    pub fn deposit(&self, caller: &Address, amount: Amount) -> Result<Amount, LedgerError> {
        self.accounts.deposit(*caller, amount)
    }

    /// Withdraw from the caller's balance to the caller
    pub fn withdraw(&self, caller: &Address, amount: Amount) -> Result<Amount, LedgerError> {
        self.accounts.withdraw(*caller, amount, self.rail.as_ref())
    }

    /// Pay redeemed value from the caller's pending bucket to `recipient`
    pub fn withdraw_to(
        &self,
        caller: &Address,
        amount: Amount,
        recipient: Address,
    ) -> Result<Amount, LedgerError> {
        self.withdrawals
            .pay_out(*caller, amount, recipient, self.rail.as_ref())
    }

    pub fn balance_of(&self, who: &Address) -> Amount {
        self.accounts.balance_of(who)
    }

    pub fn pending_withdrawal_of(&self, who: &Address) -> Amount {
        self.withdrawals.owed_to(who)
    }

    // ------------------------------------------------------------------
    // Redemption internals
    // ------------------------------------------------------------------

    /// The authorization names this ledger, carries the registered terms and
    /// is signed by the registered payer
    fn authorize(&self, cheque: &Cheque, signed: &SignedCheque) -> Result<(), LedgerError> {
        let terms = signed.terms();
        if terms.ledger() != self.config.instance {
            return Err(LedgerError::InvalidCheque(format!(
                "drawn on {}, this ledger is {}",
                terms.ledger(),
                self.config.instance
            )));
        }
        if !cheque.matches(terms) {
            return Err(LedgerError::InvalidCheque(
                "terms differ from the issued cheque".into(),
            ));
        }
        Verifier::verify(terms, signed.signature(), &cheque.payer())?;
        Ok(())
    }

    /// Timing and funds checks, then the transfer and the status change.
    /// Nothing is mutated unless every check passes.
    fn settle(&self, cheque: &mut Cheque, payee: Address) -> Result<Redemption, LedgerError> {
        match cheque.validity_at(self.clock.now()) {
            Validity::NotStarted => {
                return Err(LedgerError::ChequeNotStarted {
                    valid_from: cheque.valid_from(),
                })
            }
            Validity::Expired => {
                return Err(LedgerError::ChequeExpired {
                    valid_thru: cheque.valid_thru(),
                })
            }
            Validity::Active => {}
        }

        self.accounts.transfer_to_pending(
            cheque.payer(),
            payee,
            cheque.amount(),
            &self.withdrawals,
        )?;
        cheque.transition(ChequeStatus::Redeemed)?;

        Ok(Redemption {
            cheque_id: cheque.id(),
            payer: cheque.payer(),
            payee,
            amount: cheque.amount(),
        })
    }

    fn log_redemption(id: ChequeId, result: &Result<Redemption, LedgerError>) {
        match result {
            Ok(r) => info!(cheque = %id, payer = %r.payer, payee = %r.payee, amount = r.amount, "cheque redeemed"),
            Err(err) => debug!(cheque = %id, error = %err, "redemption rejected"),
        }
    }
}

impl fmt::Debug for ChequeLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChequeLedger")
            .field("instance", &self.config.instance)
            .field("cheques", &self.registry.len())
            .finish_non_exhaustive()
    }
}
