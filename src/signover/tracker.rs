// Sign-Over Chain Tracker - the notified tail of each cheque's custody chain
//
// Only the tail (counter + current holder) is kept. Earlier links are not
// stored; whoever redeems must present the whole chain again, and it must
// end exactly at the notified tail.

use crate::cheque::ChequeId;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::identity::Address;
use crate::signover::{ChainTail, SignedSignOver};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

#[derive(Debug)]
pub struct SignOverTracker {
    tails: DashMap<ChequeId, ChainTail>,
    magic: u32,
    max_chain_len: u8,
}

impl SignOverTracker {
    pub fn new(magic: u32, max_chain_len: u8) -> Self {
        Self {
            tails: DashMap::new(),
            magic,
            max_chain_len,
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(config.sign_over_magic, config.max_chain_len)
    }

    /// Record the next sign-over for a cheque. Anyone may notify.
    ///
    /// The assertion must be signed by its `from` payee, carry exactly the
    /// next counter, and hand the cheque on from whoever holds it now
    /// (`original_payee` before the first notification).
    pub fn notify(
        &self,
        signed: &SignedSignOver,
        original_payee: Address,
    ) -> Result<ChainTail, LedgerError> {
        let assertion = signed.assertion();
        let id = assertion.cheque_id();

        if assertion.magic() != self.magic {
            return Err(LedgerError::BrokenLink(format!(
                "protocol tag {:#010x}, expected {:#010x}",
                assertion.magic(),
                self.magic
            )));
        }
        signed.verify()?;

        let next = ChainTail {
            counter: assertion.counter(),
            holder: assertion.to(),
        };
        let outcome = match self.tails.entry(id) {
            Entry::Occupied(mut slot) => {
                let current = *slot.get();
                self.check_next(assertion.counter(), u16::from(current.counter) + 1)
                    .and_then(|_| Self::check_continues(assertion.from(), current.holder))
                    .map(|_| {
                        slot.insert(next);
                    })
            }
            Entry::Vacant(slot) => self
                .check_next(assertion.counter(), 1)
                .and_then(|_| Self::check_continues(assertion.from(), original_payee))
                .map(|_| {
                    slot.insert(next);
                }),
        };

        match outcome {
            Ok(()) => {
                info!(cheque = %id, counter = next.counter, holder = %next.holder, "sign-over notified");
                Ok(next)
            }
            Err(err) => {
                debug!(cheque = %id, error = %err, "sign-over rejected");
                Err(err)
            }
        }
    }

    pub fn tail(&self, id: &ChequeId) -> Option<ChainTail> {
        self.tails.get(id).map(|t| *t)
    }

    pub fn is_signed_over(&self, id: &ChequeId) -> bool {
        self.tails.contains_key(id)
    }

    /// Validate a presented chain against the notified tail and return the
    /// payee it ends at.
    ///
    /// Checks, in order: every signature; counters 1..n; the first link
    /// leaves the original payee; each link leaves the previous recipient;
    /// the last link is exactly the notified tail.
    pub fn validate_chain(
        &self,
        id: ChequeId,
        original_payee: Address,
        chain: &[SignedSignOver],
    ) -> Result<Address, LedgerError> {
        let tail = self.tail(&id).ok_or(LedgerError::NotSignedOver)?;
        let last = chain
            .last()
            .ok_or_else(|| LedgerError::InvalidChain("empty chain".into()))?;

        for (index, link) in chain.iter().enumerate() {
            link.verify()
                .map_err(|e| LedgerError::InvalidChain(format!("link {}: {}", index + 1, e)))?;
        }

        for (index, link) in chain.iter().enumerate() {
            let assertion = link.assertion();
            if usize::from(assertion.counter()) != index + 1 {
                return Err(LedgerError::InvalidChain(format!(
                    "link {} carries counter {}",
                    index + 1,
                    assertion.counter()
                )));
            }
            if assertion.cheque_id() != id || assertion.magic() != self.magic {
                return Err(LedgerError::InvalidChain(format!(
                    "link {} is not a sign-over of {}",
                    index + 1,
                    id
                )));
            }
        }

        let mut holder = original_payee;
        for (index, link) in chain.iter().enumerate() {
            let assertion = link.assertion();
            if assertion.from() != holder {
                return Err(LedgerError::InvalidChain(format!(
                    "link {} leaves {}, but the cheque is held by {}",
                    index + 1,
                    assertion.from(),
                    holder
                )));
            }
            holder = assertion.to();
        }

        let last = last.assertion();
        if last.counter() != tail.counter || last.to() != tail.holder {
            debug!(
                cheque = %id,
                presented = last.counter(),
                notified = tail.counter,
                "chain does not end at the notified tail"
            );
            return Err(LedgerError::InvalidChain(format!(
                "chain ends at ({}, {}), notified tail is ({}, {})",
                last.counter(),
                last.to(),
                tail.counter,
                tail.holder
            )));
        }

        Ok(holder)
    }

    pub(crate) fn restore(&self, id: ChequeId, tail: ChainTail) {
        self.tails.insert(id, tail);
    }

    pub(crate) fn snapshot(&self) -> Vec<(ChequeId, ChainTail)> {
        self.tails.iter().map(|e| (*e.key(), *e.value())).collect()
    }

    fn check_next(&self, counter: u8, expected: u16) -> Result<(), LedgerError> {
        if u16::from(counter) != expected || expected > u16::from(self.max_chain_len) {
            return Err(LedgerError::InvalidSequence {
                expected,
                got: counter,
            });
        }
        Ok(())
    }

    fn check_continues(from: Address, holder: Address) -> Result<(), LedgerError> {
        if from != holder {
            return Err(LedgerError::BrokenLink(format!(
                "sign-over from {}, but the cheque is held by {}",
                from, holder
            )));
        }
        Ok(())
    }
}
