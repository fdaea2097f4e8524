use crate::error::LedgerError;
use crate::identity::{Address, RecoverableSig};
use crate::verifier::{CanonicalMessage, Packed, Verifier, VerifyError};
use crate::Amount;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChequeIdError {
    #[error("Label too long: {0} bytes, at most 31 fit")]
    LabelTooLong(usize),

    #[error("Invalid cheque id hex: {0}")]
    InvalidHex(String),

    #[error("Invalid cheque id length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Caller-chosen 32-byte cheque identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChequeId([u8; 32]);

impl ChequeId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Short text label, UTF-8 bytes right-padded with zeros. One byte is
    /// kept free so a label is never confused with a full 32-byte id.
    pub fn from_label(label: &str) -> Result<Self, ChequeIdError> {
        let raw = label.as_bytes();
        if raw.len() > 31 {
            return Err(ChequeIdError::LabelTooLong(raw.len()));
        }
        let mut bytes = [0u8; 32];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self(bytes))
    }

    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ChequeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for ChequeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChequeId({})", self)
    }
}

impl FromStr for ChequeId {
    type Err = ChequeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| ChequeIdError::InvalidHex(e.to_string()))?;
        let array: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ChequeIdError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }
}

/// Lifecycle of a cheque id. Discriminants are stable and exposed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChequeStatus {
    Unissued = 0,
    Issued = 1,
    Redeemed = 2,
    Revoked = 3,
}

impl ChequeStatus {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ChequeStatus::Redeemed | ChequeStatus::Revoked)
    }

    /// The only legal edges: Unissued -> Issued, Issued -> {Redeemed, Revoked}
    pub fn can_transition_to(self, next: ChequeStatus) -> bool {
        matches!(
            (self, next),
            (ChequeStatus::Unissued, ChequeStatus::Issued)
                | (ChequeStatus::Issued, ChequeStatus::Redeemed)
                | (ChequeStatus::Issued, ChequeStatus::Revoked)
        )
    }
}

impl fmt::Display for ChequeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChequeStatus::Unissued => "unissued",
            ChequeStatus::Issued => "issued",
            ChequeStatus::Redeemed => "redeemed",
            ChequeStatus::Revoked => "revoked",
        };
        f.write_str(name)
    }
}

/// Where `now` falls relative to a cheque's validity window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validity {
    NotStarted,
    Active,
    Expired,
}

/// The terms a payer signs to authorize redemption
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChequeTerms {
    id: ChequeId,
    payer: Address,
    payee: Address,
    amount: Amount,
    valid_from: u32,
    valid_thru: u32,
    ledger: Address,
}

impl ChequeTerms {
    pub fn new(
        id: ChequeId,
        payer: Address,
        payee: Address,
        amount: Amount,
        valid_from: u32,
        valid_thru: u32,
        ledger: Address,
    ) -> Self {
        Self {
            id,
            payer,
            payee,
            amount,
            valid_from,
            valid_thru,
            ledger,
        }
    }

    pub fn id(&self) -> ChequeId {
        self.id
    }

    pub fn payer(&self) -> Address {
        self.payer
    }

    pub fn payee(&self) -> Address {
        self.payee
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn valid_from(&self) -> u32 {
        self.valid_from
    }

    pub fn valid_thru(&self) -> u32 {
        self.valid_thru
    }

    /// Ledger instance the authorization is bound to
    pub fn ledger(&self) -> Address {
        self.ledger
    }
}

impl CanonicalMessage for ChequeTerms {
    /// id(32) || payer(20) || payee(20) || amount(32) || validFrom(4) || validThru(4) || ledger(20)
    fn canonical_bytes(&self) -> Vec<u8> {
        Packed::new()
            .bytes(self.id.as_bytes())
            .bytes(self.payer.as_bytes())
            .bytes(self.payee.as_bytes())
            .u256(self.amount)
            .u32(self.valid_from)
            .u32(self.valid_thru)
            .bytes(self.ledger.as_bytes())
            .finish()
    }
}

/// Cheque terms plus the payer's signature: the redemption authorization
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCheque {
    terms: ChequeTerms,
    signature: RecoverableSig,
}

impl SignedCheque {
    pub fn from_parts(terms: ChequeTerms, signature: RecoverableSig) -> Self {
        Self { terms, signature }
    }

    pub fn terms(&self) -> &ChequeTerms {
        &self.terms
    }

    pub fn signature(&self) -> &RecoverableSig {
        &self.signature
    }

    /// Check the signature recovers to the payer named in the terms
    pub fn verify(&self) -> Result<(), VerifyError> {
        Verifier::verify(&self.terms, &self.signature, &self.terms.payer)
    }
}

/// Registered cheque record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cheque {
    id: ChequeId,
    payer: Address,
    payee: Address,
    amount: Amount,
    valid_from: u32,
    valid_thru: u32,
    status: ChequeStatus,
    created_at: u64,
}

impl Cheque {
    pub(crate) fn issued(
        id: ChequeId,
        payer: Address,
        payee: Address,
        amount: Amount,
        valid_from: u32,
        valid_thru: u32,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            payer,
            payee,
            amount,
            valid_from,
            valid_thru,
            status: ChequeStatus::Issued,
            created_at,
        }
    }

    pub fn id(&self) -> ChequeId {
        self.id
    }

    pub fn payer(&self) -> Address {
        self.payer
    }

    /// Original payee, before any sign-over
    pub fn payee(&self) -> Address {
        self.payee
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn valid_from(&self) -> u32 {
        self.valid_from
    }

    pub fn valid_thru(&self) -> u32 {
        self.valid_thru
    }

    pub fn status(&self) -> ChequeStatus {
        self.status
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// True when the terms describe this record (the ledger field is
    /// checked separately against the instance)
    pub fn matches(&self, terms: &ChequeTerms) -> bool {
        self.id == terms.id
            && self.payer == terms.payer
            && self.payee == terms.payee
            && self.amount == terms.amount
            && self.valid_from == terms.valid_from
            && self.valid_thru == terms.valid_thru
    }

    /// Zero bounds are open
    pub fn validity_at(&self, now: u64) -> Validity {
        if self.valid_from != 0 && now < u64::from(self.valid_from) {
            Validity::NotStarted
        } else if self.valid_thru != 0 && now > u64::from(self.valid_thru) {
            Validity::Expired
        } else {
            Validity::Active
        }
    }

    /// Error for the current status when an Issued cheque is required
    pub(crate) fn require_issued(&self) -> Result<(), LedgerError> {
        match self.status {
            ChequeStatus::Issued => Ok(()),
            ChequeStatus::Redeemed => Err(LedgerError::AlreadyRedeemed(self.id)),
            ChequeStatus::Revoked => Err(LedgerError::AlreadyRevoked(self.id)),
            ChequeStatus::Unissued => Err(LedgerError::NotFound(self.id)),
        }
    }

    pub(crate) fn transition(&mut self, next: ChequeStatus) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(next) {
            self.require_issued()?;
            return Err(LedgerError::InvalidCheque(format!(
                "illegal transition {} -> {}",
                self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }
}
