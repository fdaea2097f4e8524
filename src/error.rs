// Ledger errors - one enum for every operation on the ledger surface

use crate::cheque::ChequeId;
use crate::identity::{Address, SignatureError};
use crate::verifier::VerifyError;
use crate::Amount;
use thiserror::Error;

/// Coarse failure category a caller can branch on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Zero amounts, amounts that would overflow, malformed signature encodings
    Validation,
    /// Unknown cheque id
    NotFound,
    /// Illegal status transition
    StateConflict,
    /// Signature mismatch, chain sequence or link mismatch, wrong caller
    Authorization,
    /// Cheque not yet valid or already expired
    Timing,
    /// Balance or pending-withdrawal shortfall
    InsufficientFunds,
    /// The external value rail refused a transfer
    Rail,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Malformed signature: {0}")]
    MalformedSignature(#[from] SignatureError),

    #[error("Cheque not found: {0}")]
    NotFound(ChequeId),

    #[error("Cheque id already exists: {0}")]
    AlreadyExists(ChequeId),

    #[error("Cheque already redeemed: {0}")]
    AlreadyRedeemed(ChequeId),

    #[error("Cheque already revoked: {0}")]
    AlreadyRevoked(ChequeId),

    #[error("Signature does not recover to {expected}")]
    BadSignature { expected: Address },

    #[error("Invalid cheque: {0}")]
    InvalidCheque(String),

    #[error("Not the owner of the cheque: {caller}")]
    NotOwner { caller: Address },

    #[error("Cheque has been signed over; present the full chain")]
    ChequeSignedOver,

    #[error("Cheque has not been signed over")]
    NotSignedOver,

    #[error("Invalid sign-over sequence: expected counter {expected}, got {got}")]
    InvalidSequence { expected: u16, got: u8 },

    #[error("Sign-over does not continue the custody line: {0}")]
    BrokenLink(String),

    #[error("Invalid sign-over chain: {0}")]
    InvalidChain(String),

    #[error("Cheque not valid before {valid_from}")]
    ChequeNotStarted { valid_from: u32 },

    #[error("Cheque expired at {valid_thru}")]
    ChequeExpired { valid_thru: u32 },

    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: Amount, required: Amount },

    #[error("Insufficient payer funds: available {available}, required {required}")]
    InsufficientFunds { available: Amount, required: Amount },

    #[error("Insufficient pending withdrawal: available {available}, required {required}")]
    InsufficientPending { available: Amount, required: Amount },

    #[error("Value rail refused transfer: {0}")]
    RailFailure(String),

    #[error("Amount overflow")]
    Overflow,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::ZeroAmount
            | LedgerError::Overflow
            | LedgerError::MalformedSignature(_) => ErrorKind::Validation,
            LedgerError::NotFound(_) => ErrorKind::NotFound,
            LedgerError::AlreadyExists(_)
            | LedgerError::AlreadyRedeemed(_)
            | LedgerError::AlreadyRevoked(_) => ErrorKind::StateConflict,
            LedgerError::BadSignature { .. }
            | LedgerError::InvalidCheque(_)
            | LedgerError::NotOwner { .. }
            | LedgerError::ChequeSignedOver
            | LedgerError::NotSignedOver
            | LedgerError::InvalidSequence { .. }
            | LedgerError::BrokenLink(_)
            | LedgerError::InvalidChain(_) => ErrorKind::Authorization,
            LedgerError::ChequeNotStarted { .. } | LedgerError::ChequeExpired { .. } => {
                ErrorKind::Timing
            }
            LedgerError::InsufficientBalance { .. }
            | LedgerError::InsufficientFunds { .. }
            | LedgerError::InsufficientPending { .. } => ErrorKind::InsufficientFunds,
            LedgerError::RailFailure(_) => ErrorKind::Rail,
        }
    }
}

impl From<VerifyError> for LedgerError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Malformed(e) => LedgerError::MalformedSignature(e),
            VerifyError::SignerMismatch { expected, .. } => LedgerError::BadSignature { expected },
        }
    }
}
