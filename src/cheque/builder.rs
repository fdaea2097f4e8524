use crate::cheque::{ChequeId, ChequeTerms, SignedCheque};
use crate::identity::{Address, Keypair, Signer};
use crate::verifier::CanonicalMessage;
use crate::Amount;
use thiserror::Error;

/// Errors that can occur when building a signed cheque
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChequeBuildError {
    #[error("Missing payer: payer keypair is required")]
    MissingPayer,

    #[error("Missing payee: payee address is required")]
    MissingPayee,

    #[error("Missing amount: cheque amount is required")]
    MissingAmount,

    #[error("Missing ledger: the ledger instance address is required")]
    MissingLedger,

    #[error("Invalid amount: amount cannot be zero")]
    ZeroAmount,

    #[error("Invalid window: valid_from {valid_from} is after valid_thru {valid_thru}")]
    InvertedWindow { valid_from: u32, valid_thru: u32 },
}

/// Builder for payer-signed redemption authorizations
pub struct ChequeBuilder<'a> {
    id: Option<ChequeId>,
    payer: Option<&'a Keypair>,
    payee: Option<Address>,
    amount: Option<Amount>,
    valid_from: u32,
    valid_thru: u32,
    ledger: Option<Address>,
}

impl<'a> ChequeBuilder<'a> {
    pub fn new() -> Self {
        Self {
            id: None,
            payer: None,
            payee: None,
            amount: None,
            valid_from: 0,
            valid_thru: 0,
            ledger: None,
        }
    }

    /// Set the cheque id (optional - random if not provided)
    pub fn id(mut self, id: ChequeId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the payer who signs (required)
    pub fn payer(mut self, keypair: &'a Keypair) -> Self {
        self.payer = Some(keypair);
        self
    }

    /// Set the payee (required)
    pub fn payee(mut self, payee: Address) -> Self {
        self.payee = Some(payee);
        self
    }

    /// Set the amount (required)
    pub fn amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Earliest redemption time, 0 for none
    pub fn valid_from(mut self, valid_from: u32) -> Self {
        self.valid_from = valid_from;
        self
    }

    /// Latest redemption time, 0 for none
    pub fn valid_thru(mut self, valid_thru: u32) -> Self {
        self.valid_thru = valid_thru;
        self
    }

    /// Set the ledger instance the cheque is drawn on (required)
    pub fn ledger(mut self, ledger: Address) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Build and sign the cheque
    pub fn build(self) -> Result<SignedCheque, ChequeBuildError> {
        let payer = self.payer.ok_or(ChequeBuildError::MissingPayer)?;
        let payee = self.payee.ok_or(ChequeBuildError::MissingPayee)?;
        let amount = self.amount.ok_or(ChequeBuildError::MissingAmount)?;
        let ledger = self.ledger.ok_or(ChequeBuildError::MissingLedger)?;

        if amount == 0 {
            return Err(ChequeBuildError::ZeroAmount);
        }
        if self.valid_from != 0 && self.valid_thru != 0 && self.valid_from > self.valid_thru {
            return Err(ChequeBuildError::InvertedWindow {
                valid_from: self.valid_from,
                valid_thru: self.valid_thru,
            });
        }

        let terms = ChequeTerms::new(
            self.id.unwrap_or_else(ChequeId::random),
            payer.address(),
            payee,
            amount,
            self.valid_from,
            self.valid_thru,
            ledger,
        );
        let signature = Signer::sign_digest(payer, &terms.signing_digest());

        Ok(SignedCheque::from_parts(terms, signature))
    }
}

impl<'a> Default for ChequeBuilder<'a> {
    fn default() -> Self {
        Self::new()
    }
}
