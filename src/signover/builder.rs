use crate::cheque::ChequeId;
use crate::config::SIGN_OVER_MAGIC;
use crate::identity::{Address, Keypair, Signer};
use crate::signover::{SignOver, SignedSignOver};
use crate::verifier::CanonicalMessage;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SignOverBuildError {
    #[error("Missing cheque id")]
    MissingCheque,

    #[error("Missing signer: the current payee's keypair is required")]
    MissingFrom,

    #[error("Missing recipient")]
    MissingTo,

    #[error("Counter must start at 1")]
    ZeroCounter,

    #[error("Self sign-over not allowed")]
    SelfTransfer,
}

/// Builder for payee-signed sign-over assertions
pub struct SignOverBuilder<'a> {
    cheque_id: Option<ChequeId>,
    counter: u8,
    from: Option<&'a Keypair>,
    to: Option<Address>,
    magic: u32,
}

impl<'a> SignOverBuilder<'a> {
    pub fn new() -> Self {
        Self {
            cheque_id: None,
            counter: 1,
            from: None,
            to: None,
            magic: SIGN_OVER_MAGIC,
        }
    }

    pub fn cheque(mut self, id: ChequeId) -> Self {
        self.cheque_id = Some(id);
        self
    }

    /// Position in the chain (defaults to 1)
    pub fn counter(mut self, counter: u8) -> Self {
        self.counter = counter;
        self
    }

    /// Current payee, who signs
    pub fn from(mut self, keypair: &'a Keypair) -> Self {
        self.from = Some(keypair);
        self
    }

    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    /// Override the protocol tag (defaults to SIGN_OVER_MAGIC)
    pub fn magic(mut self, magic: u32) -> Self {
        self.magic = magic;
        self
    }

    pub fn build(self) -> Result<SignedSignOver, SignOverBuildError> {
        let cheque_id = self.cheque_id.ok_or(SignOverBuildError::MissingCheque)?;
        let from = self.from.ok_or(SignOverBuildError::MissingFrom)?;
        let to = self.to.ok_or(SignOverBuildError::MissingTo)?;

        if self.counter == 0 {
            return Err(SignOverBuildError::ZeroCounter);
        }
        if from.address() == to {
            return Err(SignOverBuildError::SelfTransfer);
        }

        let assertion = SignOver::new(self.magic, self.counter, cheque_id, from.address(), to);
        let signature = Signer::sign_digest(from, &assertion.signing_digest());

        Ok(SignedSignOver::from_parts(assertion, signature))
    }
}

impl<'a> Default for SignOverBuilder<'a> {
    fn default() -> Self {
        Self::new()
    }
}
