use crate::identity::{Address, RecoverableSig, SignatureError, Signer};
use crate::verifier::CanonicalMessage;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Malformed signature: {0}")]
    Malformed(#[from] SignatureError),

    #[error("Signer mismatch: expected {expected}, recovered {recovered}")]
    SignerMismatch { expected: Address, recovered: Address },
}

/// Stateless recover-and-compare authentication.
///
/// Nothing about a signature is remembered here; single use of an
/// authorization is enforced by the cheque status, not by the verifier.
pub struct Verifier;

impl Verifier {
    /// Recover the identity that signed a message
    pub fn recover<M: CanonicalMessage + ?Sized>(
        message: &M,
        signature: &RecoverableSig,
    ) -> Result<Address, VerifyError> {
        Ok(Signer::recover(&message.signing_digest(), signature)?)
    }

    /// Fail unless the message was signed by `expected`
    pub fn verify<M: CanonicalMessage + ?Sized>(
        message: &M,
        signature: &RecoverableSig,
        expected: &Address,
    ) -> Result<(), VerifyError> {
        let recovered = Self::recover(message, signature)?;
        if &recovered != expected {
            return Err(VerifyError::SignerMismatch {
                expected: *expected,
                recovered,
            });
        }
        Ok(())
    }

    /// Boolean form of `verify`
    pub fn is_signed_by<M: CanonicalMessage + ?Sized>(
        message: &M,
        signature: &RecoverableSig,
        expected: &Address,
    ) -> bool {
        Self::verify(message, signature, expected).is_ok()
    }
}
