use crate::cheque::ChequeId;
use crate::identity::{Address, RecoverableSig};
use crate::verifier::{CanonicalMessage, Packed, Verifier, VerifyError};
use serde::{Deserialize, Serialize};

/// "Redemption rights for `cheque_id` pass from `from` to `to`", the
/// `counter`-th such transfer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignOver {
    magic: u32,
    counter: u8,
    cheque_id: ChequeId,
    from: Address,
    to: Address,
}

impl SignOver {
    pub fn new(magic: u32, counter: u8, cheque_id: ChequeId, from: Address, to: Address) -> Self {
        Self {
            magic,
            counter,
            cheque_id,
            from,
            to,
        }
    }

    /// Protocol tag
    pub fn magic(&self) -> u32 {
        self.magic
    }

    /// Position in the chain, starting at 1
    pub fn counter(&self) -> u8 {
        self.counter
    }

    pub fn cheque_id(&self) -> ChequeId {
        self.cheque_id
    }

    /// Payee giving up the cheque; must be the signer
    pub fn from(&self) -> Address {
        self.from
    }

    /// Payee receiving the cheque
    pub fn to(&self) -> Address {
        self.to
    }
}

impl CanonicalMessage for SignOver {
    /// magic(4) || counter(1) || chequeId(32) || from(20) || to(20)
    fn canonical_bytes(&self) -> Vec<u8> {
        Packed::new()
            .u32(self.magic)
            .u8(self.counter)
            .bytes(self.cheque_id.as_bytes())
            .bytes(self.from.as_bytes())
            .bytes(self.to.as_bytes())
            .finish()
    }
}

/// A sign-over assertion with the signature of its `from` payee
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedSignOver {
    assertion: SignOver,
    signature: RecoverableSig,
}

impl SignedSignOver {
    pub fn from_parts(assertion: SignOver, signature: RecoverableSig) -> Self {
        Self {
            assertion,
            signature,
        }
    }

    pub fn assertion(&self) -> &SignOver {
        &self.assertion
    }

    pub fn signature(&self) -> &RecoverableSig {
        &self.signature
    }

    /// Check the signature recovers to the `from` payee
    pub fn verify(&self) -> Result<(), VerifyError> {
        Verifier::verify(&self.assertion, &self.signature, &self.assertion.from)
    }
}

/// Latest notified link for a cheque: how far the chain has grown and who
/// holds the cheque now
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainTail {
    pub counter: u8,
    pub holder: Address,
}
