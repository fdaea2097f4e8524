use sha3::{Digest, Keccak256};

/// Prefix wallets prepend before signing a 32-byte hash
const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}

/// Digest actually signed for a message hash
pub fn signed_message_digest(hash: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(SIGNED_MESSAGE_PREFIX);
    hasher.update(hash);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// A message with one canonical, tightly packed byte encoding.
///
/// Independent implementations must produce identical bytes, so encoders
/// write fixed-width big-endian fields with no length prefixes or padding.
pub trait CanonicalMessage {
    fn canonical_bytes(&self) -> Vec<u8>;

    /// Keccak-256 of the canonical bytes
    fn message_hash(&self) -> [u8; 32] {
        keccak256(&self.canonical_bytes())
    }

    /// The digest a signer signs
    fn signing_digest(&self) -> [u8; 32] {
        signed_message_digest(&self.message_hash())
    }
}

/// Builder for packed encodings
#[derive(Default)]
pub struct Packed {
    bytes: Vec<u8>,
}

impl Packed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(mut self, value: &[u8]) -> Self {
        self.bytes.extend_from_slice(value);
        self
    }

    pub fn u8(mut self, value: u8) -> Self {
        self.bytes.push(value);
        self
    }

    pub fn u32(mut self, value: u32) -> Self {
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Left-padded to a 32-byte word
    pub fn u256(mut self, value: u128) -> Self {
        self.bytes.extend_from_slice(&[0u8; 16]);
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}
