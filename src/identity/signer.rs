use crate::identity::keypair::context;
use crate::identity::{Address, Keypair, PublicKey};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::Message;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Encoded signature length: r (32) || s (32) || v (1)
pub const SIGNATURE_LEN: usize = 65;

/// Order of the secp256k1 group
const CURVE_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// Floor of CURVE_ORDER / 2; larger s values are the malleable twin
const HALF_CURVE_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Invalid signature length: expected 65, got {0}")]
    InvalidLength(usize),

    #[error("Signature component {0} is zero")]
    ZeroComponent(&'static str),

    #[error("Signature component {0} is not below the curve order")]
    OutOfRange(&'static str),

    #[error("Signature s value is in the upper half of the curve order")]
    HighS,

    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Public key recovery failed: {0}")]
    RecoveryFailed(String),
}

/// Fixed-size recoverable ECDSA signature.
///
/// Constructing one always range-checks the components, so a value of this
/// type is well-formed; it may still fail to recover the expected signer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSig {
    r: [u8; 32],
    s: [u8; 32],
    v: u8,
}

impl RecoverableSig {
    /// Build from components, range-checking r, s and v
    pub fn from_parts(r: [u8; 32], s: [u8; 32], v: u8) -> Result<Self, SignatureError> {
        check_scalar(&r, "r")?;
        check_scalar(&s, "s")?;
        if s > HALF_CURVE_ORDER {
            return Err(SignatureError::HighS);
        }
        if !matches!(v, 0 | 1 | 27 | 28) {
            return Err(SignatureError::InvalidRecoveryId(v));
        }
        Ok(Self { r, s, v })
    }

    /// Decode the 65-byte `r || s || v` form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(SignatureError::InvalidLength(bytes.len()));
        }

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Self::from_parts(r, s, bytes[64])
    }

    /// Decode from hex, with or without `0x`
    pub fn from_hex(s: &str) -> Result<Self, SignatureError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| SignatureError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    pub fn v(&self) -> u8 {
        self.v
    }

    /// Recovery index in 0..=1 regardless of the 27/28 convention
    pub fn recovery_index(&self) -> u8 {
        if self.v >= 27 {
            self.v - 27
        } else {
            self.v
        }
    }
}

fn check_scalar(value: &[u8; 32], name: &'static str) -> Result<(), SignatureError> {
    if value.iter().all(|b| *b == 0) {
        return Err(SignatureError::ZeroComponent(name));
    }
    if *value >= CURVE_ORDER {
        return Err(SignatureError::OutOfRange(name));
    }
    Ok(())
}

impl fmt::Debug for RecoverableSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoverableSig(0x{})", hex::encode(self.to_bytes()))
    }
}

impl Serialize for RecoverableSig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

impl<'de> Deserialize<'de> for RecoverableSig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct SignatureVisitor;

        impl<'de> Visitor<'de> for SignatureVisitor {
            type Value = RecoverableSig;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("65 bytes of r || s || v")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                RecoverableSig::from_bytes(v).map_err(|e| E::custom(e.to_string()))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut bytes = Vec::with_capacity(SIGNATURE_LEN);
                while let Some(byte) = seq.next_element()? {
                    bytes.push(byte);
                }
                RecoverableSig::from_bytes(&bytes).map_err(|e| de::Error::custom(e.to_string()))
            }
        }

        deserializer.deserialize_bytes(SignatureVisitor)
    }
}

/// Signing and signer recovery over 32-byte digests
pub struct Signer;

impl Signer {
    /// Sign a digest, producing v in the 27/28 convention
    pub fn sign_digest(keypair: &Keypair, digest: &[u8; 32]) -> RecoverableSig {
        let message = Message::from_digest(*digest);
        let signature = context().sign_ecdsa_recoverable(&message, keypair.secret());
        let (recovery_id, compact) = signature.serialize_compact();

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);

        // libsecp256k1 always emits low-s signatures with a 0/1 recovery id
        RecoverableSig {
            r,
            s,
            v: 27 + recovery_id.to_i32() as u8,
        }
    }

    /// Recover the public key that produced a signature over a digest
    pub fn recover_public_key(
        digest: &[u8; 32],
        signature: &RecoverableSig,
    ) -> Result<PublicKey, SignatureError> {
        let recovery_id = RecoveryId::from_i32(signature.recovery_index() as i32)
            .map_err(|_| SignatureError::InvalidRecoveryId(signature.v))?;

        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(&signature.r);
        compact[32..].copy_from_slice(&signature.s);

        let recoverable = RecoverableSignature::from_compact(&compact, recovery_id)
            .map_err(|e| SignatureError::RecoveryFailed(e.to_string()))?;

        let message = Message::from_digest(*digest);
        context()
            .recover_ecdsa(&message, &recoverable)
            .map(PublicKey::from_inner)
            .map_err(|e| SignatureError::RecoveryFailed(e.to_string()))
    }

    /// Recover the address that produced a signature over a digest
    pub fn recover(digest: &[u8; 32], signature: &RecoverableSig) -> Result<Address, SignatureError> {
        Self::recover_public_key(digest, signature).map(|pk| pk.address())
    }
}
