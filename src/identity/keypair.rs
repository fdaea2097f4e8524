use crate::identity::Address;
use rand::rngs::OsRng;
use secp256k1::{All, Secp256k1};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeypairError {
    #[error("Invalid key length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("Invalid key bytes: {0}")]
    InvalidBytes(String),
}

/// Shared signing/verification context
pub(crate) fn context() -> &'static Secp256k1<All> {
    static CONTEXT: OnceLock<Secp256k1<All>> = OnceLock::new();
    CONTEXT.get_or_init(Secp256k1::new)
}

/// secp256k1 public key (33 bytes compressed)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey(secp256k1::PublicKey);

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.0.serialize())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PublicKeyVisitor;

        impl<'de> serde::de::Visitor<'de> for PublicKeyVisitor {
            type Value = PublicKey;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a 33-byte compressed public key")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                PublicKey::from_bytes(v).map_err(|e| E::custom(e.to_string()))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut bytes = Vec::with_capacity(33);
                while let Some(byte) = seq.next_element()? {
                    bytes.push(byte);
                }
                PublicKey::from_bytes(&bytes).map_err(|e| serde::de::Error::custom(e.to_string()))
            }
        }

        deserializer.deserialize_bytes(PublicKeyVisitor)
    }
}

impl PublicKey {
    /// Compressed SEC1 encoding
    pub fn to_bytes(&self) -> [u8; 33] {
        self.0.serialize()
    }

    /// Uncompressed SEC1 encoding (0x04 || X || Y)
    pub fn to_uncompressed(&self) -> [u8; 65] {
        self.0.serialize_uncompressed()
    }

    /// Parse a compressed or uncompressed SEC1 public key
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeypairError> {
        if bytes.len() != 33 && bytes.len() != 65 {
            return Err(KeypairError::InvalidLength {
                expected: 33,
                got: bytes.len(),
            });
        }

        secp256k1::PublicKey::from_slice(bytes)
            .map(Self)
            .map_err(|e| KeypairError::InvalidBytes(e.to_string()))
    }

    /// The address this key controls
    pub fn address(&self) -> Address {
        Address::from_public_key(self)
    }

    pub(crate) fn from_inner(inner: secp256k1::PublicKey) -> Self {
        Self(inner)
    }
}

/// secp256k1 keypair. Lives off the ledger: the ledger only ever sees
/// addresses recovered from signatures.
#[derive(Clone)]
pub struct Keypair {
    secret: secp256k1::SecretKey,
    public: PublicKey,
}

impl Keypair {
    /// Generate a new random keypair
    pub fn generate() -> Self {
        let secret = secp256k1::SecretKey::new(&mut OsRng);
        Self::from_secret(secret)
    }

    /// Deserialize a keypair from its 32 secret key bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeypairError> {
        if bytes.len() != 32 {
            return Err(KeypairError::InvalidLength {
                expected: 32,
                got: bytes.len(),
            });
        }

        let secret = secp256k1::SecretKey::from_slice(bytes)
            .map_err(|e| KeypairError::InvalidBytes(e.to_string()))?;
        Ok(Self::from_secret(secret))
    }

    /// Parse a hex-encoded secret key, with or without `0x`
    pub fn from_hex(s: &str) -> Result<Self, KeypairError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| KeypairError::InvalidBytes(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Secret key bytes
    pub fn to_bytes(&self) -> [u8; 32] {
        self.secret.secret_bytes()
    }

    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    pub fn address(&self) -> Address {
        self.public.address()
    }

    pub(crate) fn secret(&self) -> &secp256k1::SecretKey {
        &self.secret
    }

    fn from_secret(secret: secp256k1::SecretKey) -> Self {
        let public = secp256k1::PublicKey::from_secret_key(context(), &secret);
        Self {
            secret,
            public: PublicKey(public),
        }
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
