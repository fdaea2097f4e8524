// Wire codec - compact binary and text encodings for signed messages
//
// Signed cheques and sign-over assertions travel between parties off the
// ledger; this is how they are packed for that trip.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to encode: {0}")]
    EncodeError(String),

    #[error("Failed to decode: {0}")]
    DecodeError(String),

    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    #[error("Invalid base64 string: {0}")]
    InvalidBase64(String),
}

/// postcard for bytes, hex and URL-safe base64 for text
pub struct WireCodec;

impl WireCodec {
    pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
        postcard::to_allocvec(value).map_err(|e| CodecError::EncodeError(e.to_string()))
    }

    pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
        postcard::from_bytes(bytes).map_err(|e| CodecError::DecodeError(e.to_string()))
    }

    pub fn encode_hex<T: Serialize>(value: &T) -> Result<String, CodecError> {
        Ok(hex::encode(Self::encode(value)?))
    }

    pub fn decode_hex<T: DeserializeOwned>(hex_str: &str) -> Result<T, CodecError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|e| CodecError::InvalidHex(e.to_string()))?;
        Self::decode(&bytes)
    }

    pub fn encode_base64<T: Serialize>(value: &T) -> Result<String, CodecError> {
        Ok(URL_SAFE_NO_PAD.encode(Self::encode(value)?))
    }

    pub fn decode_base64<T: DeserializeOwned>(b64_str: &str) -> Result<T, CodecError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(b64_str.trim())
            .map_err(|e| CodecError::InvalidBase64(e.to_string()))?;
        Self::decode(&bytes)
    }
}
