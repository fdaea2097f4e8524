// Wire Codec Tests
// Signed cheques travelling between parties as bytes and text

use echeque::cheque::{ChequeBuilder, ChequeId, SignedCheque};
use echeque::codec::{CodecError, WireCodec};
use echeque::identity::{Address, Keypair};

fn signed() -> SignedCheque {
    let payer = Keypair::generate();
    ChequeBuilder::new()
        .id(ChequeId::from_label("wire").unwrap())
        .payer(&payer)
        .payee(Address::from_bytes([2; 20]))
        .amount(u128::MAX)
        .valid_from(1)
        .valid_thru(u32::MAX)
        .ledger(Address::from_bytes([9; 20]))
        .build()
        .unwrap()
}

/// Test: Decoded cheque still verifies
#[test]
fn test_decoded_cheque_verifies() {
    let original = signed();

    let text = WireCodec::encode_base64(&original).unwrap();
    let decoded: SignedCheque = WireCodec::decode_base64(&text).unwrap();

    assert_eq!(decoded, original);
    assert!(decoded.verify().is_ok());
}

/// Test: Base64 output is URL-safe
#[test]
fn test_base64_url_safe() {
    let text = WireCodec::encode_base64(&signed()).unwrap();
    assert!(!text.contains('+') && !text.contains('/') && !text.contains('='));
}

/// Test: Corrupted signature bytes are caught while decoding
#[test]
fn test_decode_rejects_bad_signature_v() {
    let mut bytes = WireCodec::encode(&signed()).unwrap();
    let last = bytes.len() - 1;
    bytes[last] = 99;

    assert!(matches!(
        WireCodec::decode::<SignedCheque>(&bytes),
        Err(CodecError::DecodeError(_))
    ));
}

/// Test: Text errors are specific
#[test]
fn test_bad_text() {
    assert!(matches!(
        WireCodec::decode_hex::<SignedCheque>("not hex"),
        Err(CodecError::InvalidHex(_))
    ));
    assert!(matches!(
        WireCodec::decode_base64::<SignedCheque>("***"),
        Err(CodecError::InvalidBase64(_))
    ));
}
