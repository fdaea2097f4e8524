// Keypair Tests
// secp256k1 key generation, restoration and encoding

use echeque::identity::{Keypair, KeypairError, PublicKey};

/// Test: Each generated keypair should be unique
#[test]
fn test_keypairs_are_unique() {
    let keypair1 = Keypair::generate();
    let keypair2 = Keypair::generate();

    assert_ne!(
        keypair1.address(),
        keypair2.address(),
        "Two generated keypairs should have different addresses"
    );
}

/// Test: Secret key bytes restore the same identity
#[test]
fn test_secret_roundtrip() {
    let original = Keypair::generate();
    let restored = Keypair::from_bytes(&original.to_bytes()).expect("Should restore keypair");

    assert_eq!(original.public_key(), restored.public_key());
    assert_eq!(original.address(), restored.address());
}

/// Test: Hex secrets parse with or without 0x
#[test]
fn test_from_hex() {
    let original = Keypair::generate();
    let digits = hex::encode(original.to_bytes());

    let plain = Keypair::from_hex(&digits).unwrap();
    let prefixed = Keypair::from_hex(&format!("0x{}", digits)).unwrap();

    assert_eq!(plain.address(), original.address());
    assert_eq!(prefixed.address(), original.address());
}

/// Test: Wrong-length secret is rejected
#[test]
fn test_wrong_length_secret() {
    let result = Keypair::from_bytes(&[1u8; 31]);
    assert!(matches!(
        result,
        Err(KeypairError::InvalidLength {
            expected: 32,
            got: 31
        })
    ));
}

/// Test: Zero is not a valid secret key
#[test]
fn test_zero_secret_rejected() {
    let result = Keypair::from_bytes(&[0u8; 32]);
    assert!(matches!(result, Err(KeypairError::InvalidBytes(_))));
}

/// Test: Public key compressed and uncompressed forms
#[test]
fn test_public_key_encodings() {
    let keypair = Keypair::generate();
    let public_key = keypair.public_key();

    let compressed = public_key.to_bytes();
    let uncompressed = public_key.to_uncompressed();
    assert!(compressed[0] == 0x02 || compressed[0] == 0x03);
    assert_eq!(uncompressed[0], 0x04);

    let restored = PublicKey::from_bytes(&compressed).unwrap();
    assert_eq!(restored, public_key);
    assert_eq!(restored.address(), keypair.address());
}

/// Test: Debug output never shows the secret
#[test]
fn test_debug_hides_secret() {
    let keypair = Keypair::generate();
    let debug = format!("{:?}", keypair);

    assert!(!debug.contains(&hex::encode(keypair.to_bytes())));
    assert!(debug.contains(&keypair.address().to_string()));
}
