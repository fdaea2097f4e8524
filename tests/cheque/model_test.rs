// Cheque Model Tests
// Ids, canonical encoding and the status state machine

use echeque::cheque::{ChequeBuilder, ChequeId, ChequeIdError, ChequeStatus, ChequeTerms};
use echeque::identity::{Address, Keypair, Signer};
use echeque::verifier::{keccak256, signed_message_digest, CanonicalMessage};

fn terms(amount: u128) -> ChequeTerms {
    ChequeTerms::new(
        ChequeId::from_bytes([0xaa; 32]),
        Address::from_bytes([0x11; 20]),
        Address::from_bytes([0x22; 20]),
        amount,
        0x0102_0304,
        0x0a0b_0c0d,
        Address::from_bytes([0x33; 20]),
    )
}

// ============================================================================
// CHEQUE IDS
// ============================================================================

/// Test: Labels are right-padded with zeros
#[test]
fn test_label_padding() {
    let id = ChequeId::from_label("rent").unwrap();
    assert_eq!(&id.as_bytes()[..4], b"rent");
    assert!(id.as_bytes()[4..].iter().all(|b| *b == 0));
}

/// Test: A 32-byte label is refused
#[test]
fn test_label_too_long() {
    let label = "x".repeat(32);
    assert_eq!(
        ChequeId::from_label(&label),
        Err(ChequeIdError::LabelTooLong(32))
    );
}

/// Test: Hex display parses back
#[test]
fn test_id_display_parse() {
    let id = ChequeId::random();
    let parsed: ChequeId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
}

/// Test: Short hex is refused
#[test]
fn test_id_wrong_length() {
    assert_eq!(
        "0xabcd".parse::<ChequeId>(),
        Err(ChequeIdError::InvalidLength(2))
    );
}

// ============================================================================
// CANONICAL ENCODING
// ============================================================================

/// Test: Packed layout is id || payer || payee || amount(32) || from || thru || ledger
#[test]
fn test_canonical_layout() {
    let bytes = terms(0x0102).canonical_bytes();

    assert_eq!(bytes.len(), 32 + 20 + 20 + 32 + 4 + 4 + 20);
    assert_eq!(&bytes[..32], &[0xaa; 32]);
    assert_eq!(&bytes[32..52], &[0x11; 20]);
    assert_eq!(&bytes[52..72], &[0x22; 20]);
    assert!(bytes[72..102].iter().all(|b| *b == 0), "amount is left-padded");
    assert_eq!(&bytes[102..104], &[0x01, 0x02]);
    assert_eq!(&bytes[104..108], &[0x01, 0x02, 0x03, 0x04]);
    assert_eq!(&bytes[108..112], &[0x0a, 0x0b, 0x0c, 0x0d]);
    assert_eq!(&bytes[112..], &[0x33; 20]);
}

/// Test: Message hash and signing digest chain together
#[test]
fn test_digest_chain() {
    let t = terms(5);
    assert_eq!(t.message_hash(), keccak256(&t.canonical_bytes()));
    assert_eq!(t.signing_digest(), signed_message_digest(&t.message_hash()));
}

/// Test: Redemption hash, signed digest and signature match values computed
/// with solidityKeccak256 over the same fields
#[test]
fn test_redemption_hash_known_answer() {
    let payer = Keypair::from_hex(
        "0x0000000000000000000000000000000000000000000000000000000000000001",
    )
    .unwrap();
    let payee: Address = "0x2b5ad5c4795c026514f8317c7a215e218dccd6cf".parse().unwrap();
    let ledger: Address = "0x6813eb9362372eef6200f3b1dbc3f819671cba69".parse().unwrap();

    assert_eq!(
        payer.address().to_string(),
        "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
    );

    let signed = ChequeBuilder::new()
        .id(ChequeId::from_label("1").unwrap())
        .payer(&payer)
        .payee(payee)
        .amount(1_000_000_000_000_000_000)
        .valid_from(1_700_000_000)
        .valid_thru(1_800_000_000)
        .ledger(ledger)
        .build()
        .unwrap();
    let terms = signed.terms();

    assert_eq!(
        hex::encode(terms.message_hash()),
        "a0fe5807926b25588f215e91fcb9c439ef86a61a2202f47270572c226c29bfee"
    );
    assert_eq!(
        hex::encode(terms.signing_digest()),
        "9dc793e7cad664084c7f8e7fe865dbfa0aef5e18f564a740f3061a5897e916ae"
    );
    assert_eq!(
        hex::encode(signed.signature().to_bytes()),
        "69dfcee40b143f52e2891ba53a4ca4e32b7eef711f9ada4b22e011fa1ccfa85b\
         1d7701de3f910123c6b70b9e878f45ff426cb2d616889191c485ce5b9f4026b2\
         1c"
    );
    assert_eq!(
        Signer::recover(&terms.signing_digest(), signed.signature()).unwrap(),
        payer.address()
    );
}

/// Test: The amount feeds the hash
#[test]
fn test_amount_changes_hash() {
    assert_ne!(terms(5).message_hash(), terms(6).message_hash());
}

// ============================================================================
// STATUS STATE MACHINE
// ============================================================================

/// Test: Discriminants are stable
#[test]
fn test_status_discriminants() {
    assert_eq!(ChequeStatus::Unissued.as_u8(), 0);
    assert_eq!(ChequeStatus::Issued.as_u8(), 1);
    assert_eq!(ChequeStatus::Redeemed.as_u8(), 2);
    assert_eq!(ChequeStatus::Revoked.as_u8(), 3);
}

/// Test: Only forward edges exist
#[test]
fn test_transitions() {
    use ChequeStatus::*;
    let all = [Unissued, Issued, Redeemed, Revoked];
    let allowed = [(Unissued, Issued), (Issued, Redeemed), (Issued, Revoked)];

    for from in all {
        for to in all {
            assert_eq!(
                from.can_transition_to(to),
                allowed.contains(&(from, to)),
                "{} -> {}",
                from,
                to
            );
        }
    }
}

/// Test: Terminal states
#[test]
fn test_terminal() {
    assert!(ChequeStatus::Redeemed.is_terminal());
    assert!(ChequeStatus::Revoked.is_terminal());
    assert!(!ChequeStatus::Issued.is_terminal());
    assert!(!ChequeStatus::Unissued.is_terminal());
}
