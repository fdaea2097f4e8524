// Redemption Tests
// Authorization checks, funds and single use

use crate::fixture::{id, World, UNIT};
use echeque::cheque::{ChequeBuilder, ChequeStatus};
use echeque::identity::Keypair;
use echeque::{ErrorKind, LedgerError};

// ============================================================================
// SINGLE USE
// ============================================================================

/// Test: A redeemed cheque cannot be redeemed again
#[test]
fn test_double_redeem() {
    let world = World::funded(10 * UNIT);
    let signed = world.cheque("r", UNIT);

    world.ledger.redeem(&signed).unwrap();
    let err = world.ledger.redeem(&signed).unwrap_err();

    assert_eq!(err, LedgerError::AlreadyRedeemed(id("r")));
    assert_eq!(err.kind(), ErrorKind::StateConflict);
    assert_eq!(world.ledger.balance_of(&world.payer_addr()), 9 * UNIT);
}

/// Test: A revoked cheque cannot be redeemed
#[test]
fn test_redeem_revoked() {
    let world = World::funded(10 * UNIT);
    let signed = world.cheque("r", UNIT);
    world.ledger.revoke(&world.payer_addr(), id("r")).unwrap();

    assert_eq!(
        world.ledger.redeem(&signed),
        Err(LedgerError::AlreadyRevoked(id("r")))
    );
}

/// Test: Authorizations for unissued ids are not found
#[test]
fn test_redeem_unissued() {
    let world = World::funded(10 * UNIT);
    let signed = ChequeBuilder::new()
        .id(id("ghost"))
        .payer(&world.payer)
        .payee(world.payee_addr())
        .amount(UNIT)
        .ledger(world.ledger.instance())
        .build()
        .unwrap();

    let err = world.ledger.redeem(&signed).unwrap_err();
    assert_eq!(err, LedgerError::NotFound(id("ghost")));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ============================================================================
// AUTHORIZATION
// ============================================================================

/// Test: Terms signed by someone other than the payer
#[test]
fn test_redeem_signed_by_impostor() {
    let world = World::funded(10 * UNIT);
    let cheque = world.issue("r", UNIT, 0, 0);
    let impostor = Keypair::generate();

    let forged = ChequeBuilder::new()
        .id(cheque.id())
        .payer(&impostor)
        .payee(cheque.payee())
        .amount(cheque.amount())
        .ledger(world.ledger.instance())
        .build()
        .unwrap();

    // The impostor's terms name the impostor as payer, so they differ
    assert!(matches!(
        world.ledger.redeem(&forged),
        Err(LedgerError::InvalidCheque(_))
    ));
}

/// Test: Correct terms with a signature from the wrong key
#[test]
fn test_redeem_with_foreign_signature() {
    let world = World::funded(10 * UNIT);
    let cheque = world.issue("r", UNIT, 0, 0);
    let honest = world.authorize(&cheque);

    let impostor = Keypair::generate();
    let other = ChequeBuilder::new()
        .payer(&impostor)
        .payee(cheque.payee())
        .amount(1)
        .ledger(world.ledger.instance())
        .build()
        .unwrap();
    let spliced =
        echeque::cheque::SignedCheque::from_parts(honest.terms().clone(), *other.signature());

    let err = world.ledger.redeem(&spliced).unwrap_err();
    assert_eq!(
        err,
        LedgerError::BadSignature {
            expected: world.payer_addr()
        }
    );
    assert_eq!(err.kind(), ErrorKind::Authorization);
}

/// Test: Authorization bound to another ledger instance
#[test]
fn test_redeem_other_instance() {
    let world = World::funded(10 * UNIT);
    let cheque = world.issue("r", UNIT, 0, 0);
    let signed = ChequeBuilder::new()
        .id(cheque.id())
        .payer(&world.payer)
        .payee(cheque.payee())
        .amount(cheque.amount())
        .ledger(Keypair::generate().address())
        .build()
        .unwrap();

    assert!(matches!(
        world.ledger.redeem(&signed),
        Err(LedgerError::InvalidCheque(_))
    ));
}

// ============================================================================
// FUNDS
// ============================================================================

/// Test: Cheques may be issued unfunded but not redeemed unfunded
#[test]
fn test_redeem_underfunded() {
    let world = World::new();
    let signed = world.cheque("r", 5 * UNIT);
    world.ledger.deposit(&world.payer_addr(), 4 * UNIT).unwrap();

    let err = world.ledger.redeem(&signed).unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientFunds {
            available: 4 * UNIT,
            required: 5 * UNIT
        }
    );
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    assert_eq!(world.ledger.cheque_status(&id("r")), ChequeStatus::Issued);
    assert_eq!(world.ledger.balance_of(&world.payer_addr()), 4 * UNIT);
    assert_eq!(world.ledger.pending_withdrawal_of(&world.payee_addr()), 0);

    world.ledger.deposit(&world.payer_addr(), UNIT).unwrap();
    assert!(world.ledger.redeem(&signed).is_ok());
    assert_eq!(world.ledger.balance_of(&world.payer_addr()), 0);
}

/// Test: Several cheques drawn on one balance
#[test]
fn test_cheques_share_payer_balance() {
    let world = World::funded(3 * UNIT);
    let first = world.cheque("one", 2 * UNIT);
    let second = world.cheque("two", 2 * UNIT);

    world.ledger.redeem(&first).unwrap();
    assert!(matches!(
        world.ledger.redeem(&second),
        Err(LedgerError::InsufficientFunds { .. })
    ));
    assert_eq!(world.ledger.pending_withdrawal_of(&world.payee_addr()), 2 * UNIT);
}
