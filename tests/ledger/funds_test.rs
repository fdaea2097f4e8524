// Ledger Funds Tests
// Deposits, withdrawals and pending pay-outs through the service

use crate::fixture::{World, UNIT};
use echeque::identity::Keypair;
use echeque::vault::Transfer;
use echeque::{ErrorKind, LedgerError};

/// Test: Deposit then withdraw to self
#[test]
fn test_deposit_withdraw() {
    let world = World::new();
    let who = world.payer_addr();

    assert_eq!(world.ledger.deposit(&who, 3 * UNIT), Ok(3 * UNIT));
    assert_eq!(world.ledger.withdraw(&who, UNIT), Ok(2 * UNIT));
    assert_eq!(world.ledger.balance_of(&who), 2 * UNIT);
    assert_eq!(world.rail.paid_to(&who), UNIT);
}

/// Test: Zero deposit
#[test]
fn test_zero_deposit() {
    let world = World::new();
    assert_eq!(
        world.ledger.deposit(&world.payer_addr(), 0),
        Err(LedgerError::ZeroAmount)
    );
}

/// Test: Withdraw above balance
#[test]
fn test_withdraw_above_balance() {
    let world = World::funded(UNIT);
    let err = world
        .ledger
        .withdraw(&world.payer_addr(), 2 * UNIT)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
}

/// Test: Rail refusal during withdraw
#[test]
fn test_withdraw_rail_refusal() {
    let world = World::funded(UNIT);
    world.rail.set_refusing(true);

    assert!(matches!(
        world.ledger.withdraw(&world.payer_addr(), UNIT),
        Err(LedgerError::RailFailure(_))
    ));
    assert_eq!(world.ledger.balance_of(&world.payer_addr()), UNIT);
}

/// Test: Pending funds cannot be withdrawn before redemption
#[test]
fn test_withdraw_to_before_redeem() {
    let world = World::funded(UNIT);
    world.cheque("w", UNIT);

    let err = world
        .ledger
        .withdraw_to(&world.payee_addr(), UNIT, world.payee_addr())
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientPending {
            available: 0,
            required: UNIT
        }
    );
}

/// Test: Payee pays a third party out of its own bucket
#[test]
fn test_withdraw_to_third_party() {
    let world = World::funded(UNIT);
    let signed = world.cheque("w", UNIT);
    world.ledger.redeem(&signed).unwrap();
    let merchant = Keypair::generate().address();

    let remaining = world
        .ledger
        .withdraw_to(&world.payee_addr(), UNIT / 4, merchant)
        .unwrap();

    assert_eq!(remaining, UNIT - UNIT / 4);
    assert_eq!(world.ledger.pending_withdrawal_of(&merchant), 0);
    assert_eq!(
        world.rail.transfers(),
        vec![Transfer {
            recipient: merchant,
            amount: UNIT / 4
        }]
    );
}

/// Test: Someone else cannot drain the payee's bucket
#[test]
fn test_withdraw_to_debits_caller_only() {
    let world = World::funded(UNIT);
    let signed = world.cheque("w", UNIT);
    world.ledger.redeem(&signed).unwrap();
    let thief = Keypair::generate().address();

    assert!(matches!(
        world.ledger.withdraw_to(&thief, UNIT, thief),
        Err(LedgerError::InsufficientPending { .. })
    ));
    assert_eq!(world.ledger.pending_withdrawal_of(&world.payee_addr()), UNIT);
}

/// Test: Rail refusal leaves the pending bucket intact
#[test]
fn test_withdraw_to_rail_refusal() {
    let world = World::funded(UNIT);
    let signed = world.cheque("w", UNIT);
    world.ledger.redeem(&signed).unwrap();
    world.rail.set_refusing(true);

    assert!(matches!(
        world
            .ledger
            .withdraw_to(&world.payee_addr(), UNIT, world.payee_addr()),
        Err(LedgerError::RailFailure(_))
    ));
    assert_eq!(world.ledger.pending_withdrawal_of(&world.payee_addr()), UNIT);
}
