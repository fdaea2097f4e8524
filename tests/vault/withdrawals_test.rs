// Pending Withdrawal Tests
// Paying redeemed value out of a payee's bucket

use echeque::identity::Address;
use echeque::vault::{PendingWithdrawals, RecordingRail};
use echeque::LedgerError;

fn addr(b: u8) -> Address {
    Address::from_bytes([b; 20])
}

/// Test: Nothing owed before any redemption
#[test]
fn test_withdraw_before_redeem() {
    let pending = PendingWithdrawals::new();
    let rail = RecordingRail::new();

    assert_eq!(pending.owed_to(&addr(2)), 0);
    assert_eq!(
        pending.pay_out(addr(2), 1, addr(2), &rail),
        Err(LedgerError::InsufficientPending {
            available: 0,
            required: 1
        })
    );
    assert_eq!(rail.call_count(), 0);
}

/// Test: Zero pay-out
#[test]
fn test_zero_pay_out() {
    let pending = PendingWithdrawals::new();
    let rail = RecordingRail::new();
    assert_eq!(
        pending.pay_out(addr(2), 0, addr(2), &rail),
        Err(LedgerError::ZeroAmount)
    );
}

/// Test: Underfunded pay-out never reaches the rail
#[test]
fn test_underfunded_skips_rail() {
    let pending = PendingWithdrawals::new();
    let rail = RecordingRail::refusing();

    assert!(matches!(
        pending.pay_out(addr(2), 1, addr(3), &rail),
        Err(LedgerError::InsufficientPending { .. })
    ));
    assert_eq!(rail.call_count(), 0);
}
