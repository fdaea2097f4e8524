// Recording Rail Tests

use echeque::identity::Address;
use echeque::vault::{RecordingRail, ValueRail};

fn addr(b: u8) -> Address {
    Address::from_bytes([b; 20])
}

/// Test: Transfers are kept in order and totalled per recipient
#[test]
fn test_records_transfers() {
    let rail = RecordingRail::new();
    rail.transfer(&addr(1), 5).unwrap();
    rail.transfer(&addr(2), 7).unwrap();
    rail.transfer(&addr(1), 1).unwrap();

    let transfers = rail.transfers();
    assert_eq!(transfers.len(), 3);
    assert_eq!(transfers[1].recipient, addr(2));
    assert_eq!(rail.paid_to(&addr(1)), 6);
    assert_eq!(rail.paid_to(&addr(3)), 0);
}

/// Test: Refusing rail records nothing but counts the attempt
#[test]
fn test_refusing_rail() {
    let rail = RecordingRail::refusing();

    assert!(rail.transfer(&addr(1), 5).is_err());
    assert!(rail.transfers().is_empty());
    assert_eq!(rail.call_count(), 1);
}

/// Test: Usable as a trait object
#[test]
fn test_trait_object() {
    let rail = RecordingRail::new();
    let dyn_rail: &dyn ValueRail = &rail;
    dyn_rail.transfer(&addr(4), 2).unwrap();
    assert_eq!(rail.paid_to(&addr(4)), 2);
}
