// Ledger module - the service instance
// Owns the registry, the sign-over tracker and the vault, plus the clock and the value rail

mod clock;
mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use service::{ChequeLedger, LedgerSnapshot, Redemption};
