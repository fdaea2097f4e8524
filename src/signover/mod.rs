// Sign-over module - custody transfers of a cheque between payees
// Assertions are signed off the ledger, notified to it independently of
// redemption, and replayed in full at redemption time.

mod builder;
mod model;
mod tracker;

pub use builder::*;
pub use model::*;
pub use tracker::*;
