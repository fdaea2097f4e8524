// Vault module - what each identity holds and is owed
// Balances back cheques; pending withdrawals hold redeemed value until paid out

mod accounts;
mod rail;
mod withdrawals;

pub use accounts::*;
pub use rail::*;
pub use withdrawals::*;
