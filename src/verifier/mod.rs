// Verifier module - canonical message hashing and signer authentication
// Shared by redemption authorizations and sign-over assertions

mod digest;
mod verify;

pub use digest::*;
pub use verify::*;
