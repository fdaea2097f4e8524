// Identity module - secp256k1 keypairs, account addresses, recoverable signatures

mod address;
mod keypair;
mod signer;

pub use address::*;
pub use keypair::*;
pub use signer::*;
