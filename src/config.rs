// Ledger configuration

use crate::identity::Address;
use serde::{Deserialize, Serialize};

/// Protocol tag mixed into every sign-over assertion hash
pub const SIGN_OVER_MAGIC: u32 = 0xFFFF_DEAD;

/// Longest custody chain a counter byte can describe
pub const MAX_CHAIN_LEN: u8 = u8::MAX;

/// Settings fixed for the lifetime of one ledger instance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Identifier bound into every redemption authorization, so a signed
    /// cheque cannot be replayed against a different ledger
    pub instance: Address,
    /// Tag expected in sign-over assertions
    pub sign_over_magic: u32,
    /// Maximum number of notified sign-overs per cheque
    pub max_chain_len: u8,
}

impl LedgerConfig {
    pub fn new(instance: Address) -> Self {
        Self {
            instance,
            ..Self::default()
        }
    }

    pub fn with_sign_over_magic(mut self, magic: u32) -> Self {
        self.sign_over_magic = magic;
        self
    }

    pub fn with_max_chain_len(mut self, max: u8) -> Self {
        self.max_chain_len = max;
        self
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            instance: Address::ZERO,
            sign_over_magic: SIGN_OVER_MAGIC,
            max_chain_len: MAX_CHAIN_LEN,
        }
    }
}
