// CLI - command-line argument structure for the `echeque` binary
//
// Every command works offline: keys, authorizations and sign-overs are made
// and checked here, then handed to a ledger by whatever transport carries them.

use clap::{Parser, Subcommand, ValueEnum};

/// Offline tooling for echeque keys, authorizations and sign-overs
#[derive(Parser, Debug)]
#[command(name = "echeque", version, propagate_version = true)]
pub struct EchequeCli {
    /// Log format: pretty or compact
    #[arg(long, global = true, env = "ECHEQUE_LOG_FORMAT", default_value = "compact")]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new secp256k1 keypair
    Keygen,
    /// Print the address of a secret key
    Address(SecretArgs),
    /// Sign a cheque redemption authorization as the payer
    SignCheque(SignChequeArgs),
    /// Sign a cheque over to a new payee as its current holder
    SignOver(SignOverArgs),
    /// Decode a signed cheque and check the payer's signature
    VerifyCheque(VerifyArgs),
    /// Decode a signed sign-over and check the signer
    VerifySignOver(VerifyArgs),
}

#[derive(Parser, Debug)]
pub struct SecretArgs {
    /// Hex-encoded 32-byte secret key
    #[arg(long, env = "ECHEQUE_SECRET", hide_env_values = true)]
    pub secret: String,
}

#[derive(Parser, Debug)]
pub struct SignChequeArgs {
    #[command(flatten)]
    pub key: SecretArgs,

    /// Cheque id: 0x-prefixed 32-byte hex, or a short label. Random if omitted.
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub payee: String,

    /// Amount in base units
    #[arg(long)]
    pub amount: u128,

    /// Earliest redemption time in unix seconds, 0 for none
    #[arg(long, default_value_t = 0)]
    pub valid_from: u32,

    /// Latest redemption time in unix seconds, 0 for none
    #[arg(long, default_value_t = 0)]
    pub valid_thru: u32,

    /// Address of the ledger instance the cheque is drawn on
    #[arg(long, env = "ECHEQUE_LEDGER")]
    pub ledger: String,

    #[arg(long, value_enum, default_value_t = Encoding::Hex)]
    pub encoding: Encoding,
}

#[derive(Parser, Debug)]
pub struct SignOverArgs {
    #[command(flatten)]
    pub key: SecretArgs,

    /// Cheque id: 0x-prefixed 32-byte hex, or a short label
    #[arg(long)]
    pub cheque: String,

    /// Position of this sign-over in the chain, starting at 1
    #[arg(long, default_value_t = 1)]
    pub counter: u8,

    /// New payee
    #[arg(long)]
    pub to: String,

    #[arg(long, value_enum, default_value_t = Encoding::Hex)]
    pub encoding: Encoding,
}

#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Encoded message as printed by the signing commands
    pub encoded: String,

    #[arg(long, value_enum, default_value_t = Encoding::Hex)]
    pub encoding: Encoding,
}

/// Text encoding for signed messages
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Encoding {
    Hex,
    Base64,
}
