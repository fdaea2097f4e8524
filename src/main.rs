// echeque - command-line entry point

mod cli;

use clap::Parser;
use cli::{Commands, EchequeCli, Encoding, SignChequeArgs, SignOverArgs, VerifyArgs};
use echeque::cheque::{ChequeBuildError, ChequeBuilder, ChequeId, ChequeIdError, SignedCheque};
use echeque::codec::{CodecError, WireCodec};
use echeque::identity::{Address, AddressError, Keypair, KeypairError};
use echeque::logging::{init_logging, LogFormat};
use echeque::signover::{SignOverBuildError, SignOverBuilder, SignedSignOver};
use echeque::verifier::VerifyError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::process::ExitCode;
use thiserror::Error;

#[derive(Error, Debug)]
enum CliError {
    #[error("Invalid secret key: {0}")]
    Key(#[from] KeypairError),

    #[error("Invalid address: {0}")]
    Address(#[from] AddressError),

    #[error("Invalid cheque id: {0}")]
    ChequeId(#[from] ChequeIdError),

    #[error("Cannot build cheque: {0}")]
    Cheque(#[from] ChequeBuildError),

    #[error("Cannot build sign-over: {0}")]
    SignOver(#[from] SignOverBuildError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Verification failed: {0}")]
    Verify(#[from] VerifyError),
}

fn main() -> ExitCode {
    let cli = EchequeCli::parse();

    if let Err(e) = init_logging("echeque=info", LogFormat::from_str_lossy(&cli.log_format)) {
        eprintln!("logging disabled: {}", e);
    }

    let result = match cli.command {
        Commands::Keygen => {
            keygen();
            Ok(())
        }
        Commands::Address(args) => Keypair::from_hex(&args.secret)
            .map(|k| println!("{}", k.address()))
            .map_err(CliError::from),
        Commands::SignCheque(args) => sign_cheque(args),
        Commands::SignOver(args) => sign_over(args),
        Commands::VerifyCheque(args) => verify_cheque(args),
        Commands::VerifySignOver(args) => verify_sign_over(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn keygen() {
    let keypair = Keypair::generate();
    println!("secret:  {}", hex::encode(keypair.to_bytes()));
    println!("address: {}", keypair.address());
}

fn sign_cheque(args: SignChequeArgs) -> Result<(), CliError> {
    let payer = Keypair::from_hex(&args.key.secret)?;
    let payee: Address = args.payee.parse()?;
    let ledger: Address = args.ledger.parse()?;

    let mut builder = ChequeBuilder::new()
        .payer(&payer)
        .payee(payee)
        .amount(args.amount)
        .valid_from(args.valid_from)
        .valid_thru(args.valid_thru)
        .ledger(ledger);
    if let Some(id) = args.id.as_deref() {
        builder = builder.id(parse_cheque_id(id)?);
    }
    let signed = builder.build()?;

    tracing::info!(cheque = %signed.terms().id(), payer = %payer.address(), "cheque signed");
    println!("{}", encode(&signed, args.encoding)?);
    Ok(())
}

fn sign_over(args: SignOverArgs) -> Result<(), CliError> {
    let holder = Keypair::from_hex(&args.key.secret)?;
    let to: Address = args.to.parse()?;

    let signed = SignOverBuilder::new()
        .cheque(parse_cheque_id(&args.cheque)?)
        .counter(args.counter)
        .from(&holder)
        .to(to)
        .build()?;

    tracing::info!(cheque = %args.cheque, counter = args.counter, %to, "sign-over signed");
    println!("{}", encode(&signed, args.encoding)?);
    Ok(())
}

fn verify_cheque(args: VerifyArgs) -> Result<(), CliError> {
    let signed: SignedCheque = decode(&args.encoded, args.encoding)?;
    signed.verify()?;

    let terms = signed.terms();
    println!("cheque:     {}", terms.id());
    println!("payer:      {} (signature ok)", terms.payer());
    println!("payee:      {}", terms.payee());
    println!("amount:     {}", terms.amount());
    println!("valid:      {}..{}", terms.valid_from(), terms.valid_thru());
    println!("ledger:     {}", terms.ledger());
    Ok(())
}

fn verify_sign_over(args: VerifyArgs) -> Result<(), CliError> {
    let signed: SignedSignOver = decode(&args.encoded, args.encoding)?;
    signed.verify()?;

    let assertion = signed.assertion();
    println!("cheque:     {}", assertion.cheque_id());
    println!("counter:    {}", assertion.counter());
    println!("from:       {} (signature ok)", assertion.from());
    println!("to:         {}", assertion.to());
    Ok(())
}

/// 0x-prefixed hex is a full id; anything else is a label
fn parse_cheque_id(s: &str) -> Result<ChequeId, ChequeIdError> {
    if s.starts_with("0x") {
        s.parse()
    } else {
        ChequeId::from_label(s)
    }
}

fn encode<T: Serialize>(value: &T, encoding: Encoding) -> Result<String, CodecError> {
    match encoding {
        Encoding::Hex => WireCodec::encode_hex(value),
        Encoding::Base64 => WireCodec::encode_base64(value),
    }
}

fn decode<T: DeserializeOwned>(text: &str, encoding: Encoding) -> Result<T, CodecError> {
    match encoding {
        Encoding::Hex => WireCodec::decode_hex(text.trim()),
        Encoding::Base64 => WireCodec::decode_base64(text.trim()),
    }
}
