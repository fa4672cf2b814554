//! tokengen - Generate a connection token and detached signature.
//!
//! Prints a `{token, signature}` JSON object for the given identity,
//! signed with a PEM RSA private key. The output can be pasted into a
//! gateway test invocation or passed to `wssclient`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use mqgate_client::TokenFactory;

/// Generate a connection token and detached signature.
#[derive(Parser, Debug)]
#[command(name = "tokengen")]
#[command(about = "Generate a connection token and detached signature")]
struct Args {
    /// Identity to embed as the token subject
    #[arg(long)]
    id: String,

    /// Path to the PEM RSA private key
    #[arg(long)]
    key_path: PathBuf,

    /// Token lifetime in seconds
    #[arg(long, default_value_t = 3600)]
    ttl: i64,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    if args.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .init();
    }

    let pem = std::fs::read(&args.key_path)
        .with_context(|| format!("reading key {}", args.key_path.display()))?;
    let factory = TokenFactory::from_rsa_pem(&pem)?;
    let signed = factory.issue_with_expiry(&args.id, Utc::now().timestamp() + args.ttl)?;

    println!("{}", serde_json::to_string_pretty(&signed)?);
    Ok(())
}
