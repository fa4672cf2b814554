//! Client-side token construction for the mqgate authorizers.
//!
//! Builds the two-segment bearer token and detached signature a client
//! presents when connecting through the gateway's token authorizer.
//!
//! # Example
//!
//! ```no_run
//! use mqgate_client::TokenFactory;
//!
//! let pem = std::fs::read("private-key.pem")?;
//! let factory = TokenFactory::from_rsa_pem(&pem)?;
//! let signed = factory.issue("device-001")?;
//! println!("token: {}", signed.token);
//! println!("signature: {}", signed.signature);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod token;

pub use error::{Error, Result};
pub use token::{signature_to_standard, Claims, SignedToken, TokenFactory, DEFAULT_TTL_SECS};
