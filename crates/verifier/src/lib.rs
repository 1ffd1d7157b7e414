//! zkbalance - Verification Service
//!
//! Server-side acceptance of confidential transfer proofs: a client submits a
//! Groth16 proof together with the destination balance it wants to disclose,
//! and the verifier accepts only proofs for balances at or above a configured
//! threshold.
//!
//! # Modules
//! - `groth16`: Verifying key and proof decoding
//! - `verification`: `TransferVerifier`
//! - `config`: Verifier configuration

pub mod config;
pub mod error;
pub mod groth16;
pub mod verification;

pub use config::{VerifierConfig, DEFAULT_MIN_DISCLOSED_BALANCE};
pub use error::VerifyError;
pub use verification::TransferVerifier;
