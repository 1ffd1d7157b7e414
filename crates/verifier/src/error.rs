//! Verification errors
//!
//! Malformed input, threshold rejections and cryptographic rejections are
//! distinct variants; `InvalidProof` carries no diagnostics.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Proof is not valid hex: {0}")]
    ProofEncoding(#[from] hex::FromHexError),

    #[error("Malformed proof: {0}")]
    ProofFormat(String),

    #[error("Disclosed balance {0:?} is not a decimal string")]
    BalanceParse(String),

    #[error("Disclosed balance is not below the field modulus")]
    BalanceOutOfField,

    #[error("Disclosed balance is below the required threshold of {threshold}")]
    BelowThreshold { threshold: u64 },

    #[error("Invalid proof")]
    InvalidProof,

    #[error("Verification backend error: {0}")]
    Backend(String),

    #[error("Verifier configuration error: {0}")]
    Configuration(String),
}
