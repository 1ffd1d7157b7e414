//! zkbalance - Transfer Core
//!
//! Confidential balance transfers proven with Groth16 over BN254, with the
//! transfer's additions checked through an in-circuit batched sumcheck.
//!
//! # Modules
//! - `crypto`: Native Poseidon permutation and Fiat–Shamir transcript
//! - `sumcheck`: Native prover and verifier of the batched-sum argument
//! - `proof`: Circuit gadgets, the transfer circuit and the Groth16 proof system
//! - `config`: Prover configuration
//! - `logging`: Tracing subscriber setup

pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod proof;
pub mod sumcheck;

// Re-export common types
pub use config::ProverConfig;
pub use error::{
    BatchError, ConfigError, HintError, ProofError, SumcheckError, ZkBalanceError,
    ZkBalanceResult,
};
pub use proof::gadgets::{BatchAddGadget, MAX_LOG_CAPACITY};
pub use proof::{
    SerializedProof, TransferCircuit, TransferProofSystem, DESTINATION_BALANCE, SOURCE_BALANCE,
};
pub use sumcheck::{prove_batch_sum, verify_batch_sum, BatchSumProof};
