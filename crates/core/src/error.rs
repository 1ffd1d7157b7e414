//! Unified Error Types for zkbalance
//!
//! This module provides the error hierarchy shared by the circuit, the
//! batched-sum engine and the proof system.

use ark_relations::r1cs::SynthesisError;
use thiserror::Error;
use tracing::error;

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZkBalanceError {
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for zkbalance operations
pub type ZkBalanceResult<T> = Result<T, ZkBalanceError>;

/// Errors from hint evaluation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HintError {
    #[error("Hint arity mismatch: expected {expected_inputs} inputs and {expected_outputs} outputs, got {inputs} and {outputs}")]
    Arity {
        expected_inputs: usize,
        expected_outputs: usize,
        inputs: usize,
        outputs: usize,
    },
}

/// Errors from the batched-sum engine (native and in-circuit)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SumcheckError {
    #[error("Sequence length mismatch: left={left}, right={right}, output={output}")]
    LengthMismatch {
        left: usize,
        right: usize,
        output: usize,
    },

    #[error("Sequence length {0} is not a power of two")]
    NotPowerOfTwo(usize),

    #[error("Cannot build a batched-sum proof over an empty domain")]
    EmptyDomain,

    #[error("Expected {expected} sumcheck rounds, got {got}")]
    RoundCount { expected: usize, got: usize },

    #[error("Round {0} polynomial does not sum to the running claim")]
    RoundSum(usize),

    #[error("Final sumcheck claim does not match the input evaluations")]
    FinalClaim,
}

/// Errors from the batched addition gadget
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Invalid batch log capacity {got} (maximum {max})")]
    InvalidLogCapacity { got: usize, max: usize },

    #[error("Batch capacity {capacity} exceeded")]
    CapacityExceeded { capacity: usize },

    #[error("Batch discharged with no recorded additions")]
    EmptyBatch,

    #[error("Batched-sum engine error: {0}")]
    Sumcheck(#[from] SumcheckError),

    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),
}

impl From<BatchError> for SynthesisError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::Synthesis(e) => e,
            other => {
                error!(error = %other, "batched addition gadget failed");
                SynthesisError::Unsatisfiable
            }
        }
    }
}

/// Errors from proof operations
#[derive(Error, Debug)]
pub enum ProofError {
    #[error("Missing assignment: {0}")]
    MissingAssignment(&'static str),

    #[error("Circuit constraint not satisfied: {0}")]
    ConstraintNotSatisfied(String),

    #[error("Proof generation failed: {0}")]
    GenerationFailed(String),

    #[error("Proof verification failed: {0}")]
    VerificationFailed(String),

    #[error("Invalid proving key")]
    InvalidProvingKey,

    #[error("Invalid verifying key")]
    InvalidVerifyingKey,

    #[error("Setup failed: {0}")]
    SetupFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Failed to load key from {path}: {source}")]
    KeyLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Input validation utilities
pub mod validation {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::{BigInteger, PrimeField};
    use num_bigint::{BigInt, BigUint};

    /// Parse a base-10 integer with an optional leading `+` or `-`.
    /// Only ASCII digits are accepted after the sign.
    pub fn parse_decimal(value: &str) -> ZkBalanceResult<BigInt> {
        let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ZkBalanceError::InvalidInput(format!(
                "{:?} is not a decimal string",
                value
            )));
        }

        BigInt::parse_bytes(value.as_bytes(), 10).ok_or_else(|| {
            ZkBalanceError::InvalidInput(format!("{:?} is not a decimal string", value))
        })
    }

    /// The BN254 scalar field modulus as an arbitrary-precision integer
    pub fn field_modulus() -> BigUint {
        BigUint::from_bytes_le(&Fr::MODULUS.to_bytes_le())
    }

    /// Convert an integer to a field element, rejecting values `>= p`
    pub fn canonical_field_element(value: &BigUint) -> Option<Fr> {
        if *value >= field_modulus() {
            return None;
        }
        Some(Fr::from_le_bytes_mod_order(&value.to_bytes_le()))
    }

    /// Validate a serialized proof size
    pub fn validate_proof_size(proof: &[u8], expected: usize) -> Result<(), ProofError> {
        if proof.len() != expected {
            return Err(ProofError::SerializationError(format!(
                "Invalid proof size: {} bytes (expected {})",
                proof.len(),
                expected
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use num_bigint::{BigInt, BigUint};
    use validation::*;

    const BN254_MODULUS: &str =
        "21888242871839275222246405745257275088548364400416034343698204186575808495617";

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("500").unwrap(), BigInt::from(500));
        assert_eq!(parse_decimal("000123").unwrap(), BigInt::from(123));
        assert_eq!(parse_decimal("+100000").unwrap(), BigInt::from(100_000));
        assert_eq!(parse_decimal("-5").unwrap(), BigInt::from(-5));

        assert!(parse_decimal("").is_err());
        assert!(parse_decimal("+").is_err());
        assert!(parse_decimal("--5").is_err());
        assert!(parse_decimal("+-5").is_err());
        assert!(parse_decimal("12a").is_err());
        assert!(parse_decimal("1_000").is_err());
        assert!(parse_decimal(" 7").is_err());
    }

    #[test]
    fn test_field_modulus_matches_bn254() {
        assert_eq!(field_modulus().to_string(), BN254_MODULUS);
    }

    #[test]
    fn test_canonical_field_element() {
        let modulus = field_modulus();
        let max = modulus.clone() - 1u32;

        assert_eq!(canonical_field_element(&BigUint::from(7u64)), Some(Fr::from(7u64)));
        assert_eq!(canonical_field_element(&max), Some(-Fr::from(1u64)));
        assert!(canonical_field_element(&modulus).is_none());
        assert!(canonical_field_element(&(modulus + 1u32)).is_none());
    }

    #[test]
    fn test_validate_proof_size() {
        assert!(validate_proof_size(&[0u8; 128], 128).is_ok());
        assert!(validate_proof_size(&[0u8; 127], 128).is_err());
        assert!(validate_proof_size(&[0u8; 256], 128).is_err());
    }

    #[test]
    fn test_batch_error_maps_to_unsatisfiable() {
        let err: SynthesisError = BatchError::EmptyBatch.into();
        assert_eq!(err, SynthesisError::Unsatisfiable);

        let err: SynthesisError = BatchError::Synthesis(SynthesisError::AssignmentMissing).into();
        assert_eq!(err, SynthesisError::AssignmentMissing);
    }
}
