//! Groth16 key and proof decoding
//!
//! Proof Format (128 bytes, arkworks compressed):
//! - proof_a: 32 bytes (G1 point)
//! - proof_b: 64 bytes (G2 point)
//! - proof_c: 32 bytes (G1 point)
//!
//! Public Inputs (in allocation order):
//! - source_balance
//! - destination_balance
//! - new_destination_balance

use ark_bn254::Bn254;
use ark_groth16::{Proof, VerifyingKey};
use ark_serialize::CanonicalDeserialize;

use zkbalance_core::{SerializedProof, TransferCircuit};

use crate::error::VerifyError;

/// Groth16 proof size in bytes (compressed)
pub const PROOF_SIZE: usize = SerializedProof::SIZE;

/// Number of public inputs for the transfer circuit
pub const NUM_PUBLIC_INPUTS: usize = TransferCircuit::NUM_PUBLIC_INPUTS;

/// Compressed verifying key baked in at build time.
///
/// Set `ZKBALANCE_VERIFYING_KEY_HEX` when compiling to embed the key that
/// matches the deployed proving key.
pub const EMBEDDED_VERIFYING_KEY_HEX: Option<&str> = option_env!("ZKBALANCE_VERIFYING_KEY_HEX");

/// Decode a hex-encoded compressed verifying key for the transfer circuit
pub fn decode_verifying_key(vk_hex: &str) -> Result<VerifyingKey<Bn254>, VerifyError> {
    let bytes = hex::decode(vk_hex.trim())
        .map_err(|e| VerifyError::Configuration(format!("verifying key is not hex: {}", e)))?;

    let vk = VerifyingKey::<Bn254>::deserialize_compressed(bytes.as_slice())
        .map_err(|e| VerifyError::Configuration(format!("malformed verifying key: {}", e)))?;

    // One IC element for the constant plus one per public input
    if vk.gamma_abc_g1.len() != NUM_PUBLIC_INPUTS + 1 {
        return Err(VerifyError::Configuration(format!(
            "verifying key expects {} public inputs, transfer circuit has {}",
            vk.gamma_abc_g1.len().saturating_sub(1),
            NUM_PUBLIC_INPUTS
        )));
    }

    Ok(vk)
}

/// Decode a compressed proof, rejecting trailing bytes
pub fn decode_proof(bytes: &[u8]) -> Result<Proof<Bn254>, VerifyError> {
    let mut reader = bytes;
    let proof = Proof::<Bn254>::deserialize_compressed(&mut reader)
        .map_err(|e| VerifyError::ProofFormat(e.to_string()))?;

    if !reader.is_empty() {
        return Err(VerifyError::ProofFormat(format!(
            "{} trailing bytes after proof",
            reader.len()
        )));
    }

    Ok(proof)
}
