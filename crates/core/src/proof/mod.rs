//! zkSNARK proof generation and verification
//!
//! This module implements Groth16 proof generation and verification for
//! confidential balance transfers.
//!
//! Components:
//! - `gadgets`: R1CS constraint gadgets (Poseidon, transcript, hints, batched addition)
//! - `transfer_circuit`: The transfer relation
//! - Proof generation and verification using ark-groth16

pub mod gadgets;
pub mod transfer_circuit;

use std::fs;

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, PreparedVerifyingKey, Proof, ProvingKey, VerifyingKey};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::{CryptoRng, RngCore};
use rand::rngs::OsRng;
use tracing::{debug, info, warn};

use crate::config::ProverConfig;
use crate::error::{validation::validate_proof_size, ProofError};

pub use transfer_circuit::{TransferCircuit, DESTINATION_BALANCE, SOURCE_BALANCE};

/// Serialized Groth16 proof (128 bytes)
/// Format: A (32) || B (64) || C (32), compressed points
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializedProof {
    pub bytes: Vec<u8>,
}

impl SerializedProof {
    /// Expected size of a compressed Groth16 proof over BN254
    pub const SIZE: usize = 128;

    /// Create from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ProofError> {
        validate_proof_size(&bytes, Self::SIZE)?;
        Ok(Self { bytes })
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    pub fn from_hex(proof_hex: &str) -> Result<Self, ProofError> {
        let bytes =
            hex::decode(proof_hex).map_err(|e| ProofError::SerializationError(e.to_string()))?;
        Self::from_bytes(bytes)
    }
}

/// Groth16 proof system for the transfer circuit
pub struct TransferProofSystem {
    proving_key: ProvingKey<Bn254>,
    verifying_key: VerifyingKey<Bn254>,
    prepared_vk: PreparedVerifyingKey<Bn254>,
    batch_log_capacity: usize,
}

impl TransferProofSystem {
    /// Generate proving and verifying keys for the transfer circuit
    ///
    /// WARNING: This uses a random toxic waste and is suitable only for testing.
    /// Production keys are generated elsewhere and loaded with `from_config`.
    pub fn setup(batch_log_capacity: usize) -> Result<Self, ProofError> {
        Self::setup_with_rng(batch_log_capacity, &mut OsRng)
    }

    /// `setup` with a caller-provided RNG
    #[tracing::instrument(skip_all, name = "TransferProofSystem::setup")]
    pub fn setup_with_rng<R: RngCore + CryptoRng>(
        batch_log_capacity: usize,
        rng: &mut R,
    ) -> Result<Self, ProofError> {
        // Shape-only circuit for setup
        let circuit = TransferCircuit::default().with_batch_log_capacity(batch_log_capacity);

        let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(circuit, rng)
            .map_err(|e| ProofError::SetupFailed(e.to_string()))?;

        let prepared_vk =
            Groth16::<Bn254>::process_vk(&vk).map_err(|e| ProofError::SetupFailed(e.to_string()))?;

        info!(batch_log_capacity, "generated testing keys");
        Ok(Self {
            proving_key: pk,
            verifying_key: vk,
            prepared_vk,
            batch_log_capacity,
        })
    }

    /// Load from a serialized proving key; the verifying key is embedded in it
    pub fn from_proving_key_bytes(
        pk_bytes: &[u8],
        batch_log_capacity: usize,
    ) -> Result<Self, ProofError> {
        let proving_key = ProvingKey::<Bn254>::deserialize_compressed(pk_bytes)
            .map_err(|_| ProofError::InvalidProvingKey)?;

        let verifying_key = proving_key.vk.clone();
        let prepared_vk = Groth16::<Bn254>::process_vk(&verifying_key)
            .map_err(|_| ProofError::InvalidVerifyingKey)?;

        Ok(Self {
            proving_key,
            verifying_key,
            prepared_vk,
            batch_log_capacity,
        })
    }

    /// Load the proving key named by the configuration
    pub fn from_config(config: &ProverConfig) -> Result<Self, ProofError> {
        let path = &config.proving_key_path;
        let pk_bytes = fs::read(path).map_err(|source| ProofError::KeyLoad {
            path: path.display().to_string(),
            source,
        })?;

        debug!(path = %path.display(), bytes = pk_bytes.len(), "loaded proving key");
        Self::from_proving_key_bytes(&pk_bytes, config.batch_log_capacity)
    }

    /// Serialize the proving key
    pub fn serialize_proving_key(&self) -> Result<Vec<u8>, ProofError> {
        let mut bytes = Vec::new();
        self.proving_key
            .serialize_compressed(&mut bytes)
            .map_err(|e| ProofError::SerializationError(e.to_string()))?;
        Ok(bytes)
    }

    /// Serialize the verifying key
    pub fn serialize_verifying_key(&self) -> Result<Vec<u8>, ProofError> {
        let mut bytes = Vec::new();
        self.verifying_key
            .serialize_compressed(&mut bytes)
            .map_err(|e| ProofError::SerializationError(e.to_string()))?;
        Ok(bytes)
    }

    /// Get the verifying key
    pub fn verifying_key(&self) -> &VerifyingKey<Bn254> {
        &self.verifying_key
    }

    pub fn batch_log_capacity(&self) -> usize {
        self.batch_log_capacity
    }

    /// Generate a proof for a transfer circuit
    pub fn prove(&self, circuit: TransferCircuit) -> Result<SerializedProof, ProofError> {
        self.prove_with_rng(circuit, &mut OsRng)
    }

    /// Generate a proof, refusing witnesses that do not satisfy the circuit
    #[tracing::instrument(skip_all, name = "TransferProofSystem::prove")]
    pub fn prove_with_rng<R: RngCore + CryptoRng>(
        &self,
        circuit: TransferCircuit,
        rng: &mut R,
    ) -> Result<SerializedProof, ProofError> {
        let circuit = circuit.with_batch_log_capacity(self.batch_log_capacity);
        check_satisfied(&circuit)?;

        let proof = Groth16::<Bn254>::prove(&self.proving_key, circuit, rng)
            .map_err(|e| ProofError::GenerationFailed(e.to_string()))?;

        // Serialize the proof
        let mut bytes = Vec::with_capacity(SerializedProof::SIZE);
        proof
            .serialize_compressed(&mut bytes)
            .map_err(|e| ProofError::SerializationError(e.to_string()))?;

        SerializedProof::from_bytes(bytes)
    }

    /// Prove a transfer of `transfer` from `source_balance` to `destination_balance`
    pub fn prove_transfer(
        &self,
        source_balance: Fr,
        destination_balance: Fr,
        transfer: Fr,
    ) -> Result<SerializedProof, ProofError> {
        self.prove(TransferCircuit::for_transfer(
            source_balance,
            destination_balance,
            transfer,
        ))
    }

    /// Verify a proof with public inputs
    #[tracing::instrument(skip_all, name = "TransferProofSystem::verify")]
    pub fn verify(&self, proof_bytes: &[u8], public_inputs: &[Fr]) -> Result<bool, ProofError> {
        validate_proof_size(proof_bytes, SerializedProof::SIZE)?;

        // Deserialize proof
        let proof = Proof::<Bn254>::deserialize_compressed(proof_bytes)
            .map_err(|e| ProofError::SerializationError(e.to_string()))?;

        let valid =
            Groth16::<Bn254>::verify_with_processed_vk(&self.prepared_vk, public_inputs, &proof)
                .map_err(|e| ProofError::VerificationFailed(e.to_string()))?;

        if !valid {
            warn!("proof rejected");
        }
        Ok(valid)
    }
}

/// Synthesize into a scratch constraint system and name the first failing constraint
fn check_satisfied(circuit: &TransferCircuit) -> Result<(), ProofError> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit
        .clone()
        .generate_constraints(cs.clone())
        .map_err(|e| ProofError::GenerationFailed(e.to_string()))?;

    let satisfied = cs
        .is_satisfied()
        .map_err(|e| ProofError::GenerationFailed(e.to_string()))?;
    if satisfied {
        return Ok(());
    }

    let failing = cs
        .which_is_unsatisfied()
        .map_err(|e| ProofError::GenerationFailed(e.to_string()))?
        .unwrap_or_default();
    warn!(constraint = %failing, "witness does not satisfy the transfer circuit");
    Err(ProofError::ConstraintNotSatisfied(failing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_serialized_proof_size_checked() {
        assert!(SerializedProof::from_bytes(vec![0u8; 128]).is_ok());
        assert!(SerializedProof::from_bytes(vec![0u8; 256]).is_err());
        assert!(SerializedProof::from_bytes(Vec::new()).is_err());
    }

    #[test]
    fn test_serialized_proof_hex() {
        let proof = SerializedProof::from_bytes((0..128u8).collect()).unwrap();
        let decoded = SerializedProof::from_hex(&proof.to_hex()).unwrap();

        assert_eq!(decoded, proof);
        assert!(SerializedProof::from_hex("zz").is_err());
        assert!(SerializedProof::from_hex("00ff").is_err());
    }

    #[test]
    fn test_unsatisfied_witness_is_reported() {
        let circuit = TransferCircuit::for_transfer(
            Fr::from(SOURCE_BALANCE),
            Fr::from(DESTINATION_BALANCE),
            Fr::from(501u64),
        );

        assert!(matches!(
            check_satisfied(&circuit),
            Err(ProofError::ConstraintNotSatisfied(_))
        ));
    }

    #[test]
    fn test_prove_and_verify() {
        let mut rng = StdRng::seed_from_u64(42);
        let system = TransferProofSystem::setup_with_rng(1, &mut rng).unwrap();

        let circuit = TransferCircuit::for_transfer(
            Fr::from(SOURCE_BALANCE),
            Fr::from(DESTINATION_BALANCE),
            Fr::from(120u64),
        );
        let public_inputs = circuit.public_inputs().unwrap();

        let proof = system.prove_with_rng(circuit, &mut rng).unwrap();
        assert_eq!(proof.as_bytes().len(), SerializedProof::SIZE);
        assert!(system.verify(proof.as_bytes(), &public_inputs).unwrap());

        // Wrong disclosed balance
        let mut wrong_inputs = public_inputs;
        wrong_inputs[2] = Fr::from(121u64);
        assert!(!system.verify(proof.as_bytes(), &wrong_inputs).unwrap());
    }

    #[test]
    fn test_keys_round_trip_through_proving_key() {
        let mut rng = StdRng::seed_from_u64(7);
        let system = TransferProofSystem::setup_with_rng(1, &mut rng).unwrap();

        let pk_bytes = system.serialize_proving_key().unwrap();
        let loaded = TransferProofSystem::from_proving_key_bytes(&pk_bytes, 1).unwrap();

        assert_eq!(
            loaded.serialize_verifying_key().unwrap(),
            system.serialize_verifying_key().unwrap()
        );
        assert!(TransferProofSystem::from_proving_key_bytes(&pk_bytes[..64], 1).is_err());
    }

    #[test]
    fn test_missing_key_file() {
        let config = ProverConfig {
            proving_key_path: "does/not/exist/pk.bin".into(),
            ..ProverConfig::default()
        };

        assert!(matches!(
            TransferProofSystem::from_config(&config),
            Err(ProofError::KeyLoad { .. })
        ));
    }
}
