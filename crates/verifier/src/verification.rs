//! Proof Verification Service
//!
//! `TransferVerifier` checks a submitted proof against the fixed public
//! balances and the destination balance the client discloses. Input checks
//! run in a fixed order, and all of them before any pairing:
//!
//! 1. proof hex decoding (`ProofEncoding`)
//! 2. proof structure (`ProofFormat`)
//! 3. decimal parsing of the disclosed balance (`BalanceParse`); an optional
//!    leading sign is accepted
//! 4. negative balances (`BelowThreshold`)
//! 5. field bound (`BalanceOutOfField`)
//! 6. business threshold (`BelowThreshold`)
//! 7. Groth16 verification (`InvalidProof` / `Backend`)

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, PreparedVerifyingKey, VerifyingKey};
use ark_snark::SNARK;
use num_bigint::BigUint;
use tracing::{debug, info, warn};

use zkbalance_core::error::validation::{canonical_field_element, parse_decimal};
use zkbalance_core::TransferCircuit;

use crate::config::VerifierConfig;
use crate::error::VerifyError;
use crate::groth16::{decode_proof, decode_verifying_key, EMBEDDED_VERIFYING_KEY_HEX};

/// Verifier for transfer proofs, holding a prepared verifying key
pub struct TransferVerifier {
    prepared_vk: PreparedVerifyingKey<Bn254>,
    min_disclosed_balance: u64,
}

impl TransferVerifier {
    pub fn new(vk: VerifyingKey<Bn254>, min_disclosed_balance: u64) -> Result<Self, VerifyError> {
        let prepared_vk =
            Groth16::<Bn254>::process_vk(&vk).map_err(|e| VerifyError::Configuration(e.to_string()))?;

        Ok(Self {
            prepared_vk,
            min_disclosed_balance,
        })
    }

    pub fn from_verifying_key_hex(
        vk_hex: &str,
        min_disclosed_balance: u64,
    ) -> Result<Self, VerifyError> {
        Self::new(decode_verifying_key(vk_hex)?, min_disclosed_balance)
    }

    /// Build from configuration, falling back to the embedded key
    pub fn from_config(config: &VerifierConfig) -> Result<Self, VerifyError> {
        match &config.verifying_key_hex {
            Some(vk_hex) => Self::from_verifying_key_hex(vk_hex, config.min_disclosed_balance),
            None => Self::embedded(config.min_disclosed_balance),
        }
    }

    /// Use the verifying key embedded at build time.
    ///
    /// The key is read from the `ZKBALANCE_VERIFYING_KEY_HEX` environment
    /// variable when this crate is compiled; nothing is embedded otherwise.
    /// A build without it returns `VerifyError::Configuration` here, and
    /// callers must use `from_verifying_key_hex` or a `VerifierConfig` with
    /// `verifying_key_hex` set instead.
    pub fn embedded(min_disclosed_balance: u64) -> Result<Self, VerifyError> {
        let vk_hex = EMBEDDED_VERIFYING_KEY_HEX.ok_or_else(|| {
            VerifyError::Configuration(
                "no verifying key embedded; build with ZKBALANCE_VERIFYING_KEY_HEX set".to_string(),
            )
        })?;
        Self::from_verifying_key_hex(vk_hex, min_disclosed_balance)
    }

    pub fn min_disclosed_balance(&self) -> u64 {
        self.min_disclosed_balance
    }

    /// Verify a hex-encoded proof that the destination account now holds
    /// `new_balance` (base-10)
    #[tracing::instrument(skip_all, name = "TransferVerifier::verify_proof")]
    pub fn verify_proof(&self, new_balance: &str, proof_hex: &str) -> Result<(), VerifyError> {
        let proof_bytes = hex::decode(proof_hex)?;
        let proof = decode_proof(&proof_bytes)?;

        let disclosed = parse_decimal(new_balance)
            .map_err(|_| VerifyError::BalanceParse(new_balance.to_string()))?;
        let below_threshold = VerifyError::BelowThreshold {
            threshold: self.min_disclosed_balance,
        };

        let Some(disclosed) = disclosed.to_biguint() else {
            warn!(threshold = self.min_disclosed_balance, "negative disclosed balance");
            return Err(below_threshold);
        };
        let disclosed_fr =
            canonical_field_element(&disclosed).ok_or(VerifyError::BalanceOutOfField)?;

        if disclosed < BigUint::from(self.min_disclosed_balance) {
            warn!(
                threshold = self.min_disclosed_balance,
                "disclosed balance below threshold"
            );
            return Err(below_threshold);
        }

        let public_inputs = statement_inputs(disclosed_fr)?;
        debug!(inputs = public_inputs.len(), "rebuilt public inputs");

        match Groth16::<Bn254>::verify_with_processed_vk(&self.prepared_vk, &public_inputs, &proof) {
            Ok(true) => {
                info!("transfer proof accepted");
                Ok(())
            }
            Ok(false) => {
                warn!("transfer proof rejected");
                Err(VerifyError::InvalidProof)
            }
            Err(e) => Err(VerifyError::Backend(e.to_string())),
        }
    }
}

/// Public subset of the statement circuit for a disclosed destination balance
fn statement_inputs(new_destination_balance: Fr) -> Result<Vec<Fr>, VerifyError> {
    TransferCircuit::public_statement(new_destination_balance)
        .public_inputs()
        .map_err(|e| VerifyError::Backend(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkbalance_core::{DESTINATION_BALANCE, SOURCE_BALANCE};

    #[test]
    fn test_statement_inputs_use_fixed_balances() {
        let inputs = statement_inputs(Fr::from(123_456u64)).unwrap();
        assert_eq!(
            inputs,
            vec![
                Fr::from(SOURCE_BALANCE),
                Fr::from(DESTINATION_BALANCE),
                Fr::from(123_456u64)
            ]
        );
    }

    #[test]
    fn test_embedded_key_missing_is_configuration_error() {
        if EMBEDDED_VERIFYING_KEY_HEX.is_none() {
            assert!(matches!(
                TransferVerifier::embedded(0),
                Err(VerifyError::Configuration(_))
            ));
        }
    }

    #[test]
    fn test_verifier_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TransferVerifier>();
    }
}
