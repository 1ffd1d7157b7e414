//! Transfer Circuit for Confidential Balance Transfers
//!
//! This circuit proves that a transfer between two accounts is valid:
//! 1. The transfer does not exceed the source balance (canonical integers)
//! 2. The new source balance is `source_balance - transfer`
//! 3. The new destination balance is `destination_balance + transfer`
//!
//! Both additions go through one `BatchAddGadget`, discharged at the end with
//! the two public balances bound into its transcript.
//!
//! Public Inputs:
//! - source_balance: The source account balance before the transfer
//! - destination_balance: The destination account balance before the transfer
//! - new_destination_balance: The disclosed destination balance afterwards
//!
//! Private Inputs (Witness):
//! - new_source_balance: The source balance afterwards
//! - transfer: The transferred amount

use ark_bn254::Fr;
use ark_r1cs_std::{alloc::AllocVar, eq::EqGadget, fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use tracing::debug;

use super::gadgets::batch_add::BatchAddGadget;
use super::gadgets::compare::enforce_less_or_equal;
use crate::error::ProofError;

/// Publicly known balance of the source account
pub const SOURCE_BALANCE: u64 = 500;

/// Publicly known balance of the destination account
pub const DESTINATION_BALANCE: u64 = 0;

/// Default `log2` capacity of the batched addition gadget
pub const DEFAULT_BATCH_LOG_CAPACITY: usize = 1;

/// Transfer circuit for confidential balance transfers
#[derive(Clone, Debug)]
pub struct TransferCircuit {
    // ===== Public Inputs =====
    pub source_balance: Option<Fr>,
    pub destination_balance: Option<Fr>,
    pub new_destination_balance: Option<Fr>,

    // ===== Private Inputs (Witness) =====
    pub new_source_balance: Option<Fr>,
    pub transfer: Option<Fr>,

    /// `log2` of the batched addition capacity; part of the circuit shape
    pub batch_log_capacity: usize,
}

impl Default for TransferCircuit {
    fn default() -> Self {
        Self {
            source_balance: None,
            destination_balance: None,
            new_destination_balance: None,
            new_source_balance: None,
            transfer: None,
            batch_log_capacity: DEFAULT_BATCH_LOG_CAPACITY,
        }
    }
}

impl TransferCircuit {
    /// Number of public inputs
    pub const NUM_PUBLIC_INPUTS: usize = 3; // source, destination, new_destination

    /// Create a new transfer circuit with all values
    pub fn new(
        source_balance: Fr,
        destination_balance: Fr,
        new_destination_balance: Fr,
        new_source_balance: Fr,
        transfer: Fr,
    ) -> Self {
        Self {
            source_balance: Some(source_balance),
            destination_balance: Some(destination_balance),
            new_destination_balance: Some(new_destination_balance),
            new_source_balance: Some(new_source_balance),
            transfer: Some(transfer),
            batch_log_capacity: DEFAULT_BATCH_LOG_CAPACITY,
        }
    }

    /// Build the full assignment for `transfer`, deriving both new balances
    pub fn for_transfer(source_balance: Fr, destination_balance: Fr, transfer: Fr) -> Self {
        Self::new(
            source_balance,
            destination_balance,
            destination_balance + transfer,
            source_balance - transfer,
            transfer,
        )
    }

    /// Statement seen by a verifier: the fixed balances and the disclosed
    /// destination balance, with the private slots zero-filled
    pub fn public_statement(new_destination_balance: Fr) -> Self {
        Self::new(
            Fr::from(SOURCE_BALANCE),
            Fr::from(DESTINATION_BALANCE),
            new_destination_balance,
            Fr::from(0u64),
            Fr::from(0u64),
        )
    }

    pub fn with_batch_log_capacity(mut self, batch_log_capacity: usize) -> Self {
        self.batch_log_capacity = batch_log_capacity;
        self
    }

    /// Public inputs in allocation order
    pub fn public_inputs(&self) -> Result<Vec<Fr>, ProofError> {
        Ok(vec![
            self.source_balance
                .ok_or(ProofError::MissingAssignment("source_balance"))?,
            self.destination_balance
                .ok_or(ProofError::MissingAssignment("destination_balance"))?,
            self.new_destination_balance
                .ok_or(ProofError::MissingAssignment("new_destination_balance"))?,
        ])
    }
}

impl ConstraintSynthesizer<Fr> for TransferCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // ===== Allocate Public Inputs =====
        let source_balance_var = FpVar::new_input(cs.clone(), || {
            self.source_balance.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let destination_balance_var = FpVar::new_input(cs.clone(), || {
            self.destination_balance.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let new_destination_balance_var = FpVar::new_input(cs.clone(), || {
            self.new_destination_balance
                .ok_or(SynthesisError::AssignmentMissing)
        })?;

        // ===== Allocate Private Inputs (Witnesses) =====
        let new_source_balance_var = FpVar::new_witness(cs.clone(), || {
            self.new_source_balance.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let transfer_var = FpVar::new_witness(cs.clone(), || {
            self.transfer.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let mut batch = BatchAddGadget::new(cs.clone(), self.batch_log_capacity)?;

        // ===== Constraint 1: transfer <= source_balance =====
        enforce_less_or_equal(&transfer_var, &source_balance_var)?;

        // ===== Constraint 2: new source balance =====
        let negated = transfer_var.negate()?;
        let computed_new_source = batch.record(&source_balance_var, &negated)?;
        computed_new_source.enforce_equal(&new_source_balance_var)?;

        // ===== Constraint 3: new destination balance =====
        let computed_new_destination = batch.record(&destination_balance_var, &transfer_var)?;
        computed_new_destination.enforce_equal(&new_destination_balance_var)?;

        // ===== Constraint 4: discharge the batched additions =====
        batch.discharge(&[source_balance_var, destination_balance_var])?;

        debug!(constraints = cs.num_constraints(), "transfer circuit synthesized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::One;
    use ark_relations::r1cs::{ConstraintSystem, SynthesisMode};

    fn synthesize(circuit: TransferCircuit) -> ConstraintSystemRef<Fr> {
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        cs
    }

    fn fixed_transfer(amount: u64) -> TransferCircuit {
        TransferCircuit::for_transfer(
            Fr::from(SOURCE_BALANCE),
            Fr::from(DESTINATION_BALANCE),
            Fr::from(amount),
        )
    }

    #[test]
    fn test_transfer_circuit_valid() {
        let cs = synthesize(fixed_transfer(500));

        println!("Transfer circuit constraints: {}", cs.num_constraints());
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_transfer_amounts_within_balance() {
        for amount in [0u64, 1, 250, 499, 500] {
            let cs = synthesize(fixed_transfer(amount));
            assert!(cs.is_satisfied().unwrap(), "amount {}", amount);
        }
    }

    #[test]
    fn test_transfer_exceeding_balance_unsatisfied() {
        let cs = synthesize(fixed_transfer(501));
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_wrong_new_destination_balance() {
        let mut circuit = fixed_transfer(100);
        circuit.new_destination_balance = Some(Fr::from(101u64));

        let cs = synthesize(circuit);
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_wrong_new_source_balance() {
        let mut circuit = fixed_transfer(100);
        circuit.new_source_balance = Some(Fr::from(401u64));

        let cs = synthesize(circuit);
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_wrapped_transfer_unsatisfied() {
        // -1 makes the destination balance go down by one
        let cs = synthesize(TransferCircuit::for_transfer(
            Fr::from(SOURCE_BALANCE),
            Fr::from(DESTINATION_BALANCE),
            -Fr::one(),
        ));
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_larger_batch_capacity() {
        let cs = synthesize(fixed_transfer(42).with_batch_log_capacity(3));
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_capacity_too_small_for_two_additions() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let result = fixed_transfer(42)
            .with_batch_log_capacity(0)
            .generate_constraints(cs);
        assert_eq!(result, Err(SynthesisError::Unsatisfiable));
    }

    #[test]
    fn test_setup_mode_has_same_shape() {
        let proving = synthesize(fixed_transfer(500));

        let setup = ConstraintSystem::<Fr>::new_ref();
        setup.set_mode(SynthesisMode::Setup);
        TransferCircuit::default()
            .generate_constraints(setup.clone())
            .unwrap();

        assert_eq!(setup.num_constraints(), proving.num_constraints());
        assert_eq!(setup.num_instance_variables(), TransferCircuit::NUM_PUBLIC_INPUTS + 1);
    }

    #[test]
    fn test_public_inputs_order() {
        let circuit = fixed_transfer(500);
        assert_eq!(
            circuit.public_inputs().unwrap(),
            vec![Fr::from(500u64), Fr::from(0u64), Fr::from(500u64)]
        );

        let statement = TransferCircuit::public_statement(Fr::from(500u64));
        assert_eq!(statement.public_inputs().unwrap(), circuit.public_inputs().unwrap());
        assert_eq!(statement.transfer, Some(Fr::from(0u64)));

        assert!(TransferCircuit::default().public_inputs().is_err());
    }
}
