//! Non-deterministic hints
//!
//! A hint computes witness values off the constraint path. The values are
//! allocated as fresh witnesses and carry no constraints of their own: the
//! caller must bind them to the relation afterwards (the batched addition
//! gadget does so through the batched-sum argument).

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_r1cs_std::{alloc::AllocVar, fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};
use tracing::error;

use crate::error::HintError;

/// A pure function from input values to output values
pub type Hint = fn(&[Fr], &mut [Fr]) -> Result<(), HintError>;

/// Field hint evaluator for the transfer circuit: `outputs[0] = inputs[0] + inputs[1] mod p`
pub fn transfer_hint(inputs: &[Fr], outputs: &mut [Fr]) -> Result<(), HintError> {
    if inputs.len() != 2 || outputs.len() != 1 {
        return Err(HintError::Arity {
            expected_inputs: 2,
            expected_outputs: 1,
            inputs: inputs.len(),
            outputs: outputs.len(),
        });
    }

    outputs[0] = inputs[0] + inputs[1];
    Ok(())
}

/// Allocate `num_outputs` witnesses computed by `hint` from `inputs`.
///
/// The hint only runs when every input has an assignment; during setup the
/// outputs are allocated without values.
pub fn new_hint(
    cs: ConstraintSystemRef<Fr>,
    hint: Hint,
    inputs: &[FpVar<Fr>],
    num_outputs: usize,
) -> Result<Vec<FpVar<Fr>>, SynthesisError> {
    let input_values: Option<Vec<Fr>> = inputs.iter().map(|v| v.value().ok()).collect();

    let output_values = match input_values {
        Some(values) => {
            let mut outputs = vec![Fr::zero(); num_outputs];
            hint(&values, &mut outputs).map_err(|e| {
                error!(error = %e, "hint evaluation failed");
                SynthesisError::Unsatisfiable
            })?;
            Some(outputs)
        }
        None => None,
    };

    (0..num_outputs)
        .map(|i| {
            FpVar::new_witness(cs.clone(), || {
                output_values
                    .as_ref()
                    .map(|values| values[i])
                    .ok_or(SynthesisError::AssignmentMissing)
            })
        })
        .collect()
}
