//! In-circuit batched-sum verifier
//!
//! `AddLayerVar` imports the two input sequences, `solve` allocates the
//! element-wise sums as witnesses, and `AddLayerSolution::verify` checks a
//! sumcheck proof of `output = left + right` by replaying the native
//! transcript with `TranscriptVar`. The proof itself is a witness: it is
//! produced natively by `prove_batch_sum` only when assignments exist.

use ark_bn254::Fr;
use ark_ff::{Field, One};
use ark_r1cs_std::{alloc::AllocVar, fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};
use tracing::debug;

use super::transcript::TranscriptVar;
use crate::error::BatchError;
use crate::sumcheck::{domain_num_vars, prove_batch_sum, BatchSumProof};

/// Input layer of an element-wise addition
pub struct AddLayerVar {
    cs: ConstraintSystemRef<Fr>,
    left: Vec<FpVar<Fr>>,
    right: Vec<FpVar<Fr>>,
    num_vars: usize,
}

/// Solved addition layer: inputs plus the allocated outputs
pub struct AddLayerSolution {
    cs: ConstraintSystemRef<Fr>,
    left: Vec<FpVar<Fr>>,
    right: Vec<FpVar<Fr>>,
    outputs: Vec<FpVar<Fr>>,
    num_vars: usize,
}

impl AddLayerVar {
    /// Import two sequences of equal power-of-two length
    pub fn import(
        cs: ConstraintSystemRef<Fr>,
        left: Vec<FpVar<Fr>>,
        right: Vec<FpVar<Fr>>,
    ) -> Result<Self, BatchError> {
        let num_vars = domain_num_vars(left.len(), right.len(), left.len())?;
        Ok(Self {
            cs,
            left,
            right,
            num_vars,
        })
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Allocate the output sequence `left[i] + right[i]` as fresh witnesses
    pub fn solve(self) -> Result<AddLayerSolution, BatchError> {
        let sums: Option<Vec<Fr>> = self
            .left
            .iter()
            .zip(&self.right)
            .map(|(l, r)| Some(l.value().ok()? + r.value().ok()?))
            .collect();

        let outputs = (0..self.left.len())
            .map(|i| {
                FpVar::new_witness(self.cs.clone(), || {
                    sums.as_ref()
                        .map(|s| s[i])
                        .ok_or(SynthesisError::AssignmentMissing)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AddLayerSolution {
            cs: self.cs,
            left: self.left,
            right: self.right,
            outputs,
            num_vars: self.num_vars,
        })
    }
}

impl AddLayerSolution {
    pub fn outputs(&self) -> &[FpVar<Fr>] {
        &self.outputs
    }

    /// Verify in-circuit that `outputs` is the element-wise sum of the inputs.
    ///
    /// `binding` seeds the transcript ahead of the sequences, tying the
    /// challenges to the caller's public statement.
    #[tracing::instrument(skip_all, name = "AddLayerSolution::verify", fields(len = self.outputs.len()))]
    pub fn verify(&self, binding: &[FpVar<Fr>]) -> Result<(), BatchError> {
        let proof = self.native_proof(binding)?;
        self.verify_with_round_evals(binding, proof.as_ref())
    }

    /// Allocate the round polynomials of `proof` as witnesses and check them
    fn verify_with_round_evals(
        &self,
        binding: &[FpVar<Fr>],
        proof: Option<&BatchSumProof>,
    ) -> Result<(), BatchError> {
        let round_evals = self.allocate_round_evals(proof)?;

        let mut transcript = TranscriptVar::new(self.cs.clone())?;
        transcript.absorb(&FpVar::constant(Fr::from(self.num_vars as u64)))?;
        transcript.absorb_all(binding)?;
        transcript.absorb_all(&self.left)?;
        transcript.absorb_all(&self.right)?;
        transcript.absorb_all(&self.outputs)?;
        let r = transcript.challenges(self.num_vars)?;

        let mut claim = evaluate_mle_var(&self.outputs, &r)?;
        let mut point = Vec::with_capacity(self.num_vars);

        for evals in &round_evals {
            (&evals[0] + &evals[1]).enforce_equal(&claim)?;
            transcript.absorb_all(evals)?;
            let challenge = transcript.challenge()?;
            claim = interpolate_quadratic_var(evals, &challenge)?;
            point.push(challenge);
        }

        let inputs_at_point =
            evaluate_mle_var(&self.left, &point)? + evaluate_mle_var(&self.right, &point)?;
        let expected = eq_eval_var(&r, &point)? * inputs_at_point;
        claim.enforce_equal(&expected)?;

        debug!(rounds = round_evals.len(), "batched sum verified in circuit");
        Ok(())
    }

    /// Run the native prover when every value is assigned
    fn native_proof(&self, binding: &[FpVar<Fr>]) -> Result<Option<BatchSumProof>, BatchError> {
        let (Some(binding), Some(left), Some(right), Some(output)) = (
            assigned(binding),
            assigned(&self.left),
            assigned(&self.right),
            assigned(&self.outputs),
        ) else {
            return Ok(None);
        };

        Ok(Some(prove_batch_sum(&left, &right, &output, &binding)?))
    }

    fn allocate_round_evals(
        &self,
        proof: Option<&BatchSumProof>,
    ) -> Result<Vec<[FpVar<Fr>; 3]>, SynthesisError> {
        (0..self.num_vars)
            .map(|round| -> Result<[FpVar<Fr>; 3], SynthesisError> {
                let alloc = |j: usize| {
                    FpVar::new_witness(self.cs.clone(), || {
                        proof
                            .and_then(|p| p.round_evals.get(round))
                            .map(|evals| evals[j])
                            .ok_or(SynthesisError::AssignmentMissing)
                    })
                };
                Ok([alloc(0)?, alloc(1)?, alloc(2)?])
            })
            .collect()
    }
}

fn assigned(vars: &[FpVar<Fr>]) -> Option<Vec<Fr>> {
    vars.iter().map(|v| v.value().ok()).collect()
}

/// Multilinear extension of `evals` at `point`, binding low variables first
fn evaluate_mle_var(evals: &[FpVar<Fr>], point: &[FpVar<Fr>]) -> Result<FpVar<Fr>, SynthesisError> {
    if evals.len() != 1 << point.len() {
        return Err(SynthesisError::Unsatisfiable);
    }

    let mut current = evals.to_vec();
    for r in point {
        current = current
            .chunks_exact(2)
            .map(|pair| &pair[0] + (&pair[1] - &pair[0]) * r)
            .collect();
    }
    Ok(current.swap_remove(0))
}

fn eq_eval_var(a: &[FpVar<Fr>], b: &[FpVar<Fr>]) -> Result<FpVar<Fr>, SynthesisError> {
    if a.len() != b.len() {
        return Err(SynthesisError::Unsatisfiable);
    }

    // a*b + (1-a)(1-b) = 2ab - a - b + 1
    Ok(a.iter().zip(b).fold(FpVar::one(), |acc, (x, y)| {
        let xy = x * y;
        let term = xy * Fr::from(2u64) - x - y + Fr::one();
        acc * term
    }))
}

/// Value at `x` of the quadratic through `(0, e0), (1, e1), (2, e2)`
fn interpolate_quadratic_var(
    evals: &[FpVar<Fr>; 3],
    x: &FpVar<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    let half = Fr::from(2u64)
        .inverse()
        .ok_or(SynthesisError::DivisionByZero)?;
    let x2 = x * x;

    // Lagrange basis over {0, 1, 2}, linear in x and x^2
    let l0 = (&x2 - x * Fr::from(3u64) + Fr::from(2u64)) * half;
    let l1 = x * Fr::from(2u64) - &x2;
    let l2 = (&x2 - x) * half;

    Ok(&evals[0] * l0 + &evals[1] * l1 + &evals[2] * l2)
}
