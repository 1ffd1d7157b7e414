//! Poseidon Permutation Gadget for R1CS circuits
//!
//! Constraint version of `crypto::poseidon`. Used by `TranscriptVar` to derive
//! Fiat–Shamir challenges inside the circuit.

use ark_bn254::Fr;
use ark_r1cs_std::{alloc::AllocVar, fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use crate::crypto::poseidon_constants::{self, FULL_ROUNDS, PARTIAL_ROUNDS, WIDTH};

/// Poseidon permutation gadget
pub struct PoseidonGadget {
    /// Round constants as constraint constants
    round_constants: Vec<FpVar<Fr>>,
    /// MDS matrix as constraint constants
    mds_matrix: Vec<Vec<FpVar<Fr>>>,
}

impl PoseidonGadget {
    /// Create a new Poseidon gadget with the standard constants
    pub fn new(cs: ConstraintSystemRef<Fr>) -> Result<Self, SynthesisError> {
        let round_constants = poseidon_constants::get_round_constants()
            .into_iter()
            .map(|c| FpVar::new_constant(cs.clone(), c))
            .collect::<Result<Vec<_>, _>>()?;

        let mds_matrix = poseidon_constants::get_mds_matrix()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|c| FpVar::new_constant(cs.clone(), c))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            round_constants,
            mds_matrix,
        })
    }

    /// Apply the Poseidon permutation to a width-3 state
    pub fn permute(&self, state: &mut [FpVar<Fr>]) -> Result<(), SynthesisError> {
        if state.len() != WIDTH {
            return Err(SynthesisError::Unsatisfiable);
        }

        let mut round_ctr = 0;

        for _ in 0..(FULL_ROUNDS / 2) {
            self.full_round(state, round_ctr)?;
            round_ctr += WIDTH;
        }

        for _ in 0..PARTIAL_ROUNDS {
            self.partial_round(state, round_ctr)?;
            round_ctr += WIDTH;
        }

        for _ in 0..(FULL_ROUNDS / 2) {
            self.full_round(state, round_ctr)?;
            round_ctr += WIDTH;
        }

        Ok(())
    }

    /// Full round: S-box on all elements, then MDS
    fn full_round(&self, state: &mut [FpVar<Fr>], round_ctr: usize) -> Result<(), SynthesisError> {
        self.add_round_constants(state, round_ctr);
        for elem in state.iter_mut() {
            *elem = sbox(elem);
        }
        self.mds_multiply(state);
        Ok(())
    }

    /// Partial round: S-box on first element only, then MDS
    fn partial_round(
        &self,
        state: &mut [FpVar<Fr>],
        round_ctr: usize,
    ) -> Result<(), SynthesisError> {
        self.add_round_constants(state, round_ctr);
        state[0] = sbox(&state[0]);
        self.mds_multiply(state);
        Ok(())
    }

    fn add_round_constants(&self, state: &mut [FpVar<Fr>], round_ctr: usize) {
        for (i, elem) in state.iter_mut().enumerate() {
            *elem = &*elem + &self.round_constants[round_ctr + i];
        }
    }

    /// Multiply state by MDS matrix (linear, no constraints)
    fn mds_multiply(&self, state: &mut [FpVar<Fr>]) {
        let new_state: Vec<FpVar<Fr>> = self
            .mds_matrix
            .iter()
            .map(|row| {
                row.iter()
                    .zip(state.iter())
                    .fold(FpVar::zero(), |acc, (m, s)| acc + m * s)
            })
            .collect();

        for (slot, val) in state.iter_mut().zip(new_state) {
            *slot = val;
        }
    }
}

/// S-box: x^5
fn sbox(x: &FpVar<Fr>) -> FpVar<Fr> {
    let x2 = x * x;
    let x4 = &x2 * &x2;
    &x4 * x
}
