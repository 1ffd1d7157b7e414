//! Batched-sum argument
//!
//! A sumcheck proof that a committed output sequence is the element-wise sum
//! of two input sequences over a power-of-two domain of size `2^n`:
//!
//! 1. The transcript absorbs `n`, the caller's binding values, `left`, `right`
//!    and `output`, then squeezes a random point `r` in `F^n`.
//! 2. The claim is `out~(r) = Σ_x eq(r, x) · (left(x) + right(x))`.
//! 3. `n` rounds of degree-2 sumcheck reduce the claim to a single point `s`,
//!    binding variables low-to-high. Each round's polynomial is sent as its
//!    evaluations at `0, 1, 2`.
//! 4. The verifier evaluates `left~(s)` and `right~(s)` directly and checks
//!    `claim = eq(r, s) · (left~(s) + right~(s))`.
//!
//! The in-circuit verifier (`proof::gadgets::sumcheck`) replays exactly the
//! same transcript.

pub mod mle;
pub mod prover;
pub mod verifier;

use ark_bn254::Fr;

use crate::crypto::Transcript;
use crate::error::SumcheckError;

pub use mle::{eq_eval, eq_table, evaluate_mle, fold, interpolate_quadratic};
pub use prover::prove_batch_sum;
pub use verifier::verify_batch_sum;

/// Sumcheck transcript of the batched-sum argument
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchSumProof {
    /// Evaluations of each round polynomial at 0, 1 and 2
    pub round_evals: Vec<[Fr; 3]>,
}

impl BatchSumProof {
    pub fn num_rounds(&self) -> usize {
        self.round_evals.len()
    }
}

/// Check that the three sequences share one power-of-two length, returning
/// the number of variables `n = log2(len)`
pub fn domain_num_vars(left: usize, right: usize, output: usize) -> Result<usize, SumcheckError> {
    if left != right || left != output {
        return Err(SumcheckError::LengthMismatch {
            left,
            right,
            output,
        });
    }
    if left == 0 {
        return Err(SumcheckError::EmptyDomain);
    }
    if !left.is_power_of_two() {
        return Err(SumcheckError::NotPowerOfTwo(left));
    }
    Ok(left.trailing_zeros() as usize)
}

/// Absorb the statement in the order shared by prover, verifier and gadget
pub(crate) fn absorb_statement(
    transcript: &mut Transcript,
    num_vars: usize,
    binding: &[Fr],
    left: &[Fr],
    right: &[Fr],
    output: &[Fr],
) {
    transcript.absorb(&Fr::from(num_vars as u64));
    transcript.absorb_all(binding);
    transcript.absorb_all(left);
    transcript.absorb_all(right);
    transcript.absorb_all(output);
}
