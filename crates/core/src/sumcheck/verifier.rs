use ark_bn254::Fr;

use super::mle::{eq_eval, evaluate_mle, interpolate_quadratic};
use super::{absorb_statement, domain_num_vars, BatchSumProof};
use crate::crypto::Transcript;
use crate::error::SumcheckError;

/// Check a batched-sum proof outside the circuit
#[tracing::instrument(skip_all, name = "BatchSum::verify", fields(len = left.len()))]
pub fn verify_batch_sum(
    left: &[Fr],
    right: &[Fr],
    output: &[Fr],
    binding: &[Fr],
    proof: &BatchSumProof,
) -> Result<(), SumcheckError> {
    let num_vars = domain_num_vars(left.len(), right.len(), output.len())?;
    if proof.num_rounds() != num_vars {
        return Err(SumcheckError::RoundCount {
            expected: num_vars,
            got: proof.num_rounds(),
        });
    }

    let mut transcript = Transcript::new();
    absorb_statement(&mut transcript, num_vars, binding, left, right, output);
    let r = transcript.challenges(num_vars);

    let mut claim = evaluate_mle(output, &r);
    let mut point = Vec::with_capacity(num_vars);

    for (round, evals) in proof.round_evals.iter().enumerate() {
        if evals[0] + evals[1] != claim {
            return Err(SumcheckError::RoundSum(round));
        }
        transcript.absorb_all(evals);
        let challenge = transcript.challenge();
        claim = interpolate_quadratic(evals, &challenge);
        point.push(challenge);
    }

    let expected = eq_eval(&r, &point) * (evaluate_mle(left, &point) + evaluate_mle(right, &point));
    if claim != expected {
        return Err(SumcheckError::FinalClaim);
    }

    Ok(())
}
