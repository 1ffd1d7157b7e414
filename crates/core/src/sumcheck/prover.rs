use ark_bn254::Fr;
use ark_ff::Zero;
use tracing::debug;

use super::mle::{eq_table, fold};
use super::{absorb_statement, domain_num_vars, BatchSumProof};
use crate::crypto::Transcript;
use crate::error::SumcheckError;

/// Produce the sumcheck proof that `output = left + right` element-wise.
///
/// The round polynomials are computed from `left + right`, so a dishonest
/// `output` yields a proof whose first round fails against `out~(r)`.
#[tracing::instrument(skip_all, name = "BatchSum::prove", fields(len = left.len()))]
pub fn prove_batch_sum(
    left: &[Fr],
    right: &[Fr],
    output: &[Fr],
    binding: &[Fr],
) -> Result<BatchSumProof, SumcheckError> {
    let num_vars = domain_num_vars(left.len(), right.len(), output.len())?;

    let mut transcript = Transcript::new();
    absorb_statement(&mut transcript, num_vars, binding, left, right, output);
    let r = transcript.challenges(num_vars);

    let mut eq = eq_table(&r);
    let mut sum: Vec<Fr> = left.iter().zip(right).map(|(l, r)| *l + r).collect();
    let mut round_evals = Vec::with_capacity(num_vars);

    for _ in 0..num_vars {
        let evals = round_polynomial(&eq, &sum);
        transcript.absorb_all(&evals);
        let challenge = transcript.challenge();

        eq = fold(&eq, &challenge);
        sum = fold(&sum, &challenge);
        round_evals.push(evals);
    }

    debug!(rounds = round_evals.len(), "batched-sum proof ready");
    Ok(BatchSumProof { round_evals })
}

/// Evaluations at 0, 1, 2 of `Σ_{rest} eq(t, rest) · sum(t, rest)` in the
/// lowest unbound variable `t`
fn round_polynomial(eq: &[Fr], sum: &[Fr]) -> [Fr; 3] {
    let mut evals = [Fr::zero(); 3];

    for (e, s) in eq.chunks_exact(2).zip(sum.chunks_exact(2)) {
        let e_step = e[1] - e[0];
        let s_step = s[1] - s[0];

        let mut e_t = e[0];
        let mut s_t = s[0];
        for eval in evals.iter_mut() {
            *eval += e_t * s_t;
            e_t += e_step;
            s_t += s_step;
        }
    }

    evals
}
