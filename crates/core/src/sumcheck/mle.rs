//! Multilinear extension helpers over the boolean hypercube
//!
//! Variables are bound low-to-high: variable `i` is bit `i` of the vector
//! index, and folding always pairs entries `(2j, 2j + 1)`.

use ark_bn254::Fr;
use ark_ff::{Field, One, Zero};

/// Bind the lowest variable of `evals` to `challenge`
pub fn fold(evals: &[Fr], challenge: &Fr) -> Vec<Fr> {
    evals
        .chunks_exact(2)
        .map(|pair| pair[0] + *challenge * (pair[1] - pair[0]))
        .collect()
}

/// Evaluate the multilinear extension of `evals` at `point`
///
/// `evals.len()` must equal `2^point.len()`.
pub fn evaluate_mle(evals: &[Fr], point: &[Fr]) -> Fr {
    debug_assert_eq!(evals.len(), 1 << point.len());
    let mut current = evals.to_vec();
    for r in point {
        current = fold(&current, r);
    }
    current.first().copied().unwrap_or_else(Fr::zero)
}

/// `eq(a, b) = Π (a_i b_i + (1 - a_i)(1 - b_i))`
pub fn eq_eval(a: &[Fr], b: &[Fr]) -> Fr {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| *x * y + (Fr::one() - x) * (Fr::one() - y))
        .product()
}

/// Table of `eq(r, x)` for every `x` in `{0,1}^n`, indexed low-bit-first
pub fn eq_table(r: &[Fr]) -> Vec<Fr> {
    let mut table = vec![Fr::one()];
    // Each step doubles the table; the new variable becomes the highest bit.
    for r_i in r {
        let one_minus = Fr::one() - r_i;
        let mut next = Vec::with_capacity(table.len() * 2);
        next.extend(table.iter().map(|e| *e * one_minus));
        next.extend(table.iter().map(|e| *e * r_i));
        table = next;
    }
    table
}

/// Evaluate the quadratic through `(0, e0), (1, e1), (2, e2)` at `x`
pub fn interpolate_quadratic(evals: &[Fr; 3], x: &Fr) -> Fr {
    let half = Fr::from(2u64).inverse().unwrap_or_else(Fr::zero);
    let x_minus_1 = *x - Fr::one();
    let x_minus_2 = *x - Fr::from(2u64);

    let l0 = x_minus_1 * x_minus_2 * half;
    let l1 = -(*x * x_minus_2);
    let l2 = *x * x_minus_1 * half;

    evals[0] * l0 + evals[1] * l1 + evals[2] * l2
}
