//! Bound checks over canonical integer representatives

use ark_bn254::Fr;
use ark_r1cs_std::{fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::SynthesisError;

/// Enforce `a <= b`, comparing the canonical integers in `[0, p)` rather than
/// field elements, so a wrapped-around difference cannot pass.
pub fn enforce_less_or_equal(a: &FpVar<Fr>, b: &FpVar<Fr>) -> Result<(), SynthesisError> {
    is_less_or_equal(a, b)?.enforce_equal(&Boolean::TRUE)
}

/// `a <= b` over canonical integer representatives
pub fn is_less_or_equal(a: &FpVar<Fr>, b: &FpVar<Fr>) -> Result<Boolean<Fr>, SynthesisError> {
    // to_bits_le also enforces that the decomposition is below the modulus
    let a_bits = a.to_bits_le()?;
    let b_bits = b.to_bits_le()?;
    le_bits(&a_bits, &b_bits)
}

/// Lexicographic `a <= b` over little-endian bit vectors, scanned from the top bit
fn le_bits(a_le: &[Boolean<Fr>], b_le: &[Boolean<Fr>]) -> Result<Boolean<Fr>, SynthesisError> {
    let n = a_le.len().max(b_le.len());
    let mut lt = Boolean::constant(false);
    let mut eq = Boolean::constant(true);

    for idx in (0..n).rev() {
        let a = a_le.get(idx).cloned().unwrap_or(Boolean::FALSE);
        let b = b_le.get(idx).cloned().unwrap_or(Boolean::FALSE);

        let a_less_b = a.not().and(&b)?;
        lt = lt.or(&a_less_b.and(&eq)?)?;
        eq = eq.and(&a.xor(&b)?.not())?;
    }

    lt.or(&eq)
}
