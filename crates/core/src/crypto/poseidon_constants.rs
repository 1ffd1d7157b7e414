//! Poseidon constants for the BN254 scalar field
//!
//! Round constants are derived by hashing a domain separator and the constant
//! index with BLAKE3; the MDS matrix is a Cauchy matrix. Both are fixed for the
//! lifetime of the protocol: changing them changes every transcript challenge
//! and invalidates existing keys.
//!
//! Parameters:
//! - Field: BN254 scalar field (Fr)
//! - Width: t = 3 (1 capacity + 2 rate)
//! - Full rounds: RF = 8 (4 at start, 4 at end)
//! - Partial rounds: RP = 57
//! - S-box: x^5

use ark_bn254::Fr;
use ark_ff::{Field, One, PrimeField, Zero};

/// Number of full rounds (RF = 8)
pub const FULL_ROUNDS: usize = 8;

/// Number of partial rounds (RP = 57)
pub const PARTIAL_ROUNDS: usize = 57;

/// State width (t = 3)
pub const WIDTH: usize = 3;

/// Sponge rate (t - 1)
pub const RATE: usize = WIDTH - 1;

/// Total number of round constants
pub const NUM_CONSTANTS: usize = WIDTH * (FULL_ROUNDS + PARTIAL_ROUNDS);

const ROUND_CONSTANT_DOMAIN: &[u8] = b"zkbalance.poseidon.bn254.t3.rf8.rp57";

/// Generate round constants deterministically
pub fn get_round_constants() -> Vec<Fr> {
    (0..NUM_CONSTANTS)
        .map(|i| {
            let mut hasher = blake3::Hasher::new();
            hasher.update(ROUND_CONSTANT_DOMAIN);
            hasher.update(&(i as u64).to_le_bytes());
            Fr::from_le_bytes_mod_order(hasher.finalize().as_bytes())
        })
        .collect()
}

/// Cauchy MDS matrix: `M[i][j] = 1 / (x_i + y_j)` with `x = [0, 1, 2]`, `y = [3, 4, 5]`
pub fn get_mds_matrix() -> Vec<Vec<Fr>> {
    (0..WIDTH)
        .map(|i| {
            (0..WIDTH)
                .map(|j| {
                    let sum = Fr::from(i as u64) + Fr::from((WIDTH + j) as u64);
                    sum.inverse().unwrap_or_else(Fr::one)
                })
                .collect()
        })
        .collect()
}
