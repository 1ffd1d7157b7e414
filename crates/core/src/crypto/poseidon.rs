//! Poseidon Permutation
//!
//! The algebraic hash behind the Fiat–Shamir transcript of the batched-sum
//! argument. Operates over the BN254 scalar field so the same permutation can
//! be replayed inside the circuit at low cost
//! (see `proof::gadgets::poseidon`).
//!
//! Parameters:
//! - Field: BN254 scalar field (Fr)
//! - Width: 3 (1 capacity + 2 rate)
//! - Full rounds: 8 (4 at start, 4 at end)
//! - Partial rounds: 57
//! - S-box: x^5

use ark_bn254::Fr;
use ark_ff::{Field, Zero};

use super::poseidon_constants::{self, FULL_ROUNDS, PARTIAL_ROUNDS, WIDTH};

/// Poseidon parameters for width t=3
pub struct PoseidonParams {
    /// Round constants, `WIDTH` per round
    pub round_constants: Vec<Fr>,
    /// MDS matrix
    pub mds_matrix: Vec<Vec<Fr>>,
}

impl Default for PoseidonParams {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseidonParams {
    pub fn new() -> Self {
        Self {
            round_constants: poseidon_constants::get_round_constants(),
            mds_matrix: poseidon_constants::get_mds_matrix(),
        }
    }
}

/// Poseidon permutation instance
pub struct Poseidon {
    params: PoseidonParams,
}

impl Default for Poseidon {
    fn default() -> Self {
        Self::new()
    }
}

impl Poseidon {
    pub fn new() -> Self {
        Self {
            params: PoseidonParams::new(),
        }
    }

    /// Apply the Poseidon permutation to the state
    pub fn permute(&self, state: &mut [Fr; WIDTH]) {
        let mut round_ctr = 0;

        for _ in 0..(FULL_ROUNDS / 2) {
            self.full_round(state, round_ctr);
            round_ctr += WIDTH;
        }

        for _ in 0..PARTIAL_ROUNDS {
            self.partial_round(state, round_ctr);
            round_ctr += WIDTH;
        }

        for _ in 0..(FULL_ROUNDS / 2) {
            self.full_round(state, round_ctr);
            round_ctr += WIDTH;
        }
    }

    fn full_round(&self, state: &mut [Fr; WIDTH], round_ctr: usize) {
        self.add_round_constants(state, round_ctr);
        for elem in state.iter_mut() {
            *elem = sbox(*elem);
        }
        self.mds_multiply(state);
    }

    fn partial_round(&self, state: &mut [Fr; WIDTH], round_ctr: usize) {
        self.add_round_constants(state, round_ctr);
        state[0] = sbox(state[0]);
        self.mds_multiply(state);
    }

    fn add_round_constants(&self, state: &mut [Fr; WIDTH], round_ctr: usize) {
        for (i, elem) in state.iter_mut().enumerate() {
            *elem += self.params.round_constants[round_ctr + i];
        }
    }

    fn mds_multiply(&self, state: &mut [Fr; WIDTH]) {
        let mut new_state = [Fr::zero(); WIDTH];

        for (i, out) in new_state.iter_mut().enumerate() {
            for (j, elem) in state.iter().enumerate() {
                *out += self.params.mds_matrix[i][j] * elem;
            }
        }

        *state = new_state;
    }
}

/// S-box function: x^5
#[inline]
fn sbox(x: Fr) -> Fr {
    let x2 = x.square();
    let x4 = x2.square();
    x4 * x
}

thread_local! {
    static POSEIDON: Poseidon = Poseidon::new();
}

/// Permute a width-3 state using the thread-local Poseidon instance
pub fn poseidon_permute(state: &mut [Fr; WIDTH]) {
    POSEIDON.with(|p| p.permute(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permuted(state: [Fr; WIDTH]) -> [Fr; WIDTH] {
        let mut state = state;
        poseidon_permute(&mut state);
        state
    }

    #[test]
    fn test_poseidon_permutation_deterministic() {
        let state = [Fr::zero(), Fr::from(1u64), Fr::from(2u64)];

        assert_eq!(permuted(state), permuted(state));
        assert_eq!(permuted(state), {
            let mut fresh = state;
            Poseidon::new().permute(&mut fresh);
            fresh
        });
    }

    #[test]
    fn test_poseidon_different_inputs() {
        let base = permuted([Fr::zero(), Fr::from(1u64), Fr::from(2u64)]);

        assert_ne!(base, permuted([Fr::zero(), Fr::from(1u64), Fr::from(3u64)]));
        assert_ne!(base, permuted([Fr::zero(), Fr::from(2u64), Fr::from(1u64)]));
        assert_ne!(base, permuted([Fr::from(1u64), Fr::from(1u64), Fr::from(2u64)]));
    }

    #[test]
    fn test_poseidon_permutation_moves_zero_state() {
        let state = permuted([Fr::zero(); WIDTH]);
        assert!(state.iter().all(|x| !x.is_zero()));
    }

    #[test]
    fn test_sbox() {
        assert_eq!(sbox(Fr::from(2u64)), Fr::from(32u64));
    }
}
