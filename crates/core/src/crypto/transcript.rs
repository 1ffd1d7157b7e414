//! Poseidon duplex-sponge transcript
//!
//! Fiat–Shamir challenge source for the batched-sum argument. The in-circuit
//! twin lives in `proof::gadgets::transcript::TranscriptVar`; both must
//! absorb and squeeze in the same order to derive the same challenges.

use ark_bn254::Fr;
use ark_ff::{PrimeField, Zero};

use super::poseidon::poseidon_permute;
use super::poseidon_constants::{RATE, WIDTH};

/// Domain separator placed in the capacity element of a fresh transcript
pub fn transcript_domain() -> Fr {
    Fr::from_le_bytes_mod_order(b"zkbalance.batch-sum.v1")
}

/// Native Fiat–Shamir transcript
pub struct Transcript {
    state: [Fr; WIDTH],
    /// Rate slots filled since the last permutation
    absorbed: usize,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            state: [transcript_domain(), Fr::zero(), Fr::zero()],
            absorbed: 0,
        }
    }

    /// Absorb one field element into the next free rate slot
    pub fn absorb(&mut self, element: &Fr) {
        if self.absorbed == RATE {
            poseidon_permute(&mut self.state);
            self.absorbed = 0;
        }
        self.state[1 + self.absorbed] += element;
        self.absorbed += 1;
    }

    pub fn absorb_all(&mut self, elements: &[Fr]) {
        for element in elements {
            self.absorb(element);
        }
    }

    /// Squeeze one challenge
    pub fn challenge(&mut self) -> Fr {
        poseidon_permute(&mut self.state);
        self.absorbed = 0;
        self.state[1]
    }

    pub fn challenges(&mut self, n: usize) -> Vec<Fr> {
        (0..n).map(|_| self.challenge()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_deterministic() {
        let mut t1 = Transcript::new();
        let mut t2 = Transcript::new();

        t1.absorb_all(&[Fr::from(500u64), Fr::from(0u64)]);
        t2.absorb_all(&[Fr::from(500u64), Fr::from(0u64)]);

        assert_eq!(t1.challenges(3), t2.challenges(3));
    }

    #[test]
    fn test_transcript_binds_absorbed_values() {
        let mut t1 = Transcript::new();
        let mut t2 = Transcript::new();

        t1.absorb_all(&[Fr::from(500u64), Fr::from(0u64)]);
        t2.absorb_all(&[Fr::from(501u64), Fr::from(0u64)]);

        assert_ne!(t1.challenge(), t2.challenge());
    }

    #[test]
    fn test_transcript_binds_order() {
        let mut t1 = Transcript::new();
        let mut t2 = Transcript::new();

        t1.absorb_all(&[Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)]);
        t2.absorb_all(&[Fr::from(2u64), Fr::from(1u64), Fr::from(3u64)]);

        assert_ne!(t1.challenge(), t2.challenge());
    }

    #[test]
    fn test_successive_challenges_differ() {
        let mut transcript = Transcript::new();
        transcript.absorb(&Fr::from(7u64));

        let c = transcript.challenges(2);
        assert_ne!(c[0], c[1]);
    }
}
