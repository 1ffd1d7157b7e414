//! In-circuit Fiat–Shamir transcript
//!
//! Mirrors `crypto::transcript::Transcript` operation for operation.

use ark_bn254::Fr;
use ark_r1cs_std::{fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use super::poseidon::PoseidonGadget;
use crate::crypto::poseidon_constants::RATE;
use crate::crypto::transcript::transcript_domain;

/// Poseidon duplex-sponge transcript over circuit variables
pub struct TranscriptVar {
    poseidon: PoseidonGadget,
    state: Vec<FpVar<Fr>>,
    absorbed: usize,
}

impl TranscriptVar {
    pub fn new(cs: ConstraintSystemRef<Fr>) -> Result<Self, SynthesisError> {
        Ok(Self {
            poseidon: PoseidonGadget::new(cs)?,
            state: vec![
                FpVar::constant(transcript_domain()),
                FpVar::zero(),
                FpVar::zero(),
            ],
            absorbed: 0,
        })
    }

    pub fn absorb(&mut self, element: &FpVar<Fr>) -> Result<(), SynthesisError> {
        if self.absorbed == RATE {
            self.poseidon.permute(&mut self.state)?;
            self.absorbed = 0;
        }
        let slot = 1 + self.absorbed;
        self.state[slot] = &self.state[slot] + element;
        self.absorbed += 1;
        Ok(())
    }

    pub fn absorb_all(&mut self, elements: &[FpVar<Fr>]) -> Result<(), SynthesisError> {
        for element in elements {
            self.absorb(element)?;
        }
        Ok(())
    }

    pub fn challenge(&mut self) -> Result<FpVar<Fr>, SynthesisError> {
        self.poseidon.permute(&mut self.state)?;
        self.absorbed = 0;
        Ok(self.state[1].clone())
    }

    pub fn challenges(&mut self, n: usize) -> Result<Vec<FpVar<Fr>>, SynthesisError> {
        (0..n).map(|_| self.challenge()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Transcript;
    use ark_relations::r1cs::ConstraintSystem;

    #[test]
    fn test_transcript_gadget_matches_native() {
        let values: Vec<Fr> = (1..=5u64).map(Fr::from).collect();

        let mut native = Transcript::new();
        native.absorb_all(&values);
        let native_challenges = native.challenges(2);
        native.absorb(&Fr::from(9u64));
        let native_last = native.challenge();

        let cs = ConstraintSystem::<Fr>::new_ref();
        let vars: Vec<FpVar<Fr>> = values
            .iter()
            .map(|v| FpVar::new_witness(cs.clone(), || Ok(*v)).unwrap())
            .collect();

        let mut transcript = TranscriptVar::new(cs.clone()).unwrap();
        transcript.absorb_all(&vars).unwrap();
        let challenges = transcript.challenges(2).unwrap();
        transcript.absorb(&FpVar::constant(Fr::from(9u64))).unwrap();
        let last = transcript.challenge().unwrap();

        assert_eq!(challenges[0].value().unwrap(), native_challenges[0]);
        assert_eq!(challenges[1].value().unwrap(), native_challenges[1]);
        assert_eq!(last.value().unwrap(), native_last);
        assert!(cs.is_satisfied().unwrap());
    }
}
