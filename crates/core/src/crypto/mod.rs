//! Native cryptographic primitives: the Poseidon permutation and the
//! Fiat–Shamir transcript built on it

pub mod poseidon;
pub mod poseidon_constants;
pub mod transcript;

pub use poseidon::{poseidon_permute, Poseidon};
pub use transcript::Transcript;
