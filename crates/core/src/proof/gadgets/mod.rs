//! Circuit gadgets for zkSNARK proofs
//!
//! This module contains constraint system implementations for:
//! - Poseidon permutation and the Fiat–Shamir transcript built on it
//! - Non-deterministic hints
//! - The in-circuit batched-sum verifier and the batched addition gadget
//! - Canonical bound checks

pub mod batch_add;
pub mod compare;
pub mod hint;
pub mod poseidon;
pub mod sumcheck;
pub mod transcript;

pub use batch_add::{BatchAddGadget, MAX_LOG_CAPACITY};
pub use compare::{enforce_less_or_equal, is_less_or_equal};
pub use hint::{new_hint, transfer_hint, Hint};
pub use poseidon::PoseidonGadget;
pub use sumcheck::{AddLayerSolution, AddLayerVar};
pub use transcript::TranscriptVar;
