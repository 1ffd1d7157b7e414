//! Batched Addition Gadget
//!
//! Collects `left + right = sum` obligations during synthesis and discharges
//! them together through one in-circuit batched-sum check instead of one
//! equality constraint per addition.
//!
//! ```text
//! record(a, b) ──► new_hint ──► sum (unconstrained witness)
//!        │
//!        └─ slots: left[i], right[i], sum[i]      (i < counter)
//!
//! discharge(binding):
//!   pad left/right with zeros up to 2^b
//!   AddLayerVar::import ─► solve ─► outputs
//!   AddLayerSolution::verify(binding)
//!   outputs[i] == sum[i]                          (i < counter)
//! ```

use ark_bn254::Fr;
use ark_r1cs_std::{fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::ConstraintSystemRef;
use tracing::{debug, error};

use super::hint::{new_hint, transfer_hint};
use super::sumcheck::AddLayerVar;
use crate::error::BatchError;

/// Largest supported `log_capacity`
pub const MAX_LOG_CAPACITY: usize = 16;

/// Fixed-capacity accumulator of addition obligations
pub struct BatchAddGadget {
    cs: ConstraintSystemRef<Fr>,
    left: Vec<FpVar<Fr>>,
    right: Vec<FpVar<Fr>>,
    sums: Vec<FpVar<Fr>>,
    counter: usize,
    log_capacity: usize,
}

impl BatchAddGadget {
    /// Create a gadget holding up to `2^log_capacity` additions
    pub fn new(cs: ConstraintSystemRef<Fr>, log_capacity: usize) -> Result<Self, BatchError> {
        if log_capacity > MAX_LOG_CAPACITY {
            error!(log_capacity, "batch log capacity out of range");
            return Err(BatchError::InvalidLogCapacity {
                got: log_capacity,
                max: MAX_LOG_CAPACITY,
            });
        }

        let capacity = 1usize << log_capacity;
        Ok(Self {
            cs,
            left: Vec::with_capacity(capacity),
            right: Vec::with_capacity(capacity),
            sums: Vec::with_capacity(capacity),
            counter: 0,
            log_capacity,
        })
    }

    /// Record `left + right` and return the hinted sum.
    ///
    /// The returned variable is only bound to the inputs once the batch is
    /// discharged.
    pub fn record(&mut self, left: &FpVar<Fr>, right: &FpVar<Fr>) -> Result<FpVar<Fr>, BatchError> {
        if self.counter >= self.capacity() {
            error!(capacity = self.capacity(), "batched addition capacity exceeded");
            return Err(BatchError::CapacityExceeded {
                capacity: self.capacity(),
            });
        }

        let mut outputs = new_hint(
            self.cs.clone(),
            transfer_hint,
            &[left.clone(), right.clone()],
            1,
        )?;
        let sum = outputs.remove(0);

        self.left.push(left.clone());
        self.right.push(right.clone());
        self.sums.push(sum.clone());
        self.counter += 1;

        Ok(sum)
    }

    /// Seal the batch: pad, verify the batched sum and bind every recorded
    /// sum to the verified output.
    #[tracing::instrument(skip_all, name = "BatchAddGadget::discharge", fields(recorded = self.counter, capacity = self.capacity()))]
    pub fn discharge(self, binding: &[FpVar<Fr>]) -> Result<(), BatchError> {
        if self.counter == 0 {
            error!("discharging an empty batch");
            return Err(BatchError::EmptyBatch);
        }

        let capacity = self.capacity();
        let mut left = self.left;
        let mut right = self.right;
        left.resize(capacity, FpVar::zero());
        right.resize(capacity, FpVar::zero());

        let solution = AddLayerVar::import(self.cs.clone(), left, right)?.solve()?;
        solution.verify(binding)?;

        // Padding slots stay unchecked
        for (output, sum) in solution.outputs().iter().zip(&self.sums) {
            output.enforce_equal(sum)?;
        }

        debug!(recorded = self.counter, "batch discharged");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.counter
    }

    pub fn is_empty(&self) -> bool {
        self.counter == 0
    }

    pub fn capacity(&self) -> usize {
        1 << self.log_capacity
    }

    pub fn log_capacity(&self) -> usize {
        self.log_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{One, PrimeField};
    use ark_r1cs_std::alloc::AllocVar;
    use ark_relations::r1cs::{ConstraintSystem, SynthesisMode};
    use proptest::prelude::*;

    fn witness(cs: &ConstraintSystemRef<Fr>, value: u64) -> FpVar<Fr> {
        FpVar::new_witness(cs.clone(), || Ok(Fr::from(value))).unwrap()
    }

    #[test]
    fn test_padding_is_transparent() {
        for k in 1..=4u64 {
            let cs = ConstraintSystem::<Fr>::new_ref();
            let mut gadget = BatchAddGadget::new(cs.clone(), 2).unwrap();

            for i in 0..k {
                let sum = gadget
                    .record(&witness(&cs, i), &witness(&cs, 100 + i))
                    .unwrap();
                assert_eq!(sum.value().unwrap(), Fr::from(100 + 2 * i));
            }
            assert_eq!(gadget.len(), k as usize);

            gadget.discharge(&[]).unwrap();
            assert!(cs.is_satisfied().unwrap(), "k = {}", k);
        }
    }

    #[test]
    fn test_capacity_exceeded() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let mut gadget = BatchAddGadget::new(cs.clone(), 1).unwrap();
        let one = witness(&cs, 1);

        gadget.record(&one, &one).unwrap();
        gadget.record(&one, &one).unwrap();
        assert!(matches!(
            gadget.record(&one, &one),
            Err(BatchError::CapacityExceeded { capacity: 2 })
        ));
        assert_eq!(gadget.len(), 2);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let gadget = BatchAddGadget::new(cs, 1).unwrap();

        assert!(gadget.is_empty());
        assert!(matches!(gadget.discharge(&[]), Err(BatchError::EmptyBatch)));
    }

    #[test]
    fn test_invalid_log_capacity() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        assert!(matches!(
            BatchAddGadget::new(cs, MAX_LOG_CAPACITY + 1),
            Err(BatchError::InvalidLogCapacity { .. })
        ));
    }

    #[test]
    fn test_single_slot_batch() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let mut gadget = BatchAddGadget::new(cs.clone(), 0).unwrap();
        assert_eq!(gadget.capacity(), 1);

        gadget.record(&witness(&cs, 20), &witness(&cs, 22)).unwrap();
        gadget.discharge(&[]).unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_tampered_sum_is_unsatisfied() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let mut gadget = BatchAddGadget::new(cs.clone(), 1).unwrap();

        gadget.record(&witness(&cs, 2), &witness(&cs, 3)).unwrap();
        gadget.sums[0] = witness(&cs, 6);

        gadget.discharge(&[]).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_wrapping_negation() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let mut gadget = BatchAddGadget::new(cs.clone(), 1).unwrap();
        let balance = witness(&cs, 500);
        let amount = witness(&cs, 501).negate().unwrap();

        let sum = gadget.record(&balance, &amount).unwrap();
        assert_eq!(sum.value().unwrap(), -Fr::one());

        gadget.discharge(&[]).unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_setup_mode_constraint_count() {
        let shape = |setup: bool| {
            let cs = ConstraintSystem::<Fr>::new_ref();
            if setup {
                cs.set_mode(SynthesisMode::Setup);
            }
            let mut gadget = BatchAddGadget::new(cs.clone(), 2).unwrap();
            let a = witness(&cs, 5);
            let b = witness(&cs, 7);
            gadget.record(&a, &b).unwrap();
            gadget.record(&b, &a).unwrap();
            gadget.discharge(&[a, b]).unwrap();
            cs.num_constraints()
        };

        assert_eq!(shape(true), shape(false));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_record_returns_field_sum(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
            let a = Fr::from_le_bytes_mod_order(&a);
            let b = Fr::from_le_bytes_mod_order(&b);

            let cs = ConstraintSystem::<Fr>::new_ref();
            let mut gadget = BatchAddGadget::new(cs.clone(), 0).unwrap();
            let a_var = FpVar::new_witness(cs.clone(), || Ok(a)).unwrap();
            let b_var = FpVar::new_witness(cs.clone(), || Ok(b)).unwrap();

            let mut hinted = [Fr::from(0u64)];
            transfer_hint(&[a, b], &mut hinted).unwrap();

            let sum = gadget.record(&a_var, &b_var).unwrap();
            prop_assert_eq!(sum.value().unwrap(), a + b);
            prop_assert_eq!(sum.value().unwrap(), hinted[0]);

            gadget.discharge(&[]).unwrap();
            prop_assert!(cs.is_satisfied().unwrap());
        }
    }
}
