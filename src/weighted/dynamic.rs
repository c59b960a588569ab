use num_traits::{Float, FromPrimitive, NumCast};
use rand::distributions::Standard;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::core::Engine;
use super::heap::DynHeap;
use crate::error::AllocError;
use crate::slot::DynReservoir;

/// Weighted reservoir sampler (Algorithm A-ExpJ) with a runtime-chosen capacity `k`.
///
/// Each element is offered together with a positive weight; the probability
/// of an element surviving to the final reservoir is proportional to its
/// weight relative to the stream seen so far. `R` is the floating-point type
/// used for sampling keys (typically `f64`); `W` is the caller's weight type,
/// cast into `R` via [`num_traits::NumCast`].
///
/// # Example
/// ```
/// use reservoir_sampler::WeightedSamplerDynamic;
///
/// let mut sampler: WeightedSamplerDynamic<&str, f64, f64> = WeightedSamplerDynamic::new(2);
/// sampler.sample("rare", 1.0);
/// sampler.sample("common", 100.0);
/// assert_eq!(sampler.len(), 2);
/// ```
pub struct WeightedSamplerDynamic<T, W, R, G = StdRng> {
    engine: Engine<T, W, R, DynReservoir<T>, DynHeap<R>, G>,
}

impl<T: Clone, W, R: Copy, G: Clone> Clone for WeightedSamplerDynamic<T, W, R, G> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
        }
    }
}

impl<T, W, R> WeightedSamplerDynamic<T, W, R, StdRng>
where
    R: Float + FromPrimitive,
    Standard: Distribution<R>,
{
    /// Creates a sampler with capacity `k`, seeded from a nondeterministic source.
    ///
    /// # Panics
    /// Panics if `k == 0`.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self::with_rng(k, StdRng::from_entropy())
    }
}

impl<T, W, R, G> WeightedSamplerDynamic<T, W, R, G>
where
    R: Float + FromPrimitive,
    G: RngCore,
    Standard: Distribution<R>,
{
    /// Creates a sampler with capacity `k`, driven by `rng`.
    ///
    /// # Panics
    /// Panics if `k == 0`.
    pub fn with_rng(k: usize, rng: G) -> Self {
        Self {
            engine: Engine::new(DynReservoir::new(k), DynHeap::new(k), rng),
        }
    }

    /// Explicitly allocates the backing element buffer and priority heap
    /// ahead of the first `sample` call.
    ///
    /// # Panics
    /// Panics if either buffer is already allocated.
    ///
    /// # Errors
    /// Returns [`AllocError`] if either reservation fails. The heap is
    /// reserved first; if the element buffer's reservation then fails, the
    /// heap is left allocated (the two are independent allocations — see
    /// `DESIGN.md`), but no half-built buffer of either kind is ever
    /// observable.
    pub fn allocate(&mut self) -> Result<(), AllocError> {
        self.engine.heap_mut().allocate()?;
        self.engine.store_mut().allocate()
    }

    /// Capacity `k` this sampler was constructed with.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.engine.capacity()
    }

    /// Number of elements currently retained (`<= capacity()`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    /// Offers one stream element with its weight.
    ///
    /// A weight `<= 0` is ignored outright: the element is treated as absent
    /// from the stream and no sampler state changes, regardless of whether
    /// the reservoir is still filling or already full.
    ///
    /// # Panics
    /// Panics (debug only, via `expect` in release) if `weight` cannot be
    /// represented in `R`.
    pub fn sample(&mut self, element: T, weight: W)
    where
        W: NumCast,
    {
        self.engine.sample(element, weight);
    }

    /// True iff offering weight `w` next would exhaust the weight budget,
    /// i.e. `sample` would actually evaluate the element rather than
    /// silently discard it. Unconditionally `true` while the reservoir is
    /// still filling.
    pub fn will_next_be_considered(&mut self, weight: W) -> bool
    where
        W: NumCast + Copy,
    {
        self.engine.will_next_be_considered(weight)
    }

    /// Declares that one stream element of weight `weight` passed without
    /// being materialized, debiting it from the weight budget without
    /// touching the reservoir.
    ///
    /// # Panics (debug only)
    /// Panics if [`will_next_be_considered`](Self::will_next_be_considered)
    /// would return `true` for the same weight.
    pub fn skip_next(&mut self, weight: W)
    where
        W: NumCast + Copy,
    {
        self.engine.skip_next(weight);
    }

    #[must_use]
    pub fn peek_result(&self) -> &[T] {
        self.engine.peek_result()
    }

    pub fn consume_result(&mut self) -> Vec<T> {
        self.engine.consume_result()
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn allocate_reserves_both_buffers_up_front() {
        let mut sampler: WeightedSamplerDynamic<u32, f64, f64, _> =
            WeightedSamplerDynamic::with_rng(3, Xoshiro256PlusPlus::seed_from_u64(6));
        sampler.allocate().expect("reservation should succeed");
        sampler.sample(1, 1.0);
        sampler.sample(2, 1.0);
        assert_eq!(sampler.len(), 2);
    }

    #[test]
    fn fills_reservoir_before_eviction_begins() {
        let mut sampler: WeightedSamplerDynamic<u32, f64, f64, _> =
            WeightedSamplerDynamic::with_rng(3, Xoshiro256PlusPlus::seed_from_u64(1));
        sampler.sample(1, 1.0);
        sampler.sample(2, 1.0);
        assert_eq!(sampler.len(), 2);
    }

    #[test]
    fn result_size_never_exceeds_capacity() {
        let mut sampler: WeightedSamplerDynamic<u32, f64, f64, _> =
            WeightedSamplerDynamic::with_rng(5, Xoshiro256PlusPlus::seed_from_u64(2));
        for v in 0..5000 {
            sampler.sample(v, 1.0 + f64::from(v % 7));
        }
        assert_eq!(sampler.len(), 5);
    }

    #[test]
    fn zero_weight_element_never_survives_a_full_reservoir() {
        let mut sampler: WeightedSamplerDynamic<&str, f64, f64, _> =
            WeightedSamplerDynamic::with_rng(2, Xoshiro256PlusPlus::seed_from_u64(3));
        sampler.sample("a", 1.0);
        sampler.sample("b", 1.0);
        for _ in 0..200 {
            sampler.sample("zero", 0.0);
            sampler.sample("heavy", 50.0);
        }
        assert!(!sampler.peek_result().contains(&"zero"));
    }

    #[test]
    fn zero_and_negative_weight_elements_are_ignored_while_filling() {
        // Regression test: a zero/negative weight must never consume a
        // reservoir slot, even before the reservoir is full.
        let mut sampler: WeightedSamplerDynamic<&str, f64, f64, _> =
            WeightedSamplerDynamic::with_rng(3, Xoshiro256PlusPlus::seed_from_u64(5));
        sampler.sample("zero", 0.0);
        sampler.sample("negative", -1.0);
        sampler.sample("zero", 0.0);
        assert!(sampler.is_empty());

        sampler.sample("a", 1.0);
        assert_eq!(sampler.len(), 1);
        assert_eq!(sampler.peek_result(), ["a"]);
    }

    #[test]
    fn heavily_weighted_elements_dominate_small_reservoir() {
        let mut heavy_hits = 0u32;
        let trials = 200u32;
        let mut seeder = Xoshiro256PlusPlus::seed_from_u64(123);

        for _ in 0..trials {
            let seed = rand::Rng::gen::<u64>(&mut seeder);
            let mut sampler: WeightedSamplerDynamic<&str, f64, f64, _> =
                WeightedSamplerDynamic::with_rng(1, Xoshiro256PlusPlus::seed_from_u64(seed));
            sampler.sample("light", 1.0);
            sampler.sample("heavy", 99.0);
            if sampler.peek_result() == ["heavy"] {
                heavy_hits += 1;
            }
        }

        assert!(
            heavy_hits > trials * 8 / 10,
            "expected the heavy element to dominate, got {heavy_hits}/{trials}"
        );
    }

    #[test]
    fn consume_result_drains_and_resets() {
        let mut sampler: WeightedSamplerDynamic<u32, f64, f64, _> =
            WeightedSamplerDynamic::with_rng(2, Xoshiro256PlusPlus::seed_from_u64(4));
        sampler.sample(1, 1.0);
        sampler.sample(2, 1.0);
        let out = sampler.consume_result();
        assert_eq!(out.len(), 2);
        assert!(sampler.is_empty());
    }

    #[test]
    fn peek_protocol_matches_direct_sampling() {
        let stream: Vec<(u32, f64)> = (0..500).map(|v| (v, 1.0 + f64::from(v % 13))).collect();

        let mut direct: WeightedSamplerDynamic<u32, f64, f64, _> =
            WeightedSamplerDynamic::with_rng(6, Xoshiro256PlusPlus::seed_from_u64(42));
        for &(v, w) in &stream {
            direct.sample(v, w);
        }

        let mut peeked: WeightedSamplerDynamic<u32, f64, f64, _> =
            WeightedSamplerDynamic::with_rng(6, Xoshiro256PlusPlus::seed_from_u64(42));
        for &(v, w) in &stream {
            if peeked.will_next_be_considered(w) {
                peeked.sample(v, w);
            } else {
                peeked.skip_next(w);
            }
        }

        assert_eq!(direct.peek_result(), peeked.peek_result());
    }

    #[test]
    fn clone_is_an_independent_deep_copy() {
        let mut original: WeightedSamplerDynamic<u32, f64, f64, _> =
            WeightedSamplerDynamic::with_rng(3, Xoshiro256PlusPlus::seed_from_u64(77));
        for v in 0..50u32 {
            original.sample(v, 1.0 + f64::from(v % 5));
        }
        let mut cloned = original.clone();
        assert_eq!(original.peek_result(), cloned.peek_result());

        for v in 50..100u32 {
            original.sample(v, 1.0 + f64::from(v % 5));
            cloned.sample(v, 1.0 + f64::from(v % 5));
        }
        assert_eq!(original.peek_result(), cloned.peek_result());
    }

    #[test]
    fn many_evictions_preserve_slot_index_permutation_invariant() {
        // Regression test: a prior bug hardcoded the post-eviction heap
        // entry's slot_index to 0 instead of the freed slot, which this
        // drives past many evictions to catch via `peek_result` staying a
        // believable view (no panics from an out-of-range slot_index, no
        // duplicated/missing elements).
        let mut sampler: WeightedSamplerDynamic<u32, f64, f64, _> =
            WeightedSamplerDynamic::with_rng(4, Xoshiro256PlusPlus::seed_from_u64(999));
        for v in 0..2000u32 {
            sampler.sample(v, 1.0 + f64::from(v % 17));
        }
        let result = sampler.peek_result();
        assert_eq!(result.len(), 4);
        let mut sorted = result.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 4, "reservoir held a duplicate element: {result:?}");
    }
}
