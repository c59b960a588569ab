use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::core::Engine;
use crate::error::AllocError;
use crate::slot::DynReservoir;

/// Uniform reservoir sampler (Algorithm L) with a runtime-chosen capacity `k`.
///
/// Every element offered to [`sample`](Self::sample) is equally likely to end
/// up in the final reservoir; after n accepted elements, every k-subset of
/// the first n is equally likely to be the final reservoir.
///
/// # Example
/// ```
/// use reservoir_sampler::UniformSamplerDynamic;
///
/// let mut sampler = UniformSamplerDynamic::new(3);
/// for value in 0..1000 {
///     sampler.sample(value);
/// }
/// assert_eq!(sampler.len(), 3);
/// ```
pub struct UniformSamplerDynamic<T, G = StdRng> {
    engine: Engine<T, DynReservoir<T>, G>,
}

impl<T: Clone, G: Clone> Clone for UniformSamplerDynamic<T, G> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
        }
    }
}

impl<T> UniformSamplerDynamic<T, StdRng> {
    /// Creates a sampler with capacity `k`, seeded from a nondeterministic source.
    ///
    /// # Panics
    /// Panics if `k == 0`.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self::with_rng(k, StdRng::from_entropy())
    }
}

impl<T, G: RngCore> UniformSamplerDynamic<T, G> {
    /// Creates a sampler with capacity `k`, driven by `rng`.
    ///
    /// `rng` may be an owned generator or a `&mut` borrow of one — both
    /// satisfy `RngCore` (the latter via `rand`'s blanket impl), so there is
    /// no separate "borrowed" constructor.
    ///
    /// # Panics
    /// Panics if `k == 0`.
    pub fn with_rng(k: usize, rng: G) -> Self {
        Self {
            engine: Engine::new(DynReservoir::new(k), rng),
        }
    }

    /// Explicitly allocates the backing buffer ahead of the first `sample` call.
    ///
    /// Calling this is optional: the buffer allocates lazily on first
    /// acceptance otherwise.
    ///
    /// # Panics
    /// Panics if the buffer is already allocated.
    ///
    /// # Errors
    /// Returns [`AllocError`] if the allocation itself fails.
    pub fn allocate(&mut self) -> Result<(), AllocError> {
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

    /// True iff the next `sample` call will examine its argument rather than
    /// skip it outright.
    #[must_use]
    pub fn will_next_be_considered(&self) -> bool {
        self.engine.will_next_be_considered()
    }

    /// Remaining number of elements that may be declined without examination.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.engine.skipped_count()
    }

    /// Declares that one stream element passed without being materialized.
    ///
    /// # Panics (debug only)
    /// Panics if [`will_next_be_considered`](Self::will_next_be_considered) is `true`.
    pub fn skip_next(&mut self) {
        self.engine.skip_next();
    }

    /// Advances the skip counter by `n` in one step.
    ///
    /// # Panics (debug only)
    /// Panics if `n > skipped_count()`.
    pub fn jump_ahead(&mut self, n: usize) {
        self.engine.jump_ahead(n);
    }

    /// Offers one stream element; it may be accepted, replace an incumbent,
    /// or be discarded.
    pub fn sample(&mut self, element: T) {
        self.engine.sample(element);
    }

    /// Borrowed view over the retained elements. Order is unspecified.
    #[must_use]
    pub fn peek_result(&self) -> &[T] {
        self.engine.peek_result()
    }

    /// Takes ownership of the retained elements and resets the sampler.
    pub fn consume_result(&mut self) -> Vec<T> {
        self.engine.consume_result()
    }

    /// Drops any retained elements and returns the sampler to empty.
    pub fn reset(&mut self) {
        self.engine.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn short_stream_keeps_everything() {
        let rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let mut sampler = UniformSamplerDynamic::with_rng(5, rng);
        sampler.sample(1);
        sampler.sample(2);
        assert_eq!(sampler.peek_result(), &[1, 2]);
    }

    #[test]
    fn result_size_never_exceeds_capacity() {
        let rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let mut sampler = UniformSamplerDynamic::with_rng(10, rng);
        for v in 0..10_000 {
            sampler.sample(v);
        }
        assert_eq!(sampler.len(), 10);
    }

    #[test]
    fn peek_protocol_matches_direct_sampling() {
        let stream: Vec<u32> = (0..500).collect();

        let mut direct = UniformSamplerDynamic::with_rng(7, Xoshiro256PlusPlus::seed_from_u64(42));
        for &v in &stream {
            direct.sample(v);
        }

        let mut peeked = UniformSamplerDynamic::with_rng(7, Xoshiro256PlusPlus::seed_from_u64(42));
        for &v in &stream {
            if peeked.will_next_be_considered() {
                peeked.sample(v);
            } else {
                peeked.skip_next();
            }
        }

        assert_eq!(direct.peek_result(), peeked.peek_result());
    }

    #[test]
    fn reset_then_replay_matches_fresh_sampler() {
        let stream: Vec<u32> = (0..200).collect();

        let mut warmed = UniformSamplerDynamic::with_rng(4, Xoshiro256PlusPlus::seed_from_u64(7));
        for &v in &stream {
            warmed.sample(v);
        }
        warmed.reset();
        for &v in &stream {
            warmed.sample(v);
        }

        let mut fresh = UniformSamplerDynamic::with_rng(4, Xoshiro256PlusPlus::seed_from_u64(7));
        for &v in &stream {
            fresh.sample(v);
        }

        assert_eq!(warmed.peek_result(), fresh.peek_result());
    }

    #[test]
    fn consume_result_drains_and_resets() {
        let mut sampler = UniformSamplerDynamic::with_rng(3, Xoshiro256PlusPlus::seed_from_u64(3));
        sampler.sample(1);
        sampler.sample(2);
        let out = sampler.consume_result();
        assert_eq!(out, vec![1, 2]);
        assert!(sampler.is_empty());
    }

    #[test]
    fn empty_stream_yields_empty_result() {
        let sampler: UniformSamplerDynamic<u32> =
            UniformSamplerDynamic::with_rng(2, Xoshiro256PlusPlus::seed_from_u64(9));
        assert!(sampler.peek_result().is_empty());
    }

    #[test]
    fn clone_is_an_independent_deep_copy() {
        let mut original =
            UniformSamplerDynamic::with_rng(3, Xoshiro256PlusPlus::seed_from_u64(13));
        for v in 0..50u32 {
            original.sample(v);
        }
        let mut cloned = original.clone();
        assert_eq!(original.peek_result(), cloned.peek_result());

        for v in 50..100u32 {
            original.sample(v);
            cloned.sample(v);
        }
        assert_eq!(
            original.peek_result(),
            cloned.peek_result(),
            "clone should track the same RNG state and diverge identically"
        );
    }

    #[test]
    fn uniform_index_frequency_within_tolerance() {
        let n = 10u32;
        let k = 3usize;
        let trials = 2000u32;
        let mut counts = vec![0u32; n as usize];

        let mut seeder = Xoshiro256PlusPlus::seed_from_u64(123);
        for _ in 0..trials {
            let seed = rand::Rng::gen::<u64>(&mut seeder);
            let mut sampler =
                UniformSamplerDynamic::with_rng(k, Xoshiro256PlusPlus::seed_from_u64(seed));
            for v in 0..n {
                sampler.sample(v);
            }
            for &v in sampler.peek_result() {
                counts[v as usize] += 1;
            }
        }

        let expected = f64::from(trials) * (k as f64) / f64::from(n);
        for &c in &counts {
            let freq = f64::from(c);
            assert!(
                (freq - expected).abs() < expected * 0.25,
                "count {c} too far from expected {expected}"
            );
        }
    }
}
