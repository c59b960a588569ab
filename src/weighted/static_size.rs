use num_traits::{Float, FromPrimitive, NumCast};
use rand::distributions::Standard;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::core::Engine;
use super::heap::FixedHeap;
use crate::slot::Reservoir;

/// Weighted reservoir sampler (Algorithm A-ExpJ) with a compile-time capacity `K`.
///
/// Identical semantics to
/// [`WeightedSamplerDynamic`](crate::WeightedSamplerDynamic), but both the
/// element buffer and the selection heap live inline.
///
/// # Example
/// ```
/// use reservoir_sampler::WeightedSamplerStatic;
///
/// let mut sampler: WeightedSamplerStatic<&str, f64, f64, 2> = WeightedSamplerStatic::new();
/// sampler.sample("rare", 1.0);
/// sampler.sample("common", 100.0);
/// assert_eq!(sampler.len(), 2);
/// ```
pub struct WeightedSamplerStatic<T, W, R, const K: usize, G = StdRng> {
    engine: Engine<T, W, R, Reservoir<T, K>, FixedHeap<R, K>, G>,
}

impl<T: Clone, W, R: Copy, const K: usize, G: Clone> Clone for WeightedSamplerStatic<T, W, R, K, G> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
        }
    }
}

impl<T, W, R, const K: usize> WeightedSamplerStatic<T, W, R, K, StdRng>
where
    R: Float + FromPrimitive + Default,
    Standard: Distribution<R>,
{
    /// Creates a sampler seeded from a nondeterministic source.
    ///
    /// # Panics
    /// Panics if `K == 0`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<T, W, R, const K: usize> Default for WeightedSamplerStatic<T, W, R, K, StdRng>
where
    R: Float + FromPrimitive + Default,
    Standard: Distribution<R>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, W, R, const K: usize, G> WeightedSamplerStatic<T, W, R, K, G>
where
    R: Float + FromPrimitive + Default,
    G: RngCore,
    Standard: Distribution<R>,
{
    /// Creates a sampler driven by `rng`.
    ///
    /// # Panics
    /// Panics if `K == 0`.
    pub fn with_rng(rng: G) -> Self {
        Self {
            engine: Engine::new(Reservoir::new(), FixedHeap::new(), rng),
        }
    }

    /// Capacity `K` this sampler was constructed with.
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
    /// Panics if `weight` cannot be represented in `R`.
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
