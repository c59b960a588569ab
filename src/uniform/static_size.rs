use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::core::Engine;
use crate::slot::Reservoir;

/// Uniform reservoir sampler (Algorithm L) with a compile-time capacity `K`.
///
/// Identical semantics to [`UniformSamplerDynamic`](crate::UniformSamplerDynamic),
/// but the reservoir lives inline — no heap allocation at all.
///
/// # Example
/// ```
/// use reservoir_sampler::UniformSamplerStatic;
///
/// let mut sampler: UniformSamplerStatic<u32, 3> = UniformSamplerStatic::new();
/// for value in 0..1000 {
///     sampler.sample(value);
/// }
/// assert_eq!(sampler.len(), 3);
/// ```
pub struct UniformSamplerStatic<T, const K: usize, G = StdRng> {
    engine: Engine<T, Reservoir<T, K>, G>,
}

impl<T: Clone, const K: usize, G: Clone> Clone for UniformSamplerStatic<T, K, G> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
        }
    }
}

impl<T, const K: usize> UniformSamplerStatic<T, K, StdRng> {
    /// Creates a sampler seeded from a nondeterministic source.
    ///
    /// # Panics
    /// Panics if `K == 0`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<T, const K: usize> Default for UniformSamplerStatic<T, K, StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const K: usize, G: RngCore> UniformSamplerStatic<T, K, G> {
    /// Creates a sampler driven by `rng`.
    ///
    /// # Panics
    /// Panics if `K == 0`.
    pub fn with_rng(rng: G) -> Self {
        Self {
            engine: Engine::new(Reservoir::new(), rng),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.engine.capacity()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    #[must_use]
    pub fn will_next_be_considered(&self) -> bool {
        self.engine.will_next_be_considered()
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.engine.skipped_count()
    }

    pub fn skip_next(&mut self) {
        self.engine.skip_next();
    }

    pub fn jump_ahead(&mut self, n: usize) {
        self.engine.jump_ahead(n);
    }

    pub fn sample(&mut self, element: T) {
        self.engine.sample(element);
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
