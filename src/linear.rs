//! Single-slot weighted reservoir sampling over integer weights.
//!
//! `LinearWeightedSingle` selects exactly one element from a stream with
//! probability proportional to its weight, processing each element in O(1)
//! amortized work and O(n) total for a stream of length n. It has no skip
//! protocol: A-ExpJ's jump-ahead trick only pays off once the reservoir holds
//! more than one candidate, so for `k = 1` the straightforward
//! running-total/acceptance-test algorithm is both simpler and exactly as fast.

use num_traits::{PrimInt, Unsigned, Zero};
use rand::distributions::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Selects one element from a weighted stream.
///
/// # Example
/// ```
/// use reservoir_sampler::LinearWeightedSingle;
///
/// let mut sampler: LinearWeightedSingle<&str, u32> = LinearWeightedSingle::new();
/// sampler.sample("rare", 1);
/// sampler.sample("common", 999);
/// assert!(sampler.peek_result().is_some());
/// ```
#[derive(Clone)]
pub struct LinearWeightedSingle<T, W, G = StdRng> {
    rng: G,
    current: Option<T>,
    total_weight: W,
}

impl<T, W> LinearWeightedSingle<T, W, StdRng>
where
    W: PrimInt + Unsigned + Zero,
{
    /// Creates a sampler seeded from a nondeterministic source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<T, W> Default for LinearWeightedSingle<T, W, StdRng>
where
    W: PrimInt + Unsigned + Zero,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, W, G> LinearWeightedSingle<T, W, G>
where
    W: PrimInt + Unsigned + Zero,
    G: RngCore,
{
    /// Creates a sampler driven by `rng`.
    pub fn with_rng(rng: G) -> Self {
        Self {
            rng,
            current: None,
            total_weight: W::zero(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Running total of every nonzero weight seen so far.
    #[must_use]
    pub fn total_weight(&self) -> W {
        self.total_weight
    }

    /// Offers one stream element with its weight.
    ///
    /// A weight of zero is legal and never changes the current selection.
    ///
    /// # Panics
    /// Panics (debug builds only) if `total_weight() + weight` overflows `W`.
    pub fn sample(&mut self, element: T, weight: W)
    where
        W: SampleUniform,
    {
        if weight.is_zero() {
            return;
        }
        let new_total = self.total_weight + weight;
        if self.current.is_none() {
            self.current = Some(element);
            self.total_weight = new_total;
            return;
        }
        let draw = self.rng.gen_range(W::zero()..new_total);
        if draw < weight {
            self.current = Some(element);
        }
        self.total_weight = new_total;
    }

    /// Borrowed view over the current selection, if any element has been offered yet.
    #[must_use]
    pub fn peek_result(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Takes ownership of the current selection and resets the sampler.
    pub fn consume_result(&mut self) -> Option<T> {
        self.total_weight = W::zero();
        self.current.take()
    }

    /// Drops the current selection and returns the sampler to empty.
    pub fn reset(&mut self) {
        self.total_weight = W::zero();
        self.current = None;
    }
}
