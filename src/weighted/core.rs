//! Algorithm A-ExpJ: the shared engine behind both weighted sampler variants.
//!
//! Each accepted element carries a key `r = u^(1/w)` for `u ~ Uniform(0,1)`;
//! the `k` elements with the largest keys are retained, which is equivalent
//! (by monotonicity of `u^(1/w)` in `u`) to retaining the `k` smallest values
//! of `-u^(1/w)`. The heap stores that negated value, so its root — the
//! largest stored key — is always the weakest surviving candidate, matching
//! [`crate::weighted::heap`]'s max-heap-by-key contract without reinventing it.
//!
//! Once the reservoir is full, the threshold `T_w` (root key, negated back to
//! `r`-space) bounds how small a future element's own `u` must be to have any
//! chance of entering. Rather than drawing `u` for every rejected element,
//! the exponential-jump step draws a total weight-mass `X_w` that must
//! accumulate before the next contender is even evaluated.

use std::marker::PhantomData;

use num_traits::{Float, FromPrimitive, NumCast};
use rand::distributions::Standard;
use rand::prelude::Distribution;
use rand::{Rng, RngCore};

use super::heap::{HeapEntry, HeapStore};
use crate::slot::Store;

pub(crate) struct Engine<T, W, R, S, H, G> {
    store: S,
    heap: H,
    rng: G,
    /// Weight accumulated since the last jump target was drawn.
    pending_weight: R,
    /// Weight-mass that must accumulate before the next contender is evaluated.
    skip_target: R,
    has_skip_target: bool,
    _payload: PhantomData<(T, W)>,
}

impl<T, W, R: Copy, S: Clone, H: Clone, G: Clone> Clone for Engine<T, W, R, S, H, G> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            heap: self.heap.clone(),
            rng: self.rng.clone(),
            pending_weight: self.pending_weight,
            skip_target: self.skip_target,
            has_skip_target: self.has_skip_target,
            _payload: PhantomData,
        }
    }
}

impl<T, W, R, S, H, G> Engine<T, W, R, S, H, G>
where
    R: Float + FromPrimitive,
    S: Store<T>,
    H: HeapStore<R>,
    G: RngCore,
    Standard: Distribution<R>,
{
    pub(crate) fn new(store: S, heap: H, rng: G) -> Self {
        Self {
            store,
            heap,
            rng,
            pending_weight: R::zero(),
            skip_target: R::zero(),
            has_skip_target: false,
            _payload: PhantomData,
        }
    }

    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub(crate) fn heap_mut(&mut self) -> &mut H {
        &mut self.heap
    }

    pub(crate) fn capacity(&self) -> usize {
        self.store.capacity()
    }

    pub(crate) fn len(&self) -> usize {
        self.store.filled()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn peek_result(&self) -> &[T] {
        self.store.as_slice()
    }

    pub(crate) fn consume_result(&mut self) -> Vec<T> {
        self.pending_weight = R::zero();
        self.has_skip_target = false;
        self.heap.clear();
        self.store.take()
    }

    pub(crate) fn reset(&mut self) {
        self.pending_weight = R::zero();
        self.has_skip_target = false;
        self.heap.clear();
        self.store.reset();
    }

    pub(crate) fn sample(&mut self, element: T, weight: W)
    where
        W: NumCast,
    {
        let w: R = num_traits::cast(weight)
            .expect("weight exceeds the range representable by the key type");

        if w <= R::zero() {
            return;
        }

        let filled = self.store.filled();
        let cap = self.store.capacity();

        if filled < cap {
            let key = self.draw_key(w);
            self.store.push(element);
            self.heap.push(HeapEntry {
                key,
                slot_index: filled,
            });
            return;
        }

        if !self.has_skip_target {
            self.refresh_skip_target();
        }

        self.pending_weight = self.pending_weight + w;
        if self.pending_weight <= self.skip_target {
            return;
        }

        let root_entry = self.heap.root();
        let threshold = -root_entry.key;
        let t_w = threshold.powf(w);
        let u = t_w + self.uniform_open() * (R::one() - t_w);
        let new_key = -u.powf(R::one() / w);

        let evicted = self.heap.replace_root(HeapEntry {
            key: new_key,
            slot_index: root_entry.slot_index,
        });
        self.store.replace(evicted.slot_index, element);

        self.pending_weight = R::zero();
        self.has_skip_target = false;
    }

    /// True iff offering weight `w` next would exhaust the current weight
    /// budget, i.e. `sample` would actually evaluate the element for
    /// replacement rather than silently skip it.
    ///
    /// A non-positive `w` is never considered — `sample` ignores it outright
    /// regardless of phase, matching the "domain-benign input" rule for
    /// non-positive weights. Otherwise, during the filling phase every
    /// offered element is accepted outright, so this is unconditionally
    /// `true` until the reservoir is full (see the crate's docs on the
    /// source algorithm's vacuous-during-filling predicate).
    pub(crate) fn will_next_be_considered(&mut self, w: W) -> bool
    where
        W: NumCast,
    {
        let w: R = num_traits::cast(w)
            .expect("weight exceeds the range representable by the key type");
        if w <= R::zero() {
            return false;
        }
        if self.store.filled() < self.store.capacity() {
            return true;
        }
        if !self.has_skip_target {
            self.refresh_skip_target();
        }
        self.pending_weight + w > self.skip_target
    }

    /// Declares that one stream element of weight `w` passed without being
    /// materialized, debiting it from the weight budget without touching the
    /// reservoir.
    ///
    /// # Panics (debug only)
    /// Panics if [`will_next_be_considered`](Self::will_next_be_considered)
    /// would return `true` for the same `w`.
    pub(crate) fn skip_next(&mut self, w: W)
    where
        W: NumCast + Copy,
    {
        debug_assert!(
            !self.will_next_be_considered(w),
            "skip_next called when the next element would be considered"
        );
        let w: R = num_traits::cast(w)
            .expect("weight exceeds the range representable by the key type");
        if w <= R::zero() {
            return;
        }
        self.pending_weight = self.pending_weight + w;
    }

    fn refresh_skip_target(&mut self) {
        let threshold = -self.heap.root().key;
        let r2 = self.uniform_open();
        self.skip_target = r2.ln() / threshold.ln();
        self.has_skip_target = true;
    }

    fn draw_key(&mut self, w: R) -> R {
        let u = self.uniform_open();
        -u.powf(R::one() / w)
    }

    fn uniform_open(&mut self) -> R {
        self.rng.sample(Standard)
    }
}
