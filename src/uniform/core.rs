//! Algorithm L: the shared engine behind both uniform sampler variants.

use std::marker::PhantomData;

use rand::{Rng, RngCore};

use crate::slot::Store;

pub(crate) struct Engine<T, S, G> {
    store: S,
    rng: G,
    /// Geometric-transform parameter `w`, meaningful only once the reservoir
    /// is full.
    w: f64,
    skip_count: usize,
    _payload: PhantomData<T>,
}

impl<T, S: Clone, G: Clone> Clone for Engine<T, S, G> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            rng: self.rng.clone(),
            w: self.w,
            skip_count: self.skip_count,
            _payload: PhantomData,
        }
    }
}

impl<T, S, G> Engine<T, S, G>
where
    S: Store<T>,
    G: RngCore,
{
    pub(crate) fn new(store: S, rng: G) -> Self {
        Self {
            store,
            rng,
            w: 0.0,
            skip_count: 0,
            _payload: PhantomData,
        }
    }

    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
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
        self.w = 0.0;
        self.skip_count = 0;
        self.store.take()
    }

    pub(crate) fn reset(&mut self) {
        self.w = 0.0;
        self.skip_count = 0;
        self.store.reset();
    }

    /// True while filling (every element is considered), or once the skip
    /// counter has reached zero.
    pub(crate) fn will_next_be_considered(&self) -> bool {
        self.store.filled() < self.store.capacity() || self.skip_count == 0
    }

    pub(crate) fn skipped_count(&self) -> usize {
        self.skip_count
    }

    pub(crate) fn skip_next(&mut self) {
        debug_assert!(
            !self.will_next_be_considered(),
            "skip_next called when the next element would be considered"
        );
        self.skip_count -= 1;
    }

    pub(crate) fn jump_ahead(&mut self, n: usize) {
        debug_assert!(
            n <= self.skip_count,
            "jump_ahead({n}) exceeds skipped_count({})",
            self.skip_count
        );
        self.skip_count -= n;
    }

    pub(crate) fn sample(&mut self, element: T) {
        let filled = self.store.filled();
        let cap = self.store.capacity();

        if filled < cap {
            self.store.push(element);
            if filled + 1 == cap {
                self.enter_sampling_phase();
            }
            return;
        }

        if self.skip_count > 0 {
            self.skip_count -= 1;
            return;
        }

        let idx = self.rng.gen_range(0..cap);
        self.store.replace(idx, element);
        self.advance_w();
    }

    fn enter_sampling_phase(&mut self) {
        let k = self.store.capacity() as f64;
        self.w = (self.uniform_open().ln() / k).exp();
        self.refresh_skip_count();
    }

    fn advance_w(&mut self) {
        let k = self.store.capacity() as f64;
        self.w *= (self.uniform_open().ln() / k).exp();
        self.refresh_skip_count();
    }

    fn refresh_skip_count(&mut self) {
        let u2 = self.uniform_open();
        // w is strictly in (0,1) by construction, so ln(1-w) < 0.
        self.skip_count = (u2.ln() / (1.0 - self.w).ln()).floor() as usize;
    }

    fn uniform_open(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}
