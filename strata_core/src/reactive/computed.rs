// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazily evaluated, cached derived values.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};

use super::runtime::{Invalidate, RuntimeInner};

struct ComputedInner<T> {
    runtime: Weak<RuntimeInner>,
    key: u32,
    compute: RefCell<Box<dyn FnMut() -> T>>,
    value: RefCell<Option<T>>,
    dirty: Cell<bool>,
    evaluating: Cell<bool>,
    destroyed: Cell<bool>,
}

impl<T> Invalidate for ComputedInner<T> {
    fn invalidate(&self) {
        self.dirty.set(true);
    }
}

impl<T> Drop for ComputedInner<T> {
    fn drop(&mut self) {
        if !self.destroyed.get()
            && let Some(runtime) = self.runtime.upgrade()
        {
            runtime.free_key(self.key);
        }
    }
}

/// A derived value that caches its result until a dependency changes.
///
/// The compute function runs on the first read and again on the first read
/// after any [`Observable`](super::Observable) or other `Computed` it read
/// has changed. Dependencies are re-collected on every evaluation, so
/// branches that stop reading a value also stop depending on it.
///
/// Cloning yields another handle to the same cached value.
pub struct Computed<T> {
    inner: Rc<ComputedInner<T>>,
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Computed")
            .field("key", &self.inner.key)
            .field("dirty", &self.inner.dirty.get())
            .field("value", &self.inner.value.borrow())
            .finish()
    }
}

impl<T: 'static> Computed<T> {
    pub(crate) fn new(runtime: &Rc<RuntimeInner>, compute: impl FnMut() -> T + 'static) -> Self {
        let key = runtime.alloc_key(None);
        let inner = Rc::new(ComputedInner {
            runtime: Rc::downgrade(runtime),
            key,
            compute: RefCell::new(Box::new(compute)),
            value: RefCell::new(None),
            dirty: Cell::new(true),
            evaluating: Cell::new(false),
            destroyed: Cell::new(false),
        });
        let weak: Weak<ComputedInner<T>> = Rc::downgrade(&inner);
        let sink: Weak<dyn Invalidate> = weak;
        runtime.set_sink(key, sink);
        Self { inner }
    }

    /// Reads the value through `f`, evaluating first if stale.
    ///
    /// When called while another computed value is evaluating, that value
    /// becomes dependent on this one.
    ///
    /// # Panics
    ///
    /// Panics if the compute function reads this value again (a cycle).
    pub fn with<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        let runtime = self.inner.runtime.upgrade();
        self.refresh(runtime.as_deref());
        if !self.inner.destroyed.get()
            && let Some(runtime) = &runtime
        {
            runtime.track(self.inner.key);
        }
        let value = self.inner.value.borrow();
        match value.as_ref() {
            Some(v) => f(v),
            None => unreachable!("refresh stores a value before clearing the dirty flag"),
        }
    }

    /// Returns a clone of the value, evaluating first if stale.
    #[must_use]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Returns `true` if the next read will run the compute function.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.get()
    }

    /// Unsubscribes from every dependency and clears the cached value.
    ///
    /// A destroyed value still answers reads, but evaluates on every read and
    /// is no longer tracked by other computed values. Dropping the last
    /// handle has the same effect on the graph.
    pub fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }
        if let Some(runtime) = self.inner.runtime.upgrade() {
            runtime.free_key(self.inner.key);
        }
        self.inner.value.borrow_mut().take();
        self.inner.dirty.set(true);
    }

    fn refresh(&self, runtime: Option<&RuntimeInner>) {
        let inner = &*self.inner;
        if !inner.dirty.get() {
            return;
        }
        assert!(
            !inner.evaluating.replace(true),
            "cycle detected: computed value {} read itself during evaluation",
            inner.key
        );
        let tracked = runtime.filter(|_| !inner.destroyed.get());
        if let Some(runtime) = tracked {
            runtime.begin_evaluation(inner.key);
        }
        let value = (inner.compute.borrow_mut())();
        if let Some(runtime) = tracked {
            runtime.end_evaluation(inner.key);
        }
        inner.evaluating.set(false);
        *inner.value.borrow_mut() = Some(value);
        // Destroyed values are never cached.
        inner.dirty.set(inner.destroyed.get());
    }
}
