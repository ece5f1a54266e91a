// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observable cells with change notification.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use super::runtime::RuntimeInner;

type Observer<T> = Rc<RefCell<dyn FnMut(&T, &T)>>;

struct ObservableInner<T> {
    runtime: Weak<RuntimeInner>,
    key: u32,
    value: RefCell<Rc<T>>,
    observers: RefCell<Vec<(u64, Observer<T>)>>,
    next_observer: Cell<u64>,
}

impl<T> Drop for ObservableInner<T> {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.upgrade() {
            runtime.free_key(self.key);
        }
    }
}

trait Detach {
    fn detach(&self, id: u64);
}

impl<T> Detach for ObservableInner<T> {
    fn detach(&self, id: u64) {
        self.observers.borrow_mut().retain(|(oid, _)| *oid != id);
    }
}

/// A mutable value whose writes notify observers and invalidate dependents.
///
/// Reading through [`get`](Self::get) or [`with`](Self::with) while a
/// [`Computed`](super::Computed) is evaluating registers that computed value
/// as a dependent. Every [`set`](Self::set) first invalidates all transitive
/// dependents, then calls each observer with `(old, new)`.
///
/// Cloning yields another handle to the same cell.
pub struct Observable<T> {
    inner: Rc<ObservableInner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Observable")
            .field("key", &self.inner.key)
            .field("value", &**self.inner.value.borrow())
            .field("observers", &self.inner.observers.borrow().len())
            .finish()
    }
}

impl<T: 'static> Observable<T> {
    pub(crate) fn new(runtime: &Rc<RuntimeInner>, value: T) -> Self {
        let key = runtime.alloc_key(None);
        Self {
            inner: Rc::new(ObservableInner {
                runtime: Rc::downgrade(runtime),
                key,
                value: RefCell::new(Rc::new(value)),
                observers: RefCell::new(Vec::new()),
                next_observer: Cell::new(0),
            }),
        }
    }

    /// Reads the value through `f`, recording a dependency if a computed
    /// value is evaluating.
    pub fn with<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        if let Some(runtime) = self.inner.runtime.upgrade() {
            runtime.track(self.inner.key);
        }
        f(&self.snapshot())
    }

    /// Returns a clone of the value, recording a dependency.
    #[must_use]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Reads the value without recording a dependency.
    pub fn peek<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        f(&self.snapshot())
    }

    /// The current value, without holding the cell borrowed.
    fn snapshot(&self) -> Rc<T> {
        Rc::clone(&self.inner.value.borrow())
    }

    /// Writes a new value and returns the previous one.
    ///
    /// Dependents are invalidated and observers notified on every write,
    /// including writes of an equal value. Observers may write to this
    /// cell again; a nested write notifies every observer except the one
    /// currently running.
    pub fn replace(&self, value: T) -> Rc<T> {
        let new = Rc::new(value);
        let old = self.inner.value.replace(Rc::clone(&new));
        if let Some(runtime) = self.inner.runtime.upgrade() {
            runtime.notify_changed(self.inner.key);
        }
        // Snapshot so observers may subscribe or unsubscribe while running.
        let observers: Vec<Observer<T>> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, o)| Rc::clone(o))
            .collect();
        for observer in observers {
            // An observer writing back is not re-entered by its own write.
            if let Ok(mut observer) = observer.try_borrow_mut() {
                (*observer)(&*old, &*new);
            }
        }
        old
    }

    /// Writes a new value.
    pub fn set(&self, value: T) {
        drop(self.replace(value));
    }

    /// Mutates the value in place through `f`, then notifies.
    pub fn update(&self, f: impl FnOnce(&mut T))
    where
        T: Clone,
    {
        let mut next = T::clone(&self.snapshot());
        f(&mut next);
        self.set(next);
    }

    /// Registers `observer`, called with `(old, new)` after each write.
    ///
    /// The observer stays registered until the returned [`Subscription`] is
    /// dropped or [`unsubscribe`](Subscription::unsubscribe)d.
    #[must_use = "dropping the subscription unregisters the observer"]
    pub fn observe(&self, observer: impl FnMut(&T, &T) + 'static) -> Subscription {
        let id = self.inner.next_observer.get();
        self.inner.next_observer.set(id + 1);
        let observer: Observer<T> = Rc::new(RefCell::new(observer));
        self.inner.observers.borrow_mut().push((id, observer));
        let weak: Weak<ObservableInner<T>> = Rc::downgrade(&self.inner);
        let source: Weak<dyn Detach> = weak;
        Subscription { source, id }
    }
}

/// Registration handle returned by [`Observable::observe`].
pub struct Subscription {
    source: Weak<dyn Detach>,
    id: u64,
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("live", &(self.source.strong_count() > 0))
            .finish()
    }
}

impl Subscription {
    /// Unregisters the observer.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(source) = self.source.upgrade() {
            source.detach(self.id);
        }
    }
}
