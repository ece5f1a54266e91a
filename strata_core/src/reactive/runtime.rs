// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared dependency graph and evaluation stack.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::computed::Computed;
use super::observable::Observable;
use crate::dirty;

/// Something that caches a derived value and can be told it is stale.
pub(crate) trait Invalidate {
    fn invalidate(&self);
}

#[derive(Default)]
struct Slot {
    /// Derived value to invalidate when this key is marked. `None` for
    /// observables and freed slots.
    sink: Option<Weak<dyn Invalidate>>,
    /// Keys read during the last evaluation (computed values only).
    sources: Vec<u32>,
}

pub(crate) struct RuntimeInner {
    graph: RefCell<DirtyTracker<u32>>,
    slots: RefCell<Vec<Slot>>,
    free_list: RefCell<Vec<u32>>,
    /// Keys of the computed values currently evaluating, innermost last.
    stack: RefCell<Vec<u32>>,
}

impl RuntimeInner {
    pub(crate) fn alloc_key(&self, sink: Option<Weak<dyn Invalidate>>) -> u32 {
        let mut slots = self.slots.borrow_mut();
        if let Some(key) = self.free_list.borrow_mut().pop() {
            slots[key as usize] = Slot {
                sink,
                sources: Vec::new(),
            };
            key
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "reactive key space is capped at u32::MAX live values"
            )]
            let key = slots.len() as u32;
            slots.push(Slot {
                sink,
                sources: Vec::new(),
            });
            key
        }
    }

    pub(crate) fn set_sink(&self, key: u32, sink: Weak<dyn Invalidate>) {
        self.slots.borrow_mut()[key as usize].sink = Some(sink);
    }

    /// Removes every edge touching `key` and recycles the slot.
    pub(crate) fn free_key(&self, key: u32) {
        self.clear_sources(key);
        self.graph.borrow_mut().remove_key(key);
        self.slots.borrow_mut()[key as usize] = Slot::default();
        self.free_list.borrow_mut().push(key);
    }

    /// Drops the edges recorded by the last evaluation of `key`.
    pub(crate) fn clear_sources(&self, key: u32) {
        let sources = core::mem::take(&mut self.slots.borrow_mut()[key as usize].sources);
        let mut graph = self.graph.borrow_mut();
        for source in sources {
            graph.remove_dependency(key, source, dirty::VALUE);
        }
    }

    /// Records a read of `source` by the innermost evaluating computed value.
    pub(crate) fn track(&self, source: u32) {
        let Some(&current) = self.stack.borrow().last() else {
            return;
        };
        if current == source {
            return;
        }
        let mut slots = self.slots.borrow_mut();
        let sources = &mut slots[current as usize].sources;
        if sources.contains(&source) {
            return;
        }
        if self
            .graph
            .borrow_mut()
            .add_dependency(current, source, dirty::VALUE)
            .is_ok()
        {
            sources.push(source);
        }
    }

    pub(crate) fn begin_evaluation(&self, key: u32) {
        self.clear_sources(key);
        self.stack.borrow_mut().push(key);
    }

    pub(crate) fn end_evaluation(&self, key: u32) {
        let popped = self.stack.borrow_mut().pop();
        debug_assert_eq!(popped, Some(key), "unbalanced computed evaluation");
    }

    /// Marks `source` changed and invalidates every transitive dependent.
    pub(crate) fn notify_changed(&self, source: u32) {
        let affected: Vec<u32> = {
            let mut graph = self.graph.borrow_mut();
            graph.mark_with(source, dirty::VALUE, &EagerPolicy);
            graph
                .drain(dirty::VALUE)
                .affected()
                .deterministic()
                .run()
                .collect()
        };
        // Upgrade outside the borrow: an invalidation never re-enters the
        // runtime, but dropping the last strong handle would.
        let sinks: Vec<Rc<dyn Invalidate>> = {
            let slots = self.slots.borrow();
            affected
                .iter()
                .filter(|&&key| key != source)
                .filter_map(|&key| slots.get(key as usize)?.sink.as_ref()?.upgrade())
                .collect()
        };
        for sink in sinks {
            sink.invalidate();
        }
    }
}

/// Owner of a reactive dependency graph.
///
/// A runtime hands out [`Observable`] and [`Computed`] values that share one
/// graph. Cloning a `Runtime` is cheap and yields another handle to the same
/// graph. Everything is single-threaded and synchronous: writes invalidate
/// dependents immediately, and recomputation happens on the next read.
#[derive(Clone)]
pub struct Runtime {
    pub(crate) inner: Rc<RuntimeInner>,
}

impl core::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Runtime")
            .field("values", &self.inner.slots.borrow().len())
            .field("free", &self.inner.free_list.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Creates an empty runtime.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                graph: RefCell::new(DirtyTracker::with_cycle_handling(CycleHandling::Error)),
                slots: RefCell::new(Vec::new()),
                free_list: RefCell::new(Vec::new()),
                stack: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Creates an observable cell holding `value`.
    pub fn observable<T: 'static>(&self, value: T) -> Observable<T> {
        Observable::new(&self.inner, value)
    }

    /// Creates a lazily evaluated derived value.
    ///
    /// `compute` is not called until the first read.
    pub fn computed<T: 'static>(&self, compute: impl FnMut() -> T + 'static) -> Computed<T> {
        Computed::new(&self.inner, compute)
    }

    /// Returns `true` while a computed value is being evaluated.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        !self.inner.stack.borrow().is_empty()
    }
}
