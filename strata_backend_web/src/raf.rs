// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame scheduler.
//!
//! [`RafScheduler`] answers [`FrameScheduler`] requests with browser
//! animation frames. Requests made before the next frame share one native
//! `requestAnimationFrame` registration, so a stage with several dirty
//! layers still gets a single callback per frame. Each callback receives a
//! [`DOMHighResTimeStamp`][mdn] in milliseconds, converted to the
//! microsecond [`FrameTick::timestamp_us`].
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use strata_core::frame::{FrameRequestId, FrameScheduler, FrameTick};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use crate::ms_to_us;

// Direct global bindings instead of `web_sys::Window` methods; avoids
// fetching the Window object on every request.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

/// Called with each frame. Returns `false` if the frame could not be
/// delivered and should be retried on the next animation frame.
type FrameCallback = Box<dyn FnMut(FrameTick) -> bool>;

struct RafInner {
    /// The JS closure registered with `requestAnimationFrame`, created on
    /// the first request.
    closure: RefCell<Option<RafClosure>>,
    callback: RefCell<FrameCallback>,
    /// Becomes [`FrameTick::frame_index`].
    frame_counter: Cell<u64>,
    next_request: Cell<u64>,
    /// Requests waiting for the next frame.
    outstanding: RefCell<Vec<FrameRequestId>>,
    /// The native registration, while one is pending.
    raf_id: Cell<Option<i32>>,
}

impl RafInner {
    fn arm(self: &Rc<Self>) {
        if self.raf_id.get().is_some() {
            return;
        }
        let mut slot = self.closure.borrow_mut();
        let closure = slot.get_or_insert_with(|| {
            let weak = Rc::downgrade(self);
            Closure::wrap(Box::new(move |timestamp_ms: f64| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_frame(timestamp_ms);
                }
            }) as Box<dyn FnMut(f64)>)
        });
        let id = request_animation_frame(closure.as_ref().unchecked_ref());
        self.raf_id.set(Some(id));
    }

    fn disarm(&self) {
        if let Some(id) = self.raf_id.take() {
            cancel_animation_frame(id);
        }
    }

    fn on_frame(self: &Rc<Self>, timestamp_ms: f64) {
        self.raf_id.set(None);
        if self.outstanding.borrow().is_empty() {
            return;
        }

        let frame_index = self.frame_counter.get();
        let tick = FrameTick {
            frame_index,
            timestamp_us: ms_to_us(timestamp_ms),
        };

        // Answer the current requests before running the callback, so
        // requests it makes land in the next frame.
        let answered = core::mem::take(&mut *self.outstanding.borrow_mut());
        let delivered = match self.callback.try_borrow_mut() {
            Ok(mut callback) => callback(tick),
            Err(_) => false,
        };

        if delivered {
            self.frame_counter.set(frame_index + 1);
        } else {
            let mut outstanding = self.outstanding.borrow_mut();
            let newer = core::mem::replace(&mut *outstanding, answered);
            outstanding.extend(newer);
            drop(outstanding);
            self.arm();
        }
    }
}

/// A [`FrameScheduler`] answering requests with `requestAnimationFrame`.
///
/// The callback passed to [`new`](Self::new) runs once per animation frame
/// in which at least one request is outstanding; it typically calls
/// [`Stage::run_frame`](strata_core::node::Stage::run_frame). Cloning yields
/// another handle to the same scheduler.
#[derive(Clone)]
pub struct RafScheduler {
    inner: Rc<RafInner>,
}

impl RafScheduler {
    /// Creates a scheduler with no outstanding requests.
    ///
    /// `callback` returns whether the frame was delivered; on `false` the
    /// requests stay outstanding and the frame is retried.
    pub fn new(callback: impl FnMut(FrameTick) -> bool + 'static) -> Self {
        Self {
            inner: Rc::new(RafInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                frame_counter: Cell::new(0),
                next_request: Cell::new(0),
                outstanding: RefCell::new(Vec::new()),
                raf_id: Cell::new(None),
            }),
        }
    }

    /// Returns `true` while a native animation frame is registered.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.inner.raf_id.get().is_some()
    }

    /// Number of requests waiting for the next frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.outstanding.borrow().len()
    }

    /// Cancels every outstanding request.
    pub fn cancel_all(&self) {
        self.inner.outstanding.borrow_mut().clear();
        self.inner.disarm();
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> FrameRequestId {
        let id = FrameRequestId(self.inner.next_request.get());
        self.inner.next_request.set(id.0 + 1);
        self.inner.outstanding.borrow_mut().push(id);
        self.inner.arm();
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        let mut outstanding = self.inner.outstanding.borrow_mut();
        outstanding.retain(|r| *r != id);
        let idle = outstanding.is_empty();
        drop(outstanding);
        if idle {
            self.inner.disarm();
        }
    }
}

impl Drop for RafInner {
    fn drop(&mut self) {
        self.disarm();
    }
}

impl core::fmt::Debug for RafScheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafScheduler")
            .field("armed", &self.is_armed())
            .field("pending", &self.pending())
            .field("frame_counter", &self.inner.frame_counter.get())
            .finish_non_exhaustive()
    }
}
