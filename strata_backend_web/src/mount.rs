// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mounting a stage into the DOM.
//!
//! A [`WebStage`] owns a container `<div>` appended to the mount target.
//! Every layer gets its own absolutely positioned `<canvas>` inside the
//! container, stacked in layer order.

use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::cell::RefCell;

use kurbo::Size;
use strata_core::frame::FrameTick;
use strata_core::node::{LayerOptions, NodeId, Stage, StageOptions};
use strata_core::trace::{FrameSummary, Tracer};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlElement};

use crate::canvas::CanvasSurface;
use crate::raf::RafScheduler;

/// Where a [`WebStage`] is mounted.
#[derive(Clone, Debug)]
pub enum MountTarget {
    /// An element already in hand.
    Element(HtmlElement),
    /// The element with this `id` attribute.
    Id(String),
}

/// Errors raised while mounting a stage or adding layers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MountError {
    /// No `window` or `document` is available.
    #[error("no document available")]
    NoDocument,
    /// No element has the requested id.
    #[error("no element with id `{0}`")]
    NotFound(String),
    /// The element exists but is not an HTML element.
    #[error("element `{0}` is not an HTML element")]
    NotHtml(String),
    /// The DOM refused to create or attach an element.
    #[error("could not create `{0}` element")]
    CreateElement(&'static str),
    /// The canvas did not provide a 2D context.
    #[error("canvas has no 2D context")]
    NoContext,
}

type SharedStage = Rc<RefCell<Stage<CanvasSurface>>>;

/// A [`Stage`] drawing into canvases inside a DOM container.
///
/// Frames are scheduled with [`RafScheduler`] and delivered to
/// [`Stage::run_frame`] automatically. Access the stage through
/// [`with_stage`](Self::with_stage).
#[derive(Debug)]
pub struct WebStage {
    stage: SharedStage,
    container: HtmlElement,
    document: Document,
}

impl WebStage {
    /// Creates a stage and appends its container to `target`.
    pub fn mount(target: MountTarget, options: StageOptions) -> Result<Self, MountError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(MountError::NoDocument)?;
        let parent = match target {
            MountTarget::Element(el) => el,
            MountTarget::Id(id) => {
                let el = document
                    .get_element_by_id(&id)
                    .ok_or_else(|| MountError::NotFound(id.clone()))?;
                el.dyn_into::<HtmlElement>()
                    .map_err(|_| MountError::NotHtml(id))?
            }
        };

        let container: HtmlElement = document
            .create_element("div")
            .map_err(|_| MountError::CreateElement("div"))?
            .unchecked_into();
        let s = container.style();
        let _ = s.set_property("position", "relative");
        let _ = s.set_property("width", &format!("{}px", options.size.width));
        let _ = s.set_property("height", &format!("{}px", options.size.height));
        parent
            .append_child(&container)
            .map_err(|_| MountError::CreateElement("div"))?;

        let stage = Rc::new_cyclic(|weak: &Weak<RefCell<Stage<CanvasSurface>>>| {
            let weak = weak.clone();
            let scheduler = RafScheduler::new(move |tick| deliver(&weak, tick));
            RefCell::new(Stage::new(options, scheduler))
        });

        Ok(Self {
            stage,
            container,
            document,
        })
    }

    /// The container element holding the layer canvases.
    #[must_use]
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Adds a layer backed by a new canvas.
    pub fn add_layer(&self, options: LayerOptions) -> Result<NodeId, MountError> {
        let canvas: HtmlCanvasElement = self
            .document
            .create_element("canvas")
            .map_err(|_| MountError::CreateElement("canvas"))?
            .dyn_into()
            .map_err(|_| MountError::CreateElement("canvas"))?;
        let s = canvas.style();
        let _ = s.set_property("position", "absolute");
        let _ = s.set_property("left", "0");
        let _ = s.set_property("top", "0");
        let surface = CanvasSurface::new(canvas.clone()).ok_or(MountError::NoContext)?;
        self.container
            .append_child(&canvas)
            .map_err(|_| MountError::CreateElement("canvas"))?;
        Ok(self.stage.borrow_mut().add_layer(surface, options))
    }

    /// Runs `f` with mutable access to the stage.
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from inside another `with_stage`.
    pub fn with_stage<R>(&self, f: impl FnOnce(&mut Stage<CanvasSurface>) -> R) -> R {
        f(&mut self.stage.borrow_mut())
    }

    /// Resizes the stage, its layers and the container.
    pub fn set_size(&self, size: Size) {
        let s = self.container.style();
        let _ = s.set_property("width", &format!("{}px", size.width));
        let _ = s.set_property("height", &format!("{}px", size.height));
        self.stage.borrow_mut().set_size(size);
    }

    /// Removes the container from the document.
    ///
    /// The stage stays usable but draws into detached canvases.
    pub fn unmount(&self) {
        self.container.remove();
    }
}

/// Delivers a frame to the stage, if it is alive and not borrowed.
fn deliver(stage: &Weak<RefCell<Stage<CanvasSurface>>>, tick: FrameTick) -> bool {
    let Some(stage) = stage.upgrade() else {
        return true;
    };
    let Ok(mut stage) = stage.try_borrow_mut() else {
        return false;
    };
    let _: FrameSummary = stage.run_frame(tick, &mut Tracer::none());
    true
}
