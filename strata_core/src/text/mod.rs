// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text layout for [`Text`](crate::shape::Text) shapes.
//!
//! [`layout_text`] is independent of any surface: it takes a measuring
//! closure, which makes it usable both by the draw loop (measuring through
//! [`Surface::measure_text`](crate::surface::Surface::measure_text)) and by
//! callers that need to know how a label will break before drawing it.

mod font;
mod layout;

pub use font::FontOptions;
pub use layout::{ELLIPSIS, LayoutConstraints, TextLayout, TextLine, layout_text};
