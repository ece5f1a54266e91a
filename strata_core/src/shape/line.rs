// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polylines.

use alloc::vec::Vec;

use kurbo::Point;

use super::ShapeError;
use crate::surface::Surface;

/// A polyline through a flat list of `x, y` coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Line {
    points: Vec<f64>,
    /// Whether to close the path back to the first point.
    pub closed: bool,
}

impl Line {
    /// Creates an open polyline.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::OddPointCount`] if `points` does not hold whole
    /// `x, y` pairs.
    pub fn new(points: Vec<f64>) -> Result<Self, ShapeError> {
        check_pairs(&points)?;
        Ok(Self {
            points,
            closed: false,
        })
    }

    /// Creates a polyline from points.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            points: points.into_iter().flat_map(|p| [p.x, p.y]).collect(),
            closed: false,
        }
    }

    /// Returns the line with [`closed`](Self::closed) set.
    #[must_use]
    pub fn close(mut self) -> Self {
        self.closed = true;
        self
    }

    /// The flat coordinate list.
    #[must_use]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Replaces the coordinate list.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::OddPointCount`] and leaves the line unchanged if
    /// `points` does not hold whole `x, y` pairs.
    pub fn set_points(&mut self, points: Vec<f64>) -> Result<(), ShapeError> {
        check_pairs(&points)?;
        self.points = points;
        Ok(())
    }

    pub(crate) fn build_path(&self, surface: &mut dyn Surface) {
        // A single point has no segment to draw.
        if self.points.len() < 4 {
            return;
        }
        let mut pairs = self.points.chunks_exact(2).map(|p| Point::new(p[0], p[1]));
        if let Some(first) = pairs.next() {
            surface.move_to(first);
        }
        for p in pairs {
            surface.line_to(p);
        }
        if self.closed {
            surface.close_path();
        }
    }
}

fn check_pairs(points: &[f64]) -> Result<(), ShapeError> {
    if points.len() % 2 == 0 {
        Ok(())
    } else {
        Err(ShapeError::OddPointCount(points.len()))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    #[test]
    fn odd_point_count_is_rejected() {
        assert_eq!(
            Line::new(vec![0.0, 1.0, 2.0]),
            Err(ShapeError::OddPointCount(3))
        );
        let mut line = Line::new(vec![0.0, 0.0, 1.0, 1.0]).expect("pairs");
        assert!(line.set_points(vec![1.0]).is_err());
        assert_eq!(line.points().len(), 4, "failed set leaves points alone");
    }

    #[test]
    fn closed_polyline_path() {
        let line = Line::from_points([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ])
        .close();
        let mut surface = RecordingSurface::default();
        line.build_path(&mut surface);
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::MoveTo(Point::new(0.0, 0.0)),
                DrawCommand::LineTo(Point::new(10.0, 0.0)),
                DrawCommand::LineTo(Point::new(10.0, 10.0)),
                DrawCommand::ClosePath,
            ]
        );
    }

    #[test]
    fn single_point_draws_nothing() {
        let line = Line::new(vec![3.0, 4.0]).expect("pairs");
        let mut surface = RecordingSurface::default();
        line.build_path(&mut surface);
        assert!(surface.commands().is_empty());
    }
}
