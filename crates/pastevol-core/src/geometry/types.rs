//! Core geometry types shared by the outline builders and the area engine.

use serde::Serialize;

/// 2D point in board coordinate space (millimeters).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Origin point.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point translated by `(dx, dy)`.
    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    /// Minimum X coordinate.
    pub min_x: f64,
    /// Minimum Y coordinate.
    pub min_y: f64,
    /// Maximum X coordinate.
    pub max_x: f64,
    /// Maximum Y coordinate.
    pub max_y: f64,
}

impl BoundingBox {
    /// Creates an empty bounding box that will expand with the first
    /// `update` call.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Expands the bounding box to include the given point.
    pub fn update(&mut self, point: Point) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    /// Horizontal extent. Zero for an empty box.
    #[must_use]
    pub fn width(&self) -> f64 {
        if self.max_x >= self.min_x {
            self.max_x - self.min_x
        } else {
            0.0
        }
    }

    /// Vertical extent. Zero for an empty box.
    #[must_use]
    pub fn height(&self) -> f64 {
        if self.max_y >= self.min_y {
            self.max_y - self.min_y
        } else {
            0.0
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

/// Absolute-coordinate polygon geometry for one pad.
///
/// Kept separate from the tabular pad summary so a renderer can consume the
/// vertex data without re-parsing the source file. The outer boundary is
/// counter-clockwise; the hole boundary, when present, is clockwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PadGeometry {
    /// Id of the pad this geometry belongs to.
    pub pad_id: u32,
    /// Outer boundary vertices, counter-clockwise, not repeated at the end.
    pub outline: Vec<Point>,
    /// Optional hole boundary vertices, clockwise.
    pub hole: Option<Vec<Point>>,
}

impl PadGeometry {
    /// Bounding box of the outer boundary.
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::new();
        for point in &self.outline {
            bounds.update(*point);
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn ut_typ_001_bounding_box_expands_with_points() {
        let mut bounds = BoundingBox::new();
        bounds.update(Point::new(1.0, 2.0));
        bounds.update(Point::new(-3.0, 4.0));
        assert!((bounds.min_x + 3.0).abs() < EPSILON);
        assert!((bounds.min_y - 2.0).abs() < EPSILON);
        assert!((bounds.max_x - 1.0).abs() < EPSILON);
        assert!((bounds.max_y - 4.0).abs() < EPSILON);
    }

    #[test]
    fn ut_typ_002_empty_bounding_box_has_zero_extents() {
        let bounds = BoundingBox::new();
        assert!(bounds.width().abs() < EPSILON);
        assert!(bounds.height().abs() < EPSILON);
    }

    #[test]
    fn ut_typ_003_translated_point_moves_both_axes() {
        let moved = Point::new(1.0, 1.0).translated(2.0, -0.5);
        assert!((moved.x - 3.0).abs() < EPSILON);
        assert!((moved.y - 0.5).abs() < EPSILON);
    }

    #[test]
    fn ut_typ_004_pad_geometry_bounds_cover_outline() {
        let geometry = PadGeometry {
            pad_id: 1,
            outline: vec![
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(2.0, 1.0),
                Point::new(0.0, 1.0),
            ],
            hole: None,
        };
        let bounds = geometry.bounds();
        assert!((bounds.width() - 2.0).abs() < EPSILON);
        assert!((bounds.height() - 1.0).abs() < EPSILON);
    }
}
