//! Polygon area computation.
//!
//! This is the narrow computational-geometry seam of the crate: everything
//! downstream asks for areas, orientations, and bounding boxes through these
//! functions, so the underlying algorithm can be swapped without touching the
//! parsing logic.

use super::types::Point;

/// Vertices closer than this are considered coincident.
pub const POINT_EQUALITY_EPSILON: f64 = 1e-9;

/// Signed area of a point sequence using the shoelace formula.
///
/// Positive for counter-clockwise winding, negative for clockwise. Exact for
/// any simple (non-self-intersecting) polygon, convex or not. Returns 0.0 for
/// fewer than 3 points.
#[must_use]
pub fn signed_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let Some(first) = points.first().copied() else {
        return 0.0;
    };

    let mut sum = 0.0;
    let mut previous = first;
    for point in points.iter().skip(1).copied() {
        sum += previous.x.mul_add(point.y, -(point.x * previous.y));
        previous = point;
    }
    sum += previous.x.mul_add(first.y, -(first.x * previous.y));
    sum / 2.0
}

/// Unsigned area of a simple polygon boundary.
#[must_use]
pub fn polygon_area(points: &[Point]) -> f64 {
    signed_area(points).abs()
}

/// Unsigned area of an outer boundary minus an optional hole boundary.
///
/// The result is clamped at zero so a malformed hole can never produce a
/// negative area.
#[must_use]
pub fn polygon_area_with_hole(outline: &[Point], hole: Option<&[Point]>) -> f64 {
    let outer = polygon_area(outline);
    let inner = hole.map_or(0.0, polygon_area);
    (outer - inner).max(0.0)
}

/// Normalizes a boundary to counter-clockwise winding in place.
///
/// Reversal is the only transformation applied, so the same input always
/// yields the same output.
pub fn normalize_ccw(points: &mut [Point]) {
    if signed_area(points) < 0.0 {
        points.reverse();
    }
}

/// Counts vertices that are distinct from their predecessor, treating the
/// sequence as closed.
#[must_use]
pub fn distinct_vertex_count(points: &[Point]) -> usize {
    if points.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut iter = points.iter().copied();
    let Some(first) = iter.next() else {
        return 0;
    };

    let mut previous = first;
    count += 1;
    for point in iter {
        if !points_approx_equal(previous, point) {
            count += 1;
        }
        previous = point;
    }

    // Closing edge: the last vertex may duplicate the first.
    if count > 1 && points_approx_equal(previous, first) {
        count -= 1;
    }

    count
}

/// Whether two points coincide within [`POINT_EQUALITY_EPSILON`].
#[must_use]
pub fn points_approx_equal(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < POINT_EQUALITY_EPSILON && (a.y - b.y).abs() < POINT_EQUALITY_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    #[test]
    fn ut_area_001_unit_square_signed_area_is_one() {
        assert!((signed_area(&unit_square()) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn ut_area_002_clockwise_square_signed_area_is_negative() {
        let mut square = unit_square();
        square.reverse();
        assert!((signed_area(&square) + 1.0).abs() < EPSILON);
        assert!((polygon_area(&square) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn ut_area_003_concave_polygon_area_is_exact() {
        // L-shape: 2x2 square with a 1x1 corner removed.
        let shape = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        assert!((polygon_area(&shape) - 3.0).abs() < EPSILON);
    }

    #[test]
    fn ut_area_004_hole_area_is_subtracted() {
        let outer = unit_square();
        let hole = vec![
            Point::new(0.25, 0.25),
            Point::new(0.75, 0.25),
            Point::new(0.75, 0.75),
            Point::new(0.25, 0.75),
        ];
        let area = polygon_area_with_hole(&outer, Some(&hole));
        assert!((area - 0.75).abs() < EPSILON);
    }

    #[test]
    fn ut_area_005_oversized_hole_clamps_to_zero() {
        let outer = unit_square();
        let hole = vec![
            Point::new(-1.0, -1.0),
            Point::new(2.0, -1.0),
            Point::new(2.0, 2.0),
            Point::new(-1.0, 2.0),
        ];
        assert!(polygon_area_with_hole(&outer, Some(&hole)).abs() < EPSILON);
    }

    #[test]
    fn ut_area_006_normalize_ccw_reverses_clockwise_input() {
        let mut square = unit_square();
        square.reverse();
        normalize_ccw(&mut square);
        assert!(signed_area(&square) > 0.0);
    }

    #[test]
    fn ut_area_007_normalize_ccw_is_deterministic() {
        let mut a = unit_square();
        a.reverse();
        let mut b = a.clone();
        normalize_ccw(&mut a);
        normalize_ccw(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn bc_area_001_degenerate_inputs_have_zero_area() {
        assert!(signed_area(&[]).abs() < EPSILON);
        assert!(signed_area(&[Point::ORIGIN]).abs() < EPSILON);
        assert!(signed_area(&[Point::ORIGIN, Point::new(1.0, 1.0)]).abs() < EPSILON);
    }

    #[test]
    fn bc_area_002_distinct_vertex_count_collapses_duplicates() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
        ];
        assert_eq!(distinct_vertex_count(&points), 3);
    }

    #[test]
    fn bc_area_003_distinct_vertex_count_of_a_point_is_one() {
        let points = vec![Point::ORIGIN, Point::ORIGIN, Point::ORIGIN];
        assert_eq!(distinct_vertex_count(&points), 1);
    }
}
