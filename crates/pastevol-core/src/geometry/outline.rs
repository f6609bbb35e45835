//! Polygon outline construction for aperture flashes and stroked draws.
//!
//! All outlines are emitted counter-clockwise without a repeated closing
//! vertex. Curved edges are tessellated; the analytic area of the underlying
//! shape is tracked separately by the aperture templates so tessellation never
//! biases area or volume.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::types::Point;

/// Segment count used to tessellate full circles.
pub const CIRCLE_SEGMENTS: u32 = 32;

/// Segment count used to tessellate obround and capsule end caps.
pub const ENDCAP_SEGMENTS: u32 = 16;

/// Circle outline centered at `center`, counter-clockwise, starting at the
/// positive-X axis.
#[must_use]
pub fn circle(center: Point, radius: f64) -> Vec<Point> {
    let mut points = Vec::new();
    for i in 0..CIRCLE_SEGMENTS {
        let angle = TAU * f64::from(i) / f64::from(CIRCLE_SEGMENTS);
        points.push(Point::new(
            radius.mul_add(angle.cos(), center.x),
            radius.mul_add(angle.sin(), center.y),
        ));
    }
    points
}

/// Circle boundary wound clockwise, used for hole boundaries.
#[must_use]
pub fn circle_hole(center: Point, radius: f64) -> Vec<Point> {
    let mut points = circle(center, radius);
    points.reverse();
    points
}

/// Axis-aligned rectangle outline centered at `center`.
#[must_use]
pub fn rectangle(center: Point, width: f64, height: f64) -> Vec<Point> {
    let half_width = width / 2.0;
    let half_height = height / 2.0;
    vec![
        Point::new(center.x - half_width, center.y - half_height),
        Point::new(center.x + half_width, center.y - half_height),
        Point::new(center.x + half_width, center.y + half_height),
        Point::new(center.x - half_width, center.y + half_height),
    ]
}

/// Obround (stadium) outline centered at `center`.
///
/// Degrades to a plain circle when width and height coincide.
#[must_use]
pub fn obround(center: Point, width: f64, height: f64) -> Vec<Point> {
    if (width - height).abs() <= f64::EPSILON {
        return circle(center, width / 2.0);
    }

    let mut points = Vec::new();
    if width > height {
        let radius = height / 2.0;
        let half_body = (width - height) / 2.0;
        push_arc(
            &mut points,
            Point::new(center.x + half_body, center.y),
            radius,
            -FRAC_PI_2,
            FRAC_PI_2,
        );
        push_arc(
            &mut points,
            Point::new(center.x - half_body, center.y),
            radius,
            FRAC_PI_2,
            3.0 * FRAC_PI_2,
        );
    } else {
        let radius = width / 2.0;
        let half_body = (height - width) / 2.0;
        push_arc(
            &mut points,
            Point::new(center.x, center.y + half_body),
            radius,
            0.0,
            PI,
        );
        push_arc(
            &mut points,
            Point::new(center.x, center.y - half_body),
            radius,
            PI,
            TAU,
        );
    }
    points
}

/// Regular polygon outline: `vertices` points on a circle of `radius` around
/// `center`, first vertex at `rotation_degrees` from the positive-X axis.
#[must_use]
pub fn regular_polygon(
    center: Point,
    radius: f64,
    vertices: u16,
    rotation_degrees: f64,
) -> Vec<Point> {
    let rotation = rotation_degrees.to_radians();
    let sides = u32::from(vertices);
    let mut points = Vec::new();
    for i in 0..sides {
        let angle = rotation + TAU * f64::from(i) / f64::from(sides);
        points.push(Point::new(
            radius.mul_add(angle.cos(), center.x),
            radius.mul_add(angle.sin(), center.y),
        ));
    }
    points
}

/// Capsule outline for a stroked segment: a `width`-wide body from `from` to
/// `to` with semicircular end caps.
///
/// Returns `None` for a zero-length segment; the caller decides whether to
/// degrade to a circle stamp or drop the stroke.
#[must_use]
pub fn capsule(from: Point, to: Point, width: f64) -> Option<Vec<Point>> {
    let delta_x = to.x - from.x;
    let delta_y = to.y - from.y;
    let length = delta_x.hypot(delta_y);
    if length <= f64::EPSILON {
        return None;
    }

    let radius = width / 2.0;
    let direction_angle = delta_y.atan2(delta_x);

    let mut points = Vec::new();
    push_arc(
        &mut points,
        to,
        radius,
        direction_angle - FRAC_PI_2,
        direction_angle + FRAC_PI_2,
    );
    push_arc(
        &mut points,
        from,
        radius,
        direction_angle + FRAC_PI_2,
        direction_angle + PI + FRAC_PI_2,
    );
    Some(points)
}

/// Appends an arc sampled with [`ENDCAP_SEGMENTS`] segments, including both
/// endpoints.
fn push_arc(points: &mut Vec<Point>, center: Point, radius: f64, start_angle: f64, end_angle: f64) {
    let step = (end_angle - start_angle) / f64::from(ENDCAP_SEGMENTS);
    for i in 0..=ENDCAP_SEGMENTS {
        let angle = step.mul_add(f64::from(i), start_angle);
        points.push(Point::new(
            radius.mul_add(angle.cos(), center.x),
            radius.mul_add(angle.sin(), center.y),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::area::{polygon_area, signed_area};
    use crate::geometry::types::BoundingBox;

    const EPSILON: f64 = 1e-6;

    fn bounds_of(points: &[Point]) -> BoundingBox {
        let mut bounds = BoundingBox::new();
        for point in points {
            bounds.update(*point);
        }
        bounds
    }

    #[test]
    fn ut_out_001_circle_vertices_lie_on_the_radius() {
        let center = Point::new(5.0, 3.0);
        for point in circle(center, 1.0) {
            let distance = (point.x - center.x).hypot(point.y - center.y);
            assert!((distance - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn ut_out_002_circle_is_counter_clockwise_and_hole_is_clockwise() {
        let center = Point::new(0.0, 0.0);
        assert!(signed_area(&circle(center, 1.0)) > 0.0);
        assert!(signed_area(&circle_hole(center, 1.0)) < 0.0);
    }

    #[test]
    fn ut_out_003_rectangle_outline_area_is_exact() {
        let outline = rectangle(Point::new(1.0, 1.0), 2.0, 0.5);
        assert_eq!(outline.len(), 4);
        assert!((polygon_area(&outline) - 1.0).abs() < EPSILON);
        assert!(signed_area(&outline) > 0.0);
    }

    #[test]
    fn ut_out_004_horizontal_obround_bounds() {
        let outline = obround(Point::new(0.0, 0.0), 3.0, 1.0);
        let bounds = bounds_of(&outline);
        assert!((bounds.min_x + 1.5).abs() < EPSILON);
        assert!((bounds.max_x - 1.5).abs() < EPSILON);
        assert!((bounds.min_y + 0.5).abs() < EPSILON);
        assert!((bounds.max_y - 0.5).abs() < EPSILON);
        assert!(signed_area(&outline) > 0.0);
    }

    #[test]
    fn ut_out_005_vertical_obround_bounds() {
        let outline = obround(Point::new(0.0, 0.0), 1.0, 3.0);
        let bounds = bounds_of(&outline);
        assert!((bounds.min_x + 0.5).abs() < EPSILON);
        assert!((bounds.max_x - 0.5).abs() < EPSILON);
        assert!((bounds.min_y + 1.5).abs() < EPSILON);
        assert!((bounds.max_y - 1.5).abs() < EPSILON);
    }

    #[test]
    fn ut_out_006_square_obround_degrades_to_circle() {
        let outline = obround(Point::new(0.0, 0.0), 2.0, 2.0);
        assert_eq!(outline.len(), 32);
    }

    #[test]
    fn ut_out_007_polygon_rotation_moves_first_vertex() {
        let outline = regular_polygon(Point::new(0.0, 0.0), 1.0, 6, 30.0);
        let first = outline.first().copied();
        assert!(first.is_some(), "expected a first vertex");
        if let Some(first) = first {
            assert!((first.x - 30.0_f64.to_radians().cos()).abs() < EPSILON);
            assert!((first.y - 30.0_f64.to_radians().sin()).abs() < EPSILON);
        }
    }

    #[test]
    fn ut_out_008_hexagon_area_matches_closed_form() {
        let outline = regular_polygon(Point::new(2.0, -1.0), 1.5, 6, 0.0);
        let expected = 0.5 * 6.0 * 1.5 * 1.5 * (TAU / 6.0).sin();
        assert!((polygon_area(&outline) - expected).abs() < EPSILON);
    }

    #[test]
    fn ut_out_009_capsule_bounds_cover_body_and_caps() {
        let outline = capsule(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 2.0);
        assert!(outline.is_some(), "expected a capsule outline");
        if let Some(outline) = outline {
            let bounds = bounds_of(&outline);
            assert!((bounds.min_x + 1.0).abs() < EPSILON);
            assert!((bounds.max_x - 11.0).abs() < EPSILON);
            assert!((bounds.min_y + 1.0).abs() < EPSILON);
            assert!((bounds.max_y - 1.0).abs() < EPSILON);
            assert!(signed_area(&outline) > 0.0);
        }
    }

    #[test]
    fn bc_out_001_zero_length_capsule_is_none() {
        assert!(capsule(Point::new(5.0, 5.0), Point::new(5.0, 5.0), 1.0).is_none());
    }
}
