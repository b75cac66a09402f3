// THEORY:
// The minimum enclosing circle is the smallest circle containing every point of
// a contour. It is only used for display (the halo around the detection) and
// for the minimum-radius gate; the tracked position comes from moments.
//
// Algorithm:
// 1.  **Hull reduction**: only convex hull vertices can touch the minimal
//     circle, so the contour is first reduced with a monotone-chain hull. This
//     keeps the incremental step cheap even for long, smooth contours.
// 2.  **Incremental construction (Welzl)**: points are visited in hull order.
//     Whenever a point falls outside the current circle, the circle is rebuilt
//     with that point on its boundary, first with one other point (diameter)
//     and then, if needed, with two (circumcircle).
// 3.  **Determinism**: no random shuffle is used, so the same contour always
//     yields bit-identical circles.

use crate::core_modules::blob::Point;

const CONTAINMENT_TOLERANCE: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Circle {
    pub center: (f64, f64),
    pub radius: f64,
}

impl Circle {
    fn at(point: (f64, f64)) -> Self {
        Self {
            center: point,
            radius: 0.0,
        }
    }

    fn with_diameter(a: (f64, f64), b: (f64, f64)) -> Self {
        let center = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
        Self {
            center,
            radius: distance(center, a).max(distance(center, b)),
        }
    }

    /// Circle through three points; for collinear points, the circle on the
    /// widest pair.
    fn through(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        let (bx, by) = (b.0 - a.0, b.1 - a.1);
        let (cx, cy) = (c.0 - a.0, c.1 - a.1);
        let determinant = 2.0 * (bx * cy - by * cx);
        if determinant.abs() <= f64::EPSILON {
            let candidates = [
                Self::with_diameter(a, b),
                Self::with_diameter(a, c),
                Self::with_diameter(b, c),
            ];
            return candidates
                .into_iter()
                .fold(Self::at(a), |widest, circle| {
                    if circle.radius > widest.radius { circle } else { widest }
                });
        }

        let b_norm = bx * bx + by * by;
        let c_norm = cx * cx + cy * cy;
        let ux = (cy * b_norm - by * c_norm) / determinant;
        let uy = (bx * c_norm - cx * b_norm) / determinant;
        let center = (a.0 + ux, a.1 + uy);
        Self {
            center,
            radius: distance(center, a)
                .max(distance(center, b))
                .max(distance(center, c)),
        }
    }

    pub fn contains(&self, point: (f64, f64)) -> bool {
        distance(self.center, point) <= self.radius + CONTAINMENT_TOLERANCE * (1.0 + self.radius)
    }

    /// Center rounded to the nearest pixel, for drawing.
    pub fn pixel_center(&self) -> Point {
        Point::new(self.center.0.round() as i32, self.center.1.round() as i32)
    }
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// Smallest circle enclosing all `points`, or `None` when there are none.
pub fn min_enclosing_circle(points: &[Point]) -> Option<Circle> {
    let hull: Vec<(f64, f64)> = convex_hull(points)
        .into_iter()
        .map(|p| (p.x as f64, p.y as f64))
        .collect();
    let first = *hull.first()?;

    let mut circle = Circle::at(first);
    for i in 1..hull.len() {
        if circle.contains(hull[i]) {
            continue;
        }
        circle = Circle::at(hull[i]);
        for j in 0..i {
            if circle.contains(hull[j]) {
                continue;
            }
            circle = Circle::with_diameter(hull[i], hull[j]);
            for k in 0..j {
                if !circle.contains(hull[k]) {
                    circle = Circle::through(hull[i], hull[j], hull[k]);
                }
            }
        }
    }
    Some(circle)
}

/// Convex hull by Andrew's monotone chain, counter-clockwise in image axes,
/// without repeated or collinear vertices.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted: Vec<Point> = points.to_vec();
    sorted.sort_unstable_by_key(|p| (p.x, p.y));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    fn cross(o: Point, a: Point, b: Point) -> i64 {
        (a.x - o.x) as i64 * (b.y - o.y) as i64 - (a.y - o.y) as i64 * (b.x - o.x) as i64
    }

    let mut hull: Vec<Point> = Vec::with_capacity(sorted.len() * 2);
    for &p in &sorted {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_input_has_no_circle() {
        assert_eq!(min_enclosing_circle(&[]), None);
    }

    #[test]
    fn single_point_is_a_zero_radius_circle() {
        let circle = min_enclosing_circle(&[Point::new(7, 9)]).unwrap();
        assert_eq!(circle.center, (7.0, 9.0));
        assert_eq!(circle.radius, 0.0);
    }

    #[test]
    fn two_points_span_a_diameter() {
        let circle = min_enclosing_circle(&[Point::new(0, 0), Point::new(10, 0)]).unwrap();
        assert_eq!(circle.center, (5.0, 0.0));
        assert_close(circle.radius, 5.0);
    }

    #[test]
    fn square_corners_give_the_circumcircle() {
        let points = [
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
            Point::new(5, 5),
        ];
        let circle = min_enclosing_circle(&points).unwrap();
        assert_close(circle.center.0, 5.0);
        assert_close(circle.center.1, 5.0);
        assert_close(circle.radius, 50f64.sqrt());
    }

    #[test]
    fn obtuse_triangle_uses_its_longest_side() {
        let points = [Point::new(0, 0), Point::new(20, 0), Point::new(10, 2)];
        let circle = min_enclosing_circle(&points).unwrap();
        assert_close(circle.center.0, 10.0);
        assert_close(circle.center.1, 0.0);
        assert_close(circle.radius, 10.0);
    }

    #[test]
    fn sampled_circle_recovers_its_radius() {
        let points: Vec<Point> = (0..360)
            .map(|deg| {
                let t = (deg as f64).to_radians();
                Point::new(
                    (100.0 + 25.0 * t.cos()).round() as i32,
                    (80.0 + 25.0 * t.sin()).round() as i32,
                )
            })
            .collect();
        let circle = min_enclosing_circle(&points).unwrap();
        assert!((circle.center.0 - 100.0).abs() <= 1.0);
        assert!((circle.center.1 - 80.0).abs() <= 1.0);
        assert!((circle.radius - 25.0).abs() <= 1.0);
        for p in &points {
            assert!(circle.contains((p.x as f64, p.y as f64)));
        }
    }

    #[test]
    fn hull_drops_interior_and_collinear_points() {
        let points = [
            Point::new(0, 0),
            Point::new(5, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
            Point::new(4, 6),
            Point::new(0, 0),
        ];
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&Point::new(5, 0)));
        assert!(!hull.contains(&Point::new(4, 6)));
    }
}
