// THEORY:
// The `moment` module computes the raw spatial moments of a region from its
// boundary alone. By Green's theorem the area integrals
//     m00 = ∬ 1 dA,   m10 = ∬ x dA,   m01 = ∬ y dA
// reduce to sums over the edges of the closed contour polygon, so the mask
// never has to be rescanned once the contour is known.
//
// The centroid is `(m10 / m00, m01 / m00)`. A contour with zero enclosed area
// (a lone pixel, a one-pixel-wide line) has no centroid; callers treat it as
// "nothing detected" rather than dividing by zero.

use crate::core_modules::blob::Point;

/// Zeroth and first order raw moments of a contour polygon.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawMoments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl RawMoments {
    /// Moments of the closed polygon through `points`.
    /// Orientation is normalised so `m00` is never negative.
    pub fn of_contour(points: &[Point]) -> Self {
        if points.len() < 3 {
            return Self::default();
        }

        let mut a00 = 0.0;
        let mut a10 = 0.0;
        let mut a01 = 0.0;

        let mut previous = points[points.len() - 1];
        for &current in points {
            let (xp, yp) = (previous.x as f64, previous.y as f64);
            let (xc, yc) = (current.x as f64, current.y as f64);
            let cross = xp * yc - xc * yp;
            a00 += cross;
            a10 += cross * (xp + xc);
            a01 += cross * (yp + yc);
            previous = current;
        }

        let sign = if a00 < 0.0 { -1.0 } else { 1.0 };
        Self {
            m00: sign * a00 / 2.0,
            m10: sign * a10 / 6.0,
            m01: sign * a01 / 6.0,
        }
    }

    /// Enclosed area in square pixels.
    pub fn area(&self) -> f64 {
        self.m00
    }

    /// Rounded center of mass, or `None` for a zero-mass contour.
    pub fn centroid(&self) -> Option<Point> {
        if self.m00 <= f64::EPSILON {
            return None;
        }
        Some(Point::new(
            (self.m10 / self.m00).round() as i32,
            (self.m01 / self.m00).round() as i32,
        ))
    }
}
