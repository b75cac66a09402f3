use crate::core_modules::pixel::pixel::Hsv;
use crate::error::{Result, TrackerError};

/// Inclusive HSV bounds describing the color of the tracked object.
///
/// Fixed for the lifetime of a run. Construction guarantees
/// `lower <= upper` componentwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRange {
    lower: Hsv,
    upper: Hsv,
}

impl ColorRange {
    pub fn new(lower: Hsv, upper: Hsv) -> Result<Self> {
        if !lower.is_componentwise_le(&upper) {
            return Err(TrackerError::InvalidColorRange { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// The saturated-blue range the tracker uses when none is configured.
    pub const fn blue() -> Self {
        Self {
            lower: Hsv::new(100, 50, 50),
            upper: Hsv::new(140, 255, 255),
        }
    }

    pub fn lower(&self) -> Hsv {
        self.lower
    }

    pub fn upper(&self) -> Hsv {
        self.upper
    }

    pub fn contains(&self, hsv: &Hsv) -> bool {
        hsv.within(&self.lower, &self.upper)
    }
}

impl Default for ColorRange {
    fn default() -> Self {
        Self::blue()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_bounds() {
        let result = ColorRange::new(Hsv::new(140, 50, 50), Hsv::new(100, 255, 255));
        assert!(matches!(result, Err(TrackerError::InvalidColorRange { .. })));
    }

    #[test]
    fn accepts_degenerate_single_color_range() {
        let color = Hsv::new(30, 200, 200);
        let range = ColorRange::new(color, color).unwrap();
        assert!(range.contains(&color));
        assert!(!range.contains(&Hsv::new(31, 200, 200)));
    }

    #[test]
    fn default_range_matches_saturated_blue() {
        let range = ColorRange::default();
        assert!(range.contains(&Hsv::new(120, 255, 255)));
        assert!(!range.contains(&Hsv::new(0, 255, 255)));
        assert!(!range.contains(&Hsv::new(120, 10, 255)));
    }
}
