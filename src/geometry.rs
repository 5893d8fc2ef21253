//! Geometry primitives and eye-band derivation.
//!
//! Regions are axis-aligned rectangles in frame-pixel coordinates. The eye
//! bands are a pure function of the face box: a horizontal strip starting at
//! 1/4.5 of the face height, one third of the face height tall, with a
//! 1/16-width margin trimmed from each side and the remainder split into
//! equal right/left halves.

use crate::constants::{EYE_BAND_HEIGHT_DIVISOR, EYE_BAND_MARGIN_DIVISOR, EYE_BAND_TOP_DIVISOR};

/// A point in frame-pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in frame-pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    #[must_use]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// True when the rectangle covers no pixels
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Translate by an offset
    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Intersect with a `width` × `height` frame, returning `None` when the
    /// intersection covers no pixels
    #[must_use]
    pub fn clamped_to(&self, width: u32, height: u32) -> Option<Self> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x + self.width).min(width as i32);
        let y1 = (self.y + self.height).min(height as i32);
        let clamped = Self::new(x0, y0, x1 - x0, y1 - y0);
        if clamped.is_empty() {
            None
        } else {
            Some(clamped)
        }
    }

    /// Centre point, rounded down
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Derive the right and left eye bands from a face box.
///
/// Each component is evaluated in floating point and truncated toward zero;
/// the left band starts where the (already truncated) right band ends.
///
/// ```
/// use eye_tracking::geometry::{eye_bands, Region};
///
/// let face = Region::new(100, 100, 200, 200);
/// let (right, left) = eye_bands(&face);
/// assert_eq!(right, Region::new(112, 144, 87, 66));
/// assert_eq!(left, Region::new(199, 144, 87, 66));
/// ```
#[allow(clippy::cast_possible_truncation)] // truncation is the specified rounding
pub fn eye_bands(face: &Region) -> (Region, Region) {
    let w = f64::from(face.width);
    let h = f64::from(face.height);

    let margin = w / EYE_BAND_MARGIN_DIVISOR;
    let band_x = (f64::from(face.x) + margin) as i32;
    let band_y = (f64::from(face.y) + h / EYE_BAND_TOP_DIVISOR) as i32;
    let eye_width = ((w - 2.0 * margin) / 2.0) as i32;
    let eye_height = (h / EYE_BAND_HEIGHT_DIVISOR) as i32;

    let right = Region::new(band_x, band_y, eye_width, eye_height);
    let left = Region::new(band_x + eye_width, band_y, eye_width, eye_height);
    (right, left)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_bands_reference_values() {
        let face = Region::new(100, 100, 200, 200);
        let (right, left) = eye_bands(&face);

        assert_eq!(right, Region::new(112, 144, 87, 66));
        assert_eq!(left, Region::new(199, 144, 87, 66));
    }

    #[test]
    fn test_eye_bands_deterministic() {
        let face = Region::new(37, 81, 123, 157);
        assert_eq!(eye_bands(&face), eye_bands(&face));
    }

    #[test]
    fn test_bands_do_not_overlap() {
        let face = Region::new(0, 0, 320, 320);
        let (right, left) = eye_bands(&face);
        assert_eq!(right.x + right.width, left.x);
        assert_eq!(right.y, left.y);
    }

    #[test]
    fn test_clamped_to_inside() {
        let r = Region::new(10, 10, 20, 20);
        assert_eq!(r.clamped_to(100, 100), Some(r));
    }

    #[test]
    fn test_clamped_to_partial() {
        let r = Region::new(-5, 90, 20, 20);
        let clamped = r.clamped_to(100, 100).unwrap();
        assert_eq!(clamped, Region::new(0, 90, 15, 10));
    }

    #[test]
    fn test_clamped_to_outside() {
        let r = Region::new(200, 200, 20, 20);
        assert!(r.clamped_to(100, 100).is_none());
    }

    #[test]
    fn test_center() {
        assert_eq!(Region::new(10, 20, 4, 6).center(), Point::new(12, 23));
    }
}
