//! Eye localisation within an eye band.
//!
//! During the learning phase the tracker needs a rough eye box inside each
//! band before it can crop an iris template. The locator is a trait so any
//! detector can plug in; the default backend votes with image gradients: a
//! dark, circular region (the iris) is where many gradient vectors point
//! back at a common centre.

use crate::constants::{FAST_EYE_WIDTH, GRADIENT_THRESHOLD_FACTOR, WEIGHT_BLUR_SIGMA};
use crate::geometry::{Point, Region};
use image::{imageops, GrayImage};

/// Locates an eye box inside a band image.
///
/// Coordinates in the returned region are local to the band. `None` means no
/// eye was found this frame; the caller degrades silently.
pub trait EyeDetector: Send {
    fn detect_eye(&self, band: &GrayImage) -> Option<Region>;
}

/// Gradient-voting eye locator.
///
/// The band is downscaled to a fixed working width, gradients below a
/// dynamic magnitude threshold are discarded, and each remaining gradient
/// votes for the candidate centres it points at, weighted by darkness. The
/// winning centre is mapped back to band coordinates and wrapped in a box
/// half the band's size.
pub struct GradientEyeDetector {
    fast_width: u32,
    threshold_factor: f64,
    blur_sigma: f32,
}

impl GradientEyeDetector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fast_width: FAST_EYE_WIDTH,
            threshold_factor: GRADIENT_THRESHOLD_FACTOR,
            blur_sigma: WEIGHT_BLUR_SIGMA,
        }
    }

    /// Central-difference gradient along x; border pixels use forward/backward
    /// differences
    fn gradient_x(image: &GrayImage) -> Vec<f64> {
        let (w, h) = image.dimensions();
        let mut grad = vec![0.0; (w * h) as usize];
        for y in 0..h {
            for x in 0..w {
                let left = image.get_pixel(x.saturating_sub(1), y)[0];
                let right = image.get_pixel((x + 1).min(w - 1), y)[0];
                let scale = if x == 0 || x == w - 1 { 1.0 } else { 2.0 };
                grad[(y * w + x) as usize] = (f64::from(right) - f64::from(left)) / scale;
            }
        }
        grad
    }

    fn gradient_y(image: &GrayImage) -> Vec<f64> {
        let (w, h) = image.dimensions();
        let mut grad = vec![0.0; (w * h) as usize];
        for y in 0..h {
            for x in 0..w {
                let up = image.get_pixel(x, y.saturating_sub(1))[0];
                let down = image.get_pixel(x, (y + 1).min(h - 1))[0];
                let scale = if y == 0 || y == h - 1 { 1.0 } else { 2.0 };
                grad[(y * w + x) as usize] = (f64::from(down) - f64::from(up)) / scale;
            }
        }
        grad
    }

    /// Magnitude threshold: mean plus a factor of the standard error
    fn dynamic_threshold(magnitudes: &[f64], factor: f64) -> f64 {
        let n = magnitudes.len() as f64;
        if n == 0.0 {
            return 0.0;
        }
        let mean = magnitudes.iter().sum::<f64>() / n;
        let variance = magnitudes.iter().map(|m| (m - mean).powi(2)).sum::<f64>() / n;
        factor * (variance.sqrt() / n.sqrt()) + mean
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn vote_for_center(band: &GrayImage, gx: &[f64], gy: &[f64], blur_sigma: f32) -> Option<Point> {
        let (w, h) = band.dimensions();
        let weight = imageops::blur(band, blur_sigma);
        let mut scores = vec![0.0f64; (w * h) as usize];

        for y in 0..h {
            for x in 0..w {
                let idx = (y * w + x) as usize;
                let (dir_x, dir_y) = (gx[idx], gy[idx]);
                if dir_x == 0.0 && dir_y == 0.0 {
                    continue;
                }
                for cy in 0..h {
                    for cx in 0..w {
                        if cx == x && cy == y {
                            continue;
                        }
                        let dx = f64::from(x) - f64::from(cx);
                        let dy = f64::from(y) - f64::from(cy);
                        let len = (dx * dx + dy * dy).sqrt();
                        let dot = (dx / len) * dir_x + (dy / len) * dir_y;
                        if dot <= 0.0 {
                            continue;
                        }
                        let dark = 255.0 - f64::from(weight.get_pixel(cx, cy)[0]);
                        scores[(cy * w + cx) as usize] += dot * dot * dark;
                    }
                }
            }
        }

        let (best_idx, best) = scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))?;
        if *best <= 0.0 {
            return None;
        }
        Some(Point::new((best_idx as u32 % w) as i32, (best_idx as u32 / w) as i32))
    }
}

impl Default for GradientEyeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EyeDetector for GradientEyeDetector {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn detect_eye(&self, band: &GrayImage) -> Option<Region> {
        let (w, h) = band.dimensions();
        if w < 4 || h < 4 {
            return None;
        }

        // Vote on a downscaled copy; band sizes grow with the face while the
        // iris structure survives a fixed working width
        let scale = if w > self.fast_width {
            f64::from(self.fast_width) / f64::from(w)
        } else {
            1.0
        };
        let small_w = ((f64::from(w) * scale) as u32).max(4);
        let small_h = ((f64::from(h) * scale) as u32).max(4);
        let small = imageops::resize(band, small_w, small_h, imageops::FilterType::Triangle);

        let mut gx = Self::gradient_x(&small);
        let mut gy = Self::gradient_y(&small);
        let magnitudes: Vec<f64> = gx
            .iter()
            .zip(gy.iter())
            .map(|(x, y)| (x * x + y * y).sqrt())
            .collect();
        let threshold = Self::dynamic_threshold(&magnitudes, self.threshold_factor);

        for (i, magnitude) in magnitudes.iter().enumerate() {
            if *magnitude > threshold {
                gx[i] /= magnitude;
                gy[i] /= magnitude;
            } else {
                gx[i] = 0.0;
                gy[i] = 0.0;
            }
        }

        let center_small = Self::vote_for_center(&small, &gx, &gy, self.blur_sigma)?;
        let center = Point::new(
            (f64::from(center_small.x) / scale) as i32,
            (f64::from(center_small.y) / scale) as i32,
        );

        // Eye box: half the band, centred on the vote winner, kept inside the band
        let box_w = (w / 2).max(1) as i32;
        let box_h = (h / 2).max(1) as i32;
        let eye_box = Region::new(center.x - box_w / 2, center.y - box_h / 2, box_w, box_h);
        eye_box.clamped_to(w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Bright band with a dark disc, the usual iris silhouette
    fn band_with_iris(w: u32, h: u32, cx: i32, cy: i32, r: i32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| {
            let dx = x as i32 - cx;
            let dy = y as i32 - cy;
            if dx * dx + dy * dy <= r * r {
                Luma([20u8])
            } else {
                Luma([220u8])
            }
        })
    }

    #[test]
    fn test_detects_dark_disc_center() {
        let band = band_with_iris(60, 40, 22, 19, 6);
        let detector = GradientEyeDetector::new();

        let eye_box = detector.detect_eye(&band).expect("disc should be found");
        let center = eye_box.center();
        assert!((center.x - 22).abs() <= 6, "center.x = {}", center.x);
        assert!((center.y - 19).abs() <= 6, "center.y = {}", center.y);
    }

    #[test]
    fn test_tiny_band_rejected() {
        let detector = GradientEyeDetector::new();
        assert!(detector.detect_eye(&GrayImage::new(3, 3)).is_none());
    }

    #[test]
    fn test_box_stays_inside_band() {
        let band = band_with_iris(48, 32, 2, 2, 4);
        let detector = GradientEyeDetector::new();

        if let Some(eye_box) = detector.detect_eye(&band) {
            assert!(eye_box.x >= 0 && eye_box.y >= 0);
            assert!(eye_box.x + eye_box.width <= 48);
            assert!(eye_box.y + eye_box.height <= 32);
        }
    }

    #[test]
    fn test_dynamic_threshold_flat_input() {
        let flat = vec![5.0; 100];
        let t = GradientEyeDetector::dynamic_threshold(&flat, 50.0);
        assert!((t - 5.0).abs() < 1e-9);
    }
}
