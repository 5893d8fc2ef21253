//! Template matching for iris localisation.
//!
//! Matching uses normalized squared differences: the best alignment of the
//! template inside the search image is the location with the minimum score.

use crate::geometry::Point;
use image::GrayImage;
use imageproc::template_matching::{find_extremes, match_template, MatchTemplateMethod};

/// Result of a template search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Top-left corner of the best alignment, relative to the search image
    pub location: Point,
    /// Normalized squared-difference score at that location (lower is better)
    pub score: f32,
}

/// Locate `template` inside `image` by normalized squared differences.
///
/// Returns `None` when either buffer is empty or the template does not fit
/// inside the search image; a failed build therefore skips matching rather
/// than erroring.
#[allow(clippy::cast_possible_wrap)] // match result dims fit in i32
#[must_use]
pub fn best_match(image: &GrayImage, template: &GrayImage) -> Option<Match> {
    if image.width() == 0 || image.height() == 0 {
        return None;
    }
    if template.width() == 0 || template.height() == 0 {
        return None;
    }
    if template.width() > image.width() || template.height() > image.height() {
        return None;
    }

    let scores = match_template(image, template, MatchTemplateMethod::SumOfSquaredErrorsNormalized);
    let extremes = find_extremes(&scores);
    let (x, y) = extremes.min_value_location;

    Some(Match {
        location: Point::new(x as i32, y as i32),
        score: extremes.min_value,
    })
}

/// Position of the minimum-intensity pixel, used as a pupil-darkness proxy
#[allow(clippy::cast_possible_wrap)]
#[must_use]
pub fn darkest_point(image: &GrayImage) -> Option<Point> {
    if image.width() == 0 || image.height() == 0 {
        return None;
    }
    let extremes = find_extremes(image);
    let (x, y) = extremes.min_value_location;
    Some(Point::new(x as i32, y as i32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn textured(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            Luma([((x.wrapping_mul(31) ^ y.wrapping_mul(17)) % 253) as u8])
        })
    }

    #[test]
    fn test_embedded_template_recovered() {
        let image = textured(64, 48);
        let template = image::imageops::crop_imm(&image, 21, 13, 12, 12).to_image();

        let m = best_match(&image, &template).unwrap();
        assert_eq!(m.location, Point::new(21, 13));
        assert!(m.score <= 1e-6);
    }

    #[test]
    fn test_oversized_template_skipped() {
        let image = textured(16, 16);
        let template = textured(32, 32);
        assert!(best_match(&image, &template).is_none());
    }

    #[test]
    fn test_empty_template_skipped() {
        let image = textured(16, 16);
        let template = GrayImage::new(0, 0);
        assert!(best_match(&image, &template).is_none());
    }

    #[test]
    fn test_darkest_point() {
        let mut image = GrayImage::from_pixel(20, 20, Luma([200u8]));
        image.put_pixel(7, 11, Luma([3u8]));

        assert_eq!(darkest_point(&image), Some(Point::new(7, 11)));
    }

    #[test]
    fn test_darkest_point_empty() {
        assert!(darkest_point(&GrayImage::new(0, 0)).is_none());
    }
}
