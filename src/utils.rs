//! Small image helpers shared across the pipeline.

use crate::geometry::Region;
use image::GrayImage;

/// Crop a region out of a grayscale frame.
///
/// The region is clamped to the frame first; returns `None` when the clamped
/// region covers no pixels.
#[allow(clippy::cast_sign_loss)] // coordinates are non-negative after clamping
pub fn crop_region(frame: &GrayImage, region: &Region) -> Option<GrayImage> {
    let clamped = region.clamped_to(frame.width(), frame.height())?;
    let view = image::imageops::crop_imm(
        frame,
        clamped.x as u32,
        clamped.y as u32,
        clamped.width as u32,
        clamped.height as u32,
    );
    Some(view.to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_crop_region_exact() {
        let mut frame = GrayImage::new(10, 10);
        frame.put_pixel(4, 5, Luma([200u8]));

        let crop = crop_region(&frame, &Region::new(3, 4, 4, 4)).unwrap();
        assert_eq!(crop.dimensions(), (4, 4));
        assert_eq!(crop.get_pixel(1, 1)[0], 200);
    }

    #[test]
    fn test_crop_region_clamps_to_frame() {
        let frame = GrayImage::new(10, 10);
        let crop = crop_region(&frame, &Region::new(8, 8, 6, 6)).unwrap();
        assert_eq!(crop.dimensions(), (2, 2));
    }

    #[test]
    fn test_crop_region_outside() {
        let frame = GrayImage::new(10, 10);
        assert!(crop_region(&frame, &Region::new(20, 20, 4, 4)).is_none());
    }
}
