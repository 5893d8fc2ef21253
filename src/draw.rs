//! Overlay rendering of detection and tracking results.
//!
//! Markers are drawn onto an RGBA copy of the input frame: face boxes, the
//! derived eye bands, the matched template footprints and an iris dot.

use crate::face_detection::FaceDetection;
use crate::geometry::{Point, Region};
use crate::tracking::TrackingReport;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

/// Face bounding box colour
pub const FACE_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);
/// Eye band colour
pub const EYE_BAND_COLOR: Rgba<u8> = Rgba([0, 128, 255, 255]);
/// Template footprint colour
pub const TEMPLATE_COLOR: Rgba<u8> = Rgba([255, 255, 0, 255]);
/// Iris marker colour
pub const IRIS_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Iris marker radius in pixels
const IRIS_RADIUS: i32 = 3;

#[allow(clippy::cast_sign_loss)]
fn to_rect(region: &Region) -> Option<Rect> {
    if region.is_empty() {
        return None;
    }
    Some(Rect::at(region.x, region.y).of_size(region.width as u32, region.height as u32))
}

/// Draw a hollow rectangle for a region, skipping empty ones
pub fn draw_region(canvas: &mut RgbaImage, region: &Region, color: Rgba<u8>) {
    if let Some(rect) = to_rect(region) {
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

/// Draw the iris dot
pub fn draw_iris_marker(canvas: &mut RgbaImage, iris: &Point) {
    draw_filled_circle_mut(canvas, (iris.x, iris.y), IRIS_RADIUS, IRIS_COLOR);
}

/// Draw every detected face box
pub fn draw_faces(canvas: &mut RgbaImage, detections: &[FaceDetection]) {
    for detection in detections {
        draw_region(canvas, &detection.region, FACE_COLOR);
    }
}

/// Draw one tracking report: eye bands, template footprints, iris markers
pub fn draw_tracking(canvas: &mut RgbaImage, report: &TrackingReport) {
    draw_region(canvas, &report.right_band, EYE_BAND_COLOR);
    draw_region(canvas, &report.left_band, EYE_BAND_COLOR);

    for observation in [report.right.as_ref(), report.left.as_ref()].into_iter().flatten() {
        draw_region(canvas, &observation.template_box, TEMPLATE_COLOR);
        draw_iris_marker(canvas, &observation.iris);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Region;

    #[test]
    fn test_draw_region_marks_border() {
        let mut canvas = RgbaImage::new(40, 40);
        draw_region(&mut canvas, &Region::new(10, 10, 10, 10), FACE_COLOR);
        assert_eq!(*canvas.get_pixel(10, 10), FACE_COLOR);
        // Interior untouched
        assert_eq!(canvas.get_pixel(15, 15)[3], 0);
    }

    #[test]
    fn test_empty_region_is_skipped() {
        let mut canvas = RgbaImage::new(10, 10);
        draw_region(&mut canvas, &Region::new(2, 2, 0, 5), FACE_COLOR);
        assert!(canvas.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_iris_marker() {
        let mut canvas = RgbaImage::new(20, 20);
        draw_iris_marker(&mut canvas, &Point::new(10, 10));
        assert_eq!(*canvas.get_pixel(10, 10), IRIS_COLOR);
    }
}
