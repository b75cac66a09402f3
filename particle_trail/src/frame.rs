use image::RgbImage;
use image::imageops::{self, FilterType};

/// Width every frame is resized to before processing.
pub const DEFAULT_FRAME_WIDTH: u32 = 600;

/// Resizes `frame` to `width`, preserving aspect ratio. Frames already at the
/// target width are returned untouched.
///
/// `Triangle` widens its support by the scale factor when shrinking, so a
/// downscale averages the covered source pixels like area interpolation.
pub fn normalize_width(frame: RgbImage, width: u32) -> RgbImage {
    let (current_width, current_height) = frame.dimensions();
    if current_width == width || current_width == 0 || current_height == 0 || width == 0 {
        return frame;
    }
    let height = ((current_height as f64 * width as f64 / current_width as f64).round() as u32).max(1);
    imageops::resize(&frame, width, height, FilterType::Triangle)
}
