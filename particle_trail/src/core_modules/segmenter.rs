// THEORY:
// The `Segmenter` is the first stage of the per-frame pipeline. It answers a
// single question for every pixel: "could this be part of the tracked object?"
// and records the answer in a binary mask.
//
// Key architectural principles:
// 1.  **Smooth first**: a Gaussian blur removes sensor noise before any
//     thresholding, so single noisy pixels do not fragment the object's mask.
// 2.  **Threshold in HSV**: each blurred pixel is converted with
//     `Hsv::from_rgb` and switched on iff all three channels fall inside the
//     configured `ColorRange`.
// 3.  **Open the mask**: erosion followed by dilation with the same square
//     structuring element. Erosion deletes speckle smaller than the element;
//     dilation restores the surviving regions to roughly their original extent.
//     The order matters: dilating first would grow the speckle instead.
// 4.  **Stateless**: the mask is derived from the current frame only and is
//     discarded once the blob selector has read it.

use crate::core_modules::color_range::ColorRange;
use crate::core_modules::pixel::pixel::Hsv;
use crate::error::{Result, TrackerError};
use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{dilate, erode};

/// Mask value for a candidate pixel. Everything else is 0.
pub const MASK_ON: u8 = 255;

/// Sigma equivalent to an 11x11 Gaussian kernel with automatic sigma.
pub const DEFAULT_BLUR_SIGMA: f32 = 2.0;

/// Erosion and dilation passes, each with a 3x3 square element.
pub const DEFAULT_MORPH_ITERATIONS: u8 = 2;

/// Converts frames into binary candidate masks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segmenter {
    /// Standard deviation of the pre-threshold Gaussian blur. Always positive.
    blur_sigma: f32,
    /// How many 3x3 erosions (then dilations) the opening applies.
    morph_iterations: u8,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self {
            blur_sigma: DEFAULT_BLUR_SIGMA,
            morph_iterations: DEFAULT_MORPH_ITERATIONS,
        }
    }
}

impl Segmenter {
    pub fn new(blur_sigma: f32, morph_iterations: u8) -> Result<Self> {
        if blur_sigma.is_nan() || blur_sigma <= 0.0 {
            return Err(TrackerError::InvalidBlurSigma(blur_sigma));
        }
        Ok(Self {
            blur_sigma,
            morph_iterations,
        })
    }

    pub fn blur_sigma(&self) -> f32 {
        self.blur_sigma
    }

    pub fn morph_iterations(&self) -> u8 {
        self.morph_iterations
    }

    /// Blurs, thresholds and opens `frame`, returning a mask of the same size.
    /// Never fails; a frame without the target color yields an all-zero mask.
    pub fn segment(&self, frame: &RgbImage, color_range: &ColorRange) -> GrayImage {
        if frame.width() == 0 || frame.height() == 0 {
            return GrayImage::new(frame.width(), frame.height());
        }
        let blurred = gaussian_blur_f32(frame, self.blur_sigma);
        let mask = threshold(&blurred, color_range);
        open(&mask, self.morph_iterations)
    }
}

/// Switches on every pixel whose HSV form lies inside `color_range`.
pub fn threshold(frame: &RgbImage, color_range: &ColorRange) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let hsv = Hsv::from_rgb(frame.get_pixel(x, y));
        if color_range.contains(&hsv) {
            Luma([MASK_ON])
        } else {
            Luma([0])
        }
    })
}

/// Morphological opening. `iterations` passes of a 3x3 element are the same as
/// one pass of a `(2 * iterations + 1)` square, which is what the L-infinity
/// norm with radius `iterations` gives.
pub fn open(mask: &GrayImage, iterations: u8) -> GrayImage {
    if iterations == 0 {
        return mask.clone();
    }
    let eroded = erode(mask, Norm::LInf, iterations);
    dilate(&eroded, Norm::LInf, iterations)
}
