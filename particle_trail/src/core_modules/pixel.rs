// THEORY (HSV Pixel Conversion):
// The `pixel` module is the lowest layer of the segmentation stack. It turns a
// single RGB pixel into hue/saturation/value, with no knowledge of neighbors.
// Thresholding on hue rather than on RGB distance keeps the tracked color
// recognizable when the lighting changes, because brightness mostly moves the
// value channel and leaves hue alone.
//
// Channel ranges follow the 8-bit convention of common vision toolkits:
// - hue:        degrees / 2, in [0, 180)
// - saturation: chroma / value scaled to [0, 255]
// - value:      max(R, G, B) in [0, 255]
// so that color bounds written for those toolkits (e.g. blue as
// `(100, 50, 50)..(140, 255, 255)`) can be used unchanged.

pub mod pixel {
    use image::Rgb;

    pub type Channel = u8;

    /// Number of distinct 8-bit hue steps (half-degrees of the color wheel).
    pub const HUE_STEPS: u16 = 180;

    /// A pixel in 8-bit hue/saturation/value form.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Hsv {
        /// Hue in half-degrees, 0..180.
        pub hue: Channel,
        /// Saturation, 0..=255.
        pub saturation: Channel,
        /// Value (brightest channel), 0..=255.
        pub value: Channel,
    }

    impl Hsv {
        pub const fn new(hue: Channel, saturation: Channel, value: Channel) -> Self {
            Self {
                hue,
                saturation,
                value,
            }
        }

        /// Converts an RGB pixel to 8-bit HSV.
        pub fn from_rgb(pixel: &Rgb<u8>) -> Self {
            let [red, green, blue] = pixel.0;
            let maximum_channel = red.max(green).max(blue);
            let minimum_channel = red.min(green).min(blue);
            let chroma = (maximum_channel - minimum_channel) as f32;

            let saturation = if maximum_channel == 0 {
                0
            } else {
                (255.0 * chroma / maximum_channel as f32).round() as Channel
            };

            if chroma == 0.0 {
                return Self::new(0, saturation, maximum_channel);
            }

            let (base_difference, sector_offset) = if maximum_channel == red {
                (green as f32 - blue as f32, 0.0)
            } else if maximum_channel == green {
                (blue as f32 - red as f32, 120.0)
            } else {
                (red as f32 - green as f32, 240.0)
            };

            let mut hue_degrees = 60.0 * base_difference / chroma + sector_offset;
            if hue_degrees < 0.0 {
                hue_degrees += 360.0;
            }
            // Rounding 359.x degrees lands on 180, which is hue 0 again.
            let hue = ((hue_degrees / 2.0).round() as u16 % HUE_STEPS) as Channel;

            Self::new(hue, saturation, maximum_channel)
        }

        /// True when every channel of `self` lies in `[lower, upper]` inclusive.
        pub fn within(&self, lower: &Hsv, upper: &Hsv) -> bool {
            (lower.hue..=upper.hue).contains(&self.hue)
                && (lower.saturation..=upper.saturation).contains(&self.saturation)
                && (lower.value..=upper.value).contains(&self.value)
        }

        /// Componentwise `self <= other`.
        pub fn is_componentwise_le(&self, other: &Hsv) -> bool {
            self.hue <= other.hue && self.saturation <= other.saturation && self.value <= other.value
        }
    }
}
