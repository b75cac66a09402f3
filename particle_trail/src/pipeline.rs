// THEORY:
// The `pipeline` module is the top-level API of the tracker. It wires the
// core modules into the per-frame sequence
//     resize -> segment -> select -> trail push -> render
// and drives that sequence from a frame source to a display sink.
//
// Key architectural principles:
// 1.  **Explicit context**: the color range, trail capacity and the trail
//     itself live in one `TrackerContext` owned by the caller and passed by
//     reference into the loop. Nothing is global.
// 2.  **Collaborators behind traits**: camera/file decoding and windowing are
//     `FrameSource` and `DisplaySink` implementations supplied by the front
//     end. Their handles are released by `Drop`, so every exit path (including
//     `?` on an error) closes them.
// 3.  **Single-threaded and in order**: each frame is fully processed, shown
//     and polled for a key before the next one is read. The trail depends on
//     frame order, so there is nothing to parallelise.
// 4.  **One exit check per iteration**: the loop is a small state machine
//     (Running -> Stopping -> Stopped). An iteration ends with exactly one
//     decision: continue, or stop because the source ran out or the user
//     asked to quit.

use crate::core_modules::blob::Blob;
use crate::core_modules::blob_selector::blob_selector;
use crate::core_modules::color_range::ColorRange;
use crate::core_modules::renderer::{self, RenderSummary};
use crate::core_modules::segmenter::{DEFAULT_BLUR_SIGMA, DEFAULT_MORPH_ITERATIONS, Segmenter};
use crate::core_modules::trail::{Centroid, DEFAULT_CAPACITY, Timestamp, TrailBuffer};
use crate::error::{Result, TrackerError};
use crate::frame::{DEFAULT_FRAME_WIDTH, normalize_width};
use chrono::Local;
use image::RgbImage;
use std::time::Duration;

// Re-export key data structures for the public API.
pub use crate::core_modules::blob::Point;
pub use crate::core_modules::pixel::pixel::Hsv;
pub use crate::core_modules::trail::TrailEntry;

/// Key that ends the loop when pressed in the display window.
pub const QUIT_KEY: char = 'q';

/// How long the sink waits for a key press after each frame.
pub const KEY_POLL_TIMEOUT_MS: i32 = 1;

/// Blobs whose enclosing radius is at or below this are tracked but not drawn.
pub const DEFAULT_MIN_RADIUS: f64 = 10.0;

/// Pause after opening a source so camera exposure and focus can settle.
pub const DEFAULT_WARMUP: Duration = Duration::from_secs(2);

/// Tunable parameters of a tracking run. Fixed once the run starts.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub color_range: ColorRange,
    /// Number of frames the trail remembers.
    pub capacity: usize,
    /// Frames are resized to this width before anything else happens.
    pub frame_width: u32,
    pub blur_sigma: f32,
    pub morph_iterations: u8,
    /// Minimum enclosing radius, exclusive, for the marker to be drawn.
    pub min_radius: f64,
    pub warmup: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            color_range: ColorRange::default(),
            capacity: DEFAULT_CAPACITY,
            frame_width: DEFAULT_FRAME_WIDTH,
            blur_sigma: DEFAULT_BLUR_SIGMA,
            morph_iterations: DEFAULT_MORPH_ITERATIONS,
            min_radius: DEFAULT_MIN_RADIUS,
            warmup: DEFAULT_WARMUP,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(TrackerError::InvalidCapacity);
        }
        if self.frame_width == 0 {
            return Err(TrackerError::InvalidWidth);
        }
        if self.blur_sigma.is_nan() || self.blur_sigma <= 0.0 {
            return Err(TrackerError::InvalidBlurSigma(self.blur_sigma));
        }
        if !self.min_radius.is_finite() || self.min_radius < 0.0 {
            return Err(TrackerError::InvalidMinRadius(self.min_radius));
        }
        Ok(())
    }
}

/// Yields frames until the stream ends.
pub trait FrameSource {
    /// The next frame, or `Ok(None)` once the stream is exhausted.
    fn read_frame(&mut self) -> Result<Option<RgbImage>>;
}

/// Shows annotated frames and reports key presses.
pub trait DisplaySink {
    fn show(&mut self, frame: &RgbImage) -> Result<()>;

    /// Waits up to `timeout_ms` for a key press.
    fn poll_key(&mut self, timeout_ms: i32) -> Result<Option<char>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopping,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    UserRequested,
}

/// Per-frame result of `TrackerContext::process_frame`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    /// What was appended to the trail for this frame.
    pub centroid: Centroid,
    /// The selected blob, whether or not it passed the radius gate.
    pub blob: Option<Blob>,
    pub render: RenderSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames_processed: u64,
    pub stop_reason: StopReason,
}

/// Everything the frame loop carries from one iteration to the next.
#[derive(Debug, Clone)]
pub struct TrackerContext {
    config: TrackerConfig,
    segmenter: Segmenter,
    trail: TrailBuffer,
}

impl TrackerContext {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        let segmenter = Segmenter::new(config.blur_sigma, config.morph_iterations)?;
        let trail = TrailBuffer::new(config.capacity)?;
        Ok(Self {
            config,
            segmenter,
            trail,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn into_trail(self) -> TrailBuffer {
        self.trail
    }

    /// Runs one frame through the pipeline and returns the annotated frame.
    pub fn process_frame(&mut self, frame: RgbImage, timestamp: Timestamp) -> (RgbImage, FrameOutcome) {
        let mut frame = normalize_width(frame, self.config.frame_width);

        let mask = self.segmenter.segment(&frame, &self.config.color_range);
        let blob = blob_selector::select(&mask);

        let centroid = Centroid::from(blob.as_ref().map(|b| b.centroid));
        self.trail.push(centroid, timestamp);

        let drawable = blob.as_ref().filter(|b| b.is_drawable(self.config.min_radius));
        let render = renderer::render(&mut frame, drawable, &self.trail);

        (
            frame,
            FrameOutcome {
                centroid,
                blob,
                render,
            },
        )
    }
}

/// Pulls frames from `source` until it is exhausted or the user presses
/// `QUIT_KEY`, showing each annotated frame on `sink`.
///
/// Source and sink errors abort the loop and are returned; the trail keeps
/// every frame processed up to that point.
pub fn run<S, D>(context: &mut TrackerContext, source: &mut S, sink: &mut D) -> Result<RunSummary>
where
    S: FrameSource + ?Sized,
    D: DisplaySink + ?Sized,
{
    let mut state = LoopState::Running;
    let mut frames_processed = 0u64;
    let mut stop_reason = StopReason::EndOfStream;

    while state != LoopState::Stopped {
        state = match state {
            LoopState::Running => {
                let timestamp = Local::now();
                let stop = match source.read_frame()? {
                    None => Some(StopReason::EndOfStream),
                    Some(frame) => {
                        let (annotated, outcome) = context.process_frame(frame, timestamp);
                        frames_processed += 1;
                        log::trace!(
                            "frame {}: {} (marker: {}, segments: {})",
                            frames_processed,
                            outcome.centroid,
                            outcome.render.marker_drawn,
                            outcome.render.segments_drawn
                        );
                        sink.show(&annotated)?;
                        match sink.poll_key(KEY_POLL_TIMEOUT_MS)? {
                            Some(key) if key == QUIT_KEY => Some(StopReason::UserRequested),
                            _ => None,
                        }
                    }
                };
                match stop {
                    Some(reason) => {
                        stop_reason = reason;
                        LoopState::Stopping
                    }
                    None => LoopState::Running,
                }
            }
            LoopState::Stopping => {
                log::debug!(
                    "stopping after {} frames: {:?}",
                    frames_processed,
                    stop_reason
                );
                LoopState::Stopped
            }
            LoopState::Stopped => LoopState::Stopped,
        };
    }

    Ok(RunSummary {
        frames_processed,
        stop_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = TrackerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.capacity, 64);
        assert_eq!(config.frame_width, 600);
        assert_eq!(config.min_radius, 10.0);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let zero_capacity = TrackerConfig {
            capacity: 0,
            ..TrackerConfig::default()
        };
        assert!(matches!(
            TrackerContext::new(zero_capacity),
            Err(TrackerError::InvalidCapacity)
        ));

        let zero_width = TrackerConfig {
            frame_width: 0,
            ..TrackerConfig::default()
        };
        assert!(matches!(zero_width.validate(), Err(TrackerError::InvalidWidth)));

        let no_blur = TrackerConfig {
            blur_sigma: 0.0,
            ..TrackerConfig::default()
        };
        assert!(matches!(no_blur.validate(), Err(TrackerError::InvalidBlurSigma(_))));
    }

    #[test]
    fn unusable_min_radius_is_rejected() {
        for min_radius in [f64::NAN, f64::INFINITY, -1.0] {
            let config = TrackerConfig {
                min_radius,
                ..TrackerConfig::default()
            };
            assert!(matches!(
                TrackerContext::new(config),
                Err(TrackerError::InvalidMinRadius(_))
            ));
        }
        let zero = TrackerConfig {
            min_radius: 0.0,
            ..TrackerConfig::default()
        };
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn blank_frame_records_an_absent_entry() {
        let mut context = TrackerContext::new(TrackerConfig::default()).unwrap();
        let (annotated, outcome) = context.process_frame(RgbImage::new(600, 400), Local::now());

        assert_eq!(outcome.centroid, Centroid::Absent);
        assert!(outcome.blob.is_none());
        assert_eq!(outcome.render, RenderSummary::default());
        assert_eq!(annotated.dimensions(), (600, 400));
        assert_eq!(context.trail().len(), 1);
    }

    #[test]
    fn frames_are_resized_to_the_configured_width() {
        let mut context = TrackerContext::new(TrackerConfig::default()).unwrap();
        let (annotated, _) = context.process_frame(RgbImage::new(1200, 800), Local::now());
        assert_eq!(annotated.dimensions(), (600, 400));
    }
}
