use image::RgbImage;
use opencv::{
    core::{self, Mat, Scalar},
    highgui, imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use particle_trail::pipeline::{DisplaySink, FrameSource};
use particle_trail::{Result, TrackerError};
use std::path::Path;

/// Where frames come from.
#[derive(Debug, Clone)]
pub enum SourceSpec<'a> {
    Camera(i32),
    File(&'a Path),
}

/// OpenCV capture device or video file. Released when dropped.
pub struct CaptureSource {
    capture: VideoCapture,
    label: String,
}

impl CaptureSource {
    pub fn open(spec: SourceSpec<'_>) -> Result<Self> {
        let (capture, label) = match spec {
            SourceSpec::Camera(index) => (
                VideoCapture::new(index, videoio::CAP_ANY),
                format!("camera {index}"),
            ),
            SourceSpec::File(path) => {
                let path_str = path.to_str().ok_or_else(|| {
                    TrackerError::SourceUnavailable(format!("non UTF-8 path {}", path.display()))
                })?;
                (
                    VideoCapture::from_file(path_str, videoio::CAP_ANY),
                    path.display().to_string(),
                )
            }
        };
        let capture = capture.map_err(|e| TrackerError::SourceUnavailable(format!("{label}: {e}")))?;
        let opened = capture
            .is_opened()
            .map_err(|e| TrackerError::SourceUnavailable(format!("{label}: {e}")))?;
        if !opened {
            return Err(TrackerError::SourceUnavailable(format!("{label} could not be opened")));
        }
        log::info!("opened video source: {}", label);
        Ok(Self { capture, label })
    }
}

impl FrameSource for CaptureSource {
    fn read_frame(&mut self) -> Result<Option<RgbImage>> {
        let mut frame = Mat::default();
        let grabbed = self.capture.read(&mut frame).map_err(source_error)?;
        if !grabbed || frame.empty() {
            log::debug!("{}: end of stream", self.label);
            return Ok(None);
        }
        bgr_mat_to_rgb(&frame).map(Some)
    }
}

impl Drop for CaptureSource {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            log::warn!("{}: failed to release: {}", self.label, e);
        } else {
            log::debug!("{}: released", self.label);
        }
    }
}

/// A HighGUI window. Destroyed when dropped.
pub struct WindowDisplay {
    label: String,
}

impl WindowDisplay {
    pub fn new(label: &str) -> Result<Self> {
        highgui::named_window(label, highgui::WINDOW_AUTOSIZE).map_err(display_error)?;
        Ok(Self {
            label: label.to_string(),
        })
    }
}

impl DisplaySink for WindowDisplay {
    fn show(&mut self, frame: &RgbImage) -> Result<()> {
        let bgr = rgb_to_bgr_mat(frame)?;
        highgui::imshow(&self.label, &bgr).map_err(display_error)
    }

    fn poll_key(&mut self, timeout_ms: i32) -> Result<Option<char>> {
        let key = highgui::wait_key(timeout_ms).map_err(display_error)?;
        if key < 0 {
            return Ok(None);
        }
        Ok(char::from_u32((key & 0xFF) as u32))
    }
}

impl Drop for WindowDisplay {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_all_windows() {
            log::warn!("failed to close display windows: {}", e);
        }
    }
}

fn source_error(e: opencv::Error) -> TrackerError {
    TrackerError::Source(e.to_string())
}

fn display_error(e: opencv::Error) -> TrackerError {
    TrackerError::Display(e.to_string())
}

/// Converts an 8-bit BGR capture into an RGB image.
fn bgr_mat_to_rgb(frame: &Mat) -> Result<RgbImage> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0).map_err(source_error)?;
    let width = rgb.cols() as u32;
    let height = rgb.rows() as u32;
    let data = rgb.data_bytes().map_err(source_error)?.to_vec();
    RgbImage::from_raw(width, height, data)
        .ok_or_else(|| TrackerError::Source(format!("unexpected frame layout {width}x{height}")))
}

fn rgb_to_bgr_mat(frame: &RgbImage) -> Result<Mat> {
    let mut rgb = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        core::CV_8UC3,
        Scalar::all(0.0),
    )
    .map_err(display_error)?;
    rgb.data_bytes_mut()
        .map_err(display_error)?
        .copy_from_slice(frame.as_raw());

    let mut bgr = Mat::default();
    imgproc::cvt_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR, 0).map_err(display_error)?;
    Ok(bgr)
}
