// THEORY:
// The renderer draws the tracking result onto the frame that will be shown.
//
// Two layers are drawn:
// 1.  **Marker**: for a blob that passed the minimum-radius gate, a circle
//     outline on its enclosing circle and a small filled dot on its centroid.
// 2.  **Trail**: a polyline through consecutive trail entries. A segment is
//     skipped whenever either endpoint is absent, which leaves a visible gap
//     where the object was lost. Segment thickness falls off with age as
//     `round(2.5 * sqrt(capacity / (i + 1)))`, so the path appears to fade.
//
// Segment selection (`plan_segments`) is separate from drawing so that which
// lines appear, and how thick, can be checked without inspecting pixels.

use crate::core_modules::blob::{Blob, Point};
use crate::core_modules::trail::TrailBuffer;
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut, draw_polygon_mut,
};
use imageproc::point::Point as PolygonPoint;

pub const HALO_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
pub const CENTROID_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const TRAIL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

const HALO_THICKNESS: i32 = 2;
const CENTROID_DOT_RADIUS: i32 = 5;
const THICKNESS_SCALE: f64 = 2.5;

/// A line to draw between trail entries `index - 1` and `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailSegment {
    pub index: usize,
    pub from: Point,
    pub to: Point,
    pub thickness: i32,
}

/// What `render` put on the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
    pub marker_drawn: bool,
    pub segments_drawn: usize,
}

/// Line thickness for the segment ending at trail index `index` (>= 1).
pub fn segment_thickness(capacity: usize, index: usize) -> i32 {
    let ratio = capacity as f64 / (index + 1) as f64;
    ((THICKNESS_SCALE * ratio.sqrt()).round() as i32).max(1)
}

/// Segments between consecutive present entries, newest first.
pub fn plan_segments(trail: &TrailBuffer) -> Vec<TrailSegment> {
    trail
        .snapshot()
        .windows(2)
        .enumerate()
        .filter_map(|(offset, pair)| {
            let index = offset + 1;
            let from = pair[0].centroid.point()?;
            let to = pair[1].centroid.point()?;
            Some(TrailSegment {
                index,
                from,
                to,
                thickness: segment_thickness(trail.capacity(), index),
            })
        })
        .collect()
}

/// Draws the marker for `drawable_blob` (if any) and the trail onto `frame`.
/// Callers pass only a blob that passed the minimum-radius gate.
pub fn render(frame: &mut RgbImage, drawable_blob: Option<&Blob>, trail: &TrailBuffer) -> RenderSummary {
    let mut summary = RenderSummary::default();

    if let Some(blob) = drawable_blob {
        draw_marker(frame, blob);
        summary.marker_drawn = true;
    }

    for segment in plan_segments(trail) {
        draw_thick_line_mut(frame, segment.from, segment.to, segment.thickness, TRAIL_COLOR);
        summary.segments_drawn += 1;
    }

    summary
}

fn draw_marker(frame: &mut RgbImage, blob: &Blob) {
    let center = blob.enclosing_circle.pixel_center();
    let radius = blob.enclosing_radius().round() as i32;
    for inset in 0..HALO_THICKNESS {
        if radius - inset > 0 {
            draw_hollow_circle_mut(frame, (center.x, center.y), radius - inset, HALO_COLOR);
        }
    }
    draw_filled_circle_mut(
        frame,
        (blob.centroid.x, blob.centroid.y),
        CENTROID_DOT_RADIUS,
        CENTROID_COLOR,
    );
}

/// Line of the given thickness with round caps.
pub fn draw_thick_line_mut(frame: &mut RgbImage, from: Point, to: Point, thickness: i32, color: Rgb<u8>) {
    if thickness <= 1 {
        draw_line_segment_mut(
            frame,
            (from.x as f32, from.y as f32),
            (to.x as f32, to.y as f32),
            color,
        );
        return;
    }

    let half_width = thickness as f64 / 2.0;
    let cap_radius = (thickness / 2).max(1);
    let (dx, dy) = ((to.x - from.x) as f64, (to.y - from.y) as f64);
    let length = dx.hypot(dy);

    if length >= 1.0 {
        let nx = -dy / length * half_width;
        let ny = dx / length * half_width;
        let offset = |p: Point, sign: f64| {
            PolygonPoint::new(
                (p.x as f64 + sign * nx).round() as i32,
                (p.y as f64 + sign * ny).round() as i32,
            )
        };
        let quad = [offset(from, 1.0), offset(to, 1.0), offset(to, -1.0), offset(from, -1.0)];
        draw_polygon_mut(frame, &quad, color);
    }

    draw_filled_circle_mut(frame, (from.x, from.y), cap_radius, color);
    draw_filled_circle_mut(frame, (to.x, to.y), cap_radius, color);
}
