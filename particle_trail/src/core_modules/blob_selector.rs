// THEORY:
// The blob selector turns a binary mask into at most one `Blob`: the single
// object being tracked in this frame.
//
// Algorithm steps:
// 1.  **External contours**: the mask's borders are traced and only top-level
//     outer borders are kept. Holes inside a region, and regions sitting inside
//     those holes, are irrelevant for a solid-colored marker.
// 2.  **Largest by area**: every candidate's enclosed area is taken from its
//     zeroth raw moment. The strictly largest wins; on an exact tie the contour
//     found first in raster-scan order (top-to-bottom, left-to-right by the
//     border's starting pixel) is kept.
// 3.  **Centroid**: the winner's first moments give the centroid. A zero-mass
//     winner is a degenerate detection and the frame counts as "nothing found".
// 4.  **Enclosing circle**: computed only for the winner, for the halo and the
//     minimum-radius gate applied by the pipeline.
//
// Both "no contour" and "degenerate contour" are normal per-frame outcomes.
// They are logged at trace level and reported as `None`, never as errors.

use crate::core_modules::blob::{Blob, Point};
use crate::core_modules::enclosing_circle::min_enclosing_circle;
use crate::core_modules::moment::RawMoments;
use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};

pub mod blob_selector {
    use super::*;

    /// Selects the largest external region of `mask`, if there is a usable one.
    pub fn select(mask: &GrayImage) -> Option<Blob> {
        let contours = external_contours(mask);
        if contours.is_empty() {
            log::trace!("no contour in mask");
            return None;
        }
        let candidate_count = contours.len();

        let (contour, moments) = largest_by_area(contours)?;
        let Some(centroid) = moments.centroid() else {
            log::trace!(
                "largest of {} contours has zero mass ({} points), treating as absent",
                candidate_count,
                contour.len()
            );
            return None;
        };
        let enclosing_circle = min_enclosing_circle(&contour)?;

        log::trace!(
            "selected blob at ({}, {}) area {:.1} radius {:.1} from {} contours",
            centroid.x,
            centroid.y,
            moments.area(),
            enclosing_circle.radius,
            candidate_count
        );

        Some(Blob {
            contour,
            area: moments.area(),
            enclosing_circle,
            centroid,
        })
    }

    /// Outer borders that are not nested inside any other region, in the
    /// order they are met by a raster scan.
    pub fn external_contours(mask: &GrayImage) -> Vec<Vec<Point>> {
        find_contours::<i32>(mask)
            .into_iter()
            .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
            .map(|contour| {
                contour
                    .points
                    .into_iter()
                    .map(|p| Point::new(p.x, p.y))
                    .collect()
            })
            .collect()
    }

    /// First contour with the maximum area. Later contours must be strictly
    /// larger to replace the current best.
    fn largest_by_area(contours: Vec<Vec<Point>>) -> Option<(Vec<Point>, RawMoments)> {
        let mut best: Option<(Vec<Point>, RawMoments)> = None;
        for contour in contours {
            let moments = RawMoments::of_contour(&contour);
            let replace = match &best {
                Some((_, best_moments)) => moments.area() > best_moments.area(),
                None => true,
            };
            if replace {
                best = Some((contour, moments));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::blob_selector::*;
    use image::{GrayImage, Luma};
    use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
    use imageproc::rect::Rect;

    const ON: Luma<u8> = Luma([255]);

    #[test]
    fn empty_mask_selects_nothing() {
        assert!(select(&GrayImage::new(50, 50)).is_none());
    }

    #[test]
    fn single_pixel_region_is_degenerate() {
        let mut mask = GrayImage::new(50, 50);
        mask.put_pixel(20, 20, ON);
        assert_eq!(external_contours(&mask).len(), 1);
        assert!(select(&mask).is_none());
    }

    #[test]
    fn selects_the_larger_of_two_regions() {
        let mut mask = GrayImage::new(200, 120);
        draw_filled_circle_mut(&mut mask, (40, 40), 8, ON);
        draw_filled_circle_mut(&mut mask, (140, 70), 25, ON);

        let blob = select(&mask).unwrap();
        assert!((blob.centroid.x - 140).abs() <= 1);
        assert!((blob.centroid.y - 70).abs() <= 1);
        assert!((blob.enclosing_radius() - 25.0).abs() <= 1.0);
    }

    #[test]
    fn equal_areas_keep_the_first_in_scan_order() {
        let mut mask = GrayImage::new(100, 100);
        draw_filled_rect_mut(&mut mask, Rect::at(60, 10).of_size(10, 10), ON);
        draw_filled_rect_mut(&mut mask, Rect::at(10, 60).of_size(10, 10), ON);

        let blob = select(&mask).unwrap();
        assert!(blob.centroid.y < 50, "expected the upper square, got {:?}", blob.centroid);
    }

    #[test]
    fn holes_do_not_produce_extra_candidates() {
        let mut mask = GrayImage::new(100, 100);
        draw_filled_circle_mut(&mut mask, (50, 50), 30, ON);
        draw_filled_circle_mut(&mut mask, (50, 50), 10, Luma([0]));
        // An island inside the hole is nested, not external.
        mask.put_pixel(50, 50, ON);

        assert_eq!(external_contours(&mask).len(), 1);
        let blob = select(&mask).unwrap();
        assert!((blob.centroid.x - 50).abs() <= 1);
        assert!((blob.centroid.y - 50).abs() <= 1);
    }

    #[test]
    fn blob_area_matches_a_filled_square() {
        let mut mask = GrayImage::new(60, 60);
        draw_filled_rect_mut(&mut mask, Rect::at(10, 10).of_size(21, 21), ON);
        let blob = select(&mask).unwrap();
        // Pixel-center polygon of a 21x21 square spans 20x20.
        assert_eq!(blob.area, 400.0);
        assert_eq!(blob.centroid.x, 20);
        assert_eq!(blob.centroid.y, 20);
    }
}
