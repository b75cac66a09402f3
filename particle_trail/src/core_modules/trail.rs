// THEORY:
// The trail is the only state that survives from one frame to the next. It is
// a fixed-capacity, newest-first record of where the object was seen, one
// entry per processed frame.
//
// Key architectural principles:
// 1.  **Explicit absence**: a frame without a usable detection still pushes an
//     entry, carrying `Centroid::Absent`. The renderer uses these markers to
//     break the drawn path instead of bridging a gap with a long false jump.
// 2.  **Bounded memory**: pushing onto a full buffer evicts exactly the oldest
//     entry, so `len() <= capacity()` holds at every point.
// 3.  **Single owner**: the buffer belongs to the pipeline context and is
//     only mutated from the frame loop; no locking is involved.

use crate::core_modules::blob::Point;
use crate::error::{Result, TrackerError};
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::fmt;

/// Trail capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 64;

pub type Timestamp = DateTime<Local>;

/// The tracked position for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Centroid {
    Present(Point),
    Absent,
}

impl Centroid {
    pub fn point(&self) -> Option<Point> {
        match self {
            Centroid::Present(point) => Some(*point),
            Centroid::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Centroid::Present(_))
    }
}

impl From<Option<Point>> for Centroid {
    fn from(point: Option<Point>) -> Self {
        point.map_or(Centroid::Absent, Centroid::Present)
    }
}

impl fmt::Display for Centroid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Centroid::Present(point) => write!(f, "({}, {})", point.x, point.y),
            Centroid::Absent => write!(f, "None"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailEntry {
    pub centroid: Centroid,
    pub timestamp: Timestamp,
}

/// Fixed-capacity, newest-first history of centroids.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    entries: VecDeque<TrailEntry>,
    capacity: usize,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(TrackerError::InvalidCapacity);
        }
        // Grows on demand; `capacity` only bounds eviction.
        Ok(Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
        })
    }

    /// Records one frame's outcome at the front, evicting the oldest entry if full.
    pub fn push(&mut self, centroid: Centroid, timestamp: Timestamp) {
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(TrailEntry {
            centroid,
            timestamp,
        });
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry `index` frames ago; 0 is the newest.
    pub fn get(&self, index: usize) -> Option<&TrailEntry> {
        self.entries.get(index)
    }

    /// Entries from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &TrailEntry> {
        self.entries.iter()
    }

    /// Owned copy of the entries, newest first.
    pub fn snapshot(&self) -> Vec<TrailEntry> {
        self.entries.iter().copied().collect()
    }

    pub fn centroids(&self) -> Vec<Centroid> {
        self.entries.iter().map(|entry| entry.centroid).collect()
    }

    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.entries.iter().map(|entry| entry.timestamp).collect()
    }

    /// `[(x, y), None, ...]`, newest first.
    pub fn format_centroids(&self) -> String {
        format_entries(&self.snapshot(), |e| e.centroid.to_string())
    }

    /// Timestamps in the same order as `format_centroids`.
    pub fn format_timestamps(&self) -> String {
        format_entries(&self.snapshot(), |e| {
            e.timestamp.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
        })
    }
}

fn format_entries(entries: &[TrailEntry], item: impl Fn(&TrailEntry) -> String) -> String {
    let items: Vec<String> = entries.iter().map(item).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(seconds: i64) -> Timestamp {
        Local.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(seconds)
    }

    fn present(x: i32, y: i32) -> Centroid {
        Centroid::Present(Point::new(x, y))
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(TrailBuffer::new(0), Err(TrackerError::InvalidCapacity)));
    }

    #[test]
    fn newest_entry_comes_first() {
        let mut trail = TrailBuffer::new(8).unwrap();
        trail.push(present(1, 1), at(0));
        trail.push(Centroid::Absent, at(1));
        trail.push(present(3, 3), at(2));

        assert_eq!(
            trail.centroids(),
            vec![present(3, 3), Centroid::Absent, present(1, 1)]
        );
        assert_eq!(trail.timestamps(), vec![at(2), at(1), at(0)]);
    }

    #[test]
    fn length_tracks_min_of_pushes_and_capacity() {
        for capacity in 1..6 {
            let mut trail = TrailBuffer::new(capacity).unwrap();
            for pushed in 1..=12usize {
                trail.push(present(pushed as i32, 0), at(pushed as i64));
                assert_eq!(trail.len(), pushed.min(capacity));
            }
        }
    }

    #[test]
    fn overflow_evicts_exactly_the_oldest() {
        let mut trail = TrailBuffer::new(3).unwrap();
        for i in 0..3 {
            trail.push(present(i, i), at(i as i64));
        }
        trail.push(present(9, 9), at(9));

        assert_eq!(trail.len(), 3);
        assert_eq!(
            trail.centroids(),
            vec![present(9, 9), present(2, 2), present(1, 1)]
        );
    }

    #[test]
    fn absent_frames_are_recorded() {
        let mut trail = TrailBuffer::new(4).unwrap();
        trail.push(Centroid::Absent, at(0));
        trail.push(Centroid::Absent, at(1));
        assert_eq!(trail.len(), 2);
        assert!(trail.iter().all(|e| !e.centroid.is_present()));
    }

    #[test]
    fn centroid_listing_format() {
        let mut trail = TrailBuffer::new(4).unwrap();
        trail.push(present(100, 100), at(0));
        trail.push(Centroid::Absent, at(1));
        trail.push(present(110, 105), at(2));
        assert_eq!(trail.format_centroids(), "[(110, 105), None, (100, 100)]");
        assert_eq!(trail.format_timestamps().matches(", ").count(), 2);
    }

    #[test]
    fn snapshot_pairs_centroids_with_timestamps() {
        let mut trail = TrailBuffer::new(3).unwrap();
        for i in 0..5 {
            let centroid = if i == 3 { Centroid::Absent } else { present(i, i) };
            trail.push(centroid, at(i as i64));
        }

        let snapshot = trail.snapshot();
        assert_eq!(snapshot.len(), 3);
        let pairs: Vec<(Centroid, Timestamp)> =
            snapshot.iter().map(|e| (e.centroid, e.timestamp)).collect();
        assert_eq!(
            pairs,
            vec![
                (present(4, 4), at(4)),
                (Centroid::Absent, at(3)),
                (present(2, 2), at(2)),
            ]
        );
    }

    #[test]
    fn snapshot_is_detached_from_later_pushes() {
        let mut trail = TrailBuffer::new(4).unwrap();
        trail.push(present(1, 1), at(0));
        let snapshot = trail.snapshot();
        trail.push(present(2, 2), at(1));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(trail.snapshot().len(), 2);
    }

    #[test]
    fn huge_capacity_does_not_allocate_up_front() {
        let mut trail = TrailBuffer::new(u32::MAX as usize).unwrap();
        trail.push(Centroid::Absent, at(0));
        assert_eq!(trail.len(), 1);
        assert_eq!(trail.capacity(), u32::MAX as usize);
    }

    #[test]
    fn centroid_from_option() {
        assert_eq!(Centroid::from(None), Centroid::Absent);
        assert_eq!(Centroid::from(Some(Point::new(2, 3))), present(2, 3));
    }
}
