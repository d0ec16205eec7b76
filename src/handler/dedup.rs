//! Greedy overlap deduplication.

use crate::model::Rect;

/// Default overlap threshold.
pub const DEFAULT_OVERLAP_THRESHOLD: f32 = 0.5;

/// Check whether `a` and `b` overlap by more than `threshold` of the smaller area.
///
/// Zero-area rectangles never overlap anything.
pub fn overlaps(a: &Rect, b: &Rect, threshold: f32) -> bool {
    a.overlap_ratio(b) > threshold
}

/// Remove rectangles that overlap an earlier kept rectangle.
///
/// Scans left to right and keeps a candidate only if its
/// intersection-over-min-area with every kept rectangle is at most
/// `threshold`. Input order is preserved and the first occurrence wins.
/// Callers filter degenerate rectangles beforehand.
pub fn dedup(rects: &[Rect], threshold: f32) -> Vec<Rect> {
    dedup_by(rects.to_vec(), threshold, |r| *r)
}

/// Same as [`dedup`] for arbitrary items carrying a rectangle.
pub fn dedup_by<T, F>(items: Vec<T>, threshold: f32, rect_of: F) -> Vec<T>
where
    F: Fn(&T) -> Rect,
{
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        let rect = rect_of(&item);
        if kept.iter().all(|k| !overlaps(&rect_of(k), &rect, threshold)) {
            kept.push(item);
        }
    }
    kept
}
