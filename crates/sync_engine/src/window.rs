//! Per-camera timeframe window search.

use contracts::{Timeframe, Timestamp};

/// Index of the timeframe matching the `(t_prev, t_cur]` window
///
/// See [`find_matching_index_with_tolerance`].
#[inline]
pub fn find_matching_index(
    t_cur: Timestamp,
    t_prev: Timestamp,
    frames: &[Timeframe],
) -> Option<usize> {
    find_matching_index_with_tolerance(t_cur, t_prev, frames, 0)
}

/// Index of the timeframe matching the `(t_prev, t_cur + tolerance_us]` window
///
/// Among frames inside the window the one closest to `t_cur` wins; equal
/// distances resolve to the lower index. `None` when the camera produced no
/// frame in the window.
pub fn find_matching_index_with_tolerance(
    t_cur: Timestamp,
    t_prev: Timestamp,
    frames: &[Timeframe],
    tolerance_us: u64,
) -> Option<usize> {
    if t_cur < t_prev {
        return None;
    }
    let upper = t_cur.saturating_add(tolerance_us);

    frames
        .iter()
        .enumerate()
        .filter(|(_, f)| f.timestamp > t_prev && f.timestamp <= upper)
        .min_by_key(|(i, f)| (f.timestamp.abs_diff(t_cur), *i))
        .map(|(i, _)| i)
}
