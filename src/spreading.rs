//! Coordinate spreading.
//!
//! Low-rate positioning (e.g. 1 Hz GPS under a 50 traces/s radar) leaves many
//! consecutive traces with the same fix, and some without one. Along-path
//! distance over such a sequence is a staircase. Spreading redistributes the
//! repeated fixes linearly toward the next distinct fix.

use crate::geo_utils::lerp;
use crate::LatLon;

/// True when a step between two entries carries no usable movement.
fn is_degenerate_step(a: &Option<LatLon>, b: &Option<LatLon>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

/// Whether positions are degenerate enough to need spreading.
///
/// Returns true when at least `ratio` of the steps between consecutive entries
/// are degenerate (identical fixes or a missing fix on either end). Sequences
/// with fewer than two entries never need spreading.
pub fn is_spreading_necessary(positions: &[Option<LatLon>], ratio: f64) -> bool {
    if positions.len() < 2 {
        return false;
    }

    let degenerate = positions
        .windows(2)
        .filter(|w| is_degenerate_step(&w[0], &w[1]))
        .count();
    let steps = positions.len() - 1;

    degenerate as f64 / steps as f64 >= ratio
}

/// Spread repeated or missing positions in place.
///
/// Each run that starts at a fix and continues with copies of it (or with
/// missing fixes) is interpolated linearly up to the next distinct fix. A
/// trailing run with no following fix is extrapolated along the last
/// fix-to-fix step, or left as it is when the path has a single distinct fix.
/// Entries before the first fix are never touched. Returns the number of
/// entries that were moved.
pub fn spread_positions(positions: &mut [Option<LatLon>]) -> usize {
    let mut moved = 0;
    let mut previous: Option<(usize, LatLon)> = None;
    let mut anchor: Option<(usize, LatLon)> = None;

    for i in 0..positions.len() {
        let Some(current) = positions[i] else {
            continue;
        };
        if let Some((a, anchor_pos)) = anchor {
            if current == anchor_pos {
                continue;
            }
            let span = (i - a) as f64;
            for (k, slot) in positions[a + 1..i].iter_mut().enumerate() {
                let t = (k + 1) as f64 / span;
                *slot = Some(lerp(&anchor_pos, &current, t));
                moved += 1;
            }
        }
        previous = anchor;
        anchor = Some((i, current));
    }

    if let (Some((p, prev_pos)), Some((a, anchor_pos))) = (previous, anchor) {
        let span = (a - p) as f64;
        for (k, slot) in positions[a + 1..].iter_mut().enumerate() {
            let t = 1.0 + (k + 1) as f64 / span;
            *slot = Some(lerp(&prev_pos, &anchor_pos, t));
            moved += 1;
        }
    }

    moved
}
