//! Along-path distance: calculation and smoothing.
//!
//! Distances are cumulative meters from the first logical entry. Raw GPS fixes
//! on a survey cart jitter by a few centimeters between traces, so the per-step
//! increments are smoothed before they are used for horizontal scaling.

use crate::error::{Result, TraceFileError};
use crate::geo_utils::haversine_distance;
use crate::LatLon;

/// Cumulative haversine distance per entry.
///
/// An entry without position adds nothing; the next positioned entry is
/// measured from the last known position.
///
/// ```rust
/// use gpr_tracefile::{LatLon, distance::cumulative_distances};
///
/// let positions = vec![
///     Some(LatLon::new(56.0, 24.0)),
///     None,
///     Some(LatLon::new(56.0001, 24.0)),
/// ];
/// let distances = cumulative_distances(&positions);
/// assert_eq!(distances[0], 0.0);
/// assert_eq!(distances[1], 0.0);
/// assert!(distances[2] > 10.0);
/// ```
pub fn cumulative_distances(positions: &[Option<LatLon>]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(positions.len());
    let mut total = 0.0;
    let mut last: Option<LatLon> = None;

    for position in positions {
        if let Some(current) = position {
            if let Some(prev) = last {
                total += haversine_distance(&prev, current);
            }
            last = Some(*current);
        }
        distances.push(total);
    }

    distances
}

/// Smooth cumulative distances in place.
///
/// Step increments are replaced by their centered moving average over
/// `2 * radius + 1` steps (the window shrinks at the ends), then accumulated
/// again from the first value. Increments stay non-negative, so the result is
/// still monotonic.
///
/// Fails with [`TraceFileError::InvariantViolation`] if `distances` does not
/// cover exactly `expected_len` entries, and with
/// [`TraceFileError::NonFiniteDistance`] if any distance is NaN or infinite.
/// `distances` is left untouched on failure.
pub fn smooth_distances(distances: &mut [f64], expected_len: usize, radius: usize) -> Result<()> {
    if distances.len() != expected_len {
        return Err(TraceFileError::InvariantViolation(format!(
            "{} distances for {} logical traces",
            distances.len(),
            expected_len
        )));
    }
    if let Some(index) = distances.iter().position(|d| !d.is_finite()) {
        return Err(TraceFileError::NonFiniteDistance { index });
    }
    if distances.len() < 3 || radius == 0 {
        return Ok(());
    }

    let steps: Vec<f64> = distances.windows(2).map(|w| w[1] - w[0]).collect();
    let smoothed: Vec<f64> = (0..steps.len())
        .map(|i| {
            let from = i.saturating_sub(radius);
            let to = (i + radius + 1).min(steps.len());
            let window = &steps[from..to];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect();

    let mut total = distances[0];
    for (i, step) in smoothed.iter().enumerate() {
        total += step;
        distances[i + 1] = total;
    }

    Ok(())
}
