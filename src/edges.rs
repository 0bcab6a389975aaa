//! # Edge Detection
//!
//! Classifies local amplitude extrema in each trace. Layer boundaries show up as
//! runs of same-kind edges at similar depths across neighbouring traces, which
//! is what downstream profile detection follows.
//!
//! | Code | Meaning |
//! |------|---------|
//! | [`EDGE_NONE`] | no edge |
//! | [`EDGE_POSITIVE_MAX`] | local maximum above zero |
//! | [`EDGE_NEGATIVE_MAX`] | local maximum below zero |
//! | [`EDGE_POSITIVE_MIN`] | local minimum above zero |
//! | [`EDGE_NEGATIVE_MIN`] | local minimum below zero |
//!
//! Edges are recomputed wholesale, never maintained incrementally.

use std::ops::Range;

use crate::trace::Trace;

pub const EDGE_NONE: u8 = 0;
pub const EDGE_POSITIVE_MAX: u8 = 1;
pub const EDGE_NEGATIVE_MAX: u8 = 2;
pub const EDGE_POSITIVE_MIN: u8 = 3;
pub const EDGE_NEGATIVE_MIN: u8 = 4;

/// Edge codes for one sample sequence.
///
/// The first and last samples never carry an edge. Plateaus are attributed to
/// their first sample. Extrema with `|amplitude| < threshold` are ignored.
pub fn classify_edges(samples: &[f32], threshold: f32) -> Vec<u8> {
    let mut edges = vec![EDGE_NONE; samples.len()];
    if samples.len() < 3 {
        return edges;
    }

    for i in 1..samples.len() - 1 {
        let prev = samples[i - 1];
        let cur = samples[i];
        let next = samples[i + 1];

        if cur.abs() < threshold {
            continue;
        }

        edges[i] = if cur > prev && cur >= next {
            if cur > 0.0 {
                EDGE_POSITIVE_MAX
            } else {
                EDGE_NEGATIVE_MAX
            }
        } else if cur < prev && cur <= next {
            if cur > 0.0 {
                EDGE_POSITIVE_MIN
            } else {
                EDGE_NEGATIVE_MIN
            }
        } else {
            EDGE_NONE
        };
    }

    edges
}

/// Recompute edges for `traces`, or only for the traces in `hint` when given.
///
/// A hint reaching past the end is clamped to the available traces.
pub fn find_edges(traces: &mut [Trace], hint: Option<Range<usize>>, threshold: f32) {
    let len = traces.len();
    let range = match hint {
        Some(r) => {
            let start = r.start.min(len);
            start..r.end.clamp(start, len)
        }
        None => 0..len,
    };
    let traces = &mut traces[range];

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        traces
            .par_iter_mut()
            .for_each(|trace| trace.edges = classify_edges(&trace.samples, threshold));
    }

    #[cfg(not(feature = "parallel"))]
    {
        for trace in traces.iter_mut() {
            trace.edges = classify_edges(&trace.samples, threshold);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_edges_extrema() {
        let samples = [0.0, 5.0, 1.0, -4.0, -1.0, -3.0, -2.0, 2.0, 1.0];
        let edges = classify_edges(&samples, 0.0);
        assert_eq!(
            edges,
            vec![
                EDGE_NONE,
                EDGE_POSITIVE_MAX,
                EDGE_NONE,
                EDGE_NEGATIVE_MIN,
                EDGE_NEGATIVE_MAX,
                EDGE_NEGATIVE_MIN,
                EDGE_NONE,
                EDGE_POSITIVE_MAX,
                EDGE_NONE,
            ]
        );
    }

    #[test]
    fn test_classify_edges_positive_min() {
        let edges = classify_edges(&[5.0, 2.0, 6.0], 0.0);
        assert_eq!(edges[1], EDGE_POSITIVE_MIN);
    }

    #[test]
    fn test_threshold_suppresses_weak_extrema() {
        let samples = [0.0, 0.5, 0.0, 8.0, 0.0];
        let edges = classify_edges(&samples, 1.0);
        assert_eq!(edges[1], EDGE_NONE);
        assert_eq!(edges[3], EDGE_POSITIVE_MAX);
    }

    #[test]
    fn test_short_traces_have_no_edges() {
        assert_eq!(classify_edges(&[], 0.0), Vec::<u8>::new());
        assert_eq!(classify_edges(&[1.0, 2.0], 0.0), vec![0, 0]);
    }

    #[test]
    fn test_find_edges_respects_hint() {
        let mut traces: Vec<Trace> = (0..3)
            .map(|i| Trace::new(i, vec![0.0, 3.0, 0.0]))
            .collect();

        find_edges(&mut traces, Some(1..10), 0.0);

        assert!(traces[0].edges.is_empty());
        assert_eq!(traces[1].edges, vec![0, EDGE_POSITIVE_MAX, 0]);
        assert_eq!(traces[2].edges, vec![0, EDGE_POSITIVE_MAX, 0]);
    }
}
