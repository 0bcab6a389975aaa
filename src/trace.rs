//! A single physically captured GPR trace.

use serde::{Deserialize, Serialize};
use crate::LatLon;

/// One physically-ordered sample sequence.
///
/// `index` is the trace's position in the raw sequence. It is reassigned whenever
/// the raw sequence is replaced or reordered, so it is not a stable identity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trace {
    /// Physical index in the raw sequence
    #[serde(skip)]
    pub index: usize,
    /// Amplitude samples, ordered by depth/time offset
    pub samples: Vec<f32>,
    /// Point of interest flag
    #[serde(default)]
    pub marked: bool,
    /// Position recorded with the trace, if any
    #[serde(default)]
    pub lat_lon: Option<LatLon>,
    /// Per-sample edge classification (0 = none), see [`crate::edges`]
    #[serde(skip)]
    pub edges: Vec<u8>,
}

impl Trace {
    /// Create an unmarked trace without position.
    pub fn new(index: usize, samples: Vec<f32>) -> Self {
        Self {
            index,
            samples,
            marked: false,
            lat_lon: None,
            edges: Vec::new(),
        }
    }

    /// Builder-style position setter.
    pub fn with_lat_lon(mut self, lat_lon: LatLon) -> Self {
        self.lat_lon = Some(lat_lon);
        self
    }

    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }

    pub fn set_marked(&mut self, marked: bool) {
        self.marked = marked;
    }

    /// Mean amplitude, 0.0 for an empty trace.
    pub fn mean_amplitude(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f32>() / self.samples.len() as f32
    }
}
