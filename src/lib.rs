//! # GPR Trace File
//!
//! Container for ground-penetrating radar (GPR) trace files with geo-referenced
//! sidecar metadata.
//!
//! This library provides:
//! - A raw, physically-ordered trace store with a logical view that reorders,
//!   filters or extends it through metadata without copying samples
//! - Sidecar metadata persistence (positions, sample range, marks)
//! - Along-path distance calculation, smoothing and coordinate spreading
//! - Per-trace edge detection
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel edge detection with rayon
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use gpr_tracefile::{GeoData, IndexLabels, LatLon, MetaFile, Trace, TraceFile};
//!
//! let traces: Vec<Trace> = (0..3)
//!     .map(|i| {
//!         let position = LatLon::new(56.0 + i as f64 * 1e-5, 24.0);
//!         Trace::new(i, vec![0.0, 1.0, 0.0]).with_lat_lon(position)
//!     })
//!     .collect();
//! let mut file = TraceFile::with_traces(traces);
//!
//! // metadata showing the traces in reverse, with one mark
//! let mut meta = MetaFile::new();
//! for i in (0..3).rev() {
//!     meta.values_mut().push(GeoData::trace(i, None));
//! }
//! meta.set_marks([1].into_iter().collect());
//! file.set_meta_file(Some(meta));
//!
//! assert_eq!(file.traces().get(0).unwrap().index, 2);
//!
//! let mut markers = Vec::new();
//! file.copy_marked_traces_to_aux_elements(&IndexLabels, &mut markers);
//! assert_eq!(markers[0].key.index, 1);
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Result, TraceFileError};

pub mod geo_utils;
pub use geo_utils::{to_decimal_degrees, to_raw_encoding};

pub mod trace;
pub use trace::Trace;

pub mod geo_data;
pub use geo_data::{GeoData, GeoPosition, SyntheticGeoData, TraceGeoData};

pub mod meta;
pub use meta::{MetaFile, SampleRange};

pub mod view;
pub use view::LogicalTraceView;

pub mod profile;
pub use profile::{HorizontalProfile, ScanProfile};

pub mod marks;
pub use marks::{FileId, FoundPlace, IndexLabels, MarkerContext, TraceKey};

// Derivation pipeline
pub mod edges;
pub mod distance;
pub mod spreading;

pub mod trace_file;
pub use trace_file::{PipelineConfig, TraceFile, TraceFileFormat};

pub mod formats;
pub use formats::JsonTraceFile;

// ============================================================================
// Core Types
// ============================================================================

/// A WGS84 position with latitude and longitude in degrees.
///
/// # Example
/// ```
/// use gpr_tracefile::LatLon;
/// let point = LatLon::new(56.9496, 24.1052); // Riga
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLon {
    /// Create a new position.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the position has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Position from raw `degrees * 100 + minutes` values, as stored by some
    /// trace formats.
    pub fn from_raw_encoding(raw_latitude: f64, raw_longitude: f64) -> Self {
        Self::new(to_decimal_degrees(raw_latitude), to_decimal_degrees(raw_longitude))
    }

    /// Inverse of [`LatLon::from_raw_encoding`].
    pub fn to_raw_encoding(&self) -> (f64, f64) {
        (to_raw_encoding(self.latitude), to_raw_encoding(self.longitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lon_validation() {
        assert!(LatLon::new(56.9496, 24.1052).is_valid());
        assert!(!LatLon::new(91.0, 0.0).is_valid());
        assert!(!LatLon::new(0.0, 181.0).is_valid());
        assert!(!LatLon::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_raw_encoding() {
        let position = LatLon::from_raw_encoding(5657.0, 2406.0);
        assert!((position.latitude - 56.95).abs() < 1e-9);
        assert!((position.longitude - 24.1).abs() < 1e-9);

        let (lat, lon) = position.to_raw_encoding();
        assert!((lat - 5657.0).abs() < 1e-9);
        assert!((lon - 2406.0).abs() < 1e-9);
    }
}
