//! Geo-referenced entries of the logical trace sequence.
//!
//! Each entry either points at a physical trace ([`TraceGeoData`]) or carries a
//! position with no sample data behind it ([`SyntheticGeoData`]), e.g. an
//! interpolated fix or an external positioning sample.

use serde::{Deserialize, Serialize};
use crate::LatLon;

/// Position attached to a geo-data entry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPosition {
    #[serde(default)]
    pub lat_lon: Option<LatLon>,
    #[serde(default)]
    pub altitude: Option<f64>,
}

impl GeoPosition {
    pub fn new(lat_lon: Option<LatLon>) -> Self {
        Self { lat_lon, altitude: None }
    }
}

/// Entry backed by a physical trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceGeoData {
    /// Physical index of the trace at metadata creation time
    pub trace_index: usize,
    #[serde(flatten)]
    pub position: GeoPosition,
}

/// Entry with no physical trace behind it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SyntheticGeoData {
    #[serde(flatten)]
    pub position: GeoPosition,
}

/// One entry of the logical, geo-referenced sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeoData {
    Trace(TraceGeoData),
    Synthetic(SyntheticGeoData),
}

impl GeoData {
    /// Entry for a physical trace.
    pub fn trace(trace_index: usize, lat_lon: Option<LatLon>) -> Self {
        GeoData::Trace(TraceGeoData {
            trace_index,
            position: GeoPosition::new(lat_lon),
        })
    }

    /// Entry without sample data.
    pub fn synthetic(lat_lon: Option<LatLon>) -> Self {
        GeoData::Synthetic(SyntheticGeoData {
            position: GeoPosition::new(lat_lon),
        })
    }

    pub fn position(&self) -> &GeoPosition {
        match self {
            GeoData::Trace(value) => &value.position,
            GeoData::Synthetic(value) => &value.position,
        }
    }

    pub fn position_mut(&mut self) -> &mut GeoPosition {
        match self {
            GeoData::Trace(value) => &mut value.position,
            GeoData::Synthetic(value) => &mut value.position,
        }
    }

    pub fn lat_lon(&self) -> Option<LatLon> {
        self.position().lat_lon
    }

    /// Physical trace index, `None` for synthetic entries.
    pub fn trace_index(&self) -> Option<usize> {
        match self {
            GeoData::Trace(value) => Some(value.trace_index),
            GeoData::Synthetic(_) => None,
        }
    }
}
