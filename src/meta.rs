//! # Sidecar Metadata
//!
//! [`MetaFile`] holds the geo-referenced view of a trace file: the logical
//! sequence of [`GeoData`] entries, the sample range summary and the set of
//! marked physical trace indices. It is stored as JSON next to the main file,
//! see [`MetaFile::meta_path`].

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geo_data::GeoData;
use crate::trace::Trace;

/// Suffix appended to the main file name to form the sidecar name
pub const META_SUFFIX: &str = ".meta.json";

/// Range of sample indices in use across a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SampleRange {
    pub min: usize,
    pub max: usize,
}

impl SampleRange {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// `[0, max sample count]` over the given traces.
    pub fn of_traces<'a>(traces: impl IntoIterator<Item = &'a Trace>) -> Self {
        let max = traces
            .into_iter()
            .map(Trace::num_samples)
            .max()
            .unwrap_or(0);
        Self { min: 0, max }
    }
}

/// Geo-referenced metadata for one trace file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetaFile {
    values: Vec<GeoData>,
    #[serde(default)]
    sample_range: Option<SampleRange>,
    /// Physical indices of marked traces
    #[serde(default)]
    marks: BTreeSet<usize>,
}

impl MetaFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sidecar path for a main file: same directory, `<file name>.meta.json`.
    ///
    /// Pure function, performs no I/O.
    ///
    /// ```rust
    /// use std::path::Path;
    /// use gpr_tracefile::MetaFile;
    ///
    /// let path = MetaFile::meta_path(Path::new("/data/line-01.sgy"));
    /// assert_eq!(path, Path::new("/data/line-01.sgy.meta.json"));
    /// ```
    pub fn meta_path(source: &Path) -> PathBuf {
        let mut name = source
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(META_SUFFIX);
        source.with_file_name(name)
    }

    /// Read metadata from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let meta: MetaFile = serde_json::from_str(&content)?;
        debug!(
            "[MetaFile] Loaded {} entries, {} marks from {}",
            meta.values.len(),
            meta.marks.len(),
            path.display()
        );
        Ok(meta)
    }

    /// Write metadata to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        debug!("[MetaFile] Saved {} entries to {}", self.values.len(), path.display());
        Ok(())
    }

    /// Reset to one trace-backed entry per raw trace, in physical order.
    pub fn init(&mut self, traces: &[Trace]) {
        self.values = traces
            .iter()
            .map(|trace| GeoData::trace(trace.index, trace.lat_lon))
            .collect();
        self.marks = traces
            .iter()
            .filter(|trace| trace.marked)
            .map(|trace| trace.index)
            .collect();
        self.sample_range = None;
    }

    /// Push metadata state onto raw traces.
    ///
    /// Mark flags follow the stored mark set. Traces without a recorded position
    /// take the position of the entry that references them.
    pub fn init_traces(&self, traces: &mut [Trace]) {
        for trace in traces.iter_mut() {
            trace.marked = self.marks.contains(&trace.index);
        }
        for value in &self.values {
            let GeoData::Trace(entry) = value else {
                continue;
            };
            if let Some(trace) = traces.get_mut(entry.trace_index) {
                if trace.lat_lon.is_none() {
                    trace.lat_lon = entry.position.lat_lon;
                }
            }
        }
    }

    pub fn values(&self) -> &[GeoData] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut Vec<GeoData> {
        &mut self.values
    }

    pub fn sample_range(&self) -> Option<SampleRange> {
        self.sample_range
    }

    pub fn set_sample_range(&mut self, sample_range: SampleRange) {
        self.sample_range = Some(sample_range);
    }

    pub fn marks(&self) -> &BTreeSet<usize> {
        &self.marks
    }

    pub fn set_marks(&mut self, marks: BTreeSet<usize>) {
        self.marks = marks;
    }
}
