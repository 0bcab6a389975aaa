//! Plain JSON trace file.
//!
//! A minimal interchange format: the sample interval plus an array of traces,
//! each with its samples and optional mark/position. It carries no binary
//! headers, so it doubles as an export target for any other format.
//!
//! ```json
//! {
//!   "sample_interval_ps": 100,
//!   "traces": [
//!     { "samples": [0.0, 1.5, -0.5], "marked": false, "lat_lon": null }
//!   ]
//! }
//! ```

use std::fs;
use std::ops::Range;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::trace::Trace;
use crate::trace_file::{
    depth_per_sample_cm, TraceFile, TraceFileFormat, SPEED_CM_NS_SOIL, SPEED_CM_NS_VACUUM,
};

#[derive(Debug, Serialize, Deserialize)]
struct JsonDocument {
    sample_interval_ps: u32,
    traces: Vec<Trace>,
}

/// Trace file stored as a JSON document.
#[derive(Debug, Clone)]
pub struct JsonTraceFile {
    inner: TraceFile,
    sample_interval_ps: u32,
    /// Per-trace mean removed by `normalize`, empty when not normalized
    offsets: Vec<f32>,
}

impl JsonTraceFile {
    /// Wrap an existing container.
    pub fn new(inner: TraceFile, sample_interval_ps: u32) -> Self {
        Self {
            inner,
            sample_interval_ps,
            offsets: Vec::new(),
        }
    }

    /// Read traces from `path` and attach (or initialize) its sidecar metadata.
    pub fn open(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let document: JsonDocument = serde_json::from_str(&content)?;

        let mut inner = TraceFile::new();
        inner.set_file(path);
        inner.set_traces(document.traces);
        inner.load_meta()?;

        info!(
            "[JsonTraceFile] Opened {} ({} traces, {}ps)",
            path.display(),
            inner.raw_traces().len(),
            document.sample_interval_ps
        );

        Ok(Self::new(inner, document.sample_interval_ps))
    }

    pub fn is_normalized(&self) -> bool {
        !self.offsets.is_empty()
    }
}

impl TraceFileFormat for JsonTraceFile {
    fn trace_file(&self) -> &TraceFile {
        &self.inner
    }

    fn trace_file_mut(&mut self) -> &mut TraceFile {
        &mut self.inner
    }

    fn sample_interval(&self) -> u32 {
        self.sample_interval_ps
    }

    fn samples_to_cm_grn(&self) -> f64 {
        depth_per_sample_cm(self.sample_interval_ps, SPEED_CM_NS_SOIL)
    }

    fn samples_to_cm_air(&self) -> f64 {
        depth_per_sample_cm(self.sample_interval_ps, SPEED_CM_NS_VACUUM)
    }

    fn save(&self, path: &Path, range: Range<usize>) -> Result<()> {
        let raw = self.inner.raw_traces();
        let start = range.start.min(raw.len());
        let end = range.end.clamp(start, raw.len());

        let document = JsonDocument {
            sample_interval_ps: self.sample_interval_ps,
            traces: raw[start..end].to_vec(),
        };
        fs::write(path, serde_json::to_string(&document)?)?;

        info!(
            "[JsonTraceFile] Saved traces {}..{} to {}",
            start,
            end,
            path.display()
        );
        Ok(())
    }

    fn copy(&self) -> Box<dyn TraceFileFormat> {
        Box::new(Self {
            inner: self.inner.copy(),
            sample_interval_ps: self.sample_interval_ps,
            offsets: self.offsets.clone(),
        })
    }

    fn normalize(&mut self) {
        if self.is_normalized() {
            return;
        }
        let traces = self.inner.raw_traces_mut();
        self.offsets = traces.iter().map(Trace::mean_amplitude).collect();
        for (trace, offset) in traces.iter_mut().zip(&self.offsets) {
            for sample in trace.samples.iter_mut() {
                *sample -= offset;
            }
        }
    }

    fn denormalize(&mut self) {
        let offsets = std::mem::take(&mut self.offsets);
        for (trace, offset) in self.inner.raw_traces_mut().iter_mut().zip(&offsets) {
            for sample in trace.samples.iter_mut() {
                *sample += offset;
            }
        }
    }
}
