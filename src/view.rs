//! Logical, index-addressable view over a trace file's raw traces.

use crate::error::{Result, TraceFileError};
use crate::geo_data::GeoData;
use crate::trace::Trace;
use crate::trace_file::TraceFile;

/// Projection from logical position to physical [`Trace`].
///
/// Without metadata the view is the identity over raw traces. With metadata,
/// position `i` resolves through the `i`-th geo-data entry. Nothing is cached:
/// every call reads the file's current state.
#[derive(Debug, Clone, Copy)]
pub struct LogicalTraceView<'a> {
    file: &'a TraceFile,
}

impl<'a> LogicalTraceView<'a> {
    pub(crate) fn new(file: &'a TraceFile) -> Self {
        Self { file }
    }

    pub fn len(&self) -> usize {
        match self.file.meta_file() {
            Some(meta) => meta.values().len(),
            None => self.file.raw_traces().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Trace at logical position `index`.
    ///
    /// Fails with [`TraceFileError::InvariantViolation`] when the entry has no
    /// physical trace behind it, or references a trace that no longer exists.
    pub fn get(&self, index: usize) -> Result<&'a Trace> {
        let raw = self.file.raw_traces();
        let Some(meta) = self.file.meta_file() else {
            return raw.get(index).ok_or(TraceFileError::IndexOutOfBounds {
                index,
                len: raw.len(),
            });
        };

        let values = meta.values();
        match values.get(index) {
            Some(GeoData::Trace(value)) => raw.get(value.trace_index).ok_or_else(|| {
                TraceFileError::InvariantViolation(format!(
                    "entry {} references trace {} but only {} traces exist",
                    index,
                    value.trace_index,
                    raw.len()
                ))
            }),
            Some(GeoData::Synthetic(_)) => Err(TraceFileError::InvariantViolation(format!(
                "entry {} has no physical trace",
                index
            ))),
            None => Err(TraceFileError::IndexOutOfBounds {
                index,
                len: values.len(),
            }),
        }
    }

    pub fn first(&self) -> Result<&'a Trace> {
        if self.is_empty() {
            return Err(TraceFileError::EmptyView);
        }
        self.get(0)
    }

    /// Whether logical position `index` has a physical trace behind it.
    pub fn is_trace_backed(&self, index: usize) -> bool {
        match self.file.meta_file() {
            Some(meta) => matches!(meta.values().get(index), Some(GeoData::Trace(_))),
            None => index < self.file.raw_traces().len(),
        }
    }

    /// Resolve the trace-backed positions in order, skipping synthetic entries.
    pub fn iter_trace_backed(&self) -> impl Iterator<Item = Result<&'a Trace>> + 'a {
        let view = *self;
        (0..view.len())
            .filter(move |&i| view.is_trace_backed(i))
            .map(move |i| view.get(i))
    }

    /// Resolve every logical position in order.
    pub fn iter(&self) -> impl Iterator<Item = Result<&'a Trace>> + 'a {
        let view = *self;
        (0..view.len()).map(move |i| view.get(i))
    }
}
