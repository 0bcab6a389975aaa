//! Marker boundary: "found place" markers emitted for marked traces.
//!
//! The marker collection and the context that styles markers belong to the
//! application. The core only addresses a marker by [`TraceKey`] and asks an
//! injected [`MarkerContext`] to build it.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FILE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an open trace file, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u64);

impl FileId {
    pub(crate) fn next() -> Self {
        FileId(NEXT_FILE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Address of one trace: owning file plus physical index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceKey {
    pub file: FileId,
    pub index: usize,
}

impl TraceKey {
    pub fn new(file: FileId, index: usize) -> Self {
        Self { file, index }
    }
}

/// A point-of-interest marker placed on a trace.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundPlace {
    pub key: TraceKey,
    pub label: String,
}

/// Application context used to construct markers.
pub trait MarkerContext {
    fn found_place(&self, key: TraceKey) -> FoundPlace;
}

/// Context that labels markers by trace index.
#[derive(Debug, Clone, Default)]
pub struct IndexLabels;

impl MarkerContext for IndexLabels {
    fn found_place(&self, key: TraceKey) -> FoundPlace {
        FoundPlace {
            key,
            label: format!("#{}", key.index),
        }
    }
}
