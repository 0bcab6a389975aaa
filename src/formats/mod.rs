//! Concrete trace file formats.

pub mod json;

pub use json::JsonTraceFile;
