//! # Trace File Container
//!
//! [`TraceFile`] owns the raw, physically-ordered traces of one file and its
//! optional [`MetaFile`]. It exposes the logical view ([`LogicalTraceView`]),
//! keeps the two consistent across edits and runs the derivation pipeline:
//!
//! 1. [`TraceFile::set_traces`] replaces the raw sequence and recomputes edges
//! 2. [`TraceFile::update_trace_distances`] computes along-path distance, checks
//!    whether coordinates need spreading, then smooths the distances
//! 3. [`TraceFile::load_meta`] / [`TraceFile::save_meta`] persist metadata
//!    independently of the sample data
//!
//! Concrete file formats wrap a `TraceFile` and implement [`TraceFileFormat`].
//!
//! ## Example
//!
//! ```rust
//! use gpr_tracefile::{LatLon, Trace, TraceFile};
//!
//! let traces: Vec<Trace> = (0..4)
//!     .map(|i| Trace::new(i, vec![0.0; 16]).with_lat_lon(LatLon::new(56.0, 24.0)))
//!     .collect();
//!
//! let mut file = TraceFile::with_traces(traces);
//! file.update_trace_distances().unwrap();
//!
//! // all traces share one fix
//! assert!(file.is_spread_coordinates_necessary());
//! assert_eq!(file.num_traces(), 4);
//! assert_eq!(file.max_samples().unwrap(), 16);
//! ```

use std::collections::BTreeSet;
use std::ops::Range;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::distance::{cumulative_distances, smooth_distances};
use crate::edges::find_edges;
use crate::error::{Result, TraceFileError};
use crate::geo_data::GeoData;
use crate::marks::{FileId, FoundPlace, MarkerContext, TraceKey};
use crate::meta::{MetaFile, SampleRange};
use crate::profile::{HorizontalProfile, ScanProfile};
use crate::spreading::{is_spreading_necessary, spread_positions};
use crate::trace::Trace;
use crate::view::LogicalTraceView;
use crate::LatLon;

/// Propagation speed of radar waves in vacuum/air, cm per ns
pub const SPEED_CM_NS_VACUUM: f64 = 30.0;

/// Propagation speed assumed for ground, cm per ns
pub const SPEED_CM_NS_SOIL: f64 = SPEED_CM_NS_VACUUM / 3.0;

/// Depth covered by one sample in cm, for a two-way travel time.
///
/// `sample_interval_ps` is the sample interval in picoseconds.
pub fn depth_per_sample_cm(sample_interval_ps: u32, speed_cm_ns: f64) -> f64 {
    sample_interval_ps as f64 / 1000.0 * speed_cm_ns / 2.0
}

/// Configuration for the derivation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Minimum absolute amplitude of an extremum to count as an edge.
    /// Default: 0.0 (every extremum)
    pub edge_threshold: f32,

    /// Half window, in steps, of the distance moving average.
    /// Default: 5
    pub smoothing_radius: usize,

    /// Fraction of degenerate position steps at which spreading is required.
    /// Default: 0.5
    pub spreading_ratio: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            edge_threshold: 0.0,
            smoothing_radius: 5,
            spreading_ratio: 0.5,
        }
    }
}

/// Raw traces, metadata and derived artifacts of one open file.
#[derive(Debug, Clone)]
pub struct TraceFile {
    id: FileId,
    file: Option<PathBuf>,
    traces: Vec<Trace>,
    meta_file: Option<MetaFile>,
    ground_profile_source: Option<PathBuf>,
    // horizontal cohesive lines of edges
    profiles: Option<Vec<HorizontalProfile>>,
    ground_profile: Option<HorizontalProfile>,
    // hyperbola probability
    algo_scan: Option<ScanProfile>,
    // amplitude
    ampl_scan: Option<ScanProfile>,
    distances: Vec<f64>,
    spread_coordinates_necessary: bool,
    config: PipelineConfig,
}

impl Default for TraceFile {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceFile {
    /// Empty container with no source path.
    pub fn new() -> Self {
        Self {
            id: FileId::next(),
            file: None,
            traces: Vec::new(),
            meta_file: None,
            ground_profile_source: None,
            profiles: None,
            ground_profile: None,
            algo_scan: None,
            ampl_scan: None,
            distances: Vec::new(),
            spread_coordinates_necessary: false,
            config: PipelineConfig::default(),
        }
    }

    /// Container over already loaded traces.
    pub fn with_traces(traces: Vec<Trace>) -> Self {
        let mut file = Self::new();
        file.set_traces(traces);
        file
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    /// Deep copy registered under a new [`FileId`].
    pub fn copy(&self) -> Self {
        Self {
            id: FileId::next(),
            ..self.clone()
        }
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn set_file(&mut self, file: impl Into<PathBuf>) {
        self.file = Some(file.into());
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PipelineConfig) {
        self.config = config;
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    pub fn meta_file(&self) -> Option<&MetaFile> {
        self.meta_file.as_ref()
    }

    pub fn meta_file_mut(&mut self) -> Option<&mut MetaFile> {
        self.meta_file.as_mut()
    }

    /// Attach or detach metadata without touching the sidecar.
    pub fn set_meta_file(&mut self, meta_file: Option<MetaFile>) {
        self.meta_file = meta_file;
    }

    /// Load the sidecar metadata, or initialize it from the raw traces when no
    /// sidecar exists, then push metadata state onto the traces.
    pub fn load_meta(&mut self) -> Result<()> {
        let source = self.file.as_deref().ok_or(TraceFileError::MissingSourcePath)?;
        let meta_path = MetaFile::meta_path(source);

        let meta = if meta_path.exists() {
            let meta = MetaFile::load(&meta_path)?;
            info!(
                "[TraceFile] Loaded metadata {} ({} entries)",
                meta_path.display(),
                meta.values().len()
            );
            meta
        } else {
            let mut meta = MetaFile::new();
            meta.init(&self.traces);
            info!(
                "[TraceFile] Initialized metadata for {} traces of {}",
                self.traces.len(),
                source.display()
            );
            meta
        };

        meta.init_traces(&mut self.traces);
        self.meta_file = Some(meta);
        Ok(())
    }

    /// Refresh sample range and marks from the current state and write the sidecar.
    ///
    /// Both are taken from the trace-backed entries of the logical view.
    pub fn save_meta(&mut self) -> Result<()> {
        if self.meta_file.is_none() {
            return Err(TraceFileError::MissingMetadata);
        }
        let source = self.file.clone().ok_or(TraceFileError::MissingSourcePath)?;

        let logical = self
            .traces()
            .iter_trace_backed()
            .collect::<Result<Vec<&Trace>>>()?;
        let sample_range = SampleRange::of_traces(logical.iter().copied());
        let marks: BTreeSet<usize> = logical
            .iter()
            .filter(|trace| trace.marked)
            .map(|trace| trace.index)
            .collect();

        let meta_path = MetaFile::meta_path(&source);
        let Some(meta) = self.meta_file.as_mut() else {
            return Err(TraceFileError::MissingMetadata);
        };
        meta.set_sample_range(sample_range);
        meta.set_marks(marks);
        meta.save(&meta_path)?;

        info!(
            "[TraceFile] Saved metadata {} (samples {}..{}, {} marks)",
            meta_path.display(),
            sample_range.min,
            sample_range.max,
            meta.marks().len()
        );
        Ok(())
    }

    /// Re-apply metadata state onto raw traces; no-op without metadata.
    pub fn update_traces_from_meta(&mut self) {
        if let Some(meta) = &self.meta_file {
            meta.init_traces(&mut self.traces);
        }
    }

    /// Geo-data entries in logical order, empty without metadata.
    pub fn geo_data(&self) -> &[GeoData] {
        self.meta_file
            .as_ref()
            .map(|meta| meta.values())
            .unwrap_or(&[])
    }

    // ========================================================================
    // Traces
    // ========================================================================

    /// Logical view over the traces.
    pub fn traces(&self) -> LogicalTraceView<'_> {
        LogicalTraceView::new(self)
    }

    /// Raw traces in physical order.
    pub fn raw_traces(&self) -> &[Trace] {
        &self.traces
    }

    /// Mutable raw traces. Call [`TraceFile::update_traces`] after reordering.
    pub fn raw_traces_mut(&mut self) -> &mut Vec<Trace> {
        &mut self.traces
    }

    /// Replace the raw sequence, reassign physical indices and recompute edges.
    pub fn set_traces(&mut self, traces: Vec<Trace>) {
        self.traces = traces;
        self.update_traces();
        self.find_edges(None);
        debug!("[TraceFile] Replaced raw sequence with {} traces", self.traces.len());
    }

    /// Reassign each trace's physical index to its position.
    pub fn update_traces(&mut self) {
        for (i, trace) in self.traces.iter_mut().enumerate() {
            trace.index = i;
        }
    }

    /// Recompute edges for all raw traces, or for the `hint` range only.
    pub fn find_edges(&mut self, hint: Option<Range<usize>>) {
        find_edges(&mut self.traces, hint, self.config.edge_threshold);
    }

    /// Number of traces in the logical view.
    pub fn num_traces(&self) -> usize {
        self.traces().len()
    }

    /// Sample count of the first logical trace.
    pub fn max_samples(&self) -> Result<usize> {
        Ok(self.traces().first()?.num_samples())
    }

    // ========================================================================
    // Positions and distances
    // ========================================================================

    /// Position per logical entry.
    pub fn logical_positions(&self) -> Vec<Option<LatLon>> {
        match &self.meta_file {
            Some(meta) => meta.values().iter().map(GeoData::lat_lon).collect(),
            None => self.traces.iter().map(|trace| trace.lat_lon).collect(),
        }
    }

    /// Cumulative along-path distance per logical entry, in meters.
    ///
    /// Empty until [`TraceFile::update_trace_distances`] has run.
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Distance calculation, spreading check, then smoothing.
    ///
    /// Each stage keeps its result even if a later one fails.
    pub fn update_trace_distances(&mut self) -> Result<()> {
        let positions = self.logical_positions();

        self.distances = cumulative_distances(&positions);
        debug!(
            "[TraceFile] Calculated distances for {} entries ({:.1}m)",
            self.distances.len(),
            self.distances.last().copied().unwrap_or(0.0)
        );

        self.spread_coordinates_necessary =
            is_spreading_necessary(&positions, self.config.spreading_ratio);
        if self.spread_coordinates_necessary {
            debug!("[TraceFile] Coordinate spreading is necessary");
        }

        let expected = self.num_traces();
        let radius = self.config.smoothing_radius;
        if let Err(e) = smooth_distances(&mut self.distances, expected, radius) {
            warn!("[TraceFile] Distance smoothing failed, keeping raw distances: {}", e);
            return Err(e);
        }
        Ok(())
    }

    /// Spread degenerate positions and recompute distances.
    pub fn spread_coordinates(&mut self) -> Result<()> {
        let mut positions = self.logical_positions();
        let moved = spread_positions(&mut positions);

        match &mut self.meta_file {
            Some(meta) => {
                for (value, position) in meta.values_mut().iter_mut().zip(&positions) {
                    value.position_mut().lat_lon = *position;
                }
            }
            None => {
                for (trace, position) in self.traces.iter_mut().zip(&positions) {
                    trace.lat_lon = *position;
                }
            }
        }
        info!("[TraceFile] Spread {} coordinates", moved);

        self.update_trace_distances()
    }

    pub fn is_spread_coordinates_necessary(&self) -> bool {
        self.spread_coordinates_necessary
    }

    pub fn set_spread_coordinates_necessary(&mut self, necessary: bool) {
        self.spread_coordinates_necessary = necessary;
    }

    // ========================================================================
    // Marks
    // ========================================================================

    /// Emit one marker per marked trace into `aux`; returns how many were added.
    ///
    /// With metadata, the stored mark set is authoritative and trace flags are
    /// ignored. Without metadata, trace flags are used directly.
    pub fn copy_marked_traces_to_aux_elements(
        &self,
        ctx: &dyn MarkerContext,
        aux: &mut Vec<FoundPlace>,
    ) -> usize {
        let before = aux.len();
        match &self.meta_file {
            Some(meta) => {
                for &index in meta.marks() {
                    aux.push(ctx.found_place(TraceKey::new(self.id, index)));
                }
            }
            None => {
                // formats without a sidecar (e.g. DZT) carry marks on the traces
                for trace in self.traces.iter().filter(|trace| trace.marked) {
                    aux.push(ctx.found_place(TraceKey::new(self.id, trace.index)));
                }
            }
        }
        aux.len() - before
    }

    // ========================================================================
    // Derived profiles
    // ========================================================================

    pub fn profiles(&self) -> Option<&[HorizontalProfile]> {
        self.profiles.as_deref()
    }

    pub fn set_profiles(&mut self, profiles: Option<Vec<HorizontalProfile>>) {
        self.profiles = profiles;
    }

    pub fn ground_profile(&self) -> Option<&HorizontalProfile> {
        self.ground_profile.as_ref()
    }

    pub fn set_ground_profile(&mut self, ground_profile: Option<HorizontalProfile>) {
        self.ground_profile = ground_profile;
    }

    /// External position file the ground profile was derived from.
    pub fn ground_profile_source(&self) -> Option<&Path> {
        self.ground_profile_source.as_deref()
    }

    pub fn set_ground_profile_source(&mut self, source: Option<PathBuf>) {
        self.ground_profile_source = source;
    }

    pub fn algo_scan(&self) -> Option<&ScanProfile> {
        self.algo_scan.as_ref()
    }

    pub fn set_algo_scan(&mut self, algo_scan: Option<ScanProfile>) {
        self.algo_scan = algo_scan;
    }

    pub fn ampl_scan(&self) -> Option<&ScanProfile> {
        self.ampl_scan.as_ref()
    }

    pub fn set_ampl_scan(&mut self, ampl_scan: Option<ScanProfile>) {
        self.ampl_scan = ampl_scan;
    }
}

/// Per-format extension points of a trace file.
pub trait TraceFileFormat {
    fn trace_file(&self) -> &TraceFile;

    fn trace_file_mut(&mut self) -> &mut TraceFile;

    /// Sample interval in picoseconds.
    fn sample_interval(&self) -> u32;

    /// Depth per sample in cm for ground propagation.
    fn samples_to_cm_grn(&self) -> f64;

    /// Depth per sample in cm for air propagation.
    fn samples_to_cm_air(&self) -> f64;

    /// Write the raw traces in `range` to `path`.
    fn save(&self, path: &Path, range: Range<usize>) -> Result<()>;

    fn copy(&self) -> Box<dyn TraceFileFormat>;

    /// Bring sample values into the format-independent working representation.
    fn normalize(&mut self);

    /// Undo [`TraceFileFormat::normalize`].
    fn denormalize(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::EDGE_POSITIVE_MAX;
    use crate::marks::IndexLabels;

    fn raw(sample_counts: &[usize]) -> Vec<Trace> {
        sample_counts
            .iter()
            .enumerate()
            .map(|(i, &n)| Trace::new(i, vec![0.0; n]))
            .collect()
    }

    fn walking_line(n: usize) -> Vec<Trace> {
        (0..n)
            .map(|i| {
                Trace::new(i, vec![0.0; 8])
                    .with_lat_lon(LatLon::new(56.0 + i as f64 * 0.00001, 24.0))
            })
            .collect()
    }

    #[test]
    fn test_update_traces_reassigns_indices() {
        let mut file = TraceFile::with_traces(raw(&[4, 4, 4]));
        file.raw_traces_mut().swap(0, 2);
        file.raw_traces_mut().push(Trace::new(99, vec![]));
        file.update_traces();
        for (i, trace) in file.raw_traces().iter().enumerate() {
            assert_eq!(trace.index, i);
        }
    }

    #[test]
    fn test_set_traces_reindexes_and_finds_edges() {
        let mut file = TraceFile::new();
        file.set_traces(vec![
            Trace::new(7, vec![0.0, 2.0, 0.0]),
            Trace::new(3, vec![0.0, 5.0, 1.0]),
        ]);
        assert_eq!(file.raw_traces()[0].index, 0);
        assert_eq!(file.raw_traces()[1].index, 1);
        assert_eq!(file.raw_traces()[1].edges[1], EDGE_POSITIVE_MAX);
    }

    #[test]
    fn test_num_traces_follows_meta() {
        let mut file = TraceFile::with_traces(raw(&[4, 4, 4]));
        assert_eq!(file.num_traces(), 3);

        let mut meta = MetaFile::new();
        meta.values_mut().push(GeoData::trace(1, None));
        file.set_meta_file(Some(meta));
        assert_eq!(file.num_traces(), 1);
    }

    #[test]
    fn test_max_samples_uses_first_logical_trace() {
        let mut file = TraceFile::with_traces(raw(&[10, 12, 8]));
        assert_eq!(file.max_samples().unwrap(), 10);

        let mut meta = MetaFile::new();
        meta.values_mut().push(GeoData::trace(2, None));
        file.set_meta_file(Some(meta));
        assert_eq!(file.max_samples().unwrap(), 8);
    }

    #[test]
    fn test_max_samples_empty_view() {
        let file = TraceFile::new();
        assert!(matches!(file.max_samples(), Err(TraceFileError::EmptyView)));
    }

    #[test]
    fn test_geo_data_empty_without_meta() {
        let file = TraceFile::with_traces(raw(&[4, 4]));
        assert!(file.geo_data().is_empty());
    }

    #[test]
    fn test_geo_data_is_meta_values() {
        let mut file = TraceFile::with_traces(raw(&[4, 4]));
        let mut meta = MetaFile::new();
        meta.init(file.raw_traces());
        meta.values_mut().push(GeoData::synthetic(Some(LatLon::new(1.0, 1.0))));
        file.set_meta_file(Some(meta));

        assert_eq!(file.geo_data().len(), 3);
        assert_eq!(file.geo_data()[2].trace_index(), None);
    }

    #[test]
    fn test_load_meta_initializes_without_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let mut traces = raw(&[4, 4, 4]);
        traces[1].marked = true;
        let mut file = TraceFile::with_traces(traces);
        file.set_file(dir.path().join("line.json"));

        file.load_meta().unwrap();

        let meta = file.meta_file().unwrap();
        assert_eq!(meta.values().len(), 3);
        assert!(meta.marks().contains(&1));
        assert!(file.raw_traces()[1].marked);
        for i in 0..3 {
            assert_eq!(file.traces().get(i).unwrap().index, i);
        }
    }

    #[test]
    fn test_load_meta_prefers_existing_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("line.json");

        let mut stored = MetaFile::new();
        stored.values_mut().push(GeoData::trace(2, None));
        stored.values_mut().push(GeoData::trace(0, None));
        stored.set_marks([0].into_iter().collect());
        stored.save(&MetaFile::meta_path(&source)).unwrap();

        let mut file = TraceFile::with_traces(raw(&[4, 4, 4]));
        file.set_file(&source);
        file.load_meta().unwrap();

        assert_eq!(file.num_traces(), 2);
        assert_eq!(file.traces().get(0).unwrap().index, 2);
        assert!(file.raw_traces()[0].marked);
        assert!(!file.raw_traces()[2].marked);
    }

    #[test]
    fn test_load_meta_requires_source_path() {
        let mut file = TraceFile::with_traces(raw(&[4]));
        assert!(matches!(
            file.load_meta(),
            Err(TraceFileError::MissingSourcePath)
        ));
    }

    #[test]
    fn test_save_meta_updates_sample_range_and_marks() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("line.json");

        let mut file = TraceFile::with_traces(raw(&[10, 12, 8]));
        file.set_file(&source);
        file.load_meta().unwrap();
        file.raw_traces_mut()[2].marked = true;

        file.save_meta().unwrap();

        let meta = file.meta_file().unwrap();
        assert_eq!(meta.sample_range().unwrap().max, 12);
        assert_eq!(meta.marks().iter().copied().collect::<Vec<_>>(), vec![2]);

        let reloaded = MetaFile::load(&MetaFile::meta_path(&source)).unwrap();
        assert_eq!(&reloaded, meta);
    }

    #[test]
    fn test_save_meta_skips_synthetic_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = TraceFile::with_traces(raw(&[6, 9]));
        file.set_file(dir.path().join("line.json"));

        let mut meta = MetaFile::new();
        meta.values_mut().push(GeoData::trace(0, None));
        meta.values_mut().push(GeoData::synthetic(Some(LatLon::new(56.0, 24.0))));
        file.set_meta_file(Some(meta));

        file.save_meta().unwrap();
        assert_eq!(file.meta_file().unwrap().sample_range(), Some(SampleRange::new(0, 6)));
    }

    #[test]
    fn test_save_meta_preconditions() {
        let mut file = TraceFile::with_traces(raw(&[4]));
        assert!(matches!(file.save_meta(), Err(TraceFileError::MissingMetadata)));

        let mut meta = MetaFile::new();
        meta.init(file.raw_traces());
        file.set_meta_file(Some(meta));
        assert!(matches!(
            file.save_meta(),
            Err(TraceFileError::MissingSourcePath)
        ));
    }

    #[test]
    fn test_update_traces_from_meta() {
        let mut file = TraceFile::with_traces(raw(&[4, 4]));
        file.update_traces_from_meta();
        assert!(!file.raw_traces()[0].marked);

        let mut meta = MetaFile::new();
        meta.init(file.raw_traces());
        meta.set_marks([0].into_iter().collect());
        file.set_meta_file(Some(meta));
        file.update_traces_from_meta();
        assert!(file.raw_traces()[0].marked);
    }

    #[test]
    fn test_markers_from_meta_marks() {
        let mut file = TraceFile::with_traces(raw(&[4; 6]));
        let mut meta = MetaFile::new();
        meta.init(file.raw_traces());
        meta.set_marks([2, 5].into_iter().collect());
        file.set_meta_file(Some(meta));

        let mut aux = Vec::new();
        let added = file.copy_marked_traces_to_aux_elements(&IndexLabels, &mut aux);

        assert_eq!(added, 2);
        let indices: Vec<usize> = aux.iter().map(|p| p.key.index).collect();
        assert_eq!(indices, vec![2, 5]);
        assert!(aux.iter().all(|p| p.key.file == file.id()));
    }

    #[test]
    fn test_markers_from_trace_flags_without_meta() {
        let mut traces = raw(&[4; 5]);
        traces[1].marked = true;
        traces[3].marked = true;
        let file = TraceFile::with_traces(traces);

        let mut aux = Vec::new();
        let added = file.copy_marked_traces_to_aux_elements(&IndexLabels, &mut aux);

        assert_eq!(added, 2);
        let indices: Vec<usize> = aux.iter().map(|p| p.key.index).collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn test_trace_flags_ignored_when_meta_present() {
        let mut traces = raw(&[4; 4]);
        traces[0].marked = true;
        let mut file = TraceFile::with_traces(traces);
        let mut meta = MetaFile::new();
        meta.init(file.raw_traces());
        meta.set_marks(BTreeSet::new());
        file.set_meta_file(Some(meta));

        let mut aux = Vec::new();
        assert_eq!(file.copy_marked_traces_to_aux_elements(&IndexLabels, &mut aux), 0);
        assert!(aux.is_empty());
    }

    #[test]
    fn test_identical_coordinates_need_spreading() {
        let traces: Vec<Trace> = (0..10)
            .map(|i| Trace::new(i, vec![0.0; 4]).with_lat_lon(LatLon::new(56.0, 24.0)))
            .collect();
        let mut file = TraceFile::with_traces(traces);

        file.update_trace_distances().unwrap();

        assert!(file.is_spread_coordinates_necessary());
        assert_eq!(file.distances(), &[0.0; 10]);
    }

    #[test]
    fn test_distances_along_moving_line() {
        let mut file = TraceFile::with_traces(walking_line(20));
        file.update_trace_distances().unwrap();

        assert!(!file.is_spread_coordinates_necessary());
        assert_eq!(file.distances().len(), 20);
        assert!(file.distances()[19] > 20.0);
        for w in file.distances().windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn test_distances_follow_meta_positions() {
        let mut file = TraceFile::with_traces(walking_line(3));
        let mut meta = MetaFile::new();
        meta.values_mut().push(GeoData::trace(0, Some(LatLon::new(56.0, 24.0))));
        meta.values_mut().push(GeoData::synthetic(Some(LatLon::new(56.001, 24.0))));
        file.set_meta_file(Some(meta));

        file.update_trace_distances().unwrap();
        assert_eq!(file.distances().len(), 2);
        assert!(file.distances()[1] > 100.0);
    }

    #[test]
    fn test_spread_coordinates_without_meta() {
        let traces: Vec<Trace> = (0..9)
            .map(|i| {
                let lat = 56.0 + (i / 4) as f64 * 0.0001;
                Trace::new(i, vec![0.0; 4]).with_lat_lon(LatLon::new(lat, 24.0))
            })
            .collect();
        let mut file = TraceFile::with_traces(traces);
        file.update_trace_distances().unwrap();
        assert!(file.is_spread_coordinates_necessary());

        file.spread_coordinates().unwrap();

        assert!(!file.is_spread_coordinates_necessary());
        for w in file.distances().windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn test_spread_coordinates_extrapolates_trailing_run() {
        // low-rate fix: two distinct positions, the second repeated to the end
        let traces: Vec<Trace> = (0..40)
            .map(|i| {
                let lat = if i < 10 { 56.0 } else { 56.001 };
                Trace::new(i, vec![0.0; 4]).with_lat_lon(LatLon::new(lat, 24.0))
            })
            .collect();
        let mut file = TraceFile::with_traces(traces);
        file.update_trace_distances().unwrap();
        assert!(file.is_spread_coordinates_necessary());

        file.spread_coordinates().unwrap();

        assert!(!file.is_spread_coordinates_necessary());
        assert_eq!(file.distances().len(), 40);
        for w in file.distances().windows(2) {
            assert!(w[1] > w[0]);
        }
        let last = file.raw_traces()[39].lat_lon.unwrap().latitude;
        assert!((last - 56.0039).abs() < 1e-9);
    }

    #[test]
    fn test_smoothing_failure_keeps_earlier_stages() {
        let mut traces = walking_line(6);
        traces[5].lat_lon = Some(LatLon::new(f64::NAN, 24.0));
        let mut file = TraceFile::with_traces(traces);
        file.set_spread_coordinates_necessary(true);

        let err = file.update_trace_distances().unwrap_err();

        assert!(matches!(err, TraceFileError::NonFiniteDistance { index: 5 }));
        // stage 1 distances stay raw, stage 2 flag was recomputed
        let positions = file.logical_positions();
        let raw = cumulative_distances(&positions);
        assert_eq!(file.distances().len(), 6);
        assert_eq!(&file.distances()[..5], &raw[..5]);
        assert!(file.distances()[..5].iter().all(|d| d.is_finite()));
        assert!(!file.is_spread_coordinates_necessary());
    }

    #[test]
    fn test_spread_coordinates_with_meta() {
        let mut file = TraceFile::with_traces(raw(&[4; 5]));
        let mut meta = MetaFile::new();
        meta.values_mut().push(GeoData::trace(0, Some(LatLon::new(56.0, 24.0))));
        meta.values_mut().push(GeoData::trace(1, Some(LatLon::new(56.0, 24.0))));
        meta.values_mut().push(GeoData::trace(2, Some(LatLon::new(56.0002, 24.0))));
        file.set_meta_file(Some(meta));

        file.spread_coordinates().unwrap();

        let lat = file.geo_data()[1].lat_lon().unwrap().latitude;
        assert!((lat - 56.0001).abs() < 1e-9);
    }

    #[test]
    fn test_derived_artifacts_start_unset() {
        let mut file = TraceFile::new();
        assert!(file.profiles().is_none());
        assert!(file.ground_profile().is_none());
        assert!(file.ground_profile_source().is_none());
        assert!(file.algo_scan().is_none());
        assert!(file.ampl_scan().is_none());

        file.set_ground_profile(Some(HorizontalProfile::new(vec![3, 4])));
        file.set_algo_scan(Some(ScanProfile::new(2)));
        file.set_profiles(Some(vec![HorizontalProfile::new(vec![1])]));
        file.set_ground_profile_source(Some(PathBuf::from("positions.csv")));
        assert_eq!(file.ground_profile().unwrap().max_depth, 4);
        assert_eq!(file.algo_scan().unwrap().len(), 2);
        assert_eq!(file.profiles().unwrap().len(), 1);
        assert_eq!(file.ground_profile_source(), Some(Path::new("positions.csv")));
    }

    #[test]
    fn test_copy_gets_new_id() {
        let file = TraceFile::with_traces(raw(&[4, 4]));
        let copy = file.copy();
        assert_ne!(copy.id(), file.id());
        assert_eq!(copy.raw_traces(), file.raw_traces());
    }

    #[test]
    fn test_depth_per_sample() {
        // 100 ps in air: 0.1ns * 30cm/ns / 2
        assert!((depth_per_sample_cm(100, SPEED_CM_NS_VACUUM) - 1.5).abs() < 1e-12);
        assert!((depth_per_sample_cm(100, SPEED_CM_NS_SOIL) - 0.5).abs() < 1e-12);
    }
}
