//! Derived profiles attached to a trace file.
//!
//! These are computed by analysis passes outside the container and stored on it
//! as optional artifacts. An unset profile means "not computed yet".

/// A horizontal line across traces, one depth (sample index) per trace.
///
/// Used for detected layer boundaries and for the ground surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HorizontalProfile {
    /// Sample index per trace
    pub depths: Vec<i32>,
    pub min_depth: i32,
    pub max_depth: i32,
    pub avg_depth: f64,
}

impl HorizontalProfile {
    pub fn new(depths: Vec<i32>) -> Self {
        let mut profile = Self {
            depths,
            ..Self::default()
        };
        profile.finish();
        profile
    }

    /// Recompute the summary after `depths` changed.
    pub fn finish(&mut self) {
        if self.depths.is_empty() {
            self.min_depth = 0;
            self.max_depth = 0;
            self.avg_depth = 0.0;
            return;
        }
        self.min_depth = self.depths.iter().copied().min().unwrap_or(0);
        self.max_depth = self.depths.iter().copied().max().unwrap_or(0);
        let sum: i64 = self.depths.iter().map(|&d| d as i64).sum();
        self.avg_depth = sum as f64 / self.depths.len() as f64;
    }
}

/// Per-trace scan result (hyperbola probability or amplitude).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanProfile {
    pub intensity: Vec<f64>,
    pub radius: Vec<f64>,
}

impl ScanProfile {
    /// Zeroed profile for `len` traces.
    pub fn new(len: usize) -> Self {
        Self {
            intensity: vec![0.0; len],
            radius: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.intensity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intensity.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_profile_summary() {
        let profile = HorizontalProfile::new(vec![10, 14, 12, 8]);
        assert_eq!(profile.min_depth, 8);
        assert_eq!(profile.max_depth, 14);
        assert!((profile.avg_depth - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_horizontal_profile_empty() {
        let profile = HorizontalProfile::new(vec![]);
        assert_eq!(profile.min_depth, 0);
        assert_eq!(profile.max_depth, 0);
        assert_eq!(profile.avg_depth, 0.0);
    }

    #[test]
    fn test_scan_profile_len() {
        let scan = ScanProfile::new(5);
        assert_eq!(scan.len(), 5);
        assert!(!scan.is_empty());
        assert!(ScanProfile::default().is_empty());
    }
}
