use std::collections::BTreeMap;

use ndarray::Array2;

/// Decimation factors used for two-phase imaging runs.
pub const TWO_PHASE_LEVELS: [u32; 10] = [1, 2, 3, 4, 6, 8, 12, 16, 24, 32];

/// Decimation factors available for one-phase (low-resolution) runs.
pub const ONE_PHASE_LEVELS: [u32; 4] = [1, 2, 3, 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    Denoised,
    Deconvolved,
}

/// The two reconstructions extracted at one decimation level. Both are
/// `N x T` matrices with one component per row.
#[derive(Debug, Clone)]
pub struct TracePair {
    pub denoised: Array2<f64>,
    pub deconvolved: Array2<f64>,
}

impl TracePair {
    pub fn traces(&self, kind: TraceKind) -> &Array2<f64> {
        match kind {
            TraceKind::Denoised => &self.denoised,
            TraceKind::Deconvolved => &self.deconvolved,
        }
    }

    pub fn n_components(&self) -> usize {
        self.denoised.nrows()
    }
}

/// Trace collections keyed by decimation factor.
#[derive(Debug, Clone, Default)]
pub struct TraceSet {
    pub levels: BTreeMap<u32, TracePair>,
}

impl TraceSet {
    pub fn get(&self, level: u32) -> Option<&TracePair> {
        self.levels.get(&level)
    }

    /// The undecimated traces, reference for every comparison.
    pub fn ground_truth(&self) -> Option<&TracePair> {
        self.get(1)
    }

    pub fn level_list(&self) -> Vec<u32> {
        self.levels.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    fn pair() -> TracePair {
        TracePair {
            denoised: arr2(&[[1.0, 2.0], [3.0, 4.0]]),
            deconvolved: arr2(&[[0.0, 1.0], [1.0, 0.0]]),
        }
    }

    #[test]
    fn test_trace_kind_selects_matrix() {
        let p = pair();
        assert_eq!(p.traces(TraceKind::Denoised)[[0, 1]], 2.0);
        assert_eq!(p.traces(TraceKind::Deconvolved)[[0, 1]], 1.0);
        assert_eq!(p.n_components(), 2);
    }

    #[test]
    fn test_ground_truth_is_level_one() {
        let mut set = TraceSet::default();
        set.levels.insert(2, pair());
        assert!(set.ground_truth().is_none());
        set.levels.insert(1, pair());
        assert!(set.ground_truth().is_some());
        assert_eq!(set.level_list(), vec![1, 2]);
    }
}
