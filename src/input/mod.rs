use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

pub mod npy;

use crate::model::{TracePair, TraceSet};
use npy::load_trace_set;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read {path}: {source}")]
    Npy {
        path: PathBuf,
        source: ndarray_npy::ReadNpyError,
    },
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Which decimation geometry a trace set was produced under: `k x k`
/// blocks or `k x 1` strips along x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimationAxis {
    Square,
    XOnly,
}

impl DecimationAxis {
    pub fn dir_name(&self) -> &'static str {
        match self {
            DecimationAxis::Square => "square",
            DecimationAxis::XOnly => "xonly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyKind {
    /// Reconstructions from the recorded data.
    Measured,
    /// Artificial data from the generative model with time-shuffled
    /// residuals.
    StratShuffled,
}

impl FamilyKind {
    pub fn dataset_name(&self) -> &'static str {
        match self {
            FamilyKind::Measured => "decimate",
            FamilyKind::StratShuffled => "decimate-stratshuffled",
        }
    }
}

/// One comparison family: two-phase and one-phase trace sets for both
/// decimation geometries, plus the undecimated ground truth shared by
/// all four.
#[derive(Debug)]
pub struct Family {
    pub kind: FamilyKind,
    pub ground_truth: TracePair,
    pub square: TraceSet,
    pub xonly: TraceSet,
    pub square_lr: TraceSet,
    pub xonly_lr: TraceSet,
}

impl Family {
    pub fn two_phase(&self, axis: DecimationAxis) -> &TraceSet {
        match axis {
            DecimationAxis::Square => &self.square,
            DecimationAxis::XOnly => &self.xonly,
        }
    }

    pub fn one_phase(&self, axis: DecimationAxis) -> &TraceSet {
        match axis {
            DecimationAxis::Square => &self.square_lr,
            DecimationAxis::XOnly => &self.xonly_lr,
        }
    }

    pub fn n_components(&self) -> usize {
        self.ground_truth.n_components()
    }
}

#[derive(Debug)]
pub struct InputBundle {
    pub families: Vec<Family>,
}

/// Loads the `decimate` family and, when present, the shuffled-control
/// family. The control is optional output of the upstream pipeline, so
/// its absence is only a warning.
pub fn load_results(results_dir: &Path) -> Result<InputBundle, InputError> {
    if !results_dir.is_dir() {
        return Err(InputError::MissingInput(format!(
            "results directory {} not found",
            results_dir.display()
        )));
    }

    let mut families = vec![load_family(results_dir, FamilyKind::Measured)?];
    match load_family(results_dir, FamilyKind::StratShuffled) {
        Ok(family) => families.push(family),
        Err(InputError::MissingInput(msg)) => {
            warn!("shuffled-control datasets not found; skipping ({msg})");
        }
        Err(e) => return Err(e),
    }
    Ok(InputBundle { families })
}

fn load_family(results_dir: &Path, kind: FamilyKind) -> Result<Family, InputError> {
    let base = results_dir.join(kind.dataset_name());
    let lr = results_dir.join(format!("{}-lr", kind.dataset_name()));

    let square = load_trace_set(&base.join(DecimationAxis::Square.dir_name()))?;
    let xonly = load_trace_set(&base.join(DecimationAxis::XOnly.dir_name()))?;
    let square_lr = load_trace_set(&lr.join(DecimationAxis::Square.dir_name()))?;
    let xonly_lr = load_trace_set(&lr.join(DecimationAxis::XOnly.dir_name()))?;

    let ground_truth = square.ground_truth().cloned().ok_or_else(|| {
        InputError::MissingInput(format!(
            "dataset {} has no decimation level 1 (ground truth)",
            base.display()
        ))
    })?;

    info!(
        dataset = kind.dataset_name(),
        components = ground_truth.n_components(),
        levels = ?square.level_list(),
        lr_levels = ?square_lr.level_list(),
        "loaded comparison family"
    );

    Ok(Family {
        kind,
        ground_truth,
        square,
        xonly,
        square_lr,
        xonly_lr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use ndarray_npy::write_npy;

    fn write_set(dir: &Path, levels: &[u32], rows: usize) {
        std::fs::create_dir_all(dir).unwrap();
        for &level in levels {
            let m = Array2::from_shape_fn((rows, 8), |(i, j)| (i as f64) + (j as f64) * 0.5);
            write_npy(dir.join(format!("ds{level}.denoised.npy")), &m).unwrap();
            write_npy(dir.join(format!("ds{level}.deconvolved.npy")), &m).unwrap();
        }
    }

    fn write_family(root: &Path, name: &str) {
        write_set(&root.join(name).join("square"), &[1, 2], 3);
        write_set(&root.join(name).join("xonly"), &[1, 2], 3);
        write_set(&root.join(format!("{name}-lr")).join("square"), &[1, 2], 3);
        write_set(&root.join(format!("{name}-lr")).join("xonly"), &[1, 2], 3);
    }

    #[test]
    fn test_optional_family_skipped_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        write_family(dir.path(), "decimate");
        let bundle = load_results(dir.path()).unwrap();
        assert_eq!(bundle.families.len(), 1);
        assert_eq!(bundle.families[0].kind, FamilyKind::Measured);
        assert_eq!(bundle.families[0].n_components(), 3);
    }

    #[test]
    fn test_both_families_loaded_when_present() {
        let dir = tempfile::tempdir().unwrap();
        write_family(dir.path(), "decimate");
        write_family(dir.path(), "decimate-stratshuffled");
        let bundle = load_results(dir.path()).unwrap();
        assert_eq!(bundle.families.len(), 2);
        assert_eq!(bundle.families[1].kind, FamilyKind::StratShuffled);
    }

    #[test]
    fn test_required_family_missing_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_results(dir.path()).unwrap_err();
        assert!(matches!(err, InputError::MissingInput(_)));
    }

    #[test]
    fn test_ground_truth_level_required() {
        let dir = tempfile::tempdir().unwrap();
        write_family(dir.path(), "decimate");
        std::fs::remove_file(dir.path().join("decimate/square/ds1.denoised.npy")).unwrap();
        std::fs::remove_file(dir.path().join("decimate/square/ds1.deconvolved.npy")).unwrap();
        let err = load_results(dir.path()).unwrap_err();
        assert!(matches!(err, InputError::MissingInput(_)));
    }
}
