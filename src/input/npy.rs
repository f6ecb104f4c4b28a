use std::collections::BTreeSet;
use std::path::Path;

use ndarray::Array2;
use tracing::debug;

use crate::input::InputError;
use crate::model::{TracePair, TraceSet};

pub fn read_matrix(path: &Path) -> Result<Array2<f64>, InputError> {
    let arr: Array2<f64> = ndarray_npy::read_npy(path).map_err(|source| InputError::Npy {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(arr)
}

/// Decimation levels present in a trace-set directory, read off the
/// `ds<k>.denoised.npy` filenames.
pub fn discover_levels(dir: &Path) -> Result<BTreeSet<u32>, InputError> {
    let mut levels = BTreeSet::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let Some(stem) = name
            .strip_prefix("ds")
            .and_then(|s| s.strip_suffix(".denoised.npy"))
        else {
            continue;
        };
        let level: u32 = stem.parse().map_err(|_| {
            InputError::InvalidInput(format!("bad decimation factor in file name: {name}"))
        })?;
        if level == 0 {
            return Err(InputError::InvalidInput(format!(
                "decimation factor must be positive: {name}"
            )));
        }
        levels.insert(level);
    }
    Ok(levels)
}

/// Loads every `ds<k>.{denoised,deconvolved}.npy` pair in `dir`.
pub fn load_trace_set(dir: &Path) -> Result<TraceSet, InputError> {
    if !dir.is_dir() {
        return Err(InputError::MissingInput(format!(
            "trace-set directory {} not found",
            dir.display()
        )));
    }
    let levels = discover_levels(dir)?;
    if levels.is_empty() {
        return Err(InputError::MissingInput(format!(
            "no ds<k>.denoised.npy files in {}",
            dir.display()
        )));
    }

    let mut set = TraceSet::default();
    for level in levels {
        let denoised_path = dir.join(format!("ds{level}.denoised.npy"));
        let deconvolved_path = dir.join(format!("ds{level}.deconvolved.npy"));
        if !deconvolved_path.exists() {
            return Err(InputError::MissingInput(format!(
                "missing {}",
                deconvolved_path.display()
            )));
        }
        let denoised = read_matrix(&denoised_path)?;
        let deconvolved = read_matrix(&deconvolved_path)?;
        if denoised.nrows() != deconvolved.nrows() {
            return Err(InputError::InvalidInput(format!(
                "component count mismatch at level {level} in {}: {} denoised vs {} deconvolved",
                dir.display(),
                denoised.nrows(),
                deconvolved.nrows()
            )));
        }
        debug!(
            level,
            components = denoised.nrows(),
            samples = denoised.ncols(),
            "loaded trace pair"
        );
        set.levels.insert(
            level,
            TracePair {
                denoised,
                deconvolved,
            },
        );
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use ndarray_npy::write_npy;

    fn write_pair(dir: &Path, level: u32, rows: usize) {
        let m = Array2::from_shape_fn((rows, 6), |(i, j)| (i * 10 + j) as f64);
        write_npy(dir.join(format!("ds{level}.denoised.npy")), &m).unwrap();
        write_npy(dir.join(format!("ds{level}.deconvolved.npy")), &m).unwrap();
    }

    #[test]
    fn test_discover_levels_parses_file_names() {
        let dir = tempfile::tempdir().unwrap();
        write_pair(dir.path(), 1, 3);
        write_pair(dir.path(), 16, 3);
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let levels = discover_levels(dir.path()).unwrap();
        assert_eq!(levels.into_iter().collect::<Vec<_>>(), vec![1, 16]);
    }

    #[test]
    fn test_load_trace_set_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let m = arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        write_npy(dir.path().join("ds2.denoised.npy"), &m).unwrap();
        write_npy(dir.path().join("ds2.deconvolved.npy"), &m).unwrap();
        let set = load_trace_set(dir.path()).unwrap();
        assert_eq!(set.level_list(), vec![2]);
        assert_eq!(set.get(2).unwrap().denoised, m);
    }

    #[test]
    fn test_missing_deconvolved_half_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let m = arr2(&[[1.0, 2.0]]);
        write_npy(dir.path().join("ds1.denoised.npy"), &m).unwrap();
        let err = load_trace_set(dir.path()).unwrap_err();
        assert!(matches!(err, InputError::MissingInput(_)));
    }

    #[test]
    fn test_empty_directory_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_trace_set(dir.path()).unwrap_err();
        assert!(matches!(err, InputError::MissingInput(_)));
    }
}
