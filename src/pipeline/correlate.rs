use ndarray::Array2;
use tracing::warn;

use crate::model::{TraceKind, TraceSet};
use crate::pipeline::align::match_components;
use crate::stats::{Statistic, mean, sem};

#[derive(Debug, Clone)]
pub struct CorrelateInputs<'a> {
    /// `N x T` ground-truth traces.
    pub reference: &'a Array2<f64>,
    pub set: &'a TraceSet,
    pub kind: TraceKind,
    /// Ordered decimation levels, one output column each.
    pub levels: &'a [u32],
    pub stat: Statistic,
}

#[derive(Debug)]
pub struct CorrelateOutput {
    /// `N x D` coefficients, undefined entries coerced to 0.
    pub matrix: Array2<f64>,
    /// Column-wise mean, one per level.
    pub mean: Vec<f64>,
    /// Column-wise standard error (`std / sqrt(N)`), one per level.
    pub sem: Vec<f64>,
}

/// Builds the per-component, per-level correlation matrix against the
/// reference traces and aggregates it column-wise.
pub fn run_correlate(inputs: &CorrelateInputs<'_>) -> CorrelateOutput {
    let n = inputs.reference.nrows();
    let d = inputs.levels.len();
    let mut matrix = Array2::from_elem((n, d), f64::NAN);

    for (col, &level) in inputs.levels.iter().enumerate() {
        let Some(pair) = inputs.set.get(level) else {
            warn!(level, "decimation level missing from trace set; column stays zero");
            continue;
        };
        let candidates = pair.traces(inputs.kind);

        if candidates.nrows() == n {
            for comp in 0..n {
                matrix[[comp, col]] = inputs
                    .stat
                    .apply(candidates.row(comp), inputs.reference.row(comp));
            }
        } else if n > 0 {
            let map = match_components(candidates, inputs.reference);
            for (cand_idx, &target) in map.iter().enumerate() {
                if !matrix[[target, col]].is_nan() {
                    warn!(
                        level,
                        component = target,
                        "multiple candidates matched the same reference trace; keeping the last"
                    );
                }
                matrix[[target, col]] = inputs
                    .stat
                    .apply(candidates.row(cand_idx), inputs.reference.row(target));
            }
        }
    }

    for v in matrix.iter_mut() {
        if !v.is_finite() {
            *v = 0.0;
        }
    }

    let mut col_mean = Vec::with_capacity(d);
    let mut col_sem = Vec::with_capacity(d);
    for col in 0..d {
        let values: Vec<f64> = matrix.column(col).to_vec();
        col_mean.push(mean(&values));
        col_sem.push(sem(&values));
    }

    CorrelateOutput {
        matrix,
        mean: col_mean,
        sem: col_sem,
    }
}
