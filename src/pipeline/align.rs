use ndarray::Array2;

use crate::stats::pearson;

/// For every candidate trace, the reference row index with maximal
/// Pearson correlation. Needed when the spatial update dropped or split
/// a component, leaving fewer (or more) candidates than references.
///
/// The match is greedy and non-bijective: two candidates may land on
/// the same reference index. NaN scores count as minus infinity, so a
/// degenerate candidate still maps to the first finite maximum.
pub fn match_components(candidates: &Array2<f64>, reference: &Array2<f64>) -> Vec<usize> {
    let mut map = Vec::with_capacity(candidates.nrows());
    for cand in candidates.outer_iter() {
        let mut best = 0usize;
        let mut best_score = f64::NEG_INFINITY;
        for (j, reference_row) in reference.outer_iter().enumerate() {
            let r = pearson(cand, reference_row);
            if r.is_finite() && r > best_score {
                best_score = r;
                best = j;
            }
        }
        map.push(best);
    }
    map
}
