use ndarray::Array2;

/// Component indices ordered by descending ground-truth trace energy.
/// The first entry is rank 1 and drives the warm end of the
/// per-component colormap.
pub fn rank_by_energy(reference: &Array2<f64>) -> Vec<usize> {
    let energy: Vec<f64> = reference
        .outer_iter()
        .map(|row| row.iter().map(|v| v * v).sum())
        .collect();
    let mut order: Vec<usize> = (0..reference.nrows()).collect();
    order.sort_by(|&a, &b| {
        energy[b]
            .partial_cmp(&energy[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_strongest_component_first() {
        let traces = arr2(&[[1.0, 0.0], [3.0, 4.0], [2.0, 0.0]]);
        assert_eq!(rank_by_energy(&traces), vec![1, 2, 0]);
    }

    #[test]
    fn test_empty_input() {
        let traces = Array2::<f64>::zeros((0, 4));
        assert!(rank_by_energy(&traces).is_empty());
    }
}
