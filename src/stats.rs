use ndarray::ArrayView1;

/// Correlation statistic computed per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Pearson,
    Spearman,
}

impl Statistic {
    pub fn label(&self) -> &'static str {
        match self {
            Statistic::Pearson => "pearson",
            Statistic::Spearman => "spearman",
        }
    }

    /// NaN on degenerate input (empty, length mismatch, zero variance).
    pub fn apply(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
        match self {
            Statistic::Pearson => pearson(x, y),
            Statistic::Spearman => spearman(x, y),
        }
    }
}

pub fn pearson(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    let n = x.len();
    if n == 0 || y.len() != n {
        return f64::NAN;
    }
    let inv_n = 1.0 / n as f64;
    let mean_x: f64 = x.iter().sum::<f64>() * inv_n;
    let mean_y: f64 = y.iter().sum::<f64>() * inv_n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return f64::NAN;
    }
    cov / (var_x * var_y).sqrt()
}

/// Spearman rank correlation: Pearson over tie-averaged ranks.
pub fn spearman(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return f64::NAN;
    }
    let rx = ranks_avg_ties(&x.to_vec());
    let ry = ranks_avg_ties(&y.to_vec());
    pearson(ArrayView1::from(&rx), ArrayView1::from(&ry))
}

/// Ranks with ties replaced by their average rank (1-based).
pub fn ranks_avg_ties(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut indexed: Vec<(f64, usize)> = values.iter().copied().zip(0..n).collect();
    indexed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && indexed[j].0 == indexed[j + 1].0 {
            j += 1;
        }
        let avg_rank = (i + j + 2) as f64 / 2.0;
        for k in i..=j {
            ranks[indexed[k].1] = avg_rank;
        }
        i = j + 1;
    }
    ranks
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (no Bessel correction).
pub fn std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Standard error of the mean: `std / sqrt(n)`.
pub fn sem(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    std(values) / (values.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_pearson_self_is_one() {
        let x = arr1(&[0.0, 1.0, 2.0, 5.0, 3.0]);
        let r = pearson(x.view(), x.view());
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_negation_is_minus_one() {
        let x = arr1(&[0.0, 1.0, 2.0, 5.0, 3.0]);
        let y = x.mapv(|v| -v);
        let r = pearson(x.view(), y.view());
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_zero_variance_is_nan() {
        let x = arr1(&[1.0, 1.0, 1.0]);
        let y = arr1(&[0.0, 1.0, 2.0]);
        assert!(pearson(x.view(), y.view()).is_nan());
        assert!(pearson(y.view(), x.view()).is_nan());
    }

    #[test]
    fn test_pearson_empty_and_mismatch_are_nan() {
        let empty = arr1(&[] as &[f64]);
        let x = arr1(&[1.0, 2.0]);
        assert!(pearson(empty.view(), empty.view()).is_nan());
        assert!(pearson(x.view(), empty.view()).is_nan());
    }

    #[test]
    fn test_spearman_monotonic_is_one() {
        let x = arr1(&[1.0, 2.0, 3.0, 4.0]);
        let y = arr1(&[10.0, 100.0, 1000.0, 10000.0]);
        let r = spearman(x.view(), y.view());
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ranks_average_ties() {
        let ranks = ranks_avg_ties(&[3.0, 1.0, 3.0, 2.0]);
        assert_eq!(ranks, vec![3.5, 1.0, 3.5, 2.0]);
    }

    #[test]
    fn test_mean_sem_of_zeros() {
        let zeros = vec![0.0; 7];
        assert_eq!(mean(&zeros), 0.0);
        assert_eq!(sem(&zeros), 0.0);
    }

    #[test]
    fn test_sem_matches_std_over_sqrt_n() {
        let v = vec![1.0, 2.0, 3.0, 4.0];
        let expected = std(&v) / 2.0;
        assert!((sem(&v) - expected).abs() < 1e-12);
    }
}
