use std::path::Path;

use crate::report::{ReportError, SeriesSummary};

/// Long-format table of the plotted series: one row per
/// (series, level).
pub fn render_series_csv(series: &[SeriesSummary]) -> String {
    let mut out = String::from("series,level,mean,sem\n");
    for s in series {
        for ((&level, &mean), &sem) in s.levels.iter().zip(s.mean.iter()).zip(s.sem.iter()) {
            out.push_str(&format!("{},{level},{mean:.6},{sem:.6}\n", s.label));
        }
    }
    out
}

pub fn write_series_csv(path: &Path, series: &[SeriesSummary]) -> Result<(), ReportError> {
    std::fs::write(path, render_series_csv(series))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_layout() {
        let series = vec![SeriesSummary {
            label: "two-phase denoised".to_string(),
            levels: vec![1, 2],
            mean: vec![1.0, 0.5],
            sem: vec![0.0, 0.25],
        }];
        let csv = render_series_csv(&series);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "series,level,mean,sem");
        assert_eq!(lines[1], "two-phase denoised,1,1.000000,0.000000");
        assert_eq!(lines[2], "two-phase denoised,2,0.500000,0.250000");
    }

    #[test]
    fn test_empty_series_header_only() {
        assert_eq!(render_series_csv(&[]), "series,level,mean,sem\n");
    }
}
