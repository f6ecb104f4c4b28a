use serde::Serialize;
use thiserror::Error;

pub mod csv;
pub mod json;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Machine-readable counterpart of one run, written next to the
/// figures.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub tool_name: String,
    pub tool_version: String,
    pub results_dir: String,
    pub out_dir: String,
    pub families: Vec<FamilySummary>,
}

#[derive(Debug, Serialize)]
pub struct FamilySummary {
    pub dataset: String,
    pub n_components: usize,
    pub figures: Vec<FigureSummary>,
}

#[derive(Debug, Serialize)]
pub struct FigureSummary {
    pub file: String,
    pub stat: String,
    pub series: Vec<SeriesSummary>,
}

/// The plotted aggregates of one comparison series.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesSummary {
    pub label: String,
    pub levels: Vec<u32>,
    pub mean: Vec<f64>,
    pub sem: Vec<f64>,
}
