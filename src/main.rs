use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use plotters::style::RGBColor;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use decimfig::fig;
use decimfig::fig::corr::{CorrFigure, CorrSeries};
use decimfig::fig::indiv::IndivFigure;
use decimfig::fig::{CYAN, FigError, FigFormat, ORANGE};
use decimfig::input::{self, DecimationAxis, Family, FamilyKind, InputError};
use decimfig::model::{ONE_PHASE_LEVELS, TWO_PHASE_LEVELS, TraceKind};
use decimfig::pipeline::correlate::{CorrelateInputs, run_correlate};
use decimfig::pipeline::rank::rank_by_energy;
use decimfig::report::csv::write_series_csv;
use decimfig::report::json::write_summary;
use decimfig::report::{FamilySummary, FigureSummary, ReportError, RunSummary, SeriesSummary};
use decimfig::stats::Statistic;

#[derive(Parser)]
#[command(
    name = "decimfig",
    version,
    about = "Rebuilds the spatial-decimation correlation figures for calcium-imaging trace reconstructions"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute correlation matrices and render the figure set
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Output directory for figures and summaries; when absent or not
    /// a directory, figures go to target/figs
    out: Option<PathBuf>,

    /// Directory holding the precomputed result arrays
    #[arg(long, default_value = "results")]
    results: PathBuf,

    /// Correlation statistic to plot
    #[arg(long, value_enum, default_value = "both")]
    stat: StatChoice,

    /// Image format for the rendered figures
    #[arg(long, value_enum, default_value = "png")]
    format: FormatChoice,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatChoice {
    Pearson,
    Spearman,
    Both,
}

impl StatChoice {
    fn statistics(self) -> Vec<Statistic> {
        match self {
            StatChoice::Pearson => vec![Statistic::Pearson],
            StatChoice::Spearman => vec![Statistic::Spearman],
            StatChoice::Both => vec![Statistic::Pearson, Statistic::Spearman],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatChoice {
    Png,
    Svg,
}

impl From<FormatChoice> for FigFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Png => FigFormat::Png,
            FormatChoice::Svg => FigFormat::Svg,
        }
    }
}

#[derive(Debug, Error)]
enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Fig(#[from] FigError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => {
            init_tracing(args.verbose);
            if let Err(err) = run(&args) {
                eprintln!("{err}");
                std::process::exit(1);
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");
}

fn run(args: &RunArgs) -> Result<(), AppError> {
    let out_dir = resolve_output_dir(args.out.as_deref());
    std::fs::create_dir_all(&out_dir)?;

    let bundle = input::load_results(&args.results)?;
    let stats = args.stat.statistics();
    let format: FigFormat = args.format.into();

    let mut families = Vec::new();
    for family in &bundle.families {
        families.push(process_family(family, &stats, format, &out_dir)?);
    }

    let summary = RunSummary {
        tool_name: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        results_dir: args.results.display().to_string(),
        out_dir: out_dir.display().to_string(),
        families,
    };
    write_summary(&out_dir.join("summary.json"), &summary)?;

    info!(out = %out_dir.display(), "wrote figures and summaries");
    Ok(())
}

/// The original workflow showed figures interactively when no valid
/// output directory was named; there is no display backend here, so
/// the fallback is a conventional directory instead.
fn resolve_output_dir(out: Option<&Path>) -> PathBuf {
    match out {
        Some(dir) if dir.is_dir() => dir.to_path_buf(),
        Some(dir) => {
            warn!(
                "{} is not a directory; writing figures to target/figs",
                dir.display()
            );
            PathBuf::from("target/figs")
        }
        None => {
            warn!("no output directory given; writing figures to target/figs");
            PathBuf::from("target/figs")
        }
    }
}

fn process_family(
    family: &Family,
    stats: &[Statistic],
    format: FigFormat,
    out_dir: &Path,
) -> Result<FamilySummary, AppError> {
    let order = rank_by_energy(&family.ground_truth.denoised);
    let mut figures = Vec::new();
    for &stat in stats {
        for axis in [DecimationAxis::Square, DecimationAxis::XOnly] {
            figures.push(render_comparison(family, axis, stat, format, out_dir)?);
        }
        figures.push(render_indiv(family, stat, &order, format, out_dir)?);
    }
    Ok(FamilySummary {
        dataset: family.kind.dataset_name().to_string(),
        n_components: family.n_components(),
        figures,
    })
}

struct SeriesPlan {
    csv_label: &'static str,
    legend: Option<&'static str>,
    color: RGBColor,
    dashed: bool,
    one_phase: bool,
    kind: TraceKind,
}

/// Four comparison series per figure, drawn in the order of the
/// published panels: solid denoised lines first, then the dashed
/// deconvolved ones.
const SERIES_PLAN: [SeriesPlan; 4] = [
    SeriesPlan {
        csv_label: "one-phase denoised",
        legend: Some("1 phase imaging"),
        color: CYAN,
        dashed: false,
        one_phase: true,
        kind: TraceKind::Denoised,
    },
    SeriesPlan {
        csv_label: "two-phase denoised",
        legend: Some("2 phase imaging"),
        color: ORANGE,
        dashed: false,
        one_phase: false,
        kind: TraceKind::Denoised,
    },
    SeriesPlan {
        csv_label: "one-phase deconvolved",
        legend: None,
        color: CYAN,
        dashed: true,
        one_phase: true,
        kind: TraceKind::Deconvolved,
    },
    SeriesPlan {
        csv_label: "two-phase deconvolved",
        legend: None,
        color: ORANGE,
        dashed: true,
        one_phase: false,
        kind: TraceKind::Deconvolved,
    },
];

fn render_comparison(
    family: &Family,
    axis: DecimationAxis,
    stat: Statistic,
    format: FigFormat,
    out_dir: &Path,
) -> Result<FigureSummary, AppError> {
    let mut series = Vec::new();
    let mut summaries = Vec::new();
    for plan in &SERIES_PLAN {
        let (set, levels): (_, &[u32]) = if plan.one_phase {
            (family.one_phase(axis), &ONE_PHASE_LEVELS)
        } else {
            (family.two_phase(axis), &TWO_PHASE_LEVELS)
        };
        let out = run_correlate(&CorrelateInputs {
            reference: family.ground_truth.traces(plan.kind),
            set,
            kind: plan.kind,
            levels,
            stat,
        });
        series.push(CorrSeries {
            label: plan.legend,
            color: plan.color,
            dashed: plan.dashed,
            levels: levels.to_vec(),
            mean: out.mean.clone(),
            sem: out.sem.clone(),
        });
        summaries.push(SeriesSummary {
            label: plan.csv_label.to_string(),
            levels: levels.to_vec(),
            mean: out.mean,
            sem: out.sem,
        });
    }

    let base = match axis {
        DecimationAxis::Square => "Corr",
        DecimationAxis::XOnly => "xCorr",
    };
    let file = figure_file(family.kind, base, stat, format);
    let figure = CorrFigure {
        y_label: comparison_y_label(family.kind),
        y_range: comparison_y_range(family.kind, axis, stat),
        axis,
        levels: TWO_PHASE_LEVELS.to_vec(),
        series,
    };
    fig::corr::render(&out_dir.join(&file), format, &figure)?;
    write_series_csv(&out_dir.join(Path::new(&file).with_extension("csv")), &summaries)?;

    Ok(FigureSummary {
        file,
        stat: stat.label().to_string(),
        series: summaries,
    })
}

fn render_indiv(
    family: &Family,
    stat: Statistic,
    order: &[usize],
    format: FigFormat,
    out_dir: &Path,
) -> Result<FigureSummary, AppError> {
    let out = run_correlate(&CorrelateInputs {
        reference: &family.ground_truth.denoised,
        set: &family.square,
        kind: TraceKind::Denoised,
        levels: &TWO_PHASE_LEVELS,
        stat,
    });
    let summaries = vec![SeriesSummary {
        label: "two-phase denoised".to_string(),
        levels: TWO_PHASE_LEVELS.to_vec(),
        mean: out.mean,
        sem: out.sem,
    }];

    let file = figure_file(family.kind, "Corr-indiv", stat, format);
    let figure = IndivFigure {
        y_label: indiv_y_label(family.kind),
        y_min: match stat {
            Statistic::Pearson => 0.1,
            Statistic::Spearman => 0.0,
        },
        axis: DecimationAxis::Square,
        levels: TWO_PHASE_LEVELS.to_vec(),
        matrix: out.matrix,
        order: order.to_vec(),
    };
    fig::indiv::render(&out_dir.join(&file), format, &figure)?;
    write_series_csv(&out_dir.join(Path::new(&file).with_extension("csv")), &summaries)?;

    Ok(FigureSummary {
        file,
        stat: stat.label().to_string(),
        series: summaries,
    })
}

fn figure_file(kind: FamilyKind, base: &str, stat: Statistic, format: FigFormat) -> String {
    let mut name = base.to_string();
    if kind == FamilyKind::StratShuffled {
        name.push_str("-stratshuffled");
    }
    if stat == Statistic::Spearman {
        name.push_str("_Spearman");
    }
    format!("{name}.{}", format.extension())
}

fn comparison_y_label(kind: FamilyKind) -> String {
    match kind {
        FamilyKind::Measured => "Correlation with undecimated C1/S1".to_string(),
        FamilyKind::StratShuffled => "Correlation with ground truth Cs/Ss".to_string(),
    }
}

fn indiv_y_label(kind: FamilyKind) -> String {
    match kind {
        FamilyKind::Measured => "Correlation with undecimated C1".to_string(),
        FamilyKind::StratShuffled => "Correlation with ground truth Cs".to_string(),
    }
}

/// Per-figure y ranges of the published panels.
fn comparison_y_range(kind: FamilyKind, axis: DecimationAxis, stat: Statistic) -> (f64, f64) {
    match (kind, axis, stat) {
        (FamilyKind::Measured, DecimationAxis::Square, Statistic::Pearson) => (0.3, 1.0),
        (FamilyKind::Measured, DecimationAxis::Square, Statistic::Spearman) => (0.2, 1.0),
        (FamilyKind::Measured, DecimationAxis::XOnly, Statistic::Pearson) => (0.45, 1.0),
        (FamilyKind::Measured, DecimationAxis::XOnly, Statistic::Spearman) => (0.5, 1.0),
        (FamilyKind::StratShuffled, DecimationAxis::Square, Statistic::Pearson) => (0.4, 1.0),
        (FamilyKind::StratShuffled, DecimationAxis::Square, Statistic::Spearman) => (0.2, 1.0),
        (FamilyKind::StratShuffled, DecimationAxis::XOnly, Statistic::Pearson) => (0.25, 1.0),
        (FamilyKind::StratShuffled, DecimationAxis::XOnly, Statistic::Spearman) => (0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_file_names() {
        assert_eq!(
            figure_file(
                FamilyKind::Measured,
                "Corr",
                Statistic::Pearson,
                FigFormat::Png
            ),
            "Corr.png"
        );
        assert_eq!(
            figure_file(
                FamilyKind::Measured,
                "xCorr",
                Statistic::Spearman,
                FigFormat::Svg
            ),
            "xCorr_Spearman.svg"
        );
        assert_eq!(
            figure_file(
                FamilyKind::StratShuffled,
                "Corr-indiv",
                Statistic::Spearman,
                FigFormat::Png
            ),
            "Corr-indiv-stratshuffled_Spearman.png"
        );
    }

    #[test]
    fn test_stat_choice_expansion() {
        assert_eq!(StatChoice::Pearson.statistics(), vec![Statistic::Pearson]);
        assert_eq!(
            StatChoice::Both.statistics(),
            vec![Statistic::Pearson, Statistic::Spearman]
        );
    }

    #[test]
    fn test_resolve_output_dir_existing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_output_dir(Some(dir.path())),
            dir.path().to_path_buf()
        );
    }

    #[test]
    fn test_resolve_output_dir_fallback() {
        assert_eq!(resolve_output_dir(None), PathBuf::from("target/figs"));
        assert_eq!(
            resolve_output_dir(Some(Path::new("/definitely/not/here"))),
            PathBuf::from("target/figs")
        );
    }

    #[test]
    fn test_y_ranges_match_published_panels() {
        assert_eq!(
            comparison_y_range(
                FamilyKind::Measured,
                DecimationAxis::Square,
                Statistic::Pearson
            ),
            (0.3, 1.0)
        );
        assert_eq!(
            comparison_y_range(
                FamilyKind::StratShuffled,
                DecimationAxis::XOnly,
                Statistic::Spearman
            ),
            (0.0, 1.0)
        );
    }
}
