use std::path::Path;

use ndarray::Array2;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::fig::{FigError, FigFormat, level_tick_label, rainbow};
use crate::input::DecimationAxis;

const SIZE: (u32, u32) = (1200, 900);
const COLORBAR_WIDTH: u32 = 120;

/// One correlation line per component, colored by component rank.
#[derive(Debug, Clone)]
pub struct IndivFigure {
    pub y_label: String,
    pub y_min: f64,
    pub axis: DecimationAxis,
    pub levels: Vec<u32>,
    /// `N x D` correlation matrix.
    pub matrix: Array2<f64>,
    /// Component indices, rank 1 (strongest) first.
    pub order: Vec<usize>,
}

pub fn render(path: &Path, format: FigFormat, fig: &IndivFigure) -> Result<(), FigError> {
    match format {
        FigFormat::Png => {
            let root = BitMapBackend::new(path, SIZE).into_drawing_area();
            draw(&root, fig)?;
            root.present()?;
        }
        FigFormat::Svg => {
            let root = SVGBackend::new(path, SIZE).into_drawing_area();
            draw(&root, fig)?;
            root.present()?;
        }
    }
    Ok(())
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    fig: &IndivFigure,
) -> Result<(), FigError>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let (main, bar) = root.split_horizontally(SIZE.0 - COLORBAR_WIDTH);

    let x_max = fig.levels.last().copied().unwrap_or(1) as i32;
    let axis = fig.axis;
    let mut chart = ChartBuilder::on(&main)
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(1..x_max.max(2), fig.y_min..1.0)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Spatial decimation")
        .y_desc(fig.y_label.clone())
        .x_labels(x_max as usize)
        .x_label_formatter(&move |v| level_tick_label(axis, *v))
        .y_labels(8)
        .y_label_formatter(&|v| format!("{v:.1}"))
        .axis_desc_style(("sans-serif", 24))
        .label_style(("sans-serif", 18))
        .draw()?;

    let n = fig.order.len();
    // Weakest components first so the strong (warm) lines end on top.
    for (i, &comp) in fig.order.iter().rev().enumerate() {
        let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 1.0 };
        let points: Vec<(i32, f64)> = fig
            .levels
            .iter()
            .zip(fig.matrix.row(comp).iter())
            .map(|(&level, &r)| (level as i32, r))
            .collect();
        chart.draw_series(LineSeries::new(points, rainbow(t).stroke_width(1)))?;
    }

    draw_colorbar(&bar, n)?;
    Ok(())
}

/// Rank colorbar: rank 1 (red) at the top, rank N (violet) at the
/// bottom.
fn draw_colorbar<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, n: usize) -> Result<(), FigError>
where
    DB::ErrorType: 'static,
{
    if n == 0 {
        return Ok(());
    }
    let area = area.titled("Rank", ("sans-serif", 22))?;
    let mut chart = ChartBuilder::on(&area)
        .margin_top(10)
        .margin_bottom(60)
        .margin_left(10)
        .margin_right(40)
        .build_cartesian_2d(0.0..1.0, 0.0..n as f64)?;

    for j in 0..n {
        let t = if n > 1 { j as f64 / (n - 1) as f64 } else { 1.0 };
        chart.draw_series(std::iter::once(Rectangle::new(
            [(0.0, j as f64), (0.7, (j + 1) as f64)],
            rainbow(t).filled(),
        )))?;
    }
    chart.draw_series(std::iter::once(Text::new(
        "1".to_string(),
        (0.75, n as f64 - 0.5),
        ("sans-serif", 18),
    )))?;
    chart.draw_series(std::iter::once(Text::new(
        format!("{n}"),
        (0.75, 0.5),
        ("sans-serif", 18),
    )))?;
    Ok(())
}
