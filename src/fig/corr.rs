use std::path::Path;

use plotters::coord::Shift;
use plotters::element::DashedPathElement;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::fig::{FigError, FigFormat, level_tick_label};
use crate::input::DecimationAxis;

const SIZE: (u32, u32) = (1200, 900);

#[derive(Debug, Clone)]
pub struct CorrSeries {
    /// Legend entry; `None` keeps the series out of the legend.
    pub label: Option<&'static str>,
    pub color: RGBColor,
    pub dashed: bool,
    pub levels: Vec<u32>,
    pub mean: Vec<f64>,
    pub sem: Vec<f64>,
}

/// Mean correlation over decimation level, one line + error bars per
/// comparison series.
#[derive(Debug, Clone)]
pub struct CorrFigure {
    pub y_label: String,
    pub y_range: (f64, f64),
    pub axis: DecimationAxis,
    /// Full x span; the last entry bounds the axis.
    pub levels: Vec<u32>,
    pub series: Vec<CorrSeries>,
}

pub fn render(path: &Path, format: FigFormat, fig: &CorrFigure) -> Result<(), FigError> {
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

fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, fig: &CorrFigure) -> Result<(), FigError>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let x_max = fig.levels.last().copied().unwrap_or(1) as i32;
    let axis = fig.axis;
    let mut chart = ChartBuilder::on(root)
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(1..x_max.max(2), fig.y_range.0..fig.y_range.1)?;

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

    // Legend stubs for the line-style dimension, as in the published
    // figure: black solid = denoised, black dashed = deconvolved.
    chart
        .draw_series(LineSeries::new(
            Vec::<(i32, f64)>::new(),
            BLACK.stroke_width(3),
        ))?
        .label("denoised")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(3)));
    chart
        .draw_series(LineSeries::new(
            Vec::<(i32, f64)>::new(),
            BLACK.stroke_width(3),
        ))?
        .label("deconvolved")
        .legend(|(x, y)| {
            DashedPathElement::new(vec![(x, y), (x + 20, y)], 5, 3, BLACK.stroke_width(3))
        });

    for series in &fig.series {
        let points: Vec<(i32, f64)> = series
            .levels
            .iter()
            .zip(series.mean.iter())
            .map(|(&level, &m)| (level as i32, m))
            .collect();
        let style = series.color.stroke_width(3);

        if series.dashed {
            chart.draw_series(DashedLineSeries::new(points.clone(), 8, 5, style))?;
        } else {
            let anno = chart.draw_series(LineSeries::new(points.clone(), style))?;
            if let Some(label) = series.label {
                let color = series.color;
                anno.label(label).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
                });
            }
        }

        chart.draw_series(points.iter().zip(series.sem.iter()).map(|(&(x, m), &s)| {
            ErrorBar::new_vertical(x, m - s, m, m + s, series.color.stroke_width(2), 8)
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 18))
        .draw()?;

    Ok(())
}
