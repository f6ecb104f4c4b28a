use plotters::drawing::DrawingAreaErrorKind;
use plotters::style::RGBColor;
use thiserror::Error;

pub mod corr;
pub mod indiv;

use crate::input::DecimationAxis;

// Colorblind-safe palette from http://www.cookbook-r.com/Graphs/Colors_(ggplot2)
pub const ORANGE: RGBColor = RGBColor(0xE6, 0x9F, 0x00);
pub const CYAN: RGBColor = RGBColor(0x56, 0xB4, 0xE9);

#[derive(Debug, Error)]
pub enum FigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("render error: {0}")]
    Render(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for FigError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        FigError::Render(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigFormat {
    Png,
    Svg,
}

impl FigFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FigFormat::Png => "png",
            FigFormat::Svg => "svg",
        }
    }
}

/// Tick label for a decimation level. Only the landmark factors get a
/// label; the suffix names the block geometry (`8x8` vs `8x1`).
pub fn level_tick_label(axis: DecimationAxis, level: i32) -> String {
    match level {
        1 => "1".to_string(),
        8 | 16 | 24 | 32 => match axis {
            DecimationAxis::Square => format!("{level}x{level}"),
            DecimationAxis::XOnly => format!("{level}x1"),
        },
        _ => String::new(),
    }
}

/// Rainbow colormap over `[0, 1]`: violet at 0, red at 1.
pub fn rainbow(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    hsv_to_rgb(270.0 * (1.0 - t), 0.85, 0.95)
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> RGBColor {
    let c = v * s;
    let hp = (h % 360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    RGBColor(
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}
