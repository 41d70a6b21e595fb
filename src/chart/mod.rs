//! Bar chart summarizing how much was written in each free-text field.

use plotters::prelude::*;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::ReportError;

// Close to the report's 16 cm x 150 pt chart slot at 75 dpi.
pub const CHART_WIDTH: u32 = 480;
pub const CHART_HEIGHT: u32 = 160;

/// Scores are clamped to this value.
pub const MAX_SCORE: u8 = 10;

pub const BAR_COLORS: [RGBColor; 3] = [
    RGBColor(0x0d, 0x6e, 0xfd),
    RGBColor(0x6c, 0x75, 0x7d),
    RGBColor(0x19, 0x87, 0x54),
];

const GRID_COLOR: RGBColor = RGBColor(0xde, 0xe2, 0xe6);
const AXIS_COLOR: RGBColor = RGBColor(0x49, 0x50, 0x57);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartScores {
    pub motivation: u8,
    pub performance: u8,
    pub objectives: u8,
}

impl ChartScores {
    pub fn from_texts(motivation: &str, performance: &str, objectives: &str) -> Self {
        Self {
            motivation: score(motivation),
            performance: score(performance),
            objectives: score(objectives),
        }
    }

    /// Scores in display order: motivation, performance, objectives.
    pub fn values(&self) -> [u8; 3] {
        [self.motivation, self.performance, self.objectives]
    }
}

/// One point per ten characters, capped at [`MAX_SCORE`].
pub fn score(text: &str) -> u8 {
    let points = text.chars().count() / 10;
    points.min(MAX_SCORE as usize) as u8
}

/// Draws the three scores as a bar chart into a fresh `.png` under `dir`.
///
/// The image is deleted when the returned handle is dropped.
pub fn render_chart(scores: &ChartScores, dir: &Path) -> Result<NamedTempFile, ReportError> {
    let file = tempfile::Builder::new()
        .prefix(".chart-")
        .suffix(".png")
        .tempfile_in(dir)?;

    draw_bars(scores, file.path()).map_err(|e| ReportError::Chart(e.to_string()))?;

    tracing::debug!("Rendered chart {:?} for scores {:?}", file.path(), scores);
    Ok(file)
}

fn draw_bars(scores: &ChartScores, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let (left, right) = (30i32, CHART_WIDTH as i32 - 10);
    let (top, bottom) = (10i32, CHART_HEIGHT as i32 - 10);
    let plot_height = (bottom - top) as f64;
    let y_for = |value: u8| {
        let offset = value as f64 / MAX_SCORE as f64 * plot_height;
        bottom - offset.round() as i32
    };

    for tick in (0..=MAX_SCORE).step_by(2) {
        let y = y_for(tick);
        root.draw(&PathElement::new(vec![(left, y), (right, y)], GRID_COLOR))?;
    }

    let slot = (right - left) / 3;
    let bar_width = slot * 3 / 5;
    for (i, (value, color)) in scores.values().iter().zip(BAR_COLORS.iter()).enumerate() {
        let x0 = left + slot * i as i32 + (slot - bar_width) / 2;
        let y0 = y_for(*value);
        if y0 < bottom {
            let bar = Rectangle::new([(x0, y0), (x0 + bar_width, bottom)], color.filled());
            root.draw(&bar)?;
        }
    }

    let axis = AXIS_COLOR.stroke_width(2);
    root.draw(&PathElement::new(vec![(left, top), (left, bottom)], axis))?;
    root.draw(&PathElement::new(vec![(left, bottom), (right, bottom)], axis))?;

    root.present()?;
    Ok(())
}
