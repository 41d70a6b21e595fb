// Report PDF generation
// Uses printpdf's builtin Helvetica, so no font files are needed on the host
use image::GenericImageView;
use printpdf::{
    BuiltinFont, Color, Image, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point,
    Rgb,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::chart::{self, ChartScores};
use crate::db::Submission;
use crate::error::ReportError;
use crate::storage::{build_report_filename, remove_report_file};

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const PAGE_HEIGHT_PT: f64 = PAGE_HEIGHT_MM / MM_PER_PT;
const MM_PER_PT: f64 = 25.4 / 72.0;

const HEADER_HEIGHT_PT: f64 = 80.0;
const LABEL_X_MM: f64 = 20.0;
const TEXT_X_MM: f64 = 30.0;
const LINE_STEP_PT: f64 = 15.0;
const FIELD_GAP_PT: f64 = 10.0;
const CHART_WIDTH_MM: f64 = 160.0;
const CHART_HEIGHT_PT: f64 = 150.0;
const IMAGE_DPI: f64 = 300.0;

const HEADER_COLOR: (f64, f64, f64) = (13.0 / 255.0, 110.0 / 255.0, 253.0 / 255.0);

pub const FIELD_LABELS: [&str; 3] = ["Motivation", "Performance", "Objectives"];

fn pt(value: f64) -> Mm {
    Mm(value * MM_PER_PT)
}

fn rgb((r, g, b): (f64, f64, f64)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// Renders the chart for `submission` and composes a uniquely named report
/// in `pdf_dir`, returning its filename. The chart image never outlives this
/// call, and a partially written PDF is removed on failure.
pub fn generate_report(submission: &Submission, pdf_dir: &Path) -> Result<String, ReportError> {
    let scores = ChartScores::from_texts(
        &submission.motivation,
        &submission.performance,
        &submission.objectives,
    );
    let chart_file = chart::render_chart(&scores, pdf_dir)?;

    let filename = build_report_filename(&submission.name);
    let output_path = pdf_dir.join(&filename);
    let result = compose_report(submission, &scores, chart_file.path(), &output_path);
    drop(chart_file);

    match result {
        Ok(()) => Ok(filename),
        Err(e) => {
            if let Err(cleanup) = remove_report_file(&output_path) {
                tracing::warn!("Failed to remove partial report {:?}: {}", output_path, cleanup);
            }
            Err(e)
        }
    }
}

/// Lays out the fixed one-page template. Text that runs past the bottom of
/// the page is drawn off-page; there is no pagination.
pub fn compose_report(
    submission: &Submission,
    scores: &ChartScores,
    chart_path: &Path,
    output_path: &Path,
) -> Result<(), ReportError> {
    let title = format!("Educational Report - {}", submission.name);
    let (doc, page, layer) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Report");
    let layer = doc.get_page(page).get_layer(layer);

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(ReportError::pdf)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(ReportError::pdf)?;

    let height = PAGE_HEIGHT_PT;

    draw_header_band(&layer);
    layer.set_fill_color(rgb((1.0, 1.0, 1.0)));
    layer.use_text(&title, 24.0, Mm(LABEL_X_MM), pt(height - 50.0), &bold);

    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
    let meta = [
        format!("Name: {}", submission.name),
        format!("Role: {}", submission.role),
        "-".repeat(40),
    ];
    for (i, line) in meta.iter().enumerate() {
        let y = height - 100.0 - 15.0 * i as f64;
        layer.use_text(line.as_str(), 12.0, Mm(LABEL_X_MM), pt(y), &regular);
    }

    let fields = [
        submission.motivation.as_str(),
        submission.performance.as_str(),
        submission.objectives.as_str(),
    ];
    let mut y = height - 150.0;
    for (label, text) in FIELD_LABELS.iter().zip(fields) {
        y = draw_field(&layer, &regular, &bold, label, text, y);
    }

    let chart_bottom = y - CHART_HEIGHT_PT;
    place_chart(&layer, chart_path, chart_bottom)?;

    let caption = FIELD_LABELS
        .iter()
        .zip(scores.values())
        .map(|(label, value)| format!("{}: {}/{}", label, value, chart::MAX_SCORE))
        .collect::<Vec<_>>()
        .join("    ");
    layer.use_text(caption, 10.0, Mm(LABEL_X_MM), pt(chart_bottom - 14.0), &regular);

    let file = File::create(output_path)?;
    doc.save(&mut BufWriter::new(file)).map_err(ReportError::pdf)?;

    tracing::info!("Composed report {:?}", output_path);
    Ok(())
}

fn draw_header_band(layer: &PdfLayerReference) {
    let top = Mm(PAGE_HEIGHT_MM);
    let band_bottom = pt(PAGE_HEIGHT_PT - HEADER_HEIGHT_PT);
    let band = Line {
        points: vec![
            (Point::new(Mm(0.0), band_bottom), false),
            (Point::new(Mm(PAGE_WIDTH_MM), band_bottom), false),
            (Point::new(Mm(PAGE_WIDTH_MM), top), false),
            (Point::new(Mm(0.0), top), false),
        ],
        is_closed: true,
        has_fill: true,
        has_stroke: false,
        is_clipping_path: false,
    };
    layer.set_fill_color(rgb(HEADER_COLOR));
    layer.add_shape(band);
}

/// Draws a bold label and the field's lines, returning the next baseline.
fn draw_field(
    layer: &PdfLayerReference,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
    label: &str,
    text: &str,
    mut y: f64,
) -> f64 {
    layer.use_text(format!("{}:", label), 12.0, Mm(LABEL_X_MM), pt(y), bold);
    y -= LINE_STEP_PT;
    for line in text_lines(text) {
        layer.use_text(line, 11.0, Mm(TEXT_X_MM), pt(y), regular);
        y -= LINE_STEP_PT;
    }
    y - FIELD_GAP_PT
}

fn place_chart(
    layer: &PdfLayerReference,
    chart_path: &Path,
    bottom_pt: f64,
) -> Result<(), ReportError> {
    let decoded = image::open(chart_path)?;
    let rgb_image = image::DynamicImage::ImageRgb8(decoded.to_rgb8());
    let (px_width, px_height) = (rgb_image.width() as f64, rgb_image.height() as f64);

    // Natural size at IMAGE_DPI, stretched to the fixed slot.
    let natural_width_mm = px_width * 25.4 / IMAGE_DPI;
    let natural_height_mm = px_height * 25.4 / IMAGE_DPI;
    let scale_x = CHART_WIDTH_MM / natural_width_mm;
    let scale_y = (CHART_HEIGHT_PT * MM_PER_PT) / natural_height_mm;

    Image::from_dynamic_image(&rgb_image).add_to_layer(
        layer.clone(),
        Some(Mm(LABEL_X_MM)),
        Some(pt(bottom_pt)),
        None,
        Some(scale_x),
        Some(scale_y),
        Some(IMAGE_DPI),
    );
    Ok(())
}

/// Splits field text on line breaks, tolerating `\r\n` from browsers.
pub fn text_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(motivation: &str) -> Submission {
        Submission {
            name: "Ana".to_string(),
            role: "Teacher".to_string(),
            motivation: motivation.to_string(),
            performance: "x".to_string(),
            objectives: "y".to_string(),
        }
    }

    fn leftover_charts(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "png"))
            .count()
    }

    #[test]
    fn test_text_lines() {
        assert_eq!(text_lines("one"), vec!["one"]);
        assert_eq!(text_lines("one\ntwo"), vec!["one", "two"]);
        assert_eq!(text_lines("one\r\ntwo\r\n"), vec!["one", "two", ""]);
        assert_eq!(text_lines(""), vec![""]);
    }

    #[test]
    fn test_generate_report_writes_pdf_and_removes_chart() {
        let dir = tempfile::tempdir().unwrap();
        let filename = generate_report(&submission("abcdefghij"), dir.path()).unwrap();
        assert!(filename.starts_with("Report_Ana_"));

        let bytes = std::fs::read(dir.path().join(&filename)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        // chart raster dominates the file size
        assert!(bytes.len() < 512 * 1024, "report is {} bytes", bytes.len());
        assert_eq!(leftover_charts(dir.path()), 0);
    }

    #[test]
    fn test_long_text_runs_off_page_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let long = vec!["a line of motivation"; 120].join("\n");

        let filename = generate_report(&submission(&long), dir.path()).unwrap();
        assert!(dir.path().join(filename).exists());
        assert_eq!(leftover_charts(dir.path()), 0);
    }

    #[test]
    fn test_failed_composition_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let scores = ChartScores::from_texts("", "", "");
        let output = dir.path().join("Report_broken.pdf");

        let missing_chart = dir.path().join("missing.png");
        let err = compose_report(&submission(""), &scores, &missing_chart, &output);
        assert!(err.is_err());
        assert!(!output.exists());
    }
}
