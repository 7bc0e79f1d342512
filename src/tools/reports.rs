//! Report generation tools
//!
//! Generate the printable PDF report for a milk standardization calculation.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::Datelike;
use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::*;
use serde::Serialize;
use thiserror::Error;

use super::diagram::{render_pearson_diagram, DIAGRAM_HEIGHT, DIAGRAM_WIDTH};
use crate::models::StandardizationRequest;
use crate::standardization::{StandardizationDisplay, ValidationError};

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_TITLE: (u8, u8, u8) = (44, 62, 80);
const COLOR_HIGHLIGHT: (u8, u8, u8) = (46, 125, 50);
const COLOR_ERROR: (u8, u8, u8) = (192, 0, 0);
const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (102, 102, 102);
const COLOR_LIGHT_GRAY: (u8, u8, u8) = (221, 221, 221);

const PAGE_WIDTH: f32 = 215.9; // Letter
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN_LEFT: f32 = 20.0;
const MARGIN_RIGHT: f32 = PAGE_WIDTH - 20.0;
const VALUE_COLUMN: f32 = 120.0;
const DIAGRAM_DPI: f32 = 180.0;
const DIAGRAM_GAP: f32 = 4.0;

// Footer text starts at FOOTER_TOP; its rule sits above it
const FOOTER_TOP: f32 = 30.0;
const FOOTER_RULE_Y: f32 = FOOTER_TOP + 6.0;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Report file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(String),
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateReportResponse {
    pub success: bool,
    pub file_path: String,
    pub prepared_by: String,
    pub company: String,
    pub calculated_at: String,
    /// Date line shown with the results, e.g. "October 16, 2026"
    pub calculated_on: String,
    pub results: StandardizationDisplay,
    pub diagram_embedded: bool,
    pub message: String,
}

/// One label/value line of a report table
struct TableRow {
    label: &'static str,
    value: String,
    highlight: bool,
}

fn input_rows(request: &StandardizationRequest) -> Vec<TableRow> {
    let input = &request.input;
    // Inputs are echoed as entered, not rounded
    vec![
        TableRow { label: "Raw Milk Fat %", value: format!("{}%", input.raw_fat_pct), highlight: false },
        TableRow { label: "Skim Milk Fat %", value: format!("{}%", input.skim_fat_pct), highlight: false },
        TableRow { label: "Target Fat %", value: format!("{}%", input.target_fat_pct), highlight: false },
        TableRow { label: "Raw Milk Volume", value: format!("{} Liters", input.raw_volume_l), highlight: false },
    ]
}

fn result_rows(request: &StandardizationRequest) -> Vec<TableRow> {
    let d = &request.display;
    vec![
        TableRow { label: "Skim Milk Required", value: d.skim_volume.clone(), highlight: true },
        TableRow { label: "Total Standardized Milk", value: d.total_volume.clone(), highlight: true },
        TableRow { label: "Mixing Ratio (Raw:Skim)", value: d.mixing_ratio.clone(), highlight: false },
    ]
}

fn footer_lines(request: &StandardizationRequest) -> [String; 3] {
    [
        "Food Control Professional Calculators".to_string(),
        "This report was generated using the Pearson Square method for milk standardization".to_string(),
        format!("(c) {} Food Control. All rights reserved.", request.calculated_at.year()),
    ]
}

// ============================================================================
// PDF Helpers
// ============================================================================

fn rgb_to_printpdf(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn add_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    x: Mm,
    y: Mm,
    size: f32,
    color: (u8, u8, u8),
) {
    layer.set_fill_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.use_text(text, size, x, y, font);
}

fn add_line(
    layer: &PdfLayerReference,
    x1: Mm,
    y1: Mm,
    x2: Mm,
    y2: Mm,
    color: (u8, u8, u8),
    width: f32,
) {
    layer.set_outline_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.set_outline_thickness(width);

    let line = Line {
        points: vec![
            (Point::new(x1, y1), false),
            (Point::new(x2, y2), false),
        ],
        is_closed: false,
    };
    layer.add_line(line);
}

/// Draw a two-column table starting at `y`; returns the y below it
fn add_table(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    font_bold: &IndirectFontRef,
    headers: (&str, &str),
    rows: &[TableRow],
    mut y: f32,
) -> f32 {
    add_text(layer, font_bold, headers.0, Mm(MARGIN_LEFT + 2.0), Mm(y), 11.0, COLOR_TITLE);
    add_text(layer, font_bold, headers.1, Mm(VALUE_COLUMN), Mm(y), 11.0, COLOR_TITLE);
    y -= 2.5;
    add_line(layer, Mm(MARGIN_LEFT), Mm(y), Mm(MARGIN_RIGHT), Mm(y), COLOR_TITLE, 1.5);
    y -= 6.0;

    for row in rows {
        let (row_font, size, color) = if row.highlight {
            (font_bold, 12.0, COLOR_HIGHLIGHT)
        } else {
            (font, 10.5, COLOR_BLACK)
        };
        add_text(layer, row_font, row.label, Mm(MARGIN_LEFT + 2.0), Mm(y), size, color);
        add_text(layer, row_font, &row.value, Mm(VALUE_COLUMN), Mm(y), size, color);
        y -= 2.5;
        add_line(layer, Mm(MARGIN_LEFT), Mm(y), Mm(MARGIN_RIGHT), Mm(y), COLOR_LIGHT_GRAY, 0.5);
        y -= 6.0;
    }

    y
}

/// Where the diagram image goes on the page, in mm
#[derive(Debug, Clone, Copy, PartialEq)]
struct DiagramPlacement {
    left: f32,
    bottom: f32,
    width_mm: f32,
    height_mm: f32,
    dpi: f32,
}

/// Place the diagram with its top edge at `top`, shrinking it when the
/// natural size would run into the footer rule
fn diagram_placement(top: f32) -> DiagramPlacement {
    let available = (top - FOOTER_RULE_Y - DIAGRAM_GAP).max(1.0);
    let natural = DIAGRAM_HEIGHT as f32 / DIAGRAM_DPI * 25.4;

    // pixels / dpi * 25.4 = size in mm
    let dpi = if natural > available {
        DIAGRAM_HEIGHT as f32 * 25.4 / available
    } else {
        DIAGRAM_DPI
    };
    let width_mm = DIAGRAM_WIDTH as f32 / dpi * 25.4;
    let height_mm = DIAGRAM_HEIGHT as f32 / dpi * 25.4;

    DiagramPlacement {
        left: (PAGE_WIDTH - width_mm) / 2.0,
        bottom: top - height_mm,
        width_mm,
        height_mm,
        dpi,
    }
}

/// Render the Pearson Square diagram onto the layer with its top edge at `top`.
/// Returns whether it was embedded; on failure an inline notice is drawn instead.
fn add_diagram(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    request: &StandardizationRequest,
    top: f32,
) -> bool {
    let rendered = render_pearson_diagram(request, DIAGRAM_WIDTH, DIAGRAM_HEIGHT).and_then(|d| {
        RgbImage::from_raw(d.width, d.height, d.pixels)
            .ok_or_else(|| "Failed to create image from buffer".to_string())
    });

    match rendered {
        Ok(img) => {
            let pdf_image = Image::from_dynamic_image(&DynamicImage::ImageRgb8(img));
            let place = diagram_placement(top);

            let transform = ImageTransform {
                translate_x: Some(Mm(place.left)),
                translate_y: Some(Mm(place.bottom)),
                dpi: Some(place.dpi),
                ..Default::default()
            };

            pdf_image.add_to_layer(layer.clone(), transform);
            true
        }
        Err(e) => {
            tracing::warn!("Pearson Square diagram not rendered: {}", e);
            add_text(
                layer,
                font,
                &format!("Diagram generation error: {}", e),
                Mm(MARGIN_LEFT),
                Mm(top - 6.0),
                9.0,
                COLOR_ERROR,
            );
            false
        }
    }
}

/// Draw everything above the footer; returns the diagram's top edge
fn add_body(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    font_bold: &IndirectFontRef,
    request: &StandardizationRequest,
) -> f32 {
    let mut y = PAGE_HEIGHT - 22.0;

    // Header
    add_text(layer, font_bold, "MILK STANDARDIZATION REPORT", Mm(48.0), Mm(y), 20.0, COLOR_TITLE);
    y -= 8.0;
    add_text(layer, font, "Pearson Square Method Calculation", Mm(74.0), Mm(y), 11.0, COLOR_GRAY);
    y -= 6.0;
    add_line(layer, Mm(MARGIN_LEFT), Mm(y), Mm(MARGIN_RIGHT), Mm(y), COLOR_TITLE, 2.5);
    y -= 9.0;

    // Preparer info
    let info = [
        ("Prepared By:", request.preparer.user_name.clone()),
        ("Company:", request.preparer.company_name.clone()),
        ("Date & Time:", request.calculated_date_time()),
    ];
    for (label, value) in info.iter() {
        add_text(layer, font_bold, label, Mm(MARGIN_LEFT), Mm(y), 10.5, COLOR_BLACK);
        add_text(layer, font, value, Mm(52.0), Mm(y), 10.5, COLOR_BLACK);
        y -= 6.0;
    }
    y -= 6.0;

    // Input parameters
    add_text(layer, font_bold, "Input Parameters", Mm(MARGIN_LEFT), Mm(y), 14.0, COLOR_BLACK);
    y -= 8.0;
    y = add_table(layer, font, font_bold, ("Parameter", "Value"), &input_rows(request), y);
    y -= 5.0;

    // Results
    add_text(layer, font_bold, "Calculation Results", Mm(MARGIN_LEFT), Mm(y), 14.0, COLOR_BLACK);
    y -= 8.0;
    y = add_table(layer, font, font_bold, ("Result", "Value"), &result_rows(request), y);
    y -= 5.0;

    add_text(layer, font_bold, "Pearson Square", Mm(MARGIN_LEFT), Mm(y), 14.0, COLOR_BLACK);
    y - 4.0
}

// ============================================================================
// Standardization Report Generation
// ============================================================================

/// Generate the milk standardization PDF report
pub fn generate_standardization_report(
    request: &StandardizationRequest,
    output_path: &Path,
) -> Result<GenerateReportResponse, ReportError> {
    let (doc, page1, layer1) = PdfDocument::new(
        "Milk Standardization Report",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    let layer = doc.get_page(page1).get_layer(layer1);

    let diagram_top = add_body(&layer, &font, &font_bold, request);
    let diagram_embedded = add_diagram(&layer, &font, request, diagram_top);

    // Footer, anchored to the page bottom
    let mut fy = FOOTER_TOP;
    add_line(&layer, Mm(MARGIN_LEFT), Mm(FOOTER_RULE_Y), Mm(MARGIN_RIGHT), Mm(FOOTER_RULE_Y), COLOR_LIGHT_GRAY, 0.5);
    for (i, line) in footer_lines(request).iter().enumerate() {
        let f = if i == 0 { &font_bold } else { &font };
        add_text(&layer, f, line, Mm(MARGIN_LEFT), Mm(fy), 9.0, COLOR_GRAY);
        fy -= 5.0;
    }

    // Save PDF
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    let file_path = output_path.display().to_string();
    tracing::info!(
        "Standardization report written to {} for {} ({})",
        file_path,
        request.preparer.user_name,
        request.preparer.company_name
    );

    Ok(GenerateReportResponse {
        success: true,
        file_path: file_path.clone(),
        prepared_by: request.preparer.user_name.clone(),
        company: request.preparer.company_name.clone(),
        calculated_at: request.calculated_date_time(),
        calculated_on: request.calculated_date(),
        results: request.display.clone(),
        diagram_embedded,
        message: format!(
            "Report generated: add {} of skim milk for {} of standardized milk",
            request.display.skim_volume, request.display.total_volume
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Preparer;
    use crate::standardization::StandardizationInput;

    fn request() -> StandardizationRequest {
        let preparer = Preparer::new("Ana Ruiz", "Valle Dairy").unwrap();
        StandardizationRequest::new(preparer, StandardizationInput::default()).unwrap()
    }

    #[test]
    fn test_input_rows_echo_entered_values() {
        let rows = input_rows(&request());
        let values: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["4%", "0.2%", "3%", "1000 Liters"]);
    }

    #[test]
    fn test_result_rows_highlight_volumes() {
        let rows = result_rows(&request());
        assert_eq!(rows.len(), 3);
        assert!(rows[0].highlight && rows[1].highlight && !rows[2].highlight);
        assert_eq!(rows[0].value, "357.14 L");
        assert_eq!(rows[2].value, "2.8:1.0");
    }

    #[test]
    fn test_footer_has_year() {
        let req = request();
        let footer = footer_lines(&req);
        assert!(footer[2].contains(&req.calculated_at.year().to_string()));
    }

    #[test]
    fn test_diagram_clears_footer() {
        let (doc, page, layer) = PdfDocument::new("layout", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica).unwrap();
        let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).unwrap();
        let layer = doc.get_page(page).get_layer(layer);

        let top = add_body(&layer, &font, &font_bold, &request());
        let place = diagram_placement(top);
        assert!(place.bottom >= FOOTER_RULE_Y + DIAGRAM_GAP);
        assert!(place.left >= MARGIN_LEFT && place.left + place.width_mm <= MARGIN_RIGHT);
        assert_eq!(place.dpi, DIAGRAM_DPI);
    }

    #[test]
    fn test_diagram_shrinks_when_space_is_short() {
        let top = FOOTER_RULE_Y + DIAGRAM_GAP + 40.0;
        let place = diagram_placement(top);
        assert!(place.dpi > DIAGRAM_DPI);
        assert!((place.height_mm - 40.0).abs() < 1e-3);
        assert!(place.bottom >= FOOTER_RULE_Y + DIAGRAM_GAP - 1e-3);
    }

    #[test]
    fn test_generate_report_writes_pdf() {
        let dir = std::env::temp_dir().join(format!("milkstd-report-test-{}", std::process::id()));
        let path = dir.join("nested").join("report.pdf");

        let response = generate_standardization_report(&request(), &path).unwrap();
        assert!(response.success);
        assert_eq!(response.results.total_volume, "1357.14 L");
        assert_eq!(response.calculated_on, request().calculated_date());

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
