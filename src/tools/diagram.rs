//! Pearson Square diagram
//!
//! Draws the classic square: raw and skim milk on the left corners, the
//! target in the middle, and the parts of each on the right corners.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::models::StandardizationRequest;
use crate::standardization::display::format_part;

pub const DIAGRAM_WIDTH: u32 = 900;
pub const DIAGRAM_HEIGHT: u32 = 450;

const NODE_HALF_WIDTH: i32 = 125;
const NODE_HALF_HEIGHT: i32 = 55;

const COLOR_RAW: RGBColor = RGBColor(44, 62, 80);
const COLOR_SKIM: RGBColor = RGBColor(52, 152, 219);
const COLOR_TARGET: RGBColor = RGBColor(39, 174, 96);
const COLOR_PARTS: RGBColor = RGBColor(127, 140, 141);

/// An RGB8 image buffer, row-major
#[derive(Debug, Clone)]
pub struct DiagramImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

struct Node {
    center: (i32, i32),
    color: RGBColor,
    lines: Vec<String>,
}

fn layout(request: &StandardizationRequest, width: u32, height: u32) -> Vec<Node> {
    let w = width as i32;
    let h = height as i32;
    let left = NODE_HALF_WIDTH + 15;
    let right = w - NODE_HALF_WIDTH - 15;
    let top = NODE_HALF_HEIGHT + 15;
    let bottom = h - NODE_HALF_HEIGHT - 15;

    let d = &request.display;
    let ratio = &request.result.mix_ratio;

    vec![
        Node {
            center: (left, top),
            color: COLOR_RAW,
            lines: vec!["Raw Milk".into(), d.raw_fat.clone(), d.raw_volume.clone()],
        },
        Node {
            center: (left, bottom),
            color: COLOR_SKIM,
            lines: vec!["Skim Milk".into(), d.skim_fat.clone(), d.skim_volume.clone()],
        },
        Node {
            center: (w / 2, h / 2),
            color: COLOR_TARGET,
            lines: vec!["Target".into(), d.target_fat.clone(), d.total_volume.clone()],
        },
        Node {
            center: (right, top),
            color: COLOR_PARTS,
            lines: vec!["Raw parts".into(), format_part(ratio.part_raw)],
        },
        Node {
            center: (right, bottom),
            color: COLOR_PARTS,
            lines: vec!["Skim parts".into(), format_part(ratio.part_skim)],
        },
    ]
}

fn draw_node(root: &DrawingArea<BitMapBackend<'_>, Shift>, node: &Node) -> Result<(), String> {
    let (cx, cy) = node.center;
    let corners = [
        (cx - NODE_HALF_WIDTH, cy - NODE_HALF_HEIGHT),
        (cx + NODE_HALF_WIDTH, cy + NODE_HALF_HEIGHT),
    ];

    root.draw(&Rectangle::new(corners, WHITE.filled()))
        .map_err(|e| e.to_string())?;
    root.draw(&Rectangle::new(corners, node.color.stroke_width(3)))
        .map_err(|e| e.to_string())?;

    for (i, line) in node.lines.iter().enumerate() {
        let (size, color): (f64, RGBColor) = if i == 0 { (24.0, node.color) } else { (22.0, BLACK) };
        let style = ("sans-serif", size).into_font().color(&color);
        root.draw(&Text::new(
            line.clone(),
            (cx - NODE_HALF_WIDTH + 14, cy - NODE_HALF_HEIGHT + 10 + i as i32 * 32),
            style,
        ))
        .map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Render the diagram for a computed request into an RGB buffer
pub fn render_pearson_diagram(
    request: &StandardizationRequest,
    width: u32,
    height: u32,
) -> Result<DiagramImage, String> {
    if width < 2 * NODE_HALF_WIDTH as u32 * 3 || height < 2 * NODE_HALF_HEIGHT as u32 * 3 {
        return Err(format!("Diagram size {}x{} is too small", width, height));
    }

    let nodes = layout(request, width, height);
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        // Square outline through the four corners
        let corners: Vec<(i32, i32)> = [0, 3, 4, 1, 0].iter().map(|&i| nodes[i].center).collect();
        root.draw(&PathElement::new(corners, COLOR_PARTS.mix(0.4).stroke_width(2)))
            .map_err(|e| e.to_string())?;

        // Diagonals cross at the target
        root.draw(&PathElement::new(
            vec![nodes[0].center, nodes[4].center],
            COLOR_TARGET.stroke_width(3),
        ))
        .map_err(|e| e.to_string())?;
        root.draw(&PathElement::new(
            vec![nodes[1].center, nodes[3].center],
            COLOR_TARGET.stroke_width(3),
        ))
        .map_err(|e| e.to_string())?;

        for node in &nodes {
            draw_node(&root, node)?;
        }

        root.present().map_err(|e| e.to_string())?;
    }

    Ok(DiagramImage {
        width,
        height,
        pixels: buffer,
    })
}

/// Encode a rendered diagram as PNG bytes
pub fn encode_png(diagram: &DiagramImage) -> Result<Vec<u8>, String> {
    let img = image::RgbImage::from_raw(diagram.width, diagram.height, diagram.pixels.clone())
        .ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), image::ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}

/// Render and write the diagram as a PNG file, creating parent directories
pub fn export_pearson_diagram(request: &StandardizationRequest, output_path: &Path) -> Result<(), String> {
    let diagram = render_pearson_diagram(request, DIAGRAM_WIDTH, DIAGRAM_HEIGHT)?;
    let png = encode_png(&diagram)?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    std::fs::write(output_path, png).map_err(|e| e.to_string())?;

    tracing::info!("Pearson Square diagram written to {}", output_path.display());
    Ok(())
}
