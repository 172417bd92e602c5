//! SVG rendering of individual layers.
//!
//! Each layer becomes one square image scaled to the floorplan. Blocks are
//! drawn as translucent rectangles labelled with their id, with the y axis
//! pointing up so the picture matches the layout coordinates.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use stackplan_core::{Block, Layout};

/// Fill colours, picked by block id.
const PALETTE: [&str; 8] = [
    "red", "green", "blue", "yellow", "cyan", "magenta", "orange", "purple",
];

/// Rendered image edge length in pixels.
const CANVAS_PIXELS: u32 = 600;

/// Fill colour of `block`.
fn block_color(block: &Block) -> &'static str {
    PALETTE[block.id().as_raw() as usize % PALETTE.len()]
}

/// Renders one layer as a standalone SVG document.
pub fn layer_svg(layout: &Layout, layer: u32, title: &str) -> Result<String, std::fmt::Error> {
    let size = layout.bound_size();
    let mut svg = String::new();

    writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        svg,
        r#"<svg width="{CANVAS_PIXELS}" height="{CANVAS_PIXELS}" viewBox="0 0 {size} {size}" xmlns="http://www.w3.org/2000/svg">"#
    )?;
    writeln!(svg, "<title>Layer {layer} {title}</title>")?;
    writeln!(
        svg,
        r#"<rect width="{size}" height="{size}" fill="white" stroke="gray" stroke-width="0.5"/>"#
    )?;

    writeln!(svg, r#"<g id="blocks">"#)?;
    for block in layout.layer_blocks(layer) {
        // SVG y grows downwards.
        let top = u64::from(size).saturating_sub(block.top());
        writeln!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" fill-opacity="0.5" stroke="black" stroke-width="0.3"><title>Block {}: ({}, {})</title></rect>"#,
            block.x(),
            top,
            block.width(),
            block.height(),
            block_color(block),
            block.id(),
            block.x(),
            block.y()
        )?;
        writeln!(
            svg,
            r#"<text x="{}" y="{}" font-size="3" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
            f64::from(block.x()) + f64::from(block.width()) / 2.0,
            top as f64 + f64::from(block.height()) / 2.0,
            block.id()
        )?;
    }
    writeln!(svg, "</g>")?;
    writeln!(svg, "</svg>")?;
    Ok(svg)
}

/// Writes `{prefix}_layer_{n}.svg` into `dir` for every layer of `layout`.
///
/// Returns the written paths in layer order.
pub fn render_layout(
    layout: &Layout,
    dir: &Path,
    prefix: &str,
    title: &str,
) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(layout.layer_count() as usize);
    for layer in 0..layout.layer_count() {
        let svg = layer_svg(layout, layer, title).map_err(io::Error::other)?;
        let path = dir.join(format!("{prefix}_layer_{layer}.svg"));
        fs::write(&path, svg)?;
        paths.push(path);
    }
    Ok(paths)
}
