//! Final text assembly: a fixed-format diagnostic header followed by the
//! glyph grid, one row per line.

use crate::geometry::OutputGeometry;

/// Assemble the output page. `rows` must hold `target_height` strings of
/// `target_width` glyphs each; this function only lays them out.
///
/// The header reports the source dimensions and container, the planned grid
/// against the caller's bounds, and the source coordinates of the first,
/// middle and last sampled column and row, which makes scaling regressions
/// visible in plain diffs. Every line, including the last grid row, ends
/// with a single newline.
pub fn page(
    geometry: &OutputGeometry,
    format_label: &str,
    max_width: u32,
    max_height: u32,
    rows: &[String],
) -> String {
    let width = geometry.target_width;
    let height = geometry.target_height;

    let mut out = String::with_capacity(rows.len() * (width as usize * 3 + 1) + 256);
    out.push_str(&format!(
        "┌─ Image: {}x{} ({format_label}) ─┐\n",
        geometry.source_width, geometry.source_height
    ));
    out.push_str(&format!(
        "├─ Grid: {width}x{height} (max: {max_width}x{max_height}) ─┤\n"
    ));
    out.push_str(&format!(
        "├─ Sampling: X[0,{},{}] Y[0,{},{}] of {}x{} ─┤\n",
        geometry.source_x(width / 2),
        geometry.source_x(width - 1),
        geometry.source_y(height / 2),
        geometry.source_y(height - 1),
        geometry.source_width,
        geometry.source_height
    ));
    out.push_str(&format!("└{}┘\n", "─".repeat(width as usize + 2)));

    for row in rows {
        out.push_str(row);
        out.push('\n');
    }

    out
}
