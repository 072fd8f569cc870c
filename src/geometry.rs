/// Width/height ratio of a terminal character cell: glyphs render roughly
/// twice as tall as they are wide, so a faithful grid needs the correction.
pub const CHAR_ASPECT: f64 = 0.5;

const MIN_GRID_WIDTH: u32 = 20;
const MIN_GRID_HEIGHT: u32 = 10;
const EXCESSIVE_GRID_WIDTH: u32 = 200;
const EXCESSIVE_GRID_HEIGHT: u32 = 100;
const CAPPED_GRID_WIDTH: u32 = 180;
const CAPPED_GRID_HEIGHT: u32 = 80;

/// Output grid plan for one render call. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputGeometry {
    pub source_width: u32,
    pub source_height: u32,
    pub target_width: u32,
    pub target_height: u32,
}

impl OutputGeometry {
    /// Source column the given output column maps back to. Always in range
    /// for `cell_x < target_width`.
    pub fn source_x(&self, cell_x: u32) -> u32 {
        (u64::from(cell_x) * u64::from(self.source_width) / u64::from(self.target_width)) as u32
    }

    /// Source row the given output row maps back to. Always in range for
    /// `cell_y < target_height`.
    pub fn source_y(&self, cell_y: u32) -> u32 {
        (u64::from(cell_y) * u64::from(self.source_height) / u64::from(self.target_height)) as u32
    }
}

/// Plan the output grid for a source image inside the caller's bounds.
///
/// The source aspect ratio is divided by [`CHAR_ASPECT`] before fitting, so
/// the rendered glyphs approximate the true visual proportions of the image
/// despite non-square cells. The constrained axis takes the full bound; the
/// other axis follows by rounding. Both dimensions clamp to a minimum of 1,
/// and degenerate inputs clamp rather than divide by zero.
pub fn plan(
    source_width: u32,
    source_height: u32,
    max_width: u32,
    max_height: u32,
) -> OutputGeometry {
    let source_width = source_width.max(1);
    let source_height = source_height.max(1);
    let max_width = max_width.max(1);
    let max_height = max_height.max(1);

    let image_ratio = f64::from(source_width) / f64::from(source_height);
    let adjusted_ratio = image_ratio / CHAR_ASPECT;
    let bounds_ratio = f64::from(max_width) / f64::from(max_height);

    let (target_width, target_height) = if adjusted_ratio > bounds_ratio {
        // Width-constrained.
        let height = (f64::from(max_width) / adjusted_ratio).round() as u32;
        (max_width, height)
    } else {
        // Height-constrained.
        let width = (f64::from(max_height) * adjusted_ratio).round() as u32;
        (width, max_height)
    };

    OutputGeometry {
        source_width,
        source_height,
        target_width: target_width.max(1),
        target_height: target_height.max(1),
    }
}

/// Bound a requested grid to sane floors and ceilings before planning.
///
/// Floors keep tiny viewports legible; ceilings only engage for exceptionally
/// large viewports (beyond 200 columns or 100 rows) so per-call cost stays
/// bounded without penalizing ordinary terminals.
pub fn grid_limits(max_width: u32, max_height: u32) -> (u32, u32) {
    let mut width = max_width.max(MIN_GRID_WIDTH);
    let mut height = max_height.max(MIN_GRID_HEIGHT);
    if max_width > EXCESSIVE_GRID_WIDTH {
        width = CAPPED_GRID_WIDTH;
    }
    if max_height > EXCESSIVE_GRID_HEIGHT {
        height = CAPPED_GRID_HEIGHT;
    }
    (width, height)
}
