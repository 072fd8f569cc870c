//! Top-level conversion entry point: opaque bytes in, finished text page out.
//!
//! Every failure mode stays local. Bytes that never looked like an image
//! come back as an empty page, and decode failures come back as a short
//! diagnostic line, so callers always have something safe to show in a
//! viewport.

use crate::geometry;
use crate::render;
use crate::sampler;
use crate::sniff;
use crate::source;
use crate::tone::ToneRamp;

/// Outcome of one conversion attempt.
///
/// `was_image` is false both for bytes the sniffer rejected (empty text)
/// and for recognized bytes that failed to decode (diagnostic text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub text: String,
    pub was_image: bool,
}

impl Conversion {
    fn rejected() -> Self {
        Self {
            text: String::new(),
            was_image: false,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            text: message,
            was_image: false,
        }
    }
}

/// Convert raw file bytes to a text page with the default glyph ramp.
pub fn convert(data: &[u8], filename: &str, max_width: u32, max_height: u32) -> Conversion {
    convert_with_ramp(data, filename, max_width, max_height, ToneRamp::default())
}

/// Convert raw file bytes to a text page.
///
/// The requested bounds pass through [`geometry::grid_limits`] first, so
/// degenerate and excessive viewports both render at a sane size. The call
/// is a pure function of its arguments; identical inputs produce identical
/// pages.
pub fn convert_with_ramp(
    data: &[u8],
    filename: &str,
    max_width: u32,
    max_height: u32,
    ramp: ToneRamp,
) -> Conversion {
    if !sniff::classify(data, filename) {
        return Conversion::rejected();
    }

    let source = match source::decode(data) {
        Ok(source) => source,
        Err(error) => return Conversion::failed(format!("Error converting image: {error}")),
    };

    let (max_width, max_height) = geometry::grid_limits(max_width, max_height);
    let geometry = geometry::plan(source.width(), source.height(), max_width, max_height);

    let mut rows = Vec::with_capacity(geometry.target_height as usize);
    for cell_y in 0..geometry.target_height {
        let mut row = String::with_capacity(geometry.target_width as usize);
        for cell_x in 0..geometry.target_width {
            let intensity = sampler::intensity_at(&source, &geometry, cell_x, cell_y);
            row.push(ramp.glyph_for(intensity));
        }
        rows.push(row);
    }

    Conversion {
        text: render::page(&geometry, source.format_label(), max_width, max_height, &rows),
        was_image: true,
    }
}
