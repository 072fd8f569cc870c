//! Tone mapping: a logistic contrast curve plus quantization onto an
//! ordered glyph ramp.

use anyhow::{anyhow, Result};

/// Steepness of the logistic contrast curve. Higher values push mid-tones
/// harder toward the extremes.
const CONTRAST_STEEPNESS: f64 = 6.0;

const CLASSIC_GLYPHS: [char; 15] = [
    '█', '▓', '@', '#', '%', '*', '+', '=', '~', '-', ':', ';', ',', '.', ' ',
];
const MINIMAL_GLYPHS: [char; 10] = ['@', '%', '#', '*', '+', '=', '-', ':', '.', ' '];
const BLOCK_GLYPHS: [char; 5] = ['█', '▓', '▒', '░', ' '];

// ---------------------------------------------------------------------------
// Ramp presets
// ---------------------------------------------------------------------------

/// A glyph ramp ordered densest (index 0) to sparsest; the final entry is
/// always blank so pure white renders as empty space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneRamp {
    #[default]
    Classic,
    Minimal,
    Blocks,
}

impl ToneRamp {
    pub const ALL: [Self; 3] = [Self::Classic, Self::Minimal, Self::Blocks];

    pub fn from_keyword(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "minimal" => Ok(Self::Minimal),
            "blocks" => Ok(Self::Blocks),
            _ => Err(anyhow!(
                "unknown tone ramp '{value}' (expected one of: classic, minimal, blocks)"
            )),
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Minimal => "minimal",
            Self::Blocks => "blocks",
        }
    }

    pub fn glyphs(self) -> &'static [char] {
        match self {
            Self::Classic => &CLASSIC_GLYPHS,
            Self::Minimal => &MINIMAL_GLYPHS,
            Self::Blocks => &BLOCK_GLYPHS,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Classic => "15 glyphs mixing block, symbol and punctuation density",
            Self::Minimal => "10 ASCII-only glyphs, safe for any terminal font",
            Self::Blocks => "5 shade blocks for a coarse halftone look",
        }
    }

    /// Glyph for one cell intensity in `[0.0, 1.0]`, 0.0 darkest.
    pub fn glyph_for(self, intensity: f64) -> char {
        let glyphs = self.glyphs();
        glyphs[glyph_index(intensity, glyphs.len())]
    }
}

// ---------------------------------------------------------------------------
// Pure mapping functions
// ---------------------------------------------------------------------------

/// Push mid-tones toward the extremes with a logistic curve.
///
/// The raw logistic never reaches 0 or 1, so the curve is rescaled to pin
/// `enhance_contrast(0.0) == 0.0` and `enhance_contrast(1.0) == 1.0`: pure
/// black and pure white always land on the ends of the ramp.
pub fn enhance_contrast(intensity: f64) -> f64 {
    let low = logistic(0.0);
    let high = logistic(1.0);
    (logistic(intensity.clamp(0.0, 1.0)) - low) / (high - low)
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-CONTRAST_STEEPNESS * (x - 0.5)).exp())
}

/// Map a cell intensity `[0, 1]` to a glyph index `[0, ramp_len - 1]`.
///
/// Dark cells (low intensity) map to low indices (dense glyphs); light
/// cells map to high indices (sparse glyphs).
///
/// Formula: `clamp(floor(enhance_contrast(intensity) * (ramp_len - 1)), 0, ramp_len - 1)`
pub fn glyph_index(intensity: f64, ramp_len: usize) -> usize {
    let n = (ramp_len - 1) as f64;
    let index = (enhance_contrast(intensity) * n).floor() as usize;
    index.min(ramp_len - 1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
