use std::fmt;

use image::{ImageBuffer, Rgba};

use crate::sniff::{self, ImageKind};

/// Immutable view over decoded image data: a rectangular grid of RGBA samples
/// with 16-bit channel semantics (0..=65535 per channel).
///
/// This type is the only place the external decoder is visible; everything
/// downstream operates on the pixel grid alone.
#[derive(Debug)]
pub struct PixelSource {
    pixels: ImageBuffer<Rgba<u16>, Vec<u16>>,
    kind: Option<ImageKind>,
}

impl PixelSource {
    /// Wrap an already-decoded 16-bit RGBA buffer. Zero-dimension buffers are
    /// rejected, exactly as [`decode`] rejects them, so a `PixelSource` always
    /// has at least one pixel. The format label falls back to a generic
    /// "image" when no container is named.
    pub fn from_rgba16(pixels: ImageBuffer<Rgba<u16>, Vec<u16>>) -> Result<Self, DecodeError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(DecodeError::new("pixel buffer has zero dimensions"));
        }
        Ok(Self { pixels, kind: None })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Read one sample. Coordinates must be in range; the sampler clamps
    /// before calling.
    pub fn sample(&self, x: u32, y: u32) -> [u16; 4] {
        self.pixels.get_pixel(x, y).0
    }

    pub fn format_label(&self) -> &'static str {
        self.kind.map(ImageKind::label).unwrap_or("image")
    }
}

/// Failure at the decode boundary: bytes that are not a valid instance of any
/// supported container, a truncated stream, or a zero-dimension decode.
#[derive(Debug, Clone)]
pub struct DecodeError {
    pub message: String,
}

impl DecodeError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DecodeError {}

/// Decode an opaque byte buffer into a [`PixelSource`].
///
/// Dispatch over container formats happens inside the `image` crate; this
/// boundary never needs to know which codec ran. The sniffed signature only
/// labels diagnostics and the rendered header.
pub fn decode(data: &[u8]) -> Result<PixelSource, DecodeError> {
    let kind = sniff::sniff_signature(data);
    let decoded = image::load_from_memory(data).map_err(|error| {
        DecodeError::new(match kind {
            Some(kind) => format!("failed to decode {} data: {error}", kind.label()),
            None => format!("failed to decode image: {error}"),
        })
    })?;

    let pixels = decoded.to_rgba16();
    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(DecodeError::new("decoded image has zero dimensions"));
    }

    Ok(PixelSource { pixels, kind })
}
