//! Image-to-text rendering engine.
//!
//! Takes raw image bytes of unknown encoding plus a target character grid
//! and produces a monospace-glyph approximation of the image for text-only
//! viewports. Pipeline stages:
//!
//! 1. **Sniff** — classify bytes as image/not-image from extension and magic bytes
//! 2. **Decode** — delegate container decoding to the `image` crate
//! 3. **Plan** — fit an output grid, correcting for tall terminal cells
//! 4. **Sample** — area-averaged luminance plus Sobel edge darkening per cell
//! 5. **Tone** — logistic contrast curve quantized onto a glyph ramp
//! 6. **Render** — diagnostic header plus the glyph grid
//!
//! Every call is a pure function of its inputs. No stage holds state, so
//! conversions can run concurrently from independent threads.

mod convert;
pub mod geometry;
pub mod render;
pub mod sampler;
pub mod sniff;
pub mod source;
pub mod tone;

pub use convert::{convert, convert_with_ramp, Conversion};
