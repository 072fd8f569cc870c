use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use halftone::tone::ToneRamp;
use halftone::{convert_with_ramp, geometry, sniff, source};

// Space reserved for viewport chrome when sizing from the live terminal:
// borders and scrollbar on the sides, headers and prompt above and below.
const VIEWPORT_MARGIN_COLS: u16 = 6;
const VIEWPORT_MARGIN_ROWS: u16 = 8;
const FALLBACK_COLS: u16 = 80;
const FALLBACK_ROWS: u16 = 24;

#[derive(Debug, Parser)]
#[command(name = "halftone")]
#[command(about = "Render images as monospace glyph grids")]
#[command(version = build_version())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render an image file as a text page.
    Render {
        /// Image file (jpeg, png, gif, bmp or webp).
        file: PathBuf,
        /// Grid bounds as COLSxROWS. Defaults to the terminal size minus
        /// viewport margins.
        #[arg(long)]
        size: Option<String>,
        /// Maximum grid columns. Overrides the columns from --size.
        #[arg(long)]
        width: Option<u32>,
        /// Maximum grid rows. Overrides the rows from --size.
        #[arg(long)]
        height: Option<u32>,
        /// Glyph ramp: classic, minimal or blocks.
        #[arg(long, default_value = "classic")]
        ramp: String,
        /// Write the page to a file instead of stdout.
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
    },
    /// Inspect how a file would classify and decode, without rendering.
    Probe {
        file: PathBuf,
        /// Emit the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the built-in glyph ramps.
    Ramps,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            file,
            size,
            width,
            height,
            ramp,
            out,
        } => run_render(&file, size.as_deref(), width, height, &ramp, out.as_deref()),
        Commands::Probe { file, json } => run_probe(&file, json),
        Commands::Ramps => {
            print!("{}", render_ramp_registry());
            Ok(())
        }
    }
}

fn run_render(
    file: &Path,
    size: Option<&str>,
    width: Option<u32>,
    height: Option<u32>,
    ramp: &str,
    out: Option<&Path>,
) -> Result<()> {
    let data = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let ramp = ToneRamp::from_keyword(ramp)?;

    let (mut max_width, mut max_height) = match size {
        Some(raw) => parse_grid_size(raw)?,
        None => viewport_bounds(),
    };
    if let Some(width) = width {
        max_width = width;
    }
    if let Some(height) = height {
        max_height = height;
    }

    let filename = file.file_name().and_then(|name| name.to_str()).unwrap_or("");
    let conversion = convert_with_ramp(&data, filename, max_width, max_height, ramp);
    if !conversion.was_image {
        if conversion.text.is_empty() {
            bail!(
                "{} does not look like a supported image (jpeg, png, gif, bmp, webp)",
                file.display()
            );
        }
        bail!("{}", conversion.text);
    }

    match out {
        Some(path) => {
            fs::write(path, conversion.text.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("[halftone] Wrote {}", path.display());
        }
        None => print!("{}", conversion.text),
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct ProbeReport {
    file: String,
    bytes: u64,
    extension_match: bool,
    signature: Option<&'static str>,
    is_image: bool,
    width: Option<u32>,
    height: Option<u32>,
    format: Option<&'static str>,
    grid_cols: Option<u32>,
    grid_rows: Option<u32>,
    error: Option<String>,
}

fn run_probe(file: &Path, json: bool) -> Result<()> {
    let data = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let filename = file.file_name().and_then(|name| name.to_str()).unwrap_or("");

    let extension_match = sniff::has_image_extension(filename);
    let signature = sniff::sniff_signature(&data).map(|kind| kind.label());
    let is_image = extension_match || signature.is_some();

    let mut report = ProbeReport {
        file: file.display().to_string(),
        bytes: data.len() as u64,
        extension_match,
        signature,
        is_image,
        width: None,
        height: None,
        format: None,
        grid_cols: None,
        grid_rows: None,
        error: None,
    };

    if is_image {
        match source::decode(&data) {
            Ok(decoded) => {
                let (viewport_cols, viewport_rows) = viewport_bounds();
                let (max_width, max_height) = geometry::grid_limits(viewport_cols, viewport_rows);
                let plan = geometry::plan(decoded.width(), decoded.height(), max_width, max_height);
                report.width = Some(decoded.width());
                report.height = Some(decoded.height());
                report.format = Some(decoded.format_label());
                report.grid_cols = Some(plan.target_width);
                report.grid_rows = Some(plan.target_height);
            }
            Err(error) => report.error = Some(error.message),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("File: {} ({} bytes)", report.file, report.bytes);
    println!("Extension match: {}", report.extension_match);
    println!("Signature: {}", report.signature.unwrap_or("none"));
    if !report.is_image {
        println!("Classification: not an image");
        return Ok(());
    }
    match (&report.error, report.width, report.height) {
        (Some(error), _, _) => println!("Decode failed: {error}"),
        (None, Some(width), Some(height)) => {
            println!(
                "Decoded: {}x{} ({})",
                width,
                height,
                report.format.unwrap_or("image")
            );
            if let (Some(cols), Some(rows)) = (report.grid_cols, report.grid_rows) {
                println!("Planned grid: {cols}x{rows} for the current viewport");
            }
        }
        _ => {}
    }

    Ok(())
}

fn render_ramp_registry() -> String {
    let mut output = String::new();
    output.push_str("halftone glyph ramps\n");
    output.push_str("Each ramp runs densest to lightest; the final glyph is blank.\n");

    for ramp in ToneRamp::ALL {
        output.push('\n');
        output.push_str(&format!(
            "{} ({} glyphs)\n",
            ramp.keyword(),
            ramp.glyphs().len()
        ));
        output.push_str(&format!("  {}\n", ramp.description()));
        let preview: String = ramp.glyphs().iter().collect();
        output.push_str(&format!("  ramp: \"{preview}\"\n"));
    }

    output
}

/// Grid bounds from the live terminal, minus chrome margins. Falls back to
/// a classic 80x24 terminal when no size is available (piped output, CI).
fn viewport_bounds() -> (u32, u32) {
    let (cols, rows) = crossterm::terminal::size().unwrap_or((FALLBACK_COLS, FALLBACK_ROWS));
    (
        u32::from(cols.saturating_sub(VIEWPORT_MARGIN_COLS)),
        u32::from(rows.saturating_sub(VIEWPORT_MARGIN_ROWS)),
    )
}

fn parse_grid_size(raw: &str) -> Result<(u32, u32)> {
    let value = raw.trim();
    let (cols_raw, rows_raw) = value
        .split_once('x')
        .or_else(|| value.split_once('X'))
        .ok_or_else(|| anyhow!("invalid --size '{raw}': expected COLSxROWS"))?;
    let cols = cols_raw
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid --size '{raw}': cols must be an integer"))?;
    let rows = rows_raw
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid --size '{raw}': rows must be an integer"))?;
    if cols == 0 || rows == 0 {
        bail!("invalid --size '{raw}': cols/rows must be > 0");
    }
    Ok((cols, rows))
}

fn build_version() -> String {
    match option_env!("HALFTONE_GIT_HASH") {
        Some(hash) => format!("{} ({hash})", env!("CARGO_PKG_VERSION")),
        None => env!("CARGO_PKG_VERSION").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_size_supports_cols_x_rows() {
        assert_eq!(
            parse_grid_size("120x45").expect("size should parse"),
            (120, 45)
        );
        assert_eq!(
            parse_grid_size(" 64X32 ").expect("size should parse"),
            (64, 32)
        );
    }

    #[test]
    fn parse_size_rejects_malformed_input() {
        assert!(parse_grid_size("40").is_err());
        assert!(parse_grid_size("axb").is_err());
        assert!(parse_grid_size("0x10").is_err());
        assert!(parse_grid_size("10x0").is_err());
    }

    #[test]
    fn ramp_registry_lists_every_preset() {
        let registry = render_ramp_registry();
        for ramp in ToneRamp::ALL {
            assert!(registry.contains(ramp.keyword()));
        }
    }

    #[test]
    fn build_version_names_the_package_version() {
        assert!(build_version().contains(env!("CARGO_PKG_VERSION")));
    }
}
