//! fontgen - bitmap font atlas generator
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  CLI + config  →  font lookup (fc/fontdue)│
//! │                          ↓                │
//! │  measure → size grid → place → coverage  │
//! │                          ↓                │
//! │        <name>.ffnt  +  <name>_img.png     │
//! └──────────────────────────────────────────┘
//! ```

mod atlas;
mod build;
mod config;
mod constants;
mod descriptor;
mod font;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::build::{build_atlas, write_outputs, BuildRequest};
use crate::config::Config;
use crate::descriptor::FontDescriptor;
use crate::font::{resolve_font, FontdueSource};

/// Pack a system font into a power-of-two glyph atlas (PNG) plus a .ffnt descriptor
#[derive(Debug, Parser)]
#[command(name = "fontgen", version)]
struct Cli {
    /// Font family name or font file path
    #[arg(short, long)]
    font: Option<String>,

    /// Font size in points
    #[arg(short, long)]
    size: Option<f32>,

    /// Font style passed to fontconfig (e.g. "Bold", "Italic")
    #[arg(long)]
    style: Option<String>,

    /// Padding around each glyph cell in pixels (0-32)
    #[arg(short, long)]
    padding: Option<u32>,

    /// Characters to pack, in order
    #[arg(short, long, conflicts_with = "charset_file")]
    chars: Option<String>,

    /// Read the characters to pack from a UTF-8 file
    #[arg(long)]
    charset_file: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Config file (default: ~/.config/fontgen/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Overwrite an existing config file with --init-config
    #[arg(long, requires = "init_config")]
    force: bool,

    /// Print a summary of an existing .ffnt descriptor and exit
    #[arg(long, value_name = "FILE")]
    inspect: Option<PathBuf>,

    /// Log progress (info level) unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if cli.init_config {
        return init_config(cli.config.as_deref(), cli.force);
    }

    if let Some(path) = &cli.inspect {
        return inspect(path);
    }

    let mut cfg = Config::load(cli.config.as_deref())?;
    apply_overrides(&mut cfg, &cli)?;
    cfg.validate()?;

    let chars: Vec<char> = cfg.charset.chars.chars().collect();
    if chars.is_empty() {
        bail!("Character set is empty: nothing to pack");
    }

    let resolved = resolve_font(&cfg.font.family, cfg.font.style())?;
    let source = FontdueSource::from_bytes(&resolved.data, cfg.font.pixel_size(), &chars)
        .with_context(|| format!("Failed to load {}", resolved.path.display()))?;
    debug!("Font file: {}", resolved.path.display());

    let request = BuildRequest {
        family: resolved.family,
        point_size: cfg.font.size,
        chars,
        padding: cfg.atlas.padding,
        scratch_size: cfg.atlas.scratch_size,
        resource_prefix: cfg.output.resource_prefix.clone(),
        image_postfix: cfg.output.image_postfix.clone(),
    };

    let output = build_atlas(&request, &source)?;
    let (descriptor_path, image_path) = write_outputs(&output, Path::new(&cfg.output.dir))?;

    println!(
        "Font generated successfully: {} glyphs, {}x{} atlas ({}x{} cells of {}x{})",
        output.descriptor.glyphs.len(),
        output.grid.atlas_width,
        output.grid.atlas_height,
        output.grid.columns,
        output.grid.rows,
        output.grid.cell_width,
        output.grid.cell_height
    );
    println!("  {}", descriptor_path.display());
    println!("  {}", image_path.display());
    Ok(())
}

/// Command line flags win over config file values
fn apply_overrides(cfg: &mut Config, cli: &Cli) -> Result<()> {
    if let Some(font) = &cli.font {
        cfg.font.family = font.clone();
    }
    if let Some(size) = cli.size {
        cfg.font.size = size;
    }
    if let Some(style) = &cli.style {
        cfg.font.style = style.clone();
    }
    if let Some(padding) = cli.padding {
        cfg.atlas.padding = padding;
    }
    if let Some(chars) = &cli.chars {
        cfg.charset.chars = chars.clone();
    }
    if let Some(path) = &cli.charset_file {
        cfg.charset.chars = read_charset_file(path)?;
    }
    if let Some(dir) = &cli.out_dir {
        cfg.output.dir = dir.to_string_lossy().into_owned();
    }
    Ok(())
}

/// Line breaks and tabs in a charset file are layout, not characters
fn read_charset_file(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read charset file: {}", path.display()))?;
    Ok(strip_layout_chars(&content))
}

fn strip_layout_chars(content: &str) -> String {
    content
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::default_path().ok_or_else(|| anyhow!("Cannot determine config directory"))?,
    };
    Config::write_default_config(&path, force)?;
    println!("Config file generated: {}", path.display());
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read descriptor: {}", path.display()))?;
    let descriptor = FontDescriptor::parse(&text)
        .with_context(|| format!("Failed to parse descriptor: {}", path.display()))?;

    let right = descriptor.glyphs.iter().map(|g| g.x + g.width).max().unwrap_or(0);
    let bottom = descriptor.glyphs.iter().map(|g| g.y + g.height).max().unwrap_or(0);
    info!("Inspected {}", path.display());

    println!("Name:   {}", descriptor.name);
    println!("Image:  {}", descriptor.image);
    println!("Glyphs: {}", descriptor.glyphs.len());
    println!("Extent: {}x{}", right, bottom);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "fontgen", "--font", "Liberation Mono", "--size", "12", "--padding", "0", "--chars",
            "xyz",
        ]);
        let mut cfg = Config::default();
        apply_overrides(&mut cfg, &cli).unwrap();
        assert_eq!(cfg.font.family, "Liberation Mono");
        assert_eq!(cfg.font.size, 12.0);
        assert_eq!(cfg.atlas.padding, 0);
        assert_eq!(cfg.charset.chars, "xyz");
        assert_eq!(cfg.output.dir, ".");
    }

    #[test]
    fn test_chars_conflicts_with_charset_file() {
        let parsed = Cli::try_parse_from(["fontgen", "--chars", "a", "--charset-file", "x.txt"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_strip_layout_chars() {
        assert_eq!(strip_layout_chars("ab\r\ncd\te f\n"), "abcde f");
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
