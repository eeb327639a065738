//! Build operation
//!
//! Runs the packer end to end and writes `<name>.ffnt` plus
//! `<name><postfix>.png`. Both files go to temporary siblings first and
//! are renamed into place only once both have been written, image first.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::atlas::{
    measure_glyphs, place, to_coverage_alpha, validate_padding, Atlas, CellGrid,
};
use crate::constants::DESCRIPTOR_EXTENSION;
use crate::descriptor::FontDescriptor;
use crate::font::GlyphSource;

/// Everything one build needs besides the glyph source
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Font family written to the descriptor
    pub family: String,
    /// Point size, used for naming only
    pub point_size: f32,
    pub chars: Vec<char>,
    pub padding: u32,
    pub scratch_size: u32,
    pub resource_prefix: String,
    pub image_postfix: String,
}

/// Derived file and resource names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    /// e.g. `Arial_24`
    pub base: String,
    /// e.g. `Arial_24.ffnt`
    pub descriptor_file: String,
    /// e.g. `Arial_24_img.png`
    pub image_file: String,
    /// e.g. `Fonts.Arial_24_img`
    pub image_resource: String,
}

impl OutputNames {
    pub fn new(family: &str, point_size: f32, resource_prefix: &str, image_postfix: &str) -> Self {
        let base = format!("{}_{}", sanitize_family(family), point_size.trunc() as i64);
        Self {
            descriptor_file: format!("{}.{}", base, DESCRIPTOR_EXTENSION),
            image_file: format!("{}{}.png", base, image_postfix),
            image_resource: format!("{}{}{}", resource_prefix, base, image_postfix),
            base,
        }
    }
}

/// Drop whitespace, replace characters that are unsafe in file names
fn sanitize_family(family: &str) -> String {
    let name: String = family
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if name.is_empty() {
        "Font".to_string()
    } else {
        name
    }
}

/// In-memory build result
pub struct BuildOutput {
    pub names: OutputNames,
    pub grid: CellGrid,
    pub atlas: Atlas,
    pub descriptor: FontDescriptor,
}

/// Measure, size, place and post-process; no file I/O
pub fn build_atlas(request: &BuildRequest, source: &dyn GlyphSource) -> Result<BuildOutput> {
    let padding = validate_padding(request.padding)?;
    let names = OutputNames::new(
        &request.family,
        request.point_size,
        &request.resource_prefix,
        &request.image_postfix,
    );

    info!(
        "Building {}: {} glyphs, padding {}",
        names.base,
        request.chars.len(),
        padding
    );

    let specs = measure_glyphs(&request.chars, source, request.scratch_size)?;
    let grid = CellGrid::compute(&specs, padding)?;
    let (mut atlas, placements) = place(&request.chars, source, &grid);
    to_coverage_alpha(&mut atlas);

    let descriptor = FontDescriptor {
        name: request.family.clone(),
        image: names.image_resource.clone(),
        glyphs: placements,
    };

    Ok(BuildOutput {
        names,
        grid,
        atlas,
        descriptor,
    })
}

/// Write both output files into `dir`, returning their final paths
pub fn write_outputs(output: &BuildOutput, dir: &Path) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let descriptor_path = dir.join(&output.names.descriptor_file);
    let image_path = dir.join(&output.names.image_file);
    let descriptor_tmp = tmp_path(&descriptor_path);
    let image_tmp = tmp_path(&image_path);

    let written = write_descriptor(&output.descriptor, &descriptor_tmp)
        .and_then(|_| write_png(&output.atlas, &image_tmp))
        // Image before descriptor
        .and_then(|_| rename(&image_tmp, &image_path))
        .and_then(|_| rename(&descriptor_tmp, &descriptor_path));

    if let Err(e) = written {
        remove_quietly(&descriptor_tmp);
        remove_quietly(&image_tmp);
        return Err(e);
    }

    info!("Descriptor saved: {}", descriptor_path.display());
    info!("Atlas image saved: {}", image_path.display());
    Ok((descriptor_path, image_path))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn remove_quietly(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}

fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to)
        .with_context(|| format!("Failed to move {} to {}", from.display(), to.display()))
}

fn write_descriptor(descriptor: &FontDescriptor, path: &Path) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create descriptor: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(descriptor.emit().as_bytes())
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write descriptor: {}", path.display()))?;
    debug!("Descriptor written: {} glyphs", descriptor.glyphs.len());
    Ok(())
}

fn write_png(atlas: &Atlas, path: &Path) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create image: {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), atlas.width(), atlas.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .with_context(|| format!("Failed to write PNG header: {}", path.display()))?;
    writer
        .write_image_data(atlas.as_raw())
        .with_context(|| format!("Failed to write PNG data: {}", path.display()))?;
    writer
        .finish()
        .with_context(|| format!("Failed to finish PNG: {}", path.display()))?;
    Ok(())
}
