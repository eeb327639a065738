//! fontconfig integration
//!
//! Search and select system fonts

use anyhow::{anyhow, Result};
use fontconfig::Fontconfig;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Font search result
#[derive(Debug, Clone)]
pub struct FontMatch {
    /// Font file path
    pub path: PathBuf,
    /// Font name
    pub family: String,
}

/// Font bytes plus the family name they were resolved under
#[derive(Debug, Clone)]
pub struct ResolvedFont {
    pub data: Vec<u8>,
    /// Requested family, or the file stem when loaded by path
    pub family: String,
    pub path: PathBuf,
}

/// Search fonts using fontconfig
pub struct FontFinder {
    fc: Fontconfig,
}

impl FontFinder {
    /// Initialize FontFinder
    pub fn new() -> Result<Self> {
        let fc = Fontconfig::new().ok_or_else(|| anyhow!("fontconfig initialization failed"))?;
        info!("fontconfig initialized");
        Ok(Self { fc })
    }

    /// Search by family name and optional style ("Bold", "Italic", ...)
    /// Verifies that the returned font actually matches the requested family name
    /// (fontconfig always returns the "closest" match, even if completely unrelated)
    pub fn find_font(&self, family: &str, style: Option<&str>) -> Option<FontMatch> {
        let font = self.fc.find(family, style)?;
        if family_matches(family, &font.name) {
            return Some(FontMatch {
                path: font.path,
                family: font.name,
            });
        }
        warn!(
            "fontconfig: rejected false match for \"{}\": got \"{}\"",
            family, font.name
        );
        None
    }
}

/// Loose family comparison: either name contains the other, ignoring case
fn family_matches(requested: &str, got: &str) -> bool {
    let req = requested.to_ascii_lowercase();
    let got = got.to_ascii_lowercase();
    got.contains(&req) || req.contains(&got)
}

/// Load font file
pub fn load_font_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| anyhow!("Failed to read font file: {} ({})", path.display(), e))
}

fn file_family(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "font".to_string())
}

/// Resolve a font specifier: if it's a path to an existing file, read it directly.
/// Otherwise, treat it as a font family name and search via fontconfig.
pub fn resolve_font(specifier: &str, style: Option<&str>) -> Result<ResolvedFont> {
    let path = Path::new(specifier);
    if path.is_file() {
        info!("Font loaded from path: {}", specifier);
        return Ok(ResolvedFont {
            data: load_font_file(path)?,
            family: file_family(path),
            path: path.to_path_buf(),
        });
    }

    let finder = FontFinder::new()?;
    if let Some(font_match) = finder.find_font(specifier, style) {
        info!(
            "Font resolved by name: \"{}\" ({}) → {} ({})",
            specifier,
            style.unwrap_or("regular"),
            font_match.family,
            font_match.path.display()
        );
        return Ok(ResolvedFont {
            data: load_font_file(&font_match.path)?,
            family: specifier.to_string(),
            path: font_match.path,
        });
    }

    Err(anyhow!(
        "Font not found: \"{}\" (not a valid path or font name)",
        specifier
    ))
}
