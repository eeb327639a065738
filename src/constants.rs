//! Default values for fontgen
//!
//! These are only defaults: everything here can be overridden through
//! the config file or the command line, and the packer itself receives
//! them as explicit parameters.

// ============================================================================
// Character Set
// ============================================================================

/// Built-in character set: ASCII punctuation, digits, Latin letters, then
/// the Russian alphabet (upper and lower case, including Ё/ё)
pub const DEFAULT_CHARSET: &str = concat!(
    "!\"#$%&'()*+,-./0123456789:;<=> ?@",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~",
    "АБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯабвгдеёжзийклмнопрстуфхцчшщъыьэюя",
);

// ============================================================================
// Output Naming
// ============================================================================

/// Appended to the base name to form the image file / resource name
pub const IMAGE_POSTFIX: &str = "_img";

/// Prefix of the logical image resource path written to the descriptor
pub const RESOURCE_PREFIX: &str = "Fonts.";

/// Descriptor file extension
pub const DESCRIPTOR_EXTENSION: &str = "ffnt";

// ============================================================================
// Atlas Constants
// ============================================================================

/// Side of the scratch surface used when measuring glyphs (pixels).
/// No single glyph box may exceed it.
pub const MINIMAL_ATLAS_SIZE: u32 = 256;

/// Default glyph padding (pixels)
pub const DEFAULT_PADDING: u32 = 2;

/// Maximum glyph padding (pixels)
pub const MAX_PADDING: u32 = 32;

// ============================================================================
// Font Constants
// ============================================================================

/// Default font family
pub const DEFAULT_FONT_FAMILY: &str = "DejaVu Sans";

/// Default font size (points)
pub const DEFAULT_FONT_SIZE: f32 = 24.0;

/// Default resolution used to convert points to pixels
pub const DEFAULT_DPI: f32 = 96.0;

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;
