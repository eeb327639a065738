//! `.ffnt` font descriptor
//!
//! Text format, whitespace-insensitive, fixed key order:
//!
//! ```text
//! {
//!   Name: "Arial",
//!   Image: "Fonts.Arial_24_img",
//!   Glyphs:
//!   [
//!     { C: 65, X: 2, Y: 2, W: 10, H: 14 },
//!     { C: 66, X: 14, Y: 2, W: 9, H: 14 }
//!   ]
//! }
//! ```

use std::fmt::Write;

use thiserror::Error;

use crate::atlas::GlyphPlacement;

/// Font metadata plus glyph placements, as written next to the atlas image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    /// Font family name
    pub name: String,
    /// Logical resource name of the atlas image (not a file path)
    pub image: String,
    pub glyphs: Vec<GlyphPlacement>,
}

/// Descriptor parse failure, with the byte offset it was detected at
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected} at offset {offset}, found {found}")]
    Unexpected {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("invalid code point {value} at offset {offset}")]
    InvalidCodePoint { value: u32, offset: usize },
    #[error("number out of range at offset {0}")]
    NumberOutOfRange(usize),
}

impl FontDescriptor {
    /// Render the descriptor text
    pub fn emit(&self) -> String {
        let mut out = String::with_capacity(64 + self.glyphs.len() * 48);
        out.push_str("{\n");
        let _ = writeln!(out, "  Name: \"{}\",", escape(&self.name));
        let _ = writeln!(out, "  Image: \"{}\",", escape(&self.image));
        out.push_str("  Glyphs:\n");
        out.push_str("  [\n");
        let last = self.glyphs.len().saturating_sub(1);
        for (i, g) in self.glyphs.iter().enumerate() {
            let _ = writeln!(
                out,
                "    {{ C: {}, X: {}, Y: {}, W: {}, H: {} }}{}",
                g.character as u32,
                g.x,
                g.y,
                g.width,
                g.height,
                if i < last { "," } else { "" }
            );
        }
        out.push_str("  ]\n");
        out.push_str("}\n");
        out
    }

    /// Parse descriptor text produced by [`FontDescriptor::emit`]
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut p = Parser::new(text);

        p.expect_punct('{')?;
        p.expect_key("Name")?;
        let name = p.string()?;
        p.expect_punct(',')?;
        p.expect_key("Image")?;
        let image = p.string()?;
        p.expect_punct(',')?;
        p.expect_key("Glyphs")?;
        p.expect_punct('[')?;

        let mut glyphs = Vec::new();
        if !p.eat_punct(']') {
            loop {
                glyphs.push(p.glyph()?);
                if p.eat_punct(',') {
                    continue;
                }
                p.expect_punct(']')?;
                break;
            }
        }

        p.expect_punct('}')?;
        p.expect_end()?;

        Ok(Self { name, image, glyphs })
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.rest().chars().next()
    }

    fn unexpected<T>(&mut self, expected: impl Into<String>) -> Result<T, ParseError> {
        let found = match self.peek() {
            Some(c) => format!("'{}'", c),
            None => "end of input".to_string(),
        };
        Err(ParseError::Unexpected {
            expected: expected.into(),
            found,
            offset: self.pos,
        })
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, c: char) -> Result<(), ParseError> {
        if self.eat_punct(c) {
            Ok(())
        } else {
            self.unexpected(format!("'{}'", c))
        }
    }

    /// `Key:`
    fn expect_key(&mut self, key: &str) -> Result<(), ParseError> {
        self.skip_ws();
        let rest = self.rest();
        let ident_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(rest.len());
        if &rest[..ident_len] != key {
            return self.unexpected(format!("key {}", key));
        }
        self.pos += ident_len;
        self.expect_punct(':')
    }

    fn string(&mut self) -> Result<String, ParseError> {
        self.expect_punct('"')?;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                '\\' => match chars.next() {
                    Some((_, escaped)) => out.push(escaped),
                    None => break,
                },
                _ => out.push(c),
            }
        }
        self.pos = self.text.len();
        self.unexpected("closing '\"'")
    }

    fn number(&mut self) -> Result<u32, ParseError> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if len == 0 {
            return self.unexpected("integer");
        }
        let value = rest[..len]
            .parse::<u32>()
            .map_err(|_| ParseError::NumberOutOfRange(self.pos))?;
        self.pos += len;
        Ok(value)
    }

    fn field(&mut self, key: &str) -> Result<u32, ParseError> {
        self.expect_key(key)?;
        self.number()
    }

    /// `{ C: n, X: n, Y: n, W: n, H: n }`
    fn glyph(&mut self) -> Result<GlyphPlacement, ParseError> {
        self.expect_punct('{')?;
        self.skip_ws();
        let offset = self.pos;
        let code = self.field("C")?;
        let character =
            char::from_u32(code).ok_or(ParseError::InvalidCodePoint { value: code, offset })?;
        self.expect_punct(',')?;
        let x = self.field("X")?;
        self.expect_punct(',')?;
        let y = self.field("Y")?;
        self.expect_punct(',')?;
        let width = self.field("W")?;
        self.expect_punct(',')?;
        let height = self.field("H")?;
        self.expect_punct('}')?;
        Ok(GlyphPlacement {
            character,
            x,
            y,
            width,
            height,
        })
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(_) => self.unexpected("end of input"),
        }
    }
}
