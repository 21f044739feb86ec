//! Positioned elements of a page.
//!
//! The decoder hands the core three kinds of primitives: characters, shapes
//! and figures. Layout analysis builds words, text lines, text blocks and
//! paragraphs on top of the characters. Every one of these exposes a
//! rectangle and a page number through [`PositionedElement`].
//!
//! Characters are shared: a [`Page`](crate::document::Page) owns them behind
//! an `Arc` and words hold clones of that `Arc`, never copies of the glyph.

mod character;
mod graphics;
mod role;
mod text;

pub use character::Character;
pub use graphics::{Figure, Shape, ShapeKind};
pub use role::Role;
pub use text::{BlockRef, Paragraph, TextBlock, TextLine, Word};
pub(crate) use text::typical_left_edge;

use crate::geometry::Rect;
use serde::Serialize;

/// Anything placed on a page.
pub trait PositionedElement {
    /// Bounding box in page coordinates.
    fn rect(&self) -> Rect;

    /// 1-based number of the page the element sits on.
    fn page(&self) -> u32;
}

/// Font weight classification following PDF spec numeric scale.
///
/// PDF Spec: ISO 32000-1:2008, Table 122 - FontDescriptor
/// Values: 100-900 where 400 = normal, 700 = bold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[repr(u16)]
pub enum FontWeight {
    /// Thin (100)
    Thin = 100,
    /// Extra Light (200)
    ExtraLight = 200,
    /// Light (300)
    Light = 300,
    /// Normal (400) - default weight
    #[default]
    Normal = 400,
    /// Medium (500)
    Medium = 500,
    /// Semi Bold (600)
    SemiBold = 600,
    /// Bold (700) - standard bold weight
    Bold = 700,
    /// Extra Bold (800)
    ExtraBold = 800,
    /// Black (900) - heaviest weight
    Black = 900,
}

impl FontWeight {
    /// Check if this weight is considered bold (>= 600).
    pub fn is_bold(&self) -> bool {
        *self as u16 >= 600
    }

    /// Guess a weight from a font name such as `Times-Bold` or `ABCDEF+Inter-SemiBold`.
    pub fn from_font_name(name: &str) -> Self {
        let name_lower = name.to_lowercase();

        if name_lower.contains("black") || name_lower.contains("heavy") {
            return FontWeight::Black;
        }
        if name_lower.contains("extrabold") || name_lower.contains("ultrabold") {
            return FontWeight::ExtraBold;
        }
        if name_lower.contains("bold") {
            if name_lower.contains("semibold") || name_lower.contains("demibold") {
                return FontWeight::SemiBold;
            }
            return FontWeight::Bold;
        }
        if name_lower.contains("medium") {
            return FontWeight::Medium;
        }
        if name_lower.contains("light") {
            if name_lower.contains("extralight") || name_lower.contains("ultralight") {
                return FontWeight::ExtraLight;
            }
            return FontWeight::Light;
        }
        if name_lower.contains("thin") {
            return FontWeight::Thin;
        }
        FontWeight::Normal
    }
}

/// A font reference as reported by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Font {
    /// Full base font name (may carry a subset prefix like `ABCDEF+`)
    pub name: String,
    /// Family name without subset prefix and style suffix
    pub family: String,
    /// Font weight
    pub weight: FontWeight,
    /// Whether the font is italic or oblique
    pub is_italic: bool,
}

impl Font {
    /// Derive family, weight and slant from a base font name.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_strata::elements::{Font, FontWeight};
    ///
    /// let font = Font::from_name("ABCDEF+Times-BoldItalic");
    /// assert_eq!(font.family, "Times");
    /// assert_eq!(font.weight, FontWeight::Bold);
    /// assert!(font.is_italic);
    /// ```
    pub fn from_name(name: &str) -> Self {
        let without_subset = match name.split_once('+') {
            Some((prefix, rest)) if prefix.len() == 6 && prefix.chars().all(|c| c.is_ascii_uppercase()) => {
                rest
            },
            _ => name,
        };
        let family = without_subset
            .split(['-', ','])
            .next()
            .unwrap_or(without_subset)
            .to_string();
        let name_lower = name.to_lowercase();

        Self {
            name: name.to_string(),
            family,
            weight: FontWeight::from_font_name(name),
            is_italic: name_lower.contains("italic") || name_lower.contains("oblique"),
        }
    }

    /// Check if this font is bold.
    pub fn is_bold(&self) -> bool {
        self.weight.is_bold()
    }
}

/// RGB color representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    /// Red channel (0.0 - 1.0)
    pub r: f32,
    /// Green channel (0.0 - 1.0)
    pub g: f32,
    /// Blue channel (0.0 - 1.0)
    pub b: f32,
}

impl Color {
    /// Create a new color.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a black color.
    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Create a white color.
    pub fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Quantise to 8 bits per channel; used as a hashable key.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b)]
    }

    /// Build a color from 8-bit channels.
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0] as f32 / 255.0, rgb[1] as f32 / 255.0, rgb[2] as f32 / 255.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_creation() {
        let black = Color::black();
        assert_eq!(black.to_rgb8(), [0, 0, 0]);

        let white = Color::white();
        assert_eq!(white.to_rgb8(), [255, 255, 255]);

        let red = Color::new(1.0, 0.0, 0.0);
        assert_eq!(Color::from_rgb8(red.to_rgb8()), red);
    }

    #[test]
    fn test_font_weight_from_name() {
        assert_eq!(FontWeight::from_font_name("Helvetica"), FontWeight::Normal);
        assert_eq!(FontWeight::from_font_name("Helvetica-Bold"), FontWeight::Bold);
        assert_eq!(FontWeight::from_font_name("Inter-SemiBold"), FontWeight::SemiBold);
        assert_eq!(FontWeight::from_font_name("Arial-Black"), FontWeight::Black);
        assert_eq!(FontWeight::from_font_name("Roboto-Light"), FontWeight::Light);
        assert!(FontWeight::SemiBold.is_bold());
        assert!(!FontWeight::Medium.is_bold());
    }

    #[test]
    fn test_font_from_name() {
        let font = Font::from_name("Times-Roman");
        assert_eq!(font.family, "Times");
        assert!(!font.is_bold());
        assert!(!font.is_italic);

        let subset = Font::from_name("QWERTY+CMR10");
        assert_eq!(subset.family, "CMR10");

        let comma = Font::from_name("Arial,BoldItalic");
        assert_eq!(comma.family, "Arial");
        assert!(comma.is_bold());
        assert!(comma.is_italic);
    }
}
