//! Single glyphs produced by the decoder.

use super::{Color, Font, PositionedElement};
use crate::geometry::Rect;
use serde::Serialize;
use std::sync::Arc;

/// A single character with its position and styling.
///
/// Characters are immutable once produced. The owning page keeps them in
/// decoder order; `sequence` is the index in that order and survives
/// ligature splitting, so every derived glyph can be traced to its source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Character {
    /// The code point of the glyph
    pub code_point: char,
    /// Font reference, shared by all glyphs of the same font
    pub font: Arc<Font>,
    /// Font size in points
    pub font_size: f32,
    /// Fill color
    pub color: Color,
    /// Bounding box of the glyph
    pub rect: Rect,
    /// 1-based page number
    pub page: u32,
    /// Position in the page's decoder order
    pub sequence: usize,
    /// Source ligature glyph when this character was split out of one
    pub ligature_source: Option<char>,
}

impl Character {
    /// Create a character that did not come out of a ligature split.
    pub fn new(
        code_point: char,
        font: Arc<Font>,
        font_size: f32,
        color: Color,
        rect: Rect,
        page: u32,
        sequence: usize,
    ) -> Self {
        Self {
            code_point,
            font,
            font_size,
            color,
            rect,
            page,
            sequence,
            ligature_source: None,
        }
    }

    /// True for decoder-emitted whitespace glyphs.
    pub fn is_whitespace(&self) -> bool {
        self.code_point.is_whitespace()
    }

    /// True when the glyph is set in a bold font.
    pub fn is_bold(&self) -> bool {
        self.font.is_bold()
    }
}

impl PositionedElement for Character {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn page(&self) -> u32 {
        self.page
    }
}
