//! Non-text page content: vector shapes and raster figures.

use super::{Color, PositionedElement};
use crate::geometry::Rect;
use image::RgbImage;
use serde::Serialize;
use std::sync::Arc;

/// Kind of vector shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Filled or stroked rectangle
    #[default]
    Rectangle,
    /// Straight line segment
    Line,
    /// Any other path
    Path,
}

/// A vector shape drawn on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    /// Bounding box of the shape
    pub rect: Rect,
    /// Fill or stroke color, if the decoder reported one
    pub color: Option<Color>,
    /// Shape kind
    pub kind: ShapeKind,
    /// 1-based page number
    pub page: u32,
}

/// A raster image placed on the page.
///
/// `samples` holds decoded pixels when the decoder could provide them. The
/// filter stage only judges figures that carry samples.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    /// Bounding box where the image is placed
    pub rect: Rect,
    /// Decoded pixels, if available
    #[serde(skip)]
    pub samples: Option<Arc<RgbImage>>,
    /// 1-based page number
    pub page: u32,
}

impl PositionedElement for Shape {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn page(&self) -> u32 {
        self.page
    }
}

impl PositionedElement for Figure {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn page(&self) -> u32 {
        self.page
    }
}
