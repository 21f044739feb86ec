//! Pages and documents, and the decoder input they are built from.
//!
//! The content decoder is an external collaborator. It hands over, per page,
//! the positioned glyphs, shapes and images it found, with raw
//! `[min_x, min_y, max_x, max_y]` boxes. [`Document::from_decoded`] validates
//! that input and builds the model the pipeline stages work on. Nothing is
//! repaired: a malformed box fails the whole document.

use crate::elements::{
    BlockRef, Character, Color, Figure, Font, Paragraph, Shape, ShapeKind, TextBlock, TextLine,
    Word,
};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::layout::statistics::TextStatistic;
use image::RgbImage;
use serde::Serialize;
use std::sync::Arc;

/// One primitive emitted by the content decoder.
#[derive(Debug, Clone)]
pub enum DecodedElement {
    /// A glyph
    Character {
        /// `[min_x, min_y, max_x, max_y]`
        bbox: [f32; 4],
        /// Decoded Unicode value
        code_point: char,
        /// Font the glyph is set in
        font: Arc<Font>,
        /// Font size in points
        font_size: f32,
        /// Fill color
        color: Color,
    },
    /// A vector shape
    Shape {
        /// `[min_x, min_y, max_x, max_y]`
        bbox: [f32; 4],
        /// Fill or stroke color
        color: Option<Color>,
        /// Shape kind
        kind: ShapeKind,
    },
    /// A placed image
    Figure {
        /// `[min_x, min_y, max_x, max_y]`
        bbox: [f32; 4],
        /// Decoded pixels, when available
        samples: Option<Arc<RgbImage>>,
    },
}

impl DecodedElement {
    /// A black glyph.
    pub fn glyph(code_point: char, bbox: [f32; 4], font: &Arc<Font>, font_size: f32) -> Self {
        DecodedElement::Character {
            bbox,
            code_point,
            font: Arc::clone(font),
            font_size,
            color: Color::black(),
        }
    }

    /// A rectangle shape without color.
    pub fn rectangle(bbox: [f32; 4]) -> Self {
        DecodedElement::Shape {
            bbox,
            color: None,
            kind: ShapeKind::Rectangle,
        }
    }

    /// A figure with optional pixel samples.
    pub fn figure(bbox: [f32; 4], samples: Option<RgbImage>) -> Self {
        DecodedElement::Figure {
            bbox,
            samples: samples.map(Arc::new),
        }
    }
}

/// Decoder output for one page.
#[derive(Debug, Clone)]
pub struct DecodedPage {
    /// 1-based page number
    pub number: u32,
    /// `[min_x, min_y, max_x, max_y]` of the page
    pub media_box: [f32; 4],
    /// Primitives in decoder order
    pub elements: Vec<DecodedElement>,
}

impl DecodedPage {
    /// Create an empty page.
    pub fn new(number: u32, media_box: [f32; 4]) -> Self {
        Self {
            number,
            media_box,
            elements: Vec::new(),
        }
    }

    /// Append a primitive, builder style.
    pub fn with_element(mut self, element: DecodedElement) -> Self {
        self.elements.push(element);
        self
    }
}

/// A page with its raw content and, after processing, its text structure.
///
/// Stages move content upwards: words are consumed into lines and lines into
/// blocks, so each word and line lives in exactly one place.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub(crate) number: u32,
    pub(crate) media_box: Rect,
    #[serde(skip)]
    pub(crate) characters: Vec<Arc<Character>>,
    pub(crate) shapes: Vec<Shape>,
    pub(crate) figures: Vec<Figure>,
    #[serde(skip)]
    pub(crate) words: Vec<Word>,
    #[serde(skip)]
    pub(crate) lines: Vec<TextLine>,
    pub(crate) blocks: Vec<TextBlock>,
    #[serde(skip)]
    pub(crate) statistic: TextStatistic,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32, media_box: Rect) -> Self {
        Self {
            number,
            media_box,
            characters: Vec::new(),
            shapes: Vec::new(),
            figures: Vec::new(),
            words: Vec::new(),
            lines: Vec::new(),
            blocks: Vec::new(),
            statistic: TextStatistic::new(),
        }
    }

    fn from_decoded(decoded: DecodedPage) -> Result<Page> {
        let mut page = Page::new(decoded.number, Rect::from_array(decoded.media_box)?);

        for element in decoded.elements {
            match element {
                DecodedElement::Character {
                    bbox,
                    code_point,
                    font,
                    font_size,
                    color,
                } => {
                    if !font_size.is_finite() || font_size < 0.0 {
                        return Err(Error::Validation(format!(
                            "invalid font size {} for {:?} on page {}",
                            font_size, code_point, page.number
                        )));
                    }
                    let sequence = page.characters.len();
                    page.characters.push(Arc::new(Character::new(
                        code_point,
                        font,
                        font_size,
                        color,
                        Rect::from_array(bbox)?,
                        page.number,
                        sequence,
                    )));
                },
                DecodedElement::Shape { bbox, color, kind } => page.shapes.push(Shape {
                    rect: Rect::from_array(bbox)?,
                    color,
                    kind,
                    page: page.number,
                }),
                DecodedElement::Figure { bbox, samples } => page.figures.push(Figure {
                    rect: Rect::from_array(bbox)?,
                    samples,
                    page: page.number,
                }),
            }
        }

        Ok(page)
    }

    /// 1-based page number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Page boundary.
    pub fn media_box(&self) -> Rect {
        self.media_box
    }

    /// Characters in decoder order.
    pub fn characters(&self) -> &[Arc<Character>] {
        &self.characters
    }

    /// Shapes that survived filtering.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Figures that survived filtering.
    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    /// All words of the page, wherever they currently live.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.words
            .iter()
            .chain(self.lines().flat_map(|line| line.words().iter()))
    }

    /// All lines of the page, wherever they currently live.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.lines
            .iter()
            .chain(self.blocks.iter().flat_map(|block| block.lines().iter()))
    }

    /// Blocks in reading order.
    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }

    /// Blocks, mutable for role assignment.
    pub fn blocks_mut(&mut self) -> &mut [TextBlock] {
        &mut self.blocks
    }

    /// Typography of the page.
    pub fn statistic(&self) -> &TextStatistic {
        &self.statistic
    }
}

/// A processed or partially processed document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub(crate) pages: Vec<Page>,
    #[serde(skip)]
    pub(crate) statistic: TextStatistic,
    pub(crate) paragraphs: Vec<Paragraph>,
}

impl Document {
    /// Build a document from decoder output.
    ///
    /// Page numbers must run 1, 2, 3, … in order. Every box is validated;
    /// the first invalid one fails the document.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_strata::document::{DecodedElement, DecodedPage, Document};
    /// use pdf_strata::elements::Font;
    /// use std::sync::Arc;
    ///
    /// let font = Arc::new(Font::from_name("Helvetica"));
    /// let page = DecodedPage::new(1, [0.0, 0.0, 612.0, 792.0])
    ///     .with_element(DecodedElement::glyph('A', [72.0, 700.0, 79.0, 712.0], &font, 12.0));
    ///
    /// let doc = Document::from_decoded(vec![page]).unwrap();
    /// assert_eq!(doc.pages().len(), 1);
    /// assert_eq!(doc.pages()[0].characters().len(), 1);
    ///
    /// let bad = DecodedPage::new(1, [0.0, 0.0, 612.0, 792.0])
    ///     .with_element(DecodedElement::glyph('B', [80.0, 700.0, 70.0, 712.0], &font, 12.0));
    /// assert!(Document::from_decoded(vec![bad]).is_err());
    /// ```
    pub fn from_decoded(pages: Vec<DecodedPage>) -> Result<Document> {
        let mut built = Vec::with_capacity(pages.len());
        for (i, decoded) in pages.into_iter().enumerate() {
            let expected = (i + 1) as u32;
            if decoded.number != expected {
                return Err(Error::InvalidPageNumber {
                    expected,
                    found: decoded.number,
                });
            }
            built.push(Page::from_decoded(decoded)?);
        }

        log::debug!("Built document with {} pages", built.len());
        Ok(Document::from_pages(built))
    }

    /// Wrap already built pages.
    pub fn from_pages(pages: Vec<Page>) -> Document {
        Document {
            pages,
            statistic: TextStatistic::new(),
            paragraphs: Vec::new(),
        }
    }

    /// Pages in order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Pages, mutable for role assignment.
    pub fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    /// Page by 1-based number.
    pub fn page(&self, number: u32) -> Option<&Page> {
        number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
    }

    /// Document-wide typography, available once lines are built.
    pub fn statistic(&self) -> &TextStatistic {
        &self.statistic
    }

    /// Paragraphs in reading order, available after merging.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// All blocks with their addresses, in document order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockRef, &TextBlock)> {
        self.pages.iter().enumerate().flat_map(|(p, page)| {
            page.blocks
                .iter()
                .enumerate()
                .map(move |(b, block)| (BlockRef::new(p, b), block))
        })
    }

    /// Block at `at`.
    pub fn block(&self, at: BlockRef) -> Option<&TextBlock> {
        self.pages.get(at.page_index)?.blocks.get(at.block_index)
    }

    pub(crate) fn block_mut(&mut self, at: BlockRef) -> Option<&mut TextBlock> {
        self.pages.get_mut(at.page_index)?.blocks.get_mut(at.block_index)
    }

    /// Text of a paragraph: its lines joined by single spaces.
    ///
    /// A word hyphenated across a page break is written whole, without the
    /// hyphen, while its halves stay on their own pages.
    pub fn paragraph_text(&self, paragraph: &Paragraph) -> String {
        let mut text = String::new();
        let mut glued = false;
        for at in &paragraph.blocks {
            let Some(block) = self.block(*at) else {
                continue;
            };
            for line in block.lines() {
                if !text.is_empty() && !glued {
                    text.push(' ');
                }
                glued = false;
                text.push_str(&line.text());
            }
            if paragraph.page_break_joins.contains(at) && text.ends_with(['-', '\u{00AD}']) {
                text.pop();
                glued = true;
            }
        }
        text
    }

    /// Bounding box of the paragraph's blocks on each page it touches.
    pub fn paragraph_rects(&self, paragraph: &Paragraph) -> Vec<(u32, Rect)> {
        let mut rects: Vec<(u32, Rect)> = Vec::new();
        for block in paragraph.blocks.iter().filter_map(|at| self.block(*at)) {
            let same_page = rects.last().is_some_and(|(page, _)| *page == block.page_number());
            match rects.last_mut().filter(|_| same_page) {
                Some((_, rect)) => *rect = rect.union(&block.rect()),
                None => rects.push((block.page_number(), block.rect())),
            }
        }
        rects
    }

    /// Recompute each paragraph's first-page bounds from its blocks.
    pub(crate) fn refresh_paragraph_bounds(&mut self) {
        let bounds: Vec<Option<(u32, Rect)>> = self
            .paragraphs
            .iter()
            .map(|p| self.paragraph_rects(p).first().copied())
            .collect();
        for (paragraph, bounds) in self.paragraphs.iter_mut().zip(bounds) {
            if let Some((page, rect)) = bounds {
                paragraph.set_bounds(page, rect);
            }
        }
    }

    /// Number of characters over all pages.
    pub fn character_count(&self) -> usize {
        self.pages.iter().map(|p| p.characters.len()).sum()
    }
}
