//! Per-block features the classification modules decide on.
//!
//! Features are computed once from the settled layout and never from roles,
//! so every module sees the same input however often the pipeline runs.

use crate::document::Document;
use crate::elements::{BlockRef, TextBlock};
use crate::geometry::Rect;
use crate::layout::statistics::TextStatistic;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Section numbers: "2 Method", "3.1.4 Results", "IV. Discussion"
    static ref RE_SECTION_NUMBER: Regex =
        Regex::new(r"^(?:\d+(?:\.\d+)*\.?|[IVXLC]+\.|[A-Z]\.)\s+\p{Lu}").unwrap();

    /// Bullets and enumerators: "• ", "- ", "a) ", "(iv) ", "3. "
    static ref RE_LIST_MARKER: Regex =
        Regex::new(r"^(?:[•·◦▪▫‣⁃○●■□*\-–—]\s|\(?(?:[a-z]|[ivx]+)\)\s|\d{1,3}[.)]\s)").unwrap();

    /// Bibliography keys: "[12]"
    static ref RE_CITATION_MARKER: Regex = Regex::new(r"^\[\d+\]").unwrap();
}

/// Features of one text block.
#[derive(Debug, Clone)]
pub struct BlockFeatures {
    /// Address of the block
    pub at: BlockRef,
    /// Block text, trimmed
    pub text: String,
    /// Text of each line
    pub lines: Vec<String>,
    /// Dominant font size
    pub font_size: f32,
    /// Dominant font family
    pub font_family: Option<String>,
    /// Fraction of bold characters
    pub bold_ratio: f32,
    /// Fraction of italic characters
    pub italic_ratio: f32,
    /// Distance of the block's top edge from the page top, as a page fraction
    pub top: f32,
    /// Distance of the block's bottom edge from the page top, as a page fraction
    pub bottom: f32,
    /// First word of the block
    pub first_word: Option<String>,
    /// Last word of the block
    pub last_word: Option<String>,
    /// Starts with a section number followed by a capital
    pub section_numbered: bool,
    /// Starts with a bullet or an enumerator
    pub list_marker: bool,
    /// Starts with a bracketed number
    pub citation_marker: bool,
}

impl BlockFeatures {
    /// Extract the features of `block` placed on a page with `media_box`.
    pub fn extract(at: BlockRef, block: &TextBlock, media_box: Rect) -> Self {
        let text = block.text().trim().to_string();
        let statistic = block.statistic();
        let height = media_box.height().max(f32::EPSILON);
        let rect = block.rect();

        Self {
            at,
            lines: block.lines().iter().map(|l| l.text()).collect(),
            font_size: block.font_size(),
            font_family: statistic.most_common_font_family().map(str::to_owned),
            bold_ratio: statistic.bold_ratio(),
            italic_ratio: statistic.italic_ratio(),
            top: ((media_box.max_y() - rect.max_y()) / height).clamp(0.0, 1.0),
            bottom: ((media_box.max_y() - rect.min_y()) / height).clamp(0.0, 1.0),
            first_word: block
                .first_line()
                .and_then(|l| l.first_word())
                .map(|w| w.text().to_string()),
            last_word: block
                .last_line()
                .and_then(|l| l.last_word())
                .map(|w| w.text().to_string()),
            section_numbered: RE_SECTION_NUMBER.is_match(&text),
            list_marker: RE_LIST_MARKER.is_match(&text),
            citation_marker: RE_CITATION_MARKER.is_match(&text),
            text,
        }
    }

    /// Index of the page the block is on.
    pub fn page_index(&self) -> usize {
        self.at.page_index
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Vertical centre as a fraction from the page top.
    pub fn center(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// True when the text ends with a period.
    pub fn ends_with_period(&self) -> bool {
        self.text.ends_with('.')
    }

    /// Lowercased text with surrounding punctuation removed, for label checks.
    pub fn label(&self) -> String {
        self.text
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase()
    }
}

/// Features of every block plus the document's body typography.
#[derive(Debug, Clone)]
pub struct DocumentFeatures {
    /// Block features in document order
    pub blocks: Vec<BlockFeatures>,
    /// Most common font size of the document
    pub body_font_size: f32,
    /// Most common font family of the document
    pub body_font_family: Option<String>,
}

impl DocumentFeatures {
    /// Extract features for all blocks of `doc`.
    ///
    /// The body typography comes from the document statistic, or from the
    /// blocks when the statistic has not been computed.
    pub fn extract(doc: &Document) -> Self {
        let blocks: Vec<BlockFeatures> = doc
            .blocks()
            .filter_map(|(at, block)| {
                let page = doc.pages().get(at.page_index)?;
                Some(BlockFeatures::extract(at, block, page.media_box()))
            })
            .collect();

        let statistic = if doc.statistic().character_count() > 0 {
            doc.statistic().clone()
        } else {
            TextStatistic::combine(doc.blocks().map(|(_, b)| b.statistic()))
        };

        Self {
            blocks,
            body_font_size: statistic.font_size_or(10.0),
            body_font_family: statistic.most_common_font_family().map(str::to_owned),
        }
    }

    /// Iterate over block features in document order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockFeatures> {
        self.blocks.iter()
    }
}
