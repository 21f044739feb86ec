//! Text hierarchy: words, lines, blocks and paragraphs.
//!
//! Each level owns the level below and caches its bounding box as the union
//! of its children. The cache is rebuilt by every mutator, so
//! `line.rect() == union(word rects)` and `block.rect() == union(line rects)`
//! hold at all times.

use super::{Character, PositionedElement, Role};
use crate::geometry::Rect;
use crate::layout::statistics::{
    lines_statistic, quantize, words_statistic, DocumentOrder, FrequencyTable, TextStatistic,
};
use serde::Serialize;
use std::sync::Arc;

/// A run of characters without internal whitespace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Word {
    text: String,
    rect: Rect,
    page: u32,
    #[serde(skip)]
    characters: Vec<Arc<Character>>,
    /// Indices of glyphs kept for geometry but left out of `text`
    #[serde(skip)]
    hidden: Vec<usize>,
}

impl Word {
    /// Build a word from its characters in reading order.
    ///
    /// Returns `None` for an empty character list.
    pub fn from_characters(characters: Vec<Arc<Character>>) -> Option<Word> {
        Self::with_hidden(characters, Vec::new())
    }

    fn with_hidden(characters: Vec<Arc<Character>>, hidden: Vec<usize>) -> Option<Word> {
        let rect = Rect::union_all(characters.iter().map(|c| &c.rect))?;
        let page = characters.first()?.page;
        let text = characters
            .iter()
            .enumerate()
            .filter(|(i, _)| !hidden.contains(i))
            .map(|(_, c)| c.code_point)
            .collect();
        Some(Word {
            text,
            rect,
            page,
            characters,
            hidden,
        })
    }

    /// The word text. Glyphs removed by dehyphenation are not part of it.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Characters of the word, including removed hyphen glyphs.
    pub fn characters(&self) -> &[Arc<Character>] {
        &self.characters
    }

    /// Bounding box of all characters.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Most common font size of the word's characters.
    pub fn font_size(&self) -> f32 {
        let mut sizes = FrequencyTable::new();
        for c in &self.characters {
            sizes.add(quantize(c.font_size), DocumentOrder::new(c.page, c.sequence));
        }
        sizes
            .mode()
            .map(|s| s.into_inner())
            .unwrap_or_else(|| self.rect.height())
    }

    /// Concatenate `continuation` onto this word, hiding this word's trailing
    /// hyphen glyph.
    pub(crate) fn join_hyphenated(mut self, continuation: Word) -> Word {
        if let Some(last) = self.characters.len().checked_sub(1) {
            if !self.hidden.contains(&last) {
                self.hidden.push(last);
                self.text.pop();
            }
        }
        let offset = self.characters.len();
        self.characters.extend(continuation.characters);
        self.hidden
            .extend(continuation.hidden.into_iter().map(|i| i + offset));
        self.text.push_str(&continuation.text);
        self.rect = self.rect.union(&continuation.rect);
        self
    }

    /// Replace characters through `expand`, which returns the substitute
    /// glyphs for a character or `None` to keep it. Returns true if anything
    /// was replaced.
    pub(crate) fn expand_characters<F>(&mut self, mut expand: F) -> bool
    where
        F: FnMut(&Arc<Character>) -> Option<Vec<Arc<Character>>>,
    {
        let mut changed = false;
        let mut characters = Vec::with_capacity(self.characters.len());
        let mut hidden = Vec::new();

        for (i, character) in self.characters.iter().enumerate() {
            let start = characters.len();
            match expand(character) {
                Some(parts) if !parts.is_empty() => {
                    changed = true;
                    characters.extend(parts);
                },
                _ => characters.push(Arc::clone(character)),
            }
            if self.hidden.contains(&i) {
                hidden.extend(start..characters.len());
            }
        }

        if changed {
            if let Some(word) = Self::with_hidden(characters, hidden) {
                *self = word;
            }
        }
        changed
    }
}

impl PositionedElement for Word {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn page(&self) -> u32 {
        self.page
    }
}

/// Words sharing a baseline, ordered left to right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    words: Vec<Word>,
    rect: Rect,
    baseline: f32,
    page: u32,
    #[serde(skip)]
    statistic: TextStatistic,
}

impl TextLine {
    /// Build a line from its words. Words are sorted by their left edge.
    ///
    /// Returns `None` for an empty word list.
    pub fn from_words(mut words: Vec<Word>) -> Option<TextLine> {
        words.sort_by(|a, b| crate::geometry::compare_min_x(&a.rect, &b.rect));
        Self::assemble(words)
    }

    fn assemble(words: Vec<Word>) -> Option<TextLine> {
        let rect = Rect::union_all(words.iter().map(|w| &w.rect))?;
        let page = words.first()?.page;

        let mut bottoms = FrequencyTable::new();
        for c in words.iter().flat_map(|w| w.characters.iter()) {
            bottoms.add(quantize(c.rect.min_y()), DocumentOrder::new(c.page, c.sequence));
        }
        let baseline = bottoms.mode().map_or(rect.min_y(), |b| b.into_inner());
        let statistic = words_statistic(&words);

        Some(TextLine {
            words,
            rect,
            baseline,
            page,
            statistic,
        })
    }

    /// Words joined by single spaces.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                text.push(' ');
            }
            text.push_str(word.text());
        }
        text
    }

    /// Words of the line, left to right.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Leftmost word.
    pub fn first_word(&self) -> Option<&Word> {
        self.words.first()
    }

    /// Rightmost word.
    pub fn last_word(&self) -> Option<&Word> {
        self.words.last()
    }

    /// Union of the word rectangles.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Most common bottom edge of the line's glyphs.
    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    /// 1-based page number.
    pub fn page_number(&self) -> u32 {
        self.page
    }

    /// Typography of the line's characters.
    pub fn statistic(&self) -> &TextStatistic {
        &self.statistic
    }

    /// Most common font size, falling back to the line height.
    pub fn font_size(&self) -> f32 {
        self.statistic.font_size_or(self.rect.height())
    }

    /// Number of characters over all words.
    pub fn character_count(&self) -> usize {
        self.words.iter().map(|w| w.characters.len()).sum()
    }

    /// Remove and return the first word. The line may become empty, in which
    /// case its geometry is left stale and the caller must drop it.
    pub(crate) fn take_first_word(&mut self) -> Option<Word> {
        if self.words.is_empty() {
            return None;
        }
        let word = self.words.remove(0);
        self.refresh();
        Some(word)
    }

    /// Replace the last word through `f`.
    pub(crate) fn map_last_word<F>(&mut self, f: F)
    where
        F: FnOnce(Word) -> Word,
    {
        if let Some(last) = self.words.pop() {
            self.words.push(f(last));
            self.refresh();
        }
    }

    pub(crate) fn words_mut(&mut self) -> &mut [Word] {
        &mut self.words
    }

    /// Rebuild the cached geometry and statistic after a mutation.
    pub(crate) fn refresh(&mut self) {
        let words = std::mem::take(&mut self.words);
        match Self::assemble(words) {
            Some(line) => *self = line,
            None => self.statistic = TextStatistic::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl PositionedElement for TextLine {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn page(&self) -> u32 {
        self.page
    }
}

/// A rectangular region of lines, the leaf of the XY-cut.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    lines: Vec<TextLine>,
    rect: Rect,
    page: u32,
    role: Role,
    #[serde(skip)]
    statistic: TextStatistic,
}

impl TextBlock {
    /// Build a block from lines in reading order.
    ///
    /// Returns `None` for an empty line list.
    pub fn from_lines(lines: Vec<TextLine>) -> Option<TextBlock> {
        Self::assemble(lines, Role::Unknown)
    }

    fn assemble(lines: Vec<TextLine>, role: Role) -> Option<TextBlock> {
        let rect = Rect::union_all(lines.iter().map(|l| &l.rect))?;
        let page = lines.first()?.page;
        let statistic = lines_statistic(&lines);
        Some(TextBlock {
            lines,
            rect,
            page,
            role,
            statistic,
        })
    }

    /// Lines joined by newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(TextLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Lines of the block in reading order.
    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// First line.
    pub fn first_line(&self) -> Option<&TextLine> {
        self.lines.first()
    }

    /// Last line.
    pub fn last_line(&self) -> Option<&TextLine> {
        self.lines.last()
    }

    /// Union of the line rectangles.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// 1-based page number.
    pub fn page_number(&self) -> u32 {
        self.page
    }

    /// Assigned role, [`Role::Unknown`] until classified.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Typography of the block, including line pitch and line gap samples.
    pub fn statistic(&self) -> &TextStatistic {
        &self.statistic
    }

    /// Most common font size, falling back to the first line's height.
    pub fn font_size(&self) -> f32 {
        let fallback = self.lines.first().map_or(0.0, |l| l.rect.height());
        self.statistic.font_size_or(fallback)
    }

    /// Most common left edge of the block's lines.
    pub fn typical_left_margin(&self) -> f32 {
        typical_left_edge(self.lines.iter())
            .unwrap_or_else(|| self.rect.min_x())
    }

    /// Number of characters over all lines.
    pub fn character_count(&self) -> usize {
        self.lines.iter().map(TextLine::character_count).sum()
    }

    /// Set the role if the block is still unclassified. Returns true on
    /// assignment; a classified block keeps its role.
    pub fn assign_role(&mut self, role: Role) -> bool {
        if self.role.is_unknown() {
            self.role = role;
            true
        } else {
            false
        }
    }

    pub(crate) fn lines_mut(&mut self) -> &mut Vec<TextLine> {
        &mut self.lines
    }

    /// Drop empty lines and rebuild the cached geometry.
    pub(crate) fn refresh(&mut self) {
        let mut lines = std::mem::take(&mut self.lines);
        lines.retain(|l| !l.is_empty());
        match Self::assemble(lines, self.role) {
            Some(block) => *self = block,
            None => self.statistic = TextStatistic::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl PositionedElement for TextBlock {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn page(&self) -> u32 {
        self.page
    }
}

/// Most common left edge among `lines`.
pub(crate) fn typical_left_edge<'a, I>(lines: I) -> Option<f32>
where
    I: IntoIterator<Item = &'a TextLine>,
{
    let mut edges = FrequencyTable::new();
    for (i, line) in lines.into_iter().enumerate() {
        edges.add(quantize(line.rect.min_x()), DocumentOrder::new(line.page, i));
    }
    edges.mode().map(|e| e.into_inner())
}

/// Address of a block inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BlockRef {
    /// Index into the document's pages
    pub page_index: usize,
    /// Index into that page's blocks
    pub block_index: usize,
}

impl BlockRef {
    /// Create a block reference.
    pub fn new(page_index: usize, block_index: usize) -> Self {
        Self {
            page_index,
            block_index,
        }
    }
}

/// Consecutive blocks forming one logical paragraph, possibly across columns
/// and pages.
///
/// As a [`PositionedElement`] a paragraph reports its first page and the
/// union of its blocks there. [`Document::paragraph_rects`] gives the box on
/// every page it touches.
///
/// [`Document::paragraph_rects`]: crate::Document::paragraph_rects
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    /// Member blocks in reading order
    pub blocks: Vec<BlockRef>,
    /// Role of the paragraph, taken from its first block
    pub role: Role,
    /// Blocks whose trailing hyphenated word continues in the paragraph's
    /// next block on the following page
    pub page_break_joins: Vec<BlockRef>,
    rect: Rect,
    page: u32,
}

impl Paragraph {
    /// Paragraph starting with `block`, found at `first`.
    pub fn new(first: BlockRef, block: &TextBlock) -> Self {
        Self {
            blocks: vec![first],
            role: Role::Unknown,
            page_break_joins: Vec::new(),
            rect: block.rect(),
            page: block.page_number(),
        }
    }

    /// Append `block`, found at `at`.
    pub fn push(&mut self, at: BlockRef, block: &TextBlock) {
        if block.page_number() == self.page {
            self.rect = self.rect.union(&block.rect());
        }
        self.blocks.push(at);
    }

    pub(crate) fn set_bounds(&mut self, page: u32, rect: Rect) {
        self.page = page;
        self.rect = rect;
    }
}

impl PositionedElement for Paragraph {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn page(&self) -> u32 {
        self.page
    }
}
