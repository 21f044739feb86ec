//! Merging of text blocks into paragraphs.
//!
//! Blocks are visited in document order and each one either continues the
//! open paragraph or starts a new one. A block continues the paragraph of its
//! predecessor when both are set in the same font family at about the same
//! size, the predecessor does not end a sentence, and the block's first line
//! is not indented. Blocks directly below their predecessor must also be close
//! enough vertically; a block in the next column or on the next page is
//! exempt from the gap test because the distance is meaningless there.
//!
//! Blocks are never reordered. An unfinished paragraph at the end of the
//! document is closed as it is.

use crate::document::Document;
use crate::elements::{typical_left_edge, BlockRef, Paragraph, TextBlock};
use crate::pipeline::PipelineConfig;

/// Tolerance for edge comparisons, in points.
const EDGE_EPSILON: f32 = 0.5;

/// Closing characters that may follow sentence-terminal punctuation.
const CLOSERS: &[char] = &['"', '\'', ')', ']', '\u{201D}', '\u{2019}', '\u{00BB}'];

/// Position of a block relative to its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Succession {
    /// Directly below, sharing part of the x-range
    SameColumn,
    /// Further right on the same page
    NextColumn,
    /// First block of the following page
    NextPage,
    /// Anything else: never merged
    Detached,
}

/// Forward-scan paragraph merger.
#[derive(Debug, Clone)]
pub struct ParagraphMerger {
    /// Maximum dominant font size difference, in points
    pub font_size_tolerance: f32,
    /// Indentation that starts a paragraph, in average char widths
    pub indent_threshold: f32,
}

impl Default for ParagraphMerger {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl ParagraphMerger {
    /// Create a merger with the thresholds from `config`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            font_size_tolerance: config.paragraph_font_size_tolerance,
            indent_threshold: config.paragraph_indent_threshold,
        }
    }

    /// Group all blocks of `doc` into paragraphs.
    pub fn merge(&self, doc: &Document) -> Vec<Paragraph> {
        let statistic = doc.statistic();
        let font_size = statistic.font_size_or(10.0);
        let line_pitch = statistic.line_pitch_or(font_size * 1.2);
        let char_width = statistic
            .average_char_width()
            .filter(|w| *w > 0.0)
            .unwrap_or(font_size * 0.5);

        let mut paragraphs: Vec<Paragraph> = Vec::new();
        let mut previous: Option<(BlockRef, &TextBlock)> = None;

        for (at, block) in doc.blocks() {
            let continues = previous.is_some_and(|(prev_at, prev)| {
                self.continues(prev_at, prev, at, block, line_pitch, char_width)
            });
            let open = paragraphs.last_mut().filter(|_| continues);
            match open {
                Some(paragraph) => paragraph.push(at, block),
                None => paragraphs.push(Paragraph::new(at, block)),
            }
            previous = Some((at, block));
        }

        log::debug!(
            "Merged {} blocks into {} paragraphs",
            doc.blocks().count(),
            paragraphs.len()
        );
        paragraphs
    }

    /// Decide whether `next` continues the paragraph ending with `prev`.
    pub fn continues(
        &self,
        prev_at: BlockRef,
        prev: &TextBlock,
        next_at: BlockRef,
        next: &TextBlock,
        line_pitch: f32,
        char_width: f32,
    ) -> bool {
        if !self.compatible(prev, next) || ends_sentence(prev) {
            return false;
        }

        let succession = succession(prev_at, prev, next_at, next);
        let reference = match succession {
            Succession::Detached => return false,
            Succession::SameColumn => {
                let gap = prev.rect().min_y() - next.rect().max_y();
                if gap > line_pitch {
                    return false;
                }
                Some(prev.typical_left_margin())
            },
            Succession::NextColumn | Succession::NextPage => {
                typical_left_edge(next.lines().iter().skip(1))
            },
        };

        match (reference, next.first_line()) {
            (Some(margin), Some(first)) => {
                first.rect().min_x() - margin <= self.indent_threshold * char_width
            },
            _ => true,
        }
    }

    fn compatible(&self, a: &TextBlock, b: &TextBlock) -> bool {
        let size_a = a.font_size();
        let size_b = b.font_size();
        (size_a - size_b).abs() <= self.font_size_tolerance
            && a.statistic().most_common_font_family() == b.statistic().most_common_font_family()
    }
}

/// Classify where `next` sits relative to `prev`.
pub fn succession(prev_at: BlockRef, prev: &TextBlock, next_at: BlockRef, next: &TextBlock) -> Succession {
    if next_at.page_index == prev_at.page_index + 1 {
        return Succession::NextPage;
    }
    if next_at.page_index != prev_at.page_index {
        return Succession::Detached;
    }

    let a = prev.rect();
    let b = next.rect();
    if b.max_y() <= a.min_y() + EDGE_EPSILON && a.horizontal_overlap(&b) > 0.0 {
        Succession::SameColumn
    } else if b.min_x() >= a.max_x() - EDGE_EPSILON {
        Succession::NextColumn
    } else {
        Succession::Detached
    }
}

/// True when the block's last line ends with `.`, `!` or `?`, possibly
/// followed by closing quotes or brackets.
pub fn ends_sentence(block: &TextBlock) -> bool {
    let Some(line) = block.last_line() else {
        return false;
    };
    let text = line.text();
    let trimmed = text.trim_end().trim_end_matches(CLOSERS);
    trimmed.ends_with(['.', '!', '?'])
}

/// Compute the document's paragraphs.
pub fn build_paragraphs(doc: &mut Document, config: &PipelineConfig) {
    let paragraphs = ParagraphMerger::from_config(config).merge(doc);
    doc.paragraphs = paragraphs;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Page;
    use crate::elements::{Character, Color, Font, TextLine, Word};
    use crate::geometry::Rect;
    use crate::layout::statistics::TextStatistic;
    use std::sync::Arc;

    fn mock_line(text: &str, x: f32, y: f32, size: f32, page: u32) -> TextLine {
        let font = Arc::new(Font::from_name("Times-Roman"));
        let advance = size * 0.5;
        let mut words = Vec::new();
        let mut offset = x;
        for token in text.split(' ') {
            let chars = token
                .chars()
                .enumerate()
                .map(|(i, c)| {
                    let left = offset + i as f32 * advance;
                    Arc::new(Character::new(
                        c,
                        Arc::clone(&font),
                        size,
                        Color::black(),
                        Rect::new(left, y, left + advance, y + size).unwrap(),
                        page,
                        i,
                    ))
                })
                .collect();
            words.push(Word::from_characters(chars).unwrap());
            offset += (token.chars().count() + 1) as f32 * advance;
        }
        TextLine::from_words(words).unwrap()
    }

    fn mock_block(lines: Vec<TextLine>) -> TextBlock {
        TextBlock::from_lines(lines).unwrap()
    }

    fn document(pages: Vec<Vec<TextBlock>>) -> Document {
        let pages: Vec<Page> = pages
            .into_iter()
            .enumerate()
            .map(|(i, blocks)| {
                let mut page = Page::new(i as u32 + 1, Rect::new(0.0, 0.0, 612.0, 792.0).unwrap());
                page.blocks = blocks;
                page
            })
            .collect();
        let mut doc = Document::from_pages(pages);
        doc.statistic = TextStatistic::combine(doc.blocks().map(|(_, b)| b.statistic()));
        doc
    }

    fn paragraph_sizes(doc: &Document) -> Vec<usize> {
        ParagraphMerger::default()
            .merge(doc)
            .iter()
            .map(|p| p.blocks.len())
            .collect()
    }

    #[test]
    fn test_continuation_in_same_column() {
        let doc = document(vec![vec![
            mock_block(vec![
                mock_line("the quick brown", 72.0, 700.0, 10.0, 1),
                mock_line("fox jumps over", 72.0, 688.0, 10.0, 1),
            ]),
            mock_block(vec![
                mock_line("the lazy dog", 72.0, 676.0, 10.0, 1),
                mock_line("and runs away.", 72.0, 664.0, 10.0, 1),
            ]),
        ]]);
        assert_eq!(paragraph_sizes(&doc), vec![2]);
    }

    #[test]
    fn test_sentence_end_starts_new_paragraph() {
        let doc = document(vec![vec![
            mock_block(vec![mock_line("it ended here.", 72.0, 700.0, 10.0, 1)]),
            mock_block(vec![mock_line("new thoughts", 72.0, 688.0, 10.0, 1)]),
        ]]);
        assert_eq!(paragraph_sizes(&doc), vec![1, 1]);
    }

    #[test]
    fn test_closing_quote_after_period_ends_sentence() {
        let block = mock_block(vec![mock_line("he said \"stop.\"", 72.0, 700.0, 10.0, 1)]);
        assert!(ends_sentence(&block));
        let block = mock_block(vec![mock_line("and then", 72.0, 700.0, 10.0, 1)]);
        assert!(!ends_sentence(&block));
    }

    #[test]
    fn test_indented_block_starts_paragraph_even_without_gap() {
        let doc = document(vec![vec![
            mock_block(vec![
                mock_line("words running on", 72.0, 700.0, 10.0, 1),
                mock_line("without an end", 72.0, 688.0, 10.0, 1),
            ]),
            mock_block(vec![
                mock_line("indented start", 92.0, 678.0, 10.0, 1),
                mock_line("of another one", 72.0, 666.0, 10.0, 1),
            ]),
        ]]);
        assert_eq!(paragraph_sizes(&doc), vec![1, 1]);
    }

    #[test]
    fn test_column_and_page_crossing() {
        let doc = document(vec![
            vec![
                mock_block(vec![mock_line("left column text", 72.0, 100.0, 10.0, 1)]),
                mock_block(vec![
                    mock_line("continues on the", 320.0, 700.0, 10.0, 1),
                    mock_line("right and then", 320.0, 688.0, 10.0, 1),
                ]),
            ],
            vec![mock_block(vec![mock_line("goes over the page.", 72.0, 700.0, 10.0, 2)])],
        ]);
        assert_eq!(paragraph_sizes(&doc), vec![3]);
    }

    #[test]
    fn test_font_size_change_breaks_paragraph() {
        let doc = document(vec![vec![
            mock_block(vec![mock_line("Introduction", 72.0, 700.0, 16.0, 1)]),
            mock_block(vec![mock_line("body text follows", 72.0, 680.0, 10.0, 1)]),
        ]]);
        assert_eq!(paragraph_sizes(&doc), vec![1, 1]);
    }

    #[test]
    fn test_wide_gap_breaks_paragraph() {
        let doc = document(vec![vec![
            mock_block(vec![mock_line("first part", 72.0, 700.0, 10.0, 1)]),
            mock_block(vec![mock_line("far below", 72.0, 500.0, 10.0, 1)]),
        ]]);
        assert_eq!(paragraph_sizes(&doc), vec![1, 1]);
    }

    #[test]
    fn test_empty_document_has_no_paragraphs() {
        let doc = document(vec![vec![]]);
        assert!(ParagraphMerger::default().merge(&doc).is_empty());
    }
}
