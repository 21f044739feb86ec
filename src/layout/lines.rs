//! Word-to-line grouping.
//!
//! A word joins an open line when
//! - it overlaps the line's last word vertically by at least
//!   `line_overlap_ratio` of the shorter height,
//! - its bottom edge is within one font size of the line's baseline, and
//! - the horizontal gap from the line's last word is at most
//!   `line_word_gap_factor × char pitch`.
//!
//! The gap condition keeps words on either side of a column gutter in
//! separate lines, which the XY-cut relies on to find the gutter.

use crate::document::Page;
use crate::elements::{TextLine, Word};
use crate::geometry::{compare_reading_order, horizontal_gap_between};
use crate::layout::statistics::TextStatistic;
use crate::layout::words::reference_char_pitch;
use crate::pipeline::PipelineConfig;

/// Groups words into lines.
#[derive(Debug, Clone)]
pub struct LineTokenizer {
    /// Minimum vertical overlap ratio
    pub overlap_ratio: f32,
    /// Maximum in-line gap, in char pitches
    pub word_gap_factor: f32,
}

impl Default for LineTokenizer {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

struct OpenLine {
    words: Vec<Word>,
    baseline: f32,
}

impl LineTokenizer {
    /// Create a tokenizer with the thresholds from `config`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            overlap_ratio: config.line_overlap_ratio,
            word_gap_factor: config.line_word_gap_factor,
        }
    }

    /// Group `words` into lines sorted top to bottom, then left to right.
    pub fn tokenize(&self, words: Vec<Word>, char_pitch: f32) -> Vec<TextLine> {
        let max_gap = self.word_gap_factor * char_pitch;
        let mut open: Vec<OpenLine> = Vec::new();

        for word in words {
            let rect = word.rect();
            let size = word.font_size();
            let target = open.iter().position(|line| {
                let Some(last) = line.words.last() else {
                    return false;
                };
                let last_rect = last.rect();
                let gap = horizontal_gap_between(&last_rect, &rect);
                last_rect.vertical_overlap_ratio(&rect) >= self.overlap_ratio
                    && (line.baseline - rect.min_y()).abs() <= size.max(last.font_size())
                    && rect.min_x() >= last_rect.min_x()
                    && gap <= max_gap
            });

            match target {
                Some(i) => open[i].words.push(word),
                None => open.push(OpenLine {
                    baseline: rect.min_y(),
                    words: vec![word],
                }),
            }
        }

        let mut lines: Vec<TextLine> = open
            .into_iter()
            .filter_map(|line| TextLine::from_words(line.words))
            .collect();
        lines.sort_by(|a, b| compare_reading_order(&a.rect(), &b.rect()));
        lines
    }
}

/// Consume the page's words into lines.
pub fn build_lines(page: &mut Page, document: &TextStatistic, config: &PipelineConfig) {
    let pitch = reference_char_pitch(&page.statistic, document);
    let words = std::mem::take(&mut page.words);
    let word_count = words.len();
    let lines = LineTokenizer::from_config(config).tokenize(words, pitch);
    log::debug!("Page {}: {} words -> {} lines", page.number, word_count, lines.len());
    page.lines = lines;
}
