//! Character-to-word tokenization.
//!
//! Characters are first sorted into horizontal bands: descending vertical
//! center, with a band accepting every character whose center lies within
//! `baseline_tolerance_factor × font size` of the band's running center.
//! Within a band characters run left to right.
//!
//! A word ends at
//! - a whitespace glyph (it is a delimiter and belongs to no word),
//! - a gap between glyph boxes wider than `word_gap_factor × char pitch`,
//! - a glyph whose vertical center leaves the baseline tolerance.
//!
//! A stray glyph with no neighbour becomes a one-character word.

use crate::document::Page;
use crate::elements::{Character, Word};
use crate::layout::statistics::TextStatistic;
use crate::pipeline::PipelineConfig;
use std::cmp::Ordering;
use std::sync::Arc;

/// Tokenizes characters into words.
#[derive(Debug, Clone)]
pub struct WordTokenizer {
    /// Split on gaps wider than this many char pitches
    pub gap_factor: f32,
    /// Baseline tolerance as a fraction of the font size
    pub baseline_tolerance: f32,
}

impl Default for WordTokenizer {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl WordTokenizer {
    /// Create a tokenizer with the thresholds from `config`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            gap_factor: config.word_gap_factor,
            baseline_tolerance: config.baseline_tolerance_factor,
        }
    }

    /// Group `characters` into words, top band first, left to right.
    ///
    /// `char_pitch` is the reference pitch gaps are compared against.
    pub fn tokenize(&self, characters: &[Arc<Character>], char_pitch: f32) -> Vec<Word> {
        let max_gap = self.gap_factor * char_pitch;
        let mut words = Vec::new();

        for band in self.bands(characters) {
            let mut current: Vec<Arc<Character>> = Vec::new();

            for character in band {
                if character.is_whitespace() {
                    flush(&mut current, &mut words);
                    continue;
                }
                if let Some(prev) = current.last() {
                    let gap = character.rect.min_x() - prev.rect.max_x();
                    let size = prev.font_size.max(character.font_size);
                    let drift = (character.rect.center().y - prev.rect.center().y).abs();
                    if gap > max_gap || drift > self.baseline_tolerance * size {
                        flush(&mut current, &mut words);
                    }
                }
                current.push(character);
            }
            flush(&mut current, &mut words);
        }

        words
    }

    /// Sort characters into bands of similar vertical center.
    fn bands(&self, characters: &[Arc<Character>]) -> Vec<Vec<Arc<Character>>> {
        let mut sorted: Vec<&Arc<Character>> = characters.iter().collect();
        sorted.sort_by(|a, b| {
            b.rect
                .center()
                .y
                .total_cmp(&a.rect.center().y)
                .then_with(|| a.rect.min_x().total_cmp(&b.rect.min_x()))
                .then_with(|| a.sequence.cmp(&b.sequence))
        });

        let mut bands: Vec<Vec<Arc<Character>>> = Vec::new();
        let mut band_center = 0.0f32;
        let mut band_size = 0.0f32;

        for character in sorted {
            let center = character.rect.center().y;
            let joins = bands.last().is_some_and(|_| {
                let tolerance = self.baseline_tolerance * band_size.max(character.font_size);
                (band_center - center).abs() <= tolerance
            });

            match bands.last_mut() {
                Some(band) if joins => {
                    band.push(Arc::clone(character));
                    let n = band.len() as f32;
                    band_center += (center - band_center) / n;
                    band_size = band_size.max(character.font_size);
                    continue;
                },
                _ => {},
            }
            bands.push(vec![Arc::clone(character)]);
            band_center = center;
            band_size = character.font_size;
        }

        for band in &mut bands {
            band.sort_by(|a, b| compare_in_band(a, b));
        }
        bands
    }
}

fn compare_in_band(a: &Character, b: &Character) -> Ordering {
    a.rect
        .min_x()
        .total_cmp(&b.rect.min_x())
        .then_with(|| a.sequence.cmp(&b.sequence))
}

fn flush(current: &mut Vec<Arc<Character>>, words: &mut Vec<Word>) {
    if let Some(word) = Word::from_characters(std::mem::take(current)) {
        words.push(word);
    }
}

/// Character pitch to compare gaps against: the page's own measurement when
/// it has one, otherwise the document's, otherwise half the font size.
pub(crate) fn reference_char_pitch(page: &TextStatistic, document: &TextStatistic) -> f32 {
    match page.most_common_char_pitch().filter(|p| *p > 0.0) {
        Some(pitch) => pitch,
        None => document.char_pitch_or(page.char_pitch_or(1.0)),
    }
}

/// Replace the page's words with a fresh tokenization of its characters.
pub fn build_words(page: &mut Page, document: &TextStatistic, config: &PipelineConfig) {
    let pitch = reference_char_pitch(&page.statistic, document);
    let words = WordTokenizer::from_config(config).tokenize(&page.characters, pitch);
    log::debug!(
        "Page {}: {} characters -> {} words (char pitch {:.1})",
        page.number,
        page.characters.len(),
        words.len(),
        pitch
    );
    page.words = words;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Color, Font};
    use crate::geometry::Rect;

    fn mock_char(c: char, x: f32, y: f32, width: f32, size: f32, sequence: usize) -> Arc<Character> {
        Arc::new(Character::new(
            c,
            Arc::new(Font::from_name("Helvetica")),
            size,
            Color::black(),
            Rect::new(x, y, x + width, y + size).unwrap(),
            1,
            sequence,
        ))
    }

    fn row(text: &str, x: f32, y: f32, sequence: usize) -> Vec<Arc<Character>> {
        text.chars()
            .enumerate()
            .map(|(i, c)| mock_char(c, x + i as f32 * 5.0, y, 5.0, 10.0, sequence + i))
            .collect()
    }

    fn texts(words: &[Word]) -> Vec<&str> {
        words.iter().map(Word::text).collect()
    }

    #[test]
    fn test_gap_splits_into_two_words() {
        let chars: Vec<_> = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0]
            .iter()
            .enumerate()
            .map(|(i, &x)| mock_char('x', x, 0.0, 1.0, 1.0, i))
            .collect();

        let words = WordTokenizer::default().tokenize(&chars, 1.0);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].characters().len(), 3);
        assert_eq!(words[1].rect().min_x(), 10.0);
    }

    #[test]
    fn test_whitespace_is_delimiter() {
        let chars = row("hello world", 0.0, 100.0, 0);
        let words = WordTokenizer::default().tokenize(&chars, 5.0);
        assert_eq!(texts(&words), vec!["hello", "world"]);
        let members: usize = words.iter().map(|w| w.characters().len()).sum();
        assert_eq!(members, 10);
    }

    #[test]
    fn test_bands_read_top_to_bottom_regardless_of_decoder_order() {
        let mut chars = row("low", 0.0, 0.0, 0);
        chars.extend(row("high", 0.0, 50.0, 3));
        let words = WordTokenizer::default().tokenize(&chars, 5.0);
        assert_eq!(texts(&words), vec!["high", "low"]);
    }

    #[test]
    fn test_stray_character_kept() {
        let chars = vec![mock_char('§', 300.0, 300.0, 5.0, 10.0, 0)];
        let words = WordTokenizer::default().tokenize(&chars, 5.0);
        assert_eq!(texts(&words), vec!["§"]);
    }

    #[test]
    fn test_baseline_deviation_splits() {
        let mut chars = row("ab", 0.0, 0.0, 0);
        // Same x-run but shifted well above the baseline tolerance
        chars.push(mock_char('c', 10.0, 8.0, 5.0, 10.0, 2));
        let words = WordTokenizer::default().tokenize(&chars, 5.0);
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(WordTokenizer::default().tokenize(&[], 5.0).is_empty());
    }
}
