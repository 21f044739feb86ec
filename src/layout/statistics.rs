//! Typographic statistics for adaptive layout analysis.
//!
//! Fixed thresholds ("a gap wider than 10pt is a column gutter") work poorly
//! across documents set at 8pt and at 14pt. Every threshold in the pipeline is
//! therefore a factor applied to a value measured here: the most common font
//! size, the typical character pitch, the typical line pitch.
//!
//! ## Frequency tables
//!
//! A statistic is a set of frequency tables, one per observed property. The
//! reported value is the mode of the table. Ties go to the value that was
//! observed first in document order, so results are reproducible.
//!
//! Statistics of parts (lines, pages) combine into statistics of the whole by
//! summing the raw tables. Averaging the modes of the parts would be wrong:
//! the mode of a union is not the mean of the modes. Each entry remembers the
//! earliest position it was seen at and merging keeps the minimum, which makes
//! [`TextStatistic::merge`] associative and commutative while keeping the
//! "first seen" tie-break meaningful.
//!
//! Nothing in this module fails. Empty input gives an empty statistic whose
//! accessors return `None`.

use crate::elements::{Character, Color, TextLine, Word};
use ordered_float::OrderedFloat;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Hashable float key, quantised to 0.1 units.
pub type FloatKey = OrderedFloat<f32>;

/// Quantise a measurement to one decimal so near-identical values share a bin.
///
/// # Examples
///
/// ```
/// use pdf_strata::layout::statistics::quantize;
///
/// assert_eq!(quantize(9.96).into_inner(), 10.0);
/// assert_eq!(quantize(10.04), quantize(10.0));
/// ```
pub fn quantize(value: f32) -> FloatKey {
    OrderedFloat((value * 10.0).round() / 10.0)
}

/// Position of an observation in the document: page, then index on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DocumentOrder {
    /// 1-based page number
    pub page: u32,
    /// Index of the observed element within its page
    pub index: usize,
}

impl DocumentOrder {
    /// Create a new document position.
    pub fn new(page: u32, index: usize) -> Self {
        Self { page, index }
    }

    fn of(character: &Character) -> Self {
        Self::new(character.page, character.sequence)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Observation {
    count: usize,
    first_seen: DocumentOrder,
}

/// Mapping from observed value to frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable<K: Eq + Hash> {
    entries: HashMap<K, Observation>,
}

impl<K: Eq + Hash> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Ord + Clone> FrequencyTable<K> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation of `key` at `at`.
    pub fn add(&mut self, key: K, at: DocumentOrder) {
        self.add_count(key, 1, at);
    }

    /// Record `count` observations of `key`, the earliest of them at `at`.
    pub fn add_count(&mut self, key: K, count: usize, at: DocumentOrder) {
        if count == 0 {
            return;
        }
        let entry = self.entries.entry(key).or_insert(Observation {
            count: 0,
            first_seen: at,
        });
        entry.count += count;
        if at < entry.first_seen {
            entry.first_seen = at;
        }
    }

    /// Add all counts of `other` to this table.
    pub fn merge(&mut self, other: &FrequencyTable<K>) {
        for (key, observation) in &other.entries {
            self.add_count(key.clone(), observation.count, observation.first_seen);
        }
    }

    /// Most frequent value; ties go to the earliest observation.
    pub fn mode(&self) -> Option<&K> {
        self.entries
            .iter()
            .max_by(|(key_a, a), (key_b, b)| {
                a.count
                    .cmp(&b.count)
                    .then_with(|| b.first_seen.cmp(&a.first_seen))
                    .then_with(|| key_b.cmp(key_a))
            })
            .map(|(key, _)| key)
    }

    /// Frequency of `key`.
    pub fn count(&self, key: &K) -> usize {
        self.entries.get(key).map_or(0, |o| o.count)
    }

    /// Sum of all frequencies.
    pub fn total(&self) -> usize {
        self.entries.values().map(|o| o.count).sum()
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been observed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sum and count, mergeable without losing precision of the mean.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunningMean {
    sum: f64,
    count: usize,
}

impl RunningMean {
    /// Add one value.
    pub fn add(&mut self, value: f32) {
        self.sum += value as f64;
        self.count += 1;
    }

    /// Add the values of another mean.
    pub fn merge(&mut self, other: &RunningMean) {
        self.sum += other.sum;
        self.count += other.count;
    }

    /// The mean, `None` when empty.
    pub fn mean(&self) -> Option<f32> {
        (self.count > 0).then(|| (self.sum / self.count as f64) as f32)
    }
}

/// Aggregated typography of a set of characters, lines, blocks or pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStatistic {
    font_sizes: FrequencyTable<FloatKey>,
    font_families: FrequencyTable<String>,
    colors: FrequencyTable<[u8; 3]>,
    char_pitches: FrequencyTable<FloatKey>,
    char_pitch_mean: RunningMean,
    char_width_mean: RunningMean,
    line_pitches: FrequencyTable<FloatKey>,
    line_gaps: FrequencyTable<FloatKey>,
    character_count: usize,
    bold_count: usize,
    italic_count: usize,
}

impl TextStatistic {
    /// Create an empty statistic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the font, color and width of a character. Whitespace is ignored.
    pub fn add_character(&mut self, character: &Character) {
        if character.is_whitespace() {
            return;
        }
        let at = DocumentOrder::of(character);
        self.font_sizes.add(quantize(character.font_size), at);
        self.font_families.add(character.font.family.clone(), at);
        self.colors.add(character.color.to_rgb8(), at);
        self.char_width_mean.add(character.rect.width());
        self.character_count += 1;
        if character.is_bold() {
            self.bold_count += 1;
        }
        if character.font.is_italic {
            self.italic_count += 1;
        }
    }

    /// Record the distance between two adjacent character origins.
    pub fn add_char_pitch(&mut self, pitch: f32, at: DocumentOrder) {
        self.char_pitches.add(quantize(pitch), at);
        self.char_pitch_mean.add(pitch);
    }

    /// Record the distance between two consecutive baselines.
    pub fn add_line_pitch(&mut self, pitch: f32, at: DocumentOrder) {
        self.line_pitches.add(quantize(pitch), at);
    }

    /// Record the whitespace between two consecutive lines.
    pub fn add_line_gap(&mut self, gap: f32, at: DocumentOrder) {
        self.line_gaps.add(quantize(gap), at);
    }

    /// Add the raw counts of `other` to this statistic.
    pub fn merge(&mut self, other: &TextStatistic) {
        self.font_sizes.merge(&other.font_sizes);
        self.font_families.merge(&other.font_families);
        self.colors.merge(&other.colors);
        self.char_pitches.merge(&other.char_pitches);
        self.char_pitch_mean.merge(&other.char_pitch_mean);
        self.char_width_mean.merge(&other.char_width_mean);
        self.line_pitches.merge(&other.line_pitches);
        self.line_gaps.merge(&other.line_gaps);
        self.character_count += other.character_count;
        self.bold_count += other.bold_count;
        self.italic_count += other.italic_count;
    }

    /// Combine a list of statistics into one by re-summing their tables.
    pub fn combine<'a, I>(statistics: I) -> TextStatistic
    where
        I: IntoIterator<Item = &'a TextStatistic>,
    {
        let mut combined = TextStatistic::new();
        for statistic in statistics {
            combined.merge(statistic);
        }
        combined
    }

    /// Most common font size.
    pub fn most_common_font_size(&self) -> Option<f32> {
        self.font_sizes.mode().map(|k| k.into_inner())
    }

    /// Most common font family.
    pub fn most_common_font_family(&self) -> Option<&str> {
        self.font_families.mode().map(String::as_str)
    }

    /// Most common text color.
    pub fn most_common_color(&self) -> Option<Color> {
        self.colors.mode().map(|rgb| Color::from_rgb8(*rgb))
    }

    /// Most common distance between adjacent character origins.
    pub fn most_common_char_pitch(&self) -> Option<f32> {
        self.char_pitches.mode().map(|k| k.into_inner())
    }

    /// Mean distance between adjacent character origins.
    pub fn average_char_pitch(&self) -> Option<f32> {
        self.char_pitch_mean.mean()
    }

    /// Mean glyph width.
    pub fn average_char_width(&self) -> Option<f32> {
        self.char_width_mean.mean()
    }

    /// Most common baseline-to-baseline distance.
    pub fn most_common_line_pitch(&self) -> Option<f32> {
        self.line_pitches.mode().map(|k| k.into_inner())
    }

    /// Most common whitespace between consecutive lines.
    pub fn most_common_line_gap(&self) -> Option<f32> {
        self.line_gaps.mode().map(|k| k.into_inner())
    }

    /// Font size, falling back to `default` on empty input.
    pub fn font_size_or(&self, default: f32) -> f32 {
        self.most_common_font_size().unwrap_or(default)
    }

    /// Character pitch for thresholds.
    ///
    /// Falls back to the average glyph width, then to half the font size,
    /// then to `default`.
    pub fn char_pitch_or(&self, default: f32) -> f32 {
        self.most_common_char_pitch()
            .filter(|p| *p > 0.0)
            .or_else(|| self.average_char_width().filter(|w| *w > 0.0))
            .or_else(|| self.most_common_font_size().map(|s| s * 0.5))
            .unwrap_or(default)
    }

    /// Line pitch for thresholds, falling back to 1.2 × font size, then `default`.
    pub fn line_pitch_or(&self, default: f32) -> f32 {
        self.most_common_line_pitch()
            .filter(|p| *p > 0.0)
            .or_else(|| self.most_common_font_size().map(|s| s * 1.2))
            .unwrap_or(default)
    }

    /// Number of non-whitespace characters observed.
    pub fn character_count(&self) -> usize {
        self.character_count
    }

    /// Share of characters set in a bold font, in `[0, 1]`.
    pub fn bold_ratio(&self) -> f32 {
        ratio(self.bold_count, self.character_count)
    }

    /// Share of characters set in an italic font, in `[0, 1]`.
    pub fn italic_ratio(&self) -> f32 {
        ratio(self.italic_count, self.character_count)
    }

    /// Font size frequencies.
    pub fn font_sizes(&self) -> &FrequencyTable<FloatKey> {
        &self.font_sizes
    }

    /// Font family frequencies.
    pub fn font_families(&self) -> &FrequencyTable<String> {
        &self.font_families
    }

    /// Character pitch frequencies.
    pub fn char_pitches(&self) -> &FrequencyTable<FloatKey> {
        &self.char_pitches
    }

    /// Line pitch frequencies.
    pub fn line_pitches(&self) -> &FrequencyTable<FloatKey> {
        &self.line_pitches
    }
}

fn ratio(part: usize, whole: usize) -> f32 {
    if whole == 0 {
        0.0
    } else {
        part as f32 / whole as f32
    }
}

/// Two characters are adjacent on one baseline when their vertical centers
/// differ by at most this fraction of the larger font size.
const SAME_BASELINE_FRACTION: f32 = 0.5;

/// Origins further apart than this many font sizes are not a pitch sample.
const MAX_PITCH_FONT_SIZES: f32 = 3.0;

fn pitch_between(prev: &Character, next: &Character) -> Option<f32> {
    let size = prev.font_size.max(next.font_size).max(f32::EPSILON);
    let dy = (prev.rect.center().y - next.rect.center().y).abs();
    let dx = next.rect.min_x() - prev.rect.min_x();
    (dy <= size * SAME_BASELINE_FRACTION && dx > 0.0 && dx <= size * MAX_PITCH_FONT_SIZES)
        .then_some(dx)
}

/// Statistic over raw characters in decoder order.
///
/// Character pitch samples come from consecutive non-whitespace glyphs on the
/// same baseline; a whitespace glyph interrupts adjacency.
pub fn characters_statistic(characters: &[Arc<Character>]) -> TextStatistic {
    let mut statistic = TextStatistic::new();
    let mut previous: Option<&Character> = None;

    for character in characters {
        if character.is_whitespace() {
            previous = None;
            continue;
        }
        statistic.add_character(character);
        if let Some(prev) = previous {
            if let Some(pitch) = pitch_between(prev, character) {
                statistic.add_char_pitch(pitch, DocumentOrder::of(character));
            }
        }
        previous = Some(character);
    }

    statistic
}

/// Statistic over the characters of a run of words.
///
/// Pitch samples are taken inside words only, so inter-word spaces do not
/// inflate the character pitch.
pub fn words_statistic(words: &[Word]) -> TextStatistic {
    let mut statistic = TextStatistic::new();
    for word in words {
        let characters = word.characters();
        for character in characters {
            statistic.add_character(character);
        }
        for pair in characters.windows(2) {
            if let Some(pitch) = pitch_between(&pair[0], &pair[1]) {
                statistic.add_char_pitch(pitch, DocumentOrder::of(&pair[1]));
            }
        }
    }
    statistic
}

/// Line pitch and line gap samples for lines sorted top to bottom.
///
/// Each line is paired with the nearest following line that sits below it and
/// shares part of its x-range, so interleaved columns are measured per column.
pub fn line_spacing_statistic(lines: &[TextLine]) -> TextStatistic {
    let mut statistic = TextStatistic::new();

    for (i, line) in lines.iter().enumerate() {
        let below = lines[i + 1..].iter().find(|next| {
            next.baseline() < line.baseline() && line.rect().horizontal_overlap(&next.rect()) > 0.0
        });
        if let Some(next) = below {
            let at = DocumentOrder::new(line.page_number(), i);
            statistic.add_line_pitch(line.baseline() - next.baseline(), at);
            statistic.add_line_gap((line.rect().min_y() - next.rect().max_y()).max(0.0), at);
        }
    }

    statistic
}

/// Statistic of a set of lines: their character statistics combined, plus
/// line pitch and line gap samples.
pub fn lines_statistic(lines: &[TextLine]) -> TextStatistic {
    let mut statistic = TextStatistic::combine(lines.iter().map(TextLine::statistic));
    statistic.merge(&line_spacing_statistic(lines));
    statistic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Font;
    use crate::geometry::Rect;

    fn mock_char(c: char, x: f32, size: f32, family: &str, sequence: usize) -> Arc<Character> {
        Arc::new(Character::new(
            c,
            Arc::new(Font::from_name(family)),
            size,
            Color::black(),
            Rect::new(x, 0.0, x + 1.0, size).unwrap(),
            1,
            sequence,
        ))
    }

    #[test]
    fn test_mode_prefers_highest_count() {
        let mut table = FrequencyTable::new();
        table.add(quantize(10.0), DocumentOrder::new(1, 0));
        table.add(quantize(12.0), DocumentOrder::new(1, 1));
        table.add(quantize(12.0), DocumentOrder::new(1, 2));
        assert_eq!(table.mode().map(|k| k.into_inner()), Some(12.0));
        assert_eq!(table.total(), 3);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_mode_tie_broken_by_first_seen() {
        let mut table = FrequencyTable::new();
        table.add("later".to_string(), DocumentOrder::new(2, 0));
        table.add("earlier".to_string(), DocumentOrder::new(1, 5));
        assert_eq!(table.mode().map(String::as_str), Some("earlier"));
    }

    #[test]
    fn test_merge_is_commutative() {
        let mut a = FrequencyTable::new();
        a.add(1u8, DocumentOrder::new(1, 3));
        a.add(2u8, DocumentOrder::new(1, 4));
        let mut b = FrequencyTable::new();
        b.add(2u8, DocumentOrder::new(2, 0));
        b.add(1u8, DocumentOrder::new(2, 1));

        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);

        assert_eq!(ab, ba);
        // Both values seen twice; value 1 was seen first (page 1, index 3)
        assert_eq!(ab.mode(), Some(&1u8));
    }

    #[test]
    fn test_combine_resums_counts_instead_of_averaging_modes() {
        let mut page1 = TextStatistic::new();
        let mut page2 = TextStatistic::new();
        for i in 0..3 {
            page1.add_character(&mock_char('a', i as f32, 10.0, "Times", i));
        }
        for i in 0..2 {
            page2.add_character(&mock_char('b', i as f32, 12.0, "Times", i));
        }
        for i in 2..4 {
            page2.add_character(&mock_char('c', i as f32, 10.0, "Times", i));
        }

        // Modes are 10 and 12 (tie broken by first seen on page 2); the mean would be 11
        let combined = TextStatistic::combine([&page1, &page2]);
        assert_eq!(combined.most_common_font_size(), Some(10.0));
        assert_eq!(combined.character_count(), 7);
    }

    #[test]
    fn test_empty_statistic_defaults() {
        let empty = TextStatistic::new();
        assert_eq!(empty.most_common_font_size(), None);
        assert_eq!(empty.most_common_font_family(), None);
        assert_eq!(empty.average_char_pitch(), None);
        assert_eq!(empty.font_size_or(11.0), 11.0);
        assert_eq!(empty.char_pitch_or(4.0), 4.0);
        assert_eq!(empty.line_pitch_or(13.0), 13.0);
        assert_eq!(empty.bold_ratio(), 0.0);
        assert_eq!(characters_statistic(&[]), TextStatistic::new());
    }

    #[test]
    fn test_character_pitch_from_positions() {
        let chars: Vec<_> = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0]
            .iter()
            .enumerate()
            .map(|(i, &x)| mock_char('x', x, 1.0, "Helvetica", i))
            .collect();

        let statistic = characters_statistic(&chars);
        assert_eq!(statistic.most_common_char_pitch(), Some(1.0));
        // The 8-unit jump is beyond 3 font sizes and is not a pitch sample
        assert_eq!(statistic.char_pitches().total(), 4);
    }

    #[test]
    fn test_whitespace_interrupts_pitch() {
        let chars = vec![
            mock_char('a', 0.0, 10.0, "Helvetica", 0),
            mock_char(' ', 5.0, 10.0, "Helvetica", 1),
            mock_char('b', 9.0, 10.0, "Helvetica", 2),
        ];
        let statistic = characters_statistic(&chars);
        assert_eq!(statistic.character_count(), 2);
        assert!(statistic.char_pitches().is_empty());
    }

    #[test]
    fn test_bold_ratio() {
        let mut statistic = TextStatistic::new();
        statistic.add_character(&mock_char('a', 0.0, 10.0, "Times-Bold", 0));
        statistic.add_character(&mock_char('b', 1.0, 10.0, "Times-Roman", 1));
        assert_eq!(statistic.bold_ratio(), 0.5);
        assert_eq!(statistic.most_common_font_family(), Some("Times"));
    }
}
