//! Splitting of ligature glyphs into their letters.
//!
//! Fonts often set "fi", "fl", "ffi" and friends as a single glyph, which the
//! decoder reports as one presentation-form code point (U+FB01 for "fi").
//! Search and dehyphenation need the letters. Each letter gets a share of the
//! ligature box proportional to its advance width in Helvetica and keeps
//! the source glyph's sequence number, so coverage by sequence still holds.

use crate::document::Page;
use crate::elements::Character;
use crate::geometry::Rect;
use std::sync::Arc;
use unicode_normalization::char::decompose_compatible;

/// Helvetica advance widths in 1/1000 em for the letters ligatures contain.
fn advance_width(c: char) -> f32 {
    match c {
        'f' | 't' => 278.0,
        'i' | 'l' | 'j' => 222.0,
        's' => 500.0,
        _ => 556.0,
    }
}

/// True for the Latin ligature presentation forms and the IJ digraphs.
pub fn is_ligature(c: char) -> bool {
    matches!(c, '\u{FB00}'..='\u{FB06}' | '\u{0132}' | '\u{0133}')
}

/// Letters a ligature stands for, `None` for anything else.
///
/// # Examples
///
/// ```
/// use pdf_strata::text::ligature::expand_ligature;
///
/// assert_eq!(expand_ligature('\u{FB03}'), Some(vec!['f', 'f', 'i']));
/// assert_eq!(expand_ligature('a'), None);
/// ```
pub fn expand_ligature(c: char) -> Option<Vec<char>> {
    if !is_ligature(c) {
        return None;
    }
    let mut letters = Vec::with_capacity(3);
    decompose_compatible(c, |d| letters.push(d));
    (letters.len() > 1).then_some(letters)
}

/// Split one ligature glyph, `None` when it is not a ligature.
pub fn split_ligature(character: &Character) -> Option<Vec<Arc<Character>>> {
    let letters = expand_ligature(character.code_point)?;
    let total: f32 = letters.iter().map(|&c| advance_width(c)).sum();
    let rect = character.rect;

    let mut left = rect.min_x();
    let mut consumed = 0.0;
    let parts = letters
        .iter()
        .enumerate()
        .map(|(i, &letter)| {
            consumed += advance_width(letter);
            let right = if i + 1 == letters.len() {
                rect.max_x()
            } else {
                (rect.min_x() + rect.width() * consumed / total).clamp(left, rect.max_x())
            };
            let part = Character {
                code_point: letter,
                rect: Rect::from_ordered(left, rect.min_y(), right, rect.max_y()),
                ligature_source: Some(character.code_point),
                ..character.clone()
            };
            left = right;
            Arc::new(part)
        })
        .collect();
    Some(parts)
}

/// Split every ligature in the page's words. Returns the number of words
/// changed.
pub fn split_page_ligatures(page: &mut Page) -> usize {
    let mut changed = 0;
    let mut expand = |c: &Arc<Character>| split_ligature(c);

    for word in &mut page.words {
        if word.expand_characters(&mut expand) {
            changed += 1;
        }
    }
    for line in &mut page.lines {
        let mut touched = false;
        for word in line.words_mut() {
            if word.expand_characters(&mut expand) {
                touched = true;
                changed += 1;
            }
        }
        if touched {
            line.refresh();
        }
    }
    for block in &mut page.blocks {
        let mut touched_block = false;
        for line in block.lines_mut() {
            let mut touched = false;
            for word in line.words_mut() {
                if word.expand_characters(&mut expand) {
                    touched = true;
                    changed += 1;
                }
            }
            if touched {
                line.refresh();
                touched_block = true;
            }
        }
        if touched_block {
            block.refresh();
        }
    }

    if changed > 0 {
        log::debug!("Page {}: split ligatures in {} words", page.number, changed);
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Color, Font, Word};

    fn glyph(c: char, min_x: f32, max_x: f32) -> Character {
        Character::new(
            c,
            Arc::new(Font::from_name("Times-Roman")),
            10.0,
            Color::black(),
            Rect::new(min_x, 0.0, max_x, 10.0).unwrap(),
            1,
            4,
        )
    }

    #[test]
    fn test_expand_known_ligatures() {
        assert_eq!(expand_ligature('\u{FB01}'), Some(vec!['f', 'i']));
        assert_eq!(expand_ligature('\u{FB02}'), Some(vec!['f', 'l']));
        assert_eq!(expand_ligature('\u{FB06}'), Some(vec!['s', 't']));
        assert_eq!(expand_ligature('\u{0132}'), Some(vec!['I', 'J']));
        assert_eq!(expand_ligature('f'), None);
    }

    #[test]
    fn test_split_proportional_to_advance() {
        // fi: 278 + 222 = 500, so f gets 55.6% of a 10pt box
        let parts = split_ligature(&glyph('\u{FB01}', 0.0, 10.0)).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].code_point, 'f');
        assert!((parts[0].rect.max_x() - 5.56).abs() < 1e-3);
        assert_eq!(parts[1].rect.min_x(), parts[0].rect.max_x());
        assert_eq!(parts[1].rect.max_x(), 10.0);
        for part in &parts {
            assert_eq!(part.sequence, 4);
            assert_eq!(part.ligature_source, Some('\u{FB01}'));
        }
    }

    #[test]
    fn test_word_text_after_split() {
        let chars = vec![
            Arc::new(glyph('\u{FB01}', 0.0, 10.0)),
            Arc::new(glyph('n', 10.0, 15.0)),
            Arc::new(glyph('d', 15.0, 20.0)),
        ];
        let mut word = Word::from_characters(chars).unwrap();
        assert!(word.expand_characters(|c| split_ligature(c)));
        assert_eq!(word.text(), "find");
        assert_eq!(word.rect(), Rect::new(0.0, 0.0, 20.0, 10.0).unwrap());
    }

    #[test]
    fn test_non_ligature_untouched() {
        assert!(split_ligature(&glyph('x', 0.0, 5.0)).is_none());
    }
}
