//! Rejoining of words split across a line break by a hyphen.
//!
//! PDFs often contain text like:
//! - "Govern-" (line 1) + "ment" (line 2) → "Government"
//! - "well-" (line 1) + "known" (line 2) → kept apart, a listed compound
//!
//! The dehyphenator walks each paragraph's lines in order. When a line's last
//! word ends in a continuation hyphen and the next line starts with a
//! lowercase letter, the next line's first word is moved onto the hyphenated
//! word. The hyphen glyph stays in the word's characters but leaves its text.
//!
//! Words never move between pages. When the break falls on a page boundary
//! inside a paragraph, the join is recorded on the paragraph instead and
//! [`Document::paragraph_text`] writes the word whole.
//!
//! The transform is one way: the original split is only recoverable from the
//! character geometry.
//!
//! Soft hyphens (U+00AD) mark optional break points and always join. Hard
//! hyphens are kept when the combined word is a dictionary-listed compound
//! ("self-regulation") or the fragment is a capitalized standalone word from
//! the dictionary ("New-", "Anglo-").

use crate::document::Document;
use crate::elements::{BlockRef, TextLine};
use crate::pipeline::PipelineConfig;
use std::collections::HashSet;

const SOFT_HYPHEN: char = '\u{00AD}';

/// Compounds written with a hyphen.
const HYPHENATED_COMPOUNDS: &[&str] = &[
    "self-aware", "self-esteem", "self-regulation", "self-supervised", "non-linear",
    "non-trivial", "non-zero", "well-known", "well-defined", "state-of-the-art", "end-to-end",
    "real-time", "long-term", "short-term", "high-level", "low-level", "co-author",
    "cross-validation", "multi-task", "pre-trained", "fine-tuning", "large-scale",
    "open-source", "e-mail", "x-ray", "up-to-date", "follow-up", "trade-off", "first-order",
    "second-order", "two-dimensional", "three-dimensional",
];

/// Capitalized words that stand alone in hyphenated proper nouns.
const STANDALONE_WORDS: &[&str] = &[
    "new", "north", "south", "east", "west", "anglo", "franco", "sino", "indo", "euro", "afro",
    "greco", "austro", "saint", "jean", "marie", "hans", "karl", "mary", "ann", "baden", "rhein",
    "schleswig", "alsace", "emilia", "trentino", "friuli",
];

/// Joins hyphenated words across line breaks.
#[derive(Debug, Clone)]
pub struct Dehyphenator {
    /// Lowercased standalone words
    dictionary: HashSet<String>,
    /// Lowercased hyphenated compounds
    compounds: HashSet<String>,
}

impl Default for Dehyphenator {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of a line: block and index inside the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineRef {
    block: BlockRef,
    line: usize,
}

impl Dehyphenator {
    /// Create a dehyphenator with the built-in dictionary.
    pub fn new() -> Self {
        Self {
            dictionary: STANDALONE_WORDS.iter().map(|w| w.to_string()).collect(),
            compounds: HYPHENATED_COMPOUNDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Create a dehyphenator with the configured extra dictionary words.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new().with_words(config.dehyphenation_dictionary.iter().map(String::as_str))
    }

    /// Add dictionary entries. Entries with a hyphen are compounds, the rest
    /// standalone words.
    pub fn with_words<'a, I>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for word in words {
            let lower = word.trim().to_lowercase();
            if lower.contains('-') {
                self.compounds.insert(lower);
            } else {
                self.dictionary.insert(lower);
            }
        }
        self
    }

    /// Check if a word ends with a continuation hyphen: a hard or soft hyphen
    /// with a letter before it.
    pub fn is_continuation_hyphen(text: &str) -> bool {
        let trimmed = text.trim_end();
        let mut chars = trimmed.chars().rev();
        match chars.next() {
            Some('-') | Some(SOFT_HYPHEN) => chars.next().is_some_and(char::is_alphabetic),
            _ => false,
        }
    }

    /// Decide whether `word` (ending in a hyphen) joins with `continuation`.
    pub fn should_join(&self, word: &str, continuation: &str) -> bool {
        if !Self::is_continuation_hyphen(word) {
            return false;
        }
        if !continuation.chars().next().is_some_and(char::is_lowercase) {
            return false;
        }

        let trimmed = word.trim_end();
        if trimmed.ends_with(SOFT_HYPHEN) {
            return true;
        }

        let without_hyphen = &trimmed[..trimmed.len() - 1];
        if self.is_compound(without_hyphen, continuation) {
            return false;
        }
        let fragment = without_hyphen.rsplit('-').next().unwrap_or(without_hyphen);
        let capitalized = fragment.chars().next().is_some_and(char::is_uppercase);
        !(capitalized && self.dictionary.contains(&fragment.to_lowercase()))
    }

    /// True when `head-tail`, or its part after any inner hyphen, is a listed
    /// compound.
    fn is_compound(&self, head: &str, continuation: &str) -> bool {
        let tail = continuation.trim_end_matches(|c: char| !c.is_alphanumeric());
        let combined = format!("{}-{}", head, tail).to_lowercase();
        std::iter::once(0)
            .chain(combined.match_indices('-').map(|(i, _)| i + 1))
            .any(|start| self.compounds.contains(&combined[start..]))
    }

    /// Join hyphenated words in `doc`. Returns the number of joins.
    ///
    /// Emptied lines and blocks are removed and paragraph references are
    /// re-indexed.
    pub fn dehyphenate(&self, doc: &mut Document) -> usize {
        let by_paragraph = !doc.paragraphs.is_empty();
        let groups: Vec<Vec<BlockRef>> = if by_paragraph {
            doc.paragraphs.iter().map(|p| p.blocks.clone()).collect()
        } else {
            doc.blocks().map(|(at, _)| vec![at]).collect()
        };

        let mut joins = 0;
        let mut touched: HashSet<BlockRef> = HashSet::new();

        for (paragraph, group) in groups.into_iter().enumerate() {
            let sequence: Vec<LineRef> = group
                .iter()
                .filter_map(|at| doc.block(*at).map(|block| (*at, block.lines().len())))
                .flat_map(|(block, count)| (0..count).map(move |line| LineRef { block, line }))
                .collect();

            let mut iter = sequence.into_iter();
            let Some(mut current) = iter.next() else {
                continue;
            };
            for next in iter {
                let same_page = current.block.page_index == next.block.page_index;
                if same_page && self.join(doc, current, next) {
                    joins += 1;
                    touched.insert(current.block);
                    touched.insert(next.block);
                } else if !same_page && by_paragraph && self.qualifies(doc, current, next) {
                    let recorded = &mut doc.paragraphs[paragraph].page_break_joins;
                    if !recorded.contains(&current.block) {
                        log::trace!("Joining across page break after {:?}", current.block);
                        recorded.push(current.block);
                        joins += 1;
                    }
                }
                let next_empty = line(doc, next).map_or(true, |l| l.is_empty());
                if !next_empty || !same_page {
                    current = next;
                }
            }
        }

        if !touched.is_empty() {
            compact(doc, &touched);
        }
        if joins > 0 {
            log::debug!("Joined {} hyphenated words", joins);
        }
        joins
    }

    /// True when the last word of `current` joins the first word of `next`.
    fn qualifies(&self, doc: &Document, current: LineRef, next: LineRef) -> bool {
        match (line(doc, current), line(doc, next)) {
            (Some(a), Some(b)) => match (a.last_word(), b.first_word()) {
                (Some(last), Some(first)) => self.should_join(last.text(), first.text()),
                _ => false,
            },
            _ => false,
        }
    }

    /// Move the first word of `next` onto the last word of `current` when the
    /// pair qualifies.
    fn join(&self, doc: &mut Document, current: LineRef, next: LineRef) -> bool {
        if !self.qualifies(doc, current, next) {
            return false;
        }

        let Some(continuation) = line_mut(doc, next).and_then(|l| l.take_first_word()) else {
            return false;
        };
        match line_mut(doc, current) {
            Some(target) => {
                log::trace!(
                    "Joining {:?} with {:?}",
                    target.last_word().map(|w| w.text()),
                    continuation.text()
                );
                target.map_last_word(|word| word.join_hyphenated(continuation));
                true
            },
            None => false,
        }
    }
}

fn line(doc: &Document, at: LineRef) -> Option<&TextLine> {
    doc.block(at.block)?.lines().get(at.line)
}

fn line_mut(doc: &mut Document, at: LineRef) -> Option<&mut TextLine> {
    doc.pages
        .get_mut(at.block.page_index)?
        .blocks
        .get_mut(at.block.block_index)?
        .lines_mut()
        .get_mut(at.line)
}

/// Refresh touched blocks, drop emptied ones and re-index paragraphs.
fn compact(doc: &mut Document, touched: &HashSet<BlockRef>) {
    let mut remap: Vec<Vec<Option<usize>>> = Vec::with_capacity(doc.pages.len());

    for (page_index, page) in doc.pages.iter_mut().enumerate() {
        let mut mapping = Vec::with_capacity(page.blocks.len());
        let mut kept = 0;
        for (block_index, block) in page.blocks.iter_mut().enumerate() {
            if touched.contains(&BlockRef::new(page_index, block_index)) {
                block.refresh();
            }
            if block.is_empty() {
                mapping.push(None);
            } else {
                mapping.push(Some(kept));
                kept += 1;
            }
        }
        page.blocks.retain(|b| !b.is_empty());
        remap.push(mapping);
    }

    let reindex = |refs: &[BlockRef]| -> Vec<BlockRef> {
        refs.iter()
            .filter_map(|at| {
                let new_index = (*remap.get(at.page_index)?.get(at.block_index)?)?;
                Some(BlockRef::new(at.page_index, new_index))
            })
            .collect()
    };
    for paragraph in &mut doc.paragraphs {
        paragraph.blocks = reindex(&paragraph.blocks);
        paragraph.page_break_joins = reindex(&paragraph.page_break_joins);
    }
    doc.paragraphs.retain(|p| !p.blocks.is_empty());
    doc.refresh_paragraph_bounds();
}

/// Dehyphenate the document if enabled in `config`.
pub fn dehyphenate_document(doc: &mut Document, config: &PipelineConfig) -> usize {
    if !config.dehyphenate_enabled {
        return 0;
    }
    Dehyphenator::from_config(config).dehyphenate(doc)
}
