//! Rules of the classification modules.
//!
//! Each rule reads [`DocumentFeatures`] and returns the blocks it claims, in
//! document order. Claims on blocks that already carry a role are ignored by
//! the runner.

use super::features::{BlockFeatures, DocumentFeatures};
use crate::elements::BlockRef;
use crate::pipeline::PipelineConfig;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_CAPTION: Regex =
        Regex::new(r"^(?:Figure|Fig\.|Table|Tab\.|Listing|Algorithm)\s*\d+").unwrap();

    static ref RE_FOOTNOTE_START: Regex = Regex::new(r"^[0-9¹²³⁴⁵⁶⁷⁸⁹⁰*†‡§]").unwrap();

    /// Dot leaders, optionally followed by a page number
    static ref RE_DOT_LEADER: Regex = Regex::new(r"(?:\.\s*){3,}\d*\s*$").unwrap();

    /// A page number after the entry text
    static ref RE_TRAILING_PAGE: Regex = Regex::new(r"\S\s+(?:\d{1,4}|[ivxlc]{1,6})$").unwrap();

    static ref RE_CONTENTS_LABEL: Regex = Regex::new(r"^(?i)(?:table of )?contents$").unwrap();

    static ref RE_REFERENCES_LABEL: Regex =
        Regex::new(r"^(?i)(?:\d+(?:\.\d+)*\.?\s+)?(?:references|bibliography|works cited)$").unwrap();
}

/// Pages, counted from the first, on which an abstract may appear.
const ABSTRACT_PAGES: usize = 2;

/// Maximum number of lines of a running header or footer.
const MARGIN_MAX_LINES: usize = 2;

fn claim<'a, I>(blocks: I) -> Vec<BlockRef>
where
    I: Iterator<Item = &'a BlockFeatures>,
{
    blocks.map(|b| b.at).collect()
}

fn in_margin_font(block: &BlockFeatures, features: &DocumentFeatures, config: &PipelineConfig) -> bool {
    block.line_count() <= MARGIN_MAX_LINES
        && block.font_size <= features.body_font_size + config.paragraph_font_size_tolerance
}

/// Blocks inside the top margin band.
pub fn page_header(features: &DocumentFeatures, config: &PipelineConfig) -> Vec<BlockRef> {
    claim(features.iter().filter(|b| {
        b.bottom <= config.page_margin_fraction && in_margin_font(b, features, config)
    }))
}

/// Blocks inside the bottom margin band.
pub fn page_footer(features: &DocumentFeatures, config: &PipelineConfig) -> Vec<BlockRef> {
    claim(features.iter().filter(|b| {
        b.top >= 1.0 - config.page_margin_fraction && in_margin_font(b, features, config)
    }))
}

/// The largest-font block in the upper half of the first page, if it is
/// large enough.
pub fn title(features: &DocumentFeatures, config: &PipelineConfig) -> Vec<BlockRef> {
    let min_size = features.body_font_size * config.title_font_size_ratio;
    let mut best: Option<&BlockFeatures> = None;
    for block in features.iter() {
        if block.page_index() != 0 || block.center() > 0.5 || block.font_size < min_size {
            continue;
        }
        if best.is_none_or(|b| block.font_size > b.font_size) {
            best = Some(block);
        }
    }
    best.map(|b| vec![b.at]).unwrap_or_default()
}

fn is_contents_entry(line: &str) -> bool {
    let line = line.trim();
    RE_DOT_LEADER.is_match(line) || RE_TRAILING_PAGE.is_match(line)
}

/// Blocks of table of contents entries.
pub fn table_of_contents(features: &DocumentFeatures, _config: &PipelineConfig) -> Vec<BlockRef> {
    claim(features.iter().filter(|b| {
        let Some(first) = b.lines.first() else {
            return false;
        };
        if b.line_count() > 1 && RE_CONTENTS_LABEL.is_match(first.trim()) {
            return true;
        }
        let entries = b.lines.iter().filter(|l| is_contents_entry(l)).count();
        b.line_count() >= 2 && entries * 2 > b.line_count()
    }))
}

/// Blocks starting with a figure, table, listing or algorithm label.
pub fn caption(features: &DocumentFeatures, _config: &PipelineConfig) -> Vec<BlockRef> {
    claim(features.iter().filter(|b| RE_CAPTION.is_match(&b.text)))
}

/// Small-font blocks in the lower half starting with a note marker.
pub fn footnote(features: &DocumentFeatures, config: &PipelineConfig) -> Vec<BlockRef> {
    let max_size = features.body_font_size * config.footnote_font_size_ratio;
    claim(features.iter().filter(|b| {
        b.font_size < max_size && b.center() > 0.5 && RE_FOOTNOTE_START.is_match(&b.text)
    }))
}

/// Blocks opening with "Abstract", and blocks following an "Abstract" label
/// up to the first numbered section or heading, on the first pages.
pub fn abstract_blocks(features: &DocumentFeatures, config: &PipelineConfig) -> Vec<BlockRef> {
    let mut claimed = Vec::new();
    let mut after_label = false;
    for block in features.iter().take_while(|b| b.page_index() < ABSTRACT_PAGES) {
        if block.section_numbered {
            break;
        }
        if block.label() == "abstract" {
            after_label = true;
            continue;
        }
        let opens = block
            .first_word
            .as_deref()
            .is_some_and(|w| w.trim_end_matches(|c: char| !c.is_alphanumeric()).eq_ignore_ascii_case("abstract"));
        if opens {
            claimed.push(block.at);
        } else if after_label {
            if heading_like(block, features, config) {
                break;
            }
            claimed.push(block.at);
        }
    }
    claimed
}

/// Short block without a final period that stands out by size, weight or
/// numbering.
fn heading_like(block: &BlockFeatures, features: &DocumentFeatures, config: &PipelineConfig) -> bool {
    block.line_count() <= config.heading_max_lines
        && !block.ends_with_period()
        && block.text.chars().any(char::is_alphabetic)
        && (block.font_size >= features.body_font_size * config.heading_font_size_ratio
            || block.bold_ratio >= config.bold_ratio_threshold
            || block.section_numbered)
}

/// Short blocks without a final period that stand out by size, weight or
/// numbering.
pub fn heading(features: &DocumentFeatures, config: &PipelineConfig) -> Vec<BlockRef> {
    claim(features.iter().filter(|b| heading_like(b, features, config)))
}

/// Blocks after a references label, and blocks starting with a citation key.
pub fn reference(features: &DocumentFeatures, _config: &PipelineConfig) -> Vec<BlockRef> {
    let mut claimed = Vec::new();
    let mut after_label = false;
    for block in features.iter() {
        if RE_REFERENCES_LABEL.is_match(&block.text) {
            after_label = true;
            continue;
        }
        if after_label || block.citation_marker {
            claimed.push(block.at);
        }
    }
    claimed
}

/// Blocks starting with a bullet or an enumerator.
pub fn list_item(features: &DocumentFeatures, _config: &PipelineConfig) -> Vec<BlockRef> {
    claim(features.iter().filter(|b| b.list_marker))
}

/// Blocks set in the document's body font.
pub fn body(features: &DocumentFeatures, config: &PipelineConfig) -> Vec<BlockRef> {
    claim(features.iter().filter(|b| {
        (b.font_size - features.body_font_size).abs() <= config.paragraph_font_size_tolerance
            && (features.body_font_family.is_none() || b.font_family == features.body_font_family)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(text: &str, font_size: f32, top: f32, bottom: f32) -> BlockFeatures {
        BlockFeatures {
            at: BlockRef::new(0, 0),
            text: text.to_string(),
            lines: text.lines().map(str::to_string).collect(),
            font_size,
            font_family: Some("Times".to_string()),
            bold_ratio: 0.0,
            italic_ratio: 0.0,
            top,
            bottom,
            first_word: text.split_whitespace().next().map(str::to_string),
            last_word: text.split_whitespace().last().map(str::to_string),
            section_numbered: false,
            list_marker: false,
            citation_marker: false,
        }
    }

    fn document(mut blocks: Vec<BlockFeatures>) -> DocumentFeatures {
        for (i, block) in blocks.iter_mut().enumerate() {
            block.at = BlockRef::new(0, i);
        }
        DocumentFeatures {
            blocks,
            body_font_size: 10.0,
            body_font_family: Some("Times".to_string()),
        }
    }

    #[test]
    fn test_header_and_footer_bands() {
        let doc = document(vec![
            features("Running head", 9.0, 0.02, 0.04),
            features("body text", 10.0, 0.3, 0.5),
            features("12", 10.0, 0.95, 0.97),
        ]);
        let config = PipelineConfig::default();
        assert_eq!(page_header(&doc, &config), vec![BlockRef::new(0, 0)]);
        assert_eq!(page_footer(&doc, &config), vec![BlockRef::new(0, 2)]);
    }

    #[test]
    fn test_title_picks_largest_on_first_page() {
        let doc = document(vec![
            features("Subtitle", 16.0, 0.15, 0.18),
            features("Main Title", 24.0, 0.1, 0.13),
            features("Low Big", 30.0, 0.7, 0.75),
        ]);
        assert_eq!(title(&doc, &PipelineConfig::default()), vec![BlockRef::new(0, 1)]);
    }

    #[test]
    fn test_contents_entries() {
        let doc = document(vec![
            features("Introduction . . . . 1\nMethods ........ 4", 10.0, 0.2, 0.3),
            features("Contents\nIntroduction\nMethods", 10.0, 0.1, 0.2),
            features("a sentence that goes\non like this", 10.0, 0.4, 0.5),
        ]);
        assert_eq!(
            table_of_contents(&doc, &PipelineConfig::default()),
            vec![BlockRef::new(0, 0), BlockRef::new(0, 1)]
        );
    }

    #[test]
    fn test_caption_labels() {
        let doc = document(vec![
            features("Figure 3: Results", 9.0, 0.5, 0.52),
            features("Fig. 2 shows", 9.0, 0.6, 0.62),
            features("Figures are nice", 9.0, 0.7, 0.72),
        ]);
        assert_eq!(
            caption(&doc, &PipelineConfig::default()),
            vec![BlockRef::new(0, 0), BlockRef::new(0, 1)]
        );
    }

    #[test]
    fn test_footnote_requires_small_font_low_on_page() {
        let doc = document(vec![
            features("¹ See the appendix", 8.0, 0.9, 0.92),
            features("* Corresponding author", 8.0, 0.1, 0.12),
            features("1 Introduction", 10.0, 0.9, 0.92),
        ]);
        assert_eq!(footnote(&doc, &PipelineConfig::default()), vec![BlockRef::new(0, 0)]);
    }

    #[test]
    fn test_abstract_after_label_until_numbered_section() {
        let mut numbered = features("1 Introduction", 12.0, 0.6, 0.62);
        numbered.section_numbered = true;
        let doc = document(vec![
            features("Abstract", 12.0, 0.3, 0.32),
            features("We study things.", 10.0, 0.33, 0.4),
            features("More of it.", 10.0, 0.41, 0.5),
            numbered,
            features("Body text.", 10.0, 0.63, 0.7),
        ]);
        assert_eq!(
            abstract_blocks(&doc, &PipelineConfig::default()),
            vec![BlockRef::new(0, 1), BlockRef::new(0, 2)]
        );
    }

    #[test]
    fn test_abstract_stops_at_unnumbered_heading() {
        let mut bold = features("Introduction", 10.0, 0.5, 0.52);
        bold.bold_ratio = 1.0;
        let doc = document(vec![
            features("Abstract", 12.0, 0.3, 0.32),
            features("We study things.", 10.0, 0.33, 0.4),
            bold,
            features("Body text.", 10.0, 0.53, 0.6),
            features("Overview", 14.0, 0.61, 0.63),
        ]);
        assert_eq!(abstract_blocks(&doc, &PipelineConfig::default()), vec![BlockRef::new(0, 1)]);
        assert_eq!(
            heading(&doc, &PipelineConfig::default()),
            vec![BlockRef::new(0, 0), BlockRef::new(0, 2), BlockRef::new(0, 4)]
        );
    }

    #[test]
    fn test_abstract_inline_label() {
        let doc = document(vec![features("Abstract. We study things.", 10.0, 0.3, 0.4)]);
        assert_eq!(abstract_blocks(&doc, &PipelineConfig::default()), vec![BlockRef::new(0, 0)]);
    }

    #[test]
    fn test_heading_rules() {
        let mut bold = features("Related work", 10.0, 0.4, 0.42);
        bold.bold_ratio = 1.0;
        let mut numbered = features("2.1 Setup", 10.0, 0.5, 0.52);
        numbered.section_numbered = true;
        let doc = document(vec![
            features("Results", 14.0, 0.2, 0.22),
            bold,
            numbered,
            features("Large but a sentence.", 14.0, 0.6, 0.62),
            features("plain words", 10.0, 0.7, 0.72),
        ]);
        assert_eq!(
            heading(&doc, &PipelineConfig::default()),
            vec![BlockRef::new(0, 0), BlockRef::new(0, 1), BlockRef::new(0, 2)]
        );
    }

    #[test]
    fn test_references_after_label() {
        let mut keyed = features("[3] Someone. Paper.", 9.0, 0.2, 0.25);
        keyed.citation_marker = true;
        let doc = document(vec![
            keyed,
            features("Body.", 10.0, 0.3, 0.4),
            features("References", 12.0, 0.5, 0.52),
            features("A. Author. A book. 2001.", 9.0, 0.53, 0.56),
        ]);
        assert_eq!(
            reference(&doc, &PipelineConfig::default()),
            vec![BlockRef::new(0, 0), BlockRef::new(0, 3)]
        );
    }

    #[test]
    fn test_body_matches_dominant_typography() {
        let mut other_family = features("sans text", 10.0, 0.3, 0.4);
        other_family.font_family = Some("Helvetica".to_string());
        let doc = document(vec![
            features("body text", 10.2, 0.2, 0.3),
            other_family,
            features("small text", 8.0, 0.5, 0.6),
        ]);
        assert_eq!(body(&doc, &PipelineConfig::default()), vec![BlockRef::new(0, 0)]);
    }
}
