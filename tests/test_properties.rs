//! Property tests over generated pages.
//!
//! Pages are random grids of lowercase words in one or two columns. The
//! properties hold for every such page: each glyph ends up in exactly one
//! word, element boxes are unions of their parts, segmentation is
//! deterministic and classification is idempotent.

use pdf_strata::document::{DecodedElement, DecodedPage};
use pdf_strata::elements::Font;
use pdf_strata::layout::statistics::{quantize, DocumentOrder, FrequencyTable};
use pdf_strata::semantics;
use pdf_strata::{Document, Pipeline, PipelineConfig, Rect};
use proptest::prelude::*;
use std::sync::Arc;

/// One generated line: column, then word lengths.
type LineSpec = (usize, Vec<usize>);

fn line_spec() -> impl Strategy<Value = LineSpec> {
    (0usize..2, prop::collection::vec(1usize..8, 1..6))
}

fn page_spec() -> impl Strategy<Value = Vec<LineSpec>> {
    prop::collection::vec(line_spec(), 1..16)
}

fn build_document(lines: &[LineSpec]) -> Document {
    let font = Arc::new(Font::from_name("Times-Roman"));
    let size = 10.0;
    let advance = 5.0;
    let mut page = DecodedPage::new(1, [0.0, 0.0, 612.0, 792.0]);

    for (row, (column, words)) in lines.iter().enumerate() {
        let y = 720.0 - row as f32 * 12.0;
        let mut x = if *column == 0 { 72.0 } else { 330.0 };
        for (w, length) in words.iter().enumerate() {
            if w > 0 {
                page = page.with_element(DecodedElement::glyph(' ', [x, y, x + advance, y + size], &font, size));
                x += advance;
            }
            for i in 0..*length {
                let c = char::from(b'a' + ((row + w + i) % 26) as u8);
                page = page.with_element(DecodedElement::glyph(c, [x, y, x + advance, y + size], &font, size));
                x += advance;
            }
        }
    }
    Document::from_decoded(vec![page]).unwrap()
}

fn run(doc: Document) -> Document {
    Pipeline::new(PipelineConfig::default()).unwrap().run(doc).unwrap()
}

proptest! {
    #[test]
    fn prop_every_glyph_in_exactly_one_word(lines in page_spec()) {
        let doc = run(build_document(&lines));
        let page = &doc.pages()[0];

        let mut expected: Vec<usize> = page
            .characters()
            .iter()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.sequence)
            .collect();
        let mut found: Vec<usize> = page
            .blocks()
            .iter()
            .flat_map(|b| b.lines())
            .flat_map(|l| l.words())
            .flat_map(|w| w.characters())
            .map(|c| c.sequence)
            .collect();
        expected.sort_unstable();
        found.sort_unstable();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn prop_boxes_are_unions_of_parts(lines in page_spec()) {
        let doc = run(build_document(&lines));
        for (_, block) in doc.blocks() {
            let union = Rect::union_all(block.lines().iter().map(|l| l.rect()).collect::<Vec<_>>().iter());
            prop_assert_eq!(Some(block.rect()), union);
            for line in block.lines() {
                let union = Rect::union_all(line.words().iter().map(|w| w.rect()).collect::<Vec<_>>().iter());
                prop_assert_eq!(Some(line.rect()), union);
            }
        }
    }

    #[test]
    fn prop_segmentation_is_deterministic(lines in page_spec()) {
        let a = run(build_document(&lines));
        let b = run(build_document(&lines));
        let layout = |d: &Document| {
            d.blocks().map(|(_, block)| (block.rect(), block.text())).collect::<Vec<_>>()
        };
        prop_assert_eq!(layout(&a), layout(&b));
    }

    #[test]
    fn prop_classification_is_idempotent(lines in page_spec()) {
        let config = PipelineConfig::default();
        let mut doc = run(build_document(&lines));
        let before: Vec<_> = doc.blocks().map(|(_, b)| b.role()).collect();

        prop_assert_eq!(semantics::classify(&mut doc, &config), 0);
        let after: Vec<_> = doc.blocks().map(|(_, b)| b.role()).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_frequency_merge_is_commutative(
        a in prop::collection::vec(6.0f32..14.0, 0..40),
        b in prop::collection::vec(6.0f32..14.0, 0..40),
    ) {
        let table = |values: &[f32], page: u32| {
            let mut table = FrequencyTable::new();
            for (i, v) in values.iter().enumerate() {
                table.add(quantize(*v), DocumentOrder::new(page, i));
            }
            table
        };
        let mut ab = table(&a, 1);
        ab.merge(&table(&b, 2));
        let mut ba = table(&b, 2);
        ba.merge(&table(&a, 1));

        prop_assert_eq!(ab.mode(), ba.mode());
        prop_assert_eq!(ab.total(), a.len() + b.len());
    }
}
