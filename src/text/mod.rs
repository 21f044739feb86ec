//! Repairs of line-break and glyph artifacts in extracted words.

pub mod hyphenation;
pub mod ligature;

pub use hyphenation::Dehyphenator;
pub use ligature::{expand_ligature, split_ligature, split_page_ligatures};
