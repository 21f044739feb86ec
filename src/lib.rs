// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::should_implement_trait)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Strata
//!
//! Document structure and semantics for text decoded from PDF pages.
//!
//! A PDF decoder yields a flat stream of positioned glyphs, shapes and images.
//! This crate turns it into words, text lines, text blocks and paragraphs, and
//! labels every block with a semantic [`Role`] (title, heading, body, caption,
//! footnote, …).
//!
//! ## Stages
//!
//! - **Filter**: drop page-sized single-color figures and decorative shapes
//! - **Statistics**: font size, character pitch and line pitch histograms
//! - **Tokenization**: characters → words → lines
//! - **XY-Cut**: recursive whitespace cuts split the page into blocks
//! - **Normalization**: ligature splitting and dehyphenation
//! - **Paragraphs**: blocks merged across columns and pages
//! - **Semantics**: an ordered list of classification modules
//!
//! ## Quick Start
//!
//! ```
//! use pdf_strata::document::{DecodedElement, DecodedPage};
//! use pdf_strata::elements::Font;
//! use pdf_strata::{Document, Pipeline, PipelineConfig};
//! use std::sync::Arc;
//!
//! # fn main() -> pdf_strata::Result<()> {
//! let font = Arc::new(Font::from_name("Times-Roman"));
//! let mut page = DecodedPage::new(1, [0.0, 0.0, 612.0, 792.0]);
//! for (i, c) in "Hello world".chars().enumerate() {
//!     let x = 72.0 + i as f32 * 5.0;
//!     page = page.with_element(DecodedElement::glyph(c, [x, 700.0, x + 5.0, 710.0], &font, 10.0));
//! }
//!
//! let doc = Document::from_decoded(vec![page])?;
//! let doc = Pipeline::new(PipelineConfig::default())?.run(doc)?;
//!
//! let paragraph = &doc.paragraphs()[0];
//! assert_eq!(doc.paragraph_text(paragraph), "Hello world");
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Every threshold is an option of [`PipelineConfig`]. A JSON object may
//! override any subset:
//!
//! ```
//! use pdf_strata::PipelineConfig;
//!
//! let config = PipelineConfig::from_json(r#"{"minColumnGapWidthFactor": 3.0}"#).unwrap();
//! assert_eq!(config.min_column_gap_width_factor, 3.0);
//! assert_eq!(config.line_overlap_ratio, 0.5);
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Core model
pub mod document;
pub mod elements;
pub mod geometry;

// Analysis
pub mod layout;
pub mod semantics;
pub mod text;

// Orchestration
pub mod pipeline;

pub use document::{DecodedElement, DecodedPage, Document, Page};
pub use elements::{Paragraph, Role, TextBlock, TextLine, Word};
pub use error::{Error, Result};
pub use geometry::{Point, Rect};
pub use pipeline::{Pipeline, PipelineConfig, Stage};
pub use semantics::SemanticModule;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
