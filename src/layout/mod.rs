//! Layout analysis of decoded pages.
//!
//! The stages run in this order, each reading the output of the previous:
//! - [`filter`]: drops background figures and decorative shapes
//! - [`statistics`]: typography histograms (font size, char pitch, line pitch)
//! - [`words`]: characters → words, split on whitespace and wide gaps
//! - [`lines`]: words → text lines
//! - [`xycut`]: text lines → text blocks by recursive whitespace cuts
//! - [`paragraphs`]: text blocks → paragraphs across columns and pages

pub mod filter;
pub mod lines;
pub mod paragraphs;
pub mod statistics;
pub mod words;
pub mod xycut;

pub use filter::filter_page;
pub use lines::LineTokenizer;
pub use paragraphs::{ParagraphMerger, Succession};
pub use statistics::{FrequencyTable, TextStatistic};
pub use words::WordTokenizer;
pub use xycut::{CutDirection, XYCutSegmenter};
