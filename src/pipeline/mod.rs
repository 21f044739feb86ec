//! The document structure pipeline.
//!
//! ```text
//! DecodedPage[]
//!     ↓  Document::from_decoded (validation)
//! [Filter]               background figures, decorative shapes
//! [CharacterStatistics]  font size and char pitch histograms
//! [Words]                characters → words
//! [Lines]                words → text lines
//! [StatisticsRefresh]    line pitch and line gap histograms
//! [Blocks]               text lines → text blocks (XY-cut)
//! [Ligatures]            "ﬁ" → "f" + "i"
//! [Paragraphs]           text blocks → paragraphs
//! [Dehyphenation]        "exam-" + "ple" → "example"
//! [Semantics]            roles for blocks and paragraphs
//!     ↓
//! Document
//! ```
//!
//! Every stage is a `Document -> Result<Document>` function through
//! [`Stage::apply`], so callers can run stages alone. [`Pipeline`] runs them
//! all in order.
//!
//! Statistics are settled before any per-page stage starts; with
//! `parallelPages` those stages fan out over pages and read the document
//! statistic through a shared reference.

pub mod config;

pub use config::PipelineConfig;

use crate::document::{Document, Page};
use crate::error::{Error, Result};
use crate::layout::statistics::{characters_statistic, lines_statistic, TextStatistic};
use crate::layout::{filter, lines, paragraphs, words, xycut};
use crate::semantics;
use crate::text::{hyphenation, ligature};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// A pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Drop decorative figures and shapes
    Filter,
    /// Page and document statistics over characters
    CharacterStatistics,
    /// Tokenize characters into words
    Words,
    /// Group words into text lines
    Lines,
    /// Page and document statistics over text lines
    StatisticsRefresh,
    /// Segment text lines into text blocks
    Blocks,
    /// Split ligature glyphs
    Ligatures,
    /// Merge text blocks into paragraphs
    Paragraphs,
    /// Join words hyphenated across line breaks
    Dehyphenation,
    /// Assign semantic roles
    Semantics,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 10] = [
        Stage::Filter,
        Stage::CharacterStatistics,
        Stage::Words,
        Stage::Lines,
        Stage::StatisticsRefresh,
        Stage::Blocks,
        Stage::Ligatures,
        Stage::Paragraphs,
        Stage::Dehyphenation,
        Stage::Semantics,
    ];

    /// Run this stage over `doc`.
    pub fn apply(self, mut doc: Document, config: &PipelineConfig) -> Result<Document> {
        match self {
            Stage::Filter => {
                for_each_page(&mut doc, config, |page, _| {
                    filter::filter_page(page, config);
                    Ok(())
                })?;
            },
            Stage::CharacterStatistics => {
                for page in &mut doc.pages {
                    page.statistic = characters_statistic(&page.characters);
                }
                refresh_document_statistic(&mut doc);
            },
            Stage::Words => {
                doc.paragraphs.clear();
                for_each_page(&mut doc, config, |page, statistic| {
                    page.lines.clear();
                    page.blocks.clear();
                    words::build_words(page, statistic, config);
                    Ok(())
                })?;
            },
            Stage::Lines => {
                for_each_page(&mut doc, config, |page, statistic| {
                    lines::build_lines(page, statistic, config);
                    Ok(())
                })?;
            },
            Stage::StatisticsRefresh => {
                for page in &mut doc.pages {
                    page.statistic = lines_statistic(&page.lines);
                }
                refresh_document_statistic(&mut doc);
            },
            Stage::Blocks => {
                for_each_page(&mut doc, config, |page, statistic| {
                    xycut::build_blocks(page, statistic, config)
                })?;
            },
            Stage::Ligatures => {
                if config.ligature_split_enabled {
                    let split: usize = doc.pages.iter_mut().map(ligature::split_page_ligatures).sum();
                    log::debug!("Split ligatures in {} words", split);
                }
            },
            Stage::Paragraphs => paragraphs::build_paragraphs(&mut doc, config),
            Stage::Dehyphenation => {
                hyphenation::dehyphenate_document(&mut doc, config);
            },
            Stage::Semantics => {
                semantics::classify(&mut doc, config);
            },
        }
        Ok(doc)
    }
}

/// Document statistic as the combination of the page statistics.
fn refresh_document_statistic(doc: &mut Document) {
    doc.statistic = TextStatistic::combine(doc.pages.iter().map(|p| &p.statistic));
}

/// Run `f` on every page, in parallel when configured. The document
/// statistic is shared read-only with every call.
fn for_each_page<F>(doc: &mut Document, config: &PipelineConfig, f: F) -> Result<()>
where
    F: Fn(&mut Page, &TextStatistic) -> Result<()> + Sync,
{
    let statistic = &doc.statistic;
    if config.parallel_pages {
        doc.pages.par_iter_mut().try_for_each(|page| f(page, statistic))
    } else {
        doc.pages.iter_mut().try_for_each(|page| f(page, statistic))
    }
}

/// Runs every stage over documents.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline. Fails when the configuration is invalid.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run all stages over `doc`.
    pub fn run(&self, doc: Document) -> Result<Document> {
        Stage::ALL
            .into_iter()
            .try_fold(doc, |doc, stage| self.run_stage(stage, doc))
    }

    /// Run all stages, checking `cancel` before each one.
    pub fn run_cancellable(&self, doc: Document, cancel: &AtomicBool) -> Result<Document> {
        Stage::ALL.into_iter().try_fold(doc, |doc, stage| {
            if cancel.load(Ordering::Relaxed) {
                log::debug!("Cancelled before {:?}", stage);
                return Err(Error::Cancelled);
            }
            self.run_stage(stage, doc)
        })
    }

    /// Run all stages over independent documents in parallel.
    ///
    /// Results keep the input order. A failing document does not affect the
    /// others.
    pub fn run_batch(&self, docs: Vec<Document>) -> Vec<Result<Document>> {
        docs.into_par_iter()
            .enumerate()
            .map(|(i, doc)| {
                self.run(doc).inspect_err(|e| log::warn!("Document {} failed: {}", i, e))
            })
            .collect()
    }

    fn run_stage(&self, stage: Stage, doc: Document) -> Result<Document> {
        log::trace!("Stage {:?}", stage);
        stage.apply(doc, &self.config)
    }
}
