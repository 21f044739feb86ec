//! Semantic role classification of text blocks.
//!
//! Classification is an ordered list of [`SemanticModule`]s. Each module
//! claims blocks from features of the settled layout, and the runner gives a
//! claimed block the module's role only while the block is still
//! [`Role::Unknown`]. Order is therefore the only interaction between modules:
//! an earlier module wins.
//!
//! Blocks no module claims stay `Unknown`.
//!
//! # Examples
//!
//! ```
//! use pdf_strata::pipeline::PipelineConfig;
//! use pdf_strata::semantics::SemanticModule;
//!
//! let config = PipelineConfig::default()
//!     .with_semantic_modules(vec![SemanticModule::Caption, SemanticModule::Body]);
//! assert_eq!(config.semantic_modules.len(), 2);
//! ```

pub mod features;
pub mod modules;

pub use features::{BlockFeatures, DocumentFeatures};

use crate::document::Document;
use crate::elements::{BlockRef, Role};
use crate::pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};

/// A classification module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticModule {
    /// Running headers in the top margin
    PageHeader,
    /// Running footers and page numbers in the bottom margin
    PageFooter,
    /// Document title on the first page
    Title,
    /// Table of contents entries
    TableOfContents,
    /// Figure and table captions
    Caption,
    /// Footnotes
    Footnote,
    /// Abstract
    Abstract,
    /// Section headings
    Heading,
    /// Bibliography entries
    Reference,
    /// List items
    ListItem,
    /// Body text
    Body,
}

const DEFAULT_ORDER: [SemanticModule; 11] = [
    SemanticModule::PageHeader,
    SemanticModule::PageFooter,
    SemanticModule::Title,
    SemanticModule::TableOfContents,
    SemanticModule::Caption,
    SemanticModule::Footnote,
    SemanticModule::Abstract,
    SemanticModule::Heading,
    SemanticModule::Reference,
    SemanticModule::ListItem,
    SemanticModule::Body,
];

impl SemanticModule {
    /// All modules in their default order.
    pub fn default_order() -> &'static [SemanticModule] {
        &DEFAULT_ORDER
    }

    /// Role the module assigns.
    pub fn role(&self) -> Role {
        match self {
            SemanticModule::PageHeader => Role::PageHeader,
            SemanticModule::PageFooter => Role::PageFooter,
            SemanticModule::Title => Role::Title,
            SemanticModule::TableOfContents => Role::TableOfContents,
            SemanticModule::Caption => Role::Caption,
            SemanticModule::Footnote => Role::Footnote,
            SemanticModule::Abstract => Role::Abstract,
            SemanticModule::Heading => Role::Heading,
            SemanticModule::Reference => Role::Reference,
            SemanticModule::ListItem => Role::ListItem,
            SemanticModule::Body => Role::Body,
        }
    }

    /// Blocks the module claims, in document order.
    pub fn claims(&self, features: &DocumentFeatures, config: &PipelineConfig) -> Vec<BlockRef> {
        match self {
            SemanticModule::PageHeader => modules::page_header(features, config),
            SemanticModule::PageFooter => modules::page_footer(features, config),
            SemanticModule::Title => modules::title(features, config),
            SemanticModule::TableOfContents => modules::table_of_contents(features, config),
            SemanticModule::Caption => modules::caption(features, config),
            SemanticModule::Footnote => modules::footnote(features, config),
            SemanticModule::Abstract => modules::abstract_blocks(features, config),
            SemanticModule::Heading => modules::heading(features, config),
            SemanticModule::Reference => modules::reference(features, config),
            SemanticModule::ListItem => modules::list_item(features, config),
            SemanticModule::Body => modules::body(features, config),
        }
    }

    /// Run this module alone. Returns the number of blocks it assigned.
    pub fn apply(&self, doc: &mut Document, features: &DocumentFeatures, config: &PipelineConfig) -> usize {
        let role = self.role();
        let mut assigned = 0;
        for at in self.claims(features, config) {
            if let Some(block) = doc.block_mut(at) {
                if block.assign_role(role) {
                    log::trace!(
                        "Page {} block {}: {}",
                        block.page_number(),
                        at.block_index,
                        role
                    );
                    assigned += 1;
                }
            }
        }
        assigned
    }
}

/// Run the configured modules over `doc` in order and give each paragraph
/// the role of its first block. Returns the number of blocks assigned.
pub fn classify(doc: &mut Document, config: &PipelineConfig) -> usize {
    let features = DocumentFeatures::extract(doc);
    let mut assigned = 0;
    for module in &config.semantic_modules {
        let count = module.apply(doc, &features, config);
        log::debug!("{:?}: {} blocks", module, count);
        assigned += count;
    }

    let roles: Vec<Role> = doc
        .paragraphs
        .iter()
        .map(|p| {
            p.blocks
                .first()
                .and_then(|at| doc.block(*at))
                .map_or(Role::Unknown, |b| b.role())
        })
        .collect();
    for (paragraph, role) in doc.paragraphs.iter_mut().zip(roles) {
        paragraph.role = role;
    }

    let unknown = doc.blocks().filter(|(_, b)| b.role().is_unknown()).count();
    if unknown > 0 {
        log::debug!("{} blocks left unclassified", unknown);
    }
    assigned
}
