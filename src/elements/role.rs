//! Semantic roles of text blocks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic category of a text block.
///
/// Every block starts as [`Role::Unknown`]. The classifier pipeline only ever
/// changes `Unknown` blocks, so a role, once assigned, is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Document title
    Title,
    /// Section heading
    Heading,
    /// Regular body text
    Body,
    /// Figure or table caption
    Caption,
    /// Footnote at the bottom of a page
    Footnote,
    /// Bibliography entry
    Reference,
    /// Abstract of a paper
    Abstract,
    /// Item of a bulleted or enumerated list
    ListItem,
    /// Table of contents entry
    TableOfContents,
    /// Running header in the top margin
    PageHeader,
    /// Running footer or page number in the bottom margin
    PageFooter,
    /// Not classified
    #[default]
    Unknown,
}

impl Role {
    /// True while no classification module has claimed the block.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Role::Unknown)
    }

    /// Stable lowercase name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Title => "title",
            Role::Heading => "heading",
            Role::Body => "body",
            Role::Caption => "caption",
            Role::Footnote => "footnote",
            Role::Reference => "reference",
            Role::Abstract => "abstract",
            Role::ListItem => "list_item",
            Role::TableOfContents => "table_of_contents",
            Role::PageHeader => "page_header",
            Role::PageFooter => "page_footer",
            Role::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
