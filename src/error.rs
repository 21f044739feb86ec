//! Error types for the structure pipeline.
//!
//! Errors fall into two classes. Validation errors mean malformed input reached
//! the core (for example a rectangle with `min_x > max_x`); they are raised as
//! soon as the input is seen and coordinates are never repaired. Processing
//! errors mean a stage detected a violated internal invariant, such as the
//! XY-Cut depth guard firing on a pathological page.
//!
//! Empty pages, pages without figures and lines without hyphens are not errors.

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while structuring a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rectangle with inverted or non-finite coordinates
    #[error("Invalid rectangle: ({min_x}, {min_y})-({max_x}, {max_y})")]
    InvalidRect {
        /// Left edge as received
        min_x: f32,
        /// Bottom edge as received
        min_y: f32,
        /// Right edge as received
        max_x: f32,
        /// Top edge as received
        max_y: f32,
    },

    /// Page numbers must be 1-based and consecutive
    #[error("Invalid page number: expected {expected}, found {found}")]
    InvalidPageNumber {
        /// Page number the document expected next
        expected: u32,
        /// Page number found in the input
        found: u32,
    },

    /// Other malformed or contradictory input
    #[error("Validation error: {0}")]
    Validation(String),

    /// XY-Cut recursion went deeper than the configured guard
    #[error("XY-Cut recursion depth limit exceeded on page {page} (max: {max})")]
    RecursionLimitExceeded {
        /// 1-based page number being segmented
        page: u32,
        /// Configured maximum depth
        max: usize,
    },

    /// Stage-internal invariant violation
    #[error("Processing error: {0}")]
    Processing(String),

    /// Processing was aborted by the caller
    #[error("Processing cancelled")]
    Cancelled,

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// True for errors caused by malformed input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidRect { .. }
                | Error::InvalidPageNumber { .. }
                | Error::Validation(_)
                | Error::Config(_)
        )
    }

    /// True for errors raised by a stage's own invariant checks.
    pub fn is_processing(&self) -> bool {
        matches!(self, Error::RecursionLimitExceeded { .. } | Error::Processing(_))
    }
}
