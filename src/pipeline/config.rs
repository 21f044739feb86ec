//! Configuration for the structure pipeline.
//!
//! A flat set of named options. Every threshold is a factor applied to a
//! measured statistic (char pitch, font size, line gap) rather than an
//! absolute distance. Options can be overridden from JSON; unspecified
//! options keep their defaults.

use crate::error::{Error, Result};
use crate::semantics::SemanticModule;
use serde::{Deserialize, Serialize};

/// All stage thresholds and switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Split words on gaps wider than this many char pitches
    pub word_gap_factor: f32,
    /// Baseline tolerance as a fraction of the font size
    pub baseline_tolerance_factor: f32,
    /// Minimum vertical overlap ratio for two words to share a line
    pub line_overlap_ratio: f32,
    /// Maximum gap between words of one line, in char pitches
    pub line_word_gap_factor: f32,
    /// Minimum width of a column gutter, in char pitches
    pub min_column_gap_width_factor: f32,
    /// Extra height over the typical line gap for a horizontal cut, in font sizes
    pub min_row_gap_height_factor: f32,
    /// XY-cut recursion depth guard
    pub max_xy_cut_depth: usize,
    /// First-line indentation that starts a paragraph, in average char widths
    pub paragraph_indent_threshold: f32,
    /// Maximum dominant font size difference of merged blocks, in points
    pub paragraph_font_size_tolerance: f32,
    /// Rejoin words split by a line-end hyphen
    pub dehyphenate_enabled: bool,
    /// Split ligature glyphs into their letters
    pub ligature_split_enabled: bool,
    /// Extra dictionary entries: standalone words never joined when
    /// capitalized, and hyphenated compounds ("cross-entropy") kept whole
    pub dehyphenation_dictionary: Vec<String>,
    /// Page coverage above which a uniform figure is a background fill
    pub figure_color_fill_area_fraction: f32,
    /// Samples per axis when testing a figure for uniform color
    pub figure_color_sample_grid: u32,
    /// Height of the header and footer bands, as a fraction of the page
    pub page_margin_fraction: f32,
    /// Minimum font size over body size for a heading
    pub heading_font_size_ratio: f32,
    /// Minimum font size over body size for the title
    pub title_font_size_ratio: f32,
    /// Maximum font size over body size for a footnote
    pub footnote_font_size_ratio: f32,
    /// Share of bold characters that marks a block as bold
    pub bold_ratio_threshold: f32,
    /// Maximum number of lines in a heading
    pub heading_max_lines: usize,
    /// Fan out per-page stages over rayon's thread pool
    pub parallel_pages: bool,
    /// Classification modules in execution order
    pub semantic_modules: Vec<SemanticModule>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            word_gap_factor: 2.0,
            baseline_tolerance_factor: 0.5,
            line_overlap_ratio: 0.5,
            line_word_gap_factor: 3.0,
            min_column_gap_width_factor: 2.0,
            min_row_gap_height_factor: 0.5,
            max_xy_cut_depth: 256,
            paragraph_indent_threshold: 1.0,
            paragraph_font_size_tolerance: 0.5,
            dehyphenate_enabled: true,
            ligature_split_enabled: true,
            dehyphenation_dictionary: Vec::new(),
            figure_color_fill_area_fraction: 0.95,
            figure_color_sample_grid: 16,
            page_margin_fraction: 0.08,
            heading_font_size_ratio: 1.15,
            title_font_size_ratio: 1.4,
            footnote_font_size_ratio: 0.9,
            bold_ratio_threshold: 0.6,
            heading_max_lines: 3,
            parallel_pages: false,
            semantic_modules: SemanticModule::default_order().to_vec(),
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON object of overrides.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_strata::pipeline::PipelineConfig;
    ///
    /// let config = PipelineConfig::from_json(r#"{"minColumnGapWidthFactor": 3.0}"#).unwrap();
    /// assert_eq!(config.min_column_gap_width_factor, 3.0);
    /// assert_eq!(config.word_gap_factor, 2.0);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject non-finite or negative factors.
    pub fn validate(&self) -> Result<()> {
        let factors = [
            ("wordGapFactor", self.word_gap_factor),
            ("baselineToleranceFactor", self.baseline_tolerance_factor),
            ("lineOverlapRatio", self.line_overlap_ratio),
            ("lineWordGapFactor", self.line_word_gap_factor),
            ("minColumnGapWidthFactor", self.min_column_gap_width_factor),
            ("minRowGapHeightFactor", self.min_row_gap_height_factor),
            ("paragraphIndentThreshold", self.paragraph_indent_threshold),
            ("paragraphFontSizeTolerance", self.paragraph_font_size_tolerance),
            ("figureColorFillAreaFraction", self.figure_color_fill_area_fraction),
            ("pageMarginFraction", self.page_margin_fraction),
            ("headingFontSizeRatio", self.heading_font_size_ratio),
            ("titleFontSizeRatio", self.title_font_size_ratio),
            ("footnoteFontSizeRatio", self.footnote_font_size_ratio),
            ("boldRatioThreshold", self.bold_ratio_threshold),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Validation(format!("{} must be a non-negative number, got {}", name, value)));
            }
        }
        if self.line_overlap_ratio > 1.0 {
            return Err(Error::Validation(format!(
                "lineOverlapRatio must not exceed 1.0, got {}",
                self.line_overlap_ratio
            )));
        }
        if self.max_xy_cut_depth == 0 {
            return Err(Error::Validation("maxXyCutDepth must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Set the word gap factor.
    pub fn with_word_gap_factor(mut self, factor: f32) -> Self {
        self.word_gap_factor = factor;
        self
    }

    /// Set the minimum column gutter width factor.
    pub fn with_min_column_gap_width_factor(mut self, factor: f32) -> Self {
        self.min_column_gap_width_factor = factor;
        self
    }

    /// Set the XY-cut depth guard.
    pub fn with_max_xy_cut_depth(mut self, depth: usize) -> Self {
        self.max_xy_cut_depth = depth;
        self
    }

    /// Set the paragraph indentation threshold.
    pub fn with_paragraph_indent_threshold(mut self, threshold: f32) -> Self {
        self.paragraph_indent_threshold = threshold;
        self
    }

    /// Enable or disable dehyphenation.
    pub fn with_dehyphenation(mut self, enabled: bool) -> Self {
        self.dehyphenate_enabled = enabled;
        self
    }

    /// Enable or disable ligature splitting.
    pub fn with_ligature_split(mut self, enabled: bool) -> Self {
        self.ligature_split_enabled = enabled;
        self
    }

    /// Add standalone words or hyphenated compounds protected from
    /// dehyphenation.
    pub fn with_dehyphenation_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dehyphenation_dictionary
            .extend(words.into_iter().map(Into::into));
        self
    }

    /// Enable or disable per-page parallelism.
    pub fn with_parallel_pages(mut self, enabled: bool) -> Self {
        self.parallel_pages = enabled;
        self
    }

    /// Replace the classification module order.
    pub fn with_semantic_modules(mut self, modules: Vec<SemanticModule>) -> Self {
        self.semantic_modules = modules;
        self
    }
}
