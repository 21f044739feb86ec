//! XY-Cut recursive segmentation of text lines into blocks.
//!
//! # Algorithm Overview
//!
//! 1. Project every element of the region (text lines and obstacles such as
//!    kept figures and shapes) onto the X axis and merge the intervals
//! 2. The interior holes between merged intervals are the vertical gaps;
//!    cut at the midpoint of the widest one wider than the column threshold
//! 3. If no vertical gap qualifies, do the same on the Y axis against the
//!    row threshold
//! 4. Recurse on both halves: left before right, top before bottom
//! 5. A region with a single line or without a qualifying gap is a leaf and
//!    its lines, in their original order, become one block
//!
//! Gaps are exact, computed from interval endpoints, so the result does not
//! depend on a histogram resolution. Elements go to the side that holds
//! their center.
//!
//! # Tie-break
//!
//! Vertical cuts (columns) are always tried before horizontal ones. Among
//! equally wide vertical gaps the one closest to the horizontal page center
//! wins; among equally tall horizontal gaps the topmost wins.

use crate::document::Page;
use crate::elements::TextBlock;
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::layout::statistics::TextStatistic;
use crate::layout::words::reference_char_pitch;
use crate::pipeline::PipelineConfig;

/// Gap sizes closer than this are considered equal.
const GAP_EPSILON: f32 = 0.01;

/// Direction of a cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutDirection {
    /// Vertical line: splits into left and right
    Vertical,
    /// Horizontal line: splits into top and bottom
    Horizontal,
}

/// A chosen cut: direction, position and size of the gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cut {
    /// Direction of the cutting line
    pub direction: CutDirection,
    /// Coordinate of the cutting line (x for vertical, y for horizontal)
    pub position: f32,
    /// Width or height of the gap
    pub size: f32,
}

#[derive(Debug, Clone, Copy)]
struct Element {
    rect: Rect,
    /// Index of the text line, `None` for obstacles
    line: Option<usize>,
}

/// XY-Cut segmenter with absolute thresholds for one page.
#[derive(Debug, Clone)]
pub struct XYCutSegmenter {
    /// Minimum column gutter width in points
    pub min_column_gap: f32,
    /// Minimum row gap height in points
    pub min_row_gap: f32,
    /// Maximum recursion depth
    pub max_depth: usize,
}

impl XYCutSegmenter {
    /// Create a segmenter with explicit thresholds.
    pub fn new(min_column_gap: f32, min_row_gap: f32) -> Self {
        Self {
            min_column_gap,
            min_row_gap,
            max_depth: 256,
        }
    }

    /// Set the recursion depth guard.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Derive thresholds from the page typography.
    ///
    /// Column gap: `min_column_gap_width_factor × char pitch`. Row gap: the
    /// typical inter-line gap plus `min_row_gap_height_factor × font size`.
    pub fn for_page(page: &TextStatistic, document: &TextStatistic, config: &PipelineConfig) -> Self {
        let pitch = reference_char_pitch(page, document);
        let font_size = page
            .most_common_font_size()
            .unwrap_or_else(|| document.font_size_or(10.0));
        let line_gap = page
            .most_common_line_gap()
            .or_else(|| document.most_common_line_gap())
            .unwrap_or(font_size * 0.2);

        Self::new(
            config.min_column_gap_width_factor * pitch,
            line_gap + config.min_row_gap_height_factor * font_size,
        )
        .with_max_depth(config.max_xy_cut_depth)
    }

    /// Partition `lines` into groups of line indices, one group per block.
    ///
    /// `obstacles` take part in the projections but are never part of a
    /// block. `center_x` is the horizontal page center used for tie-breaks.
    pub fn segment(
        &self,
        page_number: u32,
        center_x: f32,
        lines: &[Rect],
        obstacles: &[Rect],
    ) -> Result<Vec<Vec<usize>>> {
        let elements: Vec<Element> = lines
            .iter()
            .enumerate()
            .map(|(i, rect)| Element {
                rect: *rect,
                line: Some(i),
            })
            .chain(obstacles.iter().map(|rect| Element {
                rect: *rect,
                line: None,
            }))
            .collect();

        let mut groups = Vec::new();
        self.partition(page_number, center_x, elements, 0, &mut groups)?;
        Ok(groups)
    }

    fn partition(
        &self,
        page_number: u32,
        center_x: f32,
        elements: Vec<Element>,
        depth: usize,
        groups: &mut Vec<Vec<usize>>,
    ) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::RecursionLimitExceeded {
                page: page_number,
                max: self.max_depth,
            });
        }

        let line_count = elements.iter().filter(|e| e.line.is_some()).count();
        if line_count == 0 {
            return Ok(());
        }

        let rects: Vec<Rect> = elements.iter().map(|e| e.rect).collect();
        let cut = if line_count > 1 {
            self.find_vertical_cut(&rects, center_x)
                .or_else(|| self.find_horizontal_cut(&rects))
        } else {
            None
        };

        let Some(cut) = cut else {
            let mut lines: Vec<usize> = elements.iter().filter_map(|e| e.line).collect();
            lines.sort_unstable();
            groups.push(lines);
            return Ok(());
        };

        log::trace!(
            "Page {} depth {}: {:?} cut at {:.1} (gap {:.1})",
            page_number,
            depth,
            cut.direction,
            cut.position,
            cut.size
        );

        // First half is left (vertical cut) or top (horizontal cut)
        let (first, second): (Vec<Element>, Vec<Element>) =
            elements.into_iter().partition(|e| match cut.direction {
                CutDirection::Vertical => e.rect.center().x < cut.position,
                CutDirection::Horizontal => e.rect.center().y > cut.position,
            });

        if first.is_empty() || second.is_empty() {
            return Err(Error::Processing(format!(
                "XY-Cut on page {} produced an empty side at {:.2}",
                page_number, cut.position
            )));
        }

        self.partition(page_number, center_x, first, depth + 1, groups)?;
        self.partition(page_number, center_x, second, depth + 1, groups)
    }

    /// Widest qualifying vertical gap; ties go to the gap closest to `center_x`.
    pub fn find_vertical_cut(&self, rects: &[Rect], center_x: f32) -> Option<Cut> {
        let intervals = rects.iter().map(|r| (r.min_x(), r.max_x()));
        let mut best: Option<Cut> = None;

        for (start, end) in interior_gaps(intervals) {
            let size = end - start;
            if size <= self.min_column_gap {
                continue;
            }
            let candidate = Cut {
                direction: CutDirection::Vertical,
                position: (start + end) / 2.0,
                size,
            };
            best = match best {
                None => Some(candidate),
                Some(current) if size > current.size + GAP_EPSILON => Some(candidate),
                Some(current)
                    if (size - current.size).abs() <= GAP_EPSILON
                        && (candidate.position - center_x).abs()
                            < (current.position - center_x).abs() =>
                {
                    Some(candidate)
                },
                keep => keep,
            };
        }
        best
    }

    /// Tallest qualifying horizontal gap; ties go to the topmost gap.
    pub fn find_horizontal_cut(&self, rects: &[Rect]) -> Option<Cut> {
        let intervals = rects.iter().map(|r| (r.min_y(), r.max_y()));
        let mut best: Option<Cut> = None;

        // Gaps come bottom to top, so a later equal gap is higher on the page
        for (start, end) in interior_gaps(intervals) {
            let size = end - start;
            if size <= self.min_row_gap {
                continue;
            }
            let candidate = Cut {
                direction: CutDirection::Horizontal,
                position: (start + end) / 2.0,
                size,
            };
            best = match best {
                Some(current) if size < current.size - GAP_EPSILON => Some(current),
                _ => Some(candidate),
            };
        }
        best
    }
}

/// Holes between the merged intervals, in ascending order.
fn interior_gaps<I>(intervals: I) -> Vec<(f32, f32)>
where
    I: IntoIterator<Item = (f32, f32)>,
{
    let mut intervals: Vec<(f32, f32)> = intervals.into_iter().collect();
    intervals.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));

    let mut gaps = Vec::new();
    let mut iter = intervals.into_iter();
    let Some((_, mut reach)) = iter.next() else {
        return gaps;
    };
    for (start, end) in iter {
        if start > reach {
            gaps.push((reach, start));
        }
        reach = reach.max(end);
    }
    gaps
}

/// Consume the page's lines into blocks.
pub fn build_blocks(page: &mut Page, document: &TextStatistic, config: &PipelineConfig) -> Result<()> {
    let segmenter = XYCutSegmenter::for_page(&page.statistic, document, config);
    let line_rects: Vec<Rect> = page.lines.iter().map(|l| l.rect()).collect();
    let obstacles: Vec<Rect> = page
        .figures
        .iter()
        .map(|f| f.rect)
        .chain(page.shapes.iter().map(|s| s.rect))
        .collect();

    let groups = segmenter.segment(
        page.number,
        page.media_box.center().x,
        &line_rects,
        &obstacles,
    )?;

    let mut lines: Vec<_> = std::mem::take(&mut page.lines).into_iter().map(Some).collect();
    let mut blocks = Vec::with_capacity(groups.len());
    for group in groups {
        let members = group.into_iter().filter_map(|i| lines.get_mut(i).and_then(Option::take));
        if let Some(block) = TextBlock::from_lines(members.collect()) {
            blocks.push(block);
        }
    }
    if lines.iter().any(Option::is_some) {
        return Err(Error::Processing(format!("XY-Cut on page {} left lines unassigned", page.number)));
    }

    log::debug!(
        "Page {}: {} lines -> {} blocks (column gap {:.1}, row gap {:.1})",
        page.number,
        line_rects.len(),
        blocks.len(),
        segmenter.min_column_gap,
        segmenter.min_row_gap
    );
    page.blocks = blocks;
    Ok(())
}
