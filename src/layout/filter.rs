//! Removal of decorative figures and shapes before layout analysis.
//!
//! A page-sized image filled with one color is a background, not content;
//! left in place it would act as an obstacle covering the whole page and
//! block every XY-cut. Degenerate shapes and shapes lying inside such kept
//! figures carry no layout information either.
//!
//! The stage never fails. A figure that cannot be judged (no pixel samples,
//! empty image, zero-area page) is kept.

use crate::document::Page;
use crate::elements::Figure;
use crate::pipeline::PipelineConfig;
use image::RgbImage;

/// Drop decorative figures and shapes from `page`.
pub fn filter_page(page: &mut Page, config: &PipelineConfig) {
    let figures_before = page.figures.len();
    let shapes_before = page.shapes.len();
    let media_box = page.media_box;
    let page_area = media_box.area();

    page.figures.retain(|figure| {
        let coverage = if page_area > 0.0 {
            figure.rect.intersection_area(&media_box) / page_area
        } else {
            0.0
        };
        !(coverage >= config.figure_color_fill_area_fraction
            && is_color_fill(figure, config.figure_color_sample_grid))
    });

    let figures = &page.figures;
    page.shapes.retain(|shape| {
        !shape.rect.is_degenerate() && !figures.iter().any(|f| f.rect.contains(&shape.rect))
    });

    log::debug!(
        "Page {}: kept {}/{} figures, {}/{} shapes",
        page.number,
        page.figures.len(),
        figures_before,
        page.shapes.len(),
        shapes_before
    );
}

/// True when the figure's samples hold exactly one distinct color.
fn is_color_fill(figure: &Figure, grid: u32) -> bool {
    match &figure.samples {
        Some(image) => distinct_sampled_colors(image, grid.max(1), 2) == 1,
        None => {
            log::warn!(
                "Page {}: page-sized figure without samples cannot be judged, keeping it",
                figure.page
            );
            false
        },
    }
}

/// Count distinct colors at the centers of a `grid × grid` lattice, stopping
/// once `limit` is reached.
fn distinct_sampled_colors(image: &RgbImage, grid: u32, limit: usize) -> usize {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return 0;
    }

    let mut seen: Vec<[u8; 3]> = Vec::with_capacity(limit);
    for gy in 0..grid {
        let y = sample_coordinate(gy, grid, height);
        for gx in 0..grid {
            let x = sample_coordinate(gx, grid, width);
            let pixel = image.get_pixel(x, y).0;
            if !seen.contains(&pixel) {
                seen.push(pixel);
                if seen.len() >= limit {
                    return seen.len();
                }
            }
        }
    }
    seen.len()
}

fn sample_coordinate(cell: u32, grid: u32, extent: u32) -> u32 {
    let position = (2 * cell as u64 + 1) * extent as u64 / (2 * grid as u64);
    (position as u32).min(extent - 1)
}
