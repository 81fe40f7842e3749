//! Candidate placement regions for cascade fill: canvas edge bands and coarse gaps.
use glam::Vec2;

use crate::geometry::{BoundingBox, Shape};

/// Edge band width as a fraction of the smaller canvas dimension.
pub const EDGE_BAND_FRACTION: f32 = 0.1;

/// Cells per side of the occupancy grid used for gap detection.
pub const GAP_GRID_SIZE: usize = 50;

/// Only every `GAP_SAMPLE_STRIDE`-th row and column is tested, and a free
/// cell grows into a region this many cells wide and tall.
pub const GAP_SAMPLE_STRIDE: usize = 5;

/// The four margin bands along the canvas border: left, right, top, bottom.
pub fn edge_bands(canvas: Vec2) -> [BoundingBox; 4] {
    let margin = canvas.x.min(canvas.y) * EDGE_BAND_FRACTION;
    [
        BoundingBox::from_origin_size(0.0, 0.0, margin, canvas.y),
        BoundingBox::from_origin_size(canvas.x - margin, 0.0, margin, canvas.y),
        BoundingBox::from_origin_size(0.0, 0.0, canvas.x, margin),
        BoundingBox::from_origin_size(0.0, canvas.y - margin, canvas.x, margin),
    ]
}

/// Boolean occupancy grid over the canvas.
#[derive(Clone, Debug)]
pub struct OccupancyMask {
    canvas: Vec2,
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl OccupancyMask {
    pub fn new(canvas: Vec2, cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            canvas,
            cols,
            rows,
            cells: vec![false; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(
            self.canvas.x / self.cols as f32,
            self.canvas.y / self.rows as f32,
        )
    }

    /// Mark every cell touched by `bbox` as occupied.
    pub fn stamp(&mut self, bbox: &BoundingBox) {
        let cell = self.cell_size();
        if cell.x <= 0.0 || cell.y <= 0.0 {
            return;
        }
        let col = |x: f32| ((x / cell.x).floor() as isize).clamp(0, self.cols as isize - 1) as usize;
        let row = |y: f32| ((y / cell.y).floor() as isize).clamp(0, self.rows as isize - 1) as usize;
        let (c0, c1) = (col(bbox.min.x), col(bbox.max.x));
        let (r0, r1) = (row(bbox.min.y), row(bbox.max.y));

        for r in r0..=r1 {
            let base = r * self.cols;
            for c in c0..=c1 {
                self.cells[base + c] = true;
            }
        }
    }

    pub fn is_occupied(&self, col: usize, row: usize) -> bool {
        if col >= self.cols || row >= self.rows {
            return true;
        }
        self.cells[row * self.cols + col]
    }
}

/// Coarse empty regions of the canvas, scanned row-major.
///
/// Existing shapes are stamped into a [`GAP_GRID_SIZE`]-square occupancy grid;
/// every sampled free cell yields a region of [`GAP_SAMPLE_STRIDE`] cells per
/// side, clipped to the canvas. Regions narrower than `min_size` are skipped.
pub fn detect_gap_regions(canvas: Vec2, existing: &[Shape], min_size: f32) -> Vec<BoundingBox> {
    let mut mask = OccupancyMask::new(canvas, GAP_GRID_SIZE, GAP_GRID_SIZE);
    for bbox in existing.iter().filter_map(Shape::bbox) {
        mask.stamp(&bbox);
    }

    let cell = mask.cell_size();
    let span = cell * GAP_SAMPLE_STRIDE as f32;
    let mut regions = Vec::new();

    for row in (0..mask.rows()).step_by(GAP_SAMPLE_STRIDE) {
        for col in (0..mask.cols()).step_by(GAP_SAMPLE_STRIDE) {
            if mask.is_occupied(col, row) {
                continue;
            }
            let x = col as f32 * cell.x;
            let y = row as f32 * cell.y;
            let w = span.x.min(canvas.x - x);
            let h = span.y.min(canvas.y - y);
            if w < min_size || h < min_size {
                continue;
            }
            regions.push(BoundingBox::from_origin_size(x, y, w, h));
        }
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_bands_follow_border_order() {
        let bands = edge_bands(Vec2::new(200.0, 100.0));
        assert_eq!(bands[0], BoundingBox::from_origin_size(0.0, 0.0, 10.0, 100.0));
        assert_eq!(bands[1], BoundingBox::from_origin_size(190.0, 0.0, 10.0, 100.0));
        assert_eq!(bands[2], BoundingBox::from_origin_size(0.0, 0.0, 200.0, 10.0));
        assert_eq!(bands[3], BoundingBox::from_origin_size(0.0, 90.0, 200.0, 10.0));
    }

    #[test]
    fn empty_canvas_yields_full_gap_lattice() {
        let regions = detect_gap_regions(Vec2::new(100.0, 100.0), &[], 0.0);
        assert_eq!(regions.len(), 100);
        assert_eq!(regions[0], BoundingBox::from_origin_size(0.0, 0.0, 10.0, 10.0));
        assert_eq!(regions[1].min, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn occupied_cells_are_not_gaps() {
        let canvas = Vec2::new(100.0, 100.0);
        let cover = Shape::rectangle(0.0, 0.0, 100.0, 100.0);
        assert!(detect_gap_regions(canvas, &[cover], 0.0).is_empty());

        let corner = Shape::rectangle(0.0, 0.0, 15.0, 15.0);
        let regions = detect_gap_regions(canvas, &[corner], 0.0);
        assert_eq!(regions.len(), 96);
        assert!(regions.iter().all(|r| r.min != Vec2::ZERO));
    }

    #[test]
    fn min_size_filters_regions() {
        let regions = detect_gap_regions(Vec2::new(100.0, 100.0), &[], 20.0);
        assert!(regions.is_empty());
    }

    #[test]
    fn mask_out_of_range_is_occupied() {
        let mask = OccupancyMask::new(Vec2::new(10.0, 10.0), 2, 2);
        assert!(!mask.is_occupied(1, 1));
        assert!(mask.is_occupied(2, 0));
    }
}
