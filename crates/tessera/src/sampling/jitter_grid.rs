//! Stratified jittered-grid sampling with shuffled cell order.
use mint::Vector2;
use rand::Rng as RngCore;

use crate::sampling::{next_down, rand01, shuffle, PositionSampling};

/// Stratified scatter: one point per cell of a `ceil(sqrt(count))` square grid,
/// visiting cells in shuffled order and jittering around each cell centre.
#[derive(Debug, Clone)]
pub struct StratifiedJitterSampling {
    /// Number of points to generate.
    pub count: usize,
    /// Jitter amount in [0, 1], where 0 is cell centres and 1 spans the whole cell.
    pub jitter: f32,
}

impl StratifiedJitterSampling {
    pub fn new(count: usize, jitter: f32) -> Self {
        Self {
            count,
            jitter: jitter.clamp(0.0, 1.0),
        }
    }

    /// Cells per side for `count` points.
    pub fn grid_side(count: usize) -> usize {
        ((count as f64).sqrt().ceil() as usize).max(1)
    }

    /// Cell size for a canvas of the given extent.
    pub fn cell_size(&self, canvas_extent: Vector2<f32>) -> (f32, f32) {
        let n = Self::grid_side(self.count) as f32;
        (canvas_extent.x / n, canvas_extent.y / n)
    }
}

impl PositionSampling for StratifiedJitterSampling {
    fn generate(&self, canvas_extent: Vector2<f32>, rng: &mut dyn RngCore) -> Vec<Vector2<f32>> {
        let w = canvas_extent.x;
        let h = canvas_extent.y;
        if self.count == 0 || w <= 0.0 || h <= 0.0 {
            return Vec::new();
        }

        let side = Self::grid_side(self.count);
        let (cell_w, cell_h) = self.cell_size(canvas_extent);

        let mut cells: Vec<(usize, usize)> = (0..side)
            .flat_map(|i| (0..side).map(move |j| (i, j)))
            .collect();
        shuffle(&mut cells, rng);

        let max_x = next_down(w);
        let max_y = next_down(h);
        let jitter_x = self.jitter * cell_w * 0.5;
        let jitter_y = self.jitter * cell_h * 0.5;

        let mut points = Vec::with_capacity(self.count);
        for idx in 0..self.count {
            let (i, j) = cells[idx % cells.len()];
            let cx = (i as f32 + 0.5) * cell_w;
            let cy = (j as f32 + 0.5) * cell_h;
            let x = cx + (rand01(rng) * 2.0 - 1.0) * jitter_x;
            let y = cy + (rand01(rng) * 2.0 - 1.0) * jitter_y;
            points.push(Vector2 {
                x: x.clamp(0.0, max_x),
                y: y.clamp(0.0, max_y),
            });
        }

        points
    }
}
