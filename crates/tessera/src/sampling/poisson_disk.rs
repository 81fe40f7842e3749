//! Poisson-disk position sampling (Bridson's algorithm).
use std::f32::consts::{PI, SQRT_2};

use glam::Vec2;
use mint::Vector2;
use rand::Rng as RngCore;

use crate::error::{Error, Result};
use crate::sampling::{next_down, rand01, rand_index, PositionSampling};

/// Candidates tried around an active point before it is retired.
pub const DEFAULT_CANDIDATE_ATTEMPTS: usize = 30;

/// Upper bound on background grid cells allocated for one run.
pub const MAX_GRID_CELLS: usize = 1 << 22;

/// Poisson-disk sampling strategy.
///
/// The number of points is emergent: it follows from `radius` and the canvas
/// area. `max_points` only caps it.
#[derive(Debug, Clone)]
pub struct PoissonDiskSampling {
    /// Minimum distance between samples.
    pub radius: f32,
    /// Candidates per active point (`k`).
    pub attempts: usize,
    /// Stop once this many points exist.
    pub max_points: Option<usize>,
}

impl PositionSampling for PoissonDiskSampling {
    fn generate(&self, canvas_extent: Vector2<f32>, rng: &mut dyn RngCore) -> Vec<Vector2<f32>> {
        let extent = Vec2::from(canvas_extent);
        if !self.radius.is_finite()
            || self.radius <= 0.0
            || extent.x <= 0.0
            || extent.y <= 0.0
            || self.max_points == Some(0)
            || self.check_extent(extent).is_err()
        {
            return Vec::new();
        }

        let mut sampler = PoissonDiskSampler::new(self.radius, extent, self.attempts.max(1));
        sampler
            .generate(rng, self.max_points)
            .into_iter()
            .map(Into::into)
            .collect()
    }
}

impl PoissonDiskSampling {
    /// Create a new PoissonDiskSampling with specified radius.
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            attempts: DEFAULT_CANDIDATE_ATTEMPTS,
            max_points: None,
        }
    }

    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = Some(max_points);
        self
    }

    /// Background grid cells needed for `extent`, computed without overflow.
    pub fn grid_cells(&self, extent: Vec2) -> f64 {
        let cell = f64::from(self.radius) / std::f64::consts::SQRT_2;
        let columns = (f64::from(extent.x) / cell).ceil() + 1.0;
        let rows = (f64::from(extent.y) / cell).ceil() + 1.0;
        columns * rows
    }

    /// Fails when the background grid for `extent` would exceed [`MAX_GRID_CELLS`].
    pub fn check_extent(&self, extent: Vec2) -> Result<()> {
        let cells = self.grid_cells(extent);
        if cells.is_finite() && cells <= MAX_GRID_CELLS as f64 {
            Ok(())
        } else {
            Err(Error::InvalidConfig(format!(
                "radius {} needs {cells} grid cells on a {}x{} canvas (limit {MAX_GRID_CELLS})",
                self.radius, extent.x, extent.y
            )))
        }
    }

    /// Radius that yields roughly `count` points on a `width x height` canvas.
    ///
    /// Maximal Poisson-disk sets reach a packing density of about 0.7 disks of
    /// diameter `r` per `r^2 * sqrt(3) / 2`, so this is an estimate only.
    pub fn radius_for_count(width: f32, height: f32, count: usize) -> f32 {
        if count == 0 || width <= 0.0 || height <= 0.0 {
            return 0.0;
        }
        let area_per_point = width * height / count as f32;
        (area_per_point * 0.7 / (3.0f32.sqrt() / 2.0)).sqrt()
    }
}

struct PoissonDiskSampler {
    radius: f32,
    radius_squared: f32,
    cell_size: f32,
    grid_width: usize,
    grid_height: usize,
    grid: Vec<Option<Vec2>>,
    active: Vec<Vec2>,
    bounds: Vec2,
    attempts: usize,
}

impl PoissonDiskSampler {
    fn new(radius: f32, bounds: Vec2, attempts: usize) -> Self {
        debug_assert!(radius > 0.0);
        let cell_size = radius / SQRT_2;
        let grid_width = (bounds.x / cell_size).ceil() as usize + 1;
        let grid_height = (bounds.y / cell_size).ceil() as usize + 1;

        Self {
            radius,
            radius_squared: radius * radius,
            cell_size,
            grid_width,
            grid_height,
            grid: vec![None; grid_width * grid_height],
            active: Vec::new(),
            bounds,
            attempts,
        }
    }

    #[inline]
    fn grid_index(&self, x: usize, y: usize) -> usize {
        y * self.grid_width + x
    }

    #[inline]
    fn point_to_grid(&self, point: Vec2) -> (usize, usize) {
        let x = ((point.x / self.cell_size).floor() as isize)
            .clamp(0, self.grid_width as isize - 1) as usize;
        let y = ((point.y / self.cell_size).floor() as isize)
            .clamp(0, self.grid_height as isize - 1) as usize;
        (x, y)
    }

    fn is_valid_point(&self, point: Vec2) -> bool {
        if point.x < 0.0 || point.x >= self.bounds.x || point.y < 0.0 || point.y >= self.bounds.y
        {
            return false;
        }

        // 5x5 neighbourhood: with cells of r/sqrt(2) anything closer than r
        // lies at most two cells away.
        let (gx, gy) = self.point_to_grid(point);
        let start_x = gx.saturating_sub(2);
        let end_x = (gx + 3).min(self.grid_width);
        let start_y = gy.saturating_sub(2);
        let end_y = (gy + 3).min(self.grid_height);

        for y in start_y..end_y {
            for x in start_x..end_x {
                if let Some(existing) = self.grid[self.grid_index(x, y)] {
                    if point.distance_squared(existing) < self.radius_squared {
                        return false;
                    }
                }
            }
        }

        true
    }

    fn add_point(&mut self, point: Vec2) {
        let (gx, gy) = self.point_to_grid(point);
        let idx = self.grid_index(gx, gy);
        self.grid[idx] = Some(point);
        self.active.push(point);
    }

    fn generate_around_point(&self, rng: &mut dyn RngCore, point: Vec2) -> Option<Vec2> {
        for _ in 0..self.attempts {
            let angle = rand01(rng) * 2.0 * PI;
            let distance = self.radius + rand01(rng) * self.radius;
            let candidate = point + Vec2::new(angle.cos(), angle.sin()) * distance;

            if self.is_valid_point(candidate) {
                return Some(candidate);
            }
        }

        None
    }

    fn generate(&mut self, rng: &mut dyn RngCore, max_points: Option<usize>) -> Vec<Vec2> {
        let initial = Vec2::new(
            (rand01(rng) * self.bounds.x).min(next_down(self.bounds.x)),
            (rand01(rng) * self.bounds.y).min(next_down(self.bounds.y)),
        );
        self.add_point(initial);

        let mut points = vec![initial];
        let limit = max_points.unwrap_or(usize::MAX);

        while !self.active.is_empty() && points.len() < limit {
            let slot = rand_index(rng, self.active.len());
            let active = self.active[slot];

            match self.generate_around_point(rng, active) {
                Some(p) => {
                    self.add_point(p);
                    points.push(p);
                }
                None => {
                    self.active.swap_remove(slot);
                }
            }
        }

        points
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn pairwise_min_distance(points: &[Vector2<f32>]) -> f32 {
        let mut min = f32::MAX;
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let dist = Vec2::from(points[i]).distance(Vec2::from(points[j]));
                min = min.min(dist);
            }
        }
        min
    }

    #[test]
    fn sampler_initializes_grid_dimensions() {
        let sampler = PoissonDiskSampler::new(0.5, Vec2::new(2.0, 1.0), 30);
        assert_eq!(
            sampler.grid_width,
            ((2.0 / sampler.cell_size).ceil() as usize) + 1
        );
        assert_eq!(
            sampler.grid_height,
            ((1.0 / sampler.cell_size).ceil() as usize) + 1
        );
    }

    #[test]
    fn is_valid_point_rejects_close_neighbors() {
        let mut sampler = PoissonDiskSampler::new(1.0, Vec2::new(4.0, 4.0), 30);
        sampler.add_point(Vec2::new(2.0, 2.0));

        assert!(!sampler.is_valid_point(Vec2::new(2.5, 2.0)));
        assert!(sampler.is_valid_point(Vec2::new(3.5, 3.5)));
        assert!(!sampler.is_valid_point(Vec2::new(-0.1, 3.5)));
        assert!(!sampler.is_valid_point(Vec2::new(4.0, 1.0)));
    }

    #[test]
    fn generated_points_respect_radius_constraint() {
        let mut rng = StdRng::seed_from_u64(123);
        let sampling = PoissonDiskSampling::new(3.0);
        let points = sampling.generate(Vec2::new(40.0, 30.0).into(), &mut rng);

        assert!(points.len() > 10);
        for p in &points {
            assert!(p.x >= 0.0 && p.x < 40.0);
            assert!(p.y >= 0.0 && p.y < 30.0);
        }
        assert!(pairwise_min_distance(&points) >= 3.0 - 1e-4);
    }

    #[test]
    fn max_points_caps_output() {
        let mut rng = StdRng::seed_from_u64(4);
        let sampling = PoissonDiskSampling::new(1.0).with_max_points(12);
        let points = sampling.generate(Vec2::new(50.0, 50.0).into(), &mut rng);
        assert_eq!(points.len(), 12);
    }

    #[test]
    fn same_seed_same_points() {
        let sampling = PoissonDiskSampling::new(PoissonDiskSampling::radius_for_count(
            50.0, 50.0, 10,
        ));
        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let a = sampling.generate(Vec2::new(50.0, 50.0).into(), &mut rng_a);
        let b = sampling.generate(Vec2::new(50.0, 50.0).into(), &mut rng_b);
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn oversized_grid_is_rejected_without_allocating() {
        let extent = Vec2::new(10_000.0, 10_000.0);
        let tiny = PoissonDiskSampling::new(1e-5);
        assert!(tiny.check_extent(extent).unwrap_err().is_config());

        let mut rng = StdRng::seed_from_u64(2);
        assert!(tiny.generate(extent.into(), &mut rng).is_empty());

        let fine = PoissonDiskSampling::new(10.0);
        assert!(fine.check_extent(extent).is_ok());
        assert!(fine.grid_cells(extent) <= MAX_GRID_CELLS as f64);
    }

    #[test]
    fn zero_radius_returns_no_points() {
        let mut rng = StdRng::seed_from_u64(1);
        let sampling = PoissonDiskSampling::new(0.0);
        let points = sampling.generate(Vec2::new(1.0, 1.0).into(), &mut rng);
        assert!(points.is_empty());
    }
}
