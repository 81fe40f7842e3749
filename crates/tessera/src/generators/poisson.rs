//! Blue-noise circles from Poisson-disk sampling.
use glam::Vec2;
use tracing::{debug, warn};

use crate::error::Result;
use crate::events::EventSink;
use crate::generators::{
    cascade_top_up, fit_radius, run_generator, GenerationContext, GenerationInputs,
    ShapeGenerator, StyledShape,
};
use crate::geometry::Shape;
use crate::params::{Family, PoissonParams};
use crate::sampling::{rand_range, PoissonDiskSampling, PositionSampling};

/// Circle radius relative to the average spacing of the points.
const CIRCLE_SCALE: f32 = 0.25;

#[derive(Debug, Clone)]
pub struct PoissonDiskGenerator {
    params: PoissonParams,
}

impl PoissonDiskGenerator {
    pub fn try_new(params: PoissonParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &PoissonParams {
        &self.params
    }

    /// The sampler for a canvas, capped at `target_count` points when non-zero.
    pub fn sampler(&self, canvas: Vec2, target_count: usize) -> PoissonDiskSampling {
        let sampling = PoissonDiskSampling::new(self.params.min_distance(canvas.x, canvas.y))
            .with_attempts(self.params.k);
        if target_count > 0 {
            sampling.with_max_points(target_count)
        } else {
            sampling
        }
    }

    /// Rejects canvases whose sampling grid would exceed
    /// [`MAX_GRID_CELLS`](crate::sampling::poisson_disk::MAX_GRID_CELLS).
    pub fn check_canvas(&self, canvas: Vec2) -> Result<()> {
        self.sampler(canvas, 0).check_extent(canvas)
    }

    /// Output circle radius for `count` points.
    pub fn circle_radius(&self, canvas: Vec2, count: usize) -> f32 {
        let spacing = (canvas.x * canvas.y / count.max(1) as f32).sqrt();
        spacing * CIRCLE_SCALE * self.params.radius_multiplier
    }
}

impl ShapeGenerator for PoissonDiskGenerator {
    fn family(&self) -> Family {
        Family::PoissonDisk
    }

    fn generate_with_events(
        &self,
        ctx: &GenerationContext,
        inputs: &GenerationInputs<'_>,
        sink: &mut dyn EventSink,
    ) -> Vec<StyledShape> {
        run_generator(self.family(), ctx, sink, |rng, sink| {
            let canvas = ctx.canvas();
            let sampler = self.sampler(canvas, ctx.target_count());
            if let Err(err) = sampler.check_extent(canvas) {
                warn!("Poisson-disk sampling skipped: {}.", err);
            }
            let points: Vec<Vec2> = sampler
                .generate(canvas.into(), rng)
                .into_iter()
                .map(Vec2::from)
                .collect();
            debug!(
                "Poisson-disk sampling with r = {} produced {} points.",
                sampler.radius,
                points.len()
            );

            let radius = fit_radius(self.circle_radius(canvas, points.len()), canvas);
            let mut shapes: Vec<Shape> = points
                .iter()
                .map(|p| Shape::circle(p.x, p.y, radius).clamp_into(canvas))
                .collect();

            cascade_top_up(
                &mut shapes,
                canvas,
                ctx.target_count(),
                &self.params.cascade,
                |rng| {
                    let r = radius * rand_range(rng, 0.5, 1.0);
                    Shape::circle(r, r, r)
                },
                rng,
                sink,
            );

            shapes
                .into_iter()
                .map(|shape| {
                    let fill = inputs.color_at(shape.centroid(), canvas);
                    StyledShape::new(shape, fill, &self.params.style)
                })
                .collect()
        })
    }
}
