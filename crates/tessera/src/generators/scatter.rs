//! Evenly spread circles from a shuffled, jittered grid.
use crate::error::Result;
use crate::events::EventSink;
use crate::generators::{
    cascade_top_up, fit_radius, run_generator, GenerationContext, GenerationInputs,
    ShapeGenerator, StyledShape,
};
use crate::geometry::Shape;
use crate::params::{Family, ScatterParams};
use crate::sampling::{rand_range, PositionSampling, StratifiedJitterSampling};

/// Circle radius relative to the smaller cell side.
const CELL_RADIUS_FRACTION: f32 = 0.35;

#[derive(Debug, Clone)]
pub struct ScatterGenerator {
    params: ScatterParams,
}

impl ScatterGenerator {
    pub fn try_new(params: ScatterParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ScatterParams {
        &self.params
    }
}

impl ShapeGenerator for ScatterGenerator {
    fn family(&self) -> Family {
        Family::ScatterCircles
    }

    fn generate_with_events(
        &self,
        ctx: &GenerationContext,
        inputs: &GenerationInputs<'_>,
        sink: &mut dyn EventSink,
    ) -> Vec<StyledShape> {
        run_generator(self.family(), ctx, sink, |rng, sink| {
            let canvas = ctx.canvas();
            let sampler = StratifiedJitterSampling::new(ctx.target_count(), self.params.jitter);
            let (cell_w, cell_h) = sampler.cell_size(canvas.into());
            let radius = fit_radius(
                (CELL_RADIUS_FRACTION * cell_w.min(cell_h) * self.params.radius_multiplier)
                    .max(1.0),
                canvas,
            );

            let mut shapes: Vec<Shape> = sampler
                .generate(canvas.into(), rng)
                .into_iter()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_target_count_circles() {
        let generator = ScatterGenerator::try_new(ScatterParams::default()).expect("generator");
        let ctx = GenerationContext::new(90.0, 60.0, 17, 5).expect("ctx");
        let shapes = generator.generate(&ctx, &GenerationInputs::new());
        assert_eq!(shapes.len(), 17);
        for s in &shapes {
            assert!(ctx.canvas_rect().contains_box(&s.shape.bbox().expect("bbox"), 1e-3));
        }
    }

    #[test]
    fn radius_follows_cell_size() {
        let generator = ScatterGenerator::try_new(ScatterParams::default()).expect("generator");
        // 4 points -> 2x2 grid of 50x50 cells.
        let ctx = GenerationContext::new(100.0, 100.0, 4, 1).expect("ctx");
        let shapes = generator.generate(&ctx, &GenerationInputs::new());
        for s in &shapes {
            match s.shape {
                Shape::Circle { radius, .. } => assert!((radius - 17.5).abs() < 1e-4),
                Shape::Polygon { .. } => panic!("scatter produced a polygon"),
            }
        }
    }

    #[test]
    fn radius_is_capped_by_a_tiny_canvas() {
        let generator = ScatterGenerator::try_new(ScatterParams::default()).expect("generator");
        let ctx = GenerationContext::new(1.0, 1.0, 4, 1).expect("ctx");
        let shapes = generator.generate(&ctx, &GenerationInputs::new());
        assert_eq!(shapes.len(), 4);
        for s in &shapes {
            let bbox = s.shape.bbox().expect("bbox");
            assert!(ctx.canvas_rect().contains_box(&bbox, 1e-5), "{bbox:?}");
        }
    }

    #[test]
    fn zero_target_is_empty() {
        let generator = ScatterGenerator::try_new(ScatterParams::default()).expect("generator");
        let ctx = GenerationContext::new(10.0, 10.0, 0, 1).expect("ctx");
        assert!(generator.generate(&ctx, &GenerationInputs::new()).is_empty());
    }

    #[test]
    fn seeds_differ() {
        let generator = ScatterGenerator::try_new(ScatterParams::default()).expect("generator");
        let a = generator.generate(
            &GenerationContext::new(100.0, 100.0, 9, 1).expect("ctx"),
            &GenerationInputs::new(),
        );
        let b = generator.generate(
            &GenerationContext::new(100.0, 100.0, 9, 2).expect("ctx"),
            &GenerationInputs::new(),
        );
        assert_ne!(a, b);
    }
}
