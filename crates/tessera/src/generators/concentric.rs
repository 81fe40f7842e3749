//! Concentric circles around the canvas centre. Ignores the seed.
use crate::error::Result;
use crate::events::EventSink;
use crate::generators::{
    run_generator, GenerationContext, GenerationInputs, ShapeGenerator, StyledShape,
};
use crate::geometry::Shape;
use crate::params::{ConcentricParams, Family};

/// Outermost radius as a fraction of the smaller canvas side.
const MAX_RADIUS_FRACTION: f32 = 0.45;

#[derive(Debug, Clone, Default)]
pub struct ConcentricGenerator {
    params: ConcentricParams,
}

impl ConcentricGenerator {
    pub fn try_new(params: ConcentricParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }
}

/// Radii of `count` rings (at least one) inside `max_radius`.
///
/// Rings are at least one unit wide unless `max_radius` itself is smaller.
pub fn ring_radii(count: usize, max_radius: f32) -> Vec<f32> {
    let n = count.max(1);
    let floor = 1.0_f32.min(max_radius);
    if n == 1 {
        return vec![(max_radius * 0.5).max(floor)];
    }
    (0..n)
        .map(|i| ((i + 1) as f32 * max_radius / n as f32).max(floor))
        .collect()
}

impl ShapeGenerator for ConcentricGenerator {
    fn family(&self) -> Family {
        Family::ConcentricCircles
    }

    fn generate_with_events(
        &self,
        ctx: &GenerationContext,
        inputs: &GenerationInputs<'_>,
        sink: &mut dyn EventSink,
    ) -> Vec<StyledShape> {
        run_generator(self.family(), ctx, sink, |_rng, _sink| {
            let canvas = ctx.canvas();
            let centre = canvas * 0.5;
            let max_radius = MAX_RADIUS_FRACTION * canvas.x.min(canvas.y);
            ring_radii(ctx.target_count(), max_radius)
                .into_iter()
                .map(|r| {
                    let shape = Shape::circle(centre.x, centre.y, r).clamp_into(canvas);
                    StyledShape::new(shape, inputs.color_at(centre, canvas), &self.params.style)
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_ring_is_half_the_maximum() {
        assert_eq!(ring_radii(0, 45.0), vec![22.5]);
        assert_eq!(ring_radii(1, 45.0), vec![22.5]);
    }

    #[test]
    fn radii_grow_evenly() {
        assert_eq!(ring_radii(3, 30.0), vec![10.0, 20.0, 30.0]);
        assert_eq!(ring_radii(2, 1.0), vec![1.0, 1.0]);
    }

    #[test]
    fn radii_never_exceed_a_small_maximum() {
        assert_eq!(ring_radii(1, 0.45), vec![0.45]);
        assert!(ring_radii(3, 0.45).iter().all(|&r| r <= 0.45));

        let generator = ConcentricGenerator::default();
        let ctx = GenerationContext::new(1.0, 1.0, 3, 1).expect("ctx");
        for s in generator.generate(&ctx, &GenerationInputs::new()) {
            let bbox = s.shape.bbox().expect("bbox");
            assert!(ctx.canvas_rect().contains_box(&bbox, 1e-5), "{bbox:?}");
        }
    }

    #[test]
    fn output_ignores_seed() {
        let generator = ConcentricGenerator::default();
        let a = generator.generate(
            &GenerationContext::new(100.0, 80.0, 4, 1).expect("ctx"),
            &GenerationInputs::new(),
        );
        let b = generator.generate(
            &GenerationContext::new(100.0, 80.0, 4, 99).expect("ctx"),
            &GenerationInputs::new(),
        );
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
        assert!(a.iter().all(|s| s.shape.centroid() == glam::Vec2::new(50.0, 40.0)));
    }
}
