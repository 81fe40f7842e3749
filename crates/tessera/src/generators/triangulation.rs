//! Delaunay triangle tessellation with a jittered-grid fallback.
use glam::Vec2;
use rand::Rng as RngCore;
use tracing::{debug, warn};

use crate::error::Result;
use crate::events::{DiscardReason, EventSink, GenerationEvent, GenerationEventKind};
use crate::generators::{
    cascade_top_up, discard, run_generator, seed_or_random_points, GenerationContext,
    GenerationInputs, ShapeGenerator, StyledShape,
};
use crate::geometry::Shape;
use crate::params::{Family, TriangulationParams};
use crate::providers::{DefaultProvider, TriangulationProvider};
use crate::sampling::rand_range;

/// Vertices per side of the fallback grid.
pub const FALLBACK_GRID_SIDE: usize = 8;
/// Fallback vertex jitter as a fraction of the smaller grid step.
pub const FALLBACK_JITTER: f32 = 0.2;
/// Size of cascade triangles relative to the average triangle.
const CASCADE_TRIANGLE_SCALE: f32 = 0.5;

/// Triangle tessellation over random or caller-supplied seed points.
#[derive(Debug, Clone)]
pub struct TriangulationGenerator<P = DefaultProvider> {
    params: TriangulationParams,
    provider: P,
}

impl TriangulationGenerator<DefaultProvider> {
    pub fn try_new(params: TriangulationParams) -> Result<Self> {
        Self::try_with_provider(params, DefaultProvider::default())
    }
}

impl<P: TriangulationProvider> TriangulationGenerator<P> {
    pub fn try_with_provider(params: TriangulationParams, provider: P) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, provider })
    }

    pub fn params(&self) -> &TriangulationParams {
        &self.params
    }

    fn triangles(
        &self,
        points: &[Vec2],
        canvas: Vec2,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Vec<Shape> {
        match self.provider.triangulate(points) {
            Ok(faces) => faces
                .into_iter()
                .map(|[a, b, c]| Shape::triangle(points[a], points[b], points[c]))
                .collect(),
            Err(err) => {
                warn!(
                    "Triangulation provider '{}' failed ({}); using jittered grid.",
                    self.provider.name(),
                    err
                );
                if sink.wants(GenerationEventKind::ProviderFallback) {
                    sink.send(GenerationEvent::ProviderFallback {
                        generator: Family::Triangulation.name(),
                        provider: self.provider.name().to_owned(),
                        reason: err.to_string(),
                    });
                }
                jittered_grid_triangles(canvas, rng)
            }
        }
    }
}

impl<P: TriangulationProvider> ShapeGenerator for TriangulationGenerator<P> {
    fn family(&self) -> Family {
        Family::Triangulation
    }

    fn generate_with_events(
        &self,
        ctx: &GenerationContext,
        inputs: &GenerationInputs<'_>,
        sink: &mut dyn EventSink,
    ) -> Vec<StyledShape> {
        let generator = self.family().name();
        run_generator(self.family(), ctx, sink, |rng, sink| {
            let canvas = ctx.canvas();
            let points = seed_or_random_points(
                inputs.seed_points,
                ctx.target_count(),
                canvas,
                generator,
                rng,
                sink,
            );

            let mut shapes = Vec::new();
            for triangle in self.triangles(&points, canvas, rng, sink) {
                if triangle.is_degenerate() {
                    discard(generator, DiscardReason::Degenerate, sink);
                    continue;
                }
                shapes.push(triangle);
            }
            debug!("Triangulated {} seed points into {} triangles.", points.len(), shapes.len());

            let average = (canvas.x * canvas.y / shapes.len().max(1) as f32).sqrt();
            let size = (average * CASCADE_TRIANGLE_SCALE)
                .max(1.0)
                .min(canvas.min_element());
            cascade_top_up(
                &mut shapes,
                canvas,
                ctx.target_count(),
                &self.params.cascade,
                |rng| small_triangle(size, rng),
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

/// Triangulate an 8x8 jittered vertex grid, two triangles per quad, the
/// diagonal alternating in a checkerboard.
pub fn jittered_grid_triangles(canvas: Vec2, rng: &mut dyn RngCore) -> Vec<Shape> {
    let side = FALLBACK_GRID_SIDE;
    let step = canvas / (side - 1) as f32;
    let jitter = FALLBACK_JITTER * step.x.min(step.y);

    let mut vertices = Vec::with_capacity(side * side);
    for j in 0..side {
        for i in 0..side {
            let base = Vec2::new(i as f32 * step.x, j as f32 * step.y);
            let dx = rand_range(rng, -jitter, jitter);
            let dy = rand_range(rng, -jitter, jitter);
            vertices.push((base + Vec2::new(dx, dy)).clamp(Vec2::ZERO, canvas));
        }
    }

    let at = |i: usize, j: usize| vertices[j * side + i];
    let mut triangles = Vec::with_capacity(2 * (side - 1) * (side - 1));
    for j in 0..side - 1 {
        for i in 0..side - 1 {
            let (a, b) = (at(i, j), at(i + 1, j));
            let (c, d) = (at(i, j + 1), at(i + 1, j + 1));
            if (i + j) % 2 == 0 {
                triangles.push(Shape::triangle(a, b, d));
                triangles.push(Shape::triangle(a, d, c));
            } else {
                triangles.push(Shape::triangle(a, b, c));
                triangles.push(Shape::triangle(b, d, c));
            }
        }
    }
    triangles
}

/// A random triangle inside a `size x size` box at the origin.
fn small_triangle(size: f32, rng: &mut dyn RngCore) -> Shape {
    let a = Vec2::new(rand_range(rng, 0.0, size * 0.4), size);
    let b = Vec2::new(rand_range(rng, size * 0.6, size), size);
    let c = Vec2::new(rand_range(rng, 0.0, size), 0.0);
    Shape::triangle(a, b, c)
}
