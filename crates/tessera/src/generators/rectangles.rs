//! Axis-aligned rectangle packing.
//!
//! Up to four rectangles are seeded at the quadrant centres. After that every
//! fifth rectangle, and every rectangle while fewer than ten exist, is placed
//! at random; the rest are placed flush against a random existing rectangle.
//! Random placement switches to the canvas edge bands after a third of its
//! attempts. Adjacent placement checks collisions with half the configured
//! overlap tolerance so neighbours stay tight.
use glam::Vec2;
use rand::Rng as RngCore;
use tracing::{debug, warn};

use crate::cascade::edge_bands;
use crate::error::Result;
use crate::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::generators::{
    cascade_top_up, run_generator, GenerationContext, GenerationInputs, ShapeGenerator,
    StyledShape,
};
use crate::geometry::{BoundingBox, Shape};
use crate::params::{Family, RectangleParams};
use crate::sampling::{rand01, rand_index, rand_range};
use crate::spatial::{ShapeId, SpatialIndex};

/// Fraction of the target count that may fail before packing stops.
pub const FAILURE_BUDGET: f32 = 0.2;
/// Every n-th rectangle is placed at random.
const RANDOM_EVERY: usize = 5;
/// Rectangles placed at random before adjacency kicks in.
const RANDOM_WARMUP: usize = 10;
/// Containment slack for adjacent candidates.
const CONTAINMENT_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone)]
pub struct RectanglePacker {
    params: RectangleParams,
}

impl RectanglePacker {
    pub fn try_new(params: RectangleParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &RectangleParams {
        &self.params
    }

    /// Pack rectangles into a fresh index. Returns the placed rectangles in
    /// placement order.
    pub fn pack(
        &self,
        canvas: Vec2,
        target_count: usize,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Vec<Shape> {
        let generator = Family::Rectangles.name();
        if target_count == 0 {
            return Vec::new();
        }

        let sizer = RectangleSizer::new(&self.params, canvas, target_count);
        let tolerance = self.params.overlap_tolerance;
        let mut index = SpatialIndex::new(canvas);

        for centre in quadrant_centres(canvas).into_iter().take(target_count) {
            let size = sizer.draw(rng);
            let corner = centre - size * 0.5;
            let rect = Shape::rectangle(corner.x, corner.y, size.x, size.y).clamp_into(canvas);
            if !index.has_collision(&rect, tolerance) {
                index.insert(rect);
            }
        }
        debug!("Seeded {} rectangles at quadrant centres.", index.len());

        let max_attempts = self.params.max_attempts.max(1);
        let budget = FAILURE_BUDGET * target_count as f32;
        let mut failures = 0usize;

        for i in index.len()..target_count {
            let size = sizer.draw(rng);
            let random = index.len() % RANDOM_EVERY == 0 || index.len() < RANDOM_WARMUP;

            let mut placed = None;
            for attempt in 0..max_attempts {
                let candidate = if random {
                    Some(random_candidate(canvas, size, attempt, max_attempts, rng))
                        .filter(|rect| !index.has_collision(rect, tolerance))
                } else {
                    adjacent_candidate(&index, size, tolerance * 0.5, rng)
                };
                if let Some(rect) = candidate {
                    if let Some(id) = index.insert(rect) {
                        placed = Some((id, attempt + 1));
                        break;
                    }
                }
            }

            match placed {
                Some((id, attempts)) => {
                    if sink.wants(GenerationEventKind::ShapePlaced) {
                        sink.send(GenerationEvent::ShapePlaced {
                            generator,
                            index: i,
                            attempts,
                            id,
                        });
                    }
                }
                None => {
                    failures += 1;
                    if sink.wants(GenerationEventKind::PlacementFailed) {
                        sink.send(GenerationEvent::PlacementFailed {
                            generator,
                            index: i,
                            attempts: max_attempts,
                        });
                    }
                    if failures as f32 > budget {
                        warn!(
                            "Rectangle packing stopped after {} rectangles ({} failed).",
                            index.len(),
                            failures
                        );
                        if sink.wants(GenerationEventKind::PlacementAborted) {
                            sink.send(GenerationEvent::PlacementAborted {
                                generator,
                                placed: index.len(),
                                failures,
                            });
                        }
                        break;
                    }
                }
            }
        }

        index.into_shapes()
    }
}

impl ShapeGenerator for RectanglePacker {
    fn family(&self) -> Family {
        Family::Rectangles
    }

    fn generate_with_events(
        &self,
        ctx: &GenerationContext,
        inputs: &GenerationInputs<'_>,
        sink: &mut dyn EventSink,
    ) -> Vec<StyledShape> {
        run_generator(self.family(), ctx, sink, |rng, sink| {
            let canvas = ctx.canvas();
            let mut shapes = self.pack(canvas, ctx.target_count(), rng, sink);

            let sizer = RectangleSizer::new(&self.params, canvas, ctx.target_count().max(1));
            cascade_top_up(
                &mut shapes,
                canvas,
                ctx.target_count(),
                &self.params.cascade,
                |rng| {
                    let size = sizer.draw_small(rng);
                    Shape::rectangle(0.0, 0.0, size.x, size.y)
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

/// Rectangle dimensions drawn from the configured size and aspect ranges.
#[derive(Debug, Clone, Copy)]
struct RectangleSizer {
    min_size: f32,
    max_size: f32,
    aspect_variance: f32,
    canvas: Vec2,
}

impl RectangleSizer {
    fn new(params: &RectangleParams, canvas: Vec2, target_count: usize) -> Self {
        let average = (canvas.x * canvas.y / target_count.max(1) as f32).sqrt();
        Self {
            min_size: average * params.min_size_multiplier,
            max_size: average * params.max_size_multiplier,
            aspect_variance: params.aspect_ratio_variance.max(1.0),
            canvas,
        }
    }

    /// Base size skewed toward the small end, so large rectangles stay rare.
    fn draw(&self, rng: &mut dyn RngCore) -> Vec2 {
        let u = rand01(rng);
        let base = self.min_size + (self.max_size - self.min_size) * u * u;
        self.shaped(base, rng)
    }

    /// A size from the bottom of the range, for gap filling.
    fn draw_small(&self, rng: &mut dyn RngCore) -> Vec2 {
        let base = rand_range(rng, self.min_size * 0.5, self.min_size);
        self.shaped(base, rng)
    }

    fn shaped(&self, base: f32, rng: &mut dyn RngCore) -> Vec2 {
        let mut aspect = rand_range(rng, 1.0, self.aspect_variance);
        if rand01(rng) < 0.5 {
            aspect = 1.0 / aspect;
        }
        let root = aspect.sqrt();
        Vec2::new(
            (base * root).clamp(1.0_f32.min(self.canvas.x), self.canvas.x),
            (base / root).clamp(1.0_f32.min(self.canvas.y), self.canvas.y),
        )
    }
}

fn quadrant_centres(canvas: Vec2) -> [Vec2; 4] {
    [
        Vec2::new(0.25, 0.25),
        Vec2::new(0.75, 0.25),
        Vec2::new(0.25, 0.75),
        Vec2::new(0.75, 0.75),
    ]
    .map(|f| f * canvas)
}

/// Uniform over the canvas for the first third of the attempts, then inside
/// a random edge band.
fn random_candidate(
    canvas: Vec2,
    size: Vec2,
    attempt: usize,
    max_attempts: usize,
    rng: &mut dyn RngCore,
) -> Shape {
    let region = if attempt < max_attempts / 3 {
        BoundingBox::canvas(canvas)
    } else {
        let bands = edge_bands(canvas);
        bands[rand_index(rng, bands.len())]
    };
    let x = rand_range(rng, region.min.x, region.max.x - size.x);
    let y = rand_range(rng, region.min.y, region.max.y - size.y);
    Shape::rectangle(x, y, size.x, size.y).clamp_into(canvas)
}

/// First of the eight flush positions around a random anchor that fits the
/// canvas without collision.
fn adjacent_candidate(
    index: &SpatialIndex,
    size: Vec2,
    tolerance: f32,
    rng: &mut dyn RngCore,
) -> Option<Shape> {
    if index.is_empty() {
        return None;
    }
    let anchor = index.get(ShapeId(rand_index(rng, index.len())))?.bbox()?;
    let canvas = BoundingBox::canvas(index.canvas());
    let (w, h) = (size.x, size.y);

    let corners = [
        // left
        Vec2::new(anchor.min.x - w, anchor.min.y),
        Vec2::new(anchor.min.x - w, anchor.max.y - h),
        // right
        Vec2::new(anchor.max.x, anchor.min.y),
        Vec2::new(anchor.max.x, anchor.max.y - h),
        // top
        Vec2::new(anchor.min.x, anchor.min.y - h),
        Vec2::new(anchor.max.x - w, anchor.min.y - h),
        // bottom
        Vec2::new(anchor.min.x, anchor.max.y),
        Vec2::new(anchor.max.x - w, anchor.max.y),
    ];

    corners.into_iter().find_map(|corner| {
        let rect = Shape::rectangle(corner.x, corner.y, w, h);
        let bbox = rect.bbox()?;
        let fits = canvas.contains_box(&bbox, CONTAINMENT_EPSILON)
            && !index.has_collision(&rect, tolerance);
        fits.then_some(rect)
    })
}
