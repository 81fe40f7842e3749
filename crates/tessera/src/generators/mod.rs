//! Shape generators, one per [`Family`], and the shared generation entry point.
//!
//! Every generator:
//! - owns a fresh RNG seeded from [`GenerationContext::seed`],
//! - keeps all output inside the canvas rectangle,
//! - drops degenerate geometry before it reaches the output,
//! - returns its shapes in canonical order (see [`crate::ordering`]).
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng as RngCore, SeedableRng};
use tracing::{info, warn};

use crate::cascade::CascadeFill;
use crate::color::{Color, ColorSampler};
use crate::error::{Error, Result};
use crate::events::{DiscardReason, EventSink, GenerationEvent, GenerationEventKind};
use crate::geometry::{BoundingBox, Shape};
use crate::ordering::{canonicalize, HasShape};
use crate::params::{CascadeOptions, Family, FamilyParams, StyleParams};
use crate::providers::DefaultProvider;
use crate::sampling::rand_range;
use crate::spatial::SpatialIndex;

pub mod concentric;
pub mod poisson;
pub mod rectangles;
pub mod scatter;
pub mod triangulation;
pub mod voronoi;

pub use concentric::ConcentricGenerator;
pub use poisson::PoissonDiskGenerator;
pub use rectangles::RectanglePacker;
pub use scatter::ScatterGenerator;
pub use triangulation::TriangulationGenerator;
pub use voronoi::VoronoiGenerator;

/// Immutable inputs shared by every generator call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationContext {
    canvas: Vec2,
    target_count: usize,
    seed: u64,
}

impl GenerationContext {
    /// Fails with [`Error::InvalidConfig`] unless both canvas dimensions are
    /// finite and > 0.
    pub fn new(width: f32, height: f32, target_count: usize, seed: u64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "canvas must be > 0 in both dimensions, got {width}x{height}"
            )));
        }
        Ok(Self {
            canvas: Vec2::new(width, height),
            target_count,
            seed,
        })
    }

    /// Like [`GenerationContext::new`] for callers holding a signed count.
    pub fn try_from_signed(width: f32, height: f32, target_count: i64, seed: u64) -> Result<Self> {
        let target_count = usize::try_from(target_count).map_err(|_| {
            Error::InvalidConfig(format!("target_count must be >= 0, got {target_count}"))
        })?;
        Self::new(width, height, target_count, seed)
    }

    pub fn canvas(&self) -> Vec2 {
        self.canvas
    }

    pub fn width(&self) -> f32 {
        self.canvas.x
    }

    pub fn height(&self) -> f32 {
        self.canvas.y
    }

    pub fn canvas_rect(&self) -> BoundingBox {
        BoundingBox::canvas(self.canvas)
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// A fresh RNG for one generation call.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}

/// Optional caller-supplied inputs.
#[derive(Clone, Copy, Default)]
pub struct GenerationInputs<'a> {
    /// Seed points for the triangulation and Voronoi families.
    pub seed_points: Option<&'a [Vec2]>,
    /// Fill colour source; neutral gray when absent.
    pub sampler: Option<&'a dyn ColorSampler>,
}

impl<'a> GenerationInputs<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed_points(mut self, points: &'a [Vec2]) -> Self {
        self.seed_points = Some(points);
        self
    }

    pub fn with_sampler(mut self, sampler: &'a dyn ColorSampler) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// Fill colour at `p`.
    pub fn color_at(&self, p: Vec2, canvas: Vec2) -> Color {
        match self.sampler {
            Some(sampler) => sampler.sample(p.x, p.y, canvas.x, canvas.y),
            None => Color::GRAY,
        }
    }
}

/// A shape with its render attributes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyledShape {
    pub shape: Shape,
    pub fill: Color,
    /// Outline colour; `None` for unstroked shapes.
    pub stroke: Option<Color>,
    pub stroke_width: f32,
    pub opacity: f32,
}

impl StyledShape {
    /// Polygons get the style's stroke; circles are left unstroked.
    pub fn new(shape: Shape, fill: Color, style: &StyleParams) -> Self {
        let (stroke, stroke_width) = match shape {
            Shape::Polygon { .. } => (Some(style.stroke), style.stroke_width),
            Shape::Circle { .. } => (None, 0.0),
        };
        Self {
            shape,
            fill,
            stroke,
            stroke_width,
            opacity: style.opacity,
        }
    }
}

impl HasShape for StyledShape {
    fn shape(&self) -> &Shape {
        &self.shape
    }
}

/// A generator for one shape family.
pub trait ShapeGenerator {
    fn family(&self) -> Family;

    fn generate_with_events(
        &self,
        ctx: &GenerationContext,
        inputs: &GenerationInputs<'_>,
        sink: &mut dyn EventSink,
    ) -> Vec<StyledShape>;

    fn generate(&self, ctx: &GenerationContext, inputs: &GenerationInputs<'_>) -> Vec<StyledShape> {
        self.generate_with_events(ctx, inputs, &mut ())
    }
}

/// Validate `params` and run the matching generator with the default providers.
///
/// The only error is [`Error::InvalidConfig`]; provider failures are handled
/// inside the generators.
pub fn generate_family(
    params: &FamilyParams,
    ctx: &GenerationContext,
    inputs: &GenerationInputs<'_>,
) -> Result<Vec<StyledShape>> {
    generate_family_with_events(params, ctx, inputs, &mut ())
}

pub fn generate_family_with_events(
    params: &FamilyParams,
    ctx: &GenerationContext,
    inputs: &GenerationInputs<'_>,
    sink: &mut dyn EventSink,
) -> Result<Vec<StyledShape>> {
    let shapes = match params {
        FamilyParams::Triangulation(p) => {
            TriangulationGenerator::try_with_provider(p.clone(), DefaultProvider::default())?
                .generate_with_events(ctx, inputs, sink)
        }
        FamilyParams::Voronoi(p) => {
            VoronoiGenerator::try_with_provider(p.clone(), DefaultProvider::default())?
                .generate_with_events(ctx, inputs, sink)
        }
        FamilyParams::Rectangles(p) => {
            RectanglePacker::try_new(p.clone())?.generate_with_events(ctx, inputs, sink)
        }
        FamilyParams::PoissonDisk(p) => {
            let generator = PoissonDiskGenerator::try_new(p.clone())?;
            generator.check_canvas(ctx.canvas())?;
            generator.generate_with_events(ctx, inputs, sink)
        }
        FamilyParams::ScatterCircles(p) => {
            ScatterGenerator::try_new(p.clone())?.generate_with_events(ctx, inputs, sink)
        }
        FamilyParams::ConcentricCircles(p) => {
            ConcentricGenerator::try_new(p.clone())?.generate_with_events(ctx, inputs, sink)
        }
    };
    Ok(shapes)
}

/// Start/finish bookkeeping shared by all generators: logging, events and
/// the final canonical sort.
pub(crate) fn run_generator<F>(
    family: Family,
    ctx: &GenerationContext,
    sink: &mut dyn EventSink,
    body: F,
) -> Vec<StyledShape>
where
    F: FnOnce(&mut StdRng, &mut dyn EventSink) -> Vec<StyledShape>,
{
    let generator = family.name();
    info!(
        "Generating '{}' on {}x{} canvas: target {}, seed {}.",
        generator,
        ctx.width(),
        ctx.height(),
        ctx.target_count(),
        ctx.seed()
    );
    if sink.wants(GenerationEventKind::GenerationStarted) {
        sink.send(GenerationEvent::GenerationStarted {
            generator,
            canvas: ctx.canvas(),
            target_count: ctx.target_count(),
            seed: ctx.seed(),
        });
    }

    let mut rng = ctx.rng();
    let mut shapes = body(&mut rng, sink);
    canonicalize(&mut shapes);

    info!("Generated {} '{}' shapes.", shapes.len(), generator);
    if sink.wants(GenerationEventKind::GenerationFinished) {
        sink.send(GenerationEvent::GenerationFinished {
            generator,
            produced: shapes.len(),
        });
    }
    shapes
}

/// Caller seed points that are finite and inside the canvas.
pub(crate) fn usable_seed_points(
    points: &[Vec2],
    canvas: Vec2,
    generator: &'static str,
    sink: &mut dyn EventSink,
) -> Vec<Vec2> {
    let rect = BoundingBox::canvas(canvas);
    let (inside, outside): (Vec<Vec2>, Vec<Vec2>) = points
        .iter()
        .copied()
        .partition(|p| p.is_finite() && rect.contains_point(*p));

    if !outside.is_empty() {
        warn!(
            "Ignoring {} seed points outside the {}x{} canvas.",
            outside.len(),
            canvas.x,
            canvas.y
        );
        if sink.wants(GenerationEventKind::ShapeDiscarded) {
            for _ in &outside {
                sink.send(GenerationEvent::ShapeDiscarded {
                    generator,
                    reason: DiscardReason::SeedOutsideCanvas,
                });
            }
        }
    }
    inside
}

/// Caller seed points when at least three are usable, else
/// `max(3, target_count)` uniform points.
pub(crate) fn seed_or_random_points(
    seed_points: Option<&[Vec2]>,
    target_count: usize,
    canvas: Vec2,
    generator: &'static str,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> Vec<Vec2> {
    if let Some(points) = seed_points {
        let usable = usable_seed_points(points, canvas, generator, sink);
        if usable.len() >= 3 {
            return usable;
        }
        let message = format!(
            "only {} usable seed points; sampling {} random points instead",
            usable.len(),
            target_count.max(3)
        );
        warn!("{}: {}.", generator, message);
        if sink.wants(GenerationEventKind::Warning) {
            sink.send(GenerationEvent::Warning {
                context: generator.to_owned(),
                message,
            });
        }
    }
    (0..target_count.max(3))
        .map(|_| {
            let x = rand_range(rng, 0.0, canvas.x);
            let y = rand_range(rng, 0.0, canvas.y);
            Vec2::new(x, y)
        })
        .collect()
}

/// Circle radius no wider than the canvas allows.
pub(crate) fn fit_radius(radius: f32, canvas: Vec2) -> f32 {
    radius.min(0.5 * canvas.min_element())
}

/// Report a degenerate shape that was dropped.
pub(crate) fn discard(generator: &'static str, reason: DiscardReason, sink: &mut dyn EventSink) {
    if sink.wants(GenerationEventKind::ShapeDiscarded) {
        sink.send(GenerationEvent::ShapeDiscarded { generator, reason });
    }
}

/// Run cascade fill over `shapes` when enabled, appending what it places.
pub(crate) fn cascade_top_up<F>(
    shapes: &mut Vec<Shape>,
    canvas: Vec2,
    target_count: usize,
    options: &CascadeOptions,
    factory: F,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) where
    F: FnMut(&mut dyn RngCore) -> Shape,
{
    if !options.enabled || shapes.len() >= target_count {
        return;
    }
    let effective = options.effective_target(shapes.len(), target_count);
    let mut index = SpatialIndex::from_shapes(canvas, shapes.iter());
    let result = CascadeFill::new(options.fill).apply_with_events(
        shapes,
        &mut index,
        effective,
        factory,
        rng,
        sink,
    );
    shapes.extend(result.shapes);
}
