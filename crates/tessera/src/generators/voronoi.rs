//! Voronoi cell tessellation clipped to the canvas.
//!
//! Unbounded cells are closed by pushing each open ridge outward, away from
//! the centroid of the sites, by twice the coordinate spread of the sites.
//! The resulting ring is sorted by angle around its own centroid and clipped
//! with [`clip_polygon_to_rect`]. When no provider is available, or when no
//! cell survives clipping, every site becomes a small circle instead.
use std::cmp::Ordering;

use glam::Vec2;
use tracing::{debug, warn};

use crate::error::Result;
use crate::events::{DiscardReason, EventSink, GenerationEvent, GenerationEventKind};
use crate::generators::{
    discard, fit_radius, run_generator, seed_or_random_points, GenerationContext,
    GenerationInputs, ShapeGenerator, StyledShape,
};
use crate::geometry::{clean_ring, clip_polygon_to_rect, BoundingBox, Shape, POINT_EPSILON};
use crate::params::{Family, VoronoiParams};
use crate::providers::{DefaultProvider, VoronoiDiagram, VoronoiProvider};

/// Fallback circle radius as a fraction of the smaller canvas side.
pub const FALLBACK_RADIUS_FRACTION: f32 = 0.0075;

#[derive(Debug, Clone)]
pub struct VoronoiGenerator<P = DefaultProvider> {
    params: VoronoiParams,
    provider: P,
}

impl VoronoiGenerator<DefaultProvider> {
    pub fn try_new(params: VoronoiParams) -> Result<Self> {
        Self::try_with_provider(params, DefaultProvider::default())
    }
}

impl<P: VoronoiProvider> VoronoiGenerator<P> {
    pub fn try_with_provider(params: VoronoiParams, provider: P) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, provider })
    }

    pub fn params(&self) -> &VoronoiParams {
        &self.params
    }
}

impl<P: VoronoiProvider> ShapeGenerator for VoronoiGenerator<P> {
    fn family(&self) -> Family {
        Family::Voronoi
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

            let cells = match self.provider.diagram(&points) {
                Ok(diagram) => clipped_cells(&diagram, &ctx.canvas_rect(), sink),
                Err(err) => {
                    warn!(
                        "Voronoi provider '{}' failed ({}); drawing sites as circles.",
                        self.provider.name(),
                        err
                    );
                    if sink.wants(GenerationEventKind::ProviderFallback) {
                        sink.send(GenerationEvent::ProviderFallback {
                            generator,
                            provider: self.provider.name().to_owned(),
                            reason: err.to_string(),
                        });
                    }
                    Vec::new()
                }
            };

            // Circles never go through cascade.
            let shapes = if cells.is_empty() {
                site_circles(&points, canvas)
            } else {
                cells
            };

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

/// Every cell of `diagram` made finite, clipped to `rect`, degenerate
/// results dropped.
pub fn clipped_cells(
    diagram: &VoronoiDiagram,
    rect: &BoundingBox,
    sink: &mut dyn EventSink,
) -> Vec<Shape> {
    let generator = Family::Voronoi.name();
    let (center, radius) = extension_frame(&diagram.sites);

    let mut cells = Vec::with_capacity(diagram.sites.len());
    for site in 0..diagram.sites.len() {
        let ring = finite_ring(diagram, site, center, radius);
        let clipped = clean_ring(&clip_polygon_to_rect(&ring, rect));
        let Some(shape) = Shape::polygon(clipped) else {
            discard(generator, DiscardReason::ClippedAway, sink);
            continue;
        };
        if shape.is_degenerate() {
            discard(generator, DiscardReason::Degenerate, sink);
            continue;
        }
        cells.push(shape);
    }
    debug!("Clipped {} of {} Voronoi cells.", cells.len(), diagram.sites.len());
    cells
}

/// Centroid of the sites and the far-point distance for open ridges.
fn extension_frame(sites: &[Vec2]) -> (Vec2, f32) {
    if sites.is_empty() {
        return (Vec2::ZERO, 1.0);
    }
    let center = sites.iter().copied().sum::<Vec2>() / sites.len() as f32;
    let (lo, hi) = sites.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.min_element()), hi.max(p.max_element()))
    });
    let spread = hi - lo;
    (center, if spread > 0.0 { 2.0 * spread } else { 1.0 })
}

/// Vertex ring of one cell, sorted by angle around its centroid.
fn finite_ring(diagram: &VoronoiDiagram, site: usize, center: Vec2, radius: f32) -> Vec<Vec2> {
    let Some(region) = diagram.regions.get(site) else {
        return Vec::new();
    };
    let mut ring: Vec<Vec2> = region
        .vertices
        .iter()
        .filter_map(|&v| diagram.vertices.get(v).copied())
        .collect();
    if region.bounded {
        return ring;
    }

    let Some(&p) = diagram.sites.get(site) else {
        return Vec::new();
    };
    for ridge in diagram.ridges_of(site) {
        let Some(vertex) = ridge.finite_vertex().and_then(|v| diagram.vertices.get(v)) else {
            continue;
        };
        let other = if ridge.sites[0] == site {
            ridge.sites[1]
        } else {
            ridge.sites[0]
        };
        let Some(&q) = diagram.sites.get(other) else {
            continue;
        };
        let tangent = (q - p).normalize_or_zero();
        let normal = Vec2::new(-tangent.y, tangent.x);
        let midpoint = (p + q) * 0.5;
        // A centroid on the ridge's own line gives no outward side.
        let direction = match (midpoint - center).dot(normal).partial_cmp(&0.0) {
            Some(Ordering::Less) => -normal,
            Some(Ordering::Greater) => normal,
            _ => Vec2::ZERO,
        };
        ring.push(*vertex + direction * radius);
    }

    let mut unique: Vec<Vec2> = Vec::with_capacity(ring.len());
    for v in ring {
        if unique.iter().all(|u| u.distance(v) > POINT_EPSILON) {
            unique.push(v);
        }
    }
    sort_by_angle(&mut unique);
    unique
}

fn sort_by_angle(ring: &mut [Vec2]) {
    if ring.is_empty() {
        return;
    }
    let c = ring.iter().copied().sum::<Vec2>() / ring.len() as f32;
    ring.sort_by(|a, b| {
        let (da, db) = (*a - c, *b - c);
        da.y.atan2(da.x).total_cmp(&db.y.atan2(db.x))
    });
}

/// One small circle per site.
pub fn site_circles(points: &[Vec2], canvas: Vec2) -> Vec<Shape> {
    let radius = fit_radius(
        (FALLBACK_RADIUS_FRACTION * canvas.x.min(canvas.y)).max(1.0),
        canvas,
    );
    points
        .iter()
        .map(|p| Shape::circle(p.x, p.y, radius).clamp_into(canvas))
        .collect()
}
