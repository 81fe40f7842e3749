//! Cascade fill: tops an existing layout up toward a target count.
//!
//! Shapes are produced by a caller-supplied factory at the origin and moved
//! into one of three kinds of regions depending on progress:
//!
//! | progress `i / remaining` | region                                   |
//! |--------------------------|------------------------------------------|
//! | `< 0.3`                  | one of the four canvas edge bands        |
//! | `0.3 .. 0.7`             | a coarse empty region (random if none)   |
//! | `>= 0.7`                 | anywhere on the canvas                   |
//!
//! Each shape gets at most `max_attempts` placements. A failure past 60% of
//! the run ends the whole fill.
use glam::Vec2;
use rand::Rng as RngCore;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::events::{DiscardReason, EventSink, GenerationEvent, GenerationEventKind};
use crate::geometry::{BoundingBox, Shape};
use crate::sampling::{rand_index, rand_range};
use crate::spatial::SpatialIndex;

pub mod regions;

pub use regions::{detect_gap_regions, edge_bands, OccupancyMask};

/// Progress fraction below which shapes go into the edge bands.
pub const EDGE_PHASE_END: f64 = 0.3;
/// Progress fraction below which shapes go into detected gaps.
pub const GAP_PHASE_END: f64 = 0.7;
/// A failed placement past this progress fraction stops the fill.
pub const EARLY_TERMINATION_FRACTION: f64 = 0.6;

/// Collision tolerance used for cascade placements.
pub const DEFAULT_CASCADE_TOLERANCE: f32 = 0.25;

const GENERATOR: &str = "cascade";

/// Region strategy used for a placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacementPhase {
    EdgeBands,
    Gaps,
    Random,
}

impl PlacementPhase {
    /// Phase for progress index `i` out of `remaining`.
    pub fn for_progress(i: usize, remaining: usize) -> Self {
        let i = i as f64;
        let remaining = remaining as f64;
        if i < remaining * EDGE_PHASE_END {
            PlacementPhase::EdgeBands
        } else if i < remaining * GAP_PHASE_END {
            PlacementPhase::Gaps
        } else {
            PlacementPhase::Random
        }
    }
}

/// Cascade fill parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CascadeConfig {
    /// Gap regions narrower than this are ignored.
    pub min_size: f32,
    /// Placement attempts per shape.
    pub max_attempts: usize,
    /// Signed collision tolerance, see [`BoundingBox::overlaps`].
    pub tolerance: f32,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            min_size: 2.0,
            max_attempts: 100,
            tolerance: DEFAULT_CASCADE_TOLERANCE,
        }
    }
}

impl CascadeConfig {
    pub fn with_min_size(mut self, min_size: f32) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_size.is_finite() || self.min_size < 0.0 {
            return Err(Error::InvalidConfig(
                "cascade min_size must be finite and >= 0".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig(
                "cascade max_attempts must be > 0".into(),
            ));
        }
        if !self.tolerance.is_finite() {
            return Err(Error::InvalidConfig(
                "cascade tolerance must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// Outcome of [`CascadeFill::apply`].
#[derive(Debug, Clone, Default)]
pub struct CascadeResult {
    /// Newly placed shapes in placement order. They are also in the index.
    pub shapes: Vec<Shape>,
    /// Shapes that could not be placed.
    pub failed: usize,
    /// `true` if the failure budget ended the fill.
    pub terminated_early: bool,
}

/// Generic gap-filling placement engine.
#[derive(Debug, Clone, Default)]
pub struct CascadeFill {
    config: CascadeConfig,
}

impl CascadeFill {
    pub fn new(config: CascadeConfig) -> Self {
        Self { config }
    }

    /// Like [`CascadeFill::new`] but rejects an invalid config.
    pub fn try_new(config: CascadeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    /// Add shapes until `existing.len() + placed == target_count` or the
    /// budgets run out.
    ///
    /// `index` must already contain `existing`; placed shapes are inserted into
    /// it as they are accepted. `factory` is called once per target shape and
    /// should return a shape near the origin.
    pub fn apply<F>(
        &self,
        existing: &[Shape],
        index: &mut SpatialIndex,
        target_count: usize,
        factory: F,
        rng: &mut dyn RngCore,
    ) -> CascadeResult
    where
        F: FnMut(&mut dyn RngCore) -> Shape,
    {
        self.apply_with_events(existing, index, target_count, factory, rng, &mut ())
    }

    pub fn apply_with_events<F>(
        &self,
        existing: &[Shape],
        index: &mut SpatialIndex,
        target_count: usize,
        mut factory: F,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> CascadeResult
    where
        F: FnMut(&mut dyn RngCore) -> Shape,
    {
        let mut result = CascadeResult::default();
        let remaining = target_count.saturating_sub(existing.len());
        if remaining == 0 {
            return result;
        }

        let canvas = index.canvas();
        let canvas_rect = BoundingBox::canvas(canvas);
        let bands = edge_bands(canvas);
        let gaps = detect_gap_regions(canvas, existing, self.config.min_size);
        let max_attempts = self.config.max_attempts.max(1);

        debug!(
            "Cascade fill: {} existing, {} to add, {} gap regions.",
            existing.len(),
            remaining,
            gaps.len()
        );
        if sink.wants(GenerationEventKind::CascadeStarted) {
            sink.send(GenerationEvent::CascadeStarted {
                existing: existing.len(),
                target_count,
                remaining,
                gap_regions: gaps.len(),
            });
        }

        let mut current_phase = None;
        for i in 0..remaining {
            let phase = PlacementPhase::for_progress(i, remaining);
            if current_phase != Some(phase) {
                current_phase = Some(phase);
                debug!("Cascade phase {:?} from shape {}.", phase, i);
                if sink.wants(GenerationEventKind::CascadePhaseStarted) {
                    sink.send(GenerationEvent::CascadePhaseStarted { phase, index: i });
                }
            }

            let template = factory(&mut *rng);
            let placed = match template_size(&template, canvas) {
                Ok(size) => {
                    let mut placed = false;
                    for attempt in 0..max_attempts {
                        let region = match phase {
                            PlacementPhase::EdgeBands => bands[rand_index(rng, bands.len())],
                            PlacementPhase::Gaps if !gaps.is_empty() => {
                                gaps[rand_index(rng, gaps.len())]
                            }
                            _ => canvas_rect,
                        };
                        let corner = Vec2::new(
                            rand_range(rng, region.min.x, region.max.x - size.x),
                            rand_range(rng, region.min.y, region.max.y - size.y),
                        );
                        let candidate = template.with_min_corner(corner).clamp_into(canvas);

                        if index.has_collision(&candidate, self.config.tolerance) {
                            continue;
                        }
                        let Some(id) = index.insert(candidate.clone()) else {
                            continue;
                        };
                        result.shapes.push(candidate);
                        placed = true;
                        if sink.wants(GenerationEventKind::ShapePlaced) {
                            sink.send(GenerationEvent::ShapePlaced {
                                generator: GENERATOR,
                                index: i,
                                attempts: attempt + 1,
                                id,
                            });
                        }
                        break;
                    }
                    if !placed && sink.wants(GenerationEventKind::PlacementFailed) {
                        sink.send(GenerationEvent::PlacementFailed {
                            generator: GENERATOR,
                            index: i,
                            attempts: max_attempts,
                        });
                    }
                    placed
                }
                Err(reason) => {
                    warn!("Cascade factory produced an unusable shape ({:?}).", reason);
                    if sink.wants(GenerationEventKind::ShapeDiscarded) {
                        sink.send(GenerationEvent::ShapeDiscarded {
                            generator: GENERATOR,
                            reason,
                        });
                    }
                    false
                }
            };

            if !placed {
                result.failed += 1;
                if (i as f64) > (remaining as f64) * EARLY_TERMINATION_FRACTION {
                    result.terminated_early = true;
                    warn!(
                        "Cascade fill stopped early after {} shapes ({} failed).",
                        result.shapes.len(),
                        result.failed
                    );
                    if sink.wants(GenerationEventKind::PlacementAborted) {
                        sink.send(GenerationEvent::PlacementAborted {
                            generator: GENERATOR,
                            placed: result.shapes.len(),
                            failures: result.failed,
                        });
                    }
                    break;
                }
            }
        }

        info!(
            "Cascade fill added {} of {} shapes.",
            result.shapes.len(),
            remaining
        );
        result
    }
}

/// Bounding box size of a factory shape, or why it cannot be placed.
fn template_size(shape: &Shape, canvas: Vec2) -> std::result::Result<Vec2, DiscardReason> {
    if shape.is_degenerate() {
        return Err(DiscardReason::Degenerate);
    }
    let size = shape.bbox().ok_or(DiscardReason::Degenerate)?.size();
    if size.x > canvas.x || size.y > canvas.y {
        return Err(DiscardReason::Oversized);
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::events::VecSink;
    use crate::spatial::shapes_collide;

    fn small_square(rng: &mut dyn RngCore) -> Shape {
        let side = rand_range(rng, 2.0, 4.0);
        Shape::rectangle(0.0, 0.0, side, side)
    }

    fn run(existing: &[Shape], target: usize, seed: u64) -> (CascadeResult, SpatialIndex) {
        let canvas = Vec2::new(100.0, 100.0);
        let mut index = SpatialIndex::from_shapes(canvas, existing);
        let mut rng = StdRng::seed_from_u64(seed);
        let fill = CascadeFill::default();
        let result = fill.apply(existing, &mut index, target, small_square, &mut rng);
        (result, index)
    }

    #[test]
    fn phases_split_progress() {
        assert_eq!(PlacementPhase::for_progress(0, 10), PlacementPhase::EdgeBands);
        assert_eq!(PlacementPhase::for_progress(2, 10), PlacementPhase::EdgeBands);
        assert_eq!(PlacementPhase::for_progress(3, 10), PlacementPhase::Gaps);
        assert_eq!(PlacementPhase::for_progress(6, 10), PlacementPhase::Gaps);
        assert_eq!(PlacementPhase::for_progress(7, 10), PlacementPhase::Random);
    }

    #[test]
    fn nothing_to_do_when_target_reached() {
        let existing = vec![Shape::circle(50.0, 50.0, 3.0)];
        let (result, index) = run(&existing, 1, 1);
        assert!(result.shapes.is_empty());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn placed_shapes_stay_inside_and_apart() {
        let existing = vec![Shape::rectangle(40.0, 40.0, 20.0, 20.0)];
        let (result, index) = run(&existing, 40, 5);

        assert!(!result.shapes.is_empty());
        assert!(existing.len() + result.shapes.len() <= 40);
        assert_eq!(index.len(), existing.len() + result.shapes.len());

        let canvas = BoundingBox::canvas(Vec2::new(100.0, 100.0));
        let all = index.arena().as_slice();
        for (i, a) in all.iter().enumerate() {
            let bbox = a.bbox().expect("bbox");
            assert!(canvas.contains_box(&bbox, 1e-3));
            for b in &all[i + 1..] {
                assert!(!shapes_collide(a, b, DEFAULT_CASCADE_TOLERANCE));
            }
        }
    }

    #[test]
    fn same_seed_same_fill() {
        let existing = vec![Shape::circle(20.0, 20.0, 5.0)];
        let (a, _) = run(&existing, 25, 11);
        let (b, _) = run(&existing, 25, 11);
        assert_eq!(a.shapes, b.shapes);
        assert_eq!(a.failed, b.failed);
    }

    #[test]
    fn crowded_canvas_terminates_early() {
        let existing = vec![Shape::rectangle(0.0, 0.0, 100.0, 100.0)];
        let canvas = Vec2::new(100.0, 100.0);
        let mut index = SpatialIndex::from_shapes(canvas, &existing);
        let mut rng = StdRng::seed_from_u64(2);
        let fill = CascadeFill::new(CascadeConfig::default().with_max_attempts(3));
        let mut sink = VecSink::new();
        let result =
            fill.apply_with_events(&existing, &mut index, 11, small_square, &mut rng, &mut sink);

        assert!(result.shapes.is_empty());
        assert!(result.terminated_early);
        // Shapes 0..=6 fail without stopping; shape 7 is past 60% of 10.
        assert_eq!(result.failed, 8);
        assert_eq!(sink.count(GenerationEventKind::PlacementAborted), 1);
        assert_eq!(sink.count(GenerationEventKind::CascadePhaseStarted), 3);
    }

    #[test]
    fn unusable_templates_are_discarded() {
        let canvas = Vec2::new(20.0, 20.0);
        let mut index = SpatialIndex::new(canvas);
        let mut rng = StdRng::seed_from_u64(3);
        let mut sink = VecSink::new();
        let result = CascadeFill::default().apply_with_events(
            &[],
            &mut index,
            2,
            |_: &mut dyn RngCore| Shape::rectangle(0.0, 0.0, 30.0, 1.0),
            &mut rng,
            &mut sink,
        );
        assert!(result.shapes.is_empty());
        assert_eq!(result.failed, 2);
        assert_eq!(sink.count(GenerationEventKind::ShapeDiscarded), 2);
        assert!(index.is_empty());
    }

    #[test]
    fn config_validation() {
        assert!(CascadeConfig::default().validate().is_ok());
        assert!(CascadeConfig::default()
            .with_max_attempts(0)
            .validate()
            .is_err());
        assert!(CascadeConfig::default()
            .with_tolerance(f32::NAN)
            .validate()
            .is_err());
        assert!(CascadeFill::try_new(CascadeConfig::default().with_min_size(-1.0)).is_err());
    }
}
