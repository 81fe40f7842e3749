//! Event types and sinks for observing generation runs.
//!
//! Every generator and [`crate::cascade::CascadeFill`] has a `*_with_events`
//! variant that reports progress to an [`EventSink`]. The no-op `()` sink is
//! used by the plain entry points; [`VecSink`] collects events and [`FnSink`]
//! forwards them to a closure.
use glam::Vec2;

use crate::cascade::PlacementPhase;
use crate::spatial::ShapeId;

/// Why a shape was dropped before reaching the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscardReason {
    /// Zero area, duplicate vertices, non-finite coordinates or a non-positive radius.
    Degenerate,
    /// Fewer than three vertices left after clipping to the canvas.
    ClippedAway,
    /// Larger than the canvas in at least one dimension.
    Oversized,
    /// A caller-supplied seed point outside the canvas.
    SeedOutsideCanvas,
}

/// Describes events emitted during generation.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum GenerationEvent {
    /// Emitted once when a generator starts.
    GenerationStarted {
        /// Family name of the generator.
        generator: &'static str,
        /// Canvas extent.
        canvas: Vec2,
        /// Requested (best-effort) shape count.
        target_count: usize,
        /// Seed of the run.
        seed: u64,
    },

    /// Emitted once when a generator returns.
    GenerationFinished {
        generator: &'static str,
        /// Number of shapes returned.
        produced: usize,
    },

    /// A geometry provider was unavailable and the deterministic fallback ran.
    ProviderFallback {
        generator: &'static str,
        /// Provider that failed.
        provider: String,
        /// Failure description.
        reason: String,
    },

    /// A shape was dropped before insertion.
    ShapeDiscarded {
        generator: &'static str,
        reason: DiscardReason,
    },

    /// Cascade fill begins topping up toward a target count.
    CascadeStarted {
        /// Shapes already present.
        existing: usize,
        /// Desired total count.
        target_count: usize,
        /// Shapes cascade will try to add.
        remaining: usize,
        /// Number of empty regions detected up front.
        gap_regions: usize,
    },

    /// Cascade switched placement strategy.
    CascadePhaseStarted {
        phase: PlacementPhase,
        /// Progress index at which the phase began.
        index: usize,
    },

    /// A shape was accepted and inserted into the spatial index.
    ShapePlaced {
        generator: &'static str,
        /// Progress index of the shape.
        index: usize,
        /// Attempts used, starting at 1.
        attempts: usize,
        /// Arena id assigned by the index.
        id: ShapeId,
    },

    /// A shape exhausted its attempts and was dropped.
    PlacementFailed {
        generator: &'static str,
        index: usize,
        attempts: usize,
    },

    /// Placement stopped early because the failure budget was spent.
    PlacementAborted {
        generator: &'static str,
        /// Shapes placed before stopping.
        placed: usize,
        /// Failed placements counted.
        failures: usize,
    },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. generator name).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`GenerationEvent`], used to filter before building an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenerationEventKind {
    GenerationStarted,
    GenerationFinished,
    ProviderFallback,
    ShapeDiscarded,
    CascadeStarted,
    CascadePhaseStarted,
    ShapePlaced,
    PlacementFailed,
    PlacementAborted,
    Warning,
}

impl GenerationEvent {
    pub fn kind(&self) -> GenerationEventKind {
        match self {
            GenerationEvent::GenerationStarted { .. } => GenerationEventKind::GenerationStarted,
            GenerationEvent::GenerationFinished { .. } => GenerationEventKind::GenerationFinished,
            GenerationEvent::ProviderFallback { .. } => GenerationEventKind::ProviderFallback,
            GenerationEvent::ShapeDiscarded { .. } => GenerationEventKind::ShapeDiscarded,
            GenerationEvent::CascadeStarted { .. } => GenerationEventKind::CascadeStarted,
            GenerationEvent::CascadePhaseStarted { .. } => GenerationEventKind::CascadePhaseStarted,
            GenerationEvent::ShapePlaced { .. } => GenerationEventKind::ShapePlaced,
            GenerationEvent::PlacementFailed { .. } => GenerationEventKind::PlacementFailed,
            GenerationEvent::PlacementAborted { .. } => GenerationEventKind::PlacementAborted,
            GenerationEvent::Warning { .. } => GenerationEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`GenerationEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: GenerationEvent);

    /// Whether events of `kind` should be built at all.
    fn wants(&self, _kind: GenerationEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = GenerationEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: GenerationEvent) {}

    #[inline]
    fn wants(&self, _kind: GenerationEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<GenerationEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<GenerationEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[GenerationEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: GenerationEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        self.events.push(event);
    }
}
