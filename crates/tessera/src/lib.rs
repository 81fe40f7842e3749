#![forbid(unsafe_code)]
//! tessera: Deterministic shape tessellation and placement for raster-to-vector art.
//!
//! Modules:
//! - spatial: uniform-grid bounding-box index with signed-tolerance collision queries
//! - cascade: three-phase gap filling toward a target shape count
//! - generators: triangulation, Voronoi, rectangle packing, Poisson-disk, scatter and concentric families
//! - providers: pluggable Delaunay/Voronoi backends (spade by default)
//! - ordering: canonical output order
//! - sampling: point sampling strategies
//! - geometry, color, params, events, error
//!
//! For examples, see the `tessera_examples` crate and the README.
pub mod cascade;
pub mod color;
pub mod error;
pub mod events;
pub mod generators;
pub mod geometry;
pub mod ordering;
pub mod params;
pub mod providers;
pub mod sampling;
pub mod spatial;

/// Convenient re-exports for common types. Import with `use tessera::prelude::*;`.
pub mod prelude {
    pub use crate::cascade::{CascadeConfig, CascadeFill, CascadeResult, PlacementPhase};
    pub use crate::color::{Color, ColorSampler, PixelLayout, RasterImage, SolidColor};
    pub use crate::error::{Error, Result};
    pub use crate::events::{
        DiscardReason, EventSink, FnSink, GenerationEvent, GenerationEventKind, VecSink,
    };
    pub use crate::generators::{
        generate_family, generate_family_with_events, ConcentricGenerator, GenerationContext,
        GenerationInputs, PoissonDiskGenerator, RectanglePacker, ScatterGenerator,
        ShapeGenerator, StyledShape, TriangulationGenerator, VoronoiGenerator,
    };
    pub use crate::geometry::{BoundingBox, Shape};
    pub use crate::ordering::{canonicalize, CanonicalKey, HasShape};
    pub use crate::params::{
        CascadeOptions, ConcentricParams, Family, FamilyParams, PoissonParams, RectangleParams,
        ScatterParams, StyleParams, TriangulationParams, VoronoiParams,
    };
    pub use crate::providers::{
        DefaultProvider, TriangulationProvider, Unavailable, VoronoiDiagram, VoronoiProvider,
    };
    #[cfg(feature = "spade")]
    pub use crate::providers::SpadeProvider;
    pub use crate::sampling::{PoissonDiskSampling, PositionSampling, StratifiedJitterSampling};
    pub use crate::spatial::{shapes_collide, ShapeId, SpatialIndex};
}
