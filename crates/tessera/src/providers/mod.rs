//! Pluggable computational-geometry backends.
//!
//! Generators never call a geometry library directly. They receive a
//! [`TriangulationProvider`] or [`VoronoiProvider`] and fall back to a
//! deterministic construction when the provider reports
//! [`Error::ProviderUnavailable`](crate::error::Error::ProviderUnavailable).
use glam::Vec2;

use crate::error::{Error, Result};

#[cfg(feature = "spade")]
pub mod spade;

#[cfg(feature = "spade")]
pub use self::spade::SpadeProvider;

/// Provider used when none is given explicitly.
#[cfg(feature = "spade")]
pub type DefaultProvider = SpadeProvider;

/// Provider used when none is given explicitly.
#[cfg(not(feature = "spade"))]
pub type DefaultProvider = Unavailable;

/// Delaunay triangulation of a point set.
pub trait TriangulationProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Index triples into `points` covering their convex hull.
    fn triangulate(&self, points: &[Vec2]) -> Result<Vec<[usize; 3]>>;
}

/// Voronoi diagram of a point set.
pub trait VoronoiProvider: Send + Sync {
    fn name(&self) -> &str;

    fn diagram(&self, points: &[Vec2]) -> Result<VoronoiDiagram>;
}

/// Edge between the cells of two sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoronoiRidge {
    /// The two sites separated by this ridge.
    pub sites: [usize; 2],
    /// Endpoint vertex ids; `None` marks an endpoint at infinity.
    pub vertices: [Option<usize>; 2],
}

impl VoronoiRidge {
    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(Option::is_some)
    }

    /// The finite endpoint of a half-infinite ridge.
    pub fn finite_vertex(&self) -> Option<usize> {
        match self.vertices {
            [Some(v), None] | [None, Some(v)] => Some(v),
            _ => None,
        }
    }

    pub fn touches(&self, site: usize) -> bool {
        self.sites[0] == site || self.sites[1] == site
    }
}

/// Cell of one site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoronoiRegion {
    /// Finite vertex ids around the site, in cyclic order.
    pub vertices: Vec<usize>,
    /// `false` if the cell extends to infinity.
    pub bounded: bool,
}

/// Sites, finite vertices, ridges and per-site regions.
#[derive(Debug, Clone, Default)]
pub struct VoronoiDiagram {
    pub sites: Vec<Vec2>,
    pub vertices: Vec<Vec2>,
    pub ridges: Vec<VoronoiRidge>,
    /// One entry per site, same order as `sites`.
    pub regions: Vec<VoronoiRegion>,
}

impl VoronoiDiagram {
    /// Ridges bordering the cell of `site`.
    pub fn ridges_of(&self, site: usize) -> impl Iterator<Item = &VoronoiRidge> {
        self.ridges.iter().filter(move |r| r.touches(site))
    }
}

/// A provider that is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl TriangulationProvider for Unavailable {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn triangulate(&self, _points: &[Vec2]) -> Result<Vec<[usize; 3]>> {
        Err(Error::ProviderUnavailable(
            "no triangulation backend compiled in".into(),
        ))
    }
}

impl VoronoiProvider for Unavailable {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn diagram(&self, _points: &[Vec2]) -> Result<VoronoiDiagram> {
        Err(Error::ProviderUnavailable(
            "no voronoi backend compiled in".into(),
        ))
    }
}
