//! Per-family parameters, their tunable ranges and validation.
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cascade::CascadeConfig;
use crate::color::Color;
use crate::error::{Error, Result};
use crate::sampling::poisson_disk::DEFAULT_CANDIDATE_ATTEMPTS;

/// Shape family produced by a generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Family {
    #[cfg_attr(feature = "serde", serde(rename = "delaunay"))]
    Triangulation,
    Voronoi,
    Rectangles,
    PoissonDisk,
    ScatterCircles,
    ConcentricCircles,
}

impl Family {
    pub const ALL: [Family; 6] = [
        Family::Triangulation,
        Family::Voronoi,
        Family::Rectangles,
        Family::PoissonDisk,
        Family::ScatterCircles,
        Family::ConcentricCircles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Family::Triangulation => "delaunay",
            Family::Voronoi => "voronoi",
            Family::Rectangles => "rectangles",
            Family::PoissonDisk => "poisson_disk",
            Family::ScatterCircles => "scatter_circles",
            Family::ConcentricCircles => "concentric_circles",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Family::ALL
            .into_iter()
            .find(|f| f.name() == needle)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown shape family '{s}'")))
    }
}

/// Inclusive bounds and default of a tunable parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParameterRange {
    pub const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp into range; NaN becomes the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

const CASCADE_INTENSITY: ParameterRange = ParameterRange::new(0.1, 1.0, 0.8);
const OPACITY: ParameterRange = ParameterRange::new(0.1, 1.0, 0.7);
const RADIUS_MULTIPLIER: ParameterRange = ParameterRange::new(0.25, 1.2, 1.0);

const POISSON_RANGES: &[(&str, ParameterRange)] = &[
    ("min_dist_factor", ParameterRange::new(0.005, 0.030, 0.025)),
    ("radius_multiplier", RADIUS_MULTIPLIER),
    ("cascade_intensity", CASCADE_INTENSITY),
    ("opacity", OPACITY),
];

const SCATTER_RANGES: &[(&str, ParameterRange)] = &[
    ("radius_multiplier", RADIUS_MULTIPLIER),
    ("jitter", ParameterRange::new(0.0, 1.0, 0.25)),
    ("cascade_intensity", CASCADE_INTENSITY),
    ("opacity", OPACITY),
];

const RECTANGLE_RANGES: &[(&str, ParameterRange)] = &[
    ("min_size_multiplier", ParameterRange::new(0.1, 1.0, 0.25)),
    ("max_size_multiplier", ParameterRange::new(1.0, 10.0, 5.0)),
    ("aspect_ratio_variance", ParameterRange::new(1.0, 10.0, 4.0)),
    ("overlap_tolerance", ParameterRange::new(-10.0, 0.0, -3.0)),
    ("cascade_intensity", CASCADE_INTENSITY),
    ("opacity", OPACITY),
];

const CASCADING_RANGES: &[(&str, ParameterRange)] = &[
    ("cascade_intensity", CASCADE_INTENSITY),
    ("opacity", OPACITY),
];

const STYLE_RANGES: &[(&str, ParameterRange)] = &[("opacity", OPACITY)];

/// Tunable parameters of `family` with their ranges.
pub fn parameter_ranges(family: Family) -> &'static [(&'static str, ParameterRange)] {
    match family {
        Family::PoissonDisk => POISSON_RANGES,
        Family::ScatterCircles => SCATTER_RANGES,
        Family::Rectangles => RECTANGLE_RANGES,
        Family::Triangulation | Family::Voronoi => CASCADING_RANGES,
        Family::ConcentricCircles => STYLE_RANGES,
    }
}

pub fn parameter_range(family: Family, name: &str) -> Option<ParameterRange> {
    parameter_ranges(family)
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, r)| *r)
}

/// Check `value` against the range registered for `(family, name)`.
///
/// Unknown names pass through unchanged. Out-of-range values are rejected;
/// use [`ParameterRange::clamp`] to coerce instead.
pub fn validate_parameter(family: Family, name: &str, value: f32) -> Result<f32> {
    let Some(range) = parameter_range(family, name) else {
        return Ok(value);
    };
    if value.is_nan() {
        return Err(Error::InvalidConfig(format!(
            "{family}.{name}: value is not a number"
        )));
    }
    if value < range.min {
        return Err(Error::InvalidConfig(format!(
            "{family}.{name}: value {value} below minimum {}",
            range.min
        )));
    }
    if value > range.max {
        return Err(Error::InvalidConfig(format!(
            "{family}.{name}: value {value} above maximum {}",
            range.max
        )));
    }
    Ok(value)
}

/// Render attributes attached to every output shape.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StyleParams {
    pub opacity: f32,
    /// Outline colour for polygons. Circles are never stroked.
    pub stroke: Color,
    pub stroke_width: f32,
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            opacity: OPACITY.default,
            stroke: Color::BLACK,
            stroke_width: 0.5,
        }
    }
}

impl StyleParams {
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_stroke(mut self, stroke: Color, width: f32) -> Self {
        self.stroke = stroke;
        self.stroke_width = width;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(Error::InvalidConfig("opacity must be within [0, 1]".into()));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(Error::InvalidConfig(
                "stroke_width must be finite and >= 0".into(),
            ));
        }
        Ok(())
    }
}

/// Optional cascade top-up after a family's own placement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CascadeOptions {
    pub enabled: bool,
    /// Fraction of the missing shapes cascade tries to add.
    pub intensity: f32,
    pub fill: CascadeConfig,
}

impl Default for CascadeOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            intensity: CASCADE_INTENSITY.default,
            fill: CascadeConfig::default(),
        }
    }
}

impl CascadeOptions {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_fill(mut self, fill: CascadeConfig) -> Self {
        self.fill = fill;
        self
    }

    /// `current + ceil((target - current) * intensity)`, never below `current`.
    pub fn effective_target(&self, current: usize, target: usize) -> usize {
        let missing = target.saturating_sub(current);
        let extra = (missing as f32 * self.intensity.clamp(0.0, 1.0)).ceil() as usize;
        current + extra.min(missing)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.intensity > 0.0 && self.intensity <= 1.0) {
            return Err(Error::InvalidConfig(
                "cascade intensity must be within (0, 1]".into(),
            ));
        }
        self.fill.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriangulationParams {
    pub style: StyleParams,
    pub cascade: CascadeOptions,
}

impl TriangulationParams {
    pub fn with_style(mut self, style: StyleParams) -> Self {
        self.style = style;
        self
    }

    pub fn with_cascade(mut self, cascade: CascadeOptions) -> Self {
        self.cascade = cascade;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.style.validate()?;
        self.cascade.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoronoiParams {
    pub style: StyleParams,
}

impl VoronoiParams {
    pub fn with_style(mut self, style: StyleParams) -> Self {
        self.style = style;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.style.validate()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RectangleParams {
    /// Smallest base size as a fraction of the average size.
    pub min_size_multiplier: f32,
    /// Largest base size as a fraction of the average size.
    pub max_size_multiplier: f32,
    /// Upper bound of the width/height ratio.
    pub aspect_ratio_variance: f32,
    /// Signed collision tolerance for random placement. Adjacent placement
    /// uses half of it.
    pub overlap_tolerance: f32,
    /// Placement attempts per rectangle.
    pub max_attempts: usize,
    pub style: StyleParams,
    pub cascade: CascadeOptions,
}

impl Default for RectangleParams {
    fn default() -> Self {
        Self {
            min_size_multiplier: 0.25,
            max_size_multiplier: 5.0,
            aspect_ratio_variance: 4.0,
            overlap_tolerance: -3.0,
            max_attempts: 100,
            style: StyleParams::default(),
            cascade: CascadeOptions::default(),
        }
    }
}

impl RectangleParams {
    pub fn with_size_multipliers(mut self, min: f32, max: f32) -> Self {
        self.min_size_multiplier = min;
        self.max_size_multiplier = max;
        self
    }

    pub fn with_aspect_ratio_variance(mut self, variance: f32) -> Self {
        self.aspect_ratio_variance = variance;
        self
    }

    pub fn with_overlap_tolerance(mut self, tolerance: f32) -> Self {
        self.overlap_tolerance = tolerance;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_style(mut self, style: StyleParams) -> Self {
        self.style = style;
        self
    }

    pub fn with_cascade(mut self, cascade: CascadeOptions) -> Self {
        self.cascade = cascade;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_size_multiplier.is_finite() && self.min_size_multiplier > 0.0) {
            return Err(Error::InvalidConfig(
                "min_size_multiplier must be > 0".into(),
            ));
        }
        if !self.max_size_multiplier.is_finite()
            || self.max_size_multiplier < self.min_size_multiplier
        {
            return Err(Error::InvalidConfig(
                "max_size_multiplier must be >= min_size_multiplier".into(),
            ));
        }
        if !(self.aspect_ratio_variance.is_finite() && self.aspect_ratio_variance >= 1.0) {
            return Err(Error::InvalidConfig(
                "aspect_ratio_variance must be >= 1".into(),
            ));
        }
        if !self.overlap_tolerance.is_finite() {
            return Err(Error::InvalidConfig(
                "overlap_tolerance must be finite".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be > 0".into()));
        }
        self.style.validate()?;
        self.cascade.validate()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoissonParams {
    /// Minimum point distance as a fraction of the canvas diagonal.
    pub min_dist_factor: f32,
    /// Explicit minimum distance; overrides `min_dist_factor`.
    pub radius: Option<f32>,
    /// Output circle size relative to the spacing.
    pub radius_multiplier: f32,
    /// Candidates per active point.
    pub k: usize,
    pub style: StyleParams,
    pub cascade: CascadeOptions,
}

impl Default for PoissonParams {
    fn default() -> Self {
        Self {
            min_dist_factor: 0.025,
            radius: None,
            radius_multiplier: RADIUS_MULTIPLIER.default,
            k: DEFAULT_CANDIDATE_ATTEMPTS,
            style: StyleParams::default(),
            cascade: CascadeOptions::default(),
        }
    }
}

impl PoissonParams {
    pub fn with_min_dist_factor(mut self, factor: f32) -> Self {
        self.min_dist_factor = factor;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_radius_multiplier(mut self, multiplier: f32) -> Self {
        self.radius_multiplier = multiplier;
        self
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_style(mut self, style: StyleParams) -> Self {
        self.style = style;
        self
    }

    pub fn with_cascade(mut self, cascade: CascadeOptions) -> Self {
        self.cascade = cascade;
        self
    }

    /// Minimum point distance on a `width x height` canvas.
    pub fn min_distance(&self, width: f32, height: f32) -> f32 {
        self.radius
            .unwrap_or_else(|| self.min_dist_factor * (width * width + height * height).sqrt())
    }

    pub fn validate(&self) -> Result<()> {
        validate_parameter(Family::PoissonDisk, "min_dist_factor", self.min_dist_factor)?;
        if let Some(r) = self.radius {
            if !(r.is_finite() && r > 0.0) {
                return Err(Error::InvalidConfig("radius must be > 0".into()));
            }
        }
        if !(self.radius_multiplier.is_finite() && self.radius_multiplier > 0.0) {
            return Err(Error::InvalidConfig(
                "radius_multiplier must be > 0".into(),
            ));
        }
        if self.k == 0 {
            return Err(Error::InvalidConfig("k must be > 0".into()));
        }
        self.style.validate()?;
        self.cascade.validate()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScatterParams {
    /// Position jitter in [0, 1]: 0 is cell centres, 1 spans the cell.
    pub jitter: f32,
    pub radius_multiplier: f32,
    pub style: StyleParams,
    pub cascade: CascadeOptions,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            jitter: 0.25,
            radius_multiplier: RADIUS_MULTIPLIER.default,
            style: StyleParams::default(),
            cascade: CascadeOptions::default(),
        }
    }
}

impl ScatterParams {
    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_radius_multiplier(mut self, multiplier: f32) -> Self {
        self.radius_multiplier = multiplier;
        self
    }

    pub fn with_style(mut self, style: StyleParams) -> Self {
        self.style = style;
        self
    }

    pub fn with_cascade(mut self, cascade: CascadeOptions) -> Self {
        self.cascade = cascade;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(Error::InvalidConfig("jitter must be within [0, 1]".into()));
        }
        if !(self.radius_multiplier.is_finite() && self.radius_multiplier > 0.0) {
            return Err(Error::InvalidConfig(
                "radius_multiplier must be > 0".into(),
            ));
        }
        self.style.validate()?;
        self.cascade.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConcentricParams {
    pub style: StyleParams,
}

impl ConcentricParams {
    pub fn validate(&self) -> Result<()> {
        self.style.validate()
    }
}

/// Parameters for any family, as accepted by
/// [`generate_family`](crate::generators::generate_family).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "family", rename_all = "snake_case"))]
pub enum FamilyParams {
    #[cfg_attr(feature = "serde", serde(rename = "delaunay"))]
    Triangulation(TriangulationParams),
    Voronoi(VoronoiParams),
    Rectangles(RectangleParams),
    PoissonDisk(PoissonParams),
    ScatterCircles(ScatterParams),
    ConcentricCircles(ConcentricParams),
}

impl FamilyParams {
    /// Default parameters for `family`.
    pub fn defaults(family: Family) -> Self {
        match family {
            Family::Triangulation => FamilyParams::Triangulation(Default::default()),
            Family::Voronoi => FamilyParams::Voronoi(Default::default()),
            Family::Rectangles => FamilyParams::Rectangles(Default::default()),
            Family::PoissonDisk => FamilyParams::PoissonDisk(Default::default()),
            Family::ScatterCircles => FamilyParams::ScatterCircles(Default::default()),
            Family::ConcentricCircles => FamilyParams::ConcentricCircles(Default::default()),
        }
    }

    pub fn family(&self) -> Family {
        match self {
            FamilyParams::Triangulation(_) => Family::Triangulation,
            FamilyParams::Voronoi(_) => Family::Voronoi,
            FamilyParams::Rectangles(_) => Family::Rectangles,
            FamilyParams::PoissonDisk(_) => Family::PoissonDisk,
            FamilyParams::ScatterCircles(_) => Family::ScatterCircles,
            FamilyParams::ConcentricCircles(_) => Family::ConcentricCircles,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            FamilyParams::Triangulation(p) => p.validate(),
            FamilyParams::Voronoi(p) => p.validate(),
            FamilyParams::Rectangles(p) => p.validate(),
            FamilyParams::PoissonDisk(p) => p.validate(),
            FamilyParams::ScatterCircles(p) => p.validate(),
            FamilyParams::ConcentricCircles(p) => p.validate(),
        }
    }
}
