//! Shape values and their derived bounding boxes.
//!
//! [`Shape`] is a closed sum type: every consumer (bounding box, collision,
//! translation, ordering) matches it exhaustively. Shapes are immutable values;
//! repositioning returns a new shape.
use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod clip;

pub use clip::{clean_ring, clip_polygon_to_rect};

/// Areas at or below this are treated as zero.
pub const AREA_EPSILON: f32 = 1e-6;

/// Vertices closer than this are considered duplicates.
pub const POINT_EPSILON: f32 = 1e-4;

/// A placed shape in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Polygon { points: Vec<Vec2> },
}

impl Shape {
    /// Create a circle centered at `(cx, cy)`.
    pub fn circle(cx: f32, cy: f32, radius: f32) -> Self {
        Shape::Circle {
            center: Vec2::new(cx, cy),
            radius,
        }
    }

    /// Create a polygon from an ordered ring of points.
    ///
    /// Returns `None` for fewer than three points.
    pub fn polygon(points: Vec<Vec2>) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        Some(Shape::Polygon { points })
    }

    /// Create a triangle.
    pub fn triangle(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Shape::Polygon {
            points: vec![a, b, c],
        }
    }

    /// Create an axis-aligned rectangle polygon with its min corner at `(x, y)`.
    pub fn rectangle(x: f32, y: f32, width: f32, height: f32) -> Self {
        Shape::Polygon {
            points: vec![
                Vec2::new(x, y),
                Vec2::new(x + width, y),
                Vec2::new(x + width, y + height),
                Vec2::new(x, y + height),
            ],
        }
    }

    pub fn is_circle(&self) -> bool {
        matches!(self, Shape::Circle { .. })
    }

    pub fn is_polygon(&self) -> bool {
        matches!(self, Shape::Polygon { .. })
    }

    /// Bounding box of the shape, or `None` when it cannot be computed
    /// (empty ring or non-finite coordinates).
    pub fn bbox(&self) -> Option<BoundingBox> {
        match self {
            Shape::Circle { center, radius } => {
                if !center.is_finite() || !radius.is_finite() {
                    return None;
                }
                let r = Vec2::splat(radius.abs());
                Some(BoundingBox::new(*center - r, *center + r))
            }
            Shape::Polygon { points } => {
                let first = *points.first()?;
                let mut min = first;
                let mut max = first;
                for p in points {
                    if !p.is_finite() {
                        return None;
                    }
                    min = min.min(*p);
                    max = max.max(*p);
                }
                Some(BoundingBox::new(min, max))
            }
        }
    }

    /// Vertex mean for polygons, center for circles.
    pub fn centroid(&self) -> Vec2 {
        match self {
            Shape::Circle { center, .. } => *center,
            Shape::Polygon { points } => {
                if points.is_empty() {
                    return Vec2::ZERO;
                }
                let sum: Vec2 = points.iter().copied().sum();
                sum / points.len() as f32
            }
        }
    }

    /// Unsigned area.
    pub fn area(&self) -> f32 {
        match self {
            Shape::Circle { radius, .. } => std::f32::consts::PI * radius * radius,
            Shape::Polygon { points } => polygon_signed_area(points).abs(),
        }
    }

    /// A shape that must never enter the spatial index or the output:
    /// non-positive radius, fewer than three distinct vertices, zero area,
    /// or non-finite coordinates.
    pub fn is_degenerate(&self) -> bool {
        if self.bbox().is_none() {
            return true;
        }
        match self {
            Shape::Circle { radius, .. } => *radius <= 0.0,
            Shape::Polygon { points } => {
                clean_ring(points).len() < 3 || polygon_signed_area(points).abs() <= AREA_EPSILON
            }
        }
    }

    /// Return a copy moved by `delta`.
    pub fn translate(&self, delta: Vec2) -> Shape {
        match self {
            Shape::Circle { center, radius } => Shape::Circle {
                center: *center + delta,
                radius: *radius,
            },
            Shape::Polygon { points } => Shape::Polygon {
                points: points.iter().map(|p| *p + delta).collect(),
            },
        }
    }

    /// Return a copy whose bounding box min corner sits at `min_corner`.
    pub fn with_min_corner(&self, min_corner: Vec2) -> Shape {
        match self.bbox() {
            Some(bbox) => self.translate(min_corner - bbox.min),
            None => self.clone(),
        }
    }

    /// Translate (never resize) so the bounding box lies inside `[0, w] x [0, h]`.
    ///
    /// A shape wider or taller than the canvas is aligned to the min edge.
    pub fn clamp_into(&self, canvas: Vec2) -> Shape {
        let Some(bbox) = self.bbox() else {
            return self.clone();
        };

        let dx = if bbox.min.x < 0.0 {
            -bbox.min.x
        } else if bbox.max.x > canvas.x {
            (canvas.x - bbox.max.x).max(-bbox.min.x)
        } else {
            0.0
        };
        let dy = if bbox.min.y < 0.0 {
            -bbox.min.y
        } else if bbox.max.y > canvas.y {
            (canvas.y - bbox.max.y).max(-bbox.min.y)
        } else {
            0.0
        };

        if dx != 0.0 || dy != 0.0 {
            self.translate(Vec2::new(dx, dy))
        } else {
            self.clone()
        }
    }

    /// Polygon vertices, or the bounding box corners of a circle.
    pub fn outline(&self) -> Vec<Vec2> {
        match self {
            Shape::Polygon { points } => points.clone(),
            Shape::Circle { .. } => self
                .bbox()
                .map(|b| b.corners().to_vec())
                .unwrap_or_default(),
        }
    }
}

/// Axis-aligned bounding box `(xmin, ymin, xmax, ymax)`.
///
/// Always derived from a [`Shape`] or a canvas; never stored alongside shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoundingBox {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box with min corner `(x, y)` and the given size.
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(x + width, y + height))
    }

    /// The canvas rectangle `[0, w] x [0, h]`.
    pub fn canvas(extent: Vec2) -> Self {
        Self::new(Vec2::ZERO, extent)
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Grow (or shrink, for negative `amount`) on every side.
    pub fn expand(&self, amount: f32) -> Self {
        Self::new(self.min - Vec2::splat(amount), self.max + Vec2::splat(amount))
    }

    /// Overlap test with a signed tolerance.
    ///
    /// Negative `tolerance` lets the boxes interpenetrate by up to `|tolerance|`
    /// before counting as overlapping; positive `tolerance` demands a gap of at
    /// least `tolerance` between them.
    pub fn overlaps(&self, other: &BoundingBox, tolerance: f32) -> bool {
        !(self.max.x <= other.min.x - tolerance
            || other.max.x <= self.min.x - tolerance
            || self.max.y <= other.min.y - tolerance
            || other.max.y <= self.min.y - tolerance)
    }

    /// `true` if `other` lies inside `self`, allowing `epsilon` slack.
    pub fn contains_box(&self, other: &BoundingBox, epsilon: f32) -> bool {
        other.min.x >= self.min.x - epsilon
            && other.min.y >= self.min.y - epsilon
            && other.max.x <= self.max.x + epsilon
            && other.max.y <= self.max.y + epsilon
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Shoelace area; positive for counter-clockwise rings in a y-up frame.
pub fn polygon_signed_area(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0f32;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        twice += a.x * b.y - b.x * a.y;
    }
    twice * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_bbox_spans_radius() {
        let bbox = Shape::circle(5.0, 6.0, 2.0).bbox().expect("bbox");
        assert_eq!(bbox.min, Vec2::new(3.0, 4.0));
        assert_eq!(bbox.max, Vec2::new(7.0, 8.0));
    }

    #[test]
    fn polygon_bbox_and_centroid() {
        let tri = Shape::triangle(
            Vec2::new(0.0, 0.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(0.0, 3.0),
        );
        let bbox = tri.bbox().expect("bbox");
        assert_eq!(bbox.size(), Vec2::new(6.0, 3.0));
        assert_eq!(tri.centroid(), Vec2::new(2.0, 1.0));
        assert!((tri.area() - 9.0).abs() < 1e-6);
    }

    #[test]
    fn polygon_constructor_requires_three_points() {
        assert!(Shape::polygon(vec![Vec2::ZERO, Vec2::ONE]).is_none());
        assert!(Shape::polygon(vec![Vec2::ZERO, Vec2::X, Vec2::Y]).is_some());
    }

    #[test]
    fn degenerate_shapes_are_detected() {
        assert!(Shape::circle(1.0, 1.0, 0.0).is_degenerate());
        assert!(Shape::circle(f32::NAN, 1.0, 1.0).is_degenerate());
        let collinear = Shape::Polygon {
            points: vec![Vec2::ZERO, Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)],
        };
        assert!(collinear.is_degenerate());
        let duplicated = Shape::Polygon {
            points: vec![Vec2::ZERO, Vec2::ZERO, Vec2::new(2.0, 2.0)],
        };
        assert!(duplicated.is_degenerate());
        assert!(!Shape::rectangle(0.0, 0.0, 2.0, 3.0).is_degenerate());
    }

    #[test]
    fn translate_returns_new_value() {
        let rect = Shape::rectangle(0.0, 0.0, 2.0, 2.0);
        let moved = rect.translate(Vec2::new(3.0, 4.0));
        assert_eq!(rect.bbox().expect("bbox").min, Vec2::ZERO);
        assert_eq!(moved.bbox().expect("bbox").min, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn clamp_translates_inside_canvas_without_resizing() {
        let canvas = Vec2::new(10.0, 10.0);
        let c = Shape::circle(-1.0, 9.5, 2.0).clamp_into(canvas);
        let bbox = c.bbox().expect("bbox");
        assert_eq!(bbox.min.x, 0.0);
        assert_eq!(bbox.max.y, 10.0);
        assert_eq!(bbox.size(), Vec2::splat(4.0));
    }

    #[test]
    fn with_min_corner_aligns_bbox() {
        let c = Shape::circle(0.0, 0.0, 1.5).with_min_corner(Vec2::new(4.0, 5.0));
        assert_eq!(c.bbox().expect("bbox").min, Vec2::new(4.0, 5.0));
    }

    #[test]
    fn overlap_respects_signed_tolerance() {
        let a = BoundingBox::from_origin_size(0.0, 0.0, 10.0, 10.0);
        let touching = BoundingBox::from_origin_size(10.0, 0.0, 5.0, 5.0);
        let intruding = BoundingBox::from_origin_size(8.0, 0.0, 5.0, 5.0);
        let near = BoundingBox::from_origin_size(10.2, 0.0, 5.0, 5.0);

        assert!(!a.overlaps(&touching, 0.0));
        assert!(a.overlaps(&intruding, 0.0));
        assert!(!a.overlaps(&intruding, -3.0));
        assert!(a.overlaps(&intruding, -1.0));
        assert!(a.overlaps(&near, 0.25));
        assert!(!a.overlaps(&near, 0.1));
    }

    #[test]
    fn circle_outline_uses_bbox_corners() {
        let outline = Shape::circle(1.0, 1.0, 1.0).outline();
        assert_eq!(outline.len(), 4);
        assert_eq!(outline[0], Vec2::ZERO);
        assert_eq!(outline[2], Vec2::new(2.0, 2.0));
    }
}
