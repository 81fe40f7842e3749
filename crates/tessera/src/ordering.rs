//! Deterministic output ordering.
//!
//! Every generator sorts its result by [`CanonicalKey`] before returning, so
//! two logically identical shape sets come out in the same order no matter
//! how the upstream geometry backend enumerated them.
use std::cmp::Ordering;

use crate::geometry::Shape;

/// Decimal places kept by the key.
pub const KEY_DECIMALS: i32 = 3;

/// Round to [`KEY_DECIMALS`] places, folding `-0.0` into `0.0`.
#[inline]
pub fn round_key(v: f32) -> f64 {
    let scale = 10f64.powi(KEY_DECIMALS);
    ((v as f64) * scale).round() / scale + 0.0
}

/// `(centroid_x, centroid_y, sorted vertex coordinates)`, all rounded.
///
/// Circles use their centre and the corners of their bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalKey {
    pub centroid: [f64; 2],
    pub vertices: Vec<[f64; 2]>,
}

impl CanonicalKey {
    pub fn of(shape: &Shape) -> Self {
        let c = shape.centroid();
        let mut vertices: Vec<[f64; 2]> = shape
            .outline()
            .into_iter()
            .map(|p| [round_key(p.x), round_key(p.y)])
            .collect();
        vertices.sort_by(|a, b| cmp_pair(a, b));
        Self {
            centroid: [round_key(c.x), round_key(c.y)],
            vertices,
        }
    }
}

fn cmp_pair(a: &[f64; 2], b: &[f64; 2]) -> Ordering {
    a[0].total_cmp(&b[0]).then_with(|| a[1].total_cmp(&b[1]))
}

impl Eq for CanonicalKey {}

impl Ord for CanonicalKey {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_pair(&self.centroid, &other.centroid).then_with(|| {
            for (a, b) in self.vertices.iter().zip(&other.vertices) {
                match cmp_pair(a, b) {
                    Ordering::Equal => continue,
                    ord => return ord,
                }
            }
            self.vertices.len().cmp(&other.vertices.len())
        })
    }
}

impl PartialOrd for CanonicalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Anything that carries a [`Shape`].
pub trait HasShape {
    fn shape(&self) -> &Shape;
}

impl HasShape for Shape {
    fn shape(&self) -> &Shape {
        self
    }
}

/// Stable sort by [`CanonicalKey`].
pub fn canonicalize<T: HasShape>(items: &mut [T]) {
    items.sort_by_cached_key(|item| CanonicalKey::of(item.shape()));
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    #[test]
    fn rounding_is_three_decimals_without_negative_zero() {
        assert_eq!(round_key(1.23456), 1.235);
        assert_eq!(round_key(-0.0001).to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn sorts_by_centroid_then_vertices() {
        let mut shapes = vec![
            Shape::rectangle(10.0, 0.0, 2.0, 2.0),
            Shape::circle(1.0, 5.0, 1.0),
            Shape::circle(1.0, 1.0, 1.0),
        ];
        canonicalize(&mut shapes);
        assert_eq!(shapes[0], Shape::circle(1.0, 1.0, 1.0));
        assert_eq!(shapes[1], Shape::circle(1.0, 5.0, 1.0));
        assert!(shapes[2].is_polygon());
    }

    #[test]
    fn vertex_order_does_not_change_the_key() {
        let a = Shape::triangle(Vec2::ZERO, Vec2::new(3.0, 0.0), Vec2::new(0.0, 3.0));
        let b = Shape::triangle(Vec2::new(0.0, 3.0), Vec2::ZERO, Vec2::new(3.0, 0.0));
        assert_eq!(CanonicalKey::of(&a), CanonicalKey::of(&b));
    }

    #[test]
    fn equal_keys_keep_input_order() {
        // Identical shapes told apart by a tag.
        struct Tagged(Shape, u8);
        impl HasShape for Tagged {
            fn shape(&self) -> &Shape {
                &self.0
            }
        }
        let s = Shape::circle(2.0, 2.0, 1.0);
        let mut items = vec![Tagged(s.clone(), 0), Tagged(s.clone(), 1), Tagged(s, 2)];
        canonicalize(&mut items);
        assert_eq!(items.iter().map(|t| t.1).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn permuted_input_gives_identical_output() {
        let shapes = vec![
            Shape::circle(5.0, 5.0, 2.0),
            Shape::rectangle(0.0, 0.0, 4.0, 4.0),
            Shape::triangle(Vec2::new(8.0, 1.0), Vec2::new(9.0, 1.0), Vec2::new(8.0, 3.0)),
        ];
        let mut forward = shapes.clone();
        let mut backward: Vec<Shape> = shapes.into_iter().rev().collect();
        canonicalize(&mut forward);
        canonicalize(&mut backward);
        assert_eq!(forward, backward);
    }
}
