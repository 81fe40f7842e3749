//! Sutherland–Hodgman clipping against an axis-aligned rectangle.
use glam::Vec2;

use crate::geometry::{BoundingBox, POINT_EPSILON};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ClipEdge {
    Left,
    Right,
    Top,
    Bottom,
}

const CLIP_ORDER: [ClipEdge; 4] = [
    ClipEdge::Left,
    ClipEdge::Right,
    ClipEdge::Top,
    ClipEdge::Bottom,
];

impl ClipEdge {
    #[inline]
    fn inside(self, p: Vec2, rect: &BoundingBox) -> bool {
        match self {
            ClipEdge::Left => p.x >= rect.min.x,
            ClipEdge::Right => p.x <= rect.max.x,
            ClipEdge::Top => p.y >= rect.min.y,
            ClipEdge::Bottom => p.y <= rect.max.y,
        }
    }

    fn intersect(self, a: Vec2, b: Vec2, rect: &BoundingBox) -> Vec2 {
        if a == b {
            return a;
        }
        match self {
            ClipEdge::Left | ClipEdge::Right => {
                let x_edge = if self == ClipEdge::Left {
                    rect.min.x
                } else {
                    rect.max.x
                };
                let t = (x_edge - a.x) / (b.x - a.x);
                Vec2::new(x_edge, a.y + t * (b.y - a.y))
            }
            ClipEdge::Top | ClipEdge::Bottom => {
                let y_edge = if self == ClipEdge::Top {
                    rect.min.y
                } else {
                    rect.max.y
                };
                let t = (y_edge - a.y) / (b.y - a.y);
                Vec2::new(a.x + t * (b.x - a.x), y_edge)
            }
        }
    }
}

/// Clip a simple polygon ring to `rect`.
///
/// Intersects with the left, right, top and bottom half-planes in turn; each
/// crossing edge contributes exactly one intersection point. The result may
/// have fewer than three vertices, in which case callers discard it.
pub fn clip_polygon_to_rect(polygon: &[Vec2], rect: &BoundingBox) -> Vec<Vec2> {
    let mut output: Vec<Vec2> = polygon.to_vec();

    for edge in CLIP_ORDER {
        let Some(&last) = output.last() else {
            break;
        };
        let input = std::mem::take(&mut output);
        let mut s = last;
        for &e in &input {
            let e_in = edge.inside(e, rect);
            let s_in = edge.inside(s, rect);
            if e_in {
                if !s_in {
                    output.push(edge.intersect(s, e, rect));
                }
                output.push(e);
            } else if s_in {
                output.push(edge.intersect(s, e, rect));
            }
            s = e;
        }
    }

    output
}

/// Drop consecutive duplicate vertices, including a closing vertex equal to the first.
pub fn clean_ring(points: &[Vec2]) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = Vec::with_capacity(points.len());
    for &p in points {
        if out
            .last()
            .is_none_or(|q: &Vec2| q.distance_squared(p) > POINT_EPSILON * POINT_EPSILON)
        {
            out.push(p);
        }
    }
    while out.len() > 1 {
        let first = out[0];
        match out.last() {
            Some(last) if last.distance_squared(first) <= POINT_EPSILON * POINT_EPSILON => {
                out.pop();
            }
            _ => break,
        }
    }
    out
}
