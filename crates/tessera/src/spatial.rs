//! Uniform-grid collision index over an append-only shape arena.
//!
//! [`ShapeArena`] is the only owner of placed shapes; ids are stable and never
//! reused. [`SpatialIndex`] maps each grid cell to the ids whose bounding box
//! overlaps it, and answers collision queries by enumerating candidate cells
//! (approximate) and then testing bounding boxes exactly.
use std::collections::HashSet;

use glam::Vec2;

use crate::geometry::{BoundingBox, Shape};

/// Default canvas-units-per-cell divisor.
pub const DEFAULT_CELL_DIVISOR: f32 = 32.0;

/// Stable index of a shape inside a [`ShapeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(
    /// Position in insertion order.
    pub usize,
);

/// Append-only ordered store of shapes.
#[derive(Debug, Clone, Default)]
pub struct ShapeArena {
    shapes: Vec<Shape>,
}

impl ShapeArena {
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Append a shape and return its id.
    pub fn push(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId(self.shapes.len());
        self.shapes.push(shape);
        id
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn as_slice(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter().enumerate().map(|(i, s)| (ShapeId(i), s))
    }

    pub fn into_inner(self) -> Vec<Shape> {
        self.shapes
    }
}

/// Grid layout derived from the canvas size and a cell divisor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Number of columns (>= 1).
    pub cols: usize,
    /// Number of rows (>= 1).
    pub rows: usize,
    /// Cell size in canvas units.
    pub cell_size: Vec2,
}

impl GridLayout {
    /// `cols = max(1, floor(w / divisor))`, likewise for rows; cells then
    /// split the canvas evenly.
    pub fn for_canvas(canvas: Vec2, divisor: f32) -> Self {
        let divisor = if divisor.is_finite() && divisor > 0.0 {
            divisor
        } else {
            DEFAULT_CELL_DIVISOR
        };
        let cols = ((canvas.x / divisor).floor() as usize).max(1);
        let rows = ((canvas.y / divisor).floor() as usize).max(1);
        Self {
            cols,
            rows,
            cell_size: Vec2::new(canvas.x / cols as f32, canvas.y / rows as f32),
        }
    }

    /// Inclusive `(col_min, row_min, col_max, row_max)` covering `bbox`,
    /// clamped to the grid.
    pub fn cell_span(&self, bbox: &BoundingBox) -> (usize, usize, usize, usize) {
        let clamp_col = |x: f32| -> usize {
            ((x / self.cell_size.x).floor() as isize).clamp(0, self.cols as isize - 1) as usize
        };
        let clamp_row = |y: f32| -> usize {
            ((y / self.cell_size.y).floor() as isize).clamp(0, self.rows as isize - 1) as usize
        };
        (
            clamp_col(bbox.min.x),
            clamp_row(bbox.min.y),
            clamp_col(bbox.max.x),
            clamp_row(bbox.max.y),
        )
    }

    #[inline]
    fn cell_index(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }
}

/// Bounding-box collision index.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    canvas: Vec2,
    layout: GridLayout,
    cells: Vec<Vec<ShapeId>>,
    arena: ShapeArena,
}

impl SpatialIndex {
    /// Create an index with the default cell divisor.
    pub fn new(canvas: Vec2) -> Self {
        Self::with_cell_divisor(canvas, DEFAULT_CELL_DIVISOR)
    }

    pub fn with_cell_divisor(canvas: Vec2, divisor: f32) -> Self {
        let layout = GridLayout::for_canvas(canvas, divisor);
        Self {
            canvas,
            layout,
            cells: vec![Vec::new(); layout.cols * layout.rows],
            arena: ShapeArena::new(),
        }
    }

    /// Build an index and insert every non-degenerate shape of `shapes`.
    pub fn from_shapes<'a>(canvas: Vec2, shapes: impl IntoIterator<Item = &'a Shape>) -> Self {
        let mut index = Self::new(canvas);
        for shape in shapes {
            if !shape.is_degenerate() {
                index.insert(shape.clone());
            }
        }
        index
    }

    pub fn canvas(&self) -> Vec2 {
        self.canvas
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn arena(&self) -> &ShapeArena {
        &self.arena
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.arena.get(id)
    }

    /// Append `shape` to the arena and register it in every cell its bounding
    /// box overlaps.
    ///
    /// Returns `None`, without storing anything, when the shape has no
    /// computable bounding box. Callers discard degenerate shapes beforehand.
    pub fn insert(&mut self, shape: Shape) -> Option<ShapeId> {
        debug_assert!(!shape.is_degenerate(), "degenerate shape inserted");
        let bbox = shape.bbox()?;
        let id = self.arena.push(shape);

        let (c0, r0, c1, r1) = self.layout.cell_span(&bbox);
        for row in r0..=r1 {
            for col in c0..=c1 {
                let idx = self.layout.cell_index(col, row);
                self.cells[idx].push(id);
            }
        }

        Some(id)
    }

    /// Ids possibly overlapping `bbox` (a superset), ascending and unique.
    pub fn query_region(&self, bbox: &BoundingBox) -> Vec<ShapeId> {
        let (c0, r0, c1, r1) = self.layout.cell_span(bbox);
        let mut ids: Vec<ShapeId> = Vec::new();
        for row in r0..=r1 {
            for col in c0..=c1 {
                ids.extend_from_slice(&self.cells[self.layout.cell_index(col, row)]);
            }
        }
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// `true` if `candidate` overlaps any stored shape under `tolerance`
    /// (see [`BoundingBox::overlaps`]).
    ///
    /// A candidate without a bounding box never collides.
    pub fn has_collision(&self, candidate: &Shape, tolerance: f32) -> bool {
        let Some(bbox) = candidate.bbox() else {
            return false;
        };
        self.collides_with_bbox(&bbox, tolerance)
    }

    /// Bounding-box form of [`SpatialIndex::has_collision`].
    pub fn collides_with_bbox(&self, bbox: &BoundingBox, tolerance: f32) -> bool {
        // A positive margin reaches into neighbouring cells.
        let search = bbox.expand(tolerance.max(0.0));
        let (c0, r0, c1, r1) = self.layout.cell_span(&search);

        let mut visited: HashSet<ShapeId> = HashSet::new();
        for row in r0..=r1 {
            for col in c0..=c1 {
                for &id in &self.cells[self.layout.cell_index(col, row)] {
                    if !visited.insert(id) {
                        continue;
                    }
                    let Some(existing) = self.arena.get(id).and_then(Shape::bbox) else {
                        continue;
                    };
                    if bbox.overlaps(&existing, tolerance) {
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Consume the index, returning the arena contents in insertion order.
    pub fn into_shapes(self) -> Vec<Shape> {
        self.arena.into_inner()
    }
}

/// Exact pairwise test used by the index, exposed for verification.
pub fn shapes_collide(a: &Shape, b: &Shape, tolerance: f32) -> bool {
    match (a.bbox(), b.bbox()) {
        (Some(ba), Some(bb)) => ba.overlaps(&bb, tolerance),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_uses_divisor_and_minimum_of_one() {
        let layout = GridLayout::for_canvas(Vec2::new(200.0, 50.0), 32.0);
        assert_eq!(layout.cols, 6);
        assert_eq!(layout.rows, 1);
        assert!((layout.cell_size.x - 200.0 / 6.0).abs() < 1e-4);

        let tiny = GridLayout::for_canvas(Vec2::new(10.0, 10.0), 32.0);
        assert_eq!((tiny.cols, tiny.rows), (1, 1));
    }

    #[test]
    fn arena_ids_are_stable_and_sequential() {
        let mut index = SpatialIndex::new(Vec2::new(100.0, 100.0));
        let a = index.insert(Shape::circle(10.0, 10.0, 2.0));
        let b = index.insert(Shape::rectangle(50.0, 50.0, 5.0, 5.0));
        assert_eq!(a, Some(ShapeId(0)));
        assert_eq!(b, Some(ShapeId(1)));
        assert_eq!(index.len(), 2);
        assert!(index.get(ShapeId(1)).expect("stored").is_polygon());
    }

    #[test]
    fn candidate_without_bbox_never_collides() {
        let mut index = SpatialIndex::new(Vec2::new(100.0, 100.0));
        index.insert(Shape::rectangle(0.0, 0.0, 100.0, 100.0));
        let empty = Shape::Polygon { points: Vec::new() };
        assert!(!index.has_collision(&empty, 0.0));
        assert!(!index.has_collision(&Shape::circle(f32::NAN, 1.0, 1.0), 0.0));
    }

    #[test]
    fn collision_detects_overlap_and_respects_tolerance() {
        let mut index = SpatialIndex::new(Vec2::new(128.0, 128.0));
        index.insert(Shape::rectangle(10.0, 10.0, 20.0, 20.0));

        assert!(index.has_collision(&Shape::rectangle(25.0, 25.0, 10.0, 10.0), 0.0));
        assert!(!index.has_collision(&Shape::rectangle(30.0, 10.0, 10.0, 10.0), 0.0));
        assert!(index.has_collision(&Shape::rectangle(30.1, 10.0, 10.0, 10.0), 0.25));
        assert!(!index.has_collision(&Shape::rectangle(28.0, 10.0, 10.0, 10.0), -3.0));
    }

    #[test]
    fn positive_margin_reaches_neighbouring_cells() {
        let mut index = SpatialIndex::new(Vec2::new(128.0, 128.0));
        // Ends exactly on the boundary between cell 0 and cell 1.
        index.insert(Shape::rectangle(0.0, 0.0, 31.9, 10.0));
        let candidate = Shape::rectangle(32.0, 0.0, 5.0, 5.0);
        assert!(!index.has_collision(&candidate, 0.0));
        assert!(index.has_collision(&candidate, 0.5));
    }

    #[test]
    fn query_region_returns_unique_superset() {
        let mut index = SpatialIndex::new(Vec2::new(128.0, 128.0));
        let big = index
            .insert(Shape::rectangle(0.0, 0.0, 100.0, 100.0))
            .expect("inserted");
        let small = index
            .insert(Shape::circle(120.0, 120.0, 2.0))
            .expect("inserted");

        let hits = index.query_region(&BoundingBox::from_origin_size(0.0, 0.0, 128.0, 128.0));
        assert_eq!(hits, vec![big, small]);

        let corner = index.query_region(&BoundingBox::from_origin_size(110.0, 110.0, 5.0, 5.0));
        assert!(corner.contains(&small));
    }

    #[test]
    fn from_shapes_skips_degenerate_input() {
        let shapes = vec![
            Shape::circle(5.0, 5.0, 1.0),
            Shape::circle(5.0, 5.0, 0.0),
            Shape::triangle(Vec2::ZERO, Vec2::ONE, Vec2::splat(2.0)),
        ];
        let index = SpatialIndex::from_shapes(Vec2::new(64.0, 64.0), &shapes);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn pairwise_helper_matches_index() {
        let a = Shape::circle(10.0, 10.0, 5.0);
        let b = Shape::circle(18.0, 10.0, 5.0);
        assert!(shapes_collide(&a, &b, 0.0));
        assert!(!shapes_collide(&a, &b, -3.0));
    }
}
