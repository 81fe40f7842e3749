#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tessera::prelude::{
    generate_family, FamilyParams, GenerationContext, GenerationInputs, Shape, StyledShape,
};
use tessera::sampling::rand_range;

/// Square canvas for index and cascade benches.
pub const INDEX_CANVAS: Vec2 = Vec2::new(1024.0, 1024.0);

/// Canvas for whole-family runs.
pub const FAMILY_CANVAS: Vec2 = Vec2::new(800.0, 600.0);
pub const FAMILY_SEED: u64 = 0xBEEF;

pub fn tessera_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(15)
        .warm_up_time(Duration::from_millis(300))
        .measurement_time(Duration::from_secs(3))
        .noise_threshold(0.03)
}

/// Random, possibly overlapping squares inside [`INDEX_CANVAS`].
pub fn random_squares(count: usize, side: f32, seed: u64) -> Vec<Shape> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = rand_range(&mut rng, 0.0, INDEX_CANVAS.x - side);
            let y = rand_range(&mut rng, 0.0, INDEX_CANVAS.y - side);
            Shape::rectangle(x, y, side, side)
        })
        .collect()
}

pub fn family_context(count: usize) -> GenerationContext {
    GenerationContext::new(FAMILY_CANVAS.x, FAMILY_CANVAS.y, count, FAMILY_SEED)
        .expect("valid benchmark canvas")
}

pub fn run_family(params: &FamilyParams, ctx: &GenerationContext) -> Vec<StyledShape> {
    generate_family(params, ctx, &GenerationInputs::new()).expect("valid default params")
}

/// Throughput in shapes actually produced, which can fall short of the target.
pub fn produced(shapes: usize) -> Throughput {
    Throughput::Elements(shapes.max(1) as u64)
}
