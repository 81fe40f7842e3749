//! Point sampling strategies over the canvas rectangle `[0, w) x [0, h)`.
//!
//! Samplers propose seed points for the generators (Delaunay/Voronoi sites,
//! Poisson-disk and scatter circle centres). All randomness is drawn through
//! the helpers below so that each scalar consumes exactly one `next_u32`,
//! which keeps output sequences stable for a given seed.
use mint::Vector2;
use rand::Rng as RngCore;

pub mod jitter_grid;
pub mod poisson_disk;

pub use jitter_grid::StratifiedJitterSampling;
pub use poisson_disk::PoissonDiskSampling;

/// Trait for position sampling.
pub trait PositionSampling: Send + Sync {
    fn generate(&self, canvas_extent: Vector2<f32>, rng: &mut dyn RngCore) -> Vec<Vector2<f32>>;
}

/// Generate a random float in the range [0, 1).
#[inline]
pub fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Uniform float in `[lo, hi)`. Returns `lo` when the range is empty.
#[inline]
pub fn rand_range(rng: &mut dyn RngCore, lo: f32, hi: f32) -> f32 {
    let u = rand01(rng);
    if hi > lo {
        lo + u * (hi - lo)
    } else {
        lo
    }
}

/// Uniform index in `0..len`. `len` must be non-zero.
#[inline]
pub fn rand_index(rng: &mut dyn RngCore, len: usize) -> usize {
    debug_assert!(len > 0, "rand_index requires a non-empty range");
    let scaled = ((rng.next_u32() as u64) * (len as u64)) >> 32;
    scaled as usize
}

/// In-place Fisher–Yates shuffle.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RngCore) {
    for i in (1..items.len()).rev() {
        let j = rand_index(rng, i + 1);
        items.swap(i, j);
    }
}

/// Compute the next smaller representable float value.
///
/// Used to keep samples strictly below the right/bottom canvas edge.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() {
        return f32::NAN;
    }

    if val == f32::NEG_INFINITY {
        return f32::NEG_INFINITY;
    }

    if val == f32::INFINITY {
        return f32::MAX;
    }

    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}
