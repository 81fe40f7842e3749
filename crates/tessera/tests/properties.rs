use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng as RngCore, SeedableRng};
use tessera::prelude::*;
use tessera::sampling::rand_range;

fn every_family() -> Vec<FamilyParams> {
    Family::ALL.iter().map(|&f| FamilyParams::defaults(f)).collect()
}

fn generate(params: &FamilyParams, ctx: &GenerationContext) -> Vec<StyledShape> {
    generate_family(params, ctx, &GenerationInputs::new()).expect("valid params")
}

#[test]
fn every_family_is_deterministic() {
    let ctx = GenerationContext::new(160.0, 120.0, 25, 9).expect("ctx");
    for params in every_family() {
        let a = generate(&params, &ctx);
        let b = generate(&params, &ctx);
        assert!(!a.is_empty(), "{} produced nothing", params.family());
        assert_eq!(a, b, "{} is not deterministic", params.family());
    }
}

#[test]
fn seed_changes_output() {
    let one = GenerationContext::new(160.0, 120.0, 25, 1).expect("ctx");
    let two = GenerationContext::new(160.0, 120.0, 25, 2).expect("ctx");
    for params in every_family() {
        if params.family() == Family::ConcentricCircles {
            continue;
        }
        assert_ne!(
            generate(&params, &one),
            generate(&params, &two),
            "{} ignores the seed",
            params.family()
        );
    }
}

#[test]
fn every_shape_stays_on_the_canvas() {
    for (w, h, n) in [(160.0, 120.0, 25), (50.0, 200.0, 60), (300.0, 300.0, 1)] {
        let ctx = GenerationContext::new(w, h, n, 77).expect("ctx");
        for params in every_family() {
            for s in generate(&params, &ctx) {
                let bbox = s.shape.bbox().expect("bbox");
                assert!(
                    ctx.canvas_rect().contains_box(&bbox, 1e-3),
                    "{} left the {w}x{h} canvas: {bbox:?}",
                    params.family()
                );
                assert!(!s.shape.is_degenerate());
            }
        }
    }
}

#[test]
fn tiny_canvases_keep_every_family_inside() {
    for (w, h) in [(1.0, 1.0), (1.5, 1.5), (0.5, 3.0)] {
        for n in [1, 4, 12] {
            let ctx = GenerationContext::new(w, h, n, 3).expect("ctx");
            for params in every_family() {
                for s in generate(&params, &ctx) {
                    let bbox = s.shape.bbox().expect("bbox");
                    assert!(
                        ctx.canvas_rect().contains_box(&bbox, 1e-5),
                        "{} left the {w}x{h} canvas: {bbox:?}",
                        params.family()
                    );
                }
            }
        }
    }
}

#[test]
fn voronoi_fallback_fits_tiny_canvases() {
    let generator = VoronoiGenerator::try_with_provider(VoronoiParams::default(), Unavailable)
        .expect("generator");
    for (w, h) in [(1.0, 1.0), (0.5, 3.0)] {
        let ctx = GenerationContext::new(w, h, 12, 5).expect("ctx");
        let shapes = generator.generate(&ctx, &GenerationInputs::new());
        assert_eq!(shapes.len(), 12);
        for s in &shapes {
            let bbox = s.shape.bbox().expect("bbox");
            assert!(ctx.canvas_rect().contains_box(&bbox, 1e-5), "{bbox:?}");
        }
    }
}

#[test]
fn poisson_factor_range_edges() {
    let ctx = GenerationContext::new(300.0, 200.0, 0, 11).expect("ctx");
    for factor in [0.005, 0.030] {
        let params =
            FamilyParams::PoissonDisk(PoissonParams::default().with_min_dist_factor(factor));
        let shapes = generate(&params, &ctx);
        assert!(!shapes.is_empty(), "factor {factor} produced nothing");
        for s in &shapes {
            assert!(ctx
                .canvas_rect()
                .contains_box(&s.shape.bbox().expect("bbox"), 1e-5));
        }
    }

    let huge = GenerationContext::new(10_000.0, 10_000.0, 10, 1).expect("ctx");
    for params in [
        PoissonParams::default().with_min_dist_factor(1e-9),
        PoissonParams::default().with_min_dist_factor(0.031),
        PoissonParams::default().with_radius(1e-4),
    ] {
        let params = FamilyParams::PoissonDisk(params);
        let err = generate_family(&params, &huge, &GenerationInputs::new()).unwrap_err();
        assert!(err.is_config());
    }
}

#[test]
fn voronoi_polygons_are_valid() {
    let ctx = GenerationContext::new(240.0, 180.0, 40, 3).expect("ctx");
    let shapes = generate(&FamilyParams::defaults(Family::Voronoi), &ctx);
    for s in &shapes {
        if let Shape::Polygon { points } = &s.shape {
            assert!(points.len() >= 3);
            assert!(points
                .iter()
                .all(|p| p.x >= -1e-3 && p.x <= 240.001 && p.y >= -1e-3 && p.y <= 180.001));
        }
    }
}

#[test]
fn zero_target_is_not_an_error() {
    let ctx = GenerationContext::new(100.0, 100.0, 0, 1).expect("ctx");
    for params in every_family() {
        assert!(generate_family(&params, &ctx, &GenerationInputs::new()).is_ok());
    }
}

#[test]
fn invalid_configuration_is_rejected() {
    assert!(GenerationContext::new(0.0, 100.0, 10, 1).unwrap_err().is_config());
    assert!(GenerationContext::try_from_signed(10.0, 10.0, -3, 1)
        .unwrap_err()
        .is_config());

    let ctx = GenerationContext::new(100.0, 100.0, 10, 1).expect("ctx");
    let bad = [
        FamilyParams::Rectangles(RectangleParams::default().with_size_multipliers(5.0, 1.0)),
        FamilyParams::ScatterCircles(ScatterParams::default().with_jitter(2.0)),
        FamilyParams::Triangulation(
            TriangulationParams::default()
                .with_cascade(CascadeOptions::enabled().with_intensity(0.0)),
        ),
    ];
    for params in bad {
        let err = generate_family(&params, &ctx, &GenerationInputs::new()).unwrap_err();
        assert!(err.is_config(), "{} accepted bad params", params.family());
    }
}

#[cfg(feature = "spade")]
#[test]
fn square_seeds_give_two_ordered_triangles() {
    let ctx = GenerationContext::new(100.0, 100.0, 4, 42).expect("ctx");
    let seeds = [
        Vec2::new(10.0, 10.0),
        Vec2::new(90.0, 10.0),
        Vec2::new(90.0, 90.0),
        Vec2::new(10.0, 90.0),
    ];
    let inputs = GenerationInputs::new().with_seed_points(&seeds);
    let shapes = generate_family(&FamilyParams::defaults(Family::Triangulation), &ctx, &inputs)
        .expect("generate");
    assert_eq!(shapes.len(), 2);
    assert!(shapes[0].shape.centroid().x < shapes[1].shape.centroid().x);
}

#[test]
fn unavailable_triangulation_uses_the_grid() {
    let ctx = GenerationContext::new(100.0, 100.0, 10, 42).expect("ctx");
    let generator =
        TriangulationGenerator::try_with_provider(TriangulationParams::default(), Unavailable)
            .expect("generator");
    assert_eq!(generator.generate(&ctx, &GenerationInputs::new()).len(), 98);
}

#[test]
fn poisson_run_twice_gives_identical_points() {
    let radius = PoissonDiskSampling::radius_for_count(50.0, 50.0, 10);
    let sampling = PoissonDiskSampling::new(radius);
    let a = sampling.generate(Vec2::new(50.0, 50.0).into(), &mut StdRng::seed_from_u64(7));
    let b = sampling.generate(Vec2::new(50.0, 50.0).into(), &mut StdRng::seed_from_u64(7));
    assert!(!a.is_empty());
    assert_eq!(
        a.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>(),
        b.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>()
    );
}

#[test]
fn packed_rectangles_do_not_overlap_beyond_tolerance() {
    let params = RectangleParams::default();
    let tolerance = params.overlap_tolerance;
    let ctx = GenerationContext::new(200.0, 200.0, 30, 3).expect("ctx");
    let shapes = RectanglePacker::try_new(params)
        .expect("packer")
        .generate(&ctx, &GenerationInputs::new());
    assert!(!shapes.is_empty() && shapes.len() <= 30);
    for (i, a) in shapes.iter().enumerate() {
        assert!(ctx
            .canvas_rect()
            .contains_box(&a.shape.bbox().expect("bbox"), 1e-3));
        for b in &shapes[i + 1..] {
            assert!(!shapes_collide(&a.shape, &b.shape, tolerance));
        }
    }
}

#[test]
fn cascade_is_monotone_and_non_overlapping() {
    let canvas = Vec2::new(200.0, 150.0);
    let existing = vec![
        Shape::rectangle(20.0, 20.0, 40.0, 30.0),
        Shape::circle(120.0, 80.0, 25.0),
    ];
    let fill = CascadeFill::new(CascadeConfig::default());

    for target in [0usize, 1, 2, 10, 80, 400] {
        let mut index = SpatialIndex::from_shapes(canvas, existing.iter());
        let mut rng = StdRng::seed_from_u64(target as u64);
        let result = fill.apply(
            &existing,
            &mut index,
            target,
            |rng: &mut dyn RngCore| {
                let r = rand_range(rng, 2.0, 6.0);
                Shape::circle(r, r, r)
            },
            &mut rng,
        );
        let total = existing.len() + result.shapes.len();
        assert!(total >= existing.len());
        assert!(total <= target.max(existing.len()));

        let all: Vec<&Shape> = existing.iter().chain(&result.shapes).collect();
        for placed in &result.shapes {
            let overlaps = all
                .iter()
                .filter(|other| shapes_collide(placed, other, 0.25))
                .count();
            // Only the shape itself.
            assert_eq!(overlaps, 1);
        }
    }
}

#[test]
fn canonical_order_is_independent_of_input_order() {
    let ctx = GenerationContext::new(120.0, 120.0, 30, 5).expect("ctx");
    let shapes = generate(&FamilyParams::defaults(Family::ScatterCircles), &ctx);
    let mut reversed: Vec<StyledShape> = shapes.iter().rev().cloned().collect();
    canonicalize(&mut reversed);
    assert_eq!(shapes, reversed);
}
