use glam::Vec2;
use tessera::prelude::*;
use tessera_examples::{gradient_sampler, init_tracing, render_shapes_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let canvas = Vec2::new(300.0, 300.0);
    let ctx = GenerationContext::new(canvas.x, canvas.y, 400, 2024)?;

    // Sparse Poisson spacing leaves room for cascade to fill.
    let params = PoissonParams::default()
        .with_min_dist_factor(0.08)
        .with_cascade(CascadeOptions::enabled().with_intensity(1.0));
    let generator = PoissonDiskGenerator::try_new(params)?;

    let mut placed = 0usize;
    let mut failed = 0usize;
    let mut sink = FnSink::new(|event: GenerationEvent| match event {
        GenerationEvent::ShapePlaced { .. } => placed += 1,
        GenerationEvent::PlacementFailed { .. } => failed += 1,
        GenerationEvent::CascadePhaseStarted { phase, index } => {
            println!("phase {phase:?} from shape {index}");
        }
        GenerationEvent::PlacementAborted { placed, failures, .. } => {
            println!("cascade stopped early: {placed} placed, {failures} failed");
        }
        _ => {}
    });

    let sampler = gradient_sampler(Color::rgb(20, 20, 20), Color::rgb(220, 60, 60));
    let shapes = generator.generate_with_events(
        &ctx,
        &GenerationInputs::new().with_sampler(&sampler),
        &mut sink,
    );
    drop(sink);
    println!(
        "{} circles in total, cascade placed {placed} and dropped {failed}",
        shapes.len()
    );

    let rc = RenderConfig::new((600, 600), canvas).with_background([250, 250, 245]);
    render_shapes_to_png(&shapes, &rc, "cascade-events.png")?;
    Ok(())
}
