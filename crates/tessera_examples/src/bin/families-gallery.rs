use glam::Vec2;
use tessera::prelude::*;
use tessera_examples::{gradient_sampler, init_tracing, render_shapes_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let canvas = Vec2::new(400.0, 300.0);
    let sampler = gradient_sampler(Color::rgb(32, 64, 160), Color::rgb(240, 200, 80));
    let inputs = GenerationInputs::new().with_sampler(&sampler);
    let rc = RenderConfig::new((800, 600), canvas);

    for family in Family::ALL {
        let ctx = GenerationContext::new(canvas.x, canvas.y, 120, 7)?;
        let shapes = generate_family(&FamilyParams::defaults(family), &ctx, &inputs)?;
        render_shapes_to_png(&shapes, &rc, format!("families-gallery-{family}.png"))?;
    }

    Ok(())
}
