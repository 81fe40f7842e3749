use glam::Vec2;
use tessera::prelude::*;
use tessera_examples::{
    gradient_sampler, init_tracing, load_png_sampler, render_shapes_to_png, RenderConfig,
};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let canvas = Vec2::new(512.0, 512.0);
    let ctx = GenerationContext::new(canvas.x, canvas.y, 600, 11)?;
    let generator = VoronoiGenerator::try_new(VoronoiParams::default())?;

    // Pass a PNG path to colour the cells from an image.
    let shapes = match std::env::args().nth(1) {
        Some(path) => {
            let image = load_png_sampler(path)?;
            generator.generate(&ctx, &GenerationInputs::new().with_sampler(&image))
        }
        None => {
            let sampler = gradient_sampler(Color::rgb(10, 90, 80), Color::rgb(250, 240, 210));
            generator.generate(&ctx, &GenerationInputs::new().with_sampler(&sampler))
        }
    };

    let rc = RenderConfig::new((1024, 1024), canvas);
    render_shapes_to_png(&shapes, &rc, "voronoi-from-image.png")?;
    Ok(())
}
