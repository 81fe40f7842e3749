use std::path::Path;

use anyhow::Context;
use glam::Vec2;
use image::{Rgb, RgbImage};
use tessera::prelude::{Color, PixelLayout, RasterImage, Shape, StyledShape};
use tracing::info;

/// Install a `fmt` subscriber honouring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Output image settings.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub canvas: Vec2,
    pub background: [u8; 3],
    pub draw_strokes: bool,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), canvas: Vec2) -> Self {
        Self {
            image_size,
            canvas,
            background: [255, 255, 255],
            draw_strokes: true,
        }
    }

    pub fn with_background(mut self, rgb: [u8; 3]) -> Self {
        self.background = rgb;
        self
    }

    pub fn with_strokes(mut self, draw: bool) -> Self {
        self.draw_strokes = draw;
        self
    }

    fn scale(&self) -> Vec2 {
        Vec2::new(
            self.image_size.0 as f32 / self.canvas.x,
            self.image_size.1 as f32 / self.canvas.y,
        )
    }
}

/// Rasterise shapes in order, alpha-blending fills and drawing polygon outlines.
pub fn render_shapes_to_png(
    shapes: &[StyledShape],
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = config.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(config.background));
    let scale = config.scale();

    for styled in shapes {
        fill_shape(&mut img, &styled.shape, scale, styled.fill, styled.opacity);
        if config.draw_strokes {
            if let (Some(stroke), Shape::Polygon { points }) = (styled.stroke, &styled.shape) {
                if styled.stroke_width > 0.0 {
                    stroke_ring(&mut img, points, scale, stroke);
                }
            }
        }
    }

    let path = path.as_ref();
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {} shapes to {}.", shapes.len(), path.display());
    Ok(())
}

/// Load a PNG as a colour sampler.
pub fn load_png_sampler(path: impl AsRef<Path>) -> anyhow::Result<RasterImage> {
    let path = path.as_ref();
    let img = image::open(path)
        .with_context(|| format!("reading {}", path.display()))?
        .to_rgb8();
    let (w, h) = img.dimensions();
    Ok(RasterImage::new(w, h, PixelLayout::Rgb, img.into_raw())?)
}

/// A diagonal two-colour gradient, for demos without an input image.
pub fn gradient_sampler(from: Color, to: Color) -> impl Fn(f32, f32, f32, f32) -> Color + Send + Sync {
    move |x, y, w, h| {
        let t = ((x / w + y / h) * 0.5).clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::rgb(lerp(from.r, to.r), lerp(from.g, to.g), lerp(from.b, to.b))
    }
}

fn blend(img: &mut RgbImage, x: u32, y: u32, color: Color, alpha: f32) {
    let px = img.get_pixel_mut(x, y);
    let src = color.to_array();
    for c in 0..3 {
        let v = px.0[c] as f32 * (1.0 - alpha) + src[c] as f32 * alpha;
        px.0[c] = v.round().clamp(0.0, 255.0) as u8;
    }
}

fn fill_shape(img: &mut RgbImage, shape: &Shape, scale: Vec2, color: Color, alpha: f32) {
    let Some(bbox) = shape.bbox() else {
        return;
    };
    let (w, h) = img.dimensions();
    let x0 = (bbox.min.x * scale.x).floor().max(0.0) as u32;
    let y0 = (bbox.min.y * scale.y).floor().max(0.0) as u32;
    let x1 = ((bbox.max.x * scale.x).ceil() as u32).min(w);
    let y1 = ((bbox.max.y * scale.y).ceil() as u32).min(h);

    for py in y0..y1 {
        for px in x0..x1 {
            let p = Vec2::new((px as f32 + 0.5) / scale.x, (py as f32 + 0.5) / scale.y);
            let inside = match shape {
                Shape::Circle { center, radius } => p.distance_squared(*center) <= radius * radius,
                Shape::Polygon { points } => point_in_ring(p, points),
            };
            if inside {
                blend(img, px, py, color, alpha);
            }
        }
    }
}

fn point_in_ring(p: Vec2, ring: &[Vec2]) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn stroke_ring(img: &mut RgbImage, ring: &[Vec2], scale: Vec2, color: Color) {
    let (w, h) = img.dimensions();
    for (i, &a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        let (a, b) = (a * scale, b * scale);
        let steps = (b - a).abs().max_element().ceil().max(1.0) as usize;
        for s in 0..=steps {
            let p = a.lerp(b, s as f32 / steps as f32);
            let (x, y) = (p.x as i64, p.y as i64);
            if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
                blend(img, x as u32, y as u32, color, 1.0);
            }
        }
    }
}
