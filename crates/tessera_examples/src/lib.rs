#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    gradient_sampler, init_tracing, load_png_sampler, render_shapes_to_png, RenderConfig,
};
