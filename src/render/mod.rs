pub mod canvas;
pub mod color;
pub mod draw;

pub use canvas::Canvas;
pub use color::Rgba;
pub use draw::{GradientStop, Stroke};
