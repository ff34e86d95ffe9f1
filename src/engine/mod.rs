pub mod driver;
pub mod registry;

pub use driver::{device_pixel_size, Driver, FADE_ALPHA};
pub use registry::EffectRegistry;
