pub mod capture;
pub mod features;

pub use capture::{CaptureError, CaptureSource, SyntheticCapture};
pub use features::AudioFeatures;
