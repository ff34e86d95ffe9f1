//! The effect family: stateful per-frame painters driven by audio features
//! and elapsed time.

pub mod circular;
pub mod geiss;
pub mod matrix;
pub mod oscilloscope;
pub mod particles;
pub mod plasma;
pub mod spectrum;
pub mod starfield;
pub mod terrain;

use crate::audio::AudioFeatures;
use crate::render::Canvas;

/// One frame's worth of imagery per call.
///
/// Implementations own whatever animation state persists across frames and
/// must tolerate any positive canvas dimensions, including ones that differ
/// from the previous call (internal buffers are rebuilt lazily). Empty audio
/// snapshots degrade to a blank or degenerate frame, never a panic.
pub trait Effect {
    /// Display name shown by the selection surface.
    fn name(&self) -> &str;

    /// Paint one frame onto the full canvas. `time` is seconds since the
    /// driver started and increases monotonically.
    fn render(&mut self, canvas: &mut Canvas, audio: &AudioFeatures<'_>, time: f32);

    /// Release all per-effect state so the next activation starts clean.
    fn teardown(&mut self) {}
}

pub use circular::Circular;
pub use geiss::Geiss;
pub use matrix::Matrix;
pub use oscilloscope::Oscilloscope;
pub use particles::Particles;
pub use plasma::Plasma;
pub use spectrum::Spectrum;
pub use starfield::Starfield;
pub use terrain::Terrain;
