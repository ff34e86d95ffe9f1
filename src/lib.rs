//! Real-time audio-reactive visual effects engine.
//!
//! The core pipeline: a [`CaptureSource`] snapshot feeds [`AudioFeatures`]
//! extraction, the [`Driver`] paints the trailing fade and dispatches the
//! active [`Effect`] from the [`EffectRegistry`] onto a CPU [`Canvas`] once
//! per host refresh.
//!
//! [`CaptureSource`]: audio::CaptureSource
//! [`AudioFeatures`]: audio::AudioFeatures
//! [`Driver`]: engine::Driver
//! [`Effect`]: effects::Effect
//! [`EffectRegistry`]: engine::EffectRegistry
//! [`Canvas`]: render::Canvas

pub mod audio;
pub mod cli;
pub mod config;
pub mod effects;
pub mod engine;
pub mod render;
