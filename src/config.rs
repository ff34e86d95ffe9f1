use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_frames")]
    pub frames: u32,
}

#[derive(Debug, Deserialize)]
pub struct EngineConfig {
    /// Alpha of the per-frame black fade overlay (0.0-1.0)
    #[serde(default = "default_fade_alpha")]
    pub fade_alpha: f32,
}

#[derive(Debug, Deserialize)]
pub struct EffectsConfig {
    #[serde(default = "default_particle_max")]
    pub particle_max: usize,
    #[serde(default = "default_star_count")]
    pub star_count: usize,
    #[serde(default = "default_plasma_scale")]
    pub plasma_scale: u32,
    #[serde(default = "default_geiss_scale")]
    pub geiss_scale: u32,
    #[serde(default = "default_terrain_depth")]
    pub terrain_depth: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            frames: default_frames(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fade_alpha: default_fade_alpha(),
        }
    }
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            particle_max: default_particle_max(),
            star_count: default_star_count(),
            plasma_scale: default_plasma_scale(),
            geiss_scale: default_geiss_scale(),
            terrain_depth: default_terrain_depth(),
        }
    }
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }
fn default_fps() -> u32 { 60 }
fn default_frames() -> u32 { 600 }
fn default_fade_alpha() -> f32 { 0.15 }
fn default_particle_max() -> usize { 500 }
fn default_star_count() -> usize { 400 }
fn default_plasma_scale() -> u32 { 4 }
fn default_geiss_scale() -> u32 { 4 }
fn default_terrain_depth() -> usize { 100 }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}
