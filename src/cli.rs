use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lumina", about = "Audio-reactive visual effects engine (offline demo driver)")]
pub struct Cli {
    /// Effect id to run
    #[arg(short, long, default_value = "geiss")]
    pub effect: String,

    /// Surface width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Simulated refresh rate
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Number of frames to render
    #[arg(long, default_value_t = 600)]
    pub frames: u32,

    /// Alpha of the per-frame fade overlay (0.0-1.0)
    #[arg(long, default_value_t = 0.15)]
    pub fade_alpha: f32,

    /// Seed for effect randomness
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Rotate through all effects instead of keeping one
    #[arg(long)]
    pub cycle: bool,

    /// Write each frame as a PNG into this directory
    #[arg(long)]
    pub dump_dir: Option<PathBuf>,

    /// List registered effect ids and exit
    #[arg(long)]
    pub list_effects: bool,

    /// Config file path (default: lumina.toml / platform config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
