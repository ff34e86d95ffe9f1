use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use lumina::audio::{CaptureSource, SyntheticCapture};
use lumina::cli::Cli;
use lumina::config;
use lumina::engine::{Driver, EffectRegistry};
use lumina::render::Canvas;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect lumina.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("lumina.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("lumina").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("lumina").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });

    let mut effects_cfg = config::EffectsConfig::default();
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.width == 800 { cli.width = cfg.output.width; }
            if cli.height == 600 { cli.height = cfg.output.height; }
            if cli.fps == 60 { cli.fps = cfg.output.fps; }
            if cli.frames == 600 { cli.frames = cfg.output.frames; }
            if cli.fade_alpha == 0.15 { cli.fade_alpha = cfg.engine.fade_alpha; }
            effects_cfg = cfg.effects;
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let mut registry = EffectRegistry::with_defaults(&effects_cfg, cli.seed);

    if cli.list_effects {
        println!("Registered effects:");
        for id in registry.ids() {
            println!("  {}", id);
        }
        return Ok(());
    }

    log::info!("lumina - audio-reactive visual effects engine");
    log::info!("Surface: {}x{} @ {}fps, {} frames", cli.width, cli.height, cli.fps, cli.frames);

    registry.activate(&cli.effect);
    if registry.current_name().is_empty() {
        anyhow::bail!("Unknown effect: {}", cli.effect);
    }
    log::info!("Effect: {}", registry.current_name());

    if let Some(ref dir) = cli.dump_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create dump dir: {}", dir.display()))?;
    }

    let mut canvas = Canvas::new(cli.width, cli.height);
    let mut capture = SyntheticCapture::new(128, 256);
    capture.open().context("Failed to open capture session")?;
    let mut driver = Driver::new(cli.fade_alpha);
    let mut cycle_rng = SmallRng::seed_from_u64(cli.seed);

    let pb = ProgressBar::new(cli.frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames ({eta} remaining)")
            .unwrap()
            .progress_chars("=>-"),
    );

    driver.start(0.0);
    let dt = 1.0 / cli.fps as f64;
    let mut current_id = cli.effect.clone();

    for frame in 0..cli.frames {
        // Demo-only rotation: a random different effect every 10 seconds
        if cli.cycle && frame > 0 && frame % (cli.fps * 10) == 0 {
            let ids: Vec<String> = registry.ids().iter().map(|s| s.to_string()).collect();
            loop {
                let next = ids[cycle_rng.random_range(0..ids.len())].clone();
                if next != current_id {
                    registry.activate(&next);
                    current_id = next;
                    log::info!("Switched to effect: {}", registry.current_name());
                    break;
                }
            }
        }

        let now = frame as f64 * dt;
        capture.advance(dt as f32);
        driver.tick(now, &mut canvas, &mut capture, &mut registry);

        if let Some(ref dir) = cli.dump_dir {
            let img = image::RgbaImage::from_raw(cli.width, cli.height, canvas.pixels().to_vec())
                .context("Frame buffer did not match surface dimensions")?;
            let path = dir.join(format!("frame_{:05}.png", frame));
            img.save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }

        pb.set_position(frame as u64 + 1);
    }

    driver.stop();
    pb.finish_with_message("Rendering complete");
    log::info!("Done");
    Ok(())
}
