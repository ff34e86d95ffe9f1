use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::Effect;
use crate::audio::AudioFeatures;
use crate::render::{Canvas, Rgba};

const CELL: u32 = 16;

struct Column {
    head_y: f32,
    speed: f32,
    trail: Vec<u8>,
}

/// Falling glyph columns, one per 16px slot. Fall speed rides the bass,
/// trail cells mutate at a treble-scaled probability, and columns respawn
/// above the surface once fully off the bottom. Glyphs render as shaded
/// cells whose brightness pattern is the character value.
pub struct Matrix {
    columns: Vec<Column>,
    last_width: u32,
    rng: SmallRng,
}

impl Matrix {
    pub fn new(seed: u64) -> Self {
        Self {
            columns: Vec::new(),
            last_width: 0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn spawn_column(rng: &mut SmallRng, height: f32) -> Column {
        let len = rng.random_range(5..25);
        Column {
            head_y: -rng.random::<f32>() * height,
            speed: 2.0 + rng.random::<f32>() * 4.0,
            trail: (0..len).map(|_| rng.random::<u8>()).collect(),
        }
    }
}

impl Effect for Matrix {
    fn name(&self) -> &str {
        "Matrix"
    }

    fn render(&mut self, canvas: &mut Canvas, audio: &AudioFeatures<'_>, _time: f32) {
        let w = canvas.width();
        let h = canvas.height() as f32;
        if w != self.last_width {
            let slots = (w / CELL).max(1) as usize;
            self.columns = (0..slots)
                .map(|_| Self::spawn_column(&mut self.rng, h))
                .collect();
            self.last_width = w;
        }

        let speed_mod = 0.5 + audio.bass * 2.5;
        let mutate_p = audio.treble * 0.3;

        for (slot, col) in self.columns.iter_mut().enumerate() {
            col.head_y += col.speed * speed_mod;

            // Fully off the bottom: restart above the surface
            if col.head_y - col.trail.len() as f32 * CELL as f32 > h {
                *col = Self::spawn_column(&mut self.rng, h);
                continue;
            }

            for ch in col.trail.iter_mut() {
                if self.rng.random::<f32>() < mutate_p {
                    *ch = self.rng.random::<u8>();
                }
            }

            let x = (slot as u32 * CELL) as i32 + 2;
            for (i, &ch) in col.trail.iter().enumerate() {
                let y = col.head_y - i as f32 * CELL as f32;
                if y < -(CELL as f32) || y > h {
                    continue;
                }
                let age = i as f32 / col.trail.len() as f32;
                let color = if i == 0 {
                    // Fresh head glows white-green
                    Rgba::hsl(130.0, 0.5, 0.9)
                } else {
                    let flicker = (ch as f32 / 255.0) * 0.15;
                    Rgba::hsl(120.0, 1.0, (0.55 - age * 0.45 + flicker).clamp(0.05, 0.7))
                        .with_alpha(((1.0 - age) * 255.0) as u8)
                };
                canvas.fill_rect(x, y as i32, CELL - 4, CELL - 4, color);
            }
        }
    }

    fn teardown(&mut self) {
        self.columns.clear();
        self.last_width = 0;
    }
}
