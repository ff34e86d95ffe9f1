use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::Effect;
use crate::audio::AudioFeatures;
use crate::render::{Canvas, Rgba};

const MAX_DEPTH: f32 = 32.0;
// Low-pass rate for easing flight speed toward the bass target
const SPEED_LERP: f32 = 0.1;

struct Star {
    x: f32,
    y: f32,
    z: f32,
}

/// Perspective-projected starfield flying toward the viewer at a speed that
/// eases toward a bass-driven target. Star space is dimension-independent;
/// only the projection touches canvas size.
pub struct Starfield {
    stars: Vec<Star>,
    speed: f32,
    count: usize,
    rng: SmallRng,
}

impl Starfield {
    pub fn new(count: usize, seed: u64) -> Self {
        Self {
            stars: Vec::new(),
            speed: 0.0,
            count,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn respawn(rng: &mut SmallRng, near: f32, far: f32) -> Star {
        Star {
            x: rng.random::<f32>() * 2.0 - 1.0,
            y: rng.random::<f32>() * 2.0 - 1.0,
            z: near + rng.random::<f32>() * (far - near),
        }
    }

    #[cfg(test)]
    pub(crate) fn star_count(&self) -> usize {
        self.stars.len()
    }

    #[cfg(test)]
    pub(crate) fn speed(&self) -> f32 {
        self.speed
    }
}

impl Effect for Starfield {
    fn name(&self) -> &str {
        "Starfield"
    }

    fn render(&mut self, canvas: &mut Canvas, audio: &AudioFeatures<'_>, _time: f32) {
        if self.stars.is_empty() {
            self.stars = (0..self.count)
                .map(|_| Self::respawn(&mut self.rng, 1.0, MAX_DEPTH))
                .collect();
        }

        let target = 0.05 + audio.bass * 0.8;
        self.speed += (target - self.speed) * SPEED_LERP;

        for star in &mut self.stars {
            star.z -= self.speed;
            if star.z <= 1.0 {
                *star = Self::respawn(&mut self.rng, MAX_DEPTH * 0.5, MAX_DEPTH);
            }
        }

        // Back-to-front so near stars paint over far ones
        let mut order: Vec<usize> = (0..self.stars.len()).collect();
        order.sort_by(|&a, &b| {
            self.stars[b]
                .z
                .partial_cmp(&self.stars[a].z)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let w = canvas.width() as f32;
        let h = canvas.height() as f32;
        let (cx, cy) = (w / 2.0, h / 2.0);
        let focal = w.min(h);

        for &i in &order {
            let star = &self.stars[i];
            let sx = star.x / star.z * focal + cx;
            let sy = star.y / star.z * focal + cy;
            let depth = 1.0 - star.z / MAX_DEPTH;
            let size = 0.5 + depth * 2.5;
            let lum = 0.3 + depth * 0.6;
            canvas.fill_circle(sx, sy, size, Rgba::hsl(220.0, 0.2, lum));
        }
    }

    fn teardown(&mut self) {
        self.stars.clear();
        self.speed = 0.0;
    }
}
