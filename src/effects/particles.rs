use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::Effect;
use crate::audio::AudioFeatures;
use crate::render::draw::Stroke;
use crate::render::{Canvas, Rgba};

const BURST_SIZE: usize = 50;
const CONNECT_DISTANCE: f32 = 50.0;
const CONNECT_BELOW: usize = 200;
// Rising-edge beat heuristic; constants came from visual tuning
const BEAT_LEVEL: f32 = 0.5;
const BEAT_DELTA: f32 = 0.1;

struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    life: f32,
    hue: f32,
}

/// Bounded pool of aging point particles: gravity eases off with mids,
/// turbulence scales with treble, and a rising bass edge fires a burst.
pub struct Particles {
    pool: Vec<Particle>,
    prev_bass: f32,
    max: usize,
    rng: SmallRng,
}

impl Particles {
    pub fn new(max: usize, seed: u64) -> Self {
        Self {
            pool: Vec::new(),
            prev_bass: 0.0,
            max,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    fn spawn(&mut self, cx: f32, cy: f32, energy: f32, count: usize) {
        for _ in 0..count {
            if self.pool.len() >= self.max {
                return;
            }
            let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
            let speed = 0.5 + self.rng.random::<f32>() * (1.5 + energy * 4.0);
            self.pool.push(Particle {
                x: cx,
                y: cy,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed - 1.0,
                life: 0.6 + self.rng.random::<f32>() * 0.4,
                hue: self.rng.random::<f32>() * 360.0,
            });
        }
    }
}

impl Effect for Particles {
    fn name(&self) -> &str {
        "Particles"
    }

    fn render(&mut self, canvas: &mut Canvas, audio: &AudioFeatures<'_>, time: f32) {
        let w = canvas.width() as f32;
        let h = canvas.height() as f32;
        let (cx, cy) = (w / 2.0, h / 2.0);

        // Continuous low-rate spawning plus a burst on a rising bass edge
        let trickle = 2 + (audio.average * 4.0) as usize;
        self.spawn(cx, cy, audio.average, trickle);
        if audio.bass > BEAT_LEVEL && audio.bass - self.prev_bass > BEAT_DELTA {
            self.spawn(cx, cy, audio.bass, BURST_SIZE);
        }
        self.prev_bass = audio.bass;

        let gravity = 0.12 * (1.0 - audio.mid);
        let turbulence = audio.treble * 1.2;
        for p in &mut self.pool {
            p.vy += gravity;
            p.vx += (self.rng.random::<f32>() - 0.5) * turbulence;
            p.x += p.vx;
            p.y += p.vy;
            p.life -= 0.008;
        }
        self.pool
            .retain(|p| p.life > 0.0 && p.x >= -10.0 && p.x <= w + 10.0 && p.y <= h + 10.0);

        if self.pool.len() < CONNECT_BELOW {
            for i in 0..self.pool.len() {
                for j in (i + 1)..self.pool.len() {
                    let (a, b) = (&self.pool[i], &self.pool[j]);
                    let d2 = (a.x - b.x).powi(2) + (a.y - b.y).powi(2);
                    if d2 < CONNECT_DISTANCE * CONNECT_DISTANCE {
                        let fade = 1.0 - d2.sqrt() / CONNECT_DISTANCE;
                        let alpha = (fade * a.life.min(b.life) * 150.0) as u8;
                        canvas.stroke_polyline(
                            &[(a.x, a.y), (b.x, b.y)],
                            &Stroke::plain(Rgba::hsl(a.hue, 0.8, 0.6).with_alpha(alpha), 1.0),
                        );
                    }
                }
            }
        }

        let hue_drift = time * 10.0;
        for p in &self.pool {
            let color = Rgba::hsl(p.hue + hue_drift, 0.9, 0.6)
                .with_alpha((p.life.clamp(0.0, 1.0) * 255.0) as u8);
            canvas.fill_circle(p.x, p.y, 1.0 + p.life * 2.0, color);
        }
    }

    fn teardown(&mut self) {
        self.pool.clear();
        self.prev_bass = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bass_snapshot(level: f32) -> [u8; 60] {
        let mut bins = [0u8; 60];
        for b in bins.iter_mut().take(6) {
            *b = (level * 255.0) as u8;
        }
        bins
    }

    #[test]
    fn pool_never_exceeds_max() {
        let mut fx = Particles::new(500, 7);
        let mut canvas = Canvas::new(200, 200);
        let bins = [255u8; 60];
        let wave = [255u8; 32];
        for frame in 0..400 {
            let audio = AudioFeatures::extract(&bins, &wave);
            fx.render(&mut canvas, &audio, frame as f32 / 60.0);
            assert!(fx.len() <= 500);
        }
    }

    #[test]
    fn rising_bass_edge_fires_burst() {
        let mut fx = Particles::new(500, 7);
        let mut canvas = Canvas::new(200, 200);

        let low = bass_snapshot(0.2);
        let audio = AudioFeatures::extract(&low, &[]);
        fx.render(&mut canvas, &audio, 0.0);
        let before = fx.len();

        let high = bass_snapshot(0.7);
        let audio = AudioFeatures::extract(&high, &[]);
        fx.render(&mut canvas, &audio, 1.0 / 60.0);
        assert!(fx.len() >= before + BURST_SIZE);
    }

    #[test]
    fn sustained_bass_bursts_only_on_the_edge() {
        let mut fx = Particles::new(500, 7);
        let mut canvas = Canvas::new(200, 200);
        let high = bass_snapshot(0.9);

        let audio = AudioFeatures::extract(&high, &[]);
        fx.render(&mut canvas, &audio, 0.0);
        let after_edge = fx.len();

        let audio = AudioFeatures::extract(&high, &[]);
        fx.render(&mut canvas, &audio, 1.0 / 60.0);
        // Second frame at the same level only trickles
        assert!(fx.len() < after_edge + BURST_SIZE);
    }

    #[test]
    fn teardown_clears_pool() {
        let mut fx = Particles::new(500, 7);
        let mut canvas = Canvas::new(100, 100);
        let bins = bass_snapshot(0.9);
        let audio = AudioFeatures::extract(&bins, &[]);
        fx.render(&mut canvas, &audio, 0.0);
        assert!(!fx.is_empty());
        fx.teardown();
        assert!(fx.is_empty());
        assert_eq!(fx.prev_bass, 0.0);
    }
}
