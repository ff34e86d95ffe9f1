use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::Effect;
use crate::audio::AudioFeatures;
use crate::render::{Canvas, Rgba};

// Warp mode rotation: by timer, or early on a rising bass edge
const MODE_INTERVAL: f32 = 8.0;
const MODE_MIN_HOLD: f32 = 1.0;
const BEAT_LEVEL: f32 = 0.5;
const BEAT_DELTA: f32 = 0.1;
const DECAY: f32 = 0.99;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarpMode {
    SpiralZoom,
    WavyTunnel,
    FlowingStreams,
    Kaleidoscope,
    GentleSwirl,
}

const MODES: [WarpMode; 5] = [
    WarpMode::SpiralZoom,
    WarpMode::WavyTunnel,
    WarpMode::FlowingStreams,
    WarpMode::Kaleidoscope,
    WarpMode::GentleSwirl,
];

struct FeedbackState {
    // Two scale-reduced buffers alternating current/next roles each frame
    bufs: [Canvas; 2],
    current: usize,
    // Per-pixel inverse-mapped source coordinates
    warp: Vec<(f32, f32)>,
    width: u32,
    height: u32,
}

/// Warp-resample-accumulate feedback loop: waveform glow strokes are drawn
/// into the current buffer, the next buffer is produced by sampling the
/// current one at each pixel's inverse-mapped warp coordinate (bilinear,
/// with uniform decay and a subtle RGB channel rotation), roles swap, and
/// the result is blitted up to the full surface.
pub struct Geiss {
    state: Option<FeedbackState>,
    mode: WarpMode,
    last_switch: f32,
    prev_bass: f32,
    scale: u32,
    rng: SmallRng,
}

impl Geiss {
    pub fn new(scale: u32, seed: u64) -> Self {
        Self {
            state: None,
            mode: WarpMode::SpiralZoom,
            last_switch: 0.0,
            prev_bass: 0.0,
            scale: scale.max(1),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Which buffer currently holds the accumulated image. Flips exactly
    /// once per rendered frame.
    pub fn current_index(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.current)
    }

    pub fn mode(&self) -> WarpMode {
        self.mode
    }

    fn ensure_state(&mut self, canvas: &Canvas) {
        let lw = (canvas.width() / self.scale).max(1);
        let lh = (canvas.height() / self.scale).max(1);
        let stale = match &self.state {
            Some(s) => s.width != lw || s.height != lh,
            None => true,
        };
        if stale {
            self.state = Some(FeedbackState {
                bufs: [Canvas::new(lw, lh), Canvas::new(lw, lh)],
                current: 0,
                warp: compute_warp(self.mode, lw, lh),
                width: lw,
                height: lh,
            });
        }
    }

    fn maybe_switch_mode(&mut self, bass: f32, time: f32) {
        let elapsed = time - self.last_switch;
        let beat = bass > BEAT_LEVEL && bass - self.prev_bass > BEAT_DELTA;
        if elapsed >= MODE_INTERVAL || (beat && elapsed >= MODE_MIN_HOLD) {
            let mut next = self.mode;
            while next == self.mode {
                next = MODES[self.rng.random_range(0..MODES.len())];
            }
            self.mode = next;
            self.last_switch = time;
            if let Some(s) = &mut self.state {
                s.warp = compute_warp(next, s.width, s.height);
            }
            log::debug!("warp mode -> {:?}", next);
        }
        self.prev_bass = bass;
    }
}

impl Effect for Geiss {
    fn name(&self) -> &str {
        "Geiss"
    }

    fn render(&mut self, canvas: &mut Canvas, audio: &AudioFeatures<'_>, time: f32) {
        self.ensure_state(canvas);
        self.maybe_switch_mode(audio.bass, time);
        let Some(state) = self.state.as_mut() else {
            return;
        };

        // New waveform energy goes into the current buffer additively
        draw_wave_strokes(
            &mut state.bufs[state.current],
            audio.waveform(),
            time,
            audio.average,
        );

        // Inverse-map resample current -> next with decay and a subtle
        // channel rotation that keeps colors slowly drifting
        let (cur, next) = split_pair(&mut state.bufs, state.current);
        let lw = state.width;
        for y in 0..state.height {
            for x in 0..lw {
                let (sx, sy) = state.warp[(y * lw + x) as usize];
                let s = cur.sample_bilinear(sx, sy);
                let r = (s[0] * 0.97 + s[1] * 0.03) * DECAY;
                let g = (s[1] * 0.97 + s[2] * 0.03) * DECAY;
                let b = (s[2] * 0.97 + s[0] * 0.03) * DECAY;
                next.set_pixel(x, y, Rgba::opaque(r as u8, g as u8, b as u8));
            }
        }

        state.current = 1 - state.current;
        canvas.blit_scaled(&state.bufs[state.current], true);
    }

    fn teardown(&mut self) {
        self.state = None;
        self.mode = WarpMode::SpiralZoom;
        self.last_switch = 0.0;
        self.prev_bass = 0.0;
    }
}

fn split_pair(bufs: &mut [Canvas; 2], current: usize) -> (&Canvas, &mut Canvas) {
    let (a, b) = bufs.split_at_mut(1);
    if current == 0 {
        (&a[0], &mut b[0])
    } else {
        (&b[0], &mut a[0])
    }
}

fn draw_wave_strokes(buf: &mut Canvas, wave: &[u8], time: f32, average: f32) {
    if wave.is_empty() {
        return;
    }
    let w = buf.width() as f32;
    let h = buf.height() as f32;
    let hue = time * 25.0 + average * 300.0;
    let color = Rgba::hsl(hue, 1.0, 0.6).with_alpha(150);
    let halo = Rgba::hsl(hue, 1.0, 0.5).with_alpha(50);

    let mut prev: Option<(f32, f32)> = None;
    for (i, &s) in wave.iter().enumerate() {
        let x = i as f32 / wave.len() as f32 * w;
        let y = h / 2.0 + (s as f32 - 128.0) / 128.0 * 0.35 * h;
        if let Some((px, py)) = prev {
            let steps = ((x - px).abs().max((y - py).abs()).ceil() as usize).max(1);
            for k in 0..=steps {
                let t = k as f32 / steps as f32;
                let ix = (px + (x - px) * t).round() as i32;
                let iy = (py + (y - py) * t).round() as i32;
                buf.add_pixel(ix, iy, color);
                buf.add_pixel(ix + 1, iy, halo);
                buf.add_pixel(ix - 1, iy, halo);
                buf.add_pixel(ix, iy + 1, halo);
                buf.add_pixel(ix, iy - 1, halo);
            }
        }
        prev = Some((x, y));
    }
}

fn compute_warp(mode: WarpMode, width: u32, height: u32) -> Vec<(f32, f32)> {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let max_x = (width - 1) as f32;
    let max_y = (height - 1) as f32;
    let mut map = Vec::with_capacity((width * height) as usize);

    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let r = (dx * dx + dy * dy).sqrt();
            let a = dy.atan2(dx);

            let (sx, sy) = match mode {
                WarpMode::SpiralZoom => {
                    // Sample slightly inward and rotated: outward spiral flow
                    let r2 = r * 0.985;
                    let a2 = a + 0.03 + r * 0.002;
                    (cx + a2.cos() * r2, cy + a2.sin() * r2)
                }
                WarpMode::WavyTunnel => {
                    // Sample outward with a radius-rippled twist: inward rush
                    let r2 = r + 1.2;
                    let a2 = a + (r * 0.15).sin() * 0.04;
                    (cx + a2.cos() * r2, cy + a2.sin() * r2)
                }
                WarpMode::FlowingStreams => {
                    (x as f32 - 1.5, y as f32 + (x as f32 * 0.08).sin() * 1.5)
                }
                WarpMode::Kaleidoscope => {
                    let sector = std::f32::consts::TAU / 6.0;
                    let folded = (a.rem_euclid(sector * 2.0) - sector).abs();
                    let r2 = r * 0.99;
                    (cx + folded.cos() * r2, cy + folded.sin() * r2)
                }
                WarpMode::GentleSwirl => {
                    let a2 = a + 0.015 * (r * 0.05).sin() + 0.008;
                    let r2 = r * 0.997;
                    (cx + a2.cos() * r2, cy + a2.sin() * r2)
                }
            };

            map.push((sx.clamp(0.0, max_x), sy.clamp(0.0, max_y)));
        }
    }
    map
}
