use std::collections::VecDeque;

use super::Effect;
use crate::audio::AudioFeatures;
use crate::render::draw::Stroke;
use crate::render::{Canvas, Rgba};

const PROFILE_POINTS: usize = 64;

/// Scrolling pseudo-3D landscape built purely from stacked 2D polylines.
///
/// Every frame pushes a height profile sampled from the spectrum into a
/// bounded ring; each row renders at a screen position interpolated between
/// ground (newest) and horizon (oldest) by its age fraction, with hue,
/// saturation, and alpha all fading by age. No true 3D projection.
pub struct Terrain {
    history: VecDeque<Vec<f32>>,
    depth: usize,
}

impl Terrain {
    pub fn new(depth: usize) -> Self {
        Self {
            history: VecDeque::new(),
            depth: depth.max(1),
        }
    }

    fn sample_profile(bins: &[u8]) -> Vec<f32> {
        (0..PROFILE_POINTS)
            .map(|i| {
                if bins.is_empty() {
                    0.0
                } else {
                    let idx = i * bins.len() / PROFILE_POINTS;
                    bins[idx] as f32 / 255.0
                }
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl Effect for Terrain {
    fn name(&self) -> &str {
        "Terrain"
    }

    fn render(&mut self, canvas: &mut Canvas, audio: &AudioFeatures<'_>, time: f32) {
        self.history.push_front(Self::sample_profile(audio.frequency_bins()));
        while self.history.len() > self.depth {
            self.history.pop_back();
        }

        let w = canvas.width() as f32;
        let h = canvas.height() as f32;
        let cx = w / 2.0;
        let horizon = h * 0.35;
        let ground = h * 0.95;
        let amplitude = h * 0.25;

        // Oldest first so newer rows paint over them
        for (idx, profile) in self.history.iter().enumerate().rev() {
            let age = idx as f32 / self.depth as f32;
            let row_y = ground + (horizon - ground) * age;
            // Rows narrow toward the horizon
            let row_w = w * (0.35 + 0.65 * (1.0 - age));

            let pts: Vec<(f32, f32)> = profile
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let fx = i as f32 / (PROFILE_POINTS - 1) as f32 - 0.5;
                    (cx + fx * row_w, row_y - v * amplitude * (1.0 - age))
                })
                .collect();

            let hue = time * 10.0 + age * 120.0;
            let color = Rgba::hsl(hue, 0.9 * (1.0 - age * 0.6), 0.55)
                .with_alpha(((1.0 - age) * 220.0) as u8);
            canvas.stroke_polyline(&pts, &Stroke::plain(color, 1.0));
        }
    }

    fn teardown(&mut self) {
        self.history.clear();
    }
}
