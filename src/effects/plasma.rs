use super::Effect;
use crate::audio::AudioFeatures;
use crate::render::{Canvas, Rgba};

/// Four-term sum-of-sines field evaluated at an integer-downscaled
/// resolution, colored through HSL, then bilinearly upscaled to the full
/// surface. Each term's phase or frequency rides a different audio band.
pub struct Plasma {
    low: Option<Canvas>,
    scale: u32,
}

impl Plasma {
    pub fn new(scale: u32) -> Self {
        Self {
            low: None,
            scale: scale.max(1),
        }
    }

    fn low_dims(&self, canvas: &Canvas) -> (u32, u32) {
        (
            (canvas.width() / self.scale).max(1),
            (canvas.height() / self.scale).max(1),
        )
    }
}

impl Effect for Plasma {
    fn name(&self) -> &str {
        "Plasma"
    }

    fn render(&mut self, canvas: &mut Canvas, audio: &AudioFeatures<'_>, time: f32) {
        let (lw, lh) = self.low_dims(canvas);
        let low = self.low.get_or_insert_with(|| Canvas::new(lw, lh));
        low.resize(lw, lh);

        let (cx, cy) = (lw as f32 / 2.0, lh as f32 / 2.0);
        for y in 0..lh {
            for x in 0..lw {
                let xf = x as f32;
                let yf = y as f32;
                let t1 = (xf * 0.12 + time * (1.0 + audio.bass * 2.0)).sin();
                let t2 = (yf * 0.10 - time * 0.8 + audio.mid * 4.0).sin();
                let t3 = ((xf + yf) * 0.07 + time * 0.5 + audio.treble * 5.0).sin();
                let dist = ((xf - cx).powi(2) + (yf - cy).powi(2)).sqrt();
                let t4 = (dist * 0.15 - time * (0.6 + audio.average)).sin();

                // Normalize [-4, 4] to [0, 1]
                let v = (t1 + t2 + t3 + t4 + 4.0) / 8.0;

                let hue = v * 360.0 + time * 15.0;
                let lightness = 0.25 + v * 0.35 + audio.average * 0.15;
                low.set_pixel(x, y, Rgba::hsl(hue, 0.8, lightness));
            }
        }

        canvas.blit_scaled(low, true);
    }

    fn teardown(&mut self) {
        self.low = None;
    }
}
