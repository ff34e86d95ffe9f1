use super::Effect;
use crate::audio::AudioFeatures;
use crate::render::{Canvas, Rgba};

const BAR_COUNT: usize = 64;
const PEAK_DECAY: f32 = 0.98;

/// Mirrored frequency bars around a center line with decaying peak caps.
///
/// Bars sample the bin sequence at `floor((i/64)^1.5 * 0.5N)` so the low
/// end gets more horizontal resolution than the high end.
pub struct Spectrum {
    peaks: [f32; BAR_COUNT],
}

impl Default for Spectrum {
    fn default() -> Self {
        Self { peaks: [0.0; BAR_COUNT] }
    }
}

impl Spectrum {
    fn bar_value(bins: &[u8], i: usize) -> f32 {
        if bins.is_empty() {
            return 0.0;
        }
        let frac = (i as f32 / BAR_COUNT as f32).powf(1.5);
        let idx = ((frac * 0.5 * bins.len() as f32) as usize).min(bins.len() - 1);
        bins[idx] as f32 / 255.0
    }

    #[cfg(test)]
    pub(crate) fn peaks(&self) -> &[f32; BAR_COUNT] {
        &self.peaks
    }
}

impl Effect for Spectrum {
    fn name(&self) -> &str {
        "Spectrum"
    }

    fn render(&mut self, canvas: &mut Canvas, audio: &AudioFeatures<'_>, time: f32) {
        let bins = audio.frequency_bins();
        let w = canvas.width() as f32;
        let h = canvas.height() as f32;
        let center = h / 2.0;
        let bar_w = w / BAR_COUNT as f32;
        let half_range = h * 0.45;

        for i in 0..BAR_COUNT {
            let value = Self::bar_value(bins, i);
            self.peaks[i] = (self.peaks[i] * PEAK_DECAY).max(value);

            let half = value * half_range;
            let hue = time * 20.0 + i as f32 * 3.0;
            let x = (i as f32 * bar_w) as i32 + 1;
            let bw = (bar_w - 2.0).max(1.0) as u32;

            // Zero-height bars paint nothing, so silence stays dark
            canvas.fill_rect(
                x,
                (center - half) as i32,
                bw,
                (half * 2.0) as u32,
                Rgba::hsl(hue, 0.9, 0.3 + value * 0.3),
            );

            // Bright caps ride the decaying peak above and below
            let peak = self.peaks[i] * half_range;
            if peak >= 1.0 {
                let cap = Rgba::hsl(hue, 1.0, 0.8);
                canvas.fill_rect(x, (center - peak) as i32 - 2, bw, 2, cap);
                canvas.fill_rect(x, (center + peak) as i32, bw, 2, cap);
            }
        }
    }

    fn teardown(&mut self) {
        self.peaks = [0.0; BAR_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_keeps_peaks_at_zero() {
        let mut fx = Spectrum::default();
        let mut canvas = Canvas::new(800, 600);
        let audio = AudioFeatures::silent();
        fx.render(&mut canvas, &audio, 0.0);
        assert!(fx.peaks().iter().all(|&p| p == 0.0));
    }

    #[test]
    fn peaks_track_then_decay() {
        let mut fx = Spectrum::default();
        let mut canvas = Canvas::new(128, 64);
        let hot = [255u8; 64];
        let audio = AudioFeatures::extract(&hot, &[]);
        fx.render(&mut canvas, &audio, 0.0);
        assert!(fx.peaks().iter().all(|&p| p == 1.0));

        let cold = [0u8; 64];
        let audio = AudioFeatures::extract(&cold, &[]);
        fx.render(&mut canvas, &audio, 0.1);
        assert!(fx.peaks().iter().all(|&p| (p - PEAK_DECAY).abs() < 1e-6));
    }

    #[test]
    fn teardown_resets_peaks() {
        let mut fx = Spectrum::default();
        let mut canvas = Canvas::new(64, 64);
        let hot = [200u8; 32];
        let audio = AudioFeatures::extract(&hot, &[]);
        fx.render(&mut canvas, &audio, 0.0);
        fx.teardown();
        assert!(fx.peaks().iter().all(|&p| p == 0.0));
    }

    #[test]
    fn low_bars_sample_low_bins() {
        let mut bins = [0u8; 64];
        bins[0] = 255;
        assert_eq!(Spectrum::bar_value(&bins, 0), 1.0);
        assert_eq!(Spectrum::bar_value(&bins, 63), 0.0);
        assert_eq!(Spectrum::bar_value(&[], 10), 0.0);
    }
}
