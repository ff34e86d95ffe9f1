use super::Effect;
use crate::audio::AudioFeatures;
use crate::render::draw::Stroke;
use crate::render::{Canvas, Rgba};

/// Glowing polyline of the raw waveform with sparkles on loud samples.
/// Stateless apart from the trait contract; everything derives from the
/// current snapshot and time.
#[derive(Default)]
pub struct Oscilloscope;

impl Effect for Oscilloscope {
    fn name(&self) -> &str {
        "Oscilloscope"
    }

    fn render(&mut self, canvas: &mut Canvas, audio: &AudioFeatures<'_>, time: f32) {
        let wave = audio.waveform();
        if wave.is_empty() {
            return;
        }
        let w = canvas.width() as f32;
        let h = canvas.height() as f32;
        let step = w / wave.len() as f32;

        let points: Vec<(f32, f32)> = wave
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let norm = (s as f32 - 128.0) / 128.0;
                (i as f32 * step, h / 2.0 + norm * 0.4 * h)
            })
            .collect();

        let hue = time * 40.0 + audio.average * 360.0;
        canvas.stroke_polyline(
            &points,
            &Stroke::glowing(Rgba::hsl(hue, 1.0, 0.6), 2.0, 6.0),
        );

        // Sparkle points where the sample swings past half amplitude
        for (i, &s) in wave.iter().enumerate() {
            let norm = (s as f32 - 128.0) / 128.0;
            if norm.abs() > 0.5 {
                let (x, y) = points[i];
                canvas.fill_circle(x, y, 2.5, Rgba::hsl(hue + 40.0, 1.0, 0.85));
            }
        }
    }
}
