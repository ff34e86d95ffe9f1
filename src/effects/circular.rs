use super::Effect;
use crate::audio::AudioFeatures;
use crate::render::draw::Stroke;
use crate::render::{Canvas, Rgba};

const POINTS: usize = 128;
const LAYERS: usize = 3;

/// Three concentric 128-point radial polygons whose spikes follow the
/// spectrum and whose rotation speeds up with bass.
#[derive(Default)]
pub struct Circular {
    rotation: f32,
}

impl Effect for Circular {
    fn name(&self) -> &str {
        "Circular"
    }

    fn render(&mut self, canvas: &mut Canvas, audio: &AudioFeatures<'_>, time: f32) {
        let bins = audio.frequency_bins();
        let w = canvas.width() as f32;
        let h = canvas.height() as f32;
        let (cx, cy) = (w / 2.0, h / 2.0);
        let unit = w.min(h);

        self.rotation += 0.005 + audio.bass * 0.05;

        for layer in 0..LAYERS {
            let base = unit * (0.12 + 0.09 * layer as f32);
            let max_spike = unit * 0.12;
            let direction = if layer % 2 == 0 { 1.0 } else { -1.0 };
            let angle0 = self.rotation * direction;

            let mut pts = Vec::with_capacity(POINTS + 1);
            for i in 0..POINTS {
                let value = if bins.is_empty() {
                    0.0
                } else {
                    // Each layer reads a rotated slice of the spectrum
                    let idx = (i * bins.len() / POINTS + layer * bins.len() / LAYERS)
                        % bins.len();
                    bins[idx] as f32 / 255.0
                };
                let radius = base + value * max_spike;
                let a = angle0 + i as f32 / POINTS as f32 * std::f32::consts::TAU;
                pts.push((cx + a.cos() * radius, cy + a.sin() * radius));
            }
            pts.push(pts[0]); // close the polygon

            let hue = time * 30.0 + layer as f32 * 120.0;
            canvas.stroke_polyline(
                &pts,
                &Stroke::glowing(Rgba::hsl(hue, 0.9, 0.55), 1.5, 4.0),
            );
        }
    }

    fn teardown(&mut self) {
        self.rotation = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_accelerates_with_bass() {
        let mut fx = Circular::default();
        let mut canvas = Canvas::new(64, 64);

        let audio = AudioFeatures::silent();
        fx.render(&mut canvas, &audio, 0.0);
        let idle_step = fx.rotation;

        fx.teardown();
        let mut bins = [0u8; 60];
        for b in bins.iter_mut().take(6) {
            *b = 255;
        }
        let audio = AudioFeatures::extract(&bins, &[]);
        fx.render(&mut canvas, &audio, 0.0);
        assert!(fx.rotation > idle_step);
    }

    #[test]
    fn empty_bins_render_degenerate_rings() {
        let mut fx = Circular::default();
        let mut canvas = Canvas::new(48, 48);
        fx.render(&mut canvas, &AudioFeatures::silent(), 1.0);
        // Rings at base radius still get painted
        assert!(canvas.pixels().iter().any(|&b| b > 0));
    }

    #[test]
    fn teardown_resets_rotation() {
        let mut fx = Circular::default();
        let mut canvas = Canvas::new(32, 32);
        fx.render(&mut canvas, &AudioFeatures::silent(), 0.0);
        fx.teardown();
        assert_eq!(fx.rotation, 0.0);
    }
}
