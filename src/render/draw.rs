//! Stroke and fill primitives over [`Canvas`].
//!
//! Each call carries its complete parameter set; glow is approximated on the
//! CPU by widening passes of decreasing alpha around the core stroke.

use super::canvas::Canvas;
use super::color::Rgba;

/// Parameters for one stroked path.
#[derive(Clone, Copy, Debug)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
    pub glow: Option<Glow>,
}

/// Blur-radius + color emphasis around a stroke.
#[derive(Clone, Copy, Debug)]
pub struct Glow {
    pub radius: f32,
    pub color: Rgba,
}

impl Stroke {
    pub fn plain(color: Rgba, width: f32) -> Self {
        Self { color, width, glow: None }
    }

    pub fn glowing(color: Rgba, width: f32, radius: f32) -> Self {
        Self {
            color,
            width,
            glow: Some(Glow { radius, color }),
        }
    }
}

/// One stop of a gradient ramp; `offset` in 0.0-1.0, ascending.
#[derive(Clone, Copy, Debug)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

fn ramp(stops: &[GradientStop], t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    match stops {
        [] => super::color::BLACK,
        [only] => only.color,
        _ => {
            if t <= stops[0].offset {
                return stops[0].color;
            }
            for pair in stops.windows(2) {
                if t <= pair[1].offset {
                    let span = (pair[1].offset - pair[0].offset).max(1e-6);
                    let local = (t - pair[0].offset) / span;
                    return pair[0].color.lerp(pair[1].color, local);
                }
            }
            stops[stops.len() - 1].color
        }
    }
}

impl Canvas {
    /// Stamp a filled disc with alpha blending.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let r2 = radius * radius;
        let x0 = (cx - radius).floor() as i32;
        let x1 = (cx + radius).ceil() as i32;
        let y0 = (cy - radius).floor() as i32;
        let y1 = (cy + radius).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, stroke: &Stroke) {
        self.stroke_arc(cx, cy, radius, 0.0, std::f32::consts::TAU, stroke);
    }

    /// Arc from `a0` to `a1` radians, flattened to a polyline.
    pub fn stroke_arc(&mut self, cx: f32, cy: f32, radius: f32, a0: f32, a1: f32, stroke: &Stroke) {
        if radius <= 0.0 {
            return;
        }
        let span = (a1 - a0).abs();
        let steps = ((span * radius / 2.0) as usize).clamp(8, 256);
        let pts: Vec<(f32, f32)> = (0..=steps)
            .map(|i| {
                let a = a0 + (a1 - a0) * i as f32 / steps as f32;
                (cx + a.cos() * radius, cy + a.sin() * radius)
            })
            .collect();
        self.stroke_polyline(&pts, stroke);
    }

    /// Stroke connected segments. The glow layer (if any) is painted first
    /// as two widening low-alpha passes, then the core stroke on top.
    pub fn stroke_polyline(&mut self, points: &[(f32, f32)], stroke: &Stroke) {
        if points.len() < 2 {
            return;
        }
        if let Some(glow) = stroke.glow {
            for (spread, alpha) in [(glow.radius, 28u8), (glow.radius * 0.5, 56u8)] {
                let pass = Stroke::plain(
                    glow.color.with_alpha(alpha.min(glow.color.a)),
                    stroke.width + spread * 2.0,
                );
                self.stroke_polyline_core(points, &pass);
            }
        }
        self.stroke_polyline_core(points, &Stroke::plain(stroke.color, stroke.width));
    }

    fn stroke_polyline_core(&mut self, points: &[(f32, f32)], stroke: &Stroke) {
        for seg in points.windows(2) {
            self.stroke_segment(seg[0], seg[1], stroke.color, stroke.width);
        }
    }

    fn stroke_segment(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba, width: f32) {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let len = (dx * dx + dy * dy).sqrt();
        let half = (width / 2.0).max(0.5);
        let steps = (len / half.max(0.75)).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = from.0 + dx * t;
            let y = from.1 + dy * t;
            if half <= 0.75 {
                self.blend_pixel(x.round() as i32, y.round() as i32, color);
            } else {
                self.fill_circle(x, y, half, color);
            }
        }
    }

    /// Axis-aligned rectangle filled with a vertical or horizontal ramp.
    pub fn fill_rect_gradient(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        vertical: bool,
        stops: &[GradientStop],
    ) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w as i32).min(self.width() as i32);
        let y1 = (y + h as i32).min(self.height() as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                let t = if vertical {
                    (py - y) as f32 / h.max(1) as f32
                } else {
                    (px - x) as f32 / w.max(1) as f32
                };
                self.blend_pixel(px, py, ramp(stops, t));
            }
        }
    }

    /// Disc filled with a radial ramp, stop 0 at the center.
    pub fn fill_circle_gradient(&mut self, cx: f32, cy: f32, radius: f32, stops: &[GradientStop]) {
        if radius <= 0.0 {
            return;
        }
        let r2 = radius * radius;
        let x0 = (cx - radius).floor() as i32;
        let x1 = (cx + radius).ceil() as i32;
        let y0 = (cy - radius).floor() as i32;
        let y1 = (cy + radius).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let d2 = dx * dx + dy * dy;
                if d2 <= r2 {
                    let t = (d2.sqrt()) / radius;
                    self.blend_pixel(x, y, ramp(stops, t));
                }
            }
        }
    }
}
