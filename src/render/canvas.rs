use super::color::Rgba;

/// CPU-side RGBA8 pixel surface, row-major, tightly packed.
///
/// Every drawing operation takes its full parameter set explicitly; the
/// canvas itself carries no fill/stroke/shadow mode between calls.
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Reallocate the backing buffer for new dimensions.
    /// Contents are undefined (black) afterwards.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0; (width * height * 4) as usize];
    }

    /// Overwrite every pixel, ignoring alpha blending.
    pub fn clear(&mut self, color: Rgba) {
        for px in self.pixels.chunks_exact_mut(4) {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
            px[3] = color.a;
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some(Rgba::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ))
    }

    /// Raw overwrite, no blending. Out-of-bounds writes are dropped.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.index(x, y);
        self.pixels[i] = color.r;
        self.pixels[i + 1] = color.g;
        self.pixels[i + 2] = color.b;
        self.pixels[i + 3] = color.a;
    }

    /// Source-over alpha blend of one pixel. Out-of-bounds writes are dropped.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let i = self.index(x as u32, y as u32);
        let a = color.a as f32 / 255.0;
        let inv = 1.0 - a;
        self.pixels[i] = (color.r as f32 * a + self.pixels[i] as f32 * inv) as u8;
        self.pixels[i + 1] = (color.g as f32 * a + self.pixels[i + 1] as f32 * inv) as u8;
        self.pixels[i + 2] = (color.b as f32 * a + self.pixels[i + 2] as f32 * inv) as u8;
        self.pixels[i + 3] = 255;
    }

    /// Saturating additive blend, alpha-scaled. Used for glow accumulation.
    pub fn add_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let i = self.index(x as u32, y as u32);
        let a = color.a as f32 / 255.0;
        self.pixels[i] = self.pixels[i].saturating_add((color.r as f32 * a) as u8);
        self.pixels[i + 1] = self.pixels[i + 1].saturating_add((color.g as f32 * a) as u8);
        self.pixels[i + 2] = self.pixels[i + 2].saturating_add((color.b as f32 * a) as u8);
        self.pixels[i + 3] = 255;
    }

    /// Alpha-blended axis-aligned rectangle. Clipped to the surface.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w as i32).min(self.width as i32);
        let y1 = (y + h as i32).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color);
            }
        }
    }

    /// Sample at a fractional coordinate with 4-neighbor bilinear weighting.
    /// Coordinates are clamped to the surface; returns channels in 0.0-255.0.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> [f32; 4] {
        if self.width == 0 || self.height == 0 {
            return [0.0; 4];
        }
        let x = x.clamp(0.0, (self.width - 1) as f32);
        let y = y.clamp(0.0, (self.height - 1) as f32);
        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let mut out = [0.0f32; 4];
        let corners = [
            (x0, y0, (1.0 - fx) * (1.0 - fy)),
            (x1, y0, fx * (1.0 - fy)),
            (x0, y1, (1.0 - fx) * fy),
            (x1, y1, fx * fy),
        ];
        for (cx, cy, w) in corners {
            let i = self.index(cx, cy);
            out[0] += self.pixels[i] as f32 * w;
            out[1] += self.pixels[i + 1] as f32 * w;
            out[2] += self.pixels[i + 2] as f32 * w;
            out[3] += self.pixels[i + 3] as f32 * w;
        }
        out
    }

    /// Scale `src` to cover this surface entirely. With `smooth`, samples
    /// bilinearly; otherwise nearest-neighbor.
    pub fn blit_scaled(&mut self, src: &Canvas, smooth: bool) {
        if src.width == 0 || src.height == 0 || self.width == 0 || self.height == 0 {
            return;
        }
        let sx = src.width as f32 / self.width as f32;
        let sy = src.height as f32 / self.height as f32;
        for y in 0..self.height {
            for x in 0..self.width {
                let u = (x as f32 + 0.5) * sx - 0.5;
                let v = (y as f32 + 0.5) * sy - 0.5;
                let c = if smooth {
                    let s = src.sample_bilinear(u, v);
                    Rgba::new(s[0] as u8, s[1] as u8, s[2] as u8, 255)
                } else {
                    src.pixel(
                        (u.round().max(0.0) as u32).min(src.width - 1),
                        (v.round().max(0.0) as u32).min(src.height - 1),
                    )
                    .unwrap_or(super::color::BLACK)
                };
                self.set_pixel(x, y, c);
            }
        }
    }
}
