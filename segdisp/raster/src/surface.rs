use itertools::izip;
use rgb::RGBA8;
use std::{
    cmp::{max, min},
    fmt,
};

/// An owned RGBA8 pixel buffer with premultiplied alpha.
///
/// Pixels are stored row by row without padding, i.e., the pixel at `(x, y)`
/// is located at `pixels()[x + y * width]`.
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    size: [usize; 2],
    pixels: Vec<RGBA8>,
}

impl Surface {
    /// Construct a transparent `Surface` of the specified size.
    pub fn new(size: [usize; 2]) -> Self {
        let len = size[0].checked_mul(size[1]).expect("overflow");
        Self {
            size,
            pixels: vec![RGBA8::new(0, 0, 0, 0); len],
        }
    }

    pub fn size(&self) -> [usize; 2] {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size[0]
    }

    pub fn height(&self) -> usize {
        self.size[1]
    }

    pub fn pixels(&self) -> &[RGBA8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [RGBA8] {
        &mut self.pixels
    }

    /// Get the premultiplied color value of the pixel at `(x, y)`.
    ///
    /// Panics if the point is outside the surface.
    pub fn pixel(&self, x: usize, y: usize) -> RGBA8 {
        assert!(x < self.size[0] && y < self.size[1]);
        self.pixels[x + y * self.size[0]]
    }

    /// Get a row of pixels.
    pub fn row(&self, y: usize) -> &[RGBA8] {
        &self.pixels[y * self.size[0]..][..self.size[0]]
    }

    /// Return `true` if every pixel is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.pixels.iter().all(|p| p.a == 0)
    }

    /// Fill the whole surface with a non-premultiplied color.
    pub fn clear(&mut self, color: RGBA8) {
        let color = premultiply(color);
        for p in self.pixels.iter_mut() {
            *p = color;
        }
    }

    /// Draw `src` over `self` (Porter-Duff "over") with its top-left corner
    /// placed at `offset`. The parts of `src` outside `self` are discarded.
    pub fn draw_surface(&mut self, src: &Surface, offset: [isize; 2]) {
        let [dst_w, dst_h] = [self.size[0] as isize, self.size[1] as isize];
        let [src_w, src_h] = [src.size[0] as isize, src.size[1] as isize];

        // Clipped rectangle in the destination space
        let x0 = max(offset[0], 0);
        let y0 = max(offset[1], 0);
        let x1 = min(offset[0].saturating_add(src_w), dst_w);
        let y1 = min(offset[1].saturating_add(src_h), dst_h);

        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let src_x0 = (x0 - offset[0]) as usize;
        let width = (x1 - x0) as usize;

        for y in y0..y1 {
            let src_y = (y - offset[1]) as usize;
            let src_row = &src.pixels[src_y * src.size[0] + src_x0..][..width];
            let dst_row = &mut self.pixels[y as usize * self.size[0] + x0 as usize..][..width];

            for (d, s) in izip!(dst_row, src_row) {
                blend_over(d, *s);
            }
        }
    }

    /// Paint `color` (non-premultiplied) over `self` modulated by a coverage
    /// mask of the same size as `self`. Coverage values are clamped to
    /// `[0, 1]`.
    pub fn fill_coverage(&mut self, coverage: &[f32], color: RGBA8) {
        assert_eq!(coverage.len(), self.pixels.len());

        let alpha = color.a as f32 / 255.0;
        let rgb = [color.r as f32, color.g as f32, color.b as f32];

        for (d, &cov) in izip!(self.pixels.iter_mut(), coverage) {
            if !(cov > 0.0) {
                continue;
            }
            let a = cov.min(1.0) * alpha;
            let s = RGBA8::new(
                quantize(rgb[0] * a),
                quantize(rgb[1] * a),
                quantize(rgb[2] * a),
                quantize(255.0 * a),
            );
            blend_over(d, s);
        }
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Surface")
            .field("size", &self.size)
            .finish()
    }
}

#[inline]
fn quantize(x: f32) -> u8 {
    (x + 0.5) as u8
}

/// Convert a non-premultiplied color to a premultiplied one.
pub fn premultiply(c: RGBA8) -> RGBA8 {
    let a = c.a as u32;
    let mul = |x: u8| ((x as u32 * a + 127) / 255) as u8;
    RGBA8::new(mul(c.r), mul(c.g), mul(c.b), c.a)
}

/// Blend a premultiplied color over another one.
#[inline]
pub fn blend_over(d: &mut RGBA8, s: RGBA8) {
    // Map the alpha value from `0..=255` to `0..=256`
    let alpha = s.a as u32 + s.a as u32 / 128;
    let inv = 256 - alpha;
    let f = |s: u8, d: u8| min(s as u32 + d as u32 * inv / 256, 255) as u8;
    *d = RGBA8::new(f(s.r, d.r), f(s.g, d.g), f(s.b, d.b), f(s.a, d.a));
}
