//! Image filters used to render glow.
//!
//! Both filters are separable and operate on premultiplied channels using
//! integer arithmetic, so the results are bit-exact across runs. Pixels
//! outside the surface are treated as transparent.
use rgb::RGBA8;

use crate::Surface;

/// The number of box blur passes approximating a Gaussian blur.
const BLUR_PASSES: usize = 3;

/// Replace each pixel with the per-channel maximum over a square window of
/// `(2 * radius + 1)²` pixels.
pub fn dilate(surface: &mut Surface, radius: usize) {
    // Wider windows cover every line anyway
    let radius = radius.min(max_extent(surface));
    if radius == 0 {
        return;
    }
    separable(surface, |src, dst| dilate_line(src, dst, radius));
}

/// Apply a Gaussian-like blur with the standard deviation `sigma` (in pixels).
///
/// `sigma` is clamped to the larger dimension of the surface.
pub fn blur(surface: &mut Surface, sigma: f32) {
    let sigma = sigma.min(max_extent(surface) as f32);
    for radius in box_radii(sigma).iter().cloned() {
        if radius > 0 {
            separable(surface, |src, dst| box_blur_line(src, dst, radius));
        }
    }
}

/// Compute the radii of the box filters approximating a Gaussian blur.
///
/// <http://www.peterkovesi.com/papers/FastGaussianSmoothing.pdf>
fn box_radii(sigma: f32) -> [usize; BLUR_PASSES] {
    if !(sigma > 0.0) {
        return [0; BLUR_PASSES];
    }

    let n = BLUR_PASSES as f32;
    let w_ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut wl = w_ideal.floor() as i64;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wl = wl.max(1);
    let wu = wl + 2;

    let wlf = wl as f32;
    let m_ideal = (12.0 * sigma * sigma - n * wlf * wlf - 4.0 * n * wlf - 3.0 * n)
        / (-4.0 * wlf - 4.0);
    let m = m_ideal.round().max(0.0) as usize;

    let mut radii = [0; BLUR_PASSES];
    for (i, r) in radii.iter_mut().enumerate() {
        let w = if i < m { wl } else { wu };
        *r = ((w - 1) / 2) as usize;
    }
    radii
}

fn max_extent(surface: &Surface) -> usize {
    let [width, height] = surface.size();
    width.max(height)
}

/// Apply a 1D filter horizontally and then vertically.
fn separable(surface: &mut Surface, mut filter: impl FnMut(&[RGBA8], &mut [RGBA8])) {
    let [width, height] = surface.size();
    if width == 0 || height == 0 {
        return;
    }

    let mut line_in = Vec::with_capacity(width.max(height));
    let mut line_out = Vec::with_capacity(width.max(height));

    {
        let pixels = surface.pixels_mut();
        for row in pixels.chunks_exact_mut(width) {
            line_in.clear();
            line_in.extend_from_slice(row);
            filter(&line_in, row);
        }
    }

    let pixels = surface.pixels_mut();
    for x in 0..width {
        line_in.clear();
        line_in.extend((0..height).map(|y| pixels[x + y * width]));
        line_out.clear();
        line_out.resize(height, RGBA8::new(0, 0, 0, 0));

        filter(&line_in, &mut line_out);

        for (y, p) in line_out.iter().enumerate() {
            pixels[x + y * width] = *p;
        }
    }
}

#[inline]
fn channels(p: RGBA8) -> [u32; 4] {
    [p.r as u32, p.g as u32, p.b as u32, p.a as u32]
}

fn dilate_line(src: &[RGBA8], dst: &mut [RGBA8], radius: usize) {
    let len = src.len();
    for (i, d) in dst.iter_mut().enumerate() {
        let start = i.saturating_sub(radius);
        let end = i.saturating_add(radius).saturating_add(1).min(len);
        *d = src[start..end].iter().fold(RGBA8::new(0, 0, 0, 0), |m, p| {
            RGBA8::new(m.r.max(p.r), m.g.max(p.g), m.b.max(p.b), m.a.max(p.a))
        });
    }
}

fn box_blur_line(src: &[RGBA8], dst: &mut [RGBA8], radius: usize) {
    let len = src.len();
    let window = (2 * radius + 1) as u32;
    let at = |i: isize| -> [u32; 4] {
        if i >= 0 && (i as usize) < len {
            channels(src[i as usize])
        } else {
            [0; 4]
        }
    };

    // The running sum of the window centered at the current pixel
    let mut sum = [0u32; 4];
    for i in -(radius as isize)..=(radius as isize) {
        let c = at(i);
        for k in 0..4 {
            sum[k] += c[k];
        }
    }

    for (i, d) in dst.iter_mut().enumerate() {
        let avg = |k: usize| ((sum[k] + window / 2) / window) as u8;
        *d = RGBA8::new(avg(0), avg(1), avg(2), avg(3));

        let leaving = at(i as isize - radius as isize);
        let entering = at(i as isize + radius as isize + 1);
        for k in 0..4 {
            sum[k] = sum[k] + entering[k] - leaving[k];
        }
    }
}
