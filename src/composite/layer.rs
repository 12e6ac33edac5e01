use kurbo::{Line, Point};

use crate::foundation::math::unit_to_channel;

/// Straight RGBA colour stop, channels in 0..=1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GradientStop {
    pub offset: f32,
    pub rgba: [f32; 4],
}

/// Sample a stop list at `t`, interpolating in premultiplied space.
///
/// Values before the first stop or after the last one repeat the end colour.
/// Returns premultiplied RGBA.
pub(crate) fn sample_gradient(stops: &[GradientStop], t: f32) -> [f32; 4] {
    let premul = |s: &GradientStop| {
        let a = s.rgba[3];
        [s.rgba[0] * a, s.rgba[1] * a, s.rgba[2] * a, a]
    };
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return [0.0; 4];
    };
    if t <= first.offset {
        return premul(first);
    }
    if t >= last.offset {
        return premul(last);
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t >= a.offset && t <= b.offset {
            let span = b.offset - a.offset;
            let u = if span <= 0.0 { 1.0 } else { (t - a.offset) / span };
            let (pa, pb) = (premul(a), premul(b));
            let mut out = [0.0; 4];
            for c in 0..4 {
                out[c] = pa[c] + (pb[c] - pa[c]) * u;
            }
            return out;
        }
    }
    premul(last)
}

/// Offscreen premultiplied RGBA surface used to build effect layers before compositing.
#[derive(Clone, Debug)]
pub(crate) struct Layer {
    width: u32,
    height: u32,
    px: Vec<[f32; 4]>,
}

impl Layer {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            px: vec![[0.0; 4]; (width as usize) * (height as usize)],
        }
    }

    /// Source-over one straight colour at `alpha` onto pixel `(x, y)`.
    fn paint(&mut self, x: u32, y: u32, rgb: [f32; 3], alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        let d = &mut self.px[idx];
        let inv = 1.0 - alpha;
        for c in 0..3 {
            d[c] = rgb[c] * alpha + d[c] * inv;
        }
        d[3] = alpha + d[3] * inv;
    }

    /// Pixel range `[lo, hi)` covering `[min, max]` in continuous coordinates.
    fn span(min: f64, max: f64, limit: u32) -> (u32, u32) {
        let lo = min.floor().max(0.0) as u32;
        let hi = (max.ceil().max(0.0) as u32).min(limit);
        (lo.min(limit), hi)
    }

    /// Disc of `radius` whose alpha falls linearly from `alpha` at the centre to 0 at the rim.
    pub(crate) fn fill_radial(&mut self, center: Point, radius: f64, rgb: [f32; 3], alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        let (x0, x1) = Self::span(center.x - radius, center.x + radius, self.width);
        let (y0, y1) = Self::span(center.y - radius, center.y + radius, self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let t = p.distance(center) / radius;
                if t >= 1.0 {
                    continue;
                }
                self.paint(x, y, rgb, alpha * (1.0 - t as f32));
            }
        }
    }

    /// Axis-aligned rectangle with fractional edges weighted by pixel coverage.
    pub(crate) fn fill_rect(
        &mut self,
        origin: Point,
        width: f64,
        height: f64,
        rgb: [f32; 3],
        alpha: f32,
    ) {
        let (xa, xb) = (origin.x, origin.x + width);
        let (ya, yb) = (origin.y, origin.y + height);
        let (x0, x1) = Self::span(xa, xb, self.width);
        let (y0, y1) = Self::span(ya, yb, self.height);
        for y in y0..y1 {
            let fy = f64::from(y);
            let cov_y = (yb.min(fy + 1.0) - ya.max(fy)).clamp(0.0, 1.0);
            for x in x0..x1 {
                let fx = f64::from(x);
                let cov_x = (xb.min(fx + 1.0) - xa.max(fx)).clamp(0.0, 1.0);
                self.paint(x, y, rgb, alpha * (cov_x * cov_y) as f32);
            }
        }
    }

    /// Butt-capped stroke of `width` along `line`, antialiased over one pixel.
    pub(crate) fn stroke_line(&mut self, line: Line, width: f64, rgb: [f32; 3], alpha: f32) {
        let half = width / 2.0;
        // Strokes thinner than a pixel paint a 1px core at reduced alpha.
        let (reach, thin) = if width < 1.0 {
            (0.5, width as f32)
        } else {
            (half, 1.0)
        };
        let pad = reach + 1.0;
        let (x0, x1) = Self::span(
            line.p0.x.min(line.p1.x) - pad,
            line.p0.x.max(line.p1.x) + pad,
            self.width,
        );
        let (y0, y1) = Self::span(
            line.p0.y.min(line.p1.y) - pad,
            line.p0.y.max(line.p1.y) + pad,
            self.height,
        );

        let dir = line.p1 - line.p0;
        let len2 = dir.hypot2();
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let u = if len2 <= 0.0 {
                    0.0
                } else {
                    (p - line.p0).dot(dir) / len2
                };
                if !(0.0..=1.0).contains(&u) {
                    continue;
                }
                let dist = p.distance(line.p0 + dir * u);
                let cov = (reach + 0.5 - dist).clamp(0.0, 1.0) as f32;
                if cov > 0.0 {
                    self.paint(x, y, rgb, alpha * cov * thin);
                }
            }
        }
    }

    /// Overwrite every pixel with `f(pixel centre)`, which returns premultiplied RGBA.
    pub(crate) fn fill_with(&mut self, f: impl Fn(Point) -> [f32; 4]) {
        let w = self.width as usize;
        for (idx, px) in self.px.iter_mut().enumerate() {
            let p = Point::new((idx % w) as f64 + 0.5, (idx / w) as f64 + 0.5);
            *px = f(p);
        }
    }

    /// Quantize to premultiplied RGBA8.
    pub(crate) fn to_premul_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.px.len() * 4);
        for px in &self.px {
            let a = unit_to_channel(px[3]);
            for &c in &px[..3] {
                // Quantization must not leave colour above alpha in premultiplied form.
                out.push(unit_to_channel(c).min(a));
            }
            out.push(a);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/layer.rs"]
mod tests;
