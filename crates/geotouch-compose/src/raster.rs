//! Minimal rasterizer for overlay layers.
//!
//! Pixel centres sit at integer coordinates, matching the sampling convention
//! of the warp functions in `geotouch-core`.

use geotouch_core::Layer;
use nalgebra::Point2;

/// Fill a simple polygon with the even-odd rule.
pub fn fill_polygon(layer: &mut Layer, polygon: &[Point2<f32>], rgb: [u8; 3]) {
    let n = polygon.len();
    if n < 3 {
        return;
    }

    let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
    for p in polygon {
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    let y0 = min_y.ceil().max(0.0) as i64;
    let y1 = max_y.floor().min(layer.height as f32 - 1.0) as i64;

    let mut xs: Vec<f32> = Vec::with_capacity(n);
    for y in y0..=y1 {
        let yf = y as f32;
        xs.clear();
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (polygon[i], polygon[j]);
            if (a.y > yf) != (b.y > yf) {
                xs.push(a.x + (yf - a.y) * (b.x - a.x) / (b.y - a.y));
            }
            j = i;
        }
        xs.sort_by(|a, b| a.total_cmp(b));
        for span in xs.chunks_exact(2) {
            let x0 = span[0].ceil() as i64;
            let x1 = span[1].floor() as i64;
            for x in x0.max(0)..=x1.min(layer.width as i64 - 1) {
                layer.put(x, y, rgb);
            }
        }
    }
}

/// Solid disc of the given radius.
pub fn fill_disc(layer: &mut Layer, center: Point2<f32>, radius: f32, rgb: [u8; 3]) {
    if !(center.x.is_finite() && center.y.is_finite()) || radius < 0.0 {
        return;
    }
    let r2 = radius * radius;
    let x0 = (center.x - radius).floor() as i64;
    let x1 = (center.x + radius).ceil() as i64;
    let y0 = (center.y - radius).floor() as i64;
    let y1 = (center.y + radius).ceil() as i64;
    for y in y0.max(0)..=y1.min(layer.height as i64 - 1) {
        for x in x0.max(0)..=x1.min(layer.width as i64 - 1) {
            let dx = x as f32 - center.x;
            let dy = y as f32 - center.y;
            if dx * dx + dy * dy <= r2 {
                layer.put(x, y, rgb);
            }
        }
    }
}

/// Liang-Barsky: the part of segment `a`-`b` inside `[min, max]`, or `None`.
fn clip_segment(
    a: Point2<f32>,
    b: Point2<f32>,
    min: Point2<f32>,
    max: Point2<f32>,
) -> Option<(Point2<f32>, Point2<f32>)> {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (dx, dy) = (b.x as f64 - ax, b.y as f64 - ay);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

    for (p, q) in [
        (-dx, ax - min.x as f64),
        (dx, max.x as f64 - ax),
        (-dy, ay - min.y as f64),
        (dy, max.y as f64 - ay),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f64| Point2::new((ax + t * dx) as f32, (ay + t * dy) as f32);
    Some((at(t0), at(t1)))
}

/// Line segment of the given thickness (round caps). The segment is clipped
/// to the layer first, so far-away endpoints cost nothing extra.
pub fn draw_line(
    layer: &mut Layer,
    a: Point2<f32>,
    b: Point2<f32>,
    thickness: f32,
    rgb: [u8; 3],
) {
    if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
        return;
    }
    let pad = thickness.max(1.0);
    let min = Point2::new(-pad, -pad);
    let max = Point2::new(layer.width as f32 + pad, layer.height as f32 + pad);
    let Some((a, b)) = clip_segment(a, b, min, max) else {
        return;
    };
    let len = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
    let steps = len.ceil().max(1.0) as usize;
    let radius = (thickness * 0.5).max(0.5);
    for s in 0..=steps {
        let t = s as f32 / steps as f32;
        let p = Point2::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
        if radius <= 0.5 {
            layer.put(p.x.round() as i64, p.y.round() as i64, rgb);
        } else {
            fill_disc(layer, p, radius, rgb);
        }
    }
}

/// Connected line strip; `closed` adds the last-to-first edge.
pub fn draw_polyline(
    layer: &mut Layer,
    points: &[Point2<f32>],
    closed: bool,
    thickness: f32,
    rgb: [u8; 3],
) {
    for w in points.windows(2) {
        draw_line(layer, w[0], w[1], thickness, rgb);
    }
    if closed && points.len() > 2 {
        draw_line(layer, points[points.len() - 1], points[0], thickness, rgb);
    }
}

/// Axis-aligned rectangle `[x, x + w) x [y, y + h)`.
pub fn fill_rect(layer: &mut Layer, x: i64, y: i64, w: i64, h: i64, rgb: [u8; 3]) {
    for yy in y.max(0)..(y + h).min(layer.height as i64) {
        for xx in x.max(0)..(x + w).min(layer.width as i64) {
            layer.put(xx, yy, rgb);
        }
    }
}

/// Rectangle outline `border` pixels wide, drawn inside the rectangle.
pub fn stroke_rect(layer: &mut Layer, x: i64, y: i64, w: i64, h: i64, border: i64, rgb: [u8; 3]) {
    let b = border.max(1).min(w.min(h));
    fill_rect(layer, x, y, w, b, rgb);
    fill_rect(layer, x, y + h - b, w, b, rgb);
    fill_rect(layer, x, y, b, h, rgb);
    fill_rect(layer, x + w - b, y, b, h, rgb);
}
