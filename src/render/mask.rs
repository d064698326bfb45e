use crate::foundation::math::mul_div255_u8;
use crate::render::buffer::PixelBuffer;

/// Clip `buffer` to a rounded rectangle of corner radius `radius` (buffer pixels).
///
/// Pixels outside the corner arcs are scaled by their coverage, which keeps the result
/// premultiplied and gives a one-pixel anti-aliased edge.
pub fn apply_rounded_corners(buffer: &mut PixelBuffer, radius: f64) {
    let (w, h) = (buffer.width(), buffer.height());
    if !radius.is_finite() || radius <= 0.0 || buffer.is_empty() {
        return;
    }
    let r = radius.min(f64::from(w) / 2.0).min(f64::from(h) / 2.0);
    let span = r.ceil() as u32;
    let (wf, hf) = (f64::from(w), f64::from(h));

    let data = buffer.data_mut();
    for y in 0..h {
        let in_top = y < span;
        let in_bottom = y >= h.saturating_sub(span);
        if !in_top && !in_bottom {
            continue;
        }
        for x in 0..w {
            let in_left = x < span;
            let in_right = x >= w.saturating_sub(span);
            if !in_left && !in_right {
                continue;
            }

            let px = f64::from(x) + 0.5;
            let py = f64::from(y) + 0.5;
            let cx = if in_left { r } else { wf - r };
            let cy = if in_top { r } else { hf - r };
            // Only the quadrant beyond the arc center is rounded.
            let outside_x = if in_left { px < cx } else { px > cx };
            let outside_y = if in_top { py < cy } else { py > cy };
            if !(outside_x && outside_y) {
                continue;
            }

            let dist = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
            let coverage = (r - dist + 0.5).clamp(0.0, 1.0);
            if coverage >= 1.0 {
                continue;
            }
            let cov = (coverage * 255.0).round() as u16;
            let i = (y as usize * w as usize + x as usize) * 4;
            for c in &mut data[i..i + 4] {
                *c = mul_div255_u8(u16::from(*c), cov);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/mask.rs"]
mod tests;
