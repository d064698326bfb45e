/// Slack added before truncating a scaled length, so that products like `250.0 * 0.1` that land a
/// hair under an integer in binary floating point do not lose a whole pixel.
pub(crate) const SCALE_EPSILON: f64 = 1e-6;

/// Scale a length in source pixels by `factor` and truncate to whole buffer pixels.
///
/// This is the single truncation rule used for every buffer dimension and buffer index, so that
/// capture sizes, crop offsets and output sizes always agree with each other.
pub(crate) fn scaled_len(len: f64, factor: f64) -> i64 {
    let v = len * factor;
    if !v.is_finite() {
        return 0;
    }
    (v + SCALE_EPSILON).floor() as i64
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
