use crate::foundation::error::{FrostError, FrostResult};

pub const DEFAULT_DOWNSCALE_FACTOR: f64 = 0.12;
pub const DEFAULT_BLUR_RADIUS: u32 = 12;
pub const DEFAULT_FPS: u32 = 60;
pub const DEFAULT_CORNER_RADIUS: f64 = 0.0;

/// Tunables of a blur layer. Every field can change at runtime and takes effect on the next tick.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    /// Factor in `(0, 1]` applied to capture dimensions before blurring.
    pub downscale_factor: f64,
    /// Blur radius in downscaled pixels.
    pub blur_radius: u32,
    /// Refresh ticks per second. `0` disables the refresh loop.
    pub fps: u32,
    /// Corner radius of the presented image, in layer pixels.
    pub corner_radius: f64,
    /// Opacity the layer is restored to after each capture. `None` means fully opaque.
    pub alpha: Option<f32>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            downscale_factor: DEFAULT_DOWNSCALE_FACTOR,
            blur_radius: DEFAULT_BLUR_RADIUS,
            fps: DEFAULT_FPS,
            corner_radius: DEFAULT_CORNER_RADIUS,
            alpha: None,
        }
    }
}

impl CaptureConfig {
    pub fn validate(&self) -> FrostResult<()> {
        validate_downscale(self.downscale_factor)?;
        validate_corner_radius(self.corner_radius)?;
        validate_alpha(self.alpha)?;
        Ok(())
    }

    /// Opacity of the layer outside of captures.
    pub fn resting_opacity(&self) -> f32 {
        self.alpha.unwrap_or(1.0)
    }
}

pub(crate) fn validate_downscale(v: f64) -> FrostResult<()> {
    if !v.is_finite() || v <= 0.0 || v > 1.0 {
        return Err(FrostError::validation(format!(
            "downscale_factor must be in (0, 1], got {v}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_corner_radius(v: f64) -> FrostResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(FrostError::validation(format!(
            "corner_radius must be finite and >= 0, got {v}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_alpha(v: Option<f32>) -> FrostResult<()> {
    match v {
        Some(a) if !a.is_finite() || !(0.0..=1.0).contains(&a) => Err(FrostError::validation(
            format!("alpha must be in [0, 1], got {a}"),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;
