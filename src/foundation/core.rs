use crate::foundation::error::{FrostError, FrostResult};
use crate::foundation::math::scaled_len;

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Straight-alpha RGBA8 color, as authored in scenes and layer fills.
pub type Rgba8 = [u8; 4];

/// Offset of a region's origin relative to the root surface, in root-surface pixels.
pub type ScreenPoint = Point;

/// On-screen rectangle of a blurred layer in root-surface pixel units.
///
/// Position is floating point so that deep containment chains do not accumulate rounding drift;
/// size is whole pixels, as laid out by the host.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Region {
    /// Region of `width x height` pixels with its origin at `origin`.
    pub fn at(origin: ScreenPoint, width: u32, height: u32) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> ScreenPoint {
        Point::new(self.x, self.y)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.x + f64::from(self.width),
            self.y + f64::from(self.height),
        )
    }

    /// Size of this region after downscaling, in whole buffer pixels.
    ///
    /// Fails with [`FrostError::CaptureUnavailable`] when either side truncates to zero.
    pub fn scaled_size(&self, downscale: f64) -> FrostResult<(u32, u32)> {
        let w = scaled_len(f64::from(self.width), downscale);
        let h = scaled_len(f64::from(self.height), downscale);
        if w <= 0 || h <= 0 {
            return Err(FrostError::capture_unavailable(format!(
                "{}x{} at downscale {downscale} has no pixels",
                self.width, self.height
            )));
        }
        let w = u32::try_from(w).map_err(|_| FrostError::capture_unavailable("width overflow"))?;
        let h = u32::try_from(h).map_err(|_| FrostError::capture_unavailable("height overflow"))?;
        Ok((w, h))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
