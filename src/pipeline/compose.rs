use crate::foundation::core::{Point, Rect, Region};
use crate::foundation::error::{FrostError, FrostResult};
use crate::foundation::math::scaled_len;
use crate::pipeline::config::CaptureConfig;
use crate::render::blur::BlurKit;
use crate::render::buffer::PixelBuffer;
use crate::render::snapshot::SurfaceSnapshotter;
use crate::scene::tree::{NodeId, SurfaceTree};

/// Padding actually added on each side of a capture, in source pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Geometry of one padded capture: what to rasterize and where to cut the result back out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapturePlan {
    /// Padded rectangle in root-surface pixels.
    pub capture: Rect,
    /// Padding requested on each axis before clamping (`width / 8`, `height / 8`).
    pub nominal_x: f64,
    pub nominal_y: f64,
    /// Padding that survived clamping against the surface bounds.
    pub applied: Margins,
    /// Top-left of the unpadded region inside the downscaled capture.
    pub crop_x: i64,
    pub crop_y: i64,
    /// Final blurred output size.
    pub output_width: u32,
    pub output_height: u32,
}

impl CapturePlan {
    /// Lay out a padded capture of `region` on a `surface_width x surface_height` surface.
    ///
    /// Each side is padded independently. A side whose margin would leave the surface keeps
    /// only the part that fits (possibly zero), and the crop removes exactly that applied
    /// margin, so clamping never shifts the output.
    pub fn new(
        region: &Region,
        surface_width: u32,
        surface_height: u32,
        downscale: f64,
    ) -> FrostResult<Self> {
        let (output_width, output_height) = region.scaled_size(downscale)?;

        let (w, h) = (f64::from(region.width), f64::from(region.height));
        let (sw, sh) = (f64::from(surface_width), f64::from(surface_height));
        let nominal_x = f64::from(region.width / 8);
        let nominal_y = f64::from(region.height / 8);

        let applied = Margins {
            left: nominal_x.min(region.x).max(0.0),
            top: nominal_y.min(region.y).max(0.0),
            right: nominal_x.min(sw - (region.x + w)).max(0.0),
            bottom: nominal_y.min(sh - (region.y + h)).max(0.0),
        };

        let capture = Rect::new(
            region.x - applied.left,
            region.y - applied.top,
            region.x + w + applied.right,
            region.y + h + applied.bottom,
        );

        Ok(Self {
            capture,
            nominal_x,
            nominal_y,
            applied,
            crop_x: scaled_len(applied.left, downscale),
            crop_y: scaled_len(applied.top, downscale),
            output_width,
            output_height,
        })
    }
}

/// Padding-aware capture: snapshot a padded window, blur it, cut the padding back off.
#[derive(Clone, Debug)]
pub struct PaddedCaptureCompositor {
    kit: BlurKit,
    snapshotter: SurfaceSnapshotter,
}

impl PaddedCaptureCompositor {
    /// Fails with [`FrostError::FacadeUninitialized`] if `kit` cannot blur.
    pub fn new(kit: BlurKit) -> FrostResult<Self> {
        if !kit.is_initialized() {
            return Err(FrostError::FacadeUninitialized);
        }
        Ok(Self {
            kit,
            snapshotter: SurfaceSnapshotter,
        })
    }

    pub fn kit(&self) -> &BlurKit {
        &self.kit
    }

    /// Blurred backdrop for `region`, whose origin is the screen point in effect this tick.
    ///
    /// Recoverable failures come back as `Ok(None)`; anything else is a real error.
    pub fn compose_blur(
        &self,
        tree: &SurfaceTree,
        root: NodeId,
        region: &Region,
        config: &CaptureConfig,
    ) -> FrostResult<Option<PixelBuffer>> {
        match self.try_compose_blur(tree, root, region, config) {
            Ok(buf) => Ok(Some(buf)),
            Err(err) if err.is_recoverable() => {
                tracing::debug!(%err, "padded capture skipped");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    #[tracing::instrument(level = "debug", skip(self, tree))]
    pub fn try_compose_blur(
        &self,
        tree: &SurfaceTree,
        root: NodeId,
        region: &Region,
        config: &CaptureConfig,
    ) -> FrostResult<PixelBuffer> {
        let surface = tree
            .node(root)
            .ok_or_else(|| FrostError::capture_unavailable(format!("{root:?} is gone")))?;
        let plan = CapturePlan::new(
            region,
            surface.width,
            surface.height,
            config.downscale_factor,
        )?;

        let captured =
            self.snapshotter
                .capture(tree, root, plan.capture, config.downscale_factor)?;
        let blurred = self.kit.blur(captured, config.blur_radius)?;
        // Truncating the padded size can come out one pixel short of margin + region.
        let crop_x = plan
            .crop_x
            .min(i64::from(blurred.width()) - i64::from(plan.output_width));
        let crop_y = plan
            .crop_y
            .min(i64::from(blurred.height()) - i64::from(plan.output_height));
        blurred.crop(crop_x, crop_y, plan.output_width, plan.output_height)
    }

    /// Blurred capture of the whole root surface, as used for a view lock.
    #[tracing::instrument(level = "debug", skip(self, tree))]
    pub fn capture_surface(
        &self,
        tree: &SurfaceTree,
        root: NodeId,
        config: &CaptureConfig,
    ) -> FrostResult<PixelBuffer> {
        let surface = tree
            .node(root)
            .ok_or_else(|| FrostError::capture_unavailable(format!("{root:?} is gone")))?;
        let whole = Region::at(Point::ZERO, surface.width, surface.height);
        self.try_compose_blur(tree, root, &whole, config)
    }

    /// Cut `region` out of an already blurred whole-surface buffer. Nothing is re-blurred.
    pub fn crop_locked(
        &self,
        locked: &PixelBuffer,
        region: &Region,
        config: &CaptureConfig,
    ) -> FrostResult<PixelBuffer> {
        let (w, h) = region.scaled_size(config.downscale_factor)?;
        locked.crop(
            scaled_len(region.x, config.downscale_factor),
            scaled_len(region.y, config.downscale_factor),
            w,
            h,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/compose.rs"]
mod tests;
