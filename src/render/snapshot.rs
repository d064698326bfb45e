use std::sync::Arc;

use crate::foundation::core::{Affine, Rect};
use crate::foundation::error::{FrostError, FrostResult};
use crate::foundation::math::scaled_len;
use crate::render::buffer::PixelBuffer;
use crate::scene::tree::{NodeId, NodeKind, SurfaceTree};

/// Rasterizes a subtree of a [`SurfaceTree`] into a downscaled pixel buffer.
///
/// This never hides anything on its own. Callers that capture the backdrop of a layer must make
/// that layer transparent for the duration of the call.
#[derive(Clone, Copy, Debug, Default)]
pub struct SurfaceSnapshotter;

impl SurfaceSnapshotter {
    /// Render `root` and everything under it so that `crop` (in `root`'s coordinates) lands on
    /// the buffer origin, scaled by `downscale`.
    ///
    /// The output is `crop.width() * downscale` by `crop.height() * downscale`, truncated.
    #[tracing::instrument(level = "trace", skip(self, tree))]
    pub fn capture(
        &self,
        tree: &SurfaceTree,
        root: NodeId,
        crop: Rect,
        downscale: f64,
    ) -> FrostResult<PixelBuffer> {
        let surface = tree
            .node(root)
            .ok_or_else(|| FrostError::capture_unavailable(format!("{root:?} is gone")))?;
        if surface.width == 0 || surface.height == 0 {
            return Err(FrostError::capture_unavailable(
                "no surface available (width or height = 0)",
            ));
        }
        if !downscale.is_finite() || downscale <= 0.0 {
            return Err(FrostError::capture_unavailable(format!(
                "downscale {downscale} yields no pixels"
            )));
        }

        let width = scaled_len(crop.width(), downscale);
        let height = scaled_len(crop.height(), downscale);
        if width <= 0 || height <= 0 {
            return Err(FrostError::capture_unavailable(format!(
                "capture of {}x{} at downscale {downscale} has no pixels",
                crop.width(),
                crop.height()
            )));
        }
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| FrostError::capture_unavailable("capture width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| FrostError::capture_unavailable("capture height exceeds u16"))?;

        // Scale first, then shift so the crop's top-left maps to (0, 0).
        let base = Affine::translate((-crop.x0 * downscale, -crop.y0 * downscale))
            * Affine::scale(downscale);

        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
        for item in tree.paint_order(root) {
            let node = item.node;
            let (w, h) = (f64::from(node.width), f64::from(node.height));
            if w <= 0.0 || h <= 0.0 {
                continue;
            }

            let place = base * Affine::translate(item.origin);
            // Rect to fill in the node's paint space; images are drawn at their own size and
            // stretched onto the node's box by the transform.
            let mut paint_rect = vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h);
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            match &node.kind {
                NodeKind::Group { fill: None } => continue,
                NodeKind::Group { fill: Some(c) } | NodeKind::Solid(c) => {
                    ctx.set_transform(affine_to_cpu(place));
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c[0], c[1], c[2], c[3]));
                }
                NodeKind::Image(buf) => {
                    if buf.is_empty() {
                        continue;
                    }
                    let (bw, bh) = (f64::from(buf.width()), f64::from(buf.height()));
                    ctx.set_transform(affine_to_cpu(
                        place * Affine::scale_non_uniform(w / bw, h / bh),
                    ));
                    ctx.set_paint(vello_cpu::Image {
                        image: vello_cpu::ImageSource::Pixmap(Arc::new(buf.to_pixmap()?)),
                        sampler: vello_cpu::peniko::ImageSampler::default(),
                    });
                    paint_rect = vello_cpu::kurbo::Rect::new(0.0, 0.0, bw, bh);
                }
            }

            if item.opacity < 1.0 {
                ctx.push_opacity_layer(item.opacity);
            }
            ctx.fill_rect(&paint_rect);
            if item.opacity < 1.0 {
                ctx.pop_layer();
            }
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(PixelBuffer::from_pixmap(&pixmap))
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/snapshot.rs"]
mod tests;
