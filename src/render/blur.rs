use std::sync::Arc;

use crate::foundation::core::Rect;
use crate::foundation::error::{FrostError, FrostResult};
use crate::render::buffer::PixelBuffer;
use crate::render::snapshot::SurfaceSnapshotter;
use crate::scene::tree::{NodeId, SurfaceTree};

/// Largest radius accepted by the blur primitive; larger requests are clamped.
pub const MAX_BLUR_RADIUS: u32 = 25;

/// Boundary to whatever actually performs the convolution.
///
/// Implementations must return a buffer with the same dimensions as the input.
pub trait BlurFacade {
    fn blur(&self, buffer: PixelBuffer, radius: u32) -> FrostResult<PixelBuffer>;
}

/// Separable Gaussian blur on the CPU, fixed-point Q16 weights.
#[derive(Clone, Copy, Debug, Default)]
pub struct GaussianBlur;

impl GaussianBlur {
    /// Sigma used for a given radius: half the radius, never below half a pixel.
    pub fn sigma_for(radius: u32) -> f32 {
        (radius as f32 / 2.0).max(0.5)
    }
}

impl BlurFacade for GaussianBlur {
    fn blur(&self, buffer: PixelBuffer, radius: u32) -> FrostResult<PixelBuffer> {
        let radius = radius.min(MAX_BLUR_RADIUS);
        if radius == 0 || buffer.is_empty() {
            return Ok(buffer);
        }
        let kernel = Kernel::gaussian(radius, Self::sigma_for(radius));
        let size = (buffer.width() as usize, buffer.height() as usize);
        let mut scratch = vec![0u8; buffer.data().len()];
        convolve(buffer.data(), &mut scratch, size, &kernel, Axis::Horizontal);
        let mut out = buffer;
        convolve(&scratch, out.data_mut(), size, &kernel, Axis::Vertical);
        Ok(out)
    }
}

/// Explicit handle to a blur facade.
///
/// There is no process-wide instance: whoever needs blurring is handed a `BlurKit`. A kit built
/// with [`BlurKit::uninit`] fails every call with [`FrostError::FacadeUninitialized`], and the
/// pipeline refuses it at construction time.
#[derive(Clone, Default)]
pub struct BlurKit {
    facade: Option<Arc<dyn BlurFacade>>,
}

impl std::fmt::Debug for BlurKit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlurKit")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl BlurKit {
    pub fn init(facade: impl BlurFacade + 'static) -> Self {
        Self {
            facade: Some(Arc::new(facade)),
        }
    }

    /// Kit backed by [`GaussianBlur`].
    pub fn cpu() -> Self {
        Self::init(GaussianBlur)
    }

    pub fn uninit() -> Self {
        Self { facade: None }
    }

    pub fn is_initialized(&self) -> bool {
        self.facade.is_some()
    }

    pub fn blur(&self, buffer: PixelBuffer, radius: u32) -> FrostResult<PixelBuffer> {
        let facade = self.facade.as_ref().ok_or(FrostError::FacadeUninitialized)?;
        let (w, h) = (buffer.width(), buffer.height());
        let out = facade.blur(buffer, radius)?;
        if (out.width(), out.height()) != (w, h) {
            return Err(FrostError::evaluation(format!(
                "blur facade changed buffer size from {w}x{h} to {}x{}",
                out.width(),
                out.height()
            )));
        }
        Ok(out)
    }

    /// Rasterize `node` and its subtree at full resolution, then blur it.
    pub fn blur_node(
        &self,
        tree: &SurfaceTree,
        node: NodeId,
        radius: u32,
    ) -> FrostResult<PixelBuffer> {
        self.fast_blur_node(tree, node, radius, 1.0)
    }

    /// Rasterize `node` and its subtree downscaled by `downscale`, then blur it.
    pub fn fast_blur_node(
        &self,
        tree: &SurfaceTree,
        node: NodeId,
        radius: u32,
        downscale: f64,
    ) -> FrostResult<PixelBuffer> {
        if !self.is_initialized() {
            return Err(FrostError::FacadeUninitialized);
        }
        let n = tree
            .node(node)
            .ok_or_else(|| FrostError::validation(format!("{node:?} is not in the tree")))?;
        let crop = Rect::new(0.0, 0.0, f64::from(n.width), f64::from(n.height));
        let snapshot = SurfaceSnapshotter.capture(tree, node, crop, downscale)?;
        self.blur(snapshot, radius)
    }
}

/// Gaussian taps in Q16 fixed point, summing to exactly one.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Kernel {
    taps: Vec<u32>,
}

impl Kernel {
    const ONE: u32 = 1 << 16;

    fn gaussian(radius: u32, sigma: f32) -> Self {
        let r = radius as i32;
        let two_sigma_sq = 2.0 * f64::from(sigma) * f64::from(sigma);
        let raw: Vec<f64> = (-r..=r)
            .map(|i| (-f64::from(i * i) / two_sigma_sq).exp())
            .collect();
        let total: f64 = raw.iter().sum();

        let mut taps: Vec<u32> = raw
            .iter()
            .map(|w| (w / total * f64::from(Self::ONE)).round() as u32)
            .collect();
        // The center tap absorbs the rounding residue.
        let quantized: u32 = taps.iter().sum();
        let center = &mut taps[radius as usize];
        *center = (*center + Self::ONE).saturating_sub(quantized);
        Self { taps }
    }

    fn radius(&self) -> usize {
        self.taps.len() / 2
    }
}

#[derive(Clone, Copy, Debug)]
enum Axis {
    Horizontal,
    Vertical,
}

/// One 1D pass over every row or column of a premultiplied RGBA8 image, clamping samples to the
/// edge of the line.
fn convolve(
    src: &[u8],
    dst: &mut [u8],
    (width, height): (usize, usize),
    kernel: &Kernel,
    axis: Axis,
) {
    let (lines, len, line_stride, step) = match axis {
        Axis::Horizontal => (height, width, width, 1),
        Axis::Vertical => (width, height, 1, width),
    };
    let r = kernel.radius();
    for line in 0..lines {
        let base = line * line_stride;
        for i in 0..len {
            let mut acc = [0u64; 4];
            for (k, &tap) in kernel.taps.iter().enumerate() {
                let j = (i + k).saturating_sub(r).min(len - 1);
                let at = (base + j * step) * 4;
                for (a, &v) in acc.iter_mut().zip(&src[at..at + 4]) {
                    *a += u64::from(tap) * u64::from(v);
                }
            }
            let at = (base + i * step) * 4;
            for (d, a) in dst[at..at + 4].iter_mut().zip(acc) {
                *d = ((a + u64::from(Kernel::ONE / 2)) >> 16).min(255) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
