use crate::foundation::core::Rgba8;
use crate::foundation::error::{FrostError, FrostResult};

/// A `width x height` block of premultiplied RGBA8 pixels, tightly packed, row-major.
///
/// Buffers are moved stage to stage through the pipeline; nothing holds on to one across ticks
/// except a view lock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; byte_len(width, height)],
        }
    }

    /// Buffer filled with one straight-alpha color.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        let px = premultiply(color);
        Self {
            width,
            height,
            data: px.repeat(width as usize * height as usize),
        }
    }

    /// Wrap already-premultiplied bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> FrostResult<Self> {
        if data.len() != byte_len(width, height) {
            return Err(FrostError::evaluation(format!(
                "pixel buffer expects {}x{}x4 bytes, got {}",
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Premultiply straight-alpha RGBA8 bytes (e.g. a decoded PNG).
    pub fn from_straight_rgba8(width: u32, height: u32, data: &[u8]) -> FrostResult<Self> {
        if data.len() != byte_len(width, height) {
            return Err(FrostError::evaluation(format!(
                "straight rgba8 image expects {}x{}x4 bytes, got {}",
                width,
                height,
                data.len()
            )));
        }
        let mut out = Vec::with_capacity(data.len());
        for px in data.chunks_exact(4) {
            out.extend_from_slice(&premultiply([px[0], px[1], px[2], px[3]]));
        }
        Ok(Self {
            width,
            height,
            data: out,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Copy out the `width x height` window whose top-left is `(x, y)`.
    ///
    /// A window that does not fit inside the buffer is a [`FrostError::CaptureUnavailable`]; the
    /// pipeline skips the frame rather than presenting a partially transparent crop.
    pub fn crop(&self, x: i64, y: i64, width: u32, height: u32) -> FrostResult<Self> {
        if x < 0
            || y < 0
            || x + i64::from(width) > i64::from(self.width)
            || y + i64::from(height) > i64::from(self.height)
        {
            return Err(FrostError::capture_unavailable(format!(
                "crop {width}x{height} at ({x},{y}) exceeds {}x{} buffer",
                self.width, self.height
            )));
        }

        let (x, y) = (x as usize, y as usize);
        let src_stride = self.width as usize * 4;
        let row_bytes = width as usize * 4;
        let mut data = Vec::with_capacity(row_bytes * height as usize);
        for row in y..y + height as usize {
            let start = row * src_stride + x * 4;
            data.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Un-premultiply into straight RGBA8, for image encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let a = px[3];
            if a == 0 {
                out.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            let unpremul = |c: u8| -> u8 {
                let v = (u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a);
                v.min(255) as u8
            };
            out.extend_from_slice(&[unpremul(px[0]), unpremul(px[1]), unpremul(px[2]), a]);
        }
        out
    }

    pub(crate) fn to_pixmap(&self) -> FrostResult<vello_cpu::Pixmap> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| FrostError::evaluation("image width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| FrostError::evaluation("image height exceeds u16"))?;

        let mut may_have_opacities = false;
        let mut pixels = Vec::with_capacity(self.width as usize * self.height as usize);
        for px in self.data.chunks_exact(4) {
            let a = px[3];
            may_have_opacities |= a != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a,
            });
        }

        Ok(vello_cpu::Pixmap::from_parts_with_opacity(
            pixels,
            w,
            h,
            may_have_opacities,
        ))
    }

    pub(crate) fn from_pixmap(pixmap: &vello_cpu::Pixmap) -> Self {
        Self {
            width: u32::from(pixmap.width()),
            height: u32::from(pixmap.height()),
            data: pixmap.data_as_u8_slice().to_vec(),
        }
    }
}

pub(crate) fn premultiply([r, g, b, a]: Rgba8) -> [u8; 4] {
    fn premul(c: u8, a: u8) -> u8 {
        let c = u16::from(c);
        let a = u16::from(a);
        (((c * a) + 127) / 255) as u8
    }
    [premul(r, a), premul(g, a), premul(b, a), a]
}

fn byte_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

#[cfg(test)]
#[path = "../../tests/unit/render/buffer.rs"]
mod tests;
