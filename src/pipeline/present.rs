use crate::render::buffer::PixelBuffer;
use crate::render::mask::apply_rounded_corners;

/// Where finished blurred buffers go. Implemented by the host's image view.
pub trait Presenter {
    fn set_image(&mut self, image: PixelBuffer);

    /// Corner radius to clip presented images to, in buffer pixels.
    fn set_corner_radius(&mut self, _radius: f64) {}
}

/// Presenter that keeps the latest image, clipped to its corner radius.
#[derive(Clone, Debug, Default)]
pub struct ImageSlot {
    image: Option<PixelBuffer>,
    corner_radius: f64,
    published: u64,
}

impl ImageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&PixelBuffer> {
        self.image.as_ref()
    }

    pub fn take_image(&mut self) -> Option<PixelBuffer> {
        self.image.take()
    }

    pub fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    /// Number of images presented so far.
    pub fn published(&self) -> u64 {
        self.published
    }
}

impl Presenter for ImageSlot {
    fn set_image(&mut self, mut image: PixelBuffer) {
        apply_rounded_corners(&mut image, self.corner_radius);
        self.image = Some(image);
        self.published += 1;
    }

    fn set_corner_radius(&mut self, radius: f64) {
        self.corner_radius = radius;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/present.rs"]
mod tests;
