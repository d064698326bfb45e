use crate::foundation::core::ScreenPoint;
use crate::foundation::error::FrostResult;
use crate::render::buffer::PixelBuffer;

/// Where a tick gets its screen position from.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PositionSource {
    /// Resolve the containment chain every tick.
    #[default]
    Live,
    /// Locked, but no tick has needed the point yet.
    Pending,
    /// Locked to a point captured on first use.
    Locked(ScreenPoint),
}

/// Where a tick gets its blurred source pixels from.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CaptureSource {
    /// Capture and blur every tick.
    #[default]
    Live,
    /// View locked; this whole-surface buffer is already blurred.
    Frozen(PixelBuffer),
    /// View locked, but the buffer failed to capture or was invalidated by a config change.
    /// Ticks use the live path until the view is locked again.
    Stale,
}

/// The two independent freeze optimizations of a blur layer.
#[derive(Clone, Debug, Default)]
pub struct LockController {
    position: PositionSource,
    capture: CaptureSource,
}

impl LockController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position_source(&self) -> &PositionSource {
        &self.position
    }

    pub fn capture_source(&self) -> &CaptureSource {
        &self.capture
    }

    /// Freeze the screen position. The point itself is taken on the next tick that needs one.
    pub fn lock_position(&mut self) {
        if self.position == PositionSource::Live {
            self.position = PositionSource::Pending;
        }
    }

    pub fn unlock_position(&mut self) {
        self.position = PositionSource::Live;
    }

    pub fn is_position_locked(&self) -> bool {
        self.position != PositionSource::Live
    }

    pub fn locked_point(&self) -> Option<ScreenPoint> {
        match self.position {
            PositionSource::Locked(p) => Some(p),
            PositionSource::Live | PositionSource::Pending => None,
        }
    }

    /// Screen point for this tick: live, or the locked one (resolving it on first use).
    pub fn screen_point(&mut self, resolve: impl FnOnce() -> ScreenPoint) -> ScreenPoint {
        match self.position {
            PositionSource::Live => resolve(),
            PositionSource::Locked(p) => p,
            PositionSource::Pending => {
                let p = resolve();
                tracing::trace!(x = p.x, y = p.y, "position locked");
                self.position = PositionSource::Locked(p);
                p
            }
        }
    }

    /// Freeze the source pixels with whatever `capture` produces right now.
    ///
    /// A failed capture still locks the view, but leaves no buffer behind; it is never fatal.
    pub fn lock_view(&mut self, capture: impl FnOnce() -> FrostResult<PixelBuffer>) {
        self.capture = match capture() {
            Ok(buf) => CaptureSource::Frozen(buf),
            Err(err) => {
                tracing::debug!(%err, "view lock capture failed");
                CaptureSource::Stale
            }
        };
    }

    pub fn unlock_view(&mut self) {
        self.capture = CaptureSource::Live;
    }

    pub fn is_view_locked(&self) -> bool {
        !matches!(self.capture, CaptureSource::Live)
    }

    pub fn locked_buffer(&self) -> Option<&PixelBuffer> {
        match &self.capture {
            CaptureSource::Frozen(buf) => Some(buf),
            CaptureSource::Live | CaptureSource::Stale => None,
        }
    }

    /// Drop the frozen buffer after a downscale or radius change. The view stays locked.
    pub fn invalidate_locked_buffer(&mut self) {
        if let CaptureSource::Frozen(_) = self.capture {
            self.capture = CaptureSource::Stale;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/lock.rs"]
mod tests;
