use crate::foundation::core::Region;
use crate::foundation::error::{FrostError, FrostResult};
use crate::pipeline::compose::PaddedCaptureCompositor;
use crate::pipeline::config::{
    CaptureConfig, validate_alpha, validate_corner_radius, validate_downscale,
};
use crate::pipeline::lock::LockController;
use crate::pipeline::present::{ImageSlot, Presenter};
use crate::pipeline::refresh::{FrameScheduler, RefreshLoop};
use crate::render::blur::BlurKit;
use crate::scene::position::{ScreenPositionResolver, SurfaceHandle};
use crate::scene::tree::{NodeId, SurfaceTree};

/// A node of the surface tree that shows a blurred copy of whatever is painted behind it.
///
/// The host owns the tree and the frame scheduler and passes them in; the layer owns its
/// configuration, locks, refresh loop and presenter.
#[derive(Debug)]
pub struct BlurLayer<P: Presenter = ImageSlot> {
    node: NodeId,
    surface: SurfaceHandle,
    resolver: ScreenPositionResolver,
    config: CaptureConfig,
    locks: LockController,
    compositor: PaddedCaptureCompositor,
    refresh: RefreshLoop,
    attached: bool,
    redraw_requested: bool,
    presenter: P,
}

impl BlurLayer<ImageSlot> {
    /// Layer presenting into an [`ImageSlot`].
    pub fn with_slot(node: NodeId, config: CaptureConfig, kit: BlurKit) -> FrostResult<Self> {
        Self::new(node, config, kit, ImageSlot::new())
    }
}

impl<P: Presenter> BlurLayer<P> {
    /// Fails on an invalid config, or with [`FrostError::FacadeUninitialized`] when `kit`
    /// cannot blur.
    pub fn new(
        node: NodeId,
        config: CaptureConfig,
        kit: BlurKit,
        presenter: P,
    ) -> FrostResult<Self> {
        config.validate()?;
        let compositor = PaddedCaptureCompositor::new(kit)?;
        Ok(Self {
            node,
            surface: SurfaceHandle::new(),
            resolver: ScreenPositionResolver,
            config,
            locks: LockController::new(),
            compositor,
            refresh: RefreshLoop::new(config.fps),
            attached: false,
            redraw_requested: true,
            presenter,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn locks(&self) -> &LockController {
        &self.locks
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_running(&self) -> bool {
        self.refresh.is_running()
    }

    /// Whether a config change is waiting for the next render.
    pub fn redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    pub fn downscale_factor(&self) -> f64 {
        self.config.downscale_factor
    }

    /// Changing the downscale drops any view-locked buffer; it was captured at the old scale.
    pub fn set_downscale_factor(&mut self, downscale: f64) -> FrostResult<()> {
        validate_downscale(downscale)?;
        self.config.downscale_factor = downscale;
        self.locks.invalidate_locked_buffer();
        self.redraw_requested = true;
        Ok(())
    }

    pub fn blur_radius(&self) -> u32 {
        self.config.blur_radius
    }

    /// Changing the radius drops any view-locked buffer; it was blurred at the old radius.
    pub fn set_blur_radius(&mut self, radius: u32) {
        self.config.blur_radius = radius;
        self.locks.invalidate_locked_buffer();
        self.redraw_requested = true;
    }

    pub fn fps(&self) -> u32 {
        self.config.fps
    }

    pub fn set_fps(&mut self, fps: u32, scheduler: &mut dyn FrameScheduler) {
        self.config.fps = fps;
        self.refresh.set_fps(fps, self.attached, scheduler);
    }

    pub fn corner_radius(&self) -> f64 {
        self.config.corner_radius
    }

    pub fn set_corner_radius(&mut self, radius: f64) -> FrostResult<()> {
        validate_corner_radius(radius)?;
        self.config.corner_radius = radius;
        self.redraw_requested = true;
        Ok(())
    }

    pub fn alpha(&self) -> Option<f32> {
        self.config.alpha
    }

    /// Set the layer's resting opacity.
    ///
    /// It reaches the node right away unless the view is locked; a locked view picks it up when
    /// the next live capture restores the layer.
    pub fn set_alpha(&mut self, tree: &mut SurfaceTree, alpha: Option<f32>) -> FrostResult<()> {
        validate_alpha(alpha)?;
        self.config.alpha = alpha;
        if self.locks.is_view_locked() {
            return Ok(());
        }
        tree.set_opacity(self.node, self.config.resting_opacity())
    }

    pub fn lock_position(&mut self) {
        self.locks.lock_position();
    }

    pub fn unlock_position(&mut self) {
        self.locks.unlock_position();
    }

    pub fn is_position_locked(&self) -> bool {
        self.locks.is_position_locked()
    }

    /// Capture and blur the whole root surface now and reuse it for every tick until unlocked.
    ///
    /// Failing to capture is not an error: the view is locked without a buffer and ticks keep
    /// using the live path.
    pub fn lock_view(&mut self, tree: &mut SurfaceTree) {
        let root = self.surface.resolve(tree, self.node);
        let (node, resting) = (self.node, self.config.resting_opacity());
        let compositor = &self.compositor;
        let config = &self.config;
        self.locks.lock_view(|| {
            let root = root.ok_or_else(|| {
                FrostError::capture_unavailable("layer is not attached to a surface")
            })?;
            capture_hidden(tree, node, resting, |tree| {
                compositor.capture_surface(tree, root, config)
            })
        });
    }

    pub fn unlock_view(&mut self) {
        self.locks.unlock_view();
    }

    pub fn is_view_locked(&self) -> bool {
        self.locks.is_view_locked()
    }

    /// The layer was attached to a surface: start refreshing if `fps > 0`.
    pub fn on_attached(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.attached = true;
        self.refresh.start(scheduler);
    }

    pub fn on_detached(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.attached = false;
        self.refresh.pause(scheduler);
        self.surface.invalidate();
    }

    pub fn on_size_changed(&mut self, tree: &mut SurfaceTree) -> FrostResult<bool> {
        self.render(tree)
    }

    /// Render only if a setter asked for it since the last render.
    pub fn render_if_requested(&mut self, tree: &mut SurfaceTree) -> FrostResult<bool> {
        if !self.redraw_requested {
            return Ok(false);
        }
        self.render(tree)
    }

    /// Frame callback from the scheduler: one tick, then post the next wake-up.
    ///
    /// A tick that could not capture does not stop the loop.
    pub fn on_frame(
        &mut self,
        tree: &mut SurfaceTree,
        scheduler: &mut dyn FrameScheduler,
    ) -> FrostResult<bool> {
        if !self.refresh.is_running() {
            return Ok(false);
        }
        let published = self.render(tree);
        self.refresh.reschedule(scheduler);
        published
    }

    /// One render tick: resolve position, compose (or crop the frozen backdrop), publish.
    ///
    /// Returns whether an image was published. Recoverable failures skip the publish and leave
    /// the previous image in place.
    #[tracing::instrument(level = "debug", skip_all, fields(node = ?self.node))]
    pub fn render(&mut self, tree: &mut SurfaceTree) -> FrostResult<bool> {
        self.redraw_requested = false;

        let Some(root) = self.surface.resolve(tree, self.node) else {
            tracing::debug!("layer has no root surface, skipping tick");
            return Ok(false);
        };
        let Some((width, height)) = tree.node(self.node).map(|n| (n.width, n.height)) else {
            tracing::debug!("layer node is gone, skipping tick");
            return Ok(false);
        };

        let (node, resolver) = (self.node, self.resolver);
        let point = self.locks.screen_point(|| resolver.resolve(tree, node));
        tracing::trace!(x = point.x, y = point.y, "screen point");
        let region = Region::at(point, width, height);

        let result = match self.locks.locked_buffer() {
            Some(locked) => self.compositor.crop_locked(locked, &region, &self.config),
            None => capture_hidden(tree, node, self.config.resting_opacity(), |tree| {
                self.compositor
                    .try_compose_blur(tree, root, &region, &self.config)
            }),
        };

        match result {
            Ok(image) => {
                self.presenter.set_corner_radius(
                    self.config.corner_radius * self.config.downscale_factor,
                );
                self.presenter.set_image(image);
                Ok(true)
            }
            Err(err) if err.is_recoverable() => {
                tracing::debug!(%err, "tick skipped");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

/// Run `f` with `node` fully transparent, so a layer never captures its own output.
fn capture_hidden<T>(
    tree: &mut SurfaceTree,
    node: NodeId,
    resting_opacity: f32,
    f: impl FnOnce(&SurfaceTree) -> FrostResult<T>,
) -> FrostResult<T> {
    tree.set_opacity(node, 0.0)?;
    let out = f(tree);
    tree.set_opacity(node, resting_opacity)?;
    out
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/layer.rs"]
mod tests;
