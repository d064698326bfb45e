//! Frostglass renders a frosted-glass backdrop: a rectangle of a layered surface that shows a
//! blurred copy of everything painted behind it.
//!
//! Each refresh tick of a [`BlurLayer`]:
//!
//! - resolves the layer's position on its root surface (or reuses a locked point)
//! - snapshots a padded, downscaled window of the surface with the layer itself hidden
//! - blurs it through a [`BlurKit`] and crops the padding back off
//! - hands the result to a [`Presenter`]
//!
//! A view lock freezes one blurred snapshot of the whole surface and only moves the crop window.
#![forbid(unsafe_code)]

mod foundation;
mod pipeline;
mod render;
mod scene;

pub use crate::foundation::core::{Affine, Point, Rect, Region, Rgba8, ScreenPoint, Vec2};
pub use crate::foundation::error::{FrostError, FrostResult};

pub use crate::render::blur::{BlurFacade, BlurKit, GaussianBlur, MAX_BLUR_RADIUS};
pub use crate::render::buffer::PixelBuffer;
pub use crate::render::mask::apply_rounded_corners;
pub use crate::render::snapshot::SurfaceSnapshotter;

pub use crate::scene::file::{BlurSpec, LayerSpec, LoadedScene, SceneFile};
pub use crate::scene::position::{
    ChainLink, ContainmentChain, ScreenPositionResolver, SurfaceHandle,
};
pub use crate::scene::tree::{Node, NodeId, NodeKind, SurfaceTree};

pub use crate::pipeline::compose::{CapturePlan, Margins, PaddedCaptureCompositor};
pub use crate::pipeline::config::{
    CaptureConfig, DEFAULT_BLUR_RADIUS, DEFAULT_CORNER_RADIUS, DEFAULT_DOWNSCALE_FACTOR,
    DEFAULT_FPS,
};
pub use crate::pipeline::layer::BlurLayer;
pub use crate::pipeline::lock::{CaptureSource, LockController, PositionSource};
pub use crate::pipeline::present::{ImageSlot, Presenter};
pub use crate::pipeline::refresh::{FrameScheduler, LoopState, ManualScheduler, RefreshLoop};
