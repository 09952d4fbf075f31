//! Shatter is a glass-break transition engine for 2D raster images.
//!
//! A trigger breaks the source image into Voronoi fragments that fly apart over a background.
//! The public API is controller-oriented:
//!
//! - Decode an image into a [`SourceImage`]
//! - Create a [`TransitionController`] from a [`ShatterConfig`]
//! - Call [`TransitionController::trigger`], then [`TransitionController::tick`] once per frame
//!
//! Every stage is also usable on its own: seed sampling, partitioning, extraction, motion
//! planning, pure state evaluation and compositing.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod config;
pub(crate) mod fragment;
pub(crate) mod geometry;
pub(crate) mod motion;
pub(crate) mod render;
pub(crate) mod session;

pub use crate::foundation::core::{
    Affine, Canvas, Fps, FrameIndex, Point, Rect, Rgba8Premul, Transform2D, Vec2,
};
pub use crate::foundation::error::{ShatterError, ShatterResult};

pub use crate::animation::ease::Ease;
pub use crate::config::{DelayMode, GlareConfig, RangeF64, ShatterConfig};
pub use crate::fragment::extract::{Fragment, TexturePatch, extract, extract_all};
pub use crate::fragment::source::SourceImage;
pub use crate::geometry::partition::{PartitionCell, build as build_partition};
pub use crate::geometry::polygon::{MIN_POLYGON_AREA, Polygon};
pub use crate::geometry::sampler::{SampleParams, generate as generate_seeds};
pub use crate::motion::plan::{MotionPlan, MotionPlanner};
pub use crate::motion::state::{MotionState, evaluate, is_finished};
pub use crate::render::compositor::{
    Background, Compositor, FragmentDraw, FrameDrawCommands, FrameRGBA,
};
pub use crate::session::controller::{SessionState, Tick, TickTime, TransitionController};
pub use crate::session::transition::{ShatterOrigin, TransitionSession, build_session};
