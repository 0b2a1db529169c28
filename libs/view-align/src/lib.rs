//! Viewport alignment core.
//!
//! Resolves a target camera orientation from a reference frame (3D cursor,
//! custom transform orientation, or a selection-derived frame) combined with
//! one of the canonical viewpoints, then drives an instant or smooth
//! transition to it. A per-viewport tracker watches for manual rotation away
//! from a committed alignment and restores the viewport's prior projection
//! mode when it happens.
//!
//! The crate never talks to a renderer directly: the host supplies live
//! viewport state through [`host::Viewport`] handles and reference frames
//! through [`host::FrameSource`], and calls [`aligner::ViewAligner::monitor_frame`]
//! once per render tick.

pub mod aligner;
pub mod animation;
pub mod easing;
pub mod host;
pub mod resolve;
pub mod roll;
pub mod tracker;
pub mod viewpoint;

pub use aligner::{AlignStatus, Preferences, ViewAligner};
pub use host::{FrameError, FrameSource, ProjectionMode, Viewport, ViewportId};
pub use resolve::{resolve_target, AlignMode};
pub use tracker::{AlignmentState, AlignmentTracker, DRIFT_THRESHOLD};
pub use viewpoint::{select_nearest, Viewpoint};
