//! Boundary traits for the host application.
//!
//! The core never owns viewports or transform orientations; it sees live
//! viewport state through [`Viewport`] handles and reference frames through
//! a [`FrameSource`]. Everything fallible lives behind these traits.

use nalgebra::{Rotation3, UnitQuaternion};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identity of a 3D viewport.
///
/// Used as a map key only; holding a `ViewportId` does not keep the
/// viewport alive, and the host must call
/// [`crate::ViewAligner::viewport_closed`] when one goes away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewportId(pub u64);

/// Projection mode of a viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
    Camera,
}

/// Errors reported by the host's reference-frame providers.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("cannot derive an orientation from the current selection")]
    SelectionUnavailable,
    #[error("temporary orientation no longer exists")]
    MissingTemporary,
    #[error("host error: {0}")]
    Host(String),
}

/// Live-state handle for one viewport.
///
/// Implementations use interior mutability: the smooth-rotation worker
/// updates the rotation from a background thread while the handle is shared
/// as an `Arc<dyn Viewport>`.
pub trait Viewport: Send + Sync {
    fn id(&self) -> ViewportId;

    /// Current view rotation in world space.
    fn rotation(&self) -> UnitQuaternion<f64>;

    fn set_rotation(&self, rotation: UnitQuaternion<f64>);

    fn projection(&self) -> ProjectionMode;

    fn set_projection(&self, mode: ProjectionMode);
}

/// Provider of the reference frames the view can align to.
pub trait FrameSource {
    /// The 3D cursor's rotation. Always available.
    fn cursor_frame(&self) -> Rotation3<f64>;

    /// The active custom transform orientation, if any.
    fn custom_frame(&self) -> Option<Rotation3<f64>>;

    /// Derive a temporary orientation from the current selection and make
    /// it active. Fails when nothing usable is selected.
    fn create_selection_frame(&mut self) -> Result<Rotation3<f64>, FrameError>;

    /// Delete the temporary selection orientation. Deletion failures are
    /// treated as best-effort cleanup by the caller.
    fn delete_selection_frame(&mut self) -> Result<(), FrameError>;

    /// Set the host's transform orientation to the current view
    /// (post-alignment side effect, preference gated).
    fn set_orientation_to_view(&mut self);
}
