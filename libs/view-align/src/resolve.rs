//! Top-level orientation resolution.

use nalgebra::{Rotation3, UnitQuaternion};
use serde::{Deserialize, Serialize};

use crate::roll::resolve_roll;
use crate::viewpoint::{select_nearest, Viewpoint};

/// Which reference frame the view aligns to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlignMode {
    /// The active custom transform orientation.
    Custom,
    /// The 3D cursor's transform.
    Cursor,
    /// A temporary orientation derived from the current selection.
    Selection,
}

/// Resolve the target view orientation for `frame` and `viewpoint`.
///
/// `Nearest` is resolved against the current view direction first; with
/// `minimize_roll` the result is rolled in quarter turns to keep the
/// current perceived up (see [`resolve_roll`]). Pure and deterministic:
/// identical inputs produce bit-identical output.
pub fn resolve_target(
    viewpoint: Viewpoint,
    frame: &Rotation3<f64>,
    current: &UnitQuaternion<f64>,
    minimize_roll: bool,
) -> UnitQuaternion<f64> {
    let vp_matrix = match viewpoint {
        Viewpoint::Nearest => select_nearest(current, frame).1,
        fixed => fixed.fixed_matrix(),
    };

    let target = if minimize_roll {
        resolve_roll(current, frame, &vp_matrix)
    } else {
        frame * vp_matrix
    };

    UnitQuaternion::from_rotation_matrix(&target)
}
