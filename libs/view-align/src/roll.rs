//! Roll preservation for viewpoint alignment.
//!
//! Aligning to `frame * viewpoint` fixes what is visible but not which way
//! "up" points on screen. Any quarter-turn roll about the view axis shows
//! the same content, so the resolver scores all four and keeps the one
//! closest to the user's current perceived up.

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Rotation3, UnitQuaternion, Vector3};

/// Return the orientation among the four quarter-turn roll candidates of
/// `frame * viewpoint` whose up axis best matches the current one.
///
/// Candidates are scanned in ascending angle order (0, 90, 180, 270
/// degrees) with a strict improvement test, so the smallest winning angle
/// is kept on exact ties. Pure function.
pub fn resolve_roll(
    current: &UnitQuaternion<f64>,
    frame: &Rotation3<f64>,
    viewpoint: &Rotation3<f64>,
) -> Rotation3<f64> {
    // The direction that currently appears to go upward in the viewport:
    // the Y-axis column of the view orientation, in world space.
    let visual_up = current.to_rotation_matrix().matrix().column(1).clone_owned();

    let aligned = frame * viewpoint;

    let mut best = aligned;
    let mut best_score = -1.0;
    for quarter_turns in 0..4 {
        let angle = quarter_turns as f64 * FRAC_PI_2;
        let candidate = aligned * Rotation3::from_axis_angle(&Vector3::z_axis(), angle);
        let score = visual_up.dot(&candidate.matrix().column(1).clone_owned());
        if score > best_score {
            best_score = score;
            best = candidate;
        }
    }
    best
}
