//! Canonical viewpoints and nearest-viewpoint selection.

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{Rotation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// A symbolic viewpoint applied on the right of a reference frame.
///
/// The six fixed viewpoints map to constant rotations (see
/// [`Viewpoint::fixed_matrix`]); [`Viewpoint::Nearest`] is resolved
/// dynamically against the current view direction and never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Viewpoint {
    Top,
    Bottom,
    Front,
    Back,
    Right,
    Left,
    Nearest,
}

impl Viewpoint {
    /// The six fixed viewpoints, in the order the nearest-viewpoint scan
    /// visits them. First-seen wins on exact score ties, so this order is
    /// part of the contract.
    pub const FIXED: [Viewpoint; 6] = [
        Viewpoint::Top,
        Viewpoint::Bottom,
        Viewpoint::Front,
        Viewpoint::Back,
        Viewpoint::Right,
        Viewpoint::Left,
    ];

    /// The constant rotation for this viewpoint.
    ///
    /// Each constant composes 90/180 degree axis rotations. `Nearest` has
    /// no fixed rotation and falls back to `Top`.
    pub fn fixed_matrix(self) -> Rotation3<f64> {
        let rot_x = |angle| Rotation3::from_axis_angle(&Vector3::x_axis(), angle);
        let rot_y = |angle| Rotation3::from_axis_angle(&Vector3::y_axis(), angle);
        match self {
            Viewpoint::Top | Viewpoint::Nearest => Rotation3::identity(),
            Viewpoint::Bottom => rot_x(PI),
            Viewpoint::Front => rot_x(FRAC_PI_2),
            Viewpoint::Back => rot_x(FRAC_PI_2) * rot_y(PI),
            Viewpoint::Right => rot_x(FRAC_PI_2) * rot_y(FRAC_PI_2),
            Viewpoint::Left => rot_x(FRAC_PI_2) * rot_y(-FRAC_PI_2),
        }
    }
}

/// World-space direction the camera looks along. The camera looks down its
/// own -Z axis, so this is the negated third column of the orientation.
pub(crate) fn view_direction(orientation: &Rotation3<f64>) -> Vector3<f64> {
    -orientation.matrix().column(2).clone_owned()
}

/// Pick the fixed viewpoint whose view direction under `frame` best matches
/// the current view direction, ignoring roll.
///
/// Scores are plain dot products; the running maximum starts at negative
/// infinity so any real score wins, and ties go to the earliest entry of
/// [`Viewpoint::FIXED`].
pub fn select_nearest(
    current: &UnitQuaternion<f64>,
    frame: &Rotation3<f64>,
) -> (Viewpoint, Rotation3<f64>) {
    let current_dir = view_direction(&current.to_rotation_matrix());

    let mut best = Viewpoint::Top;
    let mut max_dot = f64::NEG_INFINITY;
    for viewpoint in Viewpoint::FIXED {
        let target_dir = view_direction(&(frame * viewpoint.fixed_matrix()));
        let dot = current_dir.dot(&target_dir);
        if dot > max_dot {
            max_dot = dot;
            best = viewpoint;
        }
    }
    (best, best.fixed_matrix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn top_is_identity() {
        assert_relative_eq!(
            Viewpoint::Top.fixed_matrix(),
            Rotation3::identity(),
            epsilon = 1.0e-12
        );
    }

    #[test]
    fn front_is_quarter_turn_about_x() {
        let front = Viewpoint::Front.fixed_matrix();
        // Rx(90) sends world Y to world Z.
        assert_relative_eq!(
            front * Vector3::y(),
            Vector3::z(),
            epsilon = 1.0e-12
        );
        assert_relative_eq!(front.angle(), FRAC_PI_2, epsilon = 1.0e-12);
    }

    #[test]
    fn fixed_matrices_are_distinct() {
        for (i, a) in Viewpoint::FIXED.iter().enumerate() {
            for b in &Viewpoint::FIXED[i + 1..] {
                let diff = a.fixed_matrix().rotation_to(&b.fixed_matrix());
                assert!(
                    diff.angle() > 1.0e-6,
                    "{a:?} and {b:?} map to the same rotation"
                );
            }
        }
    }

    #[test]
    fn exact_alignment_selects_that_viewpoint() {
        let frame = Rotation3::from_axis_angle(&Vector3::z_axis(), 0.7)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), -0.3);
        for viewpoint in Viewpoint::FIXED {
            let current =
                UnitQuaternion::from_rotation_matrix(&(frame * viewpoint.fixed_matrix()));
            let (selected, matrix) = select_nearest(&current, &frame);
            assert_eq!(selected, viewpoint);
            assert_relative_eq!(matrix, viewpoint.fixed_matrix(), epsilon = 1.0e-12);
        }
    }

    #[test]
    fn top_alignment_beats_all_others_strictly() {
        let frame = Rotation3::identity();
        let current = UnitQuaternion::identity();
        let current_dir = view_direction(&current.to_rotation_matrix());

        let (selected, _) = select_nearest(&current, &frame);
        assert_eq!(selected, Viewpoint::Top);

        let top_score = current_dir.dot(&view_direction(&Viewpoint::Top.fixed_matrix()));
        assert_relative_eq!(top_score, 1.0, epsilon = 1.0e-12);
        for other in &Viewpoint::FIXED[1..] {
            let score = current_dir.dot(&view_direction(&other.fixed_matrix()));
            assert!(score < top_score, "{other:?} should score below Top");
        }
    }

    #[test]
    fn selection_ignores_roll() {
        let frame = Rotation3::from_axis_angle(&Vector3::y_axis(), 0.4);
        // Same view direction as FRONT, but rolled a quarter turn.
        let rolled = frame
            * Viewpoint::Front.fixed_matrix()
            * Rotation3::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let current = UnitQuaternion::from_rotation_matrix(&rolled);
        let (selected, _) = select_nearest(&current, &frame);
        assert_eq!(selected, Viewpoint::Front);
    }
}
