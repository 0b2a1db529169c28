//! Easing curve for smooth view rotation.

use std::f64::consts::PI;

/// Map a linear factor in `[0, 1]` onto a sine-based s-curve.
///
/// The curve is flat at both ends (`s_curve(0) == 0`, `s_curve(1) == 1`)
/// and passes through `0.5` at the midpoint. Inputs outside the unit
/// interval are a programming error.
pub fn s_curve(x: f64) -> f64 {
    assert!(
        (0.0..=1.0).contains(&x),
        "easing factor {x} outside [0, 1]"
    );
    (1.0 + ((x - 0.5) * PI).sin()) / 2.0
}
