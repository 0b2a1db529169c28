//! Per-viewport alignment tracking and drift detection.

use std::collections::HashMap;
use std::sync::Arc;

use nalgebra::UnitQuaternion;
use tracing::debug;

use crate::host::{ProjectionMode, Viewport, ViewportId};

/// Quaternion dot-product similarity below which a viewport counts as
/// rotated away from its aligned target. 0.999 is roughly 2.5 degrees.
pub const DRIFT_THRESHOLD: f64 = 0.999;

/// Record of the last committed alignment for one viewport.
#[derive(Clone, Copy, Debug)]
pub struct AlignmentState {
    /// Projection mode the viewport had before the alignment forced
    /// orthographic, restored when the user rotates away.
    pub prior_projection: ProjectionMode,
    /// Orientation the alignment committed.
    pub target: UnitQuaternion<f64>,
    /// Cleared once drift is detected; nothing further happens for this
    /// viewport until a new alignment sets it again.
    pub is_aligned: bool,
}

/// Map of alignment records keyed by stable viewport identity.
///
/// Entries do not keep viewports alive; the host removes them through the
/// viewport-close hook.
#[derive(Debug, Default)]
pub struct AlignmentTracker {
    states: HashMap<ViewportId, AlignmentState>,
}

impl AlignmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a committed alignment for `id`, (re)arming drift detection.
    pub fn record(
        &mut self,
        id: ViewportId,
        prior_projection: ProjectionMode,
        target: UnitQuaternion<f64>,
    ) {
        self.states.insert(
            id,
            AlignmentState {
                prior_projection,
                target,
                is_aligned: true,
            },
        );
    }

    /// Viewport-close hook.
    pub fn remove(&mut self, id: ViewportId) {
        self.states.remove(&id);
    }

    pub fn state(&self, id: ViewportId) -> Option<&AlignmentState> {
        self.states.get(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Compare each tracked viewport's live rotation against its committed
    /// target; on drift, restore the prior projection mode and disarm.
    ///
    /// Runs on the render tick for every viewport, so it does no I/O and
    /// no allocation. Idempotent once a viewport is disarmed.
    pub fn check_drift(&mut self, viewports: &[Arc<dyn Viewport>]) {
        for viewport in viewports {
            let Some(state) = self.states.get_mut(&viewport.id()) else {
                continue;
            };
            if !state.is_aligned {
                continue;
            }
            let similarity = quat_similarity(&viewport.rotation(), &state.target);
            if similarity < DRIFT_THRESHOLD {
                debug!(
                    viewport = viewport.id().0,
                    similarity, "viewport rotated away from alignment; restoring projection"
                );
                viewport.set_projection(state.prior_projection);
                state.is_aligned = false;
            }
        }
    }
}

/// Absolute quaternion dot product. 1.0 means identical orientations
/// (q and -q represent the same rotation, hence the absolute value).
pub(crate) fn quat_similarity(a: &UnitQuaternion<f64>, b: &UnitQuaternion<f64>) -> f64 {
    a.coords.dot(&b.coords).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use std::sync::Mutex;

    struct FakeViewport {
        id: ViewportId,
        rotation: Mutex<UnitQuaternion<f64>>,
        projection: Mutex<ProjectionMode>,
    }

    impl FakeViewport {
        fn shared(id: u64, rotation: UnitQuaternion<f64>) -> Arc<Self> {
            Arc::new(Self {
                id: ViewportId(id),
                rotation: Mutex::new(rotation),
                projection: Mutex::new(ProjectionMode::Orthographic),
            })
        }
    }

    impl Viewport for FakeViewport {
        fn id(&self) -> ViewportId {
            self.id
        }
        fn rotation(&self) -> UnitQuaternion<f64> {
            *self.rotation.lock().unwrap()
        }
        fn set_rotation(&self, rotation: UnitQuaternion<f64>) {
            *self.rotation.lock().unwrap() = rotation;
        }
        fn projection(&self) -> ProjectionMode {
            *self.projection.lock().unwrap()
        }
        fn set_projection(&self, mode: ProjectionMode) {
            *self.projection.lock().unwrap() = mode;
        }
    }

    fn ten_degrees_off(q: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
        q * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 10.0f64.to_radians())
    }

    #[test]
    fn identical_rotation_scores_full_similarity() {
        let q = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.8);
        assert_relative_eq!(quat_similarity(&q, &q), 1.0, epsilon = 1.0e-12);
        // Negated coordinates are the same rotation.
        let negated = UnitQuaternion::new_unchecked(-q.into_inner());
        assert_relative_eq!(quat_similarity(&q, &negated), 1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn exact_match_keeps_state() {
        let target = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 1.0);
        let viewport = FakeViewport::shared(7, target);
        let mut tracker = AlignmentTracker::new();
        tracker.record(ViewportId(7), ProjectionMode::Perspective, target);

        let viewports: Vec<Arc<dyn Viewport>> = vec![viewport.clone()];
        tracker.check_drift(&viewports);

        assert!(tracker.state(ViewportId(7)).unwrap().is_aligned);
        assert_eq!(viewport.projection(), ProjectionMode::Orthographic);
    }

    #[test]
    fn drift_restores_prior_projection_once() {
        let target = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 1.0);
        let viewport = FakeViewport::shared(7, ten_degrees_off(&target));
        let mut tracker = AlignmentTracker::new();
        tracker.record(ViewportId(7), ProjectionMode::Perspective, target);

        assert!(quat_similarity(&viewport.rotation(), &target) < DRIFT_THRESHOLD);

        let viewports: Vec<Arc<dyn Viewport>> = vec![viewport.clone()];
        tracker.check_drift(&viewports);
        assert_eq!(viewport.projection(), ProjectionMode::Perspective);
        assert!(!tracker.state(ViewportId(7)).unwrap().is_aligned);

        // Disarmed: a later projection change sticks even though the
        // viewport is still off target.
        viewport.set_projection(ProjectionMode::Camera);
        tracker.check_drift(&viewports);
        assert_eq!(viewport.projection(), ProjectionMode::Camera);
    }

    #[test]
    fn untracked_viewports_are_ignored() {
        let viewport = FakeViewport::shared(3, UnitQuaternion::identity());
        let mut tracker = AlignmentTracker::new();
        let viewports: Vec<Arc<dyn Viewport>> = vec![viewport.clone()];
        tracker.check_drift(&viewports);
        assert!(tracker.is_empty());
    }

    #[test]
    fn close_hook_removes_the_entry() {
        let mut tracker = AlignmentTracker::new();
        tracker.record(
            ViewportId(9),
            ProjectionMode::Perspective,
            UnitQuaternion::identity(),
        );
        tracker.remove(ViewportId(9));
        assert!(tracker.state(ViewportId(9)).is_none());
    }
}
