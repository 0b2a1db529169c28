//! Smooth view rotation.
//!
//! One worker thread per smooth rotation, at most one alive at a time.
//! The gate is an atomic flag wrapped in a release-on-drop guard so the
//! `ANIMATING -> IDLE` transition happens even if the worker unwinds.

use std::f64::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use nalgebra::UnitQuaternion;
use tracing::debug;

use crate::easing::s_curve;
use crate::host::{ProjectionMode, Viewport};

/// Duration of a half-turn (180 degree) smooth rotation, in seconds.
/// Shorter rotations scale down linearly with the rotation angle.
pub const SMOOTH_ROT_DURATION: f64 = 0.24;

/// Polling interval of the rotation worker, in seconds.
pub const SMOOTH_ROT_STEP: f64 = 0.02;

/// Gate preventing concurrent smooth rotations.
///
/// Held exactly while a rotation worker is alive; the drift monitor reads
/// it to stay out of the animation's way.
#[derive(Clone, Debug, Default)]
pub struct AlignLock(Arc<AtomicBool>);

impl AlignLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Take the gate if it is free. The returned guard releases it on drop.
    pub fn try_acquire(&self) -> Option<LockGuard> {
        self.0
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
            .then(|| LockGuard(self.0.clone()))
    }
}

/// Releases the [`AlignLock`] on drop.
pub struct LockGuard(Arc<AtomicBool>);

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Spawn the smooth-rotation worker for `viewport`.
///
/// The worker owns `guard` for its whole lifetime, so the lock clears when
/// the thread terminates, completion or not. The returned handle is the
/// explicit completion signal.
pub(crate) fn spawn_smooth_rotation(
    viewport: Arc<dyn Viewport>,
    begin: UnitQuaternion<f64>,
    end: UnitQuaternion<f64>,
    guard: LockGuard,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let _guard = guard;
        smooth_rotate(viewport.as_ref(), &begin, &end);
    })
}

/// Drive the viewport rotation from `begin` to `end` over a duration
/// proportional to the rotation angle, easing with [`s_curve`].
///
/// Runs at least one step even for a zero angle, then unconditionally
/// forces the exact end orientation and orthographic projection.
fn smooth_rotate(viewport: &dyn Viewport, begin: &UnitQuaternion<f64>, end: &UnitQuaternion<f64>) {
    let angle = begin.angle_to(end);
    let duration = (SMOOTH_ROT_DURATION * angle / PI).abs();
    debug!(
        viewport = viewport.id().0,
        angle, duration, "starting smooth rotation"
    );

    let start = Instant::now();
    let mut elapsed = 0.0;
    while elapsed <= duration {
        let factor = if duration == 0.0 {
            1.0
        } else {
            s_curve((elapsed / duration).min(1.0))
        };
        viewport.set_rotation(interpolate(begin, end, factor));

        thread::sleep(Duration::from_secs_f64(SMOOTH_ROT_STEP));
        elapsed = start.elapsed().as_secs_f64();
    }

    viewport.set_rotation(*end);
    viewport.set_projection(ProjectionMode::Orthographic);
    debug!(viewport = viewport.id().0, "smooth rotation finished");
}

fn interpolate(
    begin: &UnitQuaternion<f64>,
    end: &UnitQuaternion<f64>,
    factor: f64,
) -> UnitQuaternion<f64> {
    // Antipodal quaternions have no unique slerp path; the final tick
    // forces the exact end orientation anyway.
    begin.try_slerp(end, factor, 1.0e-9).unwrap_or(*end)
}
