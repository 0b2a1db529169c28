//! The align operation and its owning context.
//!
//! [`ViewAligner`] replaces the process-wide state of a typical addon
//! (lock token, viewport map, draw handler) with one explicit object the
//! application constructs and tears down. The host invokes [`ViewAligner::align`]
//! from its command layer and [`ViewAligner::monitor_frame`] from its render
//! tick.

use std::sync::Arc;
use std::thread::JoinHandle;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::animation::{spawn_smooth_rotation, AlignLock};
use crate::host::{FrameSource, ProjectionMode, Viewport, ViewportId};
use crate::resolve::{resolve_target, AlignMode};
use crate::tracker::AlignmentTracker;
use crate::viewpoint::Viewpoint;

/// Host-managed preference flags consumed by the align operation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Animate the rotation instead of jumping to the target.
    pub smooth: bool,
    /// Keep the current perceived up by rolling the target in quarter turns.
    pub minimize_roll: bool,
    /// Set the transform orientation to the view after aligning.
    pub set_orientation_to_view: bool,
    /// Apply `set_orientation_to_view` to Custom-mode alignments too.
    /// Doing so deselects the custom orientation, so it is a separate
    /// opt-in.
    pub set_orientation_to_view_for_custom: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            smooth: true,
            minimize_roll: false,
            set_orientation_to_view: false,
            set_orientation_to_view_for_custom: false,
        }
    }
}

/// Outcome of an align request. Cancellation details go to the log; the
/// operation never leaves partial state behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignStatus {
    Completed,
    Cancelled,
}

/// Owns the alignment lock, the per-viewport tracker, and the handle of
/// the in-flight rotation worker.
pub struct ViewAligner {
    lock: AlignLock,
    tracker: AlignmentTracker,
    prefs: Preferences,
    rotation_job: Option<JoinHandle<()>>,
}

impl ViewAligner {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            lock: AlignLock::new(),
            tracker: AlignmentTracker::new(),
            prefs,
            rotation_job: None,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn set_preferences(&mut self, prefs: Preferences) {
        self.prefs = prefs;
    }

    /// True while a smooth rotation worker is running.
    pub fn is_animating(&self) -> bool {
        self.lock.is_held()
    }

    pub fn tracker(&self) -> &AlignmentTracker {
        &self.tracker
    }

    /// Align `viewport` to `mode`'s reference frame combined with
    /// `viewpoint`.
    ///
    /// Cancels cleanly (warning logged, nothing mutated) when the frame is
    /// unavailable, and is a silent no-op while a previous alignment is
    /// still animating.
    pub fn align<F: FrameSource>(
        &mut self,
        mode: AlignMode,
        viewpoint: Viewpoint,
        frames: &mut F,
        viewport: &Arc<dyn Viewport>,
    ) -> AlignStatus {
        // Selection mode derives a temporary orientation first; creation
        // failure cancels the whole operation.
        let mut temp_frame_created = false;
        let selection_frame = if mode == AlignMode::Selection {
            match frames.create_selection_frame() {
                Ok(frame) => {
                    temp_frame_created = true;
                    Some(frame)
                }
                Err(err) => {
                    warn!(%err, "cannot create orientation from current selection");
                    return AlignStatus::Cancelled;
                }
            }
        } else {
            None
        };

        let frame = match mode {
            AlignMode::Cursor => Some(frames.cursor_frame()),
            AlignMode::Selection => selection_frame,
            AlignMode::Custom => frames.custom_frame(),
        };
        let Some(frame) = frame else {
            if temp_frame_created {
                Self::delete_temp_frame(frames);
            }
            warn!(?mode, "no active custom transform orientation to align to");
            return AlignStatus::Cancelled;
        };

        // One alignment at a time, for both transition styles. Do not
        // queue, do not preempt.
        let Some(guard) = self.lock.try_acquire() else {
            if temp_frame_created {
                Self::delete_temp_frame(frames);
            }
            debug!(?mode, ?viewpoint, "alignment already in progress; ignoring request");
            return AlignStatus::Cancelled;
        };

        let prior_projection = viewport.projection();
        let current = viewport.rotation();
        let target = resolve_target(viewpoint, &frame, &current, self.prefs.minimize_roll);

        if temp_frame_created {
            Self::delete_temp_frame(frames);
        }

        self.tracker.record(viewport.id(), prior_projection, target);
        viewport.set_projection(ProjectionMode::Orthographic);

        if self.prefs.smooth {
            self.rotation_job = Some(spawn_smooth_rotation(
                viewport.clone(),
                current,
                target,
                guard,
            ));
        } else {
            viewport.set_rotation(target);
            drop(guard);
        }

        if self.prefs.set_orientation_to_view
            && (mode != AlignMode::Custom || self.prefs.set_orientation_to_view_for_custom)
        {
            frames.set_orientation_to_view();
        }

        debug!(
            ?mode,
            ?viewpoint,
            viewport = viewport.id().0,
            smooth = self.prefs.smooth,
            minimize_roll = self.prefs.minimize_roll,
            "view alignment committed"
        );
        AlignStatus::Completed
    }

    /// Render-tick entry point: detect manual rotation away from committed
    /// alignments and restore prior projection modes. Skips entirely while
    /// an animation is driving the view.
    pub fn monitor_frame(&mut self, viewports: &[Arc<dyn Viewport>]) {
        if self.lock.is_held() {
            return;
        }
        self.tracker.check_drift(viewports);
    }

    /// Lifecycle hook: the host tells us a viewport no longer exists.
    pub fn viewport_closed(&mut self, id: ViewportId) {
        self.tracker.remove(id);
    }

    /// Block until the in-flight rotation worker (if any) terminates.
    /// Gives tests and teardown a deterministic completion point.
    pub fn wait_for_animation(&mut self) {
        if let Some(job) = self.rotation_job.take() {
            if job.join().is_err() {
                warn!("smooth rotation worker panicked");
            }
        }
    }

    fn delete_temp_frame<F: FrameSource>(frames: &mut F) {
        // Best-effort cleanup: the orientation may already be gone.
        if let Err(err) = frames.delete_selection_frame() {
            debug!(%err, "failed to delete temporary orientation");
        }
    }
}

impl Drop for ViewAligner {
    fn drop(&mut self) {
        // Bounded: the worker runs at most SMOOTH_ROT_DURATION plus one tick.
        self.wait_for_animation();
    }
}
