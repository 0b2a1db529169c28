//! Aligns a fake viewport to the cursor frame and watches the drift monitor
//! restore the projection mode after a manual rotation.
//!
//! Run with `RUST_LOG=view_align=debug` to see the decision trace.

use std::f64::consts::FRAC_PI_2;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use nalgebra::{Rotation3, UnitQuaternion, Vector3};
use tracing_subscriber::EnvFilter;

use view_align::{
    AlignMode, FrameError, FrameSource, Preferences, ProjectionMode, ViewAligner, Viewport,
    ViewportId, Viewpoint,
};

struct DemoViewport {
    id: ViewportId,
    rotation: Mutex<UnitQuaternion<f64>>,
    projection: Mutex<ProjectionMode>,
}

impl Viewport for DemoViewport {
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

struct DemoFrames;

impl FrameSource for DemoFrames {
    fn cursor_frame(&self) -> Rotation3<f64> {
        // Cursor tilted 30 degrees about Z.
        Rotation3::from_axis_angle(&Vector3::z_axis(), 30.0f64.to_radians())
    }
    fn custom_frame(&self) -> Option<Rotation3<f64>> {
        None
    }
    fn create_selection_frame(&mut self) -> Result<Rotation3<f64>, FrameError> {
        Err(FrameError::SelectionUnavailable)
    }
    fn delete_selection_frame(&mut self) -> Result<(), FrameError> {
        Ok(())
    }
    fn set_orientation_to_view(&mut self) {}
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let viewport = Arc::new(DemoViewport {
        id: ViewportId(1),
        rotation: Mutex::new(UnitQuaternion::identity()),
        projection: Mutex::new(ProjectionMode::Perspective),
    });
    let handle: Arc<dyn Viewport> = viewport.clone();
    let viewports = vec![handle.clone()];

    let mut aligner = ViewAligner::new(Preferences::default());
    let mut frames = DemoFrames;

    let status = aligner.align(AlignMode::Cursor, Viewpoint::Front, &mut frames, &handle);
    println!("align to cursor/front: {status:?}");

    // Stand in for the host's render loop while the animation runs.
    while aligner.is_animating() {
        aligner.monitor_frame(&viewports);
        thread::sleep(Duration::from_millis(16));
    }
    aligner.wait_for_animation();
    println!(
        "settled at {:?} axis-angle, projection {:?}",
        viewport.rotation().axis_angle(),
        viewport.projection()
    );

    // The user grabs the view and rotates it away; the next frame restores
    // the prior projection mode.
    viewport.set_rotation(
        viewport.rotation() * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2),
    );
    aligner.monitor_frame(&viewports);
    println!("after manual rotation, projection {:?}", viewport.projection());
}
