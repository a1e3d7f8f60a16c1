use runtime::{Frame, Metrics};

use crate::camera::CameraPose;
use crate::primitive::PrimitiveId;
use crate::scene3d::{PreUpdateHook, Scene3D};

pub const METRIC_PRIMITIVES_ADDED: &str = "scene.primitives.added";
pub const METRIC_PRIMITIVES_REMOVED: &str = "scene.primitives.removed";
pub const METRIC_FRAMES: &str = "scene.frames";

/// In-process scene without a renderer.
///
/// Keeps the primitive collection in insertion order and counts every add and
/// remove so callers can check ownership invariants.
pub struct HeadlessScene {
    camera: CameraPose,
    primitives: Vec<PrimitiveId>,
    hooks: Vec<PreUpdateHook<HeadlessScene>>,
    metrics: Metrics,
}

impl std::fmt::Debug for HeadlessScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessScene")
            .field("camera", &self.camera)
            .field("primitives", &self.primitives)
            .field("hooks", &self.hooks.len())
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl HeadlessScene {
    pub fn new(camera: CameraPose) -> Self {
        Self {
            camera,
            primitives: Vec::new(),
            hooks: Vec::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn set_camera(&mut self, camera: CameraPose) {
        self.camera = camera;
    }

    pub fn primitives(&self) -> &[PrimitiveId] {
        &self.primitives
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Runs every pre-update hook, in registration order, for `frame`.
    pub fn render_frame(&mut self, frame: Frame) {
        let mut hooks = std::mem::take(&mut self.hooks);
        for hook in hooks.iter_mut() {
            hook(self, frame);
        }
        self.hooks = hooks;
        self.metrics.inc_counter(METRIC_FRAMES, 1);
    }
}

impl Scene3D for HeadlessScene {
    fn camera(&self) -> CameraPose {
        self.camera
    }

    fn add_primitive(&mut self, id: PrimitiveId) -> bool {
        if self.primitives.contains(&id) {
            return false;
        }
        self.primitives.push(id);
        self.metrics.inc_counter(METRIC_PRIMITIVES_ADDED, 1);
        true
    }

    fn remove_primitive(&mut self, id: PrimitiveId) -> bool {
        let Some(idx) = self.primitives.iter().position(|p| *p == id) else {
            return false;
        };
        self.primitives.remove(idx);
        self.metrics.inc_counter(METRIC_PRIMITIVES_REMOVED, 1);
        true
    }

    fn contains_primitive(&self, id: PrimitiveId) -> bool {
        self.primitives.contains(&id)
    }

    fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    fn register_pre_update_hook(&mut self, hook: PreUpdateHook<Self>) {
        self.hooks.push(hook);
    }
}
