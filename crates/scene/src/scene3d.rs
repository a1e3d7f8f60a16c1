use runtime::Frame;

use crate::camera::CameraPose;
use crate::primitive::PrimitiveId;

/// Callback run once per rendered frame, before the scene updates its primitives.
pub type PreUpdateHook<S> = Box<dyn FnMut(&S, Frame)>;

/// The slice of a rendering engine's scene that overlays depend on.
pub trait Scene3D {
    fn camera(&self) -> CameraPose;

    /// Adds a primitive. Returns `false` if it was already present.
    fn add_primitive(&mut self, id: PrimitiveId) -> bool;

    /// Removes a primitive. Returns `false` if it was not present.
    fn remove_primitive(&mut self, id: PrimitiveId) -> bool;

    fn contains_primitive(&self, id: PrimitiveId) -> bool;

    fn primitive_count(&self) -> usize;

    fn register_pre_update_hook(&mut self, hook: PreUpdateHook<Self>)
    where
        Self: Sized;
}
