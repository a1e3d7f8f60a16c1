//! Camera-relative emitter placement.

use foundation::math::Vec3;
use scene::{CameraPose, Placement};

use crate::profile::PlacementOffsets;

/// `position + standoff * direction + vertical_offset * up`.
pub fn anchor_position(camera: &CameraPose, offsets: &PlacementOffsets) -> Vec3 {
    camera.position + camera.direction * offsets.standoff_m + camera.up * offsets.vertical_offset_m
}

/// East-North-Up placement at the camera-relative anchor.
pub fn placement_for_camera(camera: &CameraPose, offsets: &PlacementOffsets) -> Placement {
    Placement::east_north_up(anchor_position(camera, offsets))
}
