use scene::{Placement, PrimitiveId};

use crate::profile::ParticleProfile;
use crate::texture::ImageHandle;

/// A live particle system as seen by the overlay.
pub trait ParticleSystem {
    /// Id under which the system is registered in the scene's primitives.
    fn primitive_id(&self) -> PrimitiveId;

    fn emission_rate(&self) -> f64;

    fn set_emission_rate(&mut self, rate: f64);

    fn placement(&self) -> Placement;

    fn set_placement(&mut self, placement: Placement);
}

/// Builds particle systems from profiles.
pub trait ParticleEngine {
    type System: ParticleSystem;

    fn create_particle_system(
        &mut self,
        profile: &ParticleProfile,
        image: &ImageHandle,
    ) -> Self::System;
}
