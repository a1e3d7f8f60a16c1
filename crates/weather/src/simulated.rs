//! CPU particle engine for headless runs and tests.
//!
//! Particles live in the system's local East-North-Up frame (z is up), so the
//! profile's velocity rule pulls them toward the ground wherever the system is
//! placed. World positions come from the current placement.

use foundation::math::{Vec3, mat4_transform_point};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scene::{Placement, PrimitiveId, PrimitiveIdAllocator};

use crate::engine::{ParticleEngine, ParticleSystem};
use crate::profile::{ColorRgba, EmitterShape, ParticleProfile};
use crate::texture::ImageHandle;

/// Hard cap on live particles per system.
pub const DEFAULT_MAX_PARTICLES: usize = 100_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub age_s: f64,
    pub life_s: f64,
    pub color: ColorRgba,
    pub scale: f64,
}

#[derive(Debug)]
pub struct SimulatedParticleEngine {
    ids: PrimitiveIdAllocator,
    seed: u64,
    max_particles: usize,
}

impl SimulatedParticleEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            ids: PrimitiveIdAllocator::new(),
            seed,
            max_particles: DEFAULT_MAX_PARTICLES,
        }
    }

    pub fn with_max_particles(mut self, max_particles: usize) -> Self {
        self.max_particles = max_particles;
        self
    }
}

impl Default for SimulatedParticleEngine {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ParticleEngine for SimulatedParticleEngine {
    type System = SimulatedParticleSystem;

    fn create_particle_system(
        &mut self,
        profile: &ParticleProfile,
        image: &ImageHandle,
    ) -> SimulatedParticleSystem {
        let id = self.ids.allocate();
        SimulatedParticleSystem {
            id,
            profile: profile.clone(),
            image: image.clone(),
            placement: Placement::identity(),
            emission_rate: profile.emission_rate,
            max_particles: self.max_particles,
            particles: Vec::new(),
            emit_carry: 0.0,
            cycle_s: 0.0,
            rng: ChaCha8Rng::seed_from_u64(self.seed ^ id.0),
        }
    }
}

#[derive(Debug)]
pub struct SimulatedParticleSystem {
    id: PrimitiveId,
    profile: ParticleProfile,
    image: ImageHandle,
    placement: Placement,
    emission_rate: f64,
    max_particles: usize,
    particles: Vec<Particle>,
    emit_carry: f64,
    cycle_s: f64,
    rng: ChaCha8Rng,
}

impl SimulatedParticleSystem {
    pub fn profile(&self) -> &ParticleProfile {
        &self.profile
    }

    pub fn image(&self) -> &ImageHandle {
        &self.image
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn live_count(&self) -> usize {
        self.particles.len()
    }

    /// Time into the current emission loop. Each loop starts with no
    /// fractional emission carried over from the previous one.
    pub fn cycle_s(&self) -> f64 {
        self.cycle_s
    }

    pub fn world_position(&self, particle: &Particle) -> Vec3 {
        mat4_transform_point(&self.placement.matrix, particle.position)
    }

    /// Advances the simulation by `dt_s` seconds.
    ///
    /// Existing particles age and move first; particles emitted during this
    /// step start at age zero.
    pub fn step(&mut self, dt_s: f64) {
        if dt_s.is_nan() || dt_s <= 0.0 {
            return;
        }

        let profile = &self.profile;
        self.particles.retain_mut(|p| {
            p.age_s += dt_s;
            if p.age_s >= p.life_s {
                return false;
            }
            p.velocity = profile.velocity_rule.apply(p.velocity, p.position, dt_s);
            p.position += p.velocity * dt_s;
            let t = if p.life_s > 0.0 { p.age_s / p.life_s } else { 1.0 };
            p.color = profile.start_color.lerp(profile.end_color, t as f32);
            p.scale = profile.start_scale + (profile.end_scale - profile.start_scale) * t;
            true
        });

        self.emit_carry += self.emission_rate * dt_s;
        let due = self.emit_carry.floor();
        self.emit_carry -= due;
        let room = self.max_particles.saturating_sub(self.particles.len());
        let count = (due as usize).min(room);
        for _ in 0..count {
            let particle = self.spawn();
            self.particles.push(particle);
        }

        let lifetime = self.profile.system_lifetime_s;
        if lifetime > 0.0 {
            let elapsed = self.cycle_s + dt_s;
            if elapsed >= lifetime {
                self.emit_carry = 0.0;
            }
            self.cycle_s = elapsed % lifetime;
        }
    }

    fn spawn(&mut self) -> Particle {
        let profile = &self.profile;
        let EmitterShape::Sphere { radius } = profile.emitter;

        let theta = self.rng.gen_range(0.0..std::f64::consts::TAU);
        let phi = self.rng.gen_range(0.0..=std::f64::consts::PI);
        let r = uniform(&mut self.rng, 0.0, radius);
        let (sin_t, cos_t) = theta.sin_cos();
        let (sin_p, cos_p) = phi.sin_cos();
        let position = Vec3::new(r * cos_t * sin_p, r * sin_t * sin_p, r * cos_p);

        let direction = position.try_normalize().unwrap_or(Vec3::Z);
        let speed = uniform(&mut self.rng, profile.min_speed, profile.max_speed);
        let life_s = uniform(
            &mut self.rng,
            profile.min_particle_life_s,
            profile.max_particle_life_s,
        );

        Particle {
            position,
            velocity: direction * speed,
            age_s: 0.0,
            life_s,
            color: profile.start_color,
            scale: profile.start_scale,
        }
    }
}

/// Sample in `[lo, hi]`; collapses to `lo` when the range is empty or not finite.
fn uniform(rng: &mut ChaCha8Rng, lo: f64, hi: f64) -> f64 {
    if hi > lo && (hi - lo).is_finite() {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

impl ParticleSystem for SimulatedParticleSystem {
    fn primitive_id(&self) -> PrimitiveId {
        self.id
    }

    fn emission_rate(&self) -> f64 {
        self.emission_rate
    }

    fn set_emission_rate(&mut self, rate: f64) {
        self.emission_rate = rate;
    }

    fn placement(&self) -> Placement {
        self.placement
    }

    fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::SimulatedParticleEngine;
    use crate::engine::{ParticleEngine, ParticleSystem};
    use crate::profile::{ColorRgba, ParticleProfile};
    use crate::texture::ImageHandle;
    use foundation::math::Vec3;
    use scene::Placement;

    fn image() -> ImageHandle {
        ImageHandle {
            width: 1,
            height: 1,
            pixels: Arc::from(vec![255u8; 4]),
        }
    }

    fn long_lived(mut profile: ParticleProfile) -> ParticleProfile {
        profile.min_particle_life_s = 5.0;
        profile.max_particle_life_s = 5.0;
        profile
    }

    #[test]
    fn systems_get_distinct_ids_and_profile_rate() {
        let mut engine = SimulatedParticleEngine::new(7);
        let a = engine.create_particle_system(&ParticleProfile::rain(), &image());
        let b = engine.create_particle_system(&ParticleProfile::snow(), &image());
        assert_ne!(a.primitive_id(), b.primitive_id());
        assert_eq!(a.emission_rate(), 5000.0);
        assert_eq!(b.emission_rate(), 3000.0);
        assert_eq!(a.placement(), Placement::identity());
    }

    #[test]
    fn emits_rate_times_elapsed() {
        let mut engine = SimulatedParticleEngine::new(1);
        let mut system = engine.create_particle_system(&long_lived(ParticleProfile::snow()), &image());
        system.set_emission_rate(100.0);
        for _ in 0..10 {
            system.step(0.1);
        }
        assert!((99..=100).contains(&system.live_count()), "{}", system.live_count());
    }

    #[test]
    fn zero_rate_emits_nothing() {
        let mut engine = SimulatedParticleEngine::new(1);
        let mut system = engine.create_particle_system(&ParticleProfile::rain(), &image());
        system.set_emission_rate(0.0);
        system.step(1.0);
        assert_eq!(system.live_count(), 0);
    }

    #[test]
    fn spawns_inside_emitter_with_bounded_speed() {
        let mut engine = SimulatedParticleEngine::new(3);
        let profile = ParticleProfile::rain();
        let mut system = engine.create_particle_system(&profile, &image());
        system.step(0.01);
        assert!(system.live_count() > 0);
        for p in system.particles() {
            assert!(p.position.length() <= 200.0 + 1e-9);
            let speed = p.velocity.length();
            assert!(speed >= profile.min_speed - 1e-9 && speed <= profile.max_speed + 1e-9);
            assert_eq!(p.age_s, 0.0);
        }
    }

    #[test]
    fn rain_accelerates_downward() {
        let mut engine = SimulatedParticleEngine::new(5);
        let mut system = engine.create_particle_system(&long_lived(ParticleProfile::rain()), &image());
        system.step(0.01);
        let before: Vec<f64> = system.particles().iter().map(|p| p.velocity.z).collect();
        system.set_emission_rate(0.0);
        system.step(0.1);
        for (p, vz) in system.particles().iter().zip(before) {
            assert!((p.velocity.z - (vz - 300.0 * 0.1)).abs() < 1e-9);
        }
    }

    #[test]
    fn particles_expire_and_fade() {
        let mut engine = SimulatedParticleEngine::new(9);
        let mut profile = ParticleProfile::snow();
        profile.min_particle_life_s = 1.0;
        profile.max_particle_life_s = 1.0;
        let mut system = engine.create_particle_system(&profile, &image());
        system.step(0.01);
        system.set_emission_rate(0.0);

        system.step(0.5);
        let expected = ColorRgba::WHITE.with_alpha(0.8).lerp(ColorRgba::WHITE.with_alpha(0.1), 0.5);
        for p in system.particles() {
            assert!((p.color.a - expected.a).abs() < 1e-5);
            assert!((p.scale - 0.75).abs() < 1e-9);
        }

        system.step(0.6);
        assert_eq!(system.live_count(), 0);
    }

    #[test]
    fn loop_boundary_drops_fractional_emission() {
        let mut engine = SimulatedParticleEngine::new(6);
        let mut profile = long_lived(ParticleProfile::snow());
        profile.system_lifetime_s = 1.0;
        let mut system = engine.create_particle_system(&profile, &image());
        system.set_emission_rate(1.5);

        // 0.75 owed after each half second; the half particle left at the
        // one second mark is discarded when the loop restarts.
        for _ in 0..4 {
            system.step(0.5);
        }
        assert_eq!(system.live_count(), 2);
        assert_eq!(system.cycle_s(), 0.0);
    }

    #[test]
    fn inverted_ranges_do_not_panic() {
        let mut engine = SimulatedParticleEngine::new(8);
        let mut profile = ParticleProfile::rain();
        profile.min_speed = 100.0;
        profile.max_speed = 1.0;
        profile.max_particle_life_s = 0.1;
        let mut system = engine.create_particle_system(&profile, &image());
        system.step(0.01);
        assert!(system.live_count() > 0);
        for p in system.particles() {
            assert!((p.velocity.length() - 100.0).abs() < 1e-9);
            assert_eq!(p.life_s, profile.min_particle_life_s);
        }
    }

    #[test]
    fn respects_particle_cap() {
        let mut engine = SimulatedParticleEngine::new(2).with_max_particles(10);
        let mut system = engine.create_particle_system(&long_lived(ParticleProfile::rain()), &image());
        system.step(1.0);
        assert_eq!(system.live_count(), 10);
    }

    #[test]
    fn world_position_uses_placement() {
        let mut engine = SimulatedParticleEngine::new(4);
        let mut system = engine.create_particle_system(&ParticleProfile::snow(), &image());
        system.step(0.01);
        let anchor = Vec3::new(6_378_137.0, 0.0, 0.0);
        system.set_placement(Placement::east_north_up(anchor));
        let p = system.particles()[0].clone();
        let world = system.world_position(&p);
        assert!(((world - anchor).length() - p.position.length()).abs() < 1e-6);
    }

    #[test]
    fn same_seed_is_reproducible() {
        let run = || {
            let mut engine = SimulatedParticleEngine::new(42);
            let mut system = engine.create_particle_system(&ParticleProfile::rain(), &image());
            system.step(0.02);
            system.particles().to_vec()
        };
        assert_eq!(run(), run());
    }
}
