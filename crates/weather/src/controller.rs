//! The weather overlay controller.
//!
//! Owns at most one particle system, rebuilds it when the weather changes and
//! keeps it a fixed offset ahead of and above the camera every frame.

use std::cell::RefCell;
use std::rc::Rc;

use runtime::Frame;
use scene::Scene3D;
use tracing::{debug, info, warn};

use crate::config::OverlayConfig;
use crate::engine::{ParticleEngine, ParticleSystem};
use crate::error::{ConfigError, WeatherError};
use crate::positioning::placement_for_camera;
use crate::state::{Precipitation, WeatherState};
use crate::texture::{ImageHandle, ParticleTextures};

struct ActiveSystem<S> {
    kind: Precipitation,
    system: S,
}

pub struct WeatherOverlayController<E: ParticleEngine> {
    engine: E,
    config: OverlayConfig,
    textures: ParticleTextures,
    active: Option<ActiveSystem<E::System>>,
    /// Last intensity the user set, applied to every new system.
    intensity_override: Option<f64>,
}

impl<E: ParticleEngine> WeatherOverlayController<E> {
    /// A controller in the `Clear` state with every texture pending.
    ///
    /// Fails if any profile in `config` is out of range.
    pub fn new(engine: E, config: OverlayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            engine,
            config,
            textures: ParticleTextures::new(),
            active: None,
            intensity_override: None,
        })
    }

    pub fn state(&self) -> WeatherState {
        self.active
            .as_ref()
            .map(|a| WeatherState::from(a.kind))
            .unwrap_or(WeatherState::Clear)
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Emission rate of the active system, if any.
    pub fn intensity(&self) -> Option<f64> {
        self.active.as_ref().map(|a| a.system.emission_rate())
    }

    pub fn active_system(&self) -> Option<&E::System> {
        self.active.as_ref().map(|a| &a.system)
    }

    pub fn active_system_mut(&mut self) -> Option<&mut E::System> {
        self.active.as_mut().map(|a| &mut a.system)
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn is_texture_ready(&self, kind: Precipitation) -> bool {
        self.textures.is_ready(kind)
    }

    pub fn install_texture(&mut self, kind: Precipitation, image: ImageHandle) {
        debug!(%kind, "texture installed");
        self.textures.install(kind, image);
    }

    pub fn install_textures(&mut self, textures: ParticleTextures) {
        self.textures.merge(textures);
    }

    /// Switches the overlay to `target`.
    ///
    /// The previous system is removed from the scene before the next one is
    /// built. If the target's texture is not ready nothing changes and
    /// [`WeatherError::AssetNotReady`] is returned.
    pub fn set_weather<S: Scene3D + ?Sized>(
        &mut self,
        scene: &mut S,
        target: WeatherState,
    ) -> Result<(), WeatherError> {
        let next = match target.precipitation() {
            None => None,
            Some(kind) => match self.textures.image(kind) {
                Some(image) => Some((kind, image.clone())),
                None => {
                    warn!(%kind, current = %self.state(), "weather change refused: texture not loaded");
                    return Err(WeatherError::AssetNotReady(kind));
                }
            },
        };

        self.release_active(scene);

        let Some((kind, image)) = next else {
            info!("weather cleared");
            return Ok(());
        };

        let profile = self.config.profile(kind);
        let mut system = self.engine.create_particle_system(profile, &image);
        // Place before the first frame so the system never shows at the origin.
        system.set_placement(placement_for_camera(&scene.camera(), &profile.placement));
        scene.add_primitive(system.primitive_id());
        let rate = self.intensity_override.unwrap_or(profile.emission_rate);
        system.set_emission_rate(rate);

        info!(%kind, id = system.primitive_id().index(), rate, "weather activated");
        self.active = Some(ActiveSystem { kind, system });
        Ok(())
    }

    /// Parses a UI tag (`"rain"`, `"snow"`, `"clear"`) and switches to it.
    pub fn set_weather_str<S: Scene3D + ?Sized>(
        &mut self,
        scene: &mut S,
        tag: &str,
    ) -> Result<(), WeatherError> {
        let target = tag.parse::<WeatherState>().inspect_err(|err| warn!("{err}"))?;
        self.set_weather(scene, target)
    }

    /// Records `value` as the current intensity and sets the active system's
    /// emission rate to exactly `value`.
    ///
    /// Without an active system the scene is untouched; the next system
    /// starts at `value`.
    pub fn set_intensity(&mut self, value: f64) -> Result<(), WeatherError> {
        if !value.is_finite() || value < 0.0 {
            warn!(value, "intensity rejected");
            return Err(WeatherError::InvalidIntensity(value.to_string()));
        }
        self.intensity_override = Some(value);
        let Some(active) = self.active.as_mut() else {
            debug!(value, "intensity stored: no active weather");
            return Ok(());
        };
        active.system.set_emission_rate(value);
        debug!(kind = %active.kind, value, "intensity applied");
        Ok(())
    }

    /// Parses a slider value and applies it with [`Self::set_intensity`].
    pub fn set_intensity_str(&mut self, raw: &str) -> Result<(), WeatherError> {
        let value = raw.trim().parse::<f64>().map_err(|_| {
            warn!(raw, "intensity rejected: not a number");
            WeatherError::InvalidIntensity(raw.to_string())
        })?;
        self.set_intensity(value)
    }

    /// Per-frame repositioning. Constant time; a no-op while clear.
    pub fn on_pre_update<S: Scene3D + ?Sized>(&mut self, scene: &S, _frame: Frame) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let offsets = &self.config.profile(active.kind).placement;
        active
            .system
            .set_placement(placement_for_camera(&scene.camera(), offsets));
    }

    fn release_active<S: Scene3D + ?Sized>(&mut self, scene: &mut S) {
        let Some(previous) = self.active.take() else {
            return;
        };
        let id = previous.system.primitive_id();
        if !scene.remove_primitive(id) {
            warn!(id = id.index(), "active particle system was not in the scene");
        }
        debug!(kind = %previous.kind, id = id.index(), "particle system released");
    }
}

impl<E: ParticleEngine + 'static> WeatherOverlayController<E> {
    /// Registers `controller` to reposition its system before every frame.
    ///
    /// A frame that arrives while the controller is borrowed elsewhere is
    /// skipped.
    pub fn register_pre_update_hook<S: Scene3D + 'static>(controller: &Rc<RefCell<Self>>, scene: &mut S) {
        let controller = Rc::clone(controller);
        scene.register_pre_update_hook(Box::new(move |scene: &S, frame: Frame| {
            match controller.try_borrow_mut() {
                Ok(mut overlay) => overlay.on_pre_update(scene, frame),
                Err(_) => debug!(frame = frame.index, "overlay busy; reposition skipped"),
            }
        }));
    }
}
