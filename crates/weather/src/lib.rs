//! Rain and snow overlay for a 3D globe scene.
//!
//! [`WeatherOverlayController`] keeps at most one particle system alive and
//! repositions it ahead of the camera before every frame.

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod positioning;
pub mod profile;
pub mod simulated;
pub mod state;
pub mod texture;

pub use config::*;
pub use controller::*;
pub use engine::*;
pub use error::*;
pub use positioning::*;
pub use profile::*;
pub use simulated::*;
pub use state::*;
pub use texture::*;
