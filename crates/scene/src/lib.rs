pub mod camera;
pub mod headless;
pub mod placement;
pub mod primitive;
pub mod scene3d;

pub use camera::*;
pub use headless::*;
pub use placement::*;
pub use primitive::*;
pub use scene3d::*;
