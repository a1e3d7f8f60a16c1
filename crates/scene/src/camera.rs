use foundation::math::{EnuFrame, Geodetic, Vec3, geodetic_to_ecef};

/// World-space camera pose in ECEF meters.
///
/// `direction` and `up` are unit vectors and orthogonal to each other.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, direction: Vec3, up: Vec3) -> Self {
        Self {
            position,
            direction,
            up,
        }
    }

    /// Camera at a geodetic location, looking along `heading_deg` (clockwise
    /// from north) and tilted by `pitch_deg` (negative looks down).
    pub fn from_geodetic(location: Geodetic, heading_deg: f64, pitch_deg: f64) -> Self {
        let position = geodetic_to_ecef(location).as_vec3();
        let frame = EnuFrame::at(position);
        let (sin_h, cos_h) = heading_deg.to_radians().sin_cos();
        let (sin_p, cos_p) = pitch_deg.to_radians().sin_cos();

        let horizontal = frame.east * sin_h + frame.north * cos_h;
        let direction = horizontal * cos_p + frame.up * sin_p;
        // Tilting the horizontal heading up by 90 degrees gives the camera up.
        let up = horizontal * -sin_p + frame.up * cos_p;

        Self::new(position, direction, up)
    }
}
