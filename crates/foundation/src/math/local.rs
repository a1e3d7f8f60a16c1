use super::{Vec3, geodetic_surface_normal};

/// Column-major 4x4 matrix (`m[col][row]`), same layout as the GPU uniforms.
pub type Mat4 = [[f64; 4]; 4];

pub const MAT4_IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// An East-North-Up frame anchored at an ECEF point.
///
/// The axes are orthonormal and right-handed (`east x north = up`).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EnuFrame {
    pub origin: Vec3,
    pub east: Vec3,
    pub north: Vec3,
    pub up: Vec3,
}

impl EnuFrame {
    /// Builds the frame at `origin` using the WGS84 surface normal as up.
    ///
    /// Degenerate cases: at the Earth's center the axes are the fixed-frame
    /// axes, and on the polar axis east is +Y so north stays well-defined.
    pub fn at(origin: Vec3) -> Self {
        let Some(up) = geodetic_surface_normal(origin) else {
            return Self {
                origin,
                east: Vec3::X,
                north: Vec3::Y,
                up: Vec3::Z,
            };
        };
        let east = Vec3::Z.cross(up).try_normalize().unwrap_or(Vec3::Y);
        let north = up.cross(east);
        Self {
            origin,
            east,
            north,
            up,
        }
    }

    /// Local-to-fixed transform: columns are east, north, up and the origin.
    pub fn to_fixed_frame(&self) -> Mat4 {
        [
            [self.east.x, self.east.y, self.east.z, 0.0],
            [self.north.x, self.north.y, self.north.z, 0.0],
            [self.up.x, self.up.y, self.up.z, 0.0],
            [self.origin.x, self.origin.y, self.origin.z, 1.0],
        ]
    }
}

/// Applies an affine column-major transform to a point.
pub fn mat4_transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0],
        m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1],
        m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2],
    )
}

/// Translation column of an affine transform.
pub fn mat4_translation(m: &Mat4) -> Vec3 {
    Vec3::new(m[3][0], m[3][1], m[3][2])
}

#[cfg(test)]
mod tests {
    use super::{EnuFrame, MAT4_IDENTITY, mat4_transform_point, mat4_translation};
    use crate::math::{Geodetic, Vec3, geodetic_to_ecef};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        assert_close(a.x, b.x, eps);
        assert_close(a.y, b.y, eps);
        assert_close(a.z, b.z, eps);
    }

    #[test]
    fn equator_prime_meridian_axes() {
        let origin = geodetic_to_ecef(Geodetic::new(0.0, 0.0, 0.0)).as_vec3();
        let frame = EnuFrame::at(origin);
        assert_vec_close(frame.east, Vec3::Y, 1e-12);
        assert_vec_close(frame.north, Vec3::Z, 1e-12);
        assert_vec_close(frame.up, Vec3::X, 1e-12);
    }

    #[test]
    fn axes_are_orthonormal_and_right_handed() {
        let origin = geodetic_to_ecef(Geodetic::from_degrees(48.85, 2.35, 300.0)).as_vec3();
        let frame = EnuFrame::at(origin);
        assert_close(frame.east.length(), 1.0, 1e-12);
        assert_close(frame.north.length(), 1.0, 1e-12);
        assert_close(frame.up.length(), 1.0, 1e-12);
        assert_close(frame.east.dot(frame.north), 0.0, 1e-12);
        assert_close(frame.east.dot(frame.up), 0.0, 1e-12);
        assert_vec_close(frame.east.cross(frame.north), frame.up, 1e-12);
    }

    #[test]
    fn fixed_frame_maps_local_origin_to_anchor() {
        let origin = geodetic_to_ecef(Geodetic::from_degrees(10.0, 20.0, 500.0)).as_vec3();
        let m = EnuFrame::at(origin).to_fixed_frame();
        assert_vec_close(mat4_translation(&m), origin, 0.0);
        assert_vec_close(mat4_transform_point(&m, Vec3::ZERO), origin, 1e-9);
    }

    #[test]
    fn fixed_frame_maps_local_up_along_normal() {
        let origin = geodetic_to_ecef(Geodetic::from_degrees(10.0, 20.0, 0.0)).as_vec3();
        let frame = EnuFrame::at(origin);
        let m = frame.to_fixed_frame();
        let p = mat4_transform_point(&m, Vec3::new(0.0, 0.0, 100.0));
        assert_vec_close(p, origin + frame.up * 100.0, 1e-6);
    }

    #[test]
    fn polar_axis_is_not_degenerate() {
        let frame = EnuFrame::at(Vec3::new(0.0, 0.0, 6_356_752.0));
        assert_vec_close(frame.up, Vec3::Z, 1e-12);
        assert_vec_close(frame.east, Vec3::Y, 1e-12);
        assert_vec_close(frame.north, Vec3::new(-1.0, 0.0, 0.0), 1e-12);
    }

    #[test]
    fn center_falls_back_to_identity_axes() {
        let m = EnuFrame::at(Vec3::ZERO).to_fixed_frame();
        assert_eq!(m, MAT4_IDENTITY);
    }
}
