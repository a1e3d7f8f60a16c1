use foundation::math::{EnuFrame, MAT4_IDENTITY, Mat4, Vec3, mat4_translation};

/// Rigid local-to-world transform of a primitive.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement {
    pub matrix: Mat4,
}

impl Placement {
    pub fn identity() -> Self {
        Self {
            matrix: MAT4_IDENTITY,
        }
    }

    /// East-North-Up frame at `anchor`, expressed as a fixed-frame transform.
    pub fn east_north_up(anchor: Vec3) -> Self {
        Self {
            matrix: EnuFrame::at(anchor).to_fixed_frame(),
        }
    }

    pub fn origin(&self) -> Vec3 {
        mat4_translation(&self.matrix)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}
