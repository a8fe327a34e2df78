//! Points, vectors and placements.
//!
//! Rotations given as yaw, pitch and roll compose as `Rz(yaw) * Ry(pitch) * Rx(roll)`.

pub use truck_geometry::base::{Point3, Vector3};

mod placement;

pub use placement::{Placement, Rotation};

pub const DIRECTION_EPSILON: f64 = 1.0e-12;

pub mod directions {
    use super::Vector3;

    pub fn x() -> Vector3 {
        Vector3::new(1.0, 0.0, 0.0)
    }

    pub fn y() -> Vector3 {
        Vector3::new(0.0, 1.0, 0.0)
    }

    pub fn z() -> Vector3 {
        Vector3::new(0.0, 0.0, 1.0)
    }

    /// Unit vector of the x-y bisectrix, the reference direction of bent fittings.
    pub fn bisectrix_xy() -> Vector3 {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        Vector3::new(s, s, 0.0)
    }
}
