use truck_base::cgmath64::{EuclideanSpace, InnerSpace, Matrix, Matrix3, Matrix4, Rad};

use crate::{DIRECTION_EPSILON, Point3, Vector3, directions};

/// A proper rotation of 3D space stored as an orthonormal matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    matrix: Matrix3,
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Rotation {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0),
        }
    }

    /// Yaw, pitch and roll in degrees, applied as `Rz(yaw) * Ry(pitch) * Rx(roll)`.
    pub fn from_ypr(yaw: f64, pitch: f64, roll: f64) -> Self {
        let matrix = Matrix3::from_angle_z(Rad(yaw.to_radians()))
            * Matrix3::from_angle_y(Rad(pitch.to_radians()))
            * Matrix3::from_angle_x(Rad(roll.to_radians()));
        Self { matrix }
    }

    pub fn from_axis_angle(axis: Vector3, degrees: f64) -> Self {
        let length = axis.magnitude();
        if length <= DIRECTION_EPSILON {
            return Self::identity();
        }
        Self {
            matrix: Matrix3::from_axis_angle(axis / length, Rad(degrees.to_radians())),
        }
    }

    /// Shortest rotation carrying the direction `from` onto the direction `to`.
    pub fn between(from: Vector3, to: Vector3) -> Self {
        let (from_len, to_len) = (from.magnitude(), to.magnitude());
        if from_len <= DIRECTION_EPSILON || to_len <= DIRECTION_EPSILON {
            return Self::identity();
        }
        let a = from / from_len;
        let b = to / to_len;
        let cos = a.dot(b).clamp(-1.0, 1.0);
        let axis = a.cross(b);
        let sin = axis.magnitude();
        if sin > DIRECTION_EPSILON {
            return Self::from_axis_angle(axis, sin.atan2(cos).to_degrees());
        }
        if cos > 0.0 {
            return Self::identity();
        }
        let mut perpendicular = a.cross(directions::x());
        if perpendicular.magnitude() <= 1.0e-6 {
            perpendicular = a.cross(directions::y());
        }
        Self::from_axis_angle(perpendicular, 180.0)
    }

    /// `self * other`: `other` is applied first.
    pub fn multiply(&self, other: &Rotation) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    pub fn inverted(&self) -> Self {
        Self {
            matrix: self.matrix.transpose(),
        }
    }

    pub fn apply(&self, vector: Vector3) -> Vector3 {
        self.matrix * vector
    }

    pub fn matrix(&self) -> Matrix3 {
        self.matrix
    }

    /// Axis and angle in degrees in `[0, 180]`. The identity yields the z axis and 0.
    pub fn to_axis_angle(&self) -> (Vector3, f64) {
        let m = &self.matrix;
        let cos = ((m.x.x + m.y.y + m.z.z - 1.0) * 0.5).clamp(-1.0, 1.0);
        let angle = cos.acos();
        if angle <= 1.0e-12 {
            return (directions::z(), 0.0);
        }
        let skew = Vector3::new(m.y.z - m.z.y, m.z.x - m.x.z, m.x.y - m.y.x);
        if skew.magnitude() > 1.0e-9 {
            return (skew.normalize(), angle.to_degrees());
        }
        // Half turn: R = 2 a a^T - I, read the axis from the largest diagonal entry.
        let xx = ((m.x.x + 1.0) * 0.5).max(0.0);
        let yy = ((m.y.y + 1.0) * 0.5).max(0.0);
        let zz = ((m.z.z + 1.0) * 0.5).max(0.0);
        let axis = if xx >= yy && xx >= zz {
            let x = xx.sqrt();
            Vector3::new(x, m.x.y / (2.0 * x), m.x.z / (2.0 * x))
        } else if yy >= zz {
            let y = yy.sqrt();
            Vector3::new(m.x.y / (2.0 * y), y, m.y.z / (2.0 * y))
        } else {
            let z = zz.sqrt();
            Vector3::new(m.x.z / (2.0 * z), m.y.z / (2.0 * z), z)
        };
        (axis.normalize(), 180.0)
    }

    /// Inverse of [`Rotation::from_ypr`]. Pitch is kept in `[-90, 90]`; at gimbal lock the roll is 0.
    pub fn to_ypr(&self) -> (f64, f64, f64) {
        let m = &self.matrix;
        let sin_pitch = -m.x.z;
        let cos_pitch = m.x.x.hypot(m.x.y);
        let pitch = sin_pitch.atan2(cos_pitch);
        if cos_pitch > 1.0e-9 {
            let yaw = m.x.y.atan2(m.x.x);
            let roll = m.y.z.atan2(m.z.z);
            (yaw.to_degrees(), pitch.to_degrees(), roll.to_degrees())
        } else {
            let yaw = (-m.y.x).atan2(m.y.y);
            (yaw.to_degrees(), pitch.to_degrees(), 0.0)
        }
    }

    pub fn approx_eq(&self, other: &Rotation, eps: f64) -> bool {
        let a = &self.matrix;
        let b = &other.matrix;
        [a.x - b.x, a.y - b.y, a.z - b.z]
            .iter()
            .all(|column| column.x.abs() <= eps && column.y.abs() <= eps && column.z.abs() <= eps)
    }
}

/// Position and orientation of a local frame: `p_global = base + rotation * p_local`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub base: Vector3,
    pub rotation: Rotation,
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

impl Placement {
    pub fn new(base: Vector3, rotation: Rotation) -> Self {
        Self { base, rotation }
    }

    pub fn identity() -> Self {
        Self::new(Vector3::new(0.0, 0.0, 0.0), Rotation::identity())
    }

    pub fn from_translation(base: Vector3) -> Self {
        Self::new(base, Rotation::identity())
    }

    pub fn from_point(point: Point3) -> Self {
        Self::from_translation(point.to_vec())
    }

    pub fn is_identity(&self) -> bool {
        self.base.magnitude() <= DIRECTION_EPSILON
            && self.rotation.approx_eq(&Rotation::identity(), DIRECTION_EPSILON)
    }

    pub fn apply_point(&self, point: Point3) -> Point3 {
        Point3::from_vec(self.base + self.rotation.apply(point.to_vec()))
    }

    pub fn apply_direction(&self, direction: Vector3) -> Vector3 {
        self.rotation.apply(direction)
    }

    /// `self * other`: a frame placed by `other` inside a frame placed by `self`.
    pub fn multiply(&self, other: &Placement) -> Self {
        Self {
            base: self.base + self.rotation.apply(other.base),
            rotation: self.rotation.multiply(&other.rotation),
        }
    }

    pub fn inverted(&self) -> Self {
        let rotation = self.rotation.inverted();
        Self {
            base: -rotation.apply(self.base),
            rotation,
        }
    }

    pub fn to_matrix(&self) -> Matrix4 {
        Matrix4::from_translation(self.base) * Matrix4::from(self.rotation.matrix())
    }

    pub fn approx_eq(&self, other: &Placement, eps: f64) -> bool {
        (self.base - other.base).magnitude() <= eps && self.rotation.approx_eq(&other.rotation, eps)
    }
}
