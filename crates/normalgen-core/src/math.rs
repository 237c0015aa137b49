//! Minimal 3D vector math used to build surface normals.

/// Direction vector with `f64` components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// Unit vector facing the viewer.
    pub const UNIT_Z: Vector3 = Vector3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy of this vector.
    ///
    /// A zero-length (or non-finite) vector has no direction; it maps to
    /// [`Vector3::UNIT_Z`], the flat-surface normal.
    pub fn normalized(self) -> Vector3 {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return Vector3::UNIT_Z;
        }
        Vector3::new(self.x / len, self.y / len, self.z / len)
    }
}
