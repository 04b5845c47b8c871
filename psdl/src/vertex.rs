//! Scene vertex

use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Add, Div, Mul, Sub};

use glam::Vec3;

/// A point in scene space.
///
/// Equality and hashing compare the exact bit patterns of the three
/// components. `0.0` and `-0.0` are different vertices, and a NaN vertex
/// equals itself. There is no tolerance: two vertices that differ in the last
/// bit are stored separately in the vertex pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vertex {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`
    pub fn distance(&self, other: Vertex) -> f32 {
        Vec3::from(*self).distance(Vec3::from(other))
    }

    /// Length of the vector from the origin
    pub fn magnitude(&self) -> f32 {
        Vec3::from(*self).length()
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    fn bits(&self) -> [u32; 3] {
        [self.x.to_bits(), self.y.to_bits(), self.z.to_bits()]
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x:{}, y:{}, z:{})", self.x, self.y, self.z)
    }
}

impl From<Vertex> for Vec3 {
    fn from(v: Vertex) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Vertex {
    fn from(v: Vec3) -> Self {
        Vertex::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Vertex {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Vertex::new(x, y, z)
    }
}

impl Add for Vertex {
    type Output = Vertex;

    fn add(self, rhs: Vertex) -> Vertex {
        Vertex::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vertex {
    type Output = Vertex;

    fn sub(self, rhs: Vertex) -> Vertex {
        Vertex::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul for Vertex {
    type Output = Vertex;

    fn mul(self, rhs: Vertex) -> Vertex {
        Vertex::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Mul<f32> for Vertex {
    type Output = Vertex;

    fn mul(self, rhs: f32) -> Vertex {
        Vertex::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div for Vertex {
    type Output = Vertex;

    fn div(self, rhs: Vertex) -> Vertex {
        Vertex::new(self.x / rhs.x, self.y / rhs.y, self.z / rhs.z)
    }
}

impl Div<f32> for Vertex {
    type Output = Vertex;

    fn div(self, rhs: f32) -> Vertex {
        Vertex::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}
