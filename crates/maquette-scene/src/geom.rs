pub type Unit = euclid::UnknownUnit;

pub type Point2 = euclid::Point2D<f64, Unit>;
pub type Point3 = euclid::Point3D<f64, Unit>;
pub type Vector2 = euclid::Vector2D<f64, Unit>;
pub type Vector3 = euclid::Vector3D<f64, Unit>;
pub type Size2 = euclid::Size2D<f64, Unit>;

pub fn point2(x: f64, y: f64) -> Point2 {
    euclid::point2(x, y)
}

pub fn point3(x: f64, y: f64, z: f64) -> Point3 {
    euclid::point3(x, y, z)
}

pub fn vector3(x: f64, y: f64, z: f64) -> Vector3 {
    euclid::vec3(x, y, z)
}

pub fn size2(w: f64, h: f64) -> Size2 {
    euclid::size2(w, h)
}

/// World-space axis-aligned bounding box, derived by the bounds processor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3,
    pub max: Point3,
}

impl Aabb {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }
}
