//! Axis-aligned bounds with a derived bounding sphere.

use crate::math::Vec3;

/// Axis-aligned bounding box of a mesh.
///
/// An empty point set yields a zero-sized box at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Bounds of a point set.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::default();
        };
        let (min, max) = points.fold((*first, *first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        });
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half the box size along each axis.
    pub fn half_extent(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Radius of the sphere around [`center`](Self::center) enclosing the box.
    pub fn sphere_radius(&self) -> f32 {
        self.half_extent().norm()
    }

    /// Whether `point` lies inside the box, boundary included.
    pub fn contains(&self, point: &Vec3) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Vec3::zeros(),
            max: Vec3::zeros(),
        }
    }
}
