//! Axis-aligned bounds of the measured object

use glam::DVec3;

use crate::direction::{Axis, Side};

/// Axis-aligned bounding box stored as minimum corner plus extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: DVec3,
    pub size: DVec3,
}

impl BoundingBox {
    pub fn new(min: DVec3, size: DVec3) -> Self {
        Self { min, size }
    }

    /// Build from two opposite corners (order does not matter).
    pub fn from_min_max(a: DVec3, b: DVec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self {
            min,
            size: max - min,
        }
    }

    /// Build the tightest box around a set of points.
    pub fn from_points<I: IntoIterator<Item = DVec3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self::from_min_max(min, max))
    }

    pub fn max(&self) -> DVec3 {
        self.min + self.size
    }

    pub fn center(&self) -> DVec3 {
        self.min + self.size * 0.5
    }

    /// Largest of the three extents.
    pub fn max_dimension(&self) -> f64 {
        self.size.max_element()
    }

    /// True when every extent is (numerically) zero.
    pub fn is_degenerate(&self) -> bool {
        self.max_dimension() < 1e-10
    }

    /// Extent along one axis.
    pub fn extent(&self, axis: Axis) -> f64 {
        self.size[axis.index()]
    }

    /// Coordinate of the min (`Side::Near`) or max (`Side::Far`) face along an axis.
    pub fn side_coord(&self, axis: Axis, side: Side) -> f64 {
        match side {
            Side::Near => self.min[axis.index()],
            Side::Far => self.max()[axis.index()],
        }
    }

    /// One of the eight corners, picked per axis by side.
    pub fn corner(&self, x: Side, y: Side, z: Side) -> DVec3 {
        DVec3::new(
            self.side_coord(Axis::X, x),
            self.side_coord(Axis::Y, y),
            self.side_coord(Axis::Z, z),
        )
    }

    /// All eight corners.
    pub fn corners(&self) -> [DVec3; 8] {
        let mut out = [DVec3::ZERO; 8];
        for (i, corner) in out.iter_mut().enumerate() {
            let pick = |bit: usize| if i & bit == 0 { Side::Near } else { Side::Far };
            *corner = self.corner(pick(1), pick(2), pick(4));
        }
        out
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::from_min_max(self.min.min(other.min), self.max().max(other.max()))
    }

    /// Sphere circumscribing the box.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere {
            center: self.center(),
            radius: self.size.length() * 0.5,
        }
    }
}

/// Bounding sphere used for framing and clipping-plane fitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: DVec3,
    pub radius: f64,
}

impl BoundingSphere {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn is_empty(&self) -> bool {
        self.radius <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_min_max_orders_corners() {
        let bbox = BoundingBox::from_min_max(DVec3::new(2.0, 0.0, 5.0), DVec3::new(0.0, 3.0, 1.0));
        assert_eq!(bbox.min, DVec3::new(0.0, 0.0, 1.0));
        assert_eq!(bbox.size, DVec3::new(2.0, 3.0, 4.0));
        assert_eq!(bbox.max(), DVec3::new(2.0, 3.0, 5.0));
    }

    #[test]
    fn test_union_and_sphere() {
        let a = BoundingBox::new(DVec3::ZERO, DVec3::ONE);
        let b = BoundingBox::new(DVec3::splat(2.0), DVec3::ONE);
        let u = a.union(&b);
        assert_eq!(u.min, DVec3::ZERO);
        assert_eq!(u.size, DVec3::splat(3.0));

        let sphere = u.bounding_sphere();
        assert_eq!(sphere.center, DVec3::splat(1.5));
        assert_relative_eq!(sphere.radius, 27.0_f64.sqrt() * 0.5);
    }

    #[test]
    fn test_corners_are_distinct() {
        let bbox = BoundingBox::new(DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0));
        let corners = bbox.corners();
        for (i, a) in corners.iter().enumerate() {
            for b in &corners[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(
            bbox.corner(Side::Far, Side::Near, Side::Far),
            DVec3::new(1.0, 0.0, 3.0)
        );
    }

    #[test]
    fn test_degenerate() {
        assert!(BoundingBox::new(DVec3::ONE, DVec3::ZERO).is_degenerate());
        assert!(!BoundingBox::new(DVec3::ONE, DVec3::new(0.0, 0.0, 1.0)).is_degenerate());
        assert!(BoundingBox::from_points(Vec::<DVec3>::new()).is_none());
    }
}
