use crate::Vec3;

/// Axis-aligned bounding box.
///
/// [`Aabb::EMPTY`] carries inverted corners (min = +inf, max = -inf) so the
/// first inserted point becomes both min and max.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    #[inline]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all of `points`. Empty input yields [`Aabb::EMPTY`].
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut aabb = Self::EMPTY;
        for p in points {
            aabb.insert(p);
        }
        aabb
    }

    /// Grow the box to include `point`.
    #[inline]
    pub fn insert(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Smallest box containing both boxes.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// `true` when no point was ever inserted (min exceeds max on some axis).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.is_empty()
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along each axis.
    #[inline]
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Distance from the center to the farthest corner (half the main diagonal).
    #[inline]
    pub fn max_radius(&self) -> f32 {
        self.extent().length() * 0.5
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    #[test]
    fn empty_box_is_empty() {
        assert!(Aabb::EMPTY.is_empty());
        assert!(!Aabb::EMPTY.is_valid());
    }

    #[test]
    fn insert_grows_from_empty() {
        let mut aabb = Aabb::EMPTY;
        aabb.insert(vec3(1.0, 2.0, 3.0));
        assert_eq!(aabb.min, vec3(1.0, 2.0, 3.0));
        assert_eq!(aabb.max, vec3(1.0, 2.0, 3.0));
        assert!(aabb.is_valid());

        aabb.insert(vec3(-1.0, 5.0, 0.0));
        assert_eq!(aabb.min, vec3(-1.0, 2.0, 0.0));
        assert_eq!(aabb.max, vec3(1.0, 5.0, 3.0));
    }

    #[test]
    fn from_points_matches_manual_insert() {
        let points = [
            vec3(0.0, 0.0, 0.0),
            vec3(2.0, -1.0, 4.0),
            vec3(-3.0, 1.0, 1.0),
        ];
        let aabb = Aabb::from_points(points);
        assert_eq!(aabb.min, vec3(-3.0, -1.0, 0.0));
        assert_eq!(aabb.max, vec3(2.0, 1.0, 4.0));
        assert_eq!(aabb.extent(), vec3(5.0, 2.0, 4.0));
    }

    #[test]
    fn from_no_points_is_empty() {
        assert!(Aabb::from_points([]).is_empty());
    }
}
