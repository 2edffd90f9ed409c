use crate::Vec3;

/// A ray in 3D space with origin, direction, and a valid parametric range.
///
/// `t_max` doubles as the "closest hit so far" bound: intersection routines
/// shrink it in place whenever they find a nearer surface, so after a query
/// `ray.at(ray.t_max)` is the hit point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub t_min: f32,
    pub t_max: f32,
}

impl Ray {
    /// Create a new ray valid over `[t_min, t_max]`.
    pub fn new(origin: Vec3, direction: Vec3, t_min: f32, t_max: f32) -> Self {
        Self {
            origin,
            direction,
            t_min,
            t_max,
        }
    }

    /// Create a ray valid from `t_min` to infinity.
    pub fn unbounded(origin: Vec3, direction: Vec3, t_min: f32) -> Self {
        Self::new(origin, direction, t_min, f32::INFINITY)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction, 0.01, 100.0);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
        assert_eq!(ray.t_min, 0.01);
        assert_eq!(ray.t_max, 100.0);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::unbounded(Vec3::ZERO, Vec3::X, 0.0);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_unbounded() {
        let ray = Ray::unbounded(Vec3::ZERO, Vec3::Y, 0.5);
        assert_eq!(ray.t_max, f32::INFINITY);
        assert_eq!(ray.t_min, 0.5);
    }

    #[test]
    fn test_ray_copy() {
        let mut ray1 = Ray::unbounded(Vec3::ZERO, Vec3::Y, 0.0);
        let ray2 = ray1; // Copy, not move

        // Narrowing one copy leaves the other untouched
        ray1.t_max = 3.0;
        assert_eq!(ray2.t_max, f32::INFINITY);
        assert_eq!(ray1.at(1.0), ray2.at(1.0));
    }
}
