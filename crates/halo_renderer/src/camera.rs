//! Camera for ray generation.

use crate::sampling::random_in_unit_disk;
use halo_math::{Ray, Vec3};
use rand::RngCore;

/// Near bound for primary rays.
pub const CAMERA_T_MIN: f32 = 0.001;

/// Thin-lens look-at camera.
///
/// Rays are addressed by normalized film coordinates: `s` runs left to right
/// and `t` bottom to top, both over `[0, 1]`.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,       // Vertical field of view in degrees
    aspect: f32,     // Film width over height
    aperture: f32,   // Lens diameter, 0 for a pinhole
    focus_dist: f32, // Distance from camera to plane of perfect focus

    // Cached computed values
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let mut camera = Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
            lower_left: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            lens_radius: 0.0,
        };
        camera.initialize();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.initialize();
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture.max(0.0);
        self.focus_dist = focus_dist;
        self.initialize();
        self
    }

    /// Set the film aspect ratio (width over height).
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self.initialize();
        self
    }

    /// Camera position.
    pub fn origin(&self) -> Vec3 {
        self.look_from
    }

    pub fn aperture(&self) -> f32 {
        self.aperture
    }

    fn initialize(&mut self) {
        let theta = self.vfov.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = self.aspect * half_height;

        // Calculate camera basis vectors
        let w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(w).normalize();
        self.v = w.cross(self.u);

        let focus = self.focus_dist;
        self.lower_left = self.look_from
            - half_width * focus * self.u
            - half_height * focus * self.v
            - focus * w;
        self.horizontal = 2.0 * half_width * focus * self.u;
        self.vertical = 2.0 * half_height * focus * self.v;
        self.lens_radius = self.aperture / 2.0;
    }

    /// Generate a ray through film point (s, t).
    ///
    /// Draws twice from `rng` for the lens sample when the aperture is open,
    /// never otherwise. The direction is unit length.
    pub fn get_ray<R: RngCore + ?Sized>(&self, s: f32, t: f32, rng: &mut R) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        let origin = self.look_from + offset;
        let target = self.lower_left + s * self.horizontal + t * self.vertical;
        Ray::unbounded(origin, (target - origin).normalize(), CAMERA_T_MIN)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::XorShift32;

    #[test]
    fn test_center_ray_looks_at_target() {
        let camera = Camera::new()
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, 0.0, 5.0);

        let ray = camera.get_ray(0.5, 0.5, &mut XorShift32::new(1));
        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 5.0));
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-5);
        assert_eq!(ray.t_min, CAMERA_T_MIN);
    }

    #[test]
    fn test_film_corners() {
        let camera = Camera::new()
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
            .with_aspect(2.0);
        let mut rng = XorShift32::new(1);

        // 90 degrees vertical: the top edge sits at 45 degrees
        let top = camera.get_ray(0.5, 1.0, &mut rng);
        assert!((top.direction - Vec3::new(0.0, 1.0, -1.0).normalize()).length() < 1e-5);

        let lower_left = camera.get_ray(0.0, 0.0, &mut rng);
        assert!((lower_left.direction - Vec3::new(-2.0, -1.0, -1.0).normalize()).length() < 1e-5);
    }

    #[test]
    fn test_directions_are_normalized() {
        let camera = Camera::new()
            .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.1, 10.0);
        let mut rng = XorShift32::new(9);
        for i in 0..100 {
            let s = i as f32 / 100.0;
            let ray = camera.get_ray(s, 1.0 - s, &mut rng);
            assert!((ray.direction.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_pinhole_draws_nothing() {
        let camera = Camera::new().with_lens(60.0, 0.0, 1.0);
        let mut rng = XorShift32::new(21);
        camera.get_ray(0.3, 0.7, &mut rng);
        assert_eq!(rng, XorShift32::new(21));
    }

    #[test]
    fn test_open_lens_draws_twice_and_stays_on_disk() {
        let camera = Camera::new()
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(60.0, 0.5, 4.0);
        let mut rng = XorShift32::new(21);

        for _ in 0..100 {
            let mut expected = rng;
            expected.next_u32();
            expected.next_u32();

            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            assert_eq!(rng, expected);
            assert!(ray.origin.length() <= 0.25 + 1e-6);
            assert!(ray.origin.z.abs() < 1e-6);

            // Every lens sample focuses on the same point
            let focus = ray.at(4.0 / -ray.direction.z);
            assert!((focus - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-3);
        }
    }
}
