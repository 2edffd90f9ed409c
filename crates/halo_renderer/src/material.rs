//! Surface materials and scattering.
//!
//! Materials live in a [`MaterialSet`]: parallel arrays indexed by sphere id,
//! with a closed [`MaterialKind`] tag selecting the scattering rule.

use crate::accelerator::Hit;
use crate::sampling::{gen_f32, random_in_unit_sphere};
use halo_math::{Ray, Vec3};
use rand::RngCore;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Near bound for scattered rays, keeps them off the surface they left.
pub const SCATTER_T_MIN: f32 = 0.01;

/// How a surface scatters light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Lambertian diffuse
    Diffuse,
    /// Metal with optional fuzz
    Reflective,
    /// Glass-like dielectric
    Refractive,
}

/// Outcome of a scattering event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scatter {
    /// The path continues along `ray`, weighted by `attenuation`.
    Scattered { attenuation: Color, ray: Ray },
    /// The path ends here.
    Absorbed,
}

impl Scatter {
    /// Throughput multiplier; zero for an absorbed path.
    pub fn attenuation(&self) -> Color {
        match self {
            Scatter::Scattered { attenuation, .. } => *attenuation,
            Scatter::Absorbed => Color::ZERO,
        }
    }

    /// The continuation ray, if any.
    pub fn ray(&self) -> Option<&Ray> {
        match self {
            Scatter::Scattered { ray, .. } => Some(ray),
            Scatter::Absorbed => None,
        }
    }

    pub fn is_absorbed(&self) -> bool {
        matches!(self, Scatter::Absorbed)
    }
}

/// Material table indexed by sphere id.
///
/// `misc` holds the fuzz for [`MaterialKind::Reflective`], the refractive
/// index for [`MaterialKind::Refractive`], and is unused for diffuse.
#[derive(Debug, Clone, Default)]
pub struct MaterialSet {
    albedo: Vec<Color>,
    misc: Vec<f32>,
    kind: Vec<MaterialKind>,
}

impl MaterialSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            albedo: Vec::with_capacity(capacity),
            misc: Vec::with_capacity(capacity),
            kind: Vec::with_capacity(capacity),
        }
    }

    /// Append a material and return its index.
    ///
    /// The albedo of a [`MaterialKind::Refractive`] entry is ignored when
    /// scattering.
    pub fn add(&mut self, kind: MaterialKind, albedo: Color, misc: f32) -> u32 {
        let index = self.kind.len() as u32;
        self.albedo.push(albedo);
        self.misc.push(misc);
        self.kind.push(kind);
        index
    }

    /// Add a Lambertian material with the given albedo color.
    pub fn add_lambertian(&mut self, albedo: Color) -> u32 {
        self.add(MaterialKind::Diffuse, albedo, 0.0)
    }

    /// Add a metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn add_metal(&mut self, albedo: Color, fuzz: f32) -> u32 {
        self.add(MaterialKind::Reflective, albedo, fuzz.clamp(0.0, 1.0))
    }

    /// Add a dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn add_dielectric(&mut self, ior: f32) -> u32 {
        debug_assert!(ior > 0.0, "index of refraction must be positive, got {ior}");
        self.add(MaterialKind::Refractive, Color::ONE, ior)
    }

    pub fn len(&self) -> usize {
        self.kind.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }

    #[inline]
    pub fn kind(&self, id: u32) -> MaterialKind {
        self.kind[id as usize]
    }

    #[inline]
    pub fn albedo(&self, id: u32) -> Color {
        self.albedo[id as usize]
    }

    #[inline]
    pub fn misc(&self, id: u32) -> f32 {
        self.misc[id as usize]
    }

    /// Scatter `ray` off the surface described by `hit`.
    ///
    /// Consumes a fixed number of draws per kind: three for diffuse and
    /// reflective, one for refractive. Panics if `hit.id` has no material.
    pub fn scatter<R: RngCore + ?Sized>(&self, ray: &Ray, hit: &Hit, rng: &mut R) -> Scatter {
        let id = hit.id as usize;
        let albedo = self.albedo[id];
        let misc = self.misc[id];

        match self.kind[id] {
            MaterialKind::Diffuse => {
                let mut direction = hit.normal + random_in_unit_sphere(rng);

                // Catch degenerate scatter direction
                if direction.length_squared() < 1e-8 {
                    direction = hit.normal;
                }

                scattered(hit, albedo, direction.normalize())
            }
            MaterialKind::Reflective => {
                let reflected = reflect(ray.direction, hit.normal);
                let direction = reflected + misc * random_in_unit_sphere(rng);

                // Only scatter if the reflected ray leaves the surface
                if direction.dot(hit.normal) > 0.0 {
                    scattered(hit, albedo, direction.normalize())
                } else {
                    Scatter::Absorbed
                }
            }
            MaterialKind::Refractive => {
                // Glass never tints, whatever albedo was stored
                let direction = dielectric_direction(ray.direction, hit.normal, misc, gen_f32(rng));
                scattered(hit, Color::ONE, direction.normalize())
            }
        }
    }
}

#[inline]
fn scattered(hit: &Hit, attenuation: Color, direction: Vec3) -> Scatter {
    Scatter::Scattered {
        attenuation,
        ray: Ray::unbounded(hit.position, direction, SCATTER_T_MIN),
    }
}

/// Pick reflection or refraction for a dielectric with index `ior`.
///
/// `normal` is the geometric outward normal; `u` is a uniform draw in [0, 1).
fn dielectric_direction(direction: Vec3, normal: Vec3, ior: f32, u: f32) -> Vec3 {
    let d_dot_n = direction.dot(normal);
    let (facing, ratio, cosine) = if d_dot_n > 0.0 {
        // Leaving the medium
        (-normal, ior, ior * d_dot_n)
    } else {
        (normal, 1.0 / ior, -d_dot_n)
    };

    match refract(direction, facing, ratio) {
        Some(refracted) if u >= schlick(cosine, ior) => refracted,
        // Total internal reflection, or the Fresnel draw chose reflection
        _ => reflect(direction, facing),
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract unit vector `v` through a surface with normal `n` facing against
/// it. Returns `None` on total internal reflection.
#[inline]
pub fn refract(v: Vec3, n: Vec3, eta_ratio: f32) -> Option<Vec3> {
    let dt = v.dot(n);
    let discriminant = 1.0 - eta_ratio * eta_ratio * (1.0 - dt * dt);
    (discriminant > 0.0).then(|| eta_ratio * (v - n * dt) - n * discriminant.sqrt())
}

/// Schlick's approximation for reflectance
#[inline]
pub fn schlick(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
