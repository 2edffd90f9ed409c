//! Bounce integrator.
//!
//! A path starts at a camera ray with unit throughput. Each step finds the
//! closest sphere, asks its material to scatter, and multiplies the
//! throughput by the attenuation. The walk ends when the ray escapes to the
//! sky, gets absorbed, or reaches the bounce limit.

use crate::material::{Color, Scatter};
use crate::scene::Scene;
use halo_math::{Ray, Vec3};
use rand::RngCore;

/// Default bounce limit.
pub const MAX_DEPTH: u32 = 50;

/// Why a path stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// Left the scene and picked up sky radiance.
    Escaped,
    /// A material absorbed it.
    Absorbed,
    /// Hit the bounce limit; remaining light is truncated.
    DepthExhausted,
}

/// State of a path between bounces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathState {
    Tracing { ray: Ray, throughput: Color },
    Escaped(Color),
    Absorbed,
    DepthExhausted(Color),
}

/// Result of tracing one path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    /// Radiance carried back to the camera
    pub color: Color,
    pub termination: Termination,
    /// Number of scattering events
    pub bounces: u32,
}

impl PathSample {
    /// Rays sent into the accelerator for this path.
    ///
    /// Every bounce traced one ray; a path that escaped or was absorbed also
    /// traced the ray that ended it.
    pub fn rays_cast(&self) -> u64 {
        let last = (self.termination != Termination::DepthExhausted) as u64;
        self.bounces as u64 + last
    }
}

/// Trace one path through `scene`.
///
/// Stops after `max_depth` scattering events at the latest.
pub fn trace<R: RngCore + ?Sized>(
    ray: Ray,
    scene: &Scene,
    max_depth: u32,
    rng: &mut R,
) -> PathSample {
    debug_assert!(max_depth > 0, "max_depth must be at least 1");

    let mut state = PathState::Tracing {
        ray,
        throughput: Color::ONE,
    };
    let mut bounces = 0;

    loop {
        state = match state {
            PathState::Tracing { ray, throughput } => match step(ray, throughput, scene, rng) {
                PathState::Tracing { ray, throughput } => {
                    bounces += 1;
                    if bounces >= max_depth {
                        PathState::DepthExhausted(throughput)
                    } else {
                        PathState::Tracing { ray, throughput }
                    }
                }
                finished => finished,
            },
            PathState::Escaped(color) => return sample(color, Termination::Escaped, bounces),
            PathState::Absorbed => return sample(Color::ZERO, Termination::Absorbed, bounces),
            PathState::DepthExhausted(throughput) => {
                return sample(throughput, Termination::DepthExhausted, bounces)
            }
        };
    }
}

/// Recursive formulation of [`trace`].
///
/// Carries the throughput forward through the recursion so every product is
/// taken in the same order, which makes the result bit-identical to
/// [`trace`] for the same inputs and stream.
pub fn trace_recursive<R: RngCore + ?Sized>(
    ray: Ray,
    scene: &Scene,
    max_depth: u32,
    rng: &mut R,
) -> PathSample {
    debug_assert!(max_depth > 0, "max_depth must be at least 1");
    trace_from(ray, Color::ONE, 0, scene, max_depth, rng)
}

fn trace_from<R: RngCore + ?Sized>(
    ray: Ray,
    throughput: Color,
    bounces: u32,
    scene: &Scene,
    max_depth: u32,
    rng: &mut R,
) -> PathSample {
    match step(ray, throughput, scene, rng) {
        PathState::Tracing { ray, throughput } => {
            let bounces = bounces + 1;
            if bounces >= max_depth {
                sample(throughput, Termination::DepthExhausted, bounces)
            } else {
                trace_from(ray, throughput, bounces, scene, max_depth, rng)
            }
        }
        PathState::Escaped(color) => sample(color, Termination::Escaped, bounces),
        PathState::Absorbed => sample(Color::ZERO, Termination::Absorbed, bounces),
        PathState::DepthExhausted(throughput) => {
            sample(throughput, Termination::DepthExhausted, bounces)
        }
    }
}

/// One intersection plus one scattering event.
fn step<R: RngCore + ?Sized>(
    mut ray: Ray,
    throughput: Color,
    scene: &Scene,
    rng: &mut R,
) -> PathState {
    let Some(hit) = scene.spheres().intersect(&mut ray) else {
        return PathState::Escaped(throughput * sky_gradient(ray.direction));
    };

    match scene.materials().scatter(&ray, &hit, rng) {
        Scatter::Scattered { attenuation, ray } => PathState::Tracing {
            ray,
            throughput: throughput * attenuation,
        },
        Scatter::Absorbed => PathState::Absorbed,
    }
}

#[inline]
fn sample(color: Color, termination: Termination, bounces: u32) -> PathSample {
    PathSample {
        color,
        termination,
        bounces,
    }
}

/// Sky radiance: white at the horizon blending to light blue overhead.
pub fn sky_gradient(direction: Vec3) -> Color {
    let unit_direction = direction.normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}
