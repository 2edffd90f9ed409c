//! Halo renderer - CPU sphere path tracing
//!
//! A Monte Carlo path tracer over a single flat batch of spheres.
//! Ray-sphere tests run several spheres at once through the vector lanes in
//! `halo_math::simd`, at whichever lane width the batch was committed for.

mod accelerator;
mod camera;
mod error;
mod integrator;
mod material;
mod output;
mod renderer;
mod sampling;
mod scene;
mod sphere_list;
mod tile;

pub use accelerator::{intersect_lanes, Hit};
pub use camera::{Camera, CAMERA_T_MIN};
pub use error::{RenderError, RenderResult, SceneError};
pub use integrator::{
    sky_gradient, trace, trace_recursive, PathSample, PathState, Termination, MAX_DEPTH,
};
pub use material::{
    reflect, refract, schlick, Color, MaterialKind, MaterialSet, Scatter, SCATTER_T_MIN,
};
pub use output::{save_ppm, write_ppm, write_ppm_ascii, PpmFormat};
pub use renderer::{
    color_to_rgb8, linear_to_srgb, render, render_pixel, render_serial, render_tile, CancelFlag,
    ImageBuffer, RenderConfig, RenderOutput, RenderStats,
};
pub use sampling::{gen_f32, random_in_unit_disk, random_in_unit_sphere, XorShift32};
pub use scene::Scene;
pub use sphere_list::{SphereBatch, SphereBatchBuilder, SphereList, INVALID_ID};
pub use tile::{generate_tiles, tile_counts, tile_seed, Tile, TileResult, DEFAULT_TILE_SIZE};

/// Re-export Vec3 and common math types from halo_math
pub use halo_math::{LaneWidth, Ray, Vec3};
