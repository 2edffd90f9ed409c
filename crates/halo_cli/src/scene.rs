//! Random sphere field used by the `halo` binary.

use halo_renderer::{Color, LaneWidth, MaterialSet, Scene, SceneError, SphereBatchBuilder, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build the demo scene: a ground sphere, a `2 * grid` square of small random
/// spheres and three large feature spheres.
///
/// Sphere ids are material indices, so every sphere owns its material.
pub fn random_scene(seed: u64, grid: i32, width: LaneWidth) -> Result<Scene, SceneError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut materials = MaterialSet::new();
    let mut builder = SphereBatchBuilder::new();

    // Ground
    let ground = materials.add_lambertian(Color::splat(0.5));
    builder.add_sphere(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground);

    for a in -grid..grid {
        for b in -grid..grid {
            let radius = 0.2 + rng.gen_range(-0.1f32..0.1);
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                radius,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            // Keep clear of the metal feature sphere
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let id = if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                materials.add_lambertian(albedo)
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 * (1.0 + rng.gen::<f32>()),
                    0.5 * (1.0 + rng.gen::<f32>()),
                    0.5 * (1.0 + rng.gen::<f32>()),
                );
                materials.add_metal(albedo, 0.5 * rng.gen::<f32>())
            } else {
                materials.add_dielectric(1.5)
            };
            builder.add_sphere(center, radius, id);
        }
    }

    // Three large feature spheres
    let glass = materials.add_dielectric(1.5);
    builder.add_sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, glass);

    let diffuse = materials.add_lambertian(Color::new(0.4, 0.2, 0.1));
    builder.add_sphere(Vec3::new(-4.0, 1.0, 0.0), 1.0, diffuse);

    let metal = materials.add_metal(Color::new(0.7, 0.6, 0.5), 0.0);
    builder.add_sphere(Vec3::new(4.0, 1.0, 0.0), 1.0, metal);

    Scene::new(builder.commit(width), materials)
}
