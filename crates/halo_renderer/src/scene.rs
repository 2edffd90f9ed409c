//! A committed sphere batch paired with its materials.

use crate::error::SceneError;
use crate::material::MaterialSet;
use crate::sphere_list::SphereBatch;
use std::collections::HashSet;

/// Everything the integrator needs to trace a path.
///
/// Sphere ids index straight into the material set. Immutable once built and
/// shared across render threads by reference.
#[derive(Debug, Clone)]
pub struct Scene {
    spheres: SphereBatch,
    materials: MaterialSet,
}

impl Scene {
    /// Pair spheres with materials, checking that every sphere id resolves.
    pub fn new(spheres: SphereBatch, materials: MaterialSet) -> Result<Self, SceneError> {
        let mut seen = HashSet::with_capacity(spheres.len());
        for &id in spheres.ids() {
            if !seen.insert(id) {
                return Err(SceneError::DuplicateId(id));
            }
            if id as usize >= materials.len() {
                return Err(SceneError::MissingMaterial {
                    id,
                    materials: materials.len(),
                });
            }
        }

        log::debug!(
            "Scene: {} spheres, {} materials, {}-wide lanes",
            spheres.len(),
            materials.len(),
            spheres.lane_width().lanes()
        );

        Ok(Self { spheres, materials })
    }

    pub fn spheres(&self) -> &SphereBatch {
        &self.spheres
    }

    pub fn materials(&self) -> &MaterialSet {
        &self.materials
    }

    /// Give back the parts, e.g. to recommit at another lane width.
    pub fn into_parts(self) -> (SphereBatch, MaterialSet) {
        (self.spheres, self.materials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Color;
    use crate::sphere_list::SphereBatchBuilder;
    use halo_math::{LaneWidth, Vec3};

    #[test]
    fn test_scene_accepts_matching_ids() {
        let mut materials = MaterialSet::new();
        let a = materials.add_lambertian(Color::splat(0.5));
        let b = materials.add_metal(Color::splat(0.7), 0.1);

        let mut builder = SphereBatchBuilder::new();
        builder.add_sphere(Vec3::ZERO, 1.0, b);
        builder.add_sphere(Vec3::X * 3.0, 1.0, a);

        let scene = Scene::new(builder.commit(LaneWidth::X4), materials).expect("valid scene");
        assert_eq!(scene.spheres().len(), 2);
        assert_eq!(scene.materials().len(), 2);
    }

    #[test]
    fn test_scene_rejects_missing_material() {
        let mut materials = MaterialSet::new();
        materials.add_lambertian(Color::ONE);

        let mut builder = SphereBatchBuilder::new();
        builder.add_sphere(Vec3::ZERO, 1.0, 0);
        builder.add_sphere(Vec3::X, 1.0, 4);

        let err = Scene::new(builder.commit(LaneWidth::Scalar), materials).unwrap_err();
        assert_eq!(err, SceneError::MissingMaterial { id: 4, materials: 1 });
    }

    #[test]
    fn test_scene_rejects_duplicate_ids() {
        let mut materials = MaterialSet::new();
        materials.add_lambertian(Color::ONE);

        let mut builder = SphereBatchBuilder::new();
        builder.add_sphere(Vec3::ZERO, 1.0, 0);
        builder.add_sphere(Vec3::X, 1.0, 0);

        let err = Scene::new(builder.commit(LaneWidth::X8), materials).unwrap_err();
        assert_eq!(err, SceneError::DuplicateId(0));
    }
}
