//! Closest-hit queries against a committed sphere batch.
//!
//! One generic loop, [`intersect_lanes`], is instantiated per lane width.
//! Each lane keeps its own best distance and slot; the final reduction picks
//! the smallest distance and breaks ties by the lowest slot, which is what a
//! plain front-to-back scalar loop with a strict `<` would return.

use crate::sphere_list::{SphereBatch, INVALID_ID};
use halo_math::simd::{BoolLanes, FloatLanes, IntLanes, Scalar, X4, X8};
use halo_math::{LaneWidth, Lanes, Ray, Vec3};

/// Lane offsets within one batch, loaded as the first `WIDTH` entries.
const LANE_INDICES: [u32; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

/// Record of a ray-sphere intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Point of intersection
    pub position: Vec3,
    /// Geometric outward normal, unit length
    pub normal: Vec3,
    /// Ray parameter of the intersection
    pub t: f32,
    /// Id of the sphere that was hit
    pub id: u32,
}

impl SphereBatch {
    /// Find the closest sphere along `ray` within `[t_min, t_max]`.
    ///
    /// On a hit, `ray.t_max` is narrowed to the hit distance.
    pub fn intersect(&self, ray: &mut Ray) -> Option<Hit> {
        match self.lane_width() {
            LaneWidth::Scalar => self.intersect_with::<Scalar>(ray),
            LaneWidth::X4 => self.intersect_with::<X4>(ray),
            LaneWidth::X8 => self.intersect_with::<X8>(ray),
        }
    }

    /// Like [`intersect`](Self::intersect) but with an explicit backend.
    ///
    /// The padded length must be a multiple of `L::WIDTH`, which holds for any
    /// backend no wider than the committed one.
    pub fn intersect_with<L: Lanes>(&self, ray: &mut Ray) -> Option<Hit> {
        let (slot, t) = intersect_lanes::<L>(self, ray)?;

        ray.t_max = t;
        let position = ray.at(t);
        Some(Hit {
            position,
            normal: (position - self.center(slot)) * self.inv_radius(slot),
            t,
            id: self.id(slot),
        })
    }
}

/// Walk the batch `L::WIDTH` spheres at a time.
///
/// Returns the winning slot and its distance, or `None` when nothing lies in
/// `(t_min, t_max)`.
pub fn intersect_lanes<L: Lanes>(batch: &SphereBatch, ray: &Ray) -> Option<(usize, f32)> {
    let list = batch.list();
    debug_assert_eq!(
        list.len() % L::WIDTH,
        0,
        "batch padded for {:?} cannot be walked {} lanes at a time",
        batch.lane_width(),
        L::WIDTH
    );

    let origin_x = L::Float::splat(ray.origin.x);
    let origin_y = L::Float::splat(ray.origin.y);
    let origin_z = L::Float::splat(ray.origin.z);
    let dir_x = L::Float::splat(ray.direction.x);
    let dir_y = L::Float::splat(ray.direction.y);
    let dir_z = L::Float::splat(ray.direction.z);
    let t_min = L::Float::splat(ray.t_min);
    let zero = L::Float::splat(0.0);
    let lane_offsets = L::UInt::load_unaligned(&LANE_INDICES, 0);

    let mut best_t = L::Float::splat(ray.t_max);
    let mut best_slot = L::UInt::splat(INVALID_ID);

    for base in (0..list.len()).step_by(L::WIDTH) {
        let oc_x = origin_x - L::Float::load(&list.center_x, base);
        let oc_y = origin_y - L::Float::load(&list.center_y, base);
        let oc_z = origin_z - L::Float::load(&list.center_z, base);

        // Unit direction, so the quadratic's `a` term is 1
        let b = oc_x * dir_x + oc_y * dir_y + oc_z * dir_z;
        let c = oc_x * oc_x + oc_y * oc_y + oc_z * oc_z - L::Float::load(&list.radius_sq, base);
        let disc = b * b - c;

        let has_roots = disc.gt(zero);
        if has_roots.none() {
            continue;
        }

        let sqrt_disc = disc.sqrt();
        let t0 = -b - sqrt_disc;
        let t1 = -b + sqrt_disc;
        let t = L::Float::select(t0.gt(t_min), t0, t1);

        let closer = has_roots & t.gt(t_min) & t.lt(best_t);
        best_t = L::Float::select(closer, t, best_t);
        best_slot = L::UInt::select(closer, L::UInt::splat(base as u32) + lane_offsets, best_slot);
    }

    let min_t = best_t.reduce_min();
    let at_min = best_t.eq(L::Float::splat(min_t));
    let slot = L::UInt::select(at_min, best_slot, L::UInt::splat(INVALID_ID)).reduce_min();

    (slot != INVALID_ID).then_some((slot as usize, min_t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere_list::SphereBatchBuilder;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_batch(rng: &mut StdRng, n: usize, width: LaneWidth) -> SphereBatch {
        let mut builder = SphereBatchBuilder::with_capacity(n);
        for id in 0..n as u32 {
            let center = Vec3::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
            );
            builder.add_sphere(center, rng.gen_range(0.2..1.5), 1000 + id);
        }
        builder.commit(width)
    }

    fn random_ray(rng: &mut StdRng) -> Ray {
        let origin = Vec3::new(
            rng.gen_range(-8.0..8.0),
            rng.gen_range(-8.0..8.0),
            rng.gen_range(-8.0..8.0),
        );
        let direction = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        )
        .normalize();
        Ray::unbounded(origin, direction, 0.001)
    }

    /// Front-to-back scalar loop over the real spheres only.
    fn reference_closest(batch: &SphereBatch, ray: &Ray) -> Option<(u32, f32)> {
        let list = batch.list();
        let mut best: Option<(u32, f32)> = None;
        let mut closest = ray.t_max;
        for slot in 0..batch.len() {
            let oc = ray.origin - batch.center(slot);
            let b = oc.dot(ray.direction);
            let c = oc.dot(oc) - list.radius_sq[slot];
            let disc = b * b - c;
            if disc <= 0.0 {
                continue;
            }
            let sqrt_disc = disc.sqrt();
            let t0 = -b - sqrt_disc;
            let t = if t0 > ray.t_min { t0 } else { -b + sqrt_disc };
            if t > ray.t_min && t < closest {
                closest = t;
                best = Some((batch.id(slot), t));
            }
        }
        best
    }

    fn query<L: Lanes>(batch: &SphereBatch, mut ray: Ray) -> Option<Hit> {
        batch.intersect_with::<L>(&mut ray)
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() <= 1e-4 * a.abs().max(1.0), "{a} != {b}");
    }

    #[test]
    fn test_lane_widths_agree() {
        let mut rng = StdRng::seed_from_u64(17);
        // 37 spheres pads to 40 slots, walkable at every width
        let batch = random_batch(&mut rng, 37, LaneWidth::X8);
        let mut hits = 0;

        for _ in 0..500 {
            let ray = random_ray(&mut rng);
            let expected = reference_closest(&batch, &ray);

            let scalar = query::<Scalar>(&batch, ray);
            let x4 = query::<X4>(&batch, ray);
            let x8 = query::<X8>(&batch, ray);

            for result in [scalar, x4, x8] {
                match (expected, result) {
                    (None, None) => {}
                    (Some((id, t)), Some(hit)) => {
                        assert_eq!(hit.id, id);
                        assert_close(hit.t, t);
                    }
                    (e, r) => panic!("expected {e:?}, got {r:?}"),
                }
            }
            hits += expected.is_some() as usize;
        }

        // Make sure the fixture actually exercises hits
        assert!(hits > 50, "only {hits} hits");
    }

    #[test]
    fn test_dispatch_matches_forced_backend() {
        let mut rng = StdRng::seed_from_u64(99);
        for width in [LaneWidth::Scalar, LaneWidth::X4, LaneWidth::X8] {
            let batch = random_batch(&mut rng, 13, width);
            for _ in 0..100 {
                let ray = random_ray(&mut rng);
                let mut dispatched_ray = ray;
                let dispatched = batch.intersect(&mut dispatched_ray);
                let scalar = query::<Scalar>(&batch, ray);
                assert_eq!(dispatched.map(|h| h.id), scalar.map(|h| h.id));
            }
        }
    }

    #[test]
    fn test_empty_batch_never_hits() {
        let mut rng = StdRng::seed_from_u64(5);
        for width in [LaneWidth::Scalar, LaneWidth::X4, LaneWidth::X8] {
            let batch = SphereBatchBuilder::new().commit(width);
            for _ in 0..50 {
                let mut ray = random_ray(&mut rng);
                assert!(batch.intersect(&mut ray).is_none());
                assert_eq!(ray.t_max, f32::INFINITY);
            }
        }
    }

    #[test]
    fn test_padding_never_wins() {
        let mut builder = SphereBatchBuilder::new();
        builder.add_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0, 11);
        let batch = builder.commit(LaneWidth::X8);
        assert_eq!(batch.padded_len(), 8);

        // Rays that miss the real sphere see only padding
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..200 {
            let mut ray = random_ray(&mut rng);
            match batch.intersect(&mut ray) {
                Some(hit) => assert_eq!(hit.id, 11),
                None => assert_eq!(ray.t_max, f32::INFINITY),
            }
        }

        let mut ray = Ray::unbounded(Vec3::ZERO, Vec3::NEG_Z, 0.001);
        let hit = batch.intersect(&mut ray).expect("should hit the real sphere");
        assert_eq!(hit.id, 11);
        assert_ne!(hit.id, INVALID_ID);
    }

    #[test]
    fn test_tie_goes_to_earliest_sphere() {
        let center = Vec3::new(0.0, 0.0, -3.0);
        let far = Vec3::new(100.0, 100.0, 100.0);

        // Same lane (slots 0 and 1) and across lanes and batches (slots 1 and 5)
        let mut builder = SphereBatchBuilder::new();
        builder.add_sphere(far, 0.5, 1);
        builder.add_sphere(center, 1.0, 7);
        builder.add_sphere(far, 0.5, 2);
        builder.add_sphere(far, 0.5, 4);
        builder.add_sphere(far, 0.5, 5);
        builder.add_sphere(center, 1.0, 3);

        for width in [LaneWidth::Scalar, LaneWidth::X4, LaneWidth::X8] {
            let batch = builder.clone().commit(width);
            let mut ray = Ray::unbounded(Vec3::ZERO, Vec3::NEG_Z, 0.001);
            let hit = batch.intersect(&mut ray).expect("should hit");
            assert_eq!(hit.id, 7, "width {width:?}");
        }
    }

    #[test]
    fn test_hit_narrows_ray_and_reports_geometry() {
        let mut builder = SphereBatchBuilder::new();
        builder.add_sphere(Vec3::new(0.0, 0.0, -10.0), 2.0, 0);
        builder.add_sphere(Vec3::new(0.0, 0.0, -4.0), 1.0, 1);
        let batch = builder.commit(LaneWidth::X4);

        let mut ray = Ray::unbounded(Vec3::ZERO, Vec3::NEG_Z, 0.001);
        let hit = batch.intersect(&mut ray).expect("should hit");

        assert_eq!(hit.id, 1);
        assert!((hit.t - 3.0).abs() < 1e-5);
        assert_eq!(ray.t_max, hit.t);
        assert!((hit.position - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);

        // Nothing left in front of the narrowed bound
        assert!(batch.intersect(&mut ray).is_none());
    }

    #[test]
    fn test_inside_sphere_hits_far_side() {
        let mut builder = SphereBatchBuilder::new();
        builder.add_sphere(Vec3::ZERO, 2.0, 9);
        let batch = builder.commit(LaneWidth::X8);

        let mut ray = Ray::unbounded(Vec3::ZERO, Vec3::X, 0.001);
        let hit = batch.intersect(&mut ray).expect("should hit from inside");
        assert!((hit.t - 2.0).abs() < 1e-5);
        // Outward normal, same direction as the ray
        assert!(hit.normal.dot(ray.direction) > 0.99);
    }

    #[test]
    fn test_respects_ray_interval() {
        let mut builder = SphereBatchBuilder::new();
        builder.add_sphere(Vec3::new(0.0, 0.0, -10.0), 1.0, 0);
        let batch = builder.commit(LaneWidth::X4);

        let mut short = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 0.001, 5.0);
        assert!(batch.intersect(&mut short).is_none());

        // Sphere entirely behind t_min
        let mut behind = Ray::unbounded(Vec3::new(0.0, 0.0, -20.0), Vec3::NEG_Z, 0.001);
        assert!(batch.intersect(&mut behind).is_none());
    }
}
