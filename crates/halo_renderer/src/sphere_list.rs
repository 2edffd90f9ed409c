//! Structure-of-arrays sphere storage.
//!
//! Spheres are appended to a [`SphereBatchBuilder`] and become queryable only
//! after [`SphereBatchBuilder::commit`] turns it into a [`SphereBatch`]. Commit
//! pads every column to a multiple of the lane width with inert entries, so
//! the intersection loop always processes full lanes.

use halo_math::{LaneWidth, Vec3};

/// Id carried by padding slots, and the "no hit" marker in lane data.
pub const INVALID_ID: u32 = 0xFFFF_FFFF;

/// Parallel sphere columns, index-aligned.
#[derive(Debug, Clone, Default)]
pub struct SphereList {
    pub center_x: Vec<f32>,
    pub center_y: Vec<f32>,
    pub center_z: Vec<f32>,
    pub radius_sq: Vec<f32>,
    /// `1 / radius`, precomputed so normals never need a square root.
    pub inv_radius: Vec<f32>,
    pub id: Vec<u32>,
}

impl SphereList {
    /// Number of slots, including any padding.
    #[inline]
    pub fn len(&self) -> usize {
        self.center_x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.center_x.is_empty()
    }

    #[inline]
    pub fn center(&self, slot: usize) -> Vec3 {
        Vec3::new(self.center_x[slot], self.center_y[slot], self.center_z[slot])
    }

    fn reserve(&mut self, additional: usize) {
        self.center_x.reserve(additional);
        self.center_y.reserve(additional);
        self.center_z.reserve(additional);
        self.radius_sq.reserve(additional);
        self.inv_radius.reserve(additional);
        self.id.reserve(additional);
    }

    fn push(&mut self, center: Vec3, radius_sq: f32, inv_radius: f32, id: u32) {
        self.center_x.push(center.x);
        self.center_y.push(center.y);
        self.center_z.push(center.z);
        self.radius_sq.push(radius_sq);
        self.inv_radius.push(inv_radius);
        self.id.push(id);
    }

    fn truncate(&mut self, len: usize) {
        self.center_x.truncate(len);
        self.center_y.truncate(len);
        self.center_z.truncate(len);
        self.radius_sq.truncate(len);
        self.inv_radius.truncate(len);
        self.id.truncate(len);
    }

    fn columns_aligned(&self) -> bool {
        let n = self.len();
        [
            self.center_y.len(),
            self.center_z.len(),
            self.radius_sq.len(),
            self.inv_radius.len(),
            self.id.len(),
        ]
        .iter()
        .all(|&len| len == n)
    }
}

/// A sphere batch that is still being built. Cannot be queried.
#[derive(Debug, Clone, Default)]
pub struct SphereBatchBuilder {
    list: SphereList,
}

impl SphereBatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut list = SphereList::default();
        list.reserve(capacity);
        Self { list }
    }

    /// Append one sphere.
    ///
    /// The radius must be positive and finite. Violations trip a debug
    /// assertion; release builds store the entry inert so it is never hit.
    pub fn add_sphere(&mut self, center: Vec3, radius: f32, id: u32) {
        let valid = radius > 0.0 && radius.is_finite() && center.is_finite();
        debug_assert!(valid, "sphere {id}: invalid center {center} or radius {radius}");
        debug_assert_ne!(id, INVALID_ID, "sphere id {INVALID_ID:#x} is reserved");

        if valid {
            self.list.push(center, radius * radius, 1.0 / radius, id);
        } else {
            self.list.push(center, f32::NAN, f32::NAN, id);
        }
    }

    /// Number of spheres added so far.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Pad to a multiple of `width` lanes and freeze the batch.
    ///
    /// Padding slots get a NaN center (every discriminant computed from it is
    /// NaN and fails the `> 0` test), zero radius, NaN reciprocal radius and
    /// [`INVALID_ID`].
    pub fn commit(mut self, width: LaneWidth) -> SphereBatch {
        let len = self.list.len();
        let padded_len = len.next_multiple_of(width.lanes());
        let padding = Vec3::splat(f32::NAN);

        self.list.reserve(padded_len - len);
        for _ in len..padded_len {
            self.list.push(padding, 0.0, f32::NAN, INVALID_ID);
        }
        debug_assert!(self.list.columns_aligned());

        log::debug!(
            "Committed {} spheres ({} slots) for {}-wide lanes",
            len,
            padded_len,
            width.lanes()
        );

        SphereBatch {
            list: self.list,
            len,
            width,
        }
    }
}

/// A committed, immutable sphere batch ready for intersection queries.
#[derive(Debug, Clone)]
pub struct SphereBatch {
    list: SphereList,
    len: usize,
    width: LaneWidth,
}

impl SphereBatch {
    /// Number of real (non-padding) spheres.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots including padding; always a multiple of the lane width.
    pub fn padded_len(&self) -> usize {
        self.list.len()
    }

    /// The lane width this batch was padded for.
    pub fn lane_width(&self) -> LaneWidth {
        self.width
    }

    /// The underlying columns.
    pub fn list(&self) -> &SphereList {
        &self.list
    }

    #[inline]
    pub fn center(&self, slot: usize) -> Vec3 {
        self.list.center(slot)
    }

    #[inline]
    pub fn inv_radius(&self, slot: usize) -> f32 {
        self.list.inv_radius[slot]
    }

    #[inline]
    pub fn id(&self, slot: usize) -> u32 {
        self.list.id[slot]
    }

    /// Ids of the real spheres, in insertion order.
    pub fn ids(&self) -> &[u32] {
        &self.list.id[..self.len]
    }

    /// Strip the padding and go back to building.
    ///
    /// The result must be committed again before it can be queried.
    pub fn into_builder(mut self) -> SphereBatchBuilder {
        self.list.truncate(self.len);
        SphereBatchBuilder { list: self.list }
    }
}
