//! Width-parametric vector lanes.
//!
//! Batched math is written once against the [`Lanes`] backend trait and
//! instantiated for three widths:
//!
//! - [`Scalar`]: one lane of plain `bool`/`i32`/`u32`/`f32`. Always available
//!   and used as the reference every wider backend is tested against.
//! - [`X4`]: four lanes on `wide::{f32x4, i32x4, u32x4}` (SSE / NEON).
//! - [`X8`]: eight lanes on `wide::{f32x8, i32x8, u32x8}` (AVX).
//!
//! Every operation is lane-wise and IEEE-exact, so a wider backend returns
//! bit-identical results to running [`Scalar`] once per lane.
//!
//! Loads and stores address structure-of-arrays columns by element offset.
//! The "aligned" forms ([`FloatLanes::load`], [`FloatLanes::store`]) expect
//! the offset to sit on a lane boundary (a multiple of `WIDTH`), which is how
//! padded columns are walked; the `_unaligned` forms accept any offset.
//! Bounds and lane-index checks beyond what slice indexing already does are
//! `debug_assert!`s.

mod scalar;
mod wide_lanes;

pub use scalar::{Bool1, Float1, Int1, Scalar, UInt1};
pub use wide_lanes::{Bool4, Bool8, Float4, Float8, Int4, Int8, UInt4, UInt8, X4, X8};

use std::fmt::Debug;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

/// A lane-wise boolean mask.
pub trait BoolLanes:
    Copy
    + Debug
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    const WIDTH: usize;

    /// Replicate one value across every lane.
    fn splat(value: bool) -> Self;

    /// Build a mask from the low `WIDTH` bits of `bits` (bit i = lane i).
    fn from_bitmask(bits: u32) -> Self;

    /// Pack the mask into the low `WIDTH` bits of a `u32`.
    fn bitmask(self) -> u32;

    #[inline]
    fn any(self) -> bool {
        self.bitmask() != 0
    }

    #[inline]
    fn all(self) -> bool {
        self.bitmask() == full_mask(Self::WIDTH)
    }

    #[inline]
    fn none(self) -> bool {
        self.bitmask() == 0
    }

    #[inline]
    fn extract(self, lane: usize) -> bool {
        debug_assert!(lane < Self::WIDTH, "lane {lane} out of range");
        (self.bitmask() >> lane) & 1 == 1
    }
}

/// Lane-wise `f32` arithmetic.
pub trait FloatLanes:
    Copy
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    type Mask: BoolLanes;
    const WIDTH: usize;

    /// Replicate one scalar across every lane.
    fn splat(value: f32) -> Self;

    /// Read `WIDTH` consecutive elements starting at `offset`.
    fn load_unaligned(src: &[f32], offset: usize) -> Self;

    /// Write every lane to `WIDTH` consecutive elements starting at `offset`.
    fn store_unaligned(self, dst: &mut [f32], offset: usize);

    fn extract(self, lane: usize) -> f32;

    fn sqrt(self) -> Self;
    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;

    fn lt(self, other: Self) -> Self::Mask;
    fn le(self, other: Self) -> Self::Mask;
    fn gt(self, other: Self) -> Self::Mask;
    fn ge(self, other: Self) -> Self::Mask;
    fn eq(self, other: Self) -> Self::Mask;

    /// Per lane: `if_true` where `mask` is set, else `if_false`.
    fn select(mask: Self::Mask, if_true: Self, if_false: Self) -> Self;

    fn reduce_min(self) -> f32;
    fn reduce_max(self) -> f32;
    fn reduce_add(self) -> f32;

    /// Lane-boundary load; see the module docs.
    #[inline]
    fn load(src: &[f32], offset: usize) -> Self {
        debug_assert_eq!(offset % Self::WIDTH, 0, "offset {offset} is not lane aligned");
        Self::load_unaligned(src, offset)
    }

    /// Lane-boundary store; see the module docs.
    #[inline]
    fn store(self, dst: &mut [f32], offset: usize) {
        debug_assert_eq!(offset % Self::WIDTH, 0, "offset {offset} is not lane aligned");
        self.store_unaligned(dst, offset)
    }
}

/// Lane-wise 32-bit integer arithmetic, signed or unsigned.
///
/// Arithmetic wraps on overflow, matching the hardware lanes.
pub trait IntLanes:
    Copy
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
{
    type Scalar: Copy + Debug + PartialEq;
    type Mask: BoolLanes;
    const WIDTH: usize;

    fn splat(value: Self::Scalar) -> Self;
    fn load_unaligned(src: &[Self::Scalar], offset: usize) -> Self;
    fn store_unaligned(self, dst: &mut [Self::Scalar], offset: usize);
    fn extract(self, lane: usize) -> Self::Scalar;

    fn lt(self, other: Self) -> Self::Mask;
    fn le(self, other: Self) -> Self::Mask;
    fn gt(self, other: Self) -> Self::Mask;
    fn ge(self, other: Self) -> Self::Mask;
    fn eq(self, other: Self) -> Self::Mask;

    fn select(mask: Self::Mask, if_true: Self, if_false: Self) -> Self;

    fn reduce_min(self) -> Self::Scalar;
    fn reduce_max(self) -> Self::Scalar;
    fn reduce_add(self) -> Self::Scalar;

    #[inline]
    fn load(src: &[Self::Scalar], offset: usize) -> Self {
        debug_assert_eq!(offset % Self::WIDTH, 0, "offset {offset} is not lane aligned");
        Self::load_unaligned(src, offset)
    }

    #[inline]
    fn store(self, dst: &mut [Self::Scalar], offset: usize) {
        debug_assert_eq!(offset % Self::WIDTH, 0, "offset {offset} is not lane aligned");
        self.store_unaligned(dst, offset)
    }
}

/// A lane-width backend: one consistent family of lane types.
pub trait Lanes: Copy + Debug + Default + Send + Sync + 'static {
    const WIDTH: usize;

    type Bool: BoolLanes;
    type Float: FloatLanes<Mask = Self::Bool>;
    type Int: IntLanes<Scalar = i32, Mask = Self::Bool>;
    type UInt: IntLanes<Scalar = u32, Mask = Self::Bool>;
}

/// Runtime tag for the lane widths a batch can be committed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneWidth {
    Scalar,
    X4,
    X8,
}

impl LaneWidth {
    /// Number of lanes.
    pub const fn lanes(self) -> usize {
        match self {
            LaneWidth::Scalar => Scalar::WIDTH,
            LaneWidth::X4 => X4::WIDTH,
            LaneWidth::X8 => X8::WIDTH,
        }
    }

    /// The widest backend that maps onto real vector registers for the
    /// target this crate was compiled for.
    pub const fn native() -> Self {
        if cfg!(target_feature = "avx") {
            LaneWidth::X8
        } else if cfg!(any(
            target_feature = "sse2",
            target_feature = "neon",
            target_feature = "simd128"
        )) {
            LaneWidth::X4
        } else {
            LaneWidth::Scalar
        }
    }

    /// Parse a lane count.
    pub fn from_lanes(lanes: usize) -> Option<Self> {
        match lanes {
            1 => Some(LaneWidth::Scalar),
            4 => Some(LaneWidth::X4),
            8 => Some(LaneWidth::X8),
            _ => None,
        }
    }
}

impl Default for LaneWidth {
    fn default() -> Self {
        Self::native()
    }
}

#[inline]
const fn full_mask(width: usize) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}
