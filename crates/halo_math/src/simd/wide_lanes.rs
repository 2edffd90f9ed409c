//! 4- and 8-lane backends on top of the `wide` crate.
//!
//! Masks are stored the way the hardware produces them: a float vector whose
//! lanes are all-ones or all-zeros bit patterns, so comparisons feed straight
//! into `blend` without conversion.

use super::{full_mask, BoolLanes, FloatLanes, IntLanes, Lanes};
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};
use wide::{f32x4, f32x8, i32x4, i32x8, u32x4, u32x8, CmpEq, CmpGt, CmpLt};

macro_rules! wide_backend {
    (
        $backend:ident, $width:literal,
        $bool:ident, $float:ident, $int:ident, $uint:ident,
        $fv:ident, $iv:ident, $uv:ident
    ) => {
        #[doc = concat!("The ", stringify!($width), "-lane backend.")]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $backend;

        impl Lanes for $backend {
            const WIDTH: usize = $width;

            type Bool = $bool;
            type Float = $float;
            type Int = $int;
            type UInt = $uint;
        }

        #[derive(Debug, Clone, Copy)]
        pub struct $bool($fv);

        #[derive(Debug, Clone, Copy)]
        pub struct $float(pub $fv);

        #[derive(Debug, Clone, Copy)]
        pub struct $int(pub $iv);

        #[derive(Debug, Clone, Copy)]
        pub struct $uint(pub $uv);

        impl $bool {
            /// Per-lane all-ones / all-zeros words.
            #[inline]
            fn words(self) -> [u32; $width] {
                bytemuck::cast(self.0.to_array())
            }
        }

        impl BoolLanes for $bool {
            const WIDTH: usize = $width;

            #[inline]
            fn splat(value: bool) -> Self {
                Self::from_bitmask(if value { full_mask($width) } else { 0 })
            }

            #[inline]
            fn from_bitmask(bits: u32) -> Self {
                let words: [u32; $width] =
                    std::array::from_fn(|lane| if (bits >> lane) & 1 == 1 { u32::MAX } else { 0 });
                $bool($fv::from(bytemuck::cast::<_, [f32; $width]>(words)))
            }

            #[inline]
            fn bitmask(self) -> u32 {
                self.0.move_mask() as u32 & full_mask($width)
            }
        }

        impl BitAnd for $bool {
            type Output = Self;
            #[inline]
            fn bitand(self, rhs: Self) -> Self {
                $bool(self.0 & rhs.0)
            }
        }

        impl BitOr for $bool {
            type Output = Self;
            #[inline]
            fn bitor(self, rhs: Self) -> Self {
                $bool(self.0 | rhs.0)
            }
        }

        impl BitXor for $bool {
            type Output = Self;
            #[inline]
            fn bitxor(self, rhs: Self) -> Self {
                $bool(self.0 ^ rhs.0)
            }
        }

        impl Not for $bool {
            type Output = Self;
            #[inline]
            fn not(self) -> Self {
                self ^ <$bool as BoolLanes>::splat(true)
            }
        }

        impl FloatLanes for $float {
            type Mask = $bool;
            const WIDTH: usize = $width;

            #[inline]
            fn splat(value: f32) -> Self {
                $float($fv::splat(value))
            }

            #[inline]
            fn load_unaligned(src: &[f32], offset: usize) -> Self {
                let mut lanes = [0.0f32; $width];
                lanes.copy_from_slice(&src[offset..offset + $width]);
                $float($fv::from(lanes))
            }

            #[inline]
            fn store_unaligned(self, dst: &mut [f32], offset: usize) {
                dst[offset..offset + $width].copy_from_slice(&self.0.to_array());
            }

            #[inline]
            fn extract(self, lane: usize) -> f32 {
                debug_assert!(lane < $width, "lane {lane} out of range");
                self.0.to_array()[lane]
            }

            #[inline]
            fn sqrt(self) -> Self {
                $float(self.0.sqrt())
            }

            #[inline]
            fn min(self, other: Self) -> Self {
                Self::select(self.lt(other), self, other)
            }

            #[inline]
            fn max(self, other: Self) -> Self {
                Self::select(self.gt(other), self, other)
            }

            #[inline]
            fn lt(self, other: Self) -> $bool {
                $bool(self.0.cmp_lt(other.0))
            }

            #[inline]
            fn le(self, other: Self) -> $bool {
                $bool(self.0.cmp_lt(other.0) | self.0.cmp_eq(other.0))
            }

            #[inline]
            fn gt(self, other: Self) -> $bool {
                $bool(self.0.cmp_gt(other.0))
            }

            #[inline]
            fn ge(self, other: Self) -> $bool {
                $bool(self.0.cmp_gt(other.0) | self.0.cmp_eq(other.0))
            }

            #[inline]
            fn eq(self, other: Self) -> $bool {
                $bool(self.0.cmp_eq(other.0))
            }

            #[inline]
            fn select(mask: $bool, if_true: Self, if_false: Self) -> Self {
                $float(mask.0.blend(if_true.0, if_false.0))
            }

            #[inline]
            fn reduce_min(self) -> f32 {
                let lanes = self.0.to_array();
                lanes[1..].iter().fold(lanes[0], |acc, &v| if v < acc { v } else { acc })
            }

            #[inline]
            fn reduce_max(self) -> f32 {
                let lanes = self.0.to_array();
                lanes[1..].iter().fold(lanes[0], |acc, &v| if v > acc { v } else { acc })
            }

            #[inline]
            fn reduce_add(self) -> f32 {
                let lanes = self.0.to_array();
                lanes[1..].iter().fold(lanes[0], |acc, &v| acc + v)
            }
        }

        impl Add for $float {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                $float(self.0 + rhs.0)
            }
        }

        impl Sub for $float {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                $float(self.0 - rhs.0)
            }
        }

        impl Mul for $float {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: Self) -> Self {
                $float(self.0 * rhs.0)
            }
        }

        impl Div for $float {
            type Output = Self;
            #[inline]
            fn div(self, rhs: Self) -> Self {
                $float(self.0 / rhs.0)
            }
        }

        impl Neg for $float {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                $float(-self.0)
            }
        }

        wide_int_lanes!($int, $iv, i32, $bool, $width);
        wide_int_lanes!($uint, $uv, u32, $bool, $width);
    };
}

// Integer lanes lean on `wide` for add/sub/bitwise and do the rest per lane;
// they only carry ids and slot indices, never hot arithmetic.
macro_rules! wide_int_lanes {
    ($name:ident, $vec:ident, $scalar:ty, $bool:ident, $width:literal) => {
        impl $name {
            #[inline]
            fn mask_where(self, other: Self, pred: impl Fn($scalar, $scalar) -> bool) -> $bool {
                let (a, b) = (self.0.to_array(), other.0.to_array());
                let bits = (0..$width)
                    .fold(0u32, |bits, lane| bits | ((pred(a[lane], b[lane]) as u32) << lane));
                <$bool as BoolLanes>::from_bitmask(bits)
            }
        }

        impl IntLanes for $name {
            type Scalar = $scalar;
            type Mask = $bool;
            const WIDTH: usize = $width;

            #[inline]
            fn splat(value: $scalar) -> Self {
                $name($vec::splat(value))
            }

            #[inline]
            fn load_unaligned(src: &[$scalar], offset: usize) -> Self {
                let mut lanes = [0 as $scalar; $width];
                lanes.copy_from_slice(&src[offset..offset + $width]);
                $name($vec::from(lanes))
            }

            #[inline]
            fn store_unaligned(self, dst: &mut [$scalar], offset: usize) {
                dst[offset..offset + $width].copy_from_slice(&self.0.to_array());
            }

            #[inline]
            fn extract(self, lane: usize) -> $scalar {
                debug_assert!(lane < $width, "lane {lane} out of range");
                self.0.to_array()[lane]
            }

            #[inline]
            fn lt(self, other: Self) -> $bool {
                self.mask_where(other, |a, b| a < b)
            }

            #[inline]
            fn le(self, other: Self) -> $bool {
                self.mask_where(other, |a, b| a <= b)
            }

            #[inline]
            fn gt(self, other: Self) -> $bool {
                self.mask_where(other, |a, b| a > b)
            }

            #[inline]
            fn ge(self, other: Self) -> $bool {
                self.mask_where(other, |a, b| a >= b)
            }

            #[inline]
            fn eq(self, other: Self) -> $bool {
                self.mask_where(other, |a, b| a == b)
            }

            #[inline]
            fn select(mask: $bool, if_true: Self, if_false: Self) -> Self {
                let m = $vec::from(bytemuck::cast::<_, [$scalar; $width]>(mask.words()));
                let inverted = m ^ $vec::splat(!0);
                $name((m & if_true.0) | (inverted & if_false.0))
            }

            #[inline]
            fn reduce_min(self) -> $scalar {
                let lanes = self.0.to_array();
                lanes[1..].iter().fold(lanes[0], |acc, &v| acc.min(v))
            }

            #[inline]
            fn reduce_max(self) -> $scalar {
                let lanes = self.0.to_array();
                lanes[1..].iter().fold(lanes[0], |acc, &v| acc.max(v))
            }

            #[inline]
            fn reduce_add(self) -> $scalar {
                let lanes = self.0.to_array();
                lanes[1..].iter().fold(lanes[0], |acc, &v| acc.wrapping_add(v))
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                $name(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                $name(self.0 - rhs.0)
            }
        }

        impl Mul for $name {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: Self) -> Self {
                let (a, b) = (self.0.to_array(), rhs.0.to_array());
                let products = std::array::from_fn::<$scalar, $width, _>(|lane| {
                    a[lane].wrapping_mul(b[lane])
                });
                $name($vec::from(products))
            }
        }

        impl BitAnd for $name {
            type Output = Self;
            #[inline]
            fn bitand(self, rhs: Self) -> Self {
                $name(self.0 & rhs.0)
            }
        }

        impl BitOr for $name {
            type Output = Self;
            #[inline]
            fn bitor(self, rhs: Self) -> Self {
                $name(self.0 | rhs.0)
            }
        }

        impl BitXor for $name {
            type Output = Self;
            #[inline]
            fn bitxor(self, rhs: Self) -> Self {
                $name(self.0 ^ rhs.0)
            }
        }
    };
}

wide_backend!(X4, 4, Bool4, Float4, Int4, UInt4, f32x4, i32x4, u32x4);
wide_backend!(X8, 8, Bool8, Float8, Int8, UInt8, f32x8, i32x8, u32x8);
