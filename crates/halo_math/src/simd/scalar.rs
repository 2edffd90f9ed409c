//! Single-lane backend. Plain scalar code with the lane API on top.

use super::{BoolLanes, FloatLanes, IntLanes, Lanes};
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

/// The one-lane backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scalar;

impl Lanes for Scalar {
    const WIDTH: usize = 1;

    type Bool = Bool1;
    type Float = Float1;
    type Int = Int1;
    type UInt = UInt1;
}

#[derive(Debug, Clone, Copy)]
pub struct Bool1(pub bool);

#[derive(Debug, Clone, Copy)]
pub struct Float1(pub f32);

#[derive(Debug, Clone, Copy)]
pub struct Int1(pub i32);

#[derive(Debug, Clone, Copy)]
pub struct UInt1(pub u32);

impl BoolLanes for Bool1 {
    const WIDTH: usize = 1;

    #[inline]
    fn splat(value: bool) -> Self {
        Bool1(value)
    }

    #[inline]
    fn from_bitmask(bits: u32) -> Self {
        Bool1(bits & 1 == 1)
    }

    #[inline]
    fn bitmask(self) -> u32 {
        self.0 as u32
    }
}

impl BitAnd for Bool1 {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Bool1(self.0 & rhs.0)
    }
}

impl BitOr for Bool1 {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Bool1(self.0 | rhs.0)
    }
}

impl BitXor for Bool1 {
    type Output = Self;
    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Bool1(self.0 ^ rhs.0)
    }
}

impl Not for Bool1 {
    type Output = Self;
    #[inline]
    fn not(self) -> Self {
        Bool1(!self.0)
    }
}

impl FloatLanes for Float1 {
    type Mask = Bool1;
    const WIDTH: usize = 1;

    #[inline]
    fn splat(value: f32) -> Self {
        Float1(value)
    }

    #[inline]
    fn load_unaligned(src: &[f32], offset: usize) -> Self {
        Float1(src[offset])
    }

    #[inline]
    fn store_unaligned(self, dst: &mut [f32], offset: usize) {
        dst[offset] = self.0;
    }

    #[inline]
    fn extract(self, lane: usize) -> f32 {
        debug_assert!(lane < 1, "lane {lane} out of range");
        self.0
    }

    #[inline]
    fn sqrt(self) -> Self {
        Float1(self.0.sqrt())
    }

    // min/max follow the SSE convention (second operand on NaN or equality)
    // so the wide backends match this one lane for lane.
    #[inline]
    fn min(self, other: Self) -> Self {
        Float1(if self.0 < other.0 { self.0 } else { other.0 })
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        Float1(if self.0 > other.0 { self.0 } else { other.0 })
    }

    #[inline]
    fn lt(self, other: Self) -> Bool1 {
        Bool1(self.0 < other.0)
    }

    #[inline]
    fn le(self, other: Self) -> Bool1 {
        Bool1(self.0 <= other.0)
    }

    #[inline]
    fn gt(self, other: Self) -> Bool1 {
        Bool1(self.0 > other.0)
    }

    #[inline]
    fn ge(self, other: Self) -> Bool1 {
        Bool1(self.0 >= other.0)
    }

    #[inline]
    fn eq(self, other: Self) -> Bool1 {
        Bool1(self.0 == other.0)
    }

    #[inline]
    fn select(mask: Bool1, if_true: Self, if_false: Self) -> Self {
        if mask.0 {
            if_true
        } else {
            if_false
        }
    }

    #[inline]
    fn reduce_min(self) -> f32 {
        self.0
    }

    #[inline]
    fn reduce_max(self) -> f32 {
        self.0
    }

    #[inline]
    fn reduce_add(self) -> f32 {
        self.0
    }
}

macro_rules! float1_binop {
    ($($trait:ident::$method:ident),*) => {$(
        impl $trait for Float1 {
            type Output = Self;
            #[inline]
            fn $method(self, rhs: Self) -> Self {
                Float1($trait::$method(self.0, rhs.0))
            }
        }
    )*};
}

float1_binop!(Add::add, Sub::sub, Mul::mul, Div::div);

impl Neg for Float1 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Float1(-self.0)
    }
}

macro_rules! int1_lanes {
    ($name:ident, $scalar:ty) => {
        impl IntLanes for $name {
            type Scalar = $scalar;
            type Mask = Bool1;
            const WIDTH: usize = 1;

            #[inline]
            fn splat(value: $scalar) -> Self {
                $name(value)
            }

            #[inline]
            fn load_unaligned(src: &[$scalar], offset: usize) -> Self {
                $name(src[offset])
            }

            #[inline]
            fn store_unaligned(self, dst: &mut [$scalar], offset: usize) {
                dst[offset] = self.0;
            }

            #[inline]
            fn extract(self, lane: usize) -> $scalar {
                debug_assert!(lane < 1, "lane {lane} out of range");
                self.0
            }

            #[inline]
            fn lt(self, other: Self) -> Bool1 {
                Bool1(self.0 < other.0)
            }

            #[inline]
            fn le(self, other: Self) -> Bool1 {
                Bool1(self.0 <= other.0)
            }

            #[inline]
            fn gt(self, other: Self) -> Bool1 {
                Bool1(self.0 > other.0)
            }

            #[inline]
            fn ge(self, other: Self) -> Bool1 {
                Bool1(self.0 >= other.0)
            }

            #[inline]
            fn eq(self, other: Self) -> Bool1 {
                Bool1(self.0 == other.0)
            }

            #[inline]
            fn select(mask: Bool1, if_true: Self, if_false: Self) -> Self {
                if mask.0 {
                    if_true
                } else {
                    if_false
                }
            }

            #[inline]
            fn reduce_min(self) -> $scalar {
                self.0
            }

            #[inline]
            fn reduce_max(self) -> $scalar {
                self.0
            }

            #[inline]
            fn reduce_add(self) -> $scalar {
                self.0
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                $name(self.0.wrapping_add(rhs.0))
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                $name(self.0.wrapping_sub(rhs.0))
            }
        }

        impl Mul for $name {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: Self) -> Self {
                $name(self.0.wrapping_mul(rhs.0))
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

int1_lanes!(Int1, i32);
int1_lanes!(UInt1, u32);
