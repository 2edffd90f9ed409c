//! Reproducible random streams and the sampling routines built on them.
//!
//! Every tile row owns one [`XorShift32`] word. The sampling helpers consume a
//! fixed number of draws per call (no rejection loops), so the stream position
//! after a bounce depends only on which material was hit, never on the values
//! drawn. That keeps renders bit-reproducible from a seed.

use halo_math::Vec3;
use rand::{Error, RngCore, SeedableRng};
use std::f32::consts::TAU;

/// Replacement for an all-zero seed, which would lock xorshift at zero.
const ZERO_SEED_REPLACEMENT: u32 = 0x9E37_79B9;

/// Marsaglia's 32-bit xorshift (13, 17, 15).
///
/// Not cryptographic. One `u32` of state, advanced by a bijection on the
/// non-zero words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Create a stream from a seed. A zero seed is replaced by a fixed
    /// non-zero constant.
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { ZERO_SEED_REPLACEMENT } else { seed };
        Self { state }
    }

    /// The current state word.
    pub fn state(&self) -> u32 {
        self.state
    }

    #[inline]
    fn advance(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 15;
        self.state = x;
        x
    }
}

impl RngCore for XorShift32 {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        let lo = self.advance() as u64;
        let hi = self.advance() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for XorShift32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new((state ^ (state >> 32)) as u32)
    }
}

/// Uniform `f32` in `[0, 1)` from the low 24 bits of one draw.
///
/// 24 bits is exactly the `f32` mantissa, so every value is representable and
/// the result never rounds up to 1.0.
#[inline]
pub fn gen_f32<R: RngCore + ?Sized>(rng: &mut R) -> f32 {
    (rng.next_u32() & 0x00FF_FFFF) as f32 / 16_777_216.0
}

/// Uniform point inside the unit ball. Always three draws.
pub fn random_in_unit_sphere<R: RngCore + ?Sized>(rng: &mut R) -> Vec3 {
    let phi = TAU * gen_f32(rng);
    let cos_theta = 2.0 * gen_f32(rng) - 1.0;
    let r = gen_f32(rng).cbrt();

    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let (sin_phi, cos_phi) = phi.sin_cos();
    r * Vec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
}

/// Uniform point inside the unit disk (z = 0). Always two draws.
pub fn random_in_unit_disk<R: RngCore + ?Sized>(rng: &mut R) -> Vec3 {
    let r = gen_f32(rng).sqrt();
    let phi = TAU * gen_f32(rng);

    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(r * cos_phi, r * sin_phi, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xorshift_known_sequence() {
        let mut rng = XorShift32::new(1);
        // 1 ^ (1 << 13) = 0x2001; ^ (>> 17) = 0x2001; ^ (<< 15) = 0x1000_A001
        assert_eq!(rng.next_u32(), 0x1000_A001);
        assert_eq!(rng.state(), 0x1000_A001);
    }

    #[test]
    fn test_xorshift_never_zero() {
        let mut rng = XorShift32::new(0);
        assert_ne!(rng.state(), 0);
        for _ in 0..10_000 {
            assert_ne!(rng.next_u32(), 0);
        }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = XorShift32::new(0xDEAD_BEEF);
        let mut b = XorShift32::from_seed(0xDEAD_BEEFu32.to_le_bytes());
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_gen_f32_range() {
        let mut rng = XorShift32::new(12345);
        for _ in 0..10_000 {
            let x = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&x), "{x} out of [0, 1)");
        }
    }

    #[test]
    fn test_fill_bytes_partial_chunk() {
        let mut rng = XorShift32::new(7);
        let mut reference = rng;
        let mut bytes = [0u8; 6];
        rng.fill_bytes(&mut bytes);

        let first = reference.next_u32().to_le_bytes();
        let second = reference.next_u32().to_le_bytes();
        assert_eq!(&bytes[..4], &first);
        assert_eq!(&bytes[4..], &second[..2]);
    }

    #[test]
    fn test_unit_sphere_inside_and_fixed_draws() {
        let mut rng = XorShift32::new(99);
        for _ in 0..1_000 {
            let mut shadow = rng;
            let p = random_in_unit_sphere(&mut rng);
            assert!(p.length_squared() <= 1.0 + 1e-5);

            // Exactly three draws consumed
            for _ in 0..3 {
                shadow.next_u32();
            }
            assert_eq!(shadow, rng);
        }
    }

    #[test]
    fn test_unit_disk_inside_and_fixed_draws() {
        let mut rng = XorShift32::new(4242);
        for _ in 0..1_000 {
            let mut shadow = rng;
            let p = random_in_unit_disk(&mut rng);
            assert!(p.length_squared() <= 1.0 + 1e-5);
            assert_eq!(p.z, 0.0);

            shadow.next_u32();
            shadow.next_u32();
            assert_eq!(shadow, rng);
        }
    }

    #[test]
    fn test_unit_sphere_mean_near_origin() {
        let mut rng = XorShift32::new(2024);
        let n = 20_000;
        let sum: Vec3 = (0..n).map(|_| random_in_unit_sphere(&mut rng)).sum();
        assert!((sum / n as f32).length() < 0.05);
    }
}
