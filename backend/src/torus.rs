use std::fmt::Debug;

/// Discretized torus T_q = 2^{-BITS}Z / Z, stored as an unsigned machine word.
///
/// Arithmetic is wrapping: the word `x` represents the real `x / 2^BITS mod 1`.
pub trait Torus: Copy + Clone + Default + Debug + PartialEq + Eq + Send + Sync + 'static {
    const BITS: u32;
    const ZERO: Self;

    fn add(self, other: Self) -> Self;
    fn sub(self, other: Self) -> Self;
    fn neg(self) -> Self;
    fn mul_i64(self, x: i64) -> Self;
    fn shl(self, shift: u32) -> Self;

    /// Maps x mod 1 to the torus, rounding to the nearest representable value.
    fn from_f64(x: f64) -> Self;

    /// Returns the centered representative in [-0.5, 0.5).
    fn to_f64(self) -> f64;

    /// Rounds a 64-bit torus element to this torus.
    fn from_u64_torus(x: u64) -> Self;

    /// Embeds this torus element into the 64-bit torus.
    fn to_u64_torus(self) -> u64;

    /// Signed interpretation of the word.
    fn to_signed(self) -> i64;

    fn from_signed(x: i64) -> Self;

    /// Rounds to Z_{2N} as used by the blind rotation modulus switch.
    #[inline(always)]
    fn mod_switch_2n(self, two_n: usize) -> usize {
        debug_assert!(two_n.is_power_of_two());
        let log_2n: u32 = two_n.trailing_zeros();
        let x: u64 = self.to_u64_torus();
        let shift: u32 = 64 - log_2n;
        ((x.wrapping_add(1u64 << (shift - 1))) >> shift) as usize & (two_n - 1)
    }
}

macro_rules! impl_torus {
    ($t:ty, $s:ty, $bits:expr) => {
        impl Torus for $t {
            const BITS: u32 = $bits;
            const ZERO: Self = 0;

            #[inline(always)]
            fn add(self, other: Self) -> Self {
                self.wrapping_add(other)
            }

            #[inline(always)]
            fn sub(self, other: Self) -> Self {
                self.wrapping_sub(other)
            }

            #[inline(always)]
            fn neg(self) -> Self {
                self.wrapping_neg()
            }

            #[inline(always)]
            fn mul_i64(self, x: i64) -> Self {
                self.wrapping_mul(x as $t)
            }

            #[inline(always)]
            fn shl(self, shift: u32) -> Self {
                if shift >= Self::BITS { 0 } else { self << shift }
            }

            fn from_f64(x: f64) -> Self {
                let frac: f64 = x - x.floor();
                let scaled: f64 = (frac * (2.0f64).powi($bits)).round();
                (scaled as u128) as $t
            }

            fn to_f64(self) -> f64 {
                (self as $s) as f64 / (2.0f64).powi($bits)
            }

            #[inline(always)]
            fn from_u64_torus(x: u64) -> Self {
                let half: u128 = (1u128 << 64) >> ($bits + 1);
                ((x as u128 + half) >> (64 - $bits)) as $t
            }

            #[inline(always)]
            fn to_u64_torus(self) -> u64 {
                (self as u64) << (64 - $bits)
            }

            #[inline(always)]
            fn to_signed(self) -> i64 {
                self as $s as i64
            }

            #[inline(always)]
            fn from_signed(x: i64) -> Self {
                x as $t
            }
        }
    };
}

impl_torus!(u32, i32, 32);
impl_torus!(u64, i64, 64);

#[cfg(test)]
mod tests {
    use super::Torus;

    #[test]
    fn f64_conversions() {
        assert_eq!(<u32 as Torus>::from_f64(0.25), 1u32 << 30);
        assert_eq!(<u32 as Torus>::from_f64(-0.125), (1u32 << 29).wrapping_neg());
        assert_eq!(<u64 as Torus>::from_f64(0.5), 1u64 << 63);
        assert_eq!((1u32 << 29).wrapping_neg().to_f64(), -0.125);
        assert_eq!(<u64 as Torus>::from_f64(-0.125).to_f64(), -0.125);
    }

    #[test]
    fn u64_rounding() {
        let x: u64 = (3u64 << 40) | (1u64 << 31);
        assert_eq!(<u32 as Torus>::from_u64_torus(x), (3u32 << 8) + 1);
        assert_eq!(<u32 as Torus>::from_u64_torus(u64::MAX), 0);
        assert_eq!(7u32.to_u64_torus(), 7u64 << 32);
    }

    #[test]
    fn mod_switch() {
        assert_eq!(<u32 as Torus>::from_f64(0.25).mod_switch_2n(1024), 256);
        assert_eq!(<u32 as Torus>::from_f64(-1.0 / 1024.0).mod_switch_2n(1024), 1023);
        assert_eq!(u32::MAX.mod_switch_2n(1024), 0);
    }
}
