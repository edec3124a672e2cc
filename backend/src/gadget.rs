use crate::torus::Torus;

/// Base 2^base2k gadget of `rows` digits, most significant digit first.
///
/// A torus element a is approximated by sum_i d_i * 2^{-(i+1)*base2k}, the
/// remaining low bits being rounded away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gadget {
    pub base2k: usize,
    pub rows: usize,
}

impl Gadget {
    pub fn new(base2k: usize, rows: usize) -> Self {
        assert!(base2k >= 1, "base2k must be positive");
        assert!(
            base2k * rows <= 64,
            "base2k * rows = {} exceeds 64 bits",
            base2k * rows
        );
        Self { base2k, rows }
    }

    pub fn precision(&self) -> usize {
        self.base2k * self.rows
    }

    /// The torus value 2^{-(i+1)*base2k} carried by digit i.
    pub fn weight<T: Torus>(&self, i: usize) -> T {
        let shift: usize = (i + 1) * self.base2k;
        if shift > T::BITS as usize {
            T::ZERO
        } else {
            T::from_u64_torus(1u64 << (64 - shift))
        }
    }

    #[inline(always)]
    fn rounded(&self, a: u64) -> u64 {
        let total: usize = self.precision();
        if total >= 64 { a } else { a.wrapping_add(1u64 << (63 - total)) }
    }

    /// Signed digits in [-2^{base2k-1}, 2^{base2k-1}).
    #[inline(always)]
    pub fn decompose_signed<T: Torus>(&self, a: T, digits: &mut [i64]) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(digits.len(), self.rows);
        }
        let base: u64 = 1 << self.base2k;
        let mask: u64 = base - 1;
        let half: u64 = base >> 1;
        let offset: u64 = (0..self.rows).fold(0u64, |acc, i| acc.wrapping_add(half << (64 - (i + 1) * self.base2k)));
        let x: u64 = self.rounded(a.to_u64_torus()).wrapping_add(offset);
        digits.iter_mut().enumerate().for_each(|(i, d)| {
            let shift: usize = 64 - (i + 1) * self.base2k;
            *d = ((x >> shift) & mask) as i64 - half as i64;
        });
    }

    /// Unsigned digits in [0, 2^base2k).
    #[inline(always)]
    pub fn decompose_unsigned<T: Torus>(&self, a: T, digits: &mut [u64]) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(digits.len(), self.rows);
        }
        let mask: u64 = (1 << self.base2k) - 1;
        let x: u64 = self.rounded(a.to_u64_torus());
        digits.iter_mut().enumerate().for_each(|(i, d)| {
            let shift: usize = 64 - (i + 1) * self.base2k;
            *d = (x >> shift) & mask;
        });
    }

    /// Decomposes every coefficient of a polynomial; `res[i]` receives digit i
    /// of all coefficients.
    pub fn decompose_poly_signed<T: Torus>(&self, a: &[T], res: &mut [Vec<i64>]) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(res.len(), self.rows);
        }
        let mut digits: Vec<i64> = vec![0; self.rows];
        a.iter().enumerate().for_each(|(j, aj)| {
            self.decompose_signed(*aj, &mut digits);
            digits.iter().enumerate().for_each(|(i, d)| res[i][j] = *d);
        });
    }
}

#[cfg(test)]
mod tests {
    use rand_core::RngCore;
    use sampling::source::Source;

    use super::Gadget;
    use crate::torus::Torus;

    #[test]
    fn signed_recomposition() {
        let gadget: Gadget = Gadget::new(6, 3);
        let mut source: Source = Source::new([0u8; 32]);
        let mut digits: Vec<i64> = vec![0; 3];
        (0..1024).for_each(|_| {
            let a: u32 = source.next_u32();
            gadget.decompose_signed(a, &mut digits);
            assert!(digits.iter().all(|d| (-32..32).contains(d)));
            let recomposed: u32 = digits
                .iter()
                .enumerate()
                .fold(0u32, |acc, (i, d)| acc.add(gadget.weight::<u32>(i).mul_i64(*d)));
            let err: i64 = a.sub(recomposed).to_signed();
            assert!(err.abs() <= 1 << (32 - 18 - 1), "err={}", err);
        });
    }

    #[test]
    fn unsigned_recomposition() {
        let gadget: Gadget = Gadget::new(2, 7);
        let mut source: Source = Source::new([1u8; 32]);
        let mut digits: Vec<u64> = vec![0; 7];
        (0..1024).for_each(|_| {
            let a: u64 = source.next_u64();
            gadget.decompose_unsigned(a, &mut digits);
            let recomposed: u64 = digits
                .iter()
                .enumerate()
                .fold(0u64, |acc, (i, d)| acc.add(gadget.weight::<u64>(i).mul_i64(*d as i64)));
            let err: i64 = a.sub(recomposed).to_signed();
            assert!(err.abs() <= 1i64 << (64 - 14 - 1), "err={}", err);
        });
    }
}
