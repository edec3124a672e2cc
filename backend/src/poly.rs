use itertools::izip;

use crate::torus::Torus;

/// Element of T_q[X]/(X^N + 1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly<T: Torus> {
    pub coeffs: Vec<T>,
}

impl<T: Torus> Poly<T> {
    pub fn alloc(n: usize) -> Self {
        #[cfg(debug_assertions)]
        {
            assert!(n.is_power_of_two(), "n must be a power of two but is {}", n);
        }
        Self {
            coeffs: vec![T::ZERO; n],
        }
    }

    pub fn from_coeffs(coeffs: Vec<T>) -> Self {
        Self { coeffs }
    }

    pub fn n(&self) -> usize {
        self.coeffs.len()
    }

    pub fn zero(&mut self) {
        self.coeffs.fill(T::ZERO)
    }

    pub fn add_inplace(&mut self, a: &Poly<T>) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(self.n(), a.n());
        }
        izip!(self.coeffs.iter_mut(), a.coeffs.iter()).for_each(|(x, y)| *x = x.add(*y));
    }

    pub fn sub_inplace(&mut self, a: &Poly<T>) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(self.n(), a.n());
        }
        izip!(self.coeffs.iter_mut(), a.coeffs.iter()).for_each(|(x, y)| *x = x.sub(*y));
    }

    pub fn neg_inplace(&mut self) {
        self.coeffs.iter_mut().for_each(|x| *x = x.neg());
    }

    /// self += d * a for a small integer d.
    pub fn add_scaled_inplace(&mut self, a: &Poly<T>, d: i64) {
        izip!(self.coeffs.iter_mut(), a.coeffs.iter()).for_each(|(x, y)| *x = x.add(y.mul_i64(d)));
    }

    /// res = X^k * a with k taken mod 2N.
    pub fn mul_xai(&self, k: i64, res: &mut Poly<T>) {
        let n: usize = self.n();
        let two_n: i64 = 2 * n as i64;
        let k: usize = k.rem_euclid(two_n) as usize;
        (0..n).for_each(|i| {
            let j: usize = i + k;
            let (idx, negate) = if j < n {
                (j, false)
            } else if j < 2 * n {
                (j - n, true)
            } else {
                (j - 2 * n, false)
            };
            res.coeffs[idx] = if negate { self.coeffs[i].neg() } else { self.coeffs[i] };
        });
    }

    /// res = (X^k - 1) * a with k taken mod 2N.
    pub fn mul_xai_minus_one(&self, k: i64, res: &mut Poly<T>) {
        self.mul_xai(k, res);
        res.sub_inplace(self);
    }

    /// res = self * s for a small integer polynomial s, schoolbook.
    pub fn mul_small(&self, s: &[i64], res: &mut Poly<T>) {
        let n: usize = self.n();
        #[cfg(debug_assertions)]
        {
            assert_eq!(s.len(), n);
        }
        res.zero();
        s.iter().enumerate().filter(|(_, sj)| **sj != 0).for_each(|(j, sj)| {
            (0..n).for_each(|i| {
                let prod: T = self.coeffs[i].mul_i64(*sj);
                let idx: usize = i + j;
                if idx < n {
                    res.coeffs[idx] = res.coeffs[idx].add(prod);
                } else {
                    res.coeffs[idx - n] = res.coeffs[idx - n].sub(prod);
                }
            })
        });
    }
}

#[cfg(test)]
mod tests {
    use super::Poly;

    #[test]
    fn mul_xai_negacyclic() {
        let n: usize = 8;
        let mut a: Poly<u32> = Poly::alloc(n);
        a.coeffs[n - 1] = 5;
        let mut res: Poly<u32> = Poly::alloc(n);
        a.mul_xai(1, &mut res);
        assert_eq!(res.coeffs[0], 5u32.wrapping_neg());
        a.mul_xai(-(n as i64) + 1, &mut res);
        assert_eq!(res.coeffs[0], 5);
        a.mul_xai(2 * n as i64 + 1, &mut res);
        assert_eq!(res.coeffs[0], 5u32.wrapping_neg());
    }

    #[test]
    fn mul_small_matches_monomial() {
        let n: usize = 16;
        let a: Poly<u64> = Poly::from_coeffs((0..n as u64).map(|i| i * 3 + 1).collect());
        let mut s: Vec<i64> = vec![0; n];
        s[5] = -1;
        let mut expected: Poly<u64> = Poly::alloc(n);
        a.mul_xai(5, &mut expected);
        expected.neg_inplace();
        let mut res: Poly<u64> = Poly::alloc(n);
        a.mul_small(&s, &mut res);
        assert_eq!(res, expected);
    }
}
