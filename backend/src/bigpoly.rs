use itertools::izip;
use rug::integer::Order;
use rug::{Assign, Integer};

/// Element of Z_Q[X]/(X^N + 1) for a power-of-two modulus Q = 2^log_q.
///
/// Coefficients are kept reduced in [0, Q).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BigPoly {
    pub coeffs: Vec<Integer>,
}

impl BigPoly {
    pub fn alloc(n: usize) -> Self {
        Self {
            coeffs: vec![Integer::new(); n],
        }
    }

    pub fn n(&self) -> usize {
        self.coeffs.len()
    }

    pub fn reduce(&mut self, log_q: u32) {
        self.coeffs.iter_mut().for_each(|c| c.keep_bits_mut(log_q));
    }

    pub fn add_inplace(&mut self, a: &BigPoly, log_q: u32) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(self.n(), a.n());
        }
        izip!(self.coeffs.iter_mut(), a.coeffs.iter()).for_each(|(x, y)| {
            *x += y;
            x.keep_bits_mut(log_q);
        });
    }

    pub fn sub_inplace(&mut self, a: &BigPoly, log_q: u32) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(self.n(), a.n());
        }
        izip!(self.coeffs.iter_mut(), a.coeffs.iter()).for_each(|(x, y)| {
            *x -= y;
            x.keep_bits_mut(log_q);
        });
    }

    pub fn neg_inplace(&mut self, log_q: u32) {
        self.coeffs.iter_mut().for_each(|x| {
            *x = -std::mem::take(x);
            x.keep_bits_mut(log_q);
        });
    }

    pub fn mul_scalar_inplace(&mut self, c: &Integer, log_q: u32) {
        self.coeffs.iter_mut().for_each(|x| {
            *x *= c;
            x.keep_bits_mut(log_q);
        });
    }

    /// Adds c to the constant coefficient.
    pub fn add_constant(&mut self, c: &Integer, log_q: u32) {
        self.coeffs[0] += c;
        self.coeffs[0].keep_bits_mut(log_q);
    }

    /// Rounded division of every coefficient by 2^bits.
    pub fn div_round_pow2(&mut self, bits: u32, log_q: u32) {
        if bits == 0 {
            return;
        }
        let half: Integer = Integer::from(1) << (bits - 1);
        self.coeffs.iter_mut().for_each(|x| {
            *x += &half;
            *x >>= bits;
            x.keep_bits_mut(log_q);
        });
    }

    /// res = a * b mod (X^N + 1, 2^log_q), schoolbook.
    pub fn mul(a: &BigPoly, b: &BigPoly, log_q: u32) -> BigPoly {
        let n: usize = a.n();
        #[cfg(debug_assertions)]
        {
            assert_eq!(b.n(), n);
        }
        let mut res: BigPoly = BigPoly::alloc(n);
        (0..n).for_each(|i| {
            if a.coeffs[i] == 0 {
                return;
            }
            (0..n).for_each(|j| {
                let k: usize = i + j;
                if k < n {
                    res.coeffs[k] += &a.coeffs[i] * &b.coeffs[j];
                } else {
                    res.coeffs[k - n] -= &a.coeffs[i] * &b.coeffs[j];
                }
            });
        });
        res.reduce(log_q);
        res
    }

    /// res = a * s mod (X^N + 1, 2^log_q) for a polynomial s with small
    /// coefficients, e.g. a secret key. Cost is proportional to the number of
    /// non-zero coefficients of s.
    pub fn mul_small(a: &BigPoly, s: &[i64], log_q: u32) -> BigPoly {
        let n: usize = a.n();
        #[cfg(debug_assertions)]
        {
            assert_eq!(s.len(), n);
        }
        let mut res: BigPoly = BigPoly::alloc(n);
        let mut tmp: Integer = Integer::new();
        s.iter().enumerate().filter(|(_, sj)| **sj != 0).for_each(|(j, sj)| {
            (0..n).for_each(|i| {
                let k: usize = i + j;
                let (idx, negate) = if k < n { (k, false) } else { (k - n, true) };
                match (*sj, negate) {
                    (1, false) | (-1, true) => res.coeffs[idx] += &a.coeffs[i],
                    (-1, false) | (1, true) => res.coeffs[idx] -= &a.coeffs[i],
                    _ => {
                        tmp.assign(&a.coeffs[i] * *sj);
                        if negate {
                            res.coeffs[idx] -= &tmp;
                        } else {
                            res.coeffs[idx] += &tmp;
                        }
                    }
                }
            })
        });
        res.reduce(log_q);
        res
    }

    /// Centered representative of coefficient i in [-Q/2, Q/2).
    pub fn centered(&self, i: usize, log_q: u32) -> Integer {
        let x: &Integer = &self.coeffs[i];
        if x.get_bit(log_q - 1) {
            Integer::from(x - (Integer::from(1) << log_q))
        } else {
            x.clone()
        }
    }

    /// Number of bytes used by one serialized coefficient.
    pub fn coeff_bytes(log_q: u32) -> usize {
        (log_q as usize).div_ceil(8)
    }

    /// Little-endian fixed width bytes of all coefficients.
    pub fn to_bytes(&self, log_q: u32, out: &mut Vec<u8>) {
        let width: usize = Self::coeff_bytes(log_q);
        self.coeffs.iter().for_each(|c| {
            let mut digits: Vec<u8> = c.to_digits::<u8>(Order::Lsf);
            digits.resize(width, 0);
            out.extend_from_slice(&digits);
        });
    }

    pub fn from_bytes(n: usize, log_q: u32, bytes: &[u8]) -> Option<Self> {
        let width: usize = Self::coeff_bytes(log_q);
        if bytes.len() != n * width {
            return None;
        }
        let coeffs: Vec<Integer> = bytes
            .chunks_exact(width)
            .map(|chunk| {
                let mut c: Integer = Integer::from_digits(chunk, Order::Lsf);
                c.keep_bits_mut(log_q);
                c
            })
            .collect();
        Some(Self { coeffs })
    }
}

#[cfg(test)]
mod tests {
    use rug::Integer;

    use super::BigPoly;

    #[test]
    fn mul_small_matches_mul() {
        let n: usize = 16;
        let log_q: u32 = 100;
        let mut a: BigPoly = BigPoly::alloc(n);
        (0..n).for_each(|i| a.coeffs[i] = (Integer::from(i * 7919 + 3) << 70u32) + i as u32);
        a.reduce(log_q);

        let s: Vec<i64> = (0..n as i64).map(|i| (i % 3) - 1 + if i == 5 { 3 } else { 0 }).collect();
        let mut s_big: BigPoly = BigPoly::alloc(n);
        s.iter().enumerate().for_each(|(i, x)| s_big.coeffs[i] = Integer::from(*x));
        s_big.reduce(log_q);

        assert_eq!(BigPoly::mul_small(&a, &s, log_q), BigPoly::mul(&a, &s_big, log_q));
    }

    #[test]
    fn centered_and_rounding() {
        let log_q: u32 = 80;
        let mut a: BigPoly = BigPoly::alloc(4);
        a.coeffs[0] = Integer::from(-5);
        a.coeffs[1] = Integer::from(6);
        a.reduce(log_q);
        assert_eq!(a.centered(0, log_q), -5);
        assert_eq!(a.centered(1, log_q), 6);
        a.div_round_pow2(2, log_q - 2);
        assert_eq!(a.centered(0, log_q - 2), -1);
        assert_eq!(a.centered(1, log_q - 2), 2);
    }

    #[test]
    fn bytes_round_trip() {
        let log_q: u32 = 70;
        let mut a: BigPoly = BigPoly::alloc(8);
        (0..8).for_each(|i| a.coeffs[i] = Integer::from(-(i as i64) * 123456789));
        a.reduce(log_q);
        let mut bytes: Vec<u8> = Vec::new();
        a.to_bytes(log_q, &mut bytes);
        assert_eq!(bytes.len(), 8 * 9);
        assert_eq!(BigPoly::from_bytes(8, log_q, &bytes), Some(a));
    }
}
