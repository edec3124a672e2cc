use backend::BigPoly;
use itertools::izip;
use rug::Integer;

use crate::{
    CkksError,
    ckks::{CkksCiphertext, CkksParameters, CkksPlaintext, RelinearizationKey},
};

/// Homomorphic operations on [CkksCiphertext].
///
/// Binary additive operations require operands at the same level and the
/// same scale; nothing is aligned implicitly.
pub struct CkksEvaluator {
    params: CkksParameters,
}

fn check_aligned(level_a: usize, scale_a: f64, level_b: usize, scale_b: f64) -> Result<(), CkksError> {
    if level_a != level_b {
        return Err(CkksError::LevelMismatch(level_a, level_b));
    }
    if scale_a != scale_b {
        return Err(CkksError::ScaleMismatch(scale_a, scale_b));
    }
    Ok(())
}

impl CkksEvaluator {
    pub fn new(params: &CkksParameters) -> Self {
        Self {
            params: params.clone(),
        }
    }

    pub fn params(&self) -> &CkksParameters {
        &self.params
    }

    pub fn add(&self, a: &CkksCiphertext, b: &CkksCiphertext) -> Result<CkksCiphertext, CkksError> {
        check_aligned(a.level, a.scale, b.level, b.scale)?;
        let (long, short) = if a.size() >= b.size() { (a, b) } else { (b, a) };
        let mut res: CkksCiphertext = long.clone();
        izip!(res.polys.iter_mut(), short.polys.iter()).for_each(|(r, x)| r.add_inplace(x, a.log_q));
        Ok(res)
    }

    pub fn sub(&self, a: &CkksCiphertext, b: &CkksCiphertext) -> Result<CkksCiphertext, CkksError> {
        check_aligned(a.level, a.scale, b.level, b.scale)?;
        let mut res: CkksCiphertext = a.clone();
        if b.size() > res.size() {
            res.polys.resize(b.size(), BigPoly::alloc(b.polys[0].n()));
        }
        izip!(res.polys.iter_mut(), b.polys.iter()).for_each(|(r, x)| r.sub_inplace(x, a.log_q));
        Ok(res)
    }

    pub fn negate(&self, a: &CkksCiphertext) -> CkksCiphertext {
        let mut res: CkksCiphertext = a.clone();
        res.polys.iter_mut().for_each(|p| p.neg_inplace(a.log_q));
        res
    }

    pub fn add_plain(&self, a: &CkksCiphertext, pt: &CkksPlaintext) -> Result<CkksCiphertext, CkksError> {
        check_aligned(a.level, a.scale, pt.level, pt.scale)?;
        let mut res: CkksCiphertext = a.clone();
        res.polys[0].add_inplace(&pt.poly, a.log_q);
        Ok(res)
    }

    pub fn sub_plain(&self, a: &CkksCiphertext, pt: &CkksPlaintext) -> Result<CkksCiphertext, CkksError> {
        check_aligned(a.level, a.scale, pt.level, pt.scale)?;
        let mut res: CkksCiphertext = a.clone();
        res.polys[0].sub_inplace(&pt.poly, a.log_q);
        Ok(res)
    }

    /// Product with a plaintext at the same level; scales multiply.
    pub fn multiply_plain(&self, a: &CkksCiphertext, pt: &CkksPlaintext) -> Result<CkksCiphertext, CkksError> {
        if a.level != pt.level {
            return Err(CkksError::LevelMismatch(a.level, pt.level));
        }
        let polys: Vec<BigPoly> = a
            .polys
            .iter()
            .map(|p| BigPoly::mul(&pt.poly, p, a.log_q))
            .collect();
        Ok(CkksCiphertext {
            polys,
            level: a.level,
            log_q: a.log_q,
            scale: a.scale * pt.scale,
        })
    }

    /// Tensor product of two size 2 ciphertexts, giving a size 3 ciphertext.
    pub fn multiply(&self, a: &CkksCiphertext, b: &CkksCiphertext) -> Result<CkksCiphertext, CkksError> {
        if a.level != b.level {
            return Err(CkksError::LevelMismatch(a.level, b.level));
        }
        if a.size() != 2 {
            return Err(CkksError::UnsupportedSize(a.size()));
        }
        if b.size() != 2 {
            return Err(CkksError::UnsupportedSize(b.size()));
        }
        let log_q: u32 = a.log_q;
        let d0: BigPoly = BigPoly::mul(&a.polys[0], &b.polys[0], log_q);
        let mut d1: BigPoly = BigPoly::mul(&a.polys[0], &b.polys[1], log_q);
        d1.add_inplace(&BigPoly::mul(&a.polys[1], &b.polys[0], log_q), log_q);
        let d2: BigPoly = BigPoly::mul(&a.polys[1], &b.polys[1], log_q);
        Ok(CkksCiphertext {
            polys: vec![d0, d1, d2],
            level: a.level,
            log_q,
            scale: a.scale * b.scale,
        })
    }

    pub fn square(&self, a: &CkksCiphertext) -> Result<CkksCiphertext, CkksError> {
        if a.size() != 2 {
            return Err(CkksError::UnsupportedSize(a.size()));
        }
        let log_q: u32 = a.log_q;
        let d0: BigPoly = BigPoly::mul(&a.polys[0], &a.polys[0], log_q);
        let mut d1: BigPoly = BigPoly::mul(&a.polys[0], &a.polys[1], log_q);
        d1.mul_scalar_inplace(&Integer::from(2), log_q);
        let d2: BigPoly = BigPoly::mul(&a.polys[1], &a.polys[1], log_q);
        Ok(CkksCiphertext {
            polys: vec![d0, d1, d2],
            level: a.level,
            log_q,
            scale: a.scale * a.scale,
        })
    }

    /// Brings a size 3 ciphertext back to size 2.
    pub fn relinearize(&self, a: &CkksCiphertext, rlk: &RelinearizationKey) -> Result<CkksCiphertext, CkksError> {
        if a.size() != 3 {
            return Err(CkksError::NotRelinearizable(a.size()));
        }
        let log_q: u32 = a.log_q;
        let p: u32 = rlk.log_special;
        let log_ext: u32 = log_q + p;
        let digits: usize = log_q.div_ceil(p) as usize;
        if digits > rlk.rows() || log_ext > rlk.log_pq {
            return Err(CkksError::InvalidParameters(format!(
                "relinearization key of {} rows cannot switch modulus 2^{}",
                rlk.rows(),
                log_q
            )));
        }

        let n: usize = a.polys[0].n();
        let mut acc: [BigPoly; 2] = [BigPoly::alloc(n), BigPoly::alloc(n)];
        let mut digit: BigPoly = BigPoly::alloc(n);
        (0..digits).for_each(|i| {
            izip!(digit.coeffs.iter_mut(), a.polys[2].coeffs.iter()).for_each(|(d, c)| {
                *d = Integer::from(c >> (p * i as u32));
                d.keep_bits_mut(p);
            });
            izip!(acc.iter_mut(), rlk.rows[i].iter()).for_each(|(r, k)| {
                let mut k: BigPoly = k.clone();
                k.reduce(log_ext);
                r.add_inplace(&BigPoly::mul(&digit, &k, log_ext), log_ext);
            });
        });

        let mut res: CkksCiphertext = CkksCiphertext {
            polys: vec![a.polys[0].clone(), a.polys[1].clone()],
            level: a.level,
            log_q,
            scale: a.scale,
        };
        izip!(res.polys.iter_mut(), acc.iter_mut()).for_each(|(r, x)| {
            x.div_round_pow2(p, log_q);
            r.add_inplace(x, log_q);
        });
        Ok(res)
    }

    /// Divides by the top modulus factor and drops one level.
    pub fn rescale_to_next(&self, a: &CkksCiphertext) -> Result<CkksCiphertext, CkksError> {
        if a.level == 0 {
            return Err(CkksError::EndOfModulusChain);
        }
        let bits: u32 = self.params.rescale_bits(a.level);
        let log_q: u32 = a.log_q - bits;
        let mut res: CkksCiphertext = a.clone();
        res.polys.iter_mut().for_each(|p| p.div_round_pow2(bits, log_q));
        res.log_q = log_q;
        res.level = a.level - 1;
        res.scale = a.scale / (2.0f64).powi(bits as i32);
        Ok(res)
    }

    /// Drops one level without touching the scale.
    pub fn mod_switch_to_next(&self, a: &CkksCiphertext) -> Result<CkksCiphertext, CkksError> {
        if a.level == 0 {
            return Err(CkksError::EndOfModulusChain);
        }
        self.mod_switch_to(a, a.level - 1)
    }

    pub fn mod_switch_to(&self, a: &CkksCiphertext, level: usize) -> Result<CkksCiphertext, CkksError> {
        if level > a.level {
            return Err(CkksError::InvalidTargetLevel { from: a.level, to: level });
        }
        let log_q: u32 = self.params.log_q(level);
        let mut res: CkksCiphertext = a.clone();
        res.polys.iter_mut().for_each(|p| p.reduce(log_q));
        res.log_q = log_q;
        res.level = level;
        Ok(res)
    }

    /// Rescales while the scale exceeds twice the nominal scale, then drops
    /// the remaining levels.
    pub fn normalize_to_final(&self, a: &CkksCiphertext) -> Result<CkksCiphertext, CkksError> {
        let mut res: CkksCiphertext = a.clone();
        while res.scale > 2.0 * self.params.scale && res.level > 0 {
            res = self.rescale_to_next(&res)?;
        }
        if res.level > 0 {
            res = self.mod_switch_to(&res, 0)?;
        }
        Ok(res)
    }
}
