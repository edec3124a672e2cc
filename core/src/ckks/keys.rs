use backend::{AddNormal, BigPoly, fill_uniform_big};
use rug::Integer;
use sampling::{Distributions, Source};

use crate::{SIX_SIGMA, ckks::CkksParameters};

/// Ternary secret s in Z[X]/(X^N + 1).
#[derive(Clone, Debug, PartialEq)]
pub struct CkksSecretKey {
    pub(crate) data: Vec<i64>,
    pub(crate) dist: Distributions,
}

impl CkksSecretKey {
    pub fn generate(params: &CkksParameters, source: &mut Source) -> Self {
        let dist: Distributions = Distributions::TernaryProb(2.0 / 3.0);
        let mut data: Vec<i64> = vec![0; params.ring_degree];
        dist.fill_i64(&mut data, source);
        Self { data, dist }
    }

    pub fn n(&self) -> usize {
        self.data.len()
    }

    /// Coefficients in {-1, 0, 1}.
    pub fn coeffs(&self) -> &[i64] {
        &self.data
    }

    pub fn dist(&self) -> Distributions {
        self.dist
    }

    /// s^2 mod X^N + 1, with small integer coefficients.
    pub(crate) fn squared(&self) -> Vec<i64> {
        let n: usize = self.n();
        let mut res: Vec<i64> = vec![0; n];
        self.data.iter().enumerate().filter(|(_, x)| **x != 0).for_each(|(i, x)| {
            self.data.iter().enumerate().filter(|(_, y)| **y != 0).for_each(|(j, y)| {
                let k: usize = i + j;
                if k < n {
                    res[k] += x * y;
                } else {
                    res[k - n] -= x * y;
                }
            })
        });
        res
    }
}

/// Key switching key from s^2 to s.
///
/// Row i encrypts `2^p * 2^(p*i) * s^2` modulo `2^(p + log Q_top)`, p being
/// the special modulus. A size 3 ciphertext at level l is relinearized by
/// splitting c_2 in base 2^p digits, reducing the rows modulo
/// `2^(p + log Q_l)` and dividing the accumulated product by 2^p.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelinearizationKey {
    pub(crate) rows: Vec<[BigPoly; 2]>,
    pub(crate) log_special: u32,
    pub(crate) log_pq: u32,
}

impl RelinearizationKey {
    pub fn generate(
        params: &CkksParameters,
        sk: &CkksSecretKey,
        source_xa: &mut Source,
        source_xe: &mut Source,
    ) -> Self {
        let n: usize = params.ring_degree;
        let log_special: u32 = params.log_special();
        let log_pq: u32 = params.log_pq();
        let log_q_top: u32 = params.log_q(params.top_level());
        let rows: usize = log_q_top.div_ceil(log_special) as usize;

        let mut s2: BigPoly = BigPoly::alloc(n);
        assign_small(&mut s2, &sk.squared());
        s2.reduce(log_pq);

        let rows: Vec<[BigPoly; 2]> = (0..rows)
            .map(|i| {
                let mut a: BigPoly = BigPoly::alloc(n);
                fill_uniform_big(&mut a, log_pq, source_xa);

                let mut b: BigPoly = BigPoly::mul_small(&a, &sk.data, log_pq);
                b.neg_inplace(log_pq);
                b.add_normal(source_xe, params.sigma, SIX_SIGMA * params.sigma);
                b.reduce(log_pq);

                let shift: u32 = log_special * (i as u32 + 1);
                if shift < log_pq {
                    let mut m: BigPoly = s2.clone();
                    m.mul_scalar_inplace(&(Integer::from(1) << shift), log_pq);
                    b.add_inplace(&m, log_pq);
                }
                [b, a]
            })
            .collect();

        Self {
            rows,
            log_special,
            log_pq,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }
}

fn assign_small(res: &mut BigPoly, a: &[i64]) {
    res.coeffs.iter_mut().zip(a.iter()).for_each(|(r, x)| *r = Integer::from(*x));
}
