use backend::{AddNormal, FillUniform, Poly, Torus};
use sampling::{Distributions, Source};

use crate::{
    Infos, SIX_SIGMA,
    tfhe::{LweCiphertext, LweSecret},
};

/// Secret s(X) of a rank one TRLWE.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlweSecret {
    pub(crate) data: Vec<i64>,
}

impl GlweSecret {
    pub fn generate(n: usize, dist: Distributions, source: &mut Source) -> Self {
        let mut data: Vec<i64> = vec![0; n];
        dist.fill_i64(&mut data, source);
        Self { data }
    }

    pub fn from_coeffs(data: Vec<i64>) -> Self {
        Self { data }
    }

    pub fn n(&self) -> usize {
        self.data.len()
    }

    pub fn coeffs(&self) -> &[i64] {
        &self.data
    }

    /// Key of the LWE ciphertexts obtained by sample extraction.
    pub fn to_lwe(&self) -> LweSecret {
        LweSecret::from_coeffs(self.data.clone())
    }
}

/// `(b, a)` with phase `b + a * s`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlweCiphertext<T: Torus> {
    pub b: Poly<T>,
    pub a: Poly<T>,
}

impl<T: Torus> Infos for GlweCiphertext<T> {
    fn n(&self) -> usize {
        self.b.n()
    }

    fn log_q(&self) -> usize {
        T::BITS as usize
    }
}

impl<T: Torus> GlweCiphertext<T> {
    pub fn alloc(n: usize) -> Self {
        Self {
            b: Poly::alloc(n),
            a: Poly::alloc(n),
        }
    }

    pub fn trivial(m: Poly<T>) -> Self {
        let n: usize = m.n();
        Self { b: m, a: Poly::alloc(n) }
    }

    /// Noiseless encryption of the constant polynomial m.
    pub fn trivial_constant(n: usize, m: T) -> Self {
        let mut res: Self = Self::alloc(n);
        res.b.coeffs[0] = m;
        res
    }

    pub fn zero(&mut self) {
        self.b.zero();
        self.a.zero();
    }

    pub fn encrypt_sk(&mut self, m: &Poly<T>, sk: &GlweSecret, source_xa: &mut Source, source_xe: &mut Source, sigma: f64)
    where
        T: FillUniform,
    {
        #[cfg(debug_assertions)]
        {
            assert_eq!(self.n(), sk.n());
            assert_eq!(m.n(), sk.n());
        }
        self.a.fill_uniform(source_xa);
        self.a.mul_small(&sk.data, &mut self.b);
        self.b.neg_inplace();
        self.b.add_normal(source_xe, sigma, SIX_SIGMA * sigma);
        self.b.add_inplace(m);
    }

    /// Encryption of zero.
    pub fn encrypt_zero_sk(&mut self, sk: &GlweSecret, source_xa: &mut Source, source_xe: &mut Source, sigma: f64)
    where
        T: FillUniform,
    {
        let zero: Poly<T> = Poly::alloc(self.n());
        self.encrypt_sk(&zero, sk, source_xa, source_xe, sigma)
    }

    pub fn phase(&self, sk: &GlweSecret) -> Poly<T> {
        let mut res: Poly<T> = Poly::alloc(self.n());
        self.a.mul_small(&sk.data, &mut res);
        res.add_inplace(&self.b);
        res
    }

    pub fn add_inplace(&mut self, other: &GlweCiphertext<T>) {
        self.b.add_inplace(&other.b);
        self.a.add_inplace(&other.a);
    }

    pub fn sub_inplace(&mut self, other: &GlweCiphertext<T>) {
        self.b.sub_inplace(&other.b);
        self.a.sub_inplace(&other.a);
    }

    pub fn add_scaled_inplace(&mut self, other: &GlweCiphertext<T>, d: i64) {
        self.b.add_scaled_inplace(&other.b, d);
        self.a.add_scaled_inplace(&other.a, d);
    }

    /// Adds m to the constant coefficient of the phase.
    pub fn add_constant(&mut self, m: T) {
        self.b.coeffs[0] = self.b.coeffs[0].add(m);
    }

    /// res = X^k * self.
    pub fn mul_xai(&self, k: i64, res: &mut GlweCiphertext<T>) {
        self.b.mul_xai(k, &mut res.b);
        self.a.mul_xai(k, &mut res.a);
    }

    /// res = (X^k - 1) * self.
    pub fn mul_xai_minus_one(&self, k: i64, res: &mut GlweCiphertext<T>) {
        self.b.mul_xai_minus_one(k, &mut res.b);
        self.a.mul_xai_minus_one(k, &mut res.a);
    }

    /// LWE ciphertext whose phase is coefficient `k` of the phase of self,
    /// under the key [GlweSecret::to_lwe].
    pub fn sample_extract(&self, k: usize) -> LweCiphertext<T> {
        let n: usize = self.n();
        #[cfg(debug_assertions)]
        {
            assert!(k < n, "index {} >= ring degree {}", k, n);
        }
        let a: Vec<T> = (0..n)
            .map(|j| {
                if j <= k {
                    self.a.coeffs[k - j]
                } else {
                    self.a.coeffs[n + k - j].neg()
                }
            })
            .collect();
        LweCiphertext::from_raw(self.b.coeffs[k], a)
    }
}
