use backend::{Gadget, Module, Poly, Torus};
use sampling::Source;

use crate::{
    Infos,
    tfhe::{GgswCiphertext, GgswFourier, GlweCiphertext, GlweSecret, LweCiphertext, LweSecret},
};

/// TRGSW encryptions of the fine LWE secret under the mid TRLWE secret.
#[derive(Clone, Debug, PartialEq)]
pub struct BlindRotationKey {
    pub(crate) keys: Vec<GgswFourier>,
    pub(crate) n_glwe: usize,
}

/// Test polynomial with every coefficient equal to mu: blind rotation then
/// yields `+mu` in the constant coefficient for phases in [0, 1/2) and
/// `-mu` otherwise.
pub fn constant_test_vector(n: usize, mu: u32) -> Poly<u32> {
    Poly::from_coeffs(vec![mu; n])
}

impl BlindRotationKey {
    pub fn generate(
        module: &Module,
        sk_lwe: &LweSecret,
        sk_glwe: &GlweSecret,
        gadget: Gadget,
        source_xa: &mut Source,
        source_xe: &mut Source,
        sigma: f64,
    ) -> Self {
        #[cfg(debug_assertions)]
        {
            assert_eq!(module.n(), sk_glwe.n());
        }
        let keys: Vec<GgswFourier> = sk_lwe
            .data
            .iter()
            .map(|s| GgswCiphertext::encrypt_sk(*s, sk_glwe, gadget, source_xa, source_xe, sigma).prepare(module))
            .collect();
        tracing::debug!(
            n_lwe = keys.len(),
            n_glwe = sk_glwe.n(),
            rows = gadget.rows,
            "blind rotation key"
        );
        Self {
            keys,
            n_glwe: sk_glwe.n(),
        }
    }

    /// Dimension of the LWE ciphertexts this key rotates by.
    pub fn n_lwe(&self) -> usize {
        self.keys.len()
    }

    pub fn n_glwe(&self) -> usize {
        self.n_glwe
    }

    /// TRLWE of `X^{-phase} * tv`, the phase being rounded to Z_{2N}.
    pub fn blind_rotate(&self, module: &Module, lwe: &LweCiphertext<u32>, tv: &Poly<u32>) -> GlweCiphertext<u32> {
        #[cfg(debug_assertions)]
        {
            assert_eq!(lwe.n(), self.n_lwe());
            assert_eq!(tv.n(), self.n_glwe);
        }
        let two_n: usize = 2 * self.n_glwe;

        let b: i64 = lwe.b().mod_switch_2n(two_n) as i64;
        let mut rotated: Poly<u32> = Poly::alloc(self.n_glwe);
        tv.mul_xai(-b, &mut rotated);
        let mut acc: GlweCiphertext<u32> = GlweCiphertext::trivial(rotated);

        let mut tmp: GlweCiphertext<u32> = GlweCiphertext::alloc(self.n_glwe);
        lwe.a().iter().zip(self.keys.iter()).for_each(|(a, key)| {
            let a: i64 = a.mod_switch_2n(two_n) as i64;
            if a == 0 {
                return;
            }
            acc.mul_xai_minus_one(-a, &mut tmp);
            acc.add_inplace(&key.external_product(module, &tmp));
        });
        acc
    }

    /// Blind rotation followed by extraction of the constant coefficient.
    pub fn bootstrap(&self, module: &Module, lwe: &LweCiphertext<u32>, tv: &Poly<u32>) -> LweCiphertext<u32> {
        self.blind_rotate(module, lwe, tv).sample_extract(0)
    }

    /// Mid level LWE of `+mu` if the phase of `lwe` is in [0, 1/2), `-mu`
    /// otherwise.
    pub fn gate_bootstrap(&self, module: &Module, lwe: &LweCiphertext<u32>, mu: u32) -> LweCiphertext<u32> {
        self.bootstrap(module, lwe, &constant_test_vector(self.n_glwe, mu))
    }
}
