use backend::{Gadget, Poly, Torus};
use sampling::Source;

use crate::{
    Infos,
    tfhe::{GlweCiphertext, GlweSecret, LweCiphertext, LweSecret},
};

/// Function applied by a [PrivateKeySwitchingKey] to the LWE phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySwitchFunction {
    /// f(x) = x, placed in the constant coefficient.
    Identity,
    /// f(x) = x * s(X) for the output TRLWE secret s.
    TimesSecret,
}

/// Private functional key switching from a mid LWE to a mid TRLWE.
///
/// Entry `(j, i)` encrypts `f(s_j) * 2^{-(i+1)*base2k}` where `s_0 = 1`
/// accounts for the body `b` and `s_1, s_2, ..` is the LWE secret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateKeySwitchingKey {
    pub(crate) keys: Vec<GlweCiphertext<u32>>,
    pub(crate) gadget: Gadget,
    pub(crate) function: KeySwitchFunction,
    pub(crate) n_lwe: usize,
    pub(crate) n_glwe: usize,
}

impl PrivateKeySwitchingKey {
    pub fn generate(
        sk_lwe: &LweSecret,
        sk_glwe: &GlweSecret,
        function: KeySwitchFunction,
        gadget: Gadget,
        source_xa: &mut Source,
        source_xe: &mut Source,
        sigma: f64,
    ) -> Self {
        let n_glwe: usize = sk_glwe.n();
        let n_lwe: usize = sk_lwe.n();
        let mut keys: Vec<GlweCiphertext<u32>> = Vec::with_capacity((n_lwe + 1) * gadget.rows);
        let mut m: Poly<u32> = Poly::alloc(n_glwe);
        std::iter::once(&1i64).chain(sk_lwe.data.iter()).for_each(|s| {
            (0..gadget.rows).for_each(|i| {
                let w: u32 = gadget.weight::<u32>(i).mul_i64(*s);
                m.zero();
                match function {
                    KeySwitchFunction::Identity => m.coeffs[0] = w,
                    KeySwitchFunction::TimesSecret => {
                        m.coeffs
                            .iter_mut()
                            .zip(sk_glwe.data.iter())
                            .for_each(|(c, sj)| *c = w.mul_i64(*sj));
                    }
                }
                let mut ct: GlweCiphertext<u32> = GlweCiphertext::alloc(n_glwe);
                ct.encrypt_sk(&m, sk_glwe, source_xa, source_xe, sigma);
                keys.push(ct);
            })
        });
        Self {
            keys,
            gadget,
            function,
            n_lwe,
            n_glwe,
        }
    }

    pub fn function(&self) -> KeySwitchFunction {
        self.function
    }

    /// TRLWE whose phase is `f(phase(ct))`.
    pub fn keyswitch(&self, ct: &LweCiphertext<u32>) -> GlweCiphertext<u32> {
        #[cfg(debug_assertions)]
        {
            assert_eq!(ct.n(), self.n_lwe);
        }
        let rows: usize = self.gadget.rows;
        let mut res: GlweCiphertext<u32> = GlweCiphertext::alloc(self.n_glwe);
        let mut digits: Vec<i64> = vec![0; rows];
        ct.data.iter().enumerate().for_each(|(j, x)| {
            self.gadget.decompose_signed(*x, &mut digits);
            digits
                .iter()
                .enumerate()
                .filter(|(_, d)| **d != 0)
                .for_each(|(i, d)| res.add_scaled_inplace(&self.keys[j * rows + i], *d));
        });
        res
    }
}
