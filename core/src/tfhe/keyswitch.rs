use std::marker::PhantomData;

use backend::{FillUniform, Gadget, Torus};
use sampling::Source;

use crate::{
    Infos,
    tfhe::{LweCiphertext, LweSecret},
};

/// LWE key switching key from a secret over `In` to a secret over `Out`.
///
/// Entry `(j, i)` encrypts `s_in[j] * 2^{-(i+1)*base2k}` under the output key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LweSwitchingKey<In: Torus, Out: Torus> {
    pub(crate) keys: Vec<LweCiphertext<Out>>,
    pub(crate) gadget: Gadget,
    pub(crate) n_in: usize,
    pub(crate) n_out: usize,
    _in: PhantomData<In>,
}

impl<In: Torus, Out: Torus + FillUniform> LweSwitchingKey<In, Out> {
    pub fn generate(
        sk_in: &LweSecret,
        sk_out: &LweSecret,
        gadget: Gadget,
        source_xa: &mut Source,
        source_xe: &mut Source,
        sigma: f64,
    ) -> Self {
        let n_in: usize = sk_in.n();
        let n_out: usize = sk_out.n();
        let mut keys: Vec<LweCiphertext<Out>> = Vec::with_capacity(n_in * gadget.rows);
        sk_in.data.iter().for_each(|s| {
            (0..gadget.rows).for_each(|i| {
                let mut ct: LweCiphertext<Out> = LweCiphertext::alloc(n_out);
                ct.encrypt_sk(gadget.weight::<Out>(i).mul_i64(*s), sk_out, source_xa, source_xe, sigma);
                keys.push(ct);
            })
        });
        Self {
            keys,
            gadget,
            n_in,
            n_out,
            _in: PhantomData,
        }
    }
}

impl<In: Torus, Out: Torus> LweSwitchingKey<In, Out> {
    pub fn n_in(&self) -> usize {
        self.n_in
    }

    pub fn n_out(&self) -> usize {
        self.n_out
    }

    pub fn keyswitch(&self, ct: &LweCiphertext<In>) -> LweCiphertext<Out> {
        #[cfg(debug_assertions)]
        {
            assert_eq!(ct.n(), self.n_in);
        }
        let rows: usize = self.gadget.rows;
        let mut res: LweCiphertext<Out> = LweCiphertext::trivial(self.n_out, Out::from_u64_torus(ct.b().to_u64_torus()));
        let mut digits: Vec<i64> = vec![0; rows];
        ct.a().iter().enumerate().for_each(|(j, a)| {
            self.gadget.decompose_signed(*a, &mut digits);
            digits.iter().enumerate().filter(|(_, d)| **d != 0).for_each(|(i, d)| {
                let key: &LweCiphertext<Out> = &self.keys[j * rows + i];
                res.data
                    .iter_mut()
                    .zip(key.data.iter())
                    .for_each(|(r, k)| *r = r.add(k.mul_i64(*d)));
            })
        });
        res
    }
}
