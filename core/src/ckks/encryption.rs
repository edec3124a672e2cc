use backend::{AddNormal, BigPoly, fill_uniform_big};
use sampling::Source;

use crate::{
    SIX_SIGMA,
    ckks::{CkksCiphertext, CkksParameters, CkksPlaintext, CkksSecretKey},
};

impl CkksCiphertext {
    /// Encrypts `pt` at its own level: `c_1 = a`, `c_0 = -a * s + e + m`.
    pub fn encrypt_sk(
        params: &CkksParameters,
        pt: &CkksPlaintext,
        sk: &CkksSecretKey,
        source_xa: &mut Source,
        source_xe: &mut Source,
    ) -> Self {
        #[cfg(debug_assertions)]
        {
            assert_eq!(pt.poly.n(), sk.n());
            assert_eq!(params.ring_degree, sk.n());
        }
        let log_q: u32 = pt.log_q;
        let n: usize = sk.n();

        let mut a: BigPoly = BigPoly::alloc(n);
        fill_uniform_big(&mut a, log_q, source_xa);

        let mut b: BigPoly = BigPoly::mul_small(&a, &sk.data, log_q);
        b.neg_inplace(log_q);
        b.add_normal(source_xe, params.sigma, SIX_SIGMA * params.sigma);
        b.reduce(log_q);
        b.add_inplace(&pt.poly, log_q);

        Self {
            polys: vec![b, a],
            level: pt.level,
            log_q,
            scale: pt.scale,
        }
    }

    /// Phase `c_0 + c_1 * s + c_2 * s^2 + ...`.
    pub fn decrypt(&self, sk: &CkksSecretKey) -> CkksPlaintext {
        let log_q: u32 = self.log_q;
        let mut res: BigPoly = self.polys[0].clone();
        self.polys[1..].iter().enumerate().for_each(|(i, c)| {
            let mut acc: BigPoly = c.clone();
            (0..=i).for_each(|_| acc = BigPoly::mul_small(&acc, &sk.data, log_q));
            res.add_inplace(&acc, log_q);
        });
        CkksPlaintext {
            poly: res,
            level: self.level,
            log_q,
            scale: self.scale,
        }
    }
}
